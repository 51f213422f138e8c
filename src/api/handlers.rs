use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::services::recommender::{self, MatchKind, RecommendationSet, ScoredMovie};
use crate::services::resolver;

use super::AppState;

/// Seed for the quick-picks sample, fixed so repeated calls agree
const SAMPLE_SEED: u64 = 7;

const DEFAULT_K: usize = 5;
const DEFAULT_SEARCH_LIMIT: usize = 5;
const DEFAULT_SAMPLE_SIZE: usize = 6;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct RecommendQuery {
    pub q: String,
    pub k: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct ExactRecommendQuery {
    pub title: String,
    pub k: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct SampleQuery {
    pub n: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct TitleResponse {
    pub index: usize,
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct SearchHitResponse {
    pub index: usize,
    pub title: String,
    pub score: f64,
}

#[derive(Debug, Serialize)]
pub struct RecommendedMovieResponse {
    pub index: usize,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genres: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imdb_id: Option<String>,
    pub score: f32,
}

impl From<&ScoredMovie> for RecommendedMovieResponse {
    fn from(scored: &ScoredMovie) -> Self {
        Self {
            index: scored.index,
            title: scored.movie.title.clone(),
            year: scored.movie.year,
            genres: scored.movie.genres.clone(),
            poster_url: scored.movie.poster_url.clone(),
            imdb_id: scored.movie.imdb_id.clone(),
            score: scored.score,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub query: String,
    pub matched_title: String,
    pub match_kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_score: Option<f64>,
    pub recommendations: Vec<RecommendedMovieResponse>,
}

impl RecommendationResponse {
    fn new(query: String, set: RecommendationSet) -> Self {
        Self {
            query,
            matched_title: set.matched_title,
            match_kind: match set.match_kind {
                MatchKind::Exact => "exact",
                MatchKind::Fuzzy => "fuzzy",
            },
            match_score: set.match_score,
            recommendations: set.items.iter().map(RecommendedMovieResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CatalogInfoResponse {
    pub total: usize,
    /// Metadata fields populated for at least one entry
    pub fields: Vec<&'static str>,
    pub loaded_at: DateTime<Utc>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// All catalog titles in index order, for selectbox-style pickers
pub async fn list_movies(State(state): State<AppState>) -> Json<Vec<TitleResponse>> {
    let titles = state
        .store
        .catalog
        .iter()
        .map(|(index, movie)| TitleResponse {
            index,
            title: movie.title.clone(),
        })
        .collect();
    Json(titles)
}

/// Fuzzy title search: the n best candidates above the configured cutoff
pub async fn search_movies(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<Vec<SearchHitResponse>>> {
    if params.q.trim().is_empty() {
        return Err(AppError::InvalidInput("query must not be empty".to_string()));
    }
    let limit = params.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);

    let hits = resolver::search(
        &params.q,
        &state.store.catalog,
        state.config.fuzzy_cutoff,
        limit,
    );
    let hits = hits
        .into_iter()
        .filter_map(|(index, score)| {
            state.store.catalog.get(index).map(|movie| SearchHitResponse {
                index,
                title: movie.title.clone(),
                score,
            })
        })
        .collect();
    Ok(Json(hits))
}

/// Deterministic quick-picks sample of catalog titles
pub async fn sample_movies(
    State(state): State<AppState>,
    Query(params): Query<SampleQuery>,
) -> Json<Vec<TitleResponse>> {
    let catalog = &state.store.catalog;
    let n = params.n.unwrap_or(DEFAULT_SAMPLE_SIZE).min(catalog.len());

    let mut rng = StdRng::seed_from_u64(SAMPLE_SEED);
    let picks = rand::seq::index::sample(&mut rng, catalog.len(), n);

    let titles = picks
        .into_iter()
        .filter_map(|index| {
            catalog.get(index).map(|movie| TitleResponse {
                index,
                title: movie.title.clone(),
            })
        })
        .collect();
    Json(titles)
}

/// Dataset summary: entry count and which metadata fields are populated
pub async fn catalog_info(State(state): State<AppState>) -> Json<CatalogInfoResponse> {
    let catalog = &state.store.catalog;

    let mut fields = vec!["title"];
    if catalog.iter().any(|(_, m)| m.year.is_some()) {
        fields.push("year");
    }
    if catalog.iter().any(|(_, m)| m.genres.is_some()) {
        fields.push("genres");
    }
    if catalog.iter().any(|(_, m)| m.poster_url.is_some()) {
        fields.push("poster_url");
    }
    if catalog.iter().any(|(_, m)| m.imdb_id.is_some()) {
        fields.push("imdb_id");
    }

    Json(CatalogInfoResponse {
        total: catalog.len(),
        fields,
        loaded_at: state.store.loaded_at,
    })
}

/// Recommendations for a free-text query (exact match first, then fuzzy)
pub async fn recommend(
    State(state): State<AppState>,
    Query(params): Query<RecommendQuery>,
) -> AppResult<Json<RecommendationResponse>> {
    if params.q.trim().is_empty() {
        return Err(AppError::InvalidInput("query must not be empty".to_string()));
    }
    let k = validate_k(params.k)?;

    match recommender::recommend(&state.store, &params.q, state.config.fuzzy_cutoff, k) {
        Some(set) => {
            tracing::debug!(query = %params.q, matched = %set.matched_title, k, "Query resolved");
            Ok(Json(RecommendationResponse::new(params.q, set)))
        }
        None => Err(AppError::NotFound(format!(
            "no recommendations found for '{}'",
            params.q.trim()
        ))),
    }
}

/// Recommendations for a known catalog title (no fuzzy fallback)
pub async fn recommend_exact(
    State(state): State<AppState>,
    Query(params): Query<ExactRecommendQuery>,
) -> AppResult<Json<RecommendationResponse>> {
    if params.title.trim().is_empty() {
        return Err(AppError::InvalidInput("title must not be empty".to_string()));
    }
    let k = validate_k(params.k)?;

    match recommender::recommend_exact(&state.store, &params.title, k) {
        Some(set) => Ok(Json(RecommendationResponse::new(params.title, set))),
        None => Err(AppError::NotFound(format!(
            "'{}' is not in the catalog",
            params.title.trim()
        ))),
    }
}

fn validate_k(k: Option<usize>) -> AppResult<usize> {
    let k = k.unwrap_or(DEFAULT_K);
    if k == 0 {
        return Err(AppError::InvalidInput("k must be at least 1".to_string()));
    }
    Ok(k)
}
