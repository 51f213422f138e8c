use axum::{middleware, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::request_id::{make_span_with_request_id, set_request_id};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(set_request_id))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        );

    if state.config.permissive_cors {
        router = router.layer(CorsLayer::permissive());
    }

    router.with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/movies", get(handlers::list_movies))
        .route("/movies/search", get(handlers::search_movies))
        .route("/movies/sample", get(handlers::sample_movies))
        .route("/catalog", get(handlers::catalog_info))
        .route("/recommendations", get(handlers::recommend))
        .route("/recommendations/exact", get(handlers::recommend_exact))
}
