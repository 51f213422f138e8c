use std::cmp::Ordering;

use crate::models::Movie;
use crate::store::Store;

use super::resolver::{self, Resolution};

/// How a query was matched to its catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    Fuzzy,
}

/// A recommended catalog entry with its similarity to the source
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredMovie {
    pub index: usize,
    pub movie: Movie,
    pub score: f32,
}

/// A successful resolve-and-rank outcome
#[derive(Debug, Clone)]
pub struct RecommendationSet {
    pub source_index: usize,
    pub matched_title: String,
    pub match_kind: MatchKind,
    /// Fuzzy match ratio; absent on exact matches
    pub match_score: Option<f64>,
    pub items: Vec<ScoredMovie>,
}

/// Ranks every other catalog entry against `source_index`.
///
/// Reads only row `source_index` of the matrix. The stable descending sort
/// over the index-ascending enumeration breaks score ties by lowest index.
/// The source entry is excluded by identity rather than by dropping the top
/// rank, so asymmetric or malformed score data never leaks the source into
/// its own recommendations. Output length is min(k, N - 1).
pub fn rank(store: &Store, source_index: usize, k: usize) -> Vec<(usize, f32)> {
    let mut scored: Vec<(usize, f32)> = store
        .similarity
        .row(source_index)
        .iter()
        .copied()
        .enumerate()
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    scored.retain(|(index, _)| *index != source_index);
    scored.truncate(k);
    scored
}

/// Full recommendation path: fuzzy-enabled resolution, then ranking.
///
/// Returns `None` when the query resolves to nothing; both steps are pure
/// functions of their inputs.
pub fn recommend(store: &Store, query: &str, cutoff: f64, k: usize) -> Option<RecommendationSet> {
    let (source_index, match_kind, match_score) =
        match resolver::resolve(query, &store.catalog, cutoff) {
            Resolution::Exact(index) => (index, MatchKind::Exact, None),
            Resolution::Fuzzy { index, score } => (index, MatchKind::Fuzzy, Some(score)),
            Resolution::NotFound => return None,
        };
    Some(build_set(store, source_index, match_kind, match_score, k))
}

/// Selectbox path: the caller already holds a catalog title, so only the
/// exact (normalized) lookup applies. No fuzzy fallback.
pub fn recommend_exact(store: &Store, title: &str, k: usize) -> Option<RecommendationSet> {
    let needle = resolver::normalize(title);
    let source_index = store.catalog.position_of_lower(&needle)?;
    Some(build_set(store, source_index, MatchKind::Exact, None, k))
}

fn build_set(
    store: &Store,
    source_index: usize,
    match_kind: MatchKind,
    match_score: Option<f64>,
    k: usize,
) -> RecommendationSet {
    let items = rank(store, source_index, k)
        .into_iter()
        .filter_map(|(index, score)| {
            store.catalog.get(index).map(|movie| ScoredMovie {
                index,
                movie: movie.clone(),
                score,
            })
        })
        .collect();

    let matched_title = store
        .catalog
        .get(source_index)
        .map(|m| m.title.clone())
        .unwrap_or_default();

    RecommendationSet {
        source_index,
        matched_title,
        match_kind,
        match_score,
        items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Utc;

    use crate::store::{Catalog, SimilarityMatrix};

    const CUTOFF: f64 = 0.45;

    fn store(titles: &[&str], rows: Vec<Vec<f32>>) -> Store {
        Store {
            catalog: Catalog::new(titles.iter().copied().map(Movie::new).collect()),
            similarity: SimilarityMatrix::from_rows(rows).unwrap(),
            loaded_at: Utc::now(),
        }
    }

    fn reference_store() -> Store {
        // Row for A carries a tie between B and D at 0.9.
        store(
            &["A", "B", "C", "D"],
            vec![
                vec![1.0, 0.9, 0.5, 0.9],
                vec![0.9, 1.0, 0.3, 0.2],
                vec![0.5, 0.3, 1.0, 0.1],
                vec![0.9, 0.2, 0.1, 1.0],
            ],
        )
    }

    #[test]
    fn test_rank_ties_break_to_lowest_index() {
        let store = reference_store();
        assert_eq!(rank(&store, 0, 2), vec![(1, 0.9), (3, 0.9)]);
    }

    #[test]
    fn test_rank_never_includes_source() {
        let store = reference_store();
        for source in 0..4 {
            for k in 1..=4 {
                assert!(rank(&store, source, k).iter().all(|(i, _)| *i != source));
            }
        }
    }

    #[test]
    fn test_rank_excludes_source_by_identity_not_position() {
        // Malformed row: the source scores below another entry, so it does
        // not sit at rank 0. It must still be excluded.
        let store = store(
            &["A", "B", "C"],
            vec![
                vec![0.2, 0.9, 0.5],
                vec![0.9, 1.0, 0.3],
                vec![0.5, 0.3, 1.0],
            ],
        );
        assert_eq!(rank(&store, 0, 3), vec![(1, 0.9), (2, 0.5)]);
    }

    #[test]
    fn test_rank_length_is_min_of_k_and_rest() {
        let store = reference_store();
        assert_eq!(rank(&store, 0, 2).len(), 2);
        assert_eq!(rank(&store, 0, 10).len(), 3);
    }

    #[test]
    fn test_rank_is_sorted_descending() {
        let store = reference_store();
        let ranked = rank(&store, 2, 3);
        for pair in ranked.windows(2) {
            assert!(pair[0].1 >= pair[1].1);
        }
    }

    #[test]
    fn test_single_entry_catalog_yields_empty_result() {
        let store = store(&["A"], vec![vec![1.0]]);
        let set = recommend(&store, "A", CUTOFF, 5).unwrap();
        assert_eq!(set.source_index, 0);
        assert!(set.items.is_empty());
    }

    #[test]
    fn test_recommend_reference_example() {
        let store = reference_store();
        let set = recommend(&store, "A", CUTOFF, 2).unwrap();
        assert_eq!(set.matched_title, "A");
        assert_eq!(set.match_kind, MatchKind::Exact);
        let titles: Vec<&str> = set.items.iter().map(|s| s.movie.title.as_str()).collect();
        assert_eq!(titles, vec!["B", "D"]);
    }

    #[test]
    fn test_recommend_fuzzy_query() {
        let store = store(
            &["Avatar", "Inception", "The Matrix"],
            vec![
                vec![1.0, 0.7, 0.2],
                vec![0.7, 1.0, 0.4],
                vec![0.2, 0.4, 1.0],
            ],
        );
        let set = recommend(&store, "avatr", CUTOFF, 2).unwrap();
        assert_eq!(set.matched_title, "Avatar");
        assert_eq!(set.match_kind, MatchKind::Fuzzy);
        assert!(set.match_score.unwrap() >= CUTOFF);
        assert_eq!(set.items[0].movie.title, "Inception");
    }

    #[test]
    fn test_recommend_not_found() {
        let store = reference_store();
        assert!(recommend(&store, "zzzznotarealmovie", CUTOFF, 2).is_none());
    }

    #[test]
    fn test_recommend_exact_requires_verbatim_title() {
        let store = store(
            &["Avatar", "Inception"],
            vec![vec![1.0, 0.7], vec![0.7, 1.0]],
        );
        assert!(recommend_exact(&store, "Avatar", 1).is_some());
        assert!(recommend_exact(&store, "  AVATAR ", 1).is_some());
        assert!(recommend_exact(&store, "avatr", 1).is_none());
    }

    #[test]
    fn test_recommend_is_idempotent() {
        let store = reference_store();
        let first = recommend(&store, "A", CUTOFF, 3).unwrap();
        let second = recommend(&store, "A", CUTOFF, 3).unwrap();
        assert_eq!(first.items, second.items);
        assert_eq!(first.source_index, second.source_index);
    }

    #[test]
    fn test_rank_tolerates_nan_scores() {
        let store = store(
            &["A", "B", "C"],
            vec![
                vec![1.0, f32::NAN, 0.5],
                vec![0.9, 1.0, 0.3],
                vec![0.5, 0.3, 1.0],
            ],
        );
        let ranked = rank(&store, 0, 3);
        assert_eq!(ranked.len(), 2);
        assert!(ranked.iter().all(|(i, _)| *i != 0));
    }
}
