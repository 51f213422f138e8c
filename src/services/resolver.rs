use strsim::normalized_levenshtein;

use crate::store::Catalog;

/// Outcome of resolving a free-text query against the catalog
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Case-insensitive exact title match
    Exact(usize),
    /// Closest fuzzy candidate at or above the configured cutoff
    Fuzzy { index: usize, score: f64 },
    /// Nothing matched; the caller renders a "no match" outcome
    NotFound,
}

impl Resolution {
    pub fn index(&self) -> Option<usize> {
        match self {
            Resolution::Exact(index) => Some(*index),
            Resolution::Fuzzy { index, .. } => Some(*index),
            Resolution::NotFound => None,
        }
    }
}

/// Trims and lowercases a query the same way catalog titles are indexed
pub fn normalize(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Resolves `query` to a catalog index.
///
/// Exact match wins first: the lowest index whose lowercased title equals
/// the normalized query. Otherwise the single best fuzzy candidate is
/// accepted when its ratio clears `cutoff`; ratio ties break to the lowest
/// index. The accepted candidate is mapped back through an exact lookup of
/// its title, so duplicate titles collapse to the lowest index as well.
pub fn resolve(query: &str, catalog: &Catalog, cutoff: f64) -> Resolution {
    let needle = normalize(query);
    if needle.is_empty() {
        return Resolution::NotFound;
    }

    if let Some(index) = catalog.position_of_lower(&needle) {
        return Resolution::Exact(index);
    }

    match best_candidate(&needle, catalog) {
        Some((index, score)) if score >= cutoff => {
            let canonical = catalog
                .position_of_lower(&catalog.titles_lower()[index])
                .unwrap_or(index);
            Resolution::Fuzzy {
                index: canonical,
                score,
            }
        }
        _ => Resolution::NotFound,
    }
}

/// N-best fuzzy candidates at or above `cutoff`, best first.
///
/// An exact match short-circuits to that single entry with score 1.0. Ties
/// keep catalog order, so equal-ratio candidates come back lowest index
/// first.
pub fn search(query: &str, catalog: &Catalog, cutoff: f64, limit: usize) -> Vec<(usize, f64)> {
    let needle = normalize(query);
    if needle.is_empty() || limit == 0 {
        return Vec::new();
    }

    if let Some(index) = catalog.position_of_lower(&needle) {
        return vec![(index, 1.0)];
    }

    let mut scored: Vec<(usize, f64)> = catalog
        .titles_lower()
        .iter()
        .enumerate()
        .map(|(index, title)| (index, normalized_levenshtein(&needle, title)))
        .filter(|(_, score)| *score >= cutoff)
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(limit);
    scored
}

/// Best single fuzzy candidate over all lowercased titles.
///
/// Strictly-greater comparison keeps the lowest index on ratio ties.
fn best_candidate(needle: &str, catalog: &Catalog) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (index, title) in catalog.titles_lower().iter().enumerate() {
        let score = normalized_levenshtein(needle, title);
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((index, score));
        }
    }
    best
}
