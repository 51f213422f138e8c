use crate::models::Movie;

/// Ordered, immutable movie catalog.
///
/// Index i is stable for the lifetime of the process and matches row/column i
/// of the similarity matrix. The lowercased title projection is computed once
/// at construction; all title lookups run against it.
#[derive(Debug)]
pub struct Catalog {
    movies: Vec<Movie>,
    titles_lower: Vec<String>,
}

impl Catalog {
    pub fn new(movies: Vec<Movie>) -> Self {
        let titles_lower = movies.iter().map(|m| m.title.to_lowercase()).collect();
        Self {
            movies,
            titles_lower,
        }
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Movie> {
        self.movies.get(index)
    }

    /// Iterates entries as (index, movie) in catalog order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Movie)> {
        self.movies.iter().enumerate()
    }

    /// Lowercased titles, index-aligned with the catalog
    pub fn titles_lower(&self) -> &[String] {
        &self.titles_lower
    }

    /// First index whose lowercased title equals `title_lower`.
    ///
    /// Duplicate titles resolve to the lowest index.
    pub fn position_of_lower(&self, title_lower: &str) -> Option<usize> {
        self.titles_lower.iter().position(|t| t == title_lower)
    }
}
