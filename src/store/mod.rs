use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::models::Movie;

pub mod catalog;
pub mod similarity;

pub use catalog::Catalog;
pub use similarity::SimilarityMatrix;

/// Errors raised while loading the recommendation artifacts
///
/// All of these are fatal: the service has no degraded mode without a
/// catalog and a similarity matrix that agree on shape.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("similarity row {row} has {actual} columns, expected {expected}")]
    RaggedMatrix {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("similarity matrix construction failed: {0}")]
    Matrix(#[from] ndarray::ShapeError),

    #[error("similarity matrix is {matrix}x{matrix} but the catalog has {catalog} entries")]
    ShapeMismatch { matrix: usize, catalog: usize },
}

/// Read-only recommendation data, loaded once at startup and shared across
/// all requests for the lifetime of the process.
#[derive(Debug)]
pub struct Store {
    pub catalog: Catalog,
    pub similarity: SimilarityMatrix,
    pub loaded_at: DateTime<Utc>,
}

impl Store {
    /// Loads and validates the catalog and similarity artifacts.
    ///
    /// The catalog is a JSON array of movie records; the matrix is a JSON
    /// nested numeric array. The matrix must be square with side length equal
    /// to the catalog length.
    pub fn load(catalog_path: &Path, similarity_path: &Path) -> Result<Self, LoadError> {
        let movies: Vec<Movie> = read_json(catalog_path)?;
        let rows: Vec<Vec<f32>> = read_json(similarity_path)?;

        let catalog = Catalog::new(movies);
        let similarity = SimilarityMatrix::from_rows(rows)?;

        if similarity.len() != catalog.len() {
            return Err(LoadError::ShapeMismatch {
                matrix: similarity.len(),
                catalog: catalog.len(),
            });
        }

        Ok(Self {
            catalog,
            similarity,
            loaded_at: Utc::now(),
        })
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| LoadError::Decode {
        path: path.to_path_buf(),
        source,
    })
}
