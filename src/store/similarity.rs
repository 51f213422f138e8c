use ndarray::{Array2, ArrayView1};

use super::LoadError;

/// Dense pairwise similarity scores, row-indexed by catalog position.
///
/// Row i holds the similarity of entry i to every catalog entry, including
/// itself. Ranking always reads the row of the source entry, never the
/// column, so asymmetric score data is tolerated.
#[derive(Debug)]
pub struct SimilarityMatrix {
    scores: Array2<f32>,
}

impl SimilarityMatrix {
    /// Builds the matrix from decoded rows, rejecting ragged input.
    ///
    /// The row count defines the expected side length; every row must match
    /// it exactly.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self, LoadError> {
        let n = rows.len();
        let mut flat = Vec::with_capacity(n * n);
        for (index, row) in rows.into_iter().enumerate() {
            if row.len() != n {
                return Err(LoadError::RaggedMatrix {
                    row: index,
                    expected: n,
                    actual: row.len(),
                });
            }
            flat.extend(row);
        }
        let scores = Array2::from_shape_vec((n, n), flat)?;
        Ok(Self { scores })
    }

    /// Side length of the matrix (equals the catalog length once validated)
    pub fn len(&self) -> usize {
        self.scores.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.nrows() == 0
    }

    /// Scores of `index` against every catalog entry, including itself
    pub fn row(&self, index: usize) -> ArrayView1<'_, f32> {
        self.scores.row(index)
    }
}
