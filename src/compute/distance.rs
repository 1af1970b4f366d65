use ndarray::{Array1, Array2, ArrayView2, Axis};
use num::Float;
use rayon::prelude::*;
use sprs::{CsMat, CsVecView};

use crate::utils::sparse::{norm, row_dot};

/// Symmetric pairwise cosine distances, zero diagonal, values in [0, 2]
///
/// Read-only once computed.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix(Array2<f64>);

impl DistanceMatrix {
    /// Number of documents
    pub fn len(&self) -> usize {
        self.0.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.0.nrows() == 0
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.0[[i, j]]
    }

    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.0.view()
    }

    /// `1 - distance`, the edge weight used by the graph builders
    pub fn similarity(&self) -> Array2<f64> {
        self.0.mapv(|d| 1.0 - d)
    }
}

/// Cosine distance from a dot product and the two norms
///
/// A zero-norm side is maximally dissimilar (1.0) instead of NaN.
#[inline]
pub fn cosine_distance_from_parts<N: Float>(dot: N, norm_a: N, norm_b: N) -> N {
    if norm_a == N::zero() || norm_b == N::zero() {
        return N::one();
    }
    let two = N::one() + N::one();
    (N::one() - dot / (norm_a * norm_b)).max(N::zero()).min(two)
}

/// Cosine distance between two dense vectors
pub fn cosine_distance<N: Float>(a: &[N], b: &[N]) -> N {
    debug_assert_eq!(a.len(), b.len());
    let dot = a.iter().zip(b).fold(N::zero(), |acc, (&x, &y)| acc + x * y);
    cosine_distance_from_parts(dot, norm(a), norm(b))
}

/// Pairwise cosine distance between the rows of a dense embedding
pub fn pairwise_cosine_distance(matrix: ArrayView2<f64>) -> DistanceMatrix {
    let norms: Array1<f64> = matrix.map_axis(Axis(1), |row| row.dot(&row).sqrt());
    let n = matrix.nrows();
    let upper: Vec<Vec<f64>> = (0..n)
        .into_par_iter()
        .map(|i| {
            ((i + 1)..n)
                .map(|j| {
                    let dot = matrix.row(i).dot(&matrix.row(j));
                    cosine_distance_from_parts(dot, norms[i], norms[j])
                })
                .collect()
        })
        .collect();
    DistanceMatrix(mirror(n, upper))
}

/// Pairwise cosine distance between the rows of a sparse matrix (no reduction)
pub fn pairwise_cosine_distance_sparse(matrix: &CsMat<f64>) -> DistanceMatrix {
    let csr_owned;
    let csr = if matrix.is_csr() {
        matrix
    } else {
        csr_owned = matrix.to_csr();
        &csr_owned
    };
    let rows: Vec<CsVecView<f64>> = csr.outer_iterator().collect();
    let norms: Vec<f64> = rows.iter().map(|row| norm(row.data())).collect();
    let n = rows.len();
    let upper: Vec<Vec<f64>> = (0..n)
        .into_par_iter()
        .map(|i| {
            ((i + 1)..n)
                .map(|j| cosine_distance_from_parts(row_dot(&rows[i], &rows[j]), norms[i], norms[j]))
                .collect()
        })
        .collect();
    DistanceMatrix(mirror(n, upper))
}

/// Fill both triangles from the strict upper one
fn mirror(n: usize, upper: Vec<Vec<f64>>) -> Array2<f64> {
    let mut full = Array2::<f64>::zeros((n, n));
    for (i, values) in upper.into_iter().enumerate() {
        for (offset, d) in values.into_iter().enumerate() {
            let j = i + 1 + offset;
            full[[i, j]] = d;
            full[[j, i]] = d;
        }
    }
    full
}
