//! Truncated SVD of a sparse document-term matrix.
//!
//! The left singular vectors of `A` (documents × terms) are the
//! eigenvectors of the Gram matrix `A·Aᵀ` (documents × documents), and the
//! singular values are the square roots of its eigenvalues. The Gram matrix
//! is built from sparse row dot products, then its top `k` eigenpairs are
//! found by subspace iteration with a final Rayleigh-Ritz step.

use ndarray::{Array1, Array2, Axis};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sprs::{CsMat, CsVecView};
use tracing::{debug, warn};

use crate::error::{GraphError, Result};
use crate::utils::sparse::row_dot;

/// What [`TruncatedSvd::reduce`] returns for each document
///
/// The two are not interchangeable for cosine distance: `Scores` multiplies
/// component `j` of every row by `σ_j`, which changes the angle between rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Embedding {
    /// `U`, the left singular vectors
    #[default]
    Left,
    /// `U·Σ`
    Scores,
}

#[derive(Debug, Clone)]
pub struct SvdResult {
    /// documents × k, columns orthonormal
    pub u: Array2<f64>,
    /// descending
    pub singular_values: Array1<f64>,
    /// subspace iterations used
    pub iterations: usize,
    /// Ritz values settled within tolerance before the iteration cap
    pub converged: bool,
}

/// Rank-k truncated SVD
#[derive(Debug, Clone)]
pub struct TruncatedSvd {
    pub rank: usize,
    pub embedding: Embedding,
    pub max_iterations: usize,
    pub tolerance: f64,
    pub seed: u64,
}

impl TruncatedSvd {
    pub fn new(rank: usize) -> Self {
        Self {
            rank,
            embedding: Embedding::Left,
            max_iterations: 300,
            tolerance: 1e-10,
            seed: 0x5eed,
        }
    }

    pub fn with_embedding(mut self, embedding: Embedding) -> Self {
        self.embedding = embedding;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Reduced embedding, documents × k
    pub fn reduce(&self, matrix: &CsMat<f64>) -> Result<Array2<f64>> {
        let svd = self.decompose(matrix)?;
        Ok(match self.embedding {
            Embedding::Left => svd.u,
            Embedding::Scores => &svd.u * &svd.singular_values,
        })
    }

    /// Top `rank` singular triplets (left side only)
    ///
    /// Fails with `InvalidDimension` unless `0 < rank < documents`.
    pub fn decompose(&self, matrix: &CsMat<f64>) -> Result<SvdResult> {
        let n = matrix.rows();
        let k = self.rank;
        if k == 0 || k >= n {
            return Err(GraphError::InvalidDimension { rank: k, documents: n });
        }

        let gram = gram_matrix(matrix);
        let mut rng = StdRng::seed_from_u64(self.seed);

        let mut q = Array2::from_shape_fn((n, k), |_| rng.random::<f64>() - 0.5);
        orthonormalize(&mut q, &mut rng);
        let mut gq = gram.dot(&q);
        let mut ritz = Array1::<f64>::zeros(k);
        let mut iterations = 0;
        let mut converged = false;

        for iteration in 1..=self.max_iterations {
            iterations = iteration;
            let mut z = gq;
            orthonormalize(&mut z, &mut rng);
            q = z;
            gq = gram.dot(&q);

            let next = (&q * &gq).sum_axis(Axis(0));
            let delta = next
                .iter()
                .zip(ritz.iter())
                .fold(0.0f64, |m, (a, b)| m.max((a - b).abs()));
            let scale = next.iter().fold(1.0f64, |m, v| m.max(v.abs()));
            ritz = next;
            if delta <= self.tolerance * scale {
                converged = true;
                break;
            }
        }
        if converged {
            debug!(iterations, rank = k, documents = n, "subspace iteration converged");
        } else {
            warn!(
                iterations,
                tolerance = self.tolerance,
                rank = k,
                documents = n,
                "subspace iteration hit the iteration cap before converging"
            );
        }

        // Rayleigh-Ritz: rotate the converged basis onto eigenvectors
        let h = q.t().dot(&gq);
        let h = (&h + &h.t()) * 0.5;
        let (eigenvalues, rotation) = jacobi_eigen(h);
        let basis = q.dot(&rotation);

        let mut order: Vec<usize> = (0..k).collect();
        order.sort_by(|&a, &b| eigenvalues[b].total_cmp(&eigenvalues[a]).then(a.cmp(&b)));

        let mut u = Array2::<f64>::zeros((n, k));
        let mut singular_values = Array1::<f64>::zeros(k);
        for (dst, &src) in order.iter().enumerate() {
            let mut column = basis.column(src).to_owned();
            // sign: largest-magnitude component positive
            let pivot = column
                .iter()
                .copied()
                .fold(0.0f64, |best, v| if v.abs() > best.abs() { v } else { best });
            if pivot < 0.0 {
                column.mapv_inplace(|v| -v);
            }
            u.column_mut(dst).assign(&column);
            singular_values[dst] = eigenvalues[src].max(0.0).sqrt();
        }

        Ok(SvdResult {
            u,
            singular_values,
            iterations,
            converged,
        })
    }
}

/// Default rank-k reduction: plain `U`
pub fn reduce(matrix: &CsMat<f64>, k: usize) -> Result<Array2<f64>> {
    TruncatedSvd::new(k).reduce(matrix)
}

/// `A·Aᵀ` from sparse rows
fn gram_matrix(matrix: &CsMat<f64>) -> Array2<f64> {
    let csr_owned;
    let csr = if matrix.is_csr() {
        matrix
    } else {
        csr_owned = matrix.to_csr();
        &csr_owned
    };
    let rows: Vec<CsVecView<f64>> = csr.outer_iterator().collect();
    let n = rows.len();

    let upper: Vec<Vec<f64>> = (0..n)
        .into_par_iter()
        .map(|i| (i..n).map(|j| row_dot(&rows[i], &rows[j])).collect())
        .collect();

    let mut gram = Array2::<f64>::zeros((n, n));
    for (i, values) in upper.into_iter().enumerate() {
        for (offset, v) in values.into_iter().enumerate() {
            let j = i + offset;
            gram[[i, j]] = v;
            gram[[j, i]] = v;
        }
    }
    gram
}

/// Modified Gram-Schmidt on the columns
/// a column that collapses into the span of the previous ones is redrawn
fn orthonormalize(m: &mut Array2<f64>, rng: &mut StdRng) {
    let k = m.ncols();
    for j in 0..k {
        for _ in 0..4 {
            for p in 0..j {
                let prev = m.column(p).to_owned();
                let proj = prev.dot(&m.column(j));
                m.column_mut(j).scaled_add(-proj, &prev);
            }
            let norm = m.column(j).dot(&m.column(j)).sqrt();
            if norm > 1e-12 {
                m.column_mut(j).mapv_inplace(|v| v / norm);
                break;
            }
            m.column_mut(j).mapv_inplace(|_| rng.random::<f64>() - 0.5);
        }
    }
}

/// Cyclic Jacobi eigen-decomposition of a small symmetric matrix
/// returns (eigenvalues, eigenvectors as columns)
fn jacobi_eigen(mut a: Array2<f64>) -> (Array1<f64>, Array2<f64>) {
    let n = a.nrows();
    let mut v = Array2::<f64>::eye(n);

    for _sweep in 0..100 {
        let mut off = 0.0;
        for p in 0..n {
            for q in (p + 1)..n {
                off += a[[p, q]] * a[[p, q]];
            }
        }
        if off < 1e-24 {
            break;
        }

        for p in 0..n {
            for q in (p + 1)..n {
                let apq = a[[p, q]];
                if apq.abs() < 1e-300 {
                    continue;
                }
                let theta = (a[[q, q]] - a[[p, p]]) / (2.0 * apq);
                let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                for r in 0..n {
                    let arp = a[[r, p]];
                    let arq = a[[r, q]];
                    a[[r, p]] = c * arp - s * arq;
                    a[[r, q]] = s * arp + c * arq;
                }
                for r in 0..n {
                    let apr = a[[p, r]];
                    let aqr = a[[q, r]];
                    a[[p, r]] = c * apr - s * aqr;
                    a[[q, r]] = s * apr + c * aqr;
                }
                for r in 0..n {
                    let vrp = v[[r, p]];
                    let vrq = v[[r, q]];
                    v[[r, p]] = c * vrp - s * vrq;
                    v[[r, q]] = s * vrp + c * vrq;
                }
            }
        }
    }

    (a.diag().to_owned(), v)
}
