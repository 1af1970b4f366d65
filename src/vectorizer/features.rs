use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sprs::{CsMat, CsVec};

use crate::error::{GraphError, Result};
use crate::vectorizer::{term_freq::TermFrequency, vocabulary::Vocabulary};

/// How a raw count vector is scaled before TF-IDF weighting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Normalization {
    /// plain counts
    Raw,
    /// divide by the largest count in the vector
    #[default]
    Max,
    /// divide by the sum of the vector
    Sum,
}

/// Term-frequency vector of one token sequence over a fixed vocabulary
///
/// Tokens outside the vocabulary are ignored. The result always has
/// dimension `vocabulary.len()`; an all-zero vector stays zero.
pub fn compute_frequency_features<T>(
    tokens: &[T],
    vocabulary: &Vocabulary,
    normalization: Normalization,
) -> CsVec<f64>
where
    T: AsRef<str>,
{
    frequency_features(&TermFrequency::from_tokens(tokens), vocabulary, normalization)
}

/// Same as [`compute_frequency_features`] from already counted terms
pub fn frequency_features(
    freq: &TermFrequency,
    vocabulary: &Vocabulary,
    normalization: Normalization,
) -> CsVec<f64> {
    let mut pairs: Vec<(usize, f64)> = freq
        .iter()
        .filter_map(|(term, count)| vocabulary.term_index(term).map(|idx| (idx, count as f64)))
        .collect();
    pairs.sort_unstable_by_key(|&(idx, _)| idx);

    let scale: f64 = match normalization {
        Normalization::Raw => 1.0,
        Normalization::Max => pairs.iter().map(|&(_, v)| v).fold(0.0, f64::max),
        Normalization::Sum => pairs.iter().map(|&(_, v)| v).sum(),
    };

    let (indices, data): (Vec<usize>, Vec<f64>) = pairs
        .into_iter()
        .map(|(idx, v)| if scale > 0.0 { (idx, v / scale) } else { (idx, v) })
        .unzip();
    CsVec::new(vocabulary.len(), indices, data)
}

/// Stack sparse rows into a CSR document-term matrix
pub fn feature_matrix(rows: &[CsVec<f64>], cols: usize) -> Result<CsMat<f64>> {
    let nnz: usize = rows.iter().map(|row| row.nnz()).sum();
    let mut indptr = Vec::with_capacity(rows.len() + 1);
    let mut indices = Vec::with_capacity(nnz);
    let mut data = Vec::with_capacity(nnz);

    indptr.push(0usize);
    for row in rows {
        if row.dim() != cols {
            return Err(GraphError::DimensionMismatch {
                expected: cols,
                found: row.dim(),
            });
        }
        indices.extend_from_slice(row.indices());
        data.extend_from_slice(row.data());
        indptr.push(indices.len());
    }

    Ok(CsMat::new((rows.len(), cols), indptr, indices, data))
}

/// Feature extraction for every document
/// rows are computed in parallel, the vocabulary is only read
pub fn build_features(
    frequencies: &[TermFrequency],
    vocabulary: &Vocabulary,
    normalization: Normalization,
) -> Result<CsMat<f64>> {
    let rows: Vec<CsVec<f64>> = frequencies
        .par_iter()
        .map(|freq| frequency_features(freq, vocabulary, normalization))
        .collect();
    feature_matrix(&rows, vocabulary.len())
}
