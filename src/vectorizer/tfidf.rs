use sprs::{CsMat, CsMatView};

use crate::error::{GraphError, Result};
use crate::vectorizer::vocabulary::Vocabulary;

/// IDF calculation strategy
///
/// Plug a different weighting into [`compute_tfidf_with`] by implementing
/// this trait. [`DefaultTFIDFEngine`] is the smoothed base-2 form.
pub trait TFIDFEngine {
    /// IDF of a term found in `doc_freq` of `doc_num` documents
    fn idf(doc_num: usize, doc_freq: usize) -> f64;

    /// IDFベクトルを生成する
    fn idf_vec(doc_num: usize, doc_freqs: &[usize]) -> Vec<f64> {
        doc_freqs.iter().map(|&df| Self::idf(doc_num, df)).collect()
    }
}

/// `log2(N / (1 + df))`
///
/// A term present in every document gets `log2(N / (N + 1))`, which is
/// slightly negative. An empty corpus gives 0 for every term.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTFIDFEngine;

impl TFIDFEngine for DefaultTFIDFEngine {
    #[inline]
    fn idf(doc_num: usize, doc_freq: usize) -> f64 {
        if doc_num == 0 {
            return 0.0;
        }
        (doc_num as f64 / (1.0 + doc_freq as f64)).log2()
    }
}

/// Number of rows with a nonzero entry, per column
pub fn document_frequencies(matrix: CsMatView<f64>) -> Vec<usize> {
    let cols = matrix.cols();
    if matrix.is_csr() {
        let mut df = vec![0usize; cols];
        for row in matrix.outer_iterator() {
            for (col, &val) in row.iter() {
                if val != 0.0 {
                    df[col] += 1;
                }
            }
        }
        df
    } else {
        debug_assert_eq!(matrix.outer_dims(), cols);
        matrix
            .outer_iterator()
            .map(|column| column.iter().filter(|(_, val)| **val != 0.0).count())
            .collect()
    }
}

/// TF-IDF weighting with the default engine
///
/// `vocabulary` must be the one the matrix columns were built from.
pub fn compute_tfidf(tf: &CsMat<f64>, vocabulary: &Vocabulary) -> Result<CsMat<f64>> {
    compute_tfidf_with::<DefaultTFIDFEngine>(tf, vocabulary)
}

/// TF-IDF weighting as `tf * diag(idf)`
pub fn compute_tfidf_with<E: TFIDFEngine>(tf: &CsMat<f64>, vocabulary: &Vocabulary) -> Result<CsMat<f64>> {
    let (doc_num, cols) = tf.shape();
    if cols != vocabulary.len() {
        return Err(GraphError::DimensionMismatch {
            expected: vocabulary.len(),
            found: cols,
        });
    }

    let idf = E::idf_vec(doc_num, &document_frequencies(tf.view()));
    let diag_indptr: Vec<usize> = (0..=cols).collect();
    let diag_indices: Vec<usize> = (0..cols).collect();
    // same storage as the input so the product keeps its layout
    let diag = if tf.is_csr() {
        CsMat::new((cols, cols), diag_indptr, diag_indices, idf)
    } else {
        CsMat::new_csc((cols, cols), diag_indptr, diag_indices, idf)
    };

    Ok(tf * &diag)
}
