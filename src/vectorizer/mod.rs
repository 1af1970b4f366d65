//! Vocabulary, term frequency and TF-IDF weighting.
//!
//! The document-term matrix is a CSR `sprs::CsMat<f64>`: one row per
//! document, one column per vocabulary term, in vocabulary order.

pub mod features;
pub mod term_freq;
pub mod tfidf;
pub mod vocabulary;

pub use features::{build_features, compute_frequency_features, feature_matrix, frequency_features, Normalization};
pub use term_freq::TermFrequency;
pub use tfidf::{compute_tfidf, compute_tfidf_with, document_frequencies, DefaultTFIDFEngine, TFIDFEngine};
pub use vocabulary::Vocabulary;
