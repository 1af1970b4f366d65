//! Error types for the graph pipeline.

use thiserror::Error;

/// Errors raised while turning a corpus into a similarity graph.
#[derive(Debug, Error)]
pub enum GraphError {
    /// A document produced no tokens and was excluded from the corpus
    #[error("document produced no tokens: {0}")]
    EmptyDocument(String),

    /// Requested SVD rank is outside `1..documents`
    #[error("invalid dimension: rank {rank} must be in 1..{documents}")]
    InvalidDimension { rank: usize, documents: usize },

    /// Graph construction or configuration parameter out of range
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Two inputs that must agree in size do not
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// External text extractor failed
    #[error("text extraction failed for {path}: {reason}")]
    Extraction { path: String, reason: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Feature cache could not be encoded or decoded
    #[error("feature cache error: {0}")]
    Cache(String),

    /// Configuration file could not be parsed
    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),
}

impl From<serde_cbor::Error> for GraphError {
    fn from(err: serde_cbor::Error) -> Self {
        GraphError::Cache(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GraphError>;
