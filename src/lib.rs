/// This crate turns a document corpus into a weighted similarity graph:
/// TF-IDF features, truncated SVD, cosine distance, threshold or k-NN
/// graph, Pajek output.
pub mod compute;
pub mod config;
pub mod corpus;
pub mod error;
pub mod graph;
pub mod persist;
pub mod pipeline;
pub mod utils;
pub mod vectorizer;

/// Pipeline
/// Runs every stage over a [`Corpus`] with one [`PipelineConfig`].
/// - features and TF-IDF weighting (sparse, CSR)
/// - optional rank-k truncated SVD
/// - pairwise cosine distance
/// - threshold or k-NN graph, then symmetrization
///
/// Size-dependent parameters (`k`, SVD rank) are checked before any
/// matrix is built, so a failed run never leaves a partial graph file.
pub use pipeline::{Pipeline, PipelineOutput};

/// Pipeline configuration
/// Serde structs with built-in defaults, loadable from TOML.
pub use config::{ConfigOverrides, PipelineConfig, PolicyKind};

/// Corpus
/// Documents that survived extraction, their term counts and the shared
/// vocabulary. Row `i` of every matrix and node `i` of the graph is
/// `labels[i]`.
///
/// `CorpusBuilder` extracts documents in parallel and merges them
/// sequentially in input order, so the vocabulary's term order does not
/// depend on thread scheduling.
pub use corpus::{Corpus, CorpusBuilder, PdfToText, PlainText, Stoplist, TextExtractor};

/// Vocabulary and term frequency
/// The vocabulary is built once and only read afterwards; every feature
/// vector is indexed by its term order.
pub use vectorizer::{Normalization, TermFrequency, Vocabulary};

/// TF IDF Calculation Engine Trait
/// `IDF(t) = log2(N / (1 + df(t)))` in [`DefaultTFIDFEngine`]; implement
/// the trait to plug in a different weighting.
pub use vectorizer::tfidf::{DefaultTFIDFEngine, TFIDFEngine};

/// Truncated SVD and cosine distance
pub use compute::{DistanceMatrix, Embedding, TruncatedSvd};

/// Graph, construction policies and the Pajek writer
pub use graph::{Graph, GraphPolicy};

/// Feature cache (CBOR)
pub use persist::FeatureCache;

pub use error::{GraphError, Result};
