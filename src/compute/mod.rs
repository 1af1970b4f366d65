//! Dimensionality reduction and pairwise distances.

pub mod distance;
pub mod svd;

pub use distance::{cosine_distance, pairwise_cosine_distance, pairwise_cosine_distance_sparse, DistanceMatrix};
pub use svd::{reduce, Embedding, SvdResult, TruncatedSvd};
