//! Pipeline configuration.
//!
//! Built-in defaults, overridden by a TOML file, overridden by CLI flags.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::compute::{Embedding, TruncatedSvd};
use crate::error::{GraphError, Result};
use crate::graph::GraphPolicy;
use crate::vectorizer::Normalization;

/// Which graph construction policy to run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    #[default]
    Threshold,
    Knn,
}

/// Master configuration for one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Feature extraction settings
    #[serde(default)]
    pub features: FeatureConfig,

    /// Dimensionality reduction settings
    #[serde(default)]
    pub svd: SvdConfig,

    /// Graph construction settings
    #[serde(default)]
    pub graph: GraphConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureConfig {
    #[serde(default)]
    pub normalization: Normalization,
}

/// Truncated SVD configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SvdConfig {
    /// Off: distances are measured on the sparse TF-IDF rows
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Target rank k
    #[serde(default = "default_reduced_dimensions")]
    pub reduced_dimensions: usize,

    #[serde(default)]
    pub embedding: Embedding,

    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for SvdConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            reduced_dimensions: default_reduced_dimensions(),
            embedding: Embedding::default(),
            max_iterations: default_max_iterations(),
            tolerance: default_tolerance(),
            seed: default_seed(),
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_reduced_dimensions() -> usize {
    100
}
fn default_max_iterations() -> usize {
    300
}
fn default_tolerance() -> f64 {
    1e-10
}
fn default_seed() -> u64 {
    0x5eed
}

/// Graph construction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphConfig {
    #[serde(default)]
    pub policy: PolicyKind,

    /// Minimum similarity for a threshold edge (strictly greater)
    #[serde(default = "default_weight_threshold")]
    pub weight_threshold: f64,

    /// Neighbors per node for k-NN
    #[serde(default = "default_knn_k")]
    pub knn_k: usize,

    /// Drop one direction of every reciprocal edge pair
    #[serde(default = "default_true")]
    pub symmetrize: bool,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            policy: PolicyKind::default(),
            weight_threshold: default_weight_threshold(),
            knn_k: default_knn_k(),
            symmetrize: default_true(),
        }
    }
}

fn default_weight_threshold() -> f64 {
    0.75
}
fn default_knn_k() -> usize {
    5
}

/// Command-line values layered over a loaded config; `None` keeps the file's value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub policy: Option<PolicyKind>,
    pub weight_threshold: Option<f64>,
    pub knn_k: Option<usize>,
    pub reduced_dimensions: Option<usize>,
    pub disable_svd: bool,
    pub embedding: Option<Embedding>,
}

impl ConfigOverrides {
    pub fn apply(&self, config: &mut PipelineConfig) {
        if let Some(policy) = self.policy {
            config.graph.policy = policy;
        }
        if let Some(threshold) = self.weight_threshold {
            config.graph.weight_threshold = threshold;
        }
        if let Some(k) = self.knn_k {
            config.graph.knn_k = k;
        }
        if let Some(dims) = self.reduced_dimensions {
            config.svd.reduced_dimensions = dims;
        }
        if self.disable_svd {
            config.svd.enabled = false;
        }
        if let Some(embedding) = self.embedding {
            config.svd.embedding = embedding;
        }
    }
}

impl PipelineConfig {
    /// Built-in defaults, then the TOML file if any, then `overrides`
    pub fn resolve<P: AsRef<Path>>(path: Option<P>, overrides: &ConfigOverrides) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        overrides.apply(&mut config);
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Rank to reduce to, `None` when SVD is switched off
    pub fn reduced_dimensions(&self) -> Option<usize> {
        self.svd.enabled.then_some(self.svd.reduced_dimensions)
    }

    pub fn graph_policy(&self) -> GraphPolicy {
        match self.graph.policy {
            PolicyKind::Threshold => GraphPolicy::Threshold(self.graph.weight_threshold),
            PolicyKind::Knn => GraphPolicy::Knn(self.graph.knn_k),
        }
    }

    /// SVD stage as configured, `None` when disabled
    pub fn truncated_svd(&self) -> Option<TruncatedSvd> {
        self.reduced_dimensions().map(|rank| {
            TruncatedSvd::new(rank)
                .with_embedding(self.svd.embedding)
                .with_max_iterations(self.svd.max_iterations)
                .with_tolerance(self.svd.tolerance)
                .with_seed(self.svd.seed)
        })
    }

    /// Corpus-independent checks; size-dependent ones run in the pipeline
    pub fn validate(&self) -> Result<()> {
        if !self.graph.weight_threshold.is_finite() {
            return Err(GraphError::InvalidParameter(format!(
                "weight_threshold must be finite, got {}",
                self.graph.weight_threshold
            )));
        }
        if self.graph.policy == PolicyKind::Knn && self.graph.knn_k == 0 {
            return Err(GraphError::InvalidParameter("knn_k must be positive".to_string()));
        }
        if self.svd.enabled && self.svd.reduced_dimensions == 0 {
            return Err(GraphError::InvalidParameter(
                "reduced_dimensions must be positive".to_string(),
            ));
        }
        if self.svd.tolerance.is_nan() || self.svd.tolerance < 0.0 {
            return Err(GraphError::InvalidParameter(format!(
                "svd tolerance must be non-negative, got {}",
                self.svd.tolerance
            )));
        }
        Ok(())
    }
}
