//! Feature cache on disk.
//!
//! Saves what extraction produced (labels, per-document term counts and
//! the vocabulary) so a later run can skip the text extractor.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::corpus::Corpus;
use crate::error::{GraphError, Result};
use crate::vectorizer::{TermFrequency, Vocabulary};

const CACHE_VERSION: u32 = 1;

/// Serializable form of a [`Corpus`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureCache {
    pub version: u32,
    pub labels: Vec<String>,
    pub frequencies: Vec<TermFrequency>,
    pub vocabulary: Vocabulary,
    #[serde(default)]
    pub excluded: Vec<String>,
}

impl FeatureCache {
    pub fn from_corpus(corpus: &Corpus) -> Self {
        Self {
            version: CACHE_VERSION,
            labels: corpus.labels.clone(),
            frequencies: corpus.frequencies.clone(),
            vocabulary: corpus.vocabulary.clone(),
            excluded: corpus.excluded.clone(),
        }
    }

    /// Back into a corpus, checking that rows and vocabulary still agree
    pub fn into_corpus(self) -> Result<Corpus> {
        if self.version != CACHE_VERSION {
            return Err(GraphError::Cache(format!(
                "unsupported cache version {} (expected {CACHE_VERSION})",
                self.version
            )));
        }
        if self.labels.len() != self.frequencies.len() {
            return Err(GraphError::DimensionMismatch {
                expected: self.labels.len(),
                found: self.frequencies.len(),
            });
        }
        for (label, freq) in self.labels.iter().zip(&self.frequencies) {
            if let Some((term, _)) = freq.iter().find(|(term, _)| !self.vocabulary.contains(term)) {
                return Err(GraphError::Cache(format!("term {term:?} of {label} missing from vocabulary")));
            }
        }
        Ok(Corpus {
            labels: self.labels,
            frequencies: self.frequencies,
            vocabulary: self.vocabulary,
            excluded: self.excluded,
        })
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let writer = BufWriter::new(File::create(path)?);
        serde_cbor::to_writer(writer, self)?;
        info!(path = %path.display(), documents = self.labels.len(), "feature cache saved");
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let cache: FeatureCache = serde_cbor::from_reader(reader)?;
        info!(path = %path.display(), documents = cache.labels.len(), "feature cache loaded");
        Ok(cache)
    }
}
