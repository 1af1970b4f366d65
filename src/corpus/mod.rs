//! Corpus assembly: document discovery, token extraction and the
//! map-then-merge vocabulary build.

pub mod extract;
pub mod stoplist;

use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sprs::CsMat;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{GraphError, Result};
use crate::vectorizer::{build_features, Normalization, TermFrequency, Vocabulary};

pub use extract::{filter_tokens, PdfToText, PlainText, TextExtractor};
pub use stoplist::{read_flat_text, write_flat_text, Stoplist};

/// Documents that survived extraction, with their vocabulary
///
/// `labels[i]` and `frequencies[i]` describe the same document, which is
/// row `i` of every matrix and node `i` of the graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Corpus {
    pub labels: Vec<String>,
    pub frequencies: Vec<TermFrequency>,
    pub vocabulary: Vocabulary,
    /// labels of documents dropped for producing no tokens
    pub excluded: Vec<String>,
}

impl Corpus {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Document-term matrix over the corpus vocabulary
    pub fn feature_matrix(&self, normalization: Normalization) -> Result<CsMat<f64>> {
        build_features(&self.frequencies, &self.vocabulary, normalization)
    }
}

/// Builds a [`Corpus`] from token sequences or files
pub struct CorpusBuilder;

impl CorpusBuilder {
    /// In-memory (label, tokens) pairs, kept in input order
    pub fn from_tokens<I, L, T>(documents: I) -> Corpus
    where
        I: IntoIterator<Item = (L, Vec<T>)>,
        L: Into<String>,
        T: AsRef<str>,
    {
        Self::merge(
            documents
                .into_iter()
                .map(|(label, tokens)| (label.into(), TermFrequency::from_tokens(tokens.as_slice()))),
        )
    }

    /// Extract every file in parallel, then merge sequentially in input order
    ///
    /// A document the extractor rejects (`Extraction`) is excluded like an
    /// empty one; any other error aborts.
    pub fn from_paths<E>(paths: &[PathBuf], extractor: &E) -> Result<Corpus>
    where
        E: TextExtractor + ?Sized,
    {
        let start = Instant::now();
        let extracted: Vec<(String, Result<TermFrequency>)> = paths
            .par_iter()
            .map(|path| {
                let freq = extractor
                    .extract(path)
                    .map(|tokens| TermFrequency::from_tokens(tokens.as_slice()));
                (node_label(path), freq)
            })
            .collect();

        let mut documents = Vec::with_capacity(extracted.len());
        for (label, freq) in extracted {
            match freq {
                Ok(freq) => documents.push((label, freq)),
                Err(err @ GraphError::Extraction { .. }) => {
                    warn!(%err, "could not dump text, excluding document");
                    documents.push((label, TermFrequency::new()));
                }
                Err(err) => return Err(err),
            }
        }

        let corpus = Self::merge(documents);
        info!(
            documents = corpus.len(),
            excluded = corpus.excluded.len(),
            terms = corpus.vocabulary.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "corpus built"
        );
        Ok(corpus)
    }

    /// Sequential merge: the only step that touches the vocabulary
    fn merge<I>(documents: I) -> Corpus
    where
        I: IntoIterator<Item = (String, TermFrequency)>,
    {
        let mut corpus = Corpus::default();
        for (label, freq) in documents {
            if !corpus.vocabulary.add_term_counts(&freq) {
                let err = GraphError::EmptyDocument(label.clone());
                warn!(%err, "excluding document");
                corpus.excluded.push(label);
                continue;
            }
            debug!(label = %label, terms = freq.unique_term_count(), "document merged");
            corpus.labels.push(label);
            corpus.frequencies.push(freq);
        }
        corpus
    }
}

/// Last path component, used as the node label
pub fn node_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Files under `root` with the given extension (case-insensitive), sorted
pub fn find_documents<P: AsRef<Path>>(root: P, extension: &str) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(root.as_ref()).follow_links(true) {
        let entry = entry.map_err(|err| match err.into_io_error() {
            Some(io) => GraphError::Io(io),
            None => GraphError::InvalidParameter("filesystem loop while walking documents".to_string()),
        })?;
        let path = entry.path();
        let matches = path
            .extension()
            .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
            .unwrap_or(false);
        if entry.file_type().is_file() && matches {
            paths.push(path.to_path_buf());
        }
    }
    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn empty_documents_are_excluded_consistently() {
        let corpus = CorpusBuilder::from_tokens(vec![
            ("a.pdf", vec!["graph", "node"]),
            ("scanned.pdf", vec![]),
            ("b.pdf", vec!["node", "edge"]),
        ]);
        assert_eq!(corpus.labels, vec!["a.pdf", "b.pdf"]);
        assert_eq!(corpus.excluded, vec!["scanned.pdf"]);
        assert_eq!(corpus.frequencies.len(), 2);
        assert_eq!(corpus.vocabulary.doc_num(), 2);

        let matrix = corpus.feature_matrix(Normalization::Raw).unwrap();
        assert_eq!(matrix.rows(), corpus.labels.len());
        let edge = corpus.vocabulary.term_index("edge").unwrap();
        assert_eq!(matrix.get(1, edge).copied(), Some(1.0));
    }

    #[test]
    fn vocabulary_order_follows_input_order() {
        let corpus = CorpusBuilder::from_tokens(vec![("1", vec!["z", "y"]), ("2", vec!["x", "z"])]);
        let terms: Vec<&str> = corpus.vocabulary.terms().collect();
        assert_eq!(terms, vec!["z", "y", "x"]);
    }

    struct FailingOn(&'static str);

    impl TextExtractor for FailingOn {
        fn extract(&self, path: &Path) -> Result<Vec<String>> {
            if node_label(path) == self.0 {
                return Err(GraphError::Extraction {
                    path: path.display().to_string(),
                    reason: "encrypted".to_string(),
                });
            }
            Ok(fs::read_to_string(path)?.split_whitespace().map(str::to_string).collect())
        }
    }

    #[test]
    fn from_paths_excludes_failed_extraction() {
        let dir = tempfile::tempdir().unwrap();
        let mut paths = Vec::new();
        for (name, text) in [("a.txt", "alpha beta"), ("b.txt", "beta gamma"), ("c.txt", "delta")] {
            let p = dir.path().join(name);
            fs::write(&p, text).unwrap();
            paths.push(p);
        }
        let corpus = CorpusBuilder::from_paths(&paths, &FailingOn("b.txt")).unwrap();
        assert_eq!(corpus.labels, vec!["a.txt", "c.txt"]);
        assert_eq!(corpus.excluded, vec!["b.txt"]);
        assert!(!corpus.vocabulary.contains("gamma"));
    }

    #[test]
    fn find_documents_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("b.pdf"), b"").unwrap();
        fs::write(dir.path().join("nested").join("a.PDF"), b"").unwrap();
        fs::write(dir.path().join("notes.txt"), b"").unwrap();

        let found = find_documents(dir.path(), "pdf").unwrap();
        let labels: Vec<String> = found.iter().map(|p| node_label(p)).collect();
        assert_eq!(labels, vec!["b.pdf", "a.PDF"]);
    }
}
