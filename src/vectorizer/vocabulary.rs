use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::vectorizer::term_freq::TermFrequency;

/// Corpus-wide vocabulary
/// term -> occurrence count, plus the number of documents merged in.
///
/// The index of a term in the map is its column in every feature vector,
/// so the vocabulary must not change once feature extraction starts.
/// Feature extraction only takes `&Vocabulary`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Vocabulary {
    /// term counts in corpus
    pub term_counts: IndexMap<Box<str>, u64>,
    /// documents that contributed at least one token
    pub doc_num: u64,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self {
            term_counts: IndexMap::new(),
            doc_num: 0,
        }
    }

    /// Add one document's tokens
    ///
    /// Every occurrence is counted. An empty sequence leaves the vocabulary
    /// untouched and returns `false`; the caller must then drop the document.
    pub fn update<T>(&mut self, tokens: &[T]) -> bool
    where
        T: AsRef<str>,
    {
        if tokens.is_empty() {
            return false;
        }
        for token in tokens {
            self.bump(token.as_ref(), 1);
        }
        self.doc_num += 1;
        true
    }

    /// Merge one document's counts (merge half of map-then-merge)
    pub fn add_term_counts(&mut self, freq: &TermFrequency) -> bool {
        if freq.is_empty() {
            return false;
        }
        for (term, count) in freq.iter() {
            self.bump(term, count as u64);
        }
        self.doc_num += 1;
        true
    }

    /// Merge another vocabulary into self
    /// new terms are appended after the existing ones
    pub fn merge(&mut self, other: &Vocabulary) {
        for (term, &count) in other.term_counts.iter() {
            self.bump(term, count);
        }
        self.doc_num += other.doc_num;
    }

    #[inline]
    fn bump(&mut self, term: &str, n: u64) {
        if let Some(count) = self.term_counts.get_mut(term) {
            *count += n;
        } else {
            self.term_counts.insert(term.into(), n);
        }
    }
}

/// lookup
impl Vocabulary {
    /// Column index of `term`
    #[inline]
    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.term_counts.get_index_of(term)
    }

    /// Term at column `index`
    #[inline]
    pub fn term(&self, index: usize) -> Option<&str> {
        self.term_counts.get_index(index).map(|(term, _)| term.as_ref())
    }

    #[inline]
    pub fn term_count(&self, term: &str) -> u64 {
        self.term_counts.get(term).copied().unwrap_or(0)
    }

    #[inline]
    pub fn contains(&self, term: &str) -> bool {
        self.term_counts.contains_key(term)
    }

    /// Terms in column order
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.term_counts.keys().map(|term| term.as_ref())
    }

    /// Number of unique terms
    #[inline]
    pub fn len(&self) -> usize {
        self.term_counts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.term_counts.is_empty()
    }

    #[inline]
    pub fn doc_num(&self) -> u64 {
        self.doc_num
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_counts_occurrences() {
        let mut vocab = Vocabulary::new();
        assert!(vocab.update(&["everything", "was", "beautiful", "and", "nothing", "hurt"]));
        assert!(vocab.update(&["and", "so", "it", "goes", "and"]));
        assert_eq!(vocab.len(), 9);
        assert_eq!(vocab.term_count("and"), 3);
        assert_eq!(vocab.term_count("hurt"), 1);
        assert_eq!(vocab.doc_num(), 2);
        assert_eq!(vocab.term_index("everything"), Some(0));
        assert_eq!(vocab.term(6), Some("so"));
    }

    #[test]
    fn empty_document_is_a_no_op() {
        let mut vocab = Vocabulary::new();
        vocab.update(&["alpha"]);
        let before = vocab.clone();
        assert!(!vocab.update::<&str>(&[]));
        assert_eq!(vocab, before);
        assert!(!vocab.add_term_counts(&TermFrequency::new()));
        assert_eq!(vocab, before);
    }

    #[test]
    fn merged_counts_match_sequential_updates() {
        let docs: [&[&str]; 3] = [&["rust", "graph", "rust"], &["graph", "node"], &["edge"]];

        let mut sequential = Vocabulary::new();
        for doc in docs {
            sequential.update(doc);
        }

        let mut merged = Vocabulary::new();
        for doc in docs {
            merged.add_term_counts(&TermFrequency::from_tokens(doc));
        }
        assert_eq!(sequential, merged);
    }

    #[test]
    fn order_within_document_does_not_change_counts() {
        let mut a = Vocabulary::new();
        a.update(&["x", "y", "x"]);
        let mut b = Vocabulary::new();
        b.update(&["x", "x", "y"]);
        assert_eq!(a.term_count("x"), b.term_count("x"));
        assert_eq!(a.term_count("y"), b.term_count("y"));
    }

    #[test]
    fn merge_vocabularies() {
        let mut a = Vocabulary::new();
        a.update(&["a", "b"]);
        let mut b = Vocabulary::new();
        b.update(&["b", "c"]);
        a.merge(&b);
        assert_eq!(a.doc_num(), 2);
        assert_eq!(a.term_count("b"), 2);
        let terms: Vec<&str> = a.terms().collect();
        assert_eq!(terms, vec!["a", "b", "c"]);
    }
}
