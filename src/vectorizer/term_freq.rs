use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// TermFrequency 構造体
/// Per-document term occurrence counts.
///
/// Terms keep the order of their first occurrence, so merging a
/// `TermFrequency` into a vocabulary gives the same term order as feeding
/// the raw token sequence in one by one.
///
/// # Examples
/// ```
/// use tfidf_doc_graph::TermFrequency;
/// let mut freq = TermFrequency::new();
/// freq.add_terms(&["graph", "node", "graph"]);
/// assert_eq!(freq.term_count("graph"), 2);
/// assert_eq!(freq.term_sum(), 3);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TermFrequency {
    #[serde(with = "indexmap::map::serde_seq")]
    term_count: IndexMap<String, u32>,
    total_term_count: u64,
}

/// Termの追加
impl TermFrequency {
    pub fn new() -> Self {
        TermFrequency {
            term_count: IndexMap::new(),
            total_term_count: 0,
        }
    }

    /// Count every token of a document
    pub fn from_tokens<T>(tokens: &[T]) -> Self
    where
        T: AsRef<str>,
    {
        let mut freq = Self::new();
        freq.add_terms(tokens);
        freq
    }

    /// termを追加する
    #[inline]
    pub fn add_term(&mut self, term: &str) -> &mut Self {
        if let Some(count) = self.term_count.get_mut(term) {
            *count += 1;
        } else {
            self.term_count.insert(term.to_string(), 1);
        }
        self.total_term_count += 1;
        self
    }

    /// 複数のtermを追加する
    #[inline]
    pub fn add_terms<T>(&mut self, terms: &[T]) -> &mut Self
    where
        T: AsRef<str>,
    {
        for term in terms {
            self.add_term(term.as_ref());
        }
        self
    }
}

/// 統計
impl TermFrequency {
    /// Occurrences of `term`, zero when absent
    #[inline]
    pub fn term_count(&self, term: &str) -> u32 {
        self.term_count.get(term).copied().unwrap_or(0)
    }

    /// Total number of tokens counted
    #[inline]
    pub fn term_sum(&self) -> u64 {
        self.total_term_count
    }

    /// Number of distinct terms
    #[inline]
    pub fn unique_term_count(&self) -> usize {
        self.term_count.len()
    }

    #[inline]
    pub fn most_frequent_term_count(&self) -> u32 {
        self.term_count.values().copied().max().unwrap_or(0)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.total_term_count == 0
    }

    #[inline]
    pub fn contains_term(&self, term: &str) -> bool {
        self.term_count.contains_key(term)
    }

    /// (term, count) in first-occurrence order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.term_count.iter().map(|(term, &count)| (term.as_str(), count))
    }

    /// カウントを全リセットします
    #[inline]
    pub fn clear(&mut self) {
        self.term_count.clear();
        self.total_term_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_repeated_terms() {
        let freq = TermFrequency::from_tokens(&["and", "so", "it", "goes", "and"]);
        assert_eq!(freq.term_count("and"), 2);
        assert_eq!(freq.term_count("goes"), 1);
        assert_eq!(freq.term_count("missing"), 0);
        assert_eq!(freq.term_sum(), 5);
        assert_eq!(freq.unique_term_count(), 4);
        assert_eq!(freq.most_frequent_term_count(), 2);
    }

    #[test]
    fn keeps_first_occurrence_order() {
        let freq = TermFrequency::from_tokens(&["b", "a", "b", "c"]);
        let order: Vec<&str> = freq.iter().map(|(t, _)| t).collect();
        assert_eq!(order, vec!["b", "a", "c"]);
    }

    #[test]
    fn empty_and_clear() {
        let mut freq = TermFrequency::from_tokens::<&str>(&[]);
        assert!(freq.is_empty());
        assert_eq!(freq.most_frequent_term_count(), 0);
        freq.add_term("x");
        assert!(!freq.is_empty());
        freq.clear();
        assert!(freq.is_empty());
        assert!(!freq.contains_term("x"));
    }
}
