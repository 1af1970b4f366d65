use std::collections::HashSet;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;

/// Whitespace-separated words of a flat text file
pub fn read_flat_text<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)?;
    Ok(text.split_whitespace().map(str::to_string).collect())
}

/// One entry per line
pub fn write_flat_text<P: AsRef<Path>, T: AsRef<str>>(path: P, lines: &[T]) -> Result<()> {
    let mut out = BufWriter::new(fs::File::create(path)?);
    for line in lines {
        writeln!(out, "{}", line.as_ref())?;
    }
    out.flush()?;
    Ok(())
}

/// Words dropped from every token sequence
#[derive(Debug, Clone, Default)]
pub struct Stoplist {
    words: HashSet<String>,
}

impl Stoplist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(read_flat_text(path)?.into_iter().collect())
    }

    #[inline]
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl FromIterator<String> for Stoplist {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            words: iter.into_iter().map(|w| w.to_lowercase()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_text_round_trip_and_stoplist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stop.txt");
        write_flat_text(&path, &["the", "And", "of"]).unwrap();
        assert_eq!(read_flat_text(&path).unwrap(), vec!["the", "And", "of"]);

        let stoplist = Stoplist::load(&path).unwrap();
        assert_eq!(stoplist.len(), 3);
        assert!(stoplist.contains("and"));
        assert!(!stoplist.contains("graph"));
    }
}
