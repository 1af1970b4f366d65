use std::fs;
use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::corpus::stoplist::Stoplist;
use crate::error::{GraphError, Result};

/// document path -> lowercase token sequence
pub trait TextExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> Result<Vec<String>>;
}

/// Lowercase, split on whitespace, then filter
///
/// With `filter_junk` only purely alphabetic tokens longer than one
/// character survive. Stoplist words are always dropped.
pub fn filter_tokens(text: &str, filter_junk: bool, stoplist: &Stoplist) -> Vec<String> {
    text.split_whitespace()
        .map(str::to_lowercase)
        .filter(|tok| !filter_junk || (tok.chars().count() > 1 && tok.chars().all(char::is_alphabetic)))
        .filter(|tok| !stoplist.contains(tok))
        .collect()
}

/// Text of a PDF via the external `pdftotext` binary
#[derive(Debug, Clone)]
pub struct PdfToText {
    pub command: String,
    pub filter_junk: bool,
    pub stoplist: Stoplist,
}

impl PdfToText {
    pub fn new(command: impl Into<String>, stoplist: Stoplist) -> Self {
        Self {
            command: command.into(),
            filter_junk: true,
            stoplist,
        }
    }

    fn dump(&self, path: &Path) -> Result<String> {
        // "-" sends the text to stdout
        let output = Command::new(&self.command)
            .arg(path)
            .arg("-")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GraphError::Extraction {
                path: path.display().to_string(),
                reason: format!("{} exited with {:?}: {}", self.command, output.status.code(), stderr.trim()),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl TextExtractor for PdfToText {
    fn extract(&self, path: &Path) -> Result<Vec<String>> {
        let text = self.dump(path)?;
        let tokens = filter_tokens(&text, self.filter_junk, &self.stoplist);
        debug!(path = %path.display(), tokens = tokens.len(), "pdf dumped");
        Ok(tokens)
    }
}

/// UTF-8 text files, same filtering as [`PdfToText`]
#[derive(Debug, Clone, Default)]
pub struct PlainText {
    pub filter_junk: bool,
    pub stoplist: Stoplist,
}

impl PlainText {
    pub fn new(stoplist: Stoplist) -> Self {
        Self {
            filter_junk: true,
            stoplist,
        }
    }
}

impl TextExtractor for PlainText {
    fn extract(&self, path: &Path) -> Result<Vec<String>> {
        let text = fs::read_to_string(path)?;
        Ok(filter_tokens(&text, self.filter_junk, &self.stoplist))
    }
}
