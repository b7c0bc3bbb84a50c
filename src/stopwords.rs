//! German stopword set.
//!
//! The default list ships inside the binary (`resources/stopwords_de.txt`);
//! a replacement file uses the same format: one word per line, `#` comments.

use rustc_hash::FxHashSet;
use std::path::Path;

use crate::error::{Error, Result};

const EMBEDDED: &str = include_str!("../resources/stopwords_de.txt");

/// Immutable, case-sensitive set of stopwords.
#[derive(Clone, Debug, Default)]
pub struct StopwordSet {
    words: FxHashSet<String>,
}

impl StopwordSet {
    /// The built-in German list.
    pub fn embedded() -> Self {
        Self::parse(EMBEDDED)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Ok(Self::parse(&text))
    }

    /// Parse the line format. Surrounding whitespace is trimmed; blank lines
    /// and lines starting with `#` are ignored.
    pub fn parse(text: &str) -> Self {
        let words = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect();
        Self { words }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    /// Keep the tokens that are not stopwords, in their original order.
    pub fn retain_content<'a, I>(&self, tokens: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a String>,
    {
        tokens
            .into_iter()
            .filter(|token| !self.contains(token))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for StopwordSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self {
            words: iter.into_iter().map(Into::into).collect(),
        }
    }
}
