//! Run configuration.
//!
//! Paths, artist list and policies come from command-line flags; the Genius
//! access token comes from the environment or a `.env` file.

use dotenv::dotenv;
use std::env;
use std::path::PathBuf;

use crate::error::Result;
use crate::lemma::{Lemmatizer, Lexicon, UnknownWordPolicy};
use crate::pipeline::{Cleaner, FailurePolicy};
use crate::stopwords::StopwordSet;
use crate::tokenize::{SentenceTokenizer, WordTokenizer};

/// Environment variable holding the Genius API token.
pub const TOKEN_VAR: &str = "GENIUS_ACCESS_TOKEN";

/// Artists processed when none are given.
pub const DEFAULT_ARTISTS: &[&str] = &[
    "IDK & Offset",
    "Johann Wolfgang von Goethe",
    "Friedrich Schiller",
    "Heinrich Heine",
    "Shindy",
    "Credibil",
    "Die Fantastischen Vier",
];

#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the per-artist corpus directories
    pub data_dir: PathBuf,
    pub artists: Vec<String>,
    pub access_token: Option<String>,
    /// Replacement for the embedded stopword list
    pub stopwords_path: Option<PathBuf>,
    /// Replacement for the embedded lexicon
    pub lexicon_path: Option<PathBuf>,
    pub unknown_word_policy: UnknownWordPolicy,
    /// Load existing filtered/cleaned files instead of recomputing them
    pub skip_existing: bool,
    /// Fail an artist on its first malformed song
    pub strict: bool,
    /// Number of most frequent terms reported per artist
    pub top_terms: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            artists: DEFAULT_ARTISTS.iter().map(|a| a.to_string()).collect(),
            access_token: None,
            stopwords_path: None,
            lexicon_path: None,
            unknown_word_policy: UnknownWordPolicy::default(),
            skip_existing: false,
            strict: false,
            top_terms: 10,
        }
    }
}

impl Config {
    /// Defaults plus the access token from the environment.
    pub fn load() -> Self {
        Self {
            access_token: load_token(),
            ..Self::default()
        }
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        if self.strict {
            FailurePolicy::Abort
        } else {
            FailurePolicy::Skip
        }
    }

    pub fn load_stopwords(&self) -> Result<StopwordSet> {
        match &self.stopwords_path {
            Some(path) => StopwordSet::from_path(path),
            None => Ok(StopwordSet::embedded()),
        }
    }

    pub fn load_lexicon(&self) -> Result<Lexicon> {
        match &self.lexicon_path {
            Some(path) => Lexicon::from_path(path),
            None => Lexicon::embedded(),
        }
    }

    /// The song cleaner for this configuration, resources loaded.
    pub fn cleaner(&self) -> Result<Cleaner> {
        let lexicon = self.load_lexicon()?;
        let stopwords = self.load_stopwords()?;
        log::info!(
            "Loaded {} lexicon forms and {} stopwords",
            lexicon.len(),
            stopwords.len()
        );
        Ok(Cleaner::new(
            SentenceTokenizer::default(),
            Lemmatizer::new(lexicon, self.unknown_word_policy),
            WordTokenizer,
            stopwords,
        ))
    }
}

/// Token from the environment, reading `.env` first if present.
pub fn load_token() -> Option<String> {
    dotenv().ok();
    non_empty(env::var(TOKEN_VAR).ok())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.artists.len(), 7);
        assert_eq!(config.artists[0], "IDK & Offset");
        assert_eq!(config.failure_policy(), FailurePolicy::Skip);
    }

    #[test]
    fn test_blank_token_is_missing() {
        assert_eq!(non_empty(Some("  ".into())), None);
        assert_eq!(non_empty(None), None);
        assert_eq!(non_empty(Some(" t0k ".into())), Some("t0k".into()));
    }

    #[test]
    fn test_strict_aborts() {
        let config = Config {
            strict: true,
            ..Config::default()
        };
        assert_eq!(config.failure_policy(), FailurePolicy::Abort);
    }

    #[test]
    fn test_resource_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let stopwords = dir.path().join("stop.txt");
        fs::write(&stopwords, "# custom\nliebe\n").unwrap();
        let config = Config {
            stopwords_path: Some(stopwords),
            ..Config::default()
        };
        let set = config.load_stopwords().unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.contains("liebe"));

        let missing = Config {
            lexicon_path: Some(dir.path().join("nope.tsv")),
            ..Config::default()
        };
        assert!(missing.load_lexicon().is_err());
        assert!(Config::default().cleaner().is_ok());
    }
}
