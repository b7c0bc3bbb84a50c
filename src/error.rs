//! Error types shared by every stage of the corpus pipeline.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Library result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Missing credential or unusable setting. Fatal before any work starts.
    #[error("Configuration error: {message}. {hint}")]
    Config {
        message: String,
        hint: &'static str,
    },

    /// Malformed line in a stopword or lexicon resource.
    #[error("Invalid resource {origin} (line {line}): {message}")]
    Resource {
        origin: String,
        line: usize,
        message: String,
    },

    #[error("IO error at {path:?}: {source}")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    /// Persisted corpus file that does not parse.
    #[error("Parse error in {path:?}: {source}")]
    Parse {
        source: serde_json::Error,
        path: PathBuf,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Artist not found on Genius: {0}")]
    ArtistNotFound(String),

    #[error("Scrape failed for {artist}: {message}")]
    Scrape { artist: String, message: String },

    /// Lyrics that cannot be tokenized (binary data, control characters).
    #[error("Malformed text in song {title:?}: {reason}")]
    MalformedText { title: String, reason: String },

    #[error("Unsafe output path: {0}")]
    UnsafeOutput(String),
}

impl Error {
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            source,
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn parse(path: impl AsRef<Path>, source: serde_json::Error) -> Self {
        Self::Parse {
            source,
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn missing_token() -> Self {
        Self::Config {
            message: format!("{} is not set", crate::config::TOKEN_VAR),
            hint: "Export it or add it to a .env file in the working directory",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_mentions_hint() {
        let msg = Error::missing_token().to_string();
        assert!(msg.contains("GENIUS_ACCESS_TOKEN"));
        assert!(msg.contains(".env"));
    }

    #[test]
    fn test_io_error_keeps_path() {
        let err = Error::io(
            "data/x/raw_data_x.json",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.to_string().contains("raw_data_x.json"));
    }
}
