//! Core data models for the lyrics corpus.
//!
//! Raw songs come straight from the scraper JSON; song records are the
//! filtered, tabular form; cleaned records add the NLP-derived columns.

use serde::{Deserialize, Serialize};

// ============================================================================
// Raw scraper output
// ============================================================================

/// Album as written by the scraper: a plain name, or an object carrying one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AlbumField {
    Name(String),
    Object {
        #[serde(default)]
        name: Option<String>,
    },
}

impl AlbumField {
    pub fn name(&self) -> &str {
        match self {
            AlbumField::Name(name) => name,
            AlbumField::Object { name } => name.as_deref().unwrap_or(""),
        }
    }
}

/// One song entry of a raw corpus file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawSong {
    pub title: String,
    #[serde(default)]
    pub album: Option<AlbumField>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub lyrics: Option<String>,
}

impl RawSong {
    pub fn album_name(&self) -> &str {
        self.album.as_ref().map_or("", AlbumField::name)
    }
}

/// Persisted scraper document: `{"artist": ..., "songs": [...]}`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCorpus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    pub songs: Vec<RawSong>,
}

// ============================================================================
// Records
// ============================================================================

/// Filtered song: one row of the filtered corpus.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongRecord {
    pub artist: String,
    pub title: String,
    pub album: String,
    pub date: String,
    pub lyrics: String,
}

/// Song record plus the three columns produced by the cleaning pipeline.
/// `filtered_tokens` is always `tokens` minus stopwords, order preserved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanedSongRecord {
    #[serde(flatten)]
    pub song: SongRecord,
    pub lemmatized_text: String,
    pub tokens: Vec<String>,
    pub filtered_tokens: Vec<String>,
}

// ============================================================================
// Batch state
// ============================================================================

/// Per-artist processing stage. `HaveCleaned` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtistStage {
    NeedRaw,
    HaveRaw,
    HaveFiltered,
    HaveCleaned,
}

/// Outcome of one artist's run.
#[derive(Clone, Debug, Default)]
pub struct ArtistReport {
    pub artist: String,
    pub scraped: bool,
    pub raw_songs: usize,
    pub filtered_songs: usize,
    pub cleaned_songs: usize,
    /// Titles of songs whose cleaning failed and were left out.
    pub skipped: Vec<String>,
    pub unique_words: usize,
    pub top_terms: Vec<(String, usize)>,
}
