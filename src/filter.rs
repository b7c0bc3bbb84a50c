//! Section-marker filter: strips lyric annotations and scraping boilerplate.
//!
//! Turns raw scraper songs into the filtered corpus. Only removes text, so
//! everything that survives keeps its relative order.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{RawCorpus, RawSong, SongRecord};

// ============================================================================
// PATTERNS
// ============================================================================

/// Bracketed annotations like "[Hook]" or "[Part 2: Shindy]". Non-greedy and
/// single-line: `.` does not cross a line break.
pub static SECTION_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[.*?\]").unwrap());

/// Genius page footer glued onto the last line: "12Embed", "Embed".
pub static EMBED_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d*Embed\s*$").unwrap());

/// Literal boilerplate injected by the lyrics page.
pub const BOILERPLATE: &[&str] = &["EmbedShare URLCopyEmbedCopy", "You might also like"];

// ============================================================================
// FILTERING
// ============================================================================

fn strip_once(text: &str) -> String {
    let mut result = text.replace('\'', "");
    result = SECTION_MARKER.replace_all(&result, "").into_owned();
    for literal in BOILERPLATE {
        result = result.replace(literal, "");
    }
    result = EMBED_SUFFIX.replace(&result, "").into_owned();
    result.replace("--", "")
}

/// Remove section markers, apostrophes, boilerplate and "--" from lyrics.
///
/// Repeats until nothing changes: removing one pattern can join the halves
/// of another ("URL--Copy"), and a second pass must not find anything new.
/// Each pass only shortens the text, so this terminates.
pub fn strip_section_markers(lyrics: &str) -> String {
    let mut current = strip_once(lyrics);
    loop {
        let next = strip_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Build a song record from one raw song.
pub fn filter_song(artist: &str, raw: &RawSong) -> SongRecord {
    SongRecord {
        artist: artist.to_string(),
        title: raw.title.clone(),
        album: raw.album_name().to_string(),
        date: raw.release_date.clone().unwrap_or_default(),
        lyrics: strip_section_markers(raw.lyrics.as_deref().unwrap_or("")),
    }
}

/// Filter every song of a raw corpus, keeping scraper order.
pub fn filter_corpus(artist: &str, corpus: &RawCorpus) -> Vec<SongRecord> {
    corpus
        .songs
        .iter()
        .map(|song| filter_song(artist, song))
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
