//! On-disk corpus layout and JSON persistence.
//!
//! ```text
//! data/<artist>/raw_data_<artist>.json       scraper output {"songs": [...]}
//! data/<artist>/filtered_data_<artist>.json  [SongRecord, ...]
//! data/<artist>/cleaned_data_<artist>.json   [CleanedSongRecord, ...]
//! ```

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::models::RawCorpus;

/// File locations of one artist's corpora.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusPaths {
    pub dir: PathBuf,
    pub raw: PathBuf,
    pub filtered: PathBuf,
    pub cleaned: PathBuf,
}

impl CorpusPaths {
    pub fn for_artist(data_dir: &Path, artist: &str) -> Self {
        let name = path_component(artist);
        let dir = data_dir.join(&name);
        Self {
            raw: dir.join(format!("raw_data_{name}.json")),
            filtered: dir.join(format!("filtered_data_{name}.json")),
            cleaned: dir.join(format!("cleaned_data_{name}.json")),
            dir,
        }
    }
}

/// Artist name as a single path component. Names are used verbatim
/// ("IDK & Offset"), except path separators which would nest directories
/// and names that would resolve to the data dir or its parent.
pub fn path_component(artist: &str) -> String {
    let name = artist.trim().replace(['/', '\\'], "_");
    match name.as_str() {
        "" | "." | ".." => "_".to_string(),
        _ => name,
    }
}

// ============================================================================
// READING
// ============================================================================

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    serde_json::from_str(&text).map_err(|e| Error::parse(path, e))
}

/// Load a persisted scraper document.
pub fn load_raw_corpus(path: &Path) -> Result<RawCorpus> {
    read_json(path)
}

/// Load a record-oriented corpus file (filtered or cleaned).
pub fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    read_json(path)
}

// ============================================================================
// WRITING
// ============================================================================

/// Write pretty JSON through a sibling temp file, so readers never see a
/// half-written corpus.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    let bytes = serde_json::to_vec_pretty(value).map_err(|e| Error::parse(path, e))?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, bytes).map_err(|e| Error::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| Error::io(path, e))
}

pub fn write_records<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    write_json_atomic(path, records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SongRecord;

    #[test]
    fn test_paths_follow_convention() {
        let paths = CorpusPaths::for_artist(Path::new("data"), "IDK & Offset");
        assert_eq!(paths.dir, PathBuf::from("data/IDK & Offset"));
        assert_eq!(paths.raw, PathBuf::from("data/IDK & Offset/raw_data_IDK & Offset.json"));
        assert_eq!(
            paths.filtered,
            PathBuf::from("data/IDK & Offset/filtered_data_IDK & Offset.json")
        );
        assert_eq!(
            paths.cleaned,
            PathBuf::from("data/IDK & Offset/cleaned_data_IDK & Offset.json")
        );
    }

    #[test]
    fn test_path_component_strips_separators() {
        assert_eq!(path_component("AC/DC"), "AC_DC");
        assert_eq!(path_component(" Heinrich Heine "), "Heinrich Heine");
        assert_eq!(path_component("../.."), ".._..");
    }

    #[test]
    fn test_dot_names_stay_inside_data_dir() {
        assert_eq!(path_component(".."), "_");
        assert_eq!(path_component(" . "), "_");
        assert_eq!(path_component(""), "_");
        let paths = CorpusPaths::for_artist(Path::new("data"), "..");
        assert_eq!(paths.dir, PathBuf::from("data/_"));
        assert_eq!(paths.raw, PathBuf::from("data/_/raw_data__.json"));
        assert_eq!(path_component("Mr. ..."), "Mr. ...");
    }

    #[test]
    fn test_records_roundtrip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/filtered_data_x.json");
        let records = vec![SongRecord {
            artist: "x".into(),
            title: "Erlkönig".into(),
            album: "".into(),
            date: "1782".into(),
            lyrics: "Wer reitet so spät".into(),
        }];
        write_records(&path, &records).unwrap();
        assert!(!path.with_extension("json.tmp").exists());
        let back: Vec<SongRecord> = read_records(&path).unwrap();
        assert_eq!(back, records);
    }

    #[test]
    fn test_load_raw_corpus_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("raw_data_none.json");
        assert!(matches!(load_raw_corpus(&missing), Err(Error::Io { .. })));

        let broken = dir.path().join("raw_data_broken.json");
        fs::write(&broken, "{\"songs\": [").unwrap();
        assert!(matches!(load_raw_corpus(&broken), Err(Error::Parse { .. })));
    }
}
