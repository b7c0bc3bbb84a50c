//! Lyrics scraping.
//!
//! [`Scraper`] is the seam the batch driver depends on; [`GeniusScraper`]
//! implements it against the Genius API (song listing and metadata) and the
//! public song pages (lyrics text).

use indicatif::ProgressBar;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::blocking::Client;
use scraper::{ElementRef, Html, Node, Selector};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::corpus::write_json_atomic;
use crate::error::{Error, Result};
use crate::models::{AlbumField, RawCorpus, RawSong};
use crate::progress::{advance, finish_phase, phase_bar, Phase};

pub const API_BASE: &str = "https://api.genius.com";
const USER_AGENT: &str = "lyrics-corpus/0.1";

/// Titles of Genius pages that are not songs.
static NON_SONG_TITLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(tracklist|track list|album art(work)?|liner notes|booklet|credits|interview|skit|instrumental|setlist)").unwrap()
});

static LYRICS_CONTAINER: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"div[data-lyrics-container="true"]"#).unwrap());

/// Source of raw corpora.
pub trait Scraper {
    /// Scrape every song of `artist` and persist a raw corpus at `dest`.
    /// Returns the number of songs written. Nothing is written on failure.
    fn scrape(&self, artist: &str, dest: &Path) -> Result<usize>;

    /// Whether the scraper can run at all (credentials present).
    fn is_configured(&self) -> bool {
        true
    }
}

/// An absent scraper: usable as long as nothing needs scraping.
impl<S: Scraper> Scraper for Option<S> {
    fn scrape(&self, artist: &str, dest: &Path) -> Result<usize> {
        match self {
            Some(scraper) => scraper.scrape(artist, dest),
            None => Err(Error::missing_token()),
        }
    }

    fn is_configured(&self) -> bool {
        self.as_ref().is_some_and(|s| s.is_configured())
    }
}

// ============================================================================
// GENIUS API MODELS
// ============================================================================

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    response: T,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(rename = "type")]
    kind: String,
    result: HitResult,
}

#[derive(Debug, Deserialize)]
struct HitResult {
    primary_artist: ApiArtist,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiArtist {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct ArtistSongsResponse {
    songs: Vec<ApiSong>,
    next_page: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
struct ApiSong {
    id: u64,
    title: String,
    url: String,
    primary_artist: ApiArtist,
    #[serde(default)]
    lyrics_state: Option<String>,
    #[serde(default)]
    instrumental: bool,
}

#[derive(Debug, Deserialize)]
struct SongResponse {
    song: SongDetails,
}

#[derive(Debug, Deserialize)]
struct SongDetails {
    #[serde(default)]
    album: Option<ApiAlbum>,
    #[serde(default)]
    release_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiAlbum {
    name: String,
}

// ============================================================================
// GENIUS SCRAPER
// ============================================================================

#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    /// Regex alternatives matched case-insensitively against titles. In
    /// "(Remix)" the parentheses group, so any title mentioning remix is out.
    pub excluded_terms: Vec<String>,
    pub skip_non_songs: bool,
    pub per_page: u32,
    /// Pause between requests.
    pub request_delay: Duration,
    pub timeout: Duration,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            excluded_terms: vec!["(Remix)".to_string(), "(Snippet)".to_string()],
            skip_non_songs: true,
            per_page: 50,
            request_delay: Duration::from_millis(200),
            timeout: Duration::from_secs(15),
        }
    }
}

pub struct GeniusScraper {
    client: Client,
    token: String,
    filter: SongFilter,
    options: ScrapeOptions,
}

impl GeniusScraper {
    pub fn new(token: &str, options: ScrapeOptions) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(options.timeout)
            .build()?;
        Ok(Self {
            client,
            token: token.to_string(),
            filter: SongFilter::new(&options)?,
            options,
        })
    }

    fn api<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        std::thread::sleep(self.options.request_delay);
        let envelope: Envelope<T> = self
            .client
            .get(format!("{API_BASE}{path}"))
            .bearer_auth(&self.token)
            .query(query)
            .send()?
            .error_for_status()?
            .json()?;
        Ok(envelope.response)
    }

    fn find_artist(&self, name: &str) -> Result<ApiArtist> {
        let search: SearchResponse = self.api("/search", &[("q", name.to_string())])?;
        pick_artist(&search.hits, name).ok_or_else(|| Error::ArtistNotFound(name.to_string()))
    }

    fn artist_songs(&self, artist: &ApiArtist) -> Result<Vec<ApiSong>> {
        let mut songs = Vec::new();
        let mut page = Some(1);
        while let Some(current) = page {
            let response: ArtistSongsResponse = self.api(
                &format!("/artists/{}/songs", artist.id),
                &[
                    ("sort", "title".to_string()),
                    ("per_page", self.options.per_page.to_string()),
                    ("page", current.to_string()),
                ],
            )?;
            songs.extend(response.songs);
            page = response.next_page;
        }
        Ok(songs)
    }

    fn song_details(&self, id: u64) -> Result<SongDetails> {
        let response: SongResponse = self.api(&format!("/songs/{id}"), &[])?;
        Ok(response.song)
    }

    fn song_page(&self, url: &str) -> Result<String> {
        std::thread::sleep(self.options.request_delay);
        Ok(self.client.get(url).send()?.error_for_status()?.text()?)
    }
}

impl GeniusScraper {
    fn collect_songs(&self, artist: &str, pb: &ProgressBar) -> Result<RawCorpus> {
        pb.set_message("searching");
        let found = self.find_artist(artist)?;
        log::info!("Found Genius artist {:?} (id {})", found.name, found.id);

        pb.set_message("listing songs");
        let listed = self.artist_songs(&found)?;
        let total = listed.len();
        let wanted: Vec<ApiSong> = listed
            .into_iter()
            .filter(|song| song.primary_artist.id == found.id && self.filter.accepts(song))
            .collect();
        log::info!("{} of {} listed songs to fetch", wanted.len(), total);
        pb.set_length(wanted.len() as u64);

        let mut songs = Vec::with_capacity(wanted.len());
        for song in wanted {
            pb.set_message(song.title.clone());
            let html = self.song_page(&song.url)?;
            match extract_lyrics(&html) {
                Some(lyrics) => {
                    let details = self.song_details(song.id)?;
                    songs.push(RawSong {
                        title: song.title,
                        album: details.album.map(|a| AlbumField::Name(a.name)),
                        release_date: details.release_date,
                        lyrics: Some(lyrics),
                    });
                }
                None => log::warn!("No lyrics on page for {:?}, skipping", song.title),
            }
            advance(pb, Phase::Scrape);
        }

        Ok(RawCorpus {
            artist: Some(found.name),
            songs,
        })
    }
}

impl Scraper for GeniusScraper {
    fn scrape(&self, artist: &str, dest: &Path) -> Result<usize> {
        let pb = phase_bar(Phase::Scrape, 0, artist);
        let result = self.collect_songs(artist, &pb).and_then(|corpus| {
            write_json_atomic(dest, &corpus)?;
            Ok(corpus.songs.len())
        });
        finish_phase(&pb, &result, |count| format!("{count} songs"));
        result
    }

    fn is_configured(&self) -> bool {
        !self.token.is_empty()
    }
}

// ============================================================================
// HELPERS
// ============================================================================

/// Primary artist of the search hits: an exact (case-insensitive) name match,
/// else the first song hit's artist.
fn pick_artist(hits: &[SearchHit], name: &str) -> Option<ApiArtist> {
    let wanted = name.to_lowercase();
    let songs: Vec<&ApiArtist> = hits
        .iter()
        .filter(|hit| hit.kind == "song")
        .map(|hit| &hit.result.primary_artist)
        .collect();
    songs
        .iter()
        .find(|artist| artist.name.to_lowercase() == wanted)
        .or_else(|| songs.first())
        .map(|artist| (*artist).clone())
}

/// Which listed songs are worth fetching.
#[derive(Debug, Clone)]
pub struct SongFilter {
    excluded: Option<Regex>,
    skip_non_songs: bool,
}

impl SongFilter {
    pub fn new(options: &ScrapeOptions) -> Result<Self> {
        let excluded = if options.excluded_terms.is_empty() {
            None
        } else {
            let pattern = format!("(?i){}", options.excluded_terms.join("|"));
            Some(Regex::new(&pattern).map_err(|e| Error::Config {
                message: format!("invalid excluded term pattern: {e}"),
                hint: "Excluded terms are regular expressions",
            })?)
        };
        Ok(Self {
            excluded,
            skip_non_songs: options.skip_non_songs,
        })
    }

    pub fn accepts_title(&self, title: &str) -> bool {
        if self.skip_non_songs && NON_SONG_TITLE.is_match(title) {
            return false;
        }
        !self.excluded.as_ref().is_some_and(|re| re.is_match(title))
    }

    /// Finished, non-instrumental lyrics with an acceptable title.
    fn accepts(&self, song: &ApiSong) -> bool {
        if song.lyrics_state.as_deref() != Some("complete") || song.instrumental {
            log::debug!("Skipping {:?}: no complete lyrics", song.title);
            return false;
        }
        if !self.accepts_title(&song.title) {
            log::debug!("Skipping {:?}: excluded title", song.title);
            return false;
        }
        true
    }
}

fn collect_text(element: ElementRef, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) if el.name() == "br" => out.push('\n'),
            Node::Element(el) if el.attr("data-exclude-from-selection") == Some("true") => {}
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_text(child_element, out);
                }
            }
            _ => {}
        }
    }
}

/// Lyrics text of a Genius song page, section headers included.
/// `None` when the page has no lyrics container or it is empty.
pub fn extract_lyrics(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let mut lyrics = String::new();
    for container in document.select(&LYRICS_CONTAINER) {
        if !lyrics.is_empty() {
            lyrics.push('\n');
        }
        collect_text(container, &mut lyrics);
    }
    let lyrics = lyrics.trim().to_string();
    (!lyrics.is_empty()).then_some(lyrics)
}

// ============================================================================
// TESTS
// ============================================================================
