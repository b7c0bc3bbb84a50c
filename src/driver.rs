//! Artist batch driver.
//!
//! Walks every artist through `NeedRaw → HaveRaw → HaveFiltered → HaveCleaned`:
//! scrape only when no raw corpus exists, then filter and clean. Artists run
//! one after another; a failing artist is logged and the batch moves on.

use std::path::PathBuf;
use std::time::Instant;

use crate::corpus::{load_raw_corpus, read_records, write_records, CorpusPaths};
use crate::error::{Error, Result};
use crate::filter::filter_corpus;
use crate::frequency::{term_frequencies, unique_word_count};
use crate::models::{ArtistReport, ArtistStage, CleanedSongRecord, SongRecord};
use crate::pipeline::{Cleaner, FailurePolicy};
use crate::progress::{advance, format_duration, phase_bar, Phase};
use crate::safety::validate_output_path;
use crate::scrape::Scraper;

#[derive(Debug, Clone, Copy)]
pub struct DriverOptions {
    /// Load existing filtered/cleaned files instead of recomputing them.
    pub skip_existing: bool,
    pub failure_policy: FailurePolicy,
    /// Most frequent content terms kept in each report.
    pub top_terms: usize,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            skip_existing: false,
            failure_policy: FailurePolicy::Skip,
            top_terms: 10,
        }
    }
}

/// Outcome of a batch: reports of finished artists, errors of failed ones.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub reports: Vec<ArtistReport>,
    pub failed: Vec<(String, Error)>,
}

impl BatchSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn failed_artists(&self) -> Vec<&str> {
        self.failed.iter().map(|(artist, _)| artist.as_str()).collect()
    }
}

pub struct BatchDriver<S> {
    data_dir: PathBuf,
    scraper: S,
    cleaner: Cleaner,
    options: DriverOptions,
}

impl<S: Scraper> BatchDriver<S> {
    pub fn new(
        data_dir: impl Into<PathBuf>,
        scraper: S,
        cleaner: Cleaner,
        options: DriverOptions,
    ) -> Self {
        Self {
            data_dir: data_dir.into(),
            scraper,
            cleaner,
            options,
        }
    }

    pub fn paths(&self, artist: &str) -> CorpusPaths {
        CorpusPaths::for_artist(&self.data_dir, artist)
    }

    /// Artists without a raw corpus on disk.
    pub fn artists_needing_scrape<'a>(&self, artists: &'a [String]) -> Vec<&'a str> {
        artists
            .iter()
            .filter(|artist| !self.paths(artist).raw.exists())
            .map(String::as_str)
            .collect()
    }

    /// Fail before any work if something must be scraped and the scraper
    /// cannot run.
    pub fn preflight(&self, artists: &[String]) -> Result<()> {
        let missing = self.artists_needing_scrape(artists);
        if missing.is_empty() || self.scraper.is_configured() {
            return Ok(());
        }
        log::error!("No raw corpus for: {}", missing.join(", "));
        Err(Error::missing_token())
    }

    /// Process every artist in order.
    ///
    /// Only a preflight failure is returned as `Err`; per-artist failures are
    /// collected in the summary.
    pub fn run(&self, artists: &[String]) -> Result<BatchSummary> {
        self.preflight(artists)?;

        let pb = phase_bar(Phase::Artists, artists.len() as u64, "Artists");
        let mut summary = BatchSummary::default();
        for artist in artists {
            pb.set_message(artist.clone());
            log::info!("Processing {}", artist);
            match self.run_artist(artist) {
                Ok(report) => summary.reports.push(report),
                Err(e) => {
                    log::error!("Artist {:?} failed: {}", artist, e);
                    summary.failed.push((artist.clone(), e));
                }
            }
            advance(&pb, Phase::Artists);
        }
        pb.finish_with_message(format!(
            "{} done, {} failed",
            summary.reports.len(),
            summary.failed.len()
        ));
        Ok(summary)
    }

    /// Drive one artist to `HaveCleaned`.
    pub fn run_artist(&self, artist: &str) -> Result<ArtistReport> {
        let start = Instant::now();
        let paths = self.paths(artist);
        let mut report = ArtistReport {
            artist: artist.to_string(),
            ..ArtistReport::default()
        };

        let mut stage = if paths.raw.exists() {
            ArtistStage::HaveRaw
        } else {
            ArtistStage::NeedRaw
        };
        let mut filtered: Vec<SongRecord> = Vec::new();

        while stage != ArtistStage::HaveCleaned {
            stage = match stage {
                ArtistStage::NeedRaw => {
                    log::info!("Scraping {} into {}", artist, paths.raw.display());
                    validate_output_path(&paths.raw, "raw_data", &[])?;
                    let count = self.scraper.scrape(artist, &paths.raw)?;
                    log::info!("Scraped {} songs", count);
                    report.scraped = true;
                    ArtistStage::HaveRaw
                }
                ArtistStage::HaveRaw => {
                    filtered = self.filter_stage(artist, &paths, &mut report)?;
                    ArtistStage::HaveFiltered
                }
                ArtistStage::HaveFiltered => {
                    self.clean_stage(&filtered, &paths, &mut report)?;
                    ArtistStage::HaveCleaned
                }
                ArtistStage::HaveCleaned => ArtistStage::HaveCleaned,
            };
        }

        log::info!(
            "Finished {} in {}: {} songs cleaned, {} skipped",
            artist,
            format_duration(start.elapsed()),
            report.cleaned_songs,
            report.skipped.len()
        );
        Ok(report)
    }

    fn filter_stage(
        &self,
        artist: &str,
        paths: &CorpusPaths,
        report: &mut ArtistReport,
    ) -> Result<Vec<SongRecord>> {
        if self.options.skip_existing && paths.filtered.exists() {
            log::info!("Using existing {}", paths.filtered.display());
            let records: Vec<SongRecord> = read_records(&paths.filtered)?;
            report.filtered_songs = records.len();
            return Ok(records);
        }

        let raw = load_raw_corpus(&paths.raw)?;
        report.raw_songs = raw.songs.len();
        let records = filter_corpus(artist, &raw);

        validate_output_path(&paths.filtered, "filtered_data", &[&paths.raw])?;
        write_records(&paths.filtered, &records)?;
        log::info!(
            "Filtered {} songs into {}",
            records.len(),
            paths.filtered.display()
        );
        report.filtered_songs = records.len();
        Ok(records)
    }

    fn clean_stage(
        &self,
        filtered: &[SongRecord],
        paths: &CorpusPaths,
        report: &mut ArtistReport,
    ) -> Result<()> {
        let records: Vec<CleanedSongRecord> =
            if self.options.skip_existing && paths.cleaned.exists() {
                log::info!("Using existing {}", paths.cleaned.display());
                read_records(&paths.cleaned)?
            } else {
                let corpus = self
                    .cleaner
                    .clean_corpus(filtered, self.options.failure_policy)?;
                validate_output_path(&paths.cleaned, "cleaned_data", &[&paths.raw, &paths.filtered])?;
                write_records(&paths.cleaned, &corpus.records)?;
                log::info!(
                    "Cleaned {} songs into {}",
                    corpus.records.len(),
                    paths.cleaned.display()
                );
                report.skipped = corpus.skipped;
                corpus.records
            };

        report.cleaned_songs = records.len();
        report.unique_words = unique_word_count(&records);
        report.top_terms = term_frequencies(&records);
        report.top_terms.truncate(self.options.top_terms);
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
