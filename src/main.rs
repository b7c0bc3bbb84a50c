use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use lyrics_corpus::config::Config;
use lyrics_corpus::driver::{BatchDriver, BatchSummary, DriverOptions};
use lyrics_corpus::lemma::UnknownWordPolicy;
use lyrics_corpus::progress::{format_duration, set_log_only};
use lyrics_corpus::scrape::{GeniusScraper, ScrapeOptions};

#[derive(Parser)]
#[command(name = "lyrics-corpus")]
#[command(about = "Scrape, filter and lemmatize German lyrics into per-artist corpora")]
struct Args {
    /// Artists to process (comma-separated). Defaults to the built-in list
    #[arg(long)]
    artists: Option<String>,

    /// Root directory of the per-artist corpus files
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Stopword list replacing the embedded one (one word per line)
    #[arg(long)]
    stopwords: Option<PathBuf>,

    /// Lexicon replacing the embedded one (TSV: form, lemma, tag, weight)
    #[arg(long)]
    lexicon: Option<PathBuf>,

    /// Keep unknown words as written instead of lowercasing them
    #[arg(long)]
    keep_unknown_case: bool,

    /// Reuse existing filtered/cleaned files instead of recomputing them
    #[arg(long)]
    skip_existing: bool,

    /// Fail an artist on the first song that cannot be cleaned
    #[arg(long)]
    strict: bool,

    #[arg(long, default_value = "0")]
    workers: usize,

    /// Disable progress bars, log progress lines instead (for redirected output)
    #[arg(long)]
    log_only: bool,

    /// Most frequent terms shown per artist
    #[arg(long, default_value = "10")]
    top: usize,
}

impl Args {
    fn into_config(self) -> Config {
        let mut config = Config::load();
        if let Some(list) = self.artists {
            config.artists = list
                .split(',')
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty())
                .collect();
        }
        config.data_dir = self.data_dir;
        config.stopwords_path = self.stopwords;
        config.lexicon_path = self.lexicon;
        if self.keep_unknown_case {
            config.unknown_word_policy = UnknownWordPolicy::Verbatim;
        }
        config.skip_existing = self.skip_existing;
        config.strict = self.strict;
        config.top_terms = self.top;
        config
    }
}

fn print_summary(summary: &BatchSummary, elapsed: Duration) {
    println!("\n{:=<60}", "");
    println!("Corpus build complete!");
    for report in &summary.reports {
        println!(
            "  {}: {} songs cleaned{}, {} unique words",
            report.artist,
            report.cleaned_songs,
            if report.scraped { " (scraped)" } else { "" },
            report.unique_words
        );
        if !report.skipped.is_empty() {
            println!("    skipped: {}", report.skipped.join(", "));
        }
        if !report.top_terms.is_empty() {
            let terms: Vec<String> = report
                .top_terms
                .iter()
                .map(|(term, count)| format!("{term} ({count})"))
                .collect();
            println!("    top: {}", terms.join(", "));
        }
    }
    for (artist, error) in &summary.failed {
        println!("  {}: FAILED ({})", artist, error);
    }
    println!("  Elapsed: {}", format_duration(elapsed));
    println!("{:=<60}", "");
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    set_log_only(args.log_only);

    if args.workers > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(args.workers)
            .build_global()
            .context("Failed to set thread pool size")?;
    }

    let start = Instant::now();
    let config = args.into_config();
    if config.artists.is_empty() {
        bail!("No artists given");
    }
    log::info!("Processing {} artists under {:?}", config.artists.len(), config.data_dir);

    let cleaner = config
        .cleaner()
        .context("Failed to load language resources")?;
    let scraper = match config.access_token.as_deref() {
        Some(token) => Some(
            GeniusScraper::new(token, ScrapeOptions::default())
                .context("Failed to build HTTP client")?,
        ),
        None => None,
    };

    let driver = BatchDriver::new(
        config.data_dir.clone(),
        scraper,
        cleaner,
        DriverOptions {
            skip_existing: config.skip_existing,
            failure_policy: config.failure_policy(),
            top_terms: config.top_terms,
        },
    );
    let summary = driver.run(&config.artists)?;
    print_summary(&summary, start.elapsed());

    if !summary.is_success() {
        bail!(
            "{} of {} artists failed: {}",
            summary.failed.len(),
            config.artists.len(),
            summary.failed_artists().join(", ")
        );
    }
    Ok(())
}
