//! Progress display for batch runs.
//!
//! Every bar joins one [`MultiProgress`]: the artist bar stays on screen while
//! the scrape and clean bars of the current artist come and go below it. In
//! log-only mode bars are hidden and progress goes to the log instead, which
//! keeps output readable when redirected to a file.

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use once_cell::sync::Lazy;
use std::fmt::Display;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Global flag for log-only mode (set from args in main)
pub static LOG_ONLY: AtomicBool = AtomicBool::new(false);

static BARS: Lazy<MultiProgress> = Lazy::new(MultiProgress::new);

pub fn set_log_only(value: bool) {
    LOG_ONLY.store(value, Ordering::Relaxed);
}

pub fn is_log_only() -> bool {
    LOG_ONLY.load(Ordering::Relaxed)
}

/// What a bar counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Artists of the batch
    Artists,
    /// Songs fetched from Genius for one artist
    Scrape,
    /// Songs cleaned for one artist
    Clean,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::Artists => "artists",
            Phase::Scrape => "scrape",
            Phase::Clean => "clean",
        }
    }

    fn template(self) -> &'static str {
        match self {
            Phase::Artists => "{prefix:.bold} [{elapsed_precise}] [{wide_bar:.green/white}] {pos}/{len} {msg}",
            Phase::Scrape => "  {spinner} {prefix} [{bar:30.yellow/blue}] {pos}/{len} {msg}",
            Phase::Clean => "  {prefix} [{bar:30.cyan/blue}] {pos}/{len} ({per_sec}, ETA: {eta}) {msg}",
        }
    }

    /// Items between two log lines in log-only mode.
    fn log_interval(self) -> u64 {
        match self {
            Phase::Artists => 1,
            Phase::Scrape => 10,
            Phase::Clean => 25,
        }
    }
}

/// "850ms", "12.4s", "3m 05s", "1h 02m".
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs == 0 {
        format!("{}ms", d.as_millis())
    } else if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {:02}s", secs / 60, secs % 60)
    } else {
        format!("{}h {:02}m", secs / 3600, secs % 3600 / 60)
    }
}

/// Bar for one phase, attached to the shared display. Hidden in log-only mode.
/// Scrape bars start at length 0 and tick while the song list is fetched.
pub fn phase_bar(phase: Phase, len: u64, prefix: &str) -> ProgressBar {
    let pb = if is_log_only() {
        ProgressBar::with_draw_target(Some(len), ProgressDrawTarget::hidden())
    } else {
        let pb = BARS.add(ProgressBar::new(len));
        pb.set_style(
            ProgressStyle::with_template(phase.template())
                .unwrap()
                .progress_chars("=> "),
        );
        if phase == Phase::Scrape {
            pb.enable_steady_tick(Duration::from_millis(120));
        }
        pb
    };
    pb.set_prefix(prefix.to_string());
    pb
}

/// Count one finished item. In log-only mode, log every few items and at the end.
pub fn advance(pb: &ProgressBar, phase: Phase) {
    pb.inc(1);
    if !is_log_only() {
        return;
    }
    let current = pb.position();
    let total = pb.length().unwrap_or(0);
    if total > 0 && (current % phase.log_interval() == 0 || current == total) {
        let pct = 100.0 * current as f64 / total as f64;
        log::info!(
            "[{} {}] {}/{} ({:.1}%)",
            phase.label(),
            pb.prefix(),
            current,
            total,
            pct
        );
    }
}

/// Close a bar with the outcome of the work it tracked. A failed phase
/// leaves the bar where it stopped, with the error as its message.
pub fn finish_phase<T, E: Display>(
    pb: &ProgressBar,
    result: &std::result::Result<T, E>,
    done: impl FnOnce(&T) -> String,
) {
    match result {
        Ok(value) => pb.finish_with_message(done(value)),
        Err(e) => pb.abandon_with_message(format!("failed: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(850)), "850ms");
        assert_eq!(format_duration(Duration::from_millis(12_400)), "12.4s");
        assert_eq!(format_duration(Duration::from_secs(185)), "3m 05s");
        assert_eq!(format_duration(Duration::from_secs(3720)), "1h 02m");
    }

    #[test]
    fn test_phase_bar_counts() {
        let pb = phase_bar(Phase::Clean, 3, "Shindy");
        advance(&pb, Phase::Clean);
        advance(&pb, Phase::Clean);
        assert_eq!(pb.position(), 2);
        assert_eq!(pb.length(), Some(3));
        assert_eq!(pb.prefix(), "Shindy");
    }

    #[test]
    fn test_scrape_bar_grows_once_songs_are_known() {
        let pb = phase_bar(Phase::Scrape, 0, "Credibil");
        pb.set_length(12);
        advance(&pb, Phase::Scrape);
        assert_eq!(pb.length(), Some(12));
        assert_eq!(pb.position(), 1);
        pb.finish();
    }

    #[test]
    fn test_finish_phase_error_abandons_bar() {
        let pb = phase_bar(Phase::Scrape, 5, "Heinrich Heine");
        let result: std::result::Result<usize, String> = Err("timeout".into());
        finish_phase(&pb, &result, |n| format!("{n} songs"));
        assert!(pb.is_finished());
        assert_eq!(pb.message(), "failed: timeout");
        assert_eq!(pb.position(), 0);
    }

    #[test]
    fn test_finish_phase_success_message() {
        let pb = phase_bar(Phase::Artists, 1, "Artists");
        advance(&pb, Phase::Artists);
        let result: std::result::Result<usize, String> = Ok(1);
        finish_phase(&pb, &result, |n| format!("{n} done"));
        assert!(pb.is_finished());
        assert_eq!(pb.message(), "1 done");
    }
}
