//! Cleaning pipeline: filtered lyrics → lemmatized text, tokens, content tokens.
//!
//! Per song, in order:
//! 1. split lyrics into lines
//! 2. segment lines into sentences and tokens ([`SentenceTokenizer`])
//! 3. lemmatize every token ([`Lemmatizer`])
//! 4. join lemmas into `lemmatized_text`, each preceded by a space
//! 5. re-tokenize that text ([`WordTokenizer`])
//! 6. drop stopwords
//!
//! Steps 2 and 5 use different tokenizers on purpose; collapsing them changes
//! the output for abbreviations, URLs and emoticons.

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::lemma::Lemmatizer;
use crate::models::{CleanedSongRecord, SongRecord};
use crate::progress::{advance, phase_bar, Phase};
use crate::stopwords::StopwordSet;
use crate::tokenize::{SentenceTokenizer, WordTokenizer};

/// What to do when one song cannot be cleaned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Leave the song out and log a warning.
    #[default]
    Skip,
    /// Fail the whole corpus.
    Abort,
}

/// Result of cleaning one corpus.
#[derive(Debug, Default)]
pub struct CleanedCorpus {
    pub records: Vec<CleanedSongRecord>,
    /// Titles of songs left out under [`FailurePolicy::Skip`].
    pub skipped: Vec<String>,
}

/// Stateless song cleaner; share one instance across songs and artists.
#[derive(Debug, Clone)]
pub struct Cleaner {
    sentences: SentenceTokenizer,
    lemmatizer: Lemmatizer,
    words: WordTokenizer,
    stopwords: StopwordSet,
}

impl Cleaner {
    pub fn new(
        sentences: SentenceTokenizer,
        lemmatizer: Lemmatizer,
        words: WordTokenizer,
        stopwords: StopwordSet,
    ) -> Self {
        Self {
            sentences,
            lemmatizer,
            words,
            stopwords,
        }
    }

    pub fn stopwords(&self) -> &StopwordSet {
        &self.stopwords
    }

    /// Lemmatized text of a song's lyrics: `" " + lemma` for every token.
    pub fn lemmatize_lyrics(&self, lyrics: &str) -> std::result::Result<String, String> {
        let lines = lyrics.split('\n').map(|line| line.trim_end_matches('\r'));
        let sentences = self
            .sentences
            .tokenize_lines(lines)
            .map_err(|e| e.to_string())?;

        let mut lemmatized = String::new();
        for token in sentences.iter().flatten() {
            lemmatized.push(' ');
            lemmatized.push_str(&self.lemmatizer.lemmatize(&token.text));
        }
        Ok(lemmatized)
    }

    /// Clean one song. Either all three derived fields are produced or the
    /// song fails as a whole.
    pub fn clean_song(&self, song: &SongRecord) -> Result<CleanedSongRecord> {
        let lemmatized_text =
            self.lemmatize_lyrics(&song.lyrics)
                .map_err(|reason| Error::MalformedText {
                    title: song.title.clone(),
                    reason,
                })?;
        let tokens = self.words.tokenize(&lemmatized_text);
        let filtered_tokens = self.stopwords.retain_content(&tokens);

        Ok(CleanedSongRecord {
            song: song.clone(),
            lemmatized_text,
            tokens,
            filtered_tokens,
        })
    }

    /// Clean a corpus on the rayon pool. Output keeps input order.
    pub fn clean_corpus(&self, songs: &[SongRecord], policy: FailurePolicy) -> Result<CleanedCorpus> {
        let pb = phase_bar(Phase::Clean, songs.len() as u64, "Cleaning");

        let results: Vec<Result<CleanedSongRecord>> = songs
            .par_iter()
            .map(|song| {
                let result = self.clean_song(song);
                advance(&pb, Phase::Clean);
                result
            })
            .collect();

        let mut corpus = CleanedCorpus::default();
        for (song, result) in songs.iter().zip(results) {
            match result {
                Ok(record) => corpus.records.push(record),
                Err(e) if policy == FailurePolicy::Skip => {
                    log::warn!("Skipping song {:?}: {}", song.title, e);
                    corpus.skipped.push(song.title.clone());
                }
                Err(e) => {
                    pb.abandon_with_message(format!("Cleaning failed at {:?}", song.title));
                    return Err(e);
                }
            }
        }

        pb.finish_with_message(format!("Cleaned {} songs", corpus.records.len()));
        Ok(corpus)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lemma::{Lexicon, UnknownWordPolicy};

    fn cleaner() -> Cleaner {
        Cleaner::new(
            SentenceTokenizer::default(),
            Lemmatizer::new(Lexicon::embedded().unwrap(), UnknownWordPolicy::Lowercase),
            WordTokenizer,
            StopwordSet::embedded(),
        )
    }

    fn song(title: &str, lyrics: &str) -> SongRecord {
        SongRecord {
            artist: "Die Fantastischen Vier".into(),
            title: title.into(),
            album: "Lauschgift".into(),
            date: "1995-01-01".into(),
            lyrics: lyrics.into(),
        }
    }

    fn is_subsequence(needle: &[String], haystack: &[String]) -> bool {
        let mut rest = haystack.iter();
        needle.iter().all(|n| rest.any(|h| h == n))
    }

    #[test]
    fn test_end_to_end_song() {
        let filtered = crate::filter::strip_section_markers(
            "[Hook]\nIch gehe nach Hause\n[Verse]\nDu bist schön",
        );
        let record = cleaner().clean_song(&song("Zuhause", &filtered)).unwrap();
        assert_eq!(record.lemmatized_text, " ich gehen nach hause du sein schön");
        assert_eq!(
            record.tokens,
            vec!["ich", "gehen", "nach", "hause", "du", "sein", "schön"]
        );
        assert_eq!(record.filtered_tokens, vec!["hause", "schön"]);
        assert_eq!(record.song.lyrics, filtered);
    }

    #[test]
    fn test_punctuation_survives_filtering() {
        let record = cleaner().clean_song(&song("T", "Geld, Geld!")).unwrap();
        assert_eq!(record.tokens, vec!["geld", ",", "geld", "!"]);
        assert_eq!(record.filtered_tokens, record.tokens);
    }

    #[test]
    fn test_filtered_is_subsequence_without_stopwords() {
        let cleaner = cleaner();
        let lyrics = [
            "Ich hab dich so vermisst, z.B. gestern\nwww.genius.com :)",
            "Wir sind die Fantastischen Vier\nUnd das ist unser Lied.",
            "",
            "HausTür zu -- und weg",
        ];
        for text in lyrics {
            let record = cleaner.clean_song(&song("T", text)).unwrap();
            assert!(record.filtered_tokens.len() <= record.tokens.len());
            assert!(is_subsequence(&record.filtered_tokens, &record.tokens));
            assert!(record
                .filtered_tokens
                .iter()
                .all(|t| !cleaner.stopwords().contains(t)));
            let removed = record
                .tokens
                .iter()
                .filter(|t| cleaner.stopwords().contains(t))
                .count();
            assert_eq!(record.tokens.len() - removed, record.filtered_tokens.len());
        }
    }

    #[test]
    fn test_deterministic() {
        let cleaner = cleaner();
        let input = song("T", "Die Häuser brennen\nund wir tanzen, tanzen");
        let first = cleaner.clean_song(&input).unwrap();
        let second = cleaner.clean_song(&input).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_lyrics() {
        let record = cleaner().clean_song(&song("Leer", "")).unwrap();
        assert_eq!(record.lemmatized_text, "");
        assert!(record.tokens.is_empty());
        assert!(record.filtered_tokens.is_empty());
    }

    #[test]
    fn test_malformed_song_fails_whole() {
        let err = cleaner()
            .clean_song(&song("Binär", "ok\n\u{1}\u{2}"))
            .unwrap_err();
        assert!(matches!(err, Error::MalformedText { ref title, .. } if title == "Binär"));
    }

    #[test]
    fn test_corpus_skip_policy() {
        let songs = vec![
            song("Eins", "Ich tanze"),
            song("Kaputt", "\u{0}"),
            song("Drei", "Du lachst"),
        ];
        let corpus = cleaner().clean_corpus(&songs, FailurePolicy::Skip).unwrap();
        assert_eq!(corpus.records.len(), 2);
        assert_eq!(corpus.records[0].song.title, "Eins");
        assert_eq!(corpus.records[1].song.title, "Drei");
        assert_eq!(corpus.skipped, vec!["Kaputt"]);
    }

    #[test]
    fn test_corpus_abort_policy() {
        let songs = vec![song("Eins", "Ich tanze"), song("Kaputt", "\u{0}")];
        assert!(cleaner().clean_corpus(&songs, FailurePolicy::Abort).is_err());
    }

    #[test]
    fn test_corpus_order_matches_sequential() {
        let cleaner = cleaner();
        let songs: Vec<SongRecord> = (0..40)
            .map(|i| song(&format!("Song {i}"), &format!("Zeile {i}\nWir machten {i} Sachen")))
            .collect();
        let corpus = cleaner.clean_corpus(&songs, FailurePolicy::Abort).unwrap();
        let sequential: Vec<CleanedSongRecord> =
            songs.iter().map(|s| cleaner.clean_song(s).unwrap()).collect();
        assert_eq!(corpus.records, sequential);
    }

    #[test]
    fn test_empty_corpus() {
        let corpus = cleaner().clean_corpus(&[], FailurePolicy::Skip).unwrap();
        assert!(corpus.records.is_empty());
        assert!(corpus.skipped.is_empty());
    }
}
