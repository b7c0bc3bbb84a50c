//! Word statistics over a cleaned corpus: the counts a word cloud is drawn from.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::models::CleanedSongRecord;

/// Count content tokens across all songs. Sorted by count descending, then
/// alphabetically so equal counts have a stable order.
pub fn term_frequencies(records: &[CleanedSongRecord]) -> Vec<(String, usize)> {
    let mut counts: FxHashMap<&str, usize> = FxHashMap::default();
    for token in records.iter().flat_map(|r| &r.filtered_tokens) {
        *counts.entry(token.as_str()).or_insert(0) += 1;
    }

    let mut terms: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(term, count)| (term.to_string(), count))
        .collect();
    terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    terms
}

/// Number of distinct tokens (stopwords included), case-insensitive.
pub fn unique_word_count(records: &[CleanedSongRecord]) -> usize {
    records
        .iter()
        .flat_map(|r| &r.tokens)
        .map(|t| t.to_lowercase())
        .collect::<FxHashSet<_>>()
        .len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SongRecord;

    fn record(tokens: &[&str], filtered: &[&str]) -> CleanedSongRecord {
        CleanedSongRecord {
            song: SongRecord {
                artist: "a".into(),
                title: "t".into(),
                album: "".into(),
                date: "".into(),
                lyrics: "".into(),
            },
            lemmatized_text: String::new(),
            tokens: tokens.iter().map(|s| s.to_string()).collect(),
            filtered_tokens: filtered.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_term_frequencies_order() {
        let records = vec![
            record(&[], &["geld", "liebe", "geld"]),
            record(&[], &["auto", "liebe", "geld"]),
        ];
        assert_eq!(
            term_frequencies(&records),
            vec![
                ("geld".to_string(), 3),
                ("liebe".to_string(), 2),
                ("auto".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_unique_words_case_insensitive() {
        let records = vec![record(&["Geld", "geld", "und"], &[]), record(&["UND", "x"], &[])];
        assert_eq!(unique_word_count(&records), 3);
    }

    #[test]
    fn test_empty() {
        assert!(term_frequencies(&[]).is_empty());
        assert_eq!(unique_word_count(&[]), 0);
    }
}
