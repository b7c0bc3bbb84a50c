//! Tokenizers for German lyric text.
//!
//! Two tokenizers with deliberately different rules:
//! - [`SentenceTokenizer`] segments lyric lines into sentences of classified
//!   tokens (URLs, abbreviations, camel-case compounds). Its tokens are what
//!   gets lemmatized.
//! - [`WordTokenizer`] is a plain word/punctuation splitter applied to the
//!   lemmatized text afterwards.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

// ============================================================================
// REGEX PATTERNS
// ============================================================================

/// Token alternatives, tried left to right at each position.
static SENTENCE_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?P<url>(?:https?://|www\.)\S+)",
        r"|(?P<emoticon>[:;]-?[()])",
        r"|(?P<abbrev>(?:\p{L}\.){2,})",
        r"|(?P<number>\d+(?:[.,:]\d+)*)",
        r"|(?P<word>[\p{L}\p{M}][\p{L}\p{M}\d]*(?:[-'’][\p{L}\p{M}\d]+)*)",
        r"|(?P<ellipsis>\.{2,}|…)",
        r"|(?P<punct>\S)",
    ))
    .unwrap()
});

/// General-purpose word pattern used for re-tokenization.
static WORD_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\p{L}\.){2,}|\.{3}|-{2,}|\d+(?:[.,]\d+)*|[\p{L}\p{M}\d_]+(?:[-'’][\p{L}\p{M}\d_]+)*|\S")
        .unwrap()
});

// ============================================================================
// TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Word,
    Number,
    Abbreviation,
    Url,
    Emoticon,
    Punctuation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub kind: TokenKind,
}

impl Token {
    fn new(text: impl Into<String>, kind: TokenKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    fn ends_sentence(&self) -> bool {
        self.kind == TokenKind::Punctuation
            && (matches!(self.text.as_str(), "." | "!" | "?" | "…") || self.text.starts_with(".."))
    }
}

pub type Sentence = Vec<Token>;

/// Input the tokenizer refuses to process.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct MalformedInput(pub String);

// ============================================================================
// SENTENCE TOKENIZER
// ============================================================================

/// Sentence splitter and tokenizer for German web/lyric text.
#[derive(Debug, Clone)]
pub struct SentenceTokenizer {
    split_camel_case: bool,
}

impl Default for SentenceTokenizer {
    fn default() -> Self {
        Self {
            split_camel_case: true,
        }
    }
}

impl SentenceTokenizer {
    pub fn new(split_camel_case: bool) -> Self {
        Self { split_camel_case }
    }

    /// Tokenize lines into sentences. Every line closes the current sentence;
    /// blank lines produce nothing.
    pub fn tokenize_lines<'a, I>(&self, lines: I) -> Result<Vec<Sentence>, MalformedInput>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut sentences = Vec::new();
        for (index, line) in lines.into_iter().enumerate() {
            if let Some(c) = line
                .chars()
                .find(|c| c.is_control() && !matches!(c, '\t' | '\n' | '\r'))
            {
                return Err(MalformedInput(format!(
                    "control character U+{:04X} on line {}",
                    c as u32,
                    index + 1
                )));
            }
            let normalized: String = line.nfc().collect();
            self.push_line(&normalized, &mut sentences);
        }
        Ok(sentences)
    }

    fn push_line(&self, line: &str, sentences: &mut Vec<Sentence>) {
        let mut current: Sentence = Vec::new();
        for token in self.tokens(line) {
            // Runs like "?!" stay in the sentence they close
            if current.last().is_some_and(Token::ends_sentence) && !token.ends_sentence() {
                sentences.push(std::mem::take(&mut current));
            }
            current.push(token);
        }
        if !current.is_empty() {
            sentences.push(current);
        }
    }

    fn tokens(&self, line: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        for caps in SENTENCE_TOKEN.captures_iter(line) {
            let (text, kind) = if let Some(m) = caps.name("url") {
                (m.as_str(), TokenKind::Url)
            } else if let Some(m) = caps.name("emoticon") {
                (m.as_str(), TokenKind::Emoticon)
            } else if let Some(m) = caps.name("abbrev") {
                (m.as_str(), TokenKind::Abbreviation)
            } else if let Some(m) = caps.name("number") {
                (m.as_str(), TokenKind::Number)
            } else if let Some(m) = caps.name("word") {
                if self.split_camel_case {
                    tokens.extend(
                        split_camel_case(m.as_str())
                            .into_iter()
                            .map(|part| Token::new(part, TokenKind::Word)),
                    );
                    continue;
                }
                (m.as_str(), TokenKind::Word)
            } else {
                (&caps[0], TokenKind::Punctuation)
            };
            tokens.push(Token::new(text, kind));
        }
        tokens
    }
}

/// Split "HausTür" into "Haus" and "Tür". A split needs at least two
/// characters on the left, so "iPhone" stays whole.
pub fn split_camel_case(word: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut run = 0usize;
    let mut prev_lower = false;
    for (i, c) in word.char_indices() {
        if prev_lower && c.is_uppercase() && run >= 2 {
            parts.push(&word[start..i]);
            start = i;
            run = 0;
        }
        prev_lower = c.is_lowercase();
        run += 1;
    }
    parts.push(&word[start..]);
    parts
}

// ============================================================================
// WORD TOKENIZER
// ============================================================================

/// Splits text into words, numbers and single punctuation marks.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordTokenizer;

impl WordTokenizer {
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        WORD_TOKEN
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(sentence: &Sentence) -> Vec<&str> {
        sentence.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_simple_line() {
        let sentences = SentenceTokenizer::default()
            .tokenize_lines(["Ich gehe nach Hause"])
            .unwrap();
        assert_eq!(sentences.len(), 1);
        assert_eq!(texts(&sentences[0]), vec!["Ich", "gehe", "nach", "Hause"]);
    }

    #[test]
    fn test_sentence_boundaries() {
        let sentences = SentenceTokenizer::default()
            .tokenize_lines(["Hallo. Wie gehts?! Gut"])
            .unwrap();
        assert_eq!(sentences.len(), 3);
        assert_eq!(texts(&sentences[0]), vec!["Hallo", "."]);
        assert_eq!(texts(&sentences[1]), vec!["Wie", "gehts", "?", "!"]);
        assert_eq!(texts(&sentences[2]), vec!["Gut"]);
    }

    #[test]
    fn test_each_line_closes_sentence() {
        let sentences = SentenceTokenizer::default()
            .tokenize_lines(["erste Zeile", "", "   ", "zweite Zeile"])
            .unwrap();
        assert_eq!(sentences.len(), 2);
    }

    #[test]
    fn test_camel_case_split() {
        assert_eq!(split_camel_case("HausTür"), vec!["Haus", "Tür"]);
        assert_eq!(split_camel_case("iPhone"), vec!["iPhone"]);
        assert_eq!(split_camel_case("GELD"), vec!["GELD"]);
        let sentences = SentenceTokenizer::default()
            .tokenize_lines(["die HausTür"])
            .unwrap();
        assert_eq!(texts(&sentences[0]), vec!["die", "Haus", "Tür"]);
        let whole = SentenceTokenizer::new(false)
            .tokenize_lines(["die HausTür"])
            .unwrap();
        assert_eq!(texts(&whole[0]), vec!["die", "HausTür"]);
    }

    #[test]
    fn test_token_kinds() {
        let sentences = SentenceTokenizer::default()
            .tokenize_lines(["z.B. 1.000 Euro auf www.genius.com :)"])
            .unwrap();
        let kinds: Vec<TokenKind> = sentences[0].iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Abbreviation,
                TokenKind::Number,
                TokenKind::Word,
                TokenKind::Word,
                TokenKind::Url,
                TokenKind::Emoticon,
            ]
        );
    }

    #[test]
    fn test_hyphen_and_apostrophe_words() {
        let sentences = SentenceTokenizer::default()
            .tokenize_lines(["Hip-Hop gibt’s"])
            .unwrap();
        assert_eq!(texts(&sentences[0]), vec!["Hip-Hop", "gibt’s"]);
    }

    #[test]
    fn test_nfc_normalization() {
        let sentences = SentenceTokenizer::default()
            .tokenize_lines(["scho\u{0308}n"])
            .unwrap();
        assert_eq!(texts(&sentences[0]), vec!["schön"]);
    }

    #[test]
    fn test_control_characters_rejected() {
        let err = SentenceTokenizer::default()
            .tokenize_lines(["ok", "a\u{0}b"])
            .unwrap_err();
        assert!(err.0.contains("U+0000"));
        assert!(err.0.contains("line 2"));
        assert!(SentenceTokenizer::default()
            .tokenize_lines(["tab\tok\r"])
            .is_ok());
    }

    #[test]
    fn test_word_tokenizer() {
        let tokens = WordTokenizer.tokenize(" ich gehen , nach hause .");
        assert_eq!(tokens, vec!["ich", "gehen", ",", "nach", "hause", "."]);
        assert_eq!(WordTokenizer.tokenize("z.B. ..."), vec!["z.B.", "..."]);
        assert_eq!(WordTokenizer.tokenize("hip-hop 1.000"), vec!["hip-hop", "1.000"]);
        assert!(WordTokenizer.tokenize("   ").is_empty());
    }

    #[test]
    fn test_word_tokenizer_differs_on_urls() {
        let tokens = WordTokenizer.tokenize("www.genius.com");
        assert!(tokens.len() > 1);
    }
}
