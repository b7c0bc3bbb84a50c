//! Lexicon-based German lemmatizer.
//!
//! The lexicon maps surface forms to ranked analyses (lemma, tag, weight).
//! Regular weak verbs and adjectives are declared once with `@weak` / `@adj`
//! and their inflected forms are generated at load time, below the weight of
//! explicit entries so irregular forms always win.

use rustc_hash::FxHashMap;
use std::path::Path;

use crate::error::{Error, Result};

const EMBEDDED: &str = include_str!("../resources/lexicon_de.tsv");

/// Weight of explicit entries that do not give one.
pub const DEFAULT_WEIGHT: f32 = 1.0;
/// Weight of paradigm-generated forms.
pub const GENERATED_WEIGHT: f32 = 0.5;

/// Inseparable verb prefixes: no "ge-" in the participle.
const INSEPARABLE_PREFIXES: &[&str] = &["be", "emp", "ent", "er", "ge", "miss", "ver", "zer"];

// ============================================================================
// LEXICON
// ============================================================================

/// One morphological reading of a surface form.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub lemma: String,
    pub tag: String,
    pub weight: f32,
}

#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    entries: FxHashMap<String, Vec<Analysis>>,
}

impl Lexicon {
    /// The built-in German lexicon.
    pub fn embedded() -> Result<Self> {
        Self::parse(EMBEDDED, "embedded lexicon_de.tsv")
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::parse(&text, &path.display().to_string())
    }

    /// Parse the TSV format. `origin` names the source in error messages.
    pub fn parse(text: &str, origin: &str) -> Result<Self> {
        let mut lexicon = Self::default();
        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim_end();
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let invalid = |message: String| Error::Resource {
                origin: origin.to_string(),
                line: index + 1,
                message,
            };

            let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
            if fields.len() < 3 || fields[..3].iter().any(|f| f.is_empty()) {
                return Err(invalid(format!(
                    "expected form, lemma and tag separated by tabs, got {line:?}"
                )));
            }
            let (form, lemma, tag) = (fields[0], fields[1].to_lowercase(), fields[2]);

            match form {
                "@weak" => {
                    let forms = weak_verb_forms(&lemma)
                        .ok_or_else(|| invalid(format!("not an infinitive: {lemma:?}")))?;
                    for generated in forms {
                        lexicon.insert(&generated, &lemma, tag, GENERATED_WEIGHT);
                    }
                }
                "@adj" => {
                    for generated in adjective_forms(&lemma) {
                        lexicon.insert(&generated, &lemma, tag, GENERATED_WEIGHT);
                    }
                }
                directive if directive.starts_with('@') => {
                    return Err(invalid(format!("unknown directive {directive:?}")));
                }
                _ => {
                    let weight = match fields.get(3) {
                        Some(w) => w
                            .parse::<f32>()
                            .ok()
                            .filter(|w| w.is_finite())
                            .ok_or_else(|| invalid(format!("invalid weight {w:?}")))?,
                        None => DEFAULT_WEIGHT,
                    };
                    lexicon.insert(form, &lemma, tag, weight);
                }
            }
        }
        lexicon.rank();
        Ok(lexicon)
    }

    fn insert(&mut self, form: &str, lemma: &str, tag: &str, weight: f32) {
        let analyses = self.entries.entry(form.to_string()).or_default();
        // Same reading declared twice keeps the higher weight
        if let Some(existing) = analyses
            .iter_mut()
            .find(|a| a.lemma == lemma && a.tag == tag)
        {
            existing.weight = existing.weight.max(weight);
            return;
        }
        analyses.push(Analysis {
            lemma: lemma.to_string(),
            tag: tag.to_string(),
            weight,
        });
    }

    /// Highest weight first; equal weights keep declaration order.
    fn rank(&mut self) {
        for analyses in self.entries.values_mut() {
            analyses.sort_by(|a, b| b.weight.total_cmp(&a.weight));
        }
    }

    /// Ranked analyses for an exact surface form.
    pub fn analyses(&self, form: &str) -> &[Analysis] {
        self.entries.get(form).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// PARADIGMS
// ============================================================================

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'ä' | 'ö' | 'ü' | 'y')
}

/// Stems like "arbeit", "red", "atm", "öffn" take an extra "e" before
/// "st"/"t"/"te".
fn needs_e_insertion(stem: &str) -> bool {
    let mut rev = stem.chars().rev();
    match (rev.next(), rev.next()) {
        (Some('t' | 'd'), _) => true,
        (Some('m' | 'n'), Some(prev)) => !is_vowel(prev) && !matches!(prev, 'l' | 'r' | 'm' | 'n' | 'h'),
        _ => false,
    }
}

/// Present, preterite, imperative and participle forms of a regular weak
/// verb. Returns `None` when `lemma` is not an infinitive.
pub fn weak_verb_forms(lemma: &str) -> Option<Vec<String>> {
    let (stem, e_stem) = if lemma.ends_with("eln") || lemma.ends_with("ern") {
        (&lemma[..lemma.len() - 1], false)
    } else if let Some(stem) = lemma.strip_suffix("en") {
        (stem, needs_e_insertion(stem))
    } else {
        return None;
    };
    if stem.is_empty() {
        return None;
    }

    let linker = if e_stem { "e" } else { "" };
    let sibilant = stem.ends_with(['s', 'ß', 'z', 'x']);
    let mut forms = vec![lemma.to_string(), stem.to_string()];

    if !lemma.ends_with("eln") {
        forms.push(format!("{stem}e"));
    }
    if sibilant {
        forms.push(format!("{stem}t"));
    } else {
        forms.push(format!("{stem}{linker}st"));
    }
    forms.push(format!("{stem}{linker}t"));
    for ending in ["te", "test", "ten", "tet"] {
        forms.push(format!("{stem}{linker}{ending}"));
    }

    let no_ge = lemma.ends_with("ieren")
        || INSEPARABLE_PREFIXES
            .iter()
            .any(|p| lemma.starts_with(p) && lemma.len() > p.len() + 3);
    if no_ge {
        forms.push(format!("{stem}{linker}t"));
    } else {
        forms.push(format!("ge{stem}{linker}t"));
    }

    forms.dedup();
    Some(forms)
}

/// Attributive endings of an adjective: "schön" → "schöne", "schönen", ...
pub fn adjective_forms(lemma: &str) -> Vec<String> {
    let base = lemma.strip_suffix('e').unwrap_or(lemma);
    let mut forms = vec![lemma.to_string()];
    forms.extend(["e", "en", "er", "es", "em"].iter().map(|ending| format!("{base}{ending}")));
    forms.dedup();
    forms
}

// ============================================================================
// LEMMATIZER
// ============================================================================

/// What a token without any analysis becomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownWordPolicy {
    /// Lowercased token, matching the case of lexicon lemmas.
    #[default]
    Lowercase,
    /// Token unchanged.
    Verbatim,
}

#[derive(Debug, Clone)]
pub struct Lemmatizer {
    lexicon: Lexicon,
    unknown: UnknownWordPolicy,
}

impl Lemmatizer {
    pub fn new(lexicon: Lexicon, unknown: UnknownWordPolicy) -> Self {
        Self { lexicon, unknown }
    }

    /// Ranked analyses: the exact form if the lexicon knows it, otherwise
    /// its lowercase ("Ich" → "ich", but "Liebe" stays a noun).
    pub fn analyze(&self, token: &str) -> &[Analysis] {
        let exact = self.lexicon.analyses(token);
        if !exact.is_empty() {
            return exact;
        }
        self.lexicon.analyses(&token.to_lowercase())
    }

    /// Lemma of the top-ranked analysis, or the unknown-word fallback.
    pub fn lemmatize(&self, token: &str) -> String {
        match self.analyze(token).first() {
            Some(top) => top.lemma.clone(),
            None => match self.unknown {
                UnknownWordPolicy::Lowercase => token.to_lowercase(),
                UnknownWordPolicy::Verbatim => token.to_string(),
            },
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
