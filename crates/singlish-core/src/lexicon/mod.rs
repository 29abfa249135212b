//! Literal-term lexicon.
//!
//! Holds the words that stay verbatim (brands, technology terms) and the
//! unit suffixes a numeral may carry. Both lists match ASCII
//! case-insensitively.

use std::collections::HashSet;

use serde::Deserialize;

pub(crate) const DEFAULT_LEXICON_TOML: &str = include_str!("default_lexicon.toml");

/// The embedded default lexicon source.
pub fn default_toml() -> &'static str {
    DEFAULT_LEXICON_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum LexiconError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("empty entry in `{0}`")]
    EmptyEntry(&'static str),
    #[error("entry {0:?} is not a single word of letters")]
    NotAWord(String),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct LexiconFile {
    #[serde(default)]
    terms: Vec<String>,
    #[serde(default)]
    units: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    terms: HashSet<String>,
    units: HashSet<String>,
}

impl Lexicon {
    pub fn builtin() -> Result<Self, LexiconError> {
        Self::from_toml(DEFAULT_LEXICON_TOML)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_toml(toml_str: &str) -> Result<Self, LexiconError> {
        let file: LexiconFile =
            toml::from_str(toml_str).map_err(|e| LexiconError::Parse(e.to_string()))?;
        Ok(Self {
            terms: normalize("terms", file.terms)?,
            units: normalize("units", file.units)?,
        })
    }

    pub fn is_term(&self, word: &str) -> bool {
        self.terms.contains(&word.to_ascii_lowercase())
    }

    pub fn is_unit(&self, word: &str) -> bool {
        self.units.contains(&word.to_ascii_lowercase())
    }

    /// `(terms, units)`
    pub fn counts(&self) -> (usize, usize) {
        (self.terms.len(), self.units.len())
    }
}

fn normalize(list: &'static str, entries: Vec<String>) -> Result<HashSet<String>, LexiconError> {
    let mut out = HashSet::with_capacity(entries.len());
    for entry in entries {
        if entry.is_empty() {
            return Err(LexiconError::EmptyEntry(list));
        }
        if !entry.chars().all(char::is_alphabetic) {
            return Err(LexiconError::NotAWord(entry));
        }
        out.insert(entry.to_ascii_lowercase());
    }
    Ok(out)
}
