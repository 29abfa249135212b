//! Passthrough classification: phonetic Singlish or a literal run.

use serde::Serialize;
use tracing::debug;

use crate::lexicon::Lexicon;
use crate::mapping::{map_word, MappedUnit};
use crate::rules::RuleTable;
use crate::settings::PassthroughSettings;
use crate::tokenizer::{Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "class", rename_all = "snake_case")]
pub enum Classification {
    Phonetic,
    Literal { reason: LiteralReason },
}

impl Classification {
    pub fn is_literal(self) -> bool {
        matches!(self, Classification::Literal { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LiteralReason {
    /// Listed in the lexicon.
    KnownTerm,
    /// All capitals with no vowel rule match.
    Acronym,
    /// No rule covers the character at this byte offset.
    Undecomposable { offset: usize },
    Numeral,
    /// A numeral carrying a unit suffix (2km).
    NumeralUnit,
}

pub struct Classifier<'a> {
    rules: &'a RuleTable,
    lexicon: &'a Lexicon,
    settings: &'a PassthroughSettings,
}

impl<'a> Classifier<'a> {
    pub fn new(
        rules: &'a RuleTable,
        lexicon: &'a Lexicon,
        settings: &'a PassthroughSettings,
    ) -> Self {
        Self {
            rules,
            lexicon,
            settings,
        }
    }

    pub fn classify(&self, word: &str) -> Classification {
        let units = map_word(self.rules, word);
        self.classify_mapped(word, &units)
    }

    /// Classify a word that has already been mapped.
    pub fn classify_mapped(&self, word: &str, units: &[MappedUnit<'_>]) -> Classification {
        let class = self.decide(word, units);
        debug!(word, ?class, "classified");
        class
    }

    fn decide(&self, word: &str, units: &[MappedUnit<'_>]) -> Classification {
        let literal = |reason| Classification::Literal { reason };

        if self.lexicon.is_term(word) {
            return literal(LiteralReason::KnownTerm);
        }
        if let Some(u) = units.iter().find(|u| u.is_unmapped()) {
            return literal(LiteralReason::Undecomposable {
                offset: u.source.start,
            });
        }
        if self.settings.detect_acronyms
            && word.chars().count() >= self.settings.min_acronym_len
            && word.chars().all(|c| c.is_ascii_uppercase())
            && !units.iter().any(|u| u.kind().is_some_and(|k| k.is_vowel()))
        {
            return literal(LiteralReason::Acronym);
        }
        Classification::Phonetic
    }

    /// Classification for tokens that carry one. Whitespace, line breaks and
    /// punctuation return `None`.
    pub fn classify_token(&self, token: &Token, source: &str) -> Option<Classification> {
        let text = token.text(source);
        match token.kind {
            TokenKind::Phonetic => Some(self.classify(text)),
            TokenKind::Numeral => {
                let reason = if text.ends_with(|c: char| c.is_alphabetic()) {
                    LiteralReason::NumeralUnit
                } else {
                    LiteralReason::Numeral
                };
                Some(Classification::Literal { reason })
            }
            TokenKind::Literal => Some(self.classify(text)),
            TokenKind::Punctuation | TokenKind::Whitespace | TokenKind::LineBreak => None,
        }
    }
}
