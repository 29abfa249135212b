use std::sync::Arc;

use tracing::{debug, debug_span};

use crate::classifier::{Classification, Classifier};
use crate::compose::compose;
use crate::error::EngineError;
use crate::formatter::Formatter;
use crate::lexicon::Lexicon;
use crate::mapping::{map_word, render};
use crate::rules::RuleTable;
use crate::settings::{parse_settings_toml, Settings};
use crate::tokenizer::{Token, TokenKind, Tokenizer};

/// Singlish to Sinhala transliterator.
///
/// Holds the rule table, lexicon and settings it was built with. All three are
/// immutable and shared by `Arc`, so a `Transliterator` is cheap to clone and
/// can be used from many threads at once. Tables of different versions can
/// live side by side in separate instances.
#[derive(Clone)]
pub struct Transliterator {
    rules: Arc<RuleTable>,
    lexicon: Arc<Lexicon>,
    settings: Arc<Settings>,
}

impl Transliterator {
    pub fn new(rules: Arc<RuleTable>, lexicon: Arc<Lexicon>, settings: Arc<Settings>) -> Self {
        Self {
            rules,
            lexicon,
            settings,
        }
    }

    /// Build from the embedded default rule table, lexicon and settings.
    pub fn builtin() -> Result<Self, EngineError> {
        Ok(Self::new(
            Arc::new(RuleTable::builtin()?),
            Arc::new(Lexicon::builtin()?),
            Arc::new(Settings::builtin()?),
        ))
    }

    /// Build from TOML sources. Every source is validated; any failure is
    /// reported before the engine can be used.
    pub fn from_toml(rules: &str, lexicon: &str, settings: &str) -> Result<Self, EngineError> {
        Ok(Self::new(
            Arc::new(RuleTable::from_toml(rules)?),
            Arc::new(Lexicon::from_toml(lexicon)?),
            Arc::new(parse_settings_toml(settings)?),
        ))
    }

    /// Translate `text`. Total over all input: unmapped characters and
    /// literal words are carried through, and everything outside phonetic
    /// words (spacing, punctuation, line breaks) is copied byte for byte.
    pub fn translate(&self, text: &str) -> String {
        let _span = debug_span!("translate", len = text.len()).entered();

        let tokens = self.tokenizer().tokenize(text);
        let classifier = self.classifier();
        let mut out = Formatter::new(text);
        let mut rendered_words = 0usize;

        for token in &tokens {
            if token.kind != TokenKind::Phonetic {
                out.push_verbatim(token.span.clone());
                continue;
            }
            let word = token.text(text);
            let units = map_word(&self.rules, word);
            match classifier.classify_mapped(word, &units) {
                Classification::Phonetic => {
                    let raw = render(&units);
                    out.push_rendered(token.span.clone(), &compose(self.rules.ligatures(), &raw));
                    rendered_words += 1;
                }
                Classification::Literal { .. } => out.push_verbatim(token.span.clone()),
            }
        }

        debug!(tokens = tokens.len(), rendered_words);
        out.finish()
    }

    /// Tokenize and relabel phonetic runs the classifier keeps as literals.
    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        let classifier = self.classifier();
        let mut tokens = self.tokenizer().tokenize(text);
        for token in &mut tokens {
            if token.kind == TokenKind::Phonetic
                && classifier.classify(token.text(text)).is_literal()
            {
                token.kind = TokenKind::Literal;
            }
        }
        tokens
    }

    /// Map and compose a single word, ignoring passthrough classification.
    pub fn render_word(&self, word: &str) -> String {
        let units = map_word(&self.rules, word);
        compose(self.rules.ligatures(), &render(&units))
    }

    pub fn classifier(&self) -> Classifier<'_> {
        Classifier::new(&self.rules, &self.lexicon, &self.settings.passthrough)
    }

    pub fn tokenizer(&self) -> Tokenizer<'_> {
        Tokenizer::new(&self.lexicon, &self.settings.numerals)
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}
