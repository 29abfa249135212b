use crate::lexicon::LexiconError;
use crate::rules::RuleTableError;
use crate::settings::SettingsError;

/// Failure to build a [`crate::Transliterator`]. Translation itself never
/// fails.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("rule table: {0}")]
    Rules(#[from] RuleTableError),
    #[error("lexicon: {0}")]
    Lexicon(#[from] LexiconError),
    #[error("settings: {0}")]
    Settings(#[from] SettingsError),
}
