//! Engine settings loaded from TOML.
//!
//! Defaults are embedded via `include_str!("default_settings.toml")`.
//! Settings are plain values handed to the [`crate::Transliterator`]; nothing
//! here is global.

use serde::Deserialize;

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

/// Returns the embedded default settings TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    pub passthrough: PassthroughSettings,
    pub numerals: NumeralSettings,
    pub service: ServiceSettings,
}

impl Settings {
    pub fn builtin() -> Result<Self, SettingsError> {
        parse_settings_toml(DEFAULT_SETTINGS_TOML)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PassthroughSettings {
    /// Keep all-capital words with no vowel (KFC) as literals.
    pub detect_acronyms: bool,
    pub min_acronym_len: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NumeralSettings {
    /// Characters that may join digit groups inside one numeral.
    pub separators: String,
}

impl NumeralSettings {
    pub fn is_separator(&self, c: char) -> bool {
        self.separators.contains(c)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceSettings {
    pub workers: usize,
    /// 0 waits indefinitely.
    pub request_timeout_ms: u64,
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let s: Settings = toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate(&s)?;
    Ok(s)
}

fn validate(s: &Settings) -> Result<(), SettingsError> {
    macro_rules! check_positive_usize {
        ($section:ident . $field:ident) => {
            if s.$section.$field == 0 {
                return Err(SettingsError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: "must be positive".to_string(),
                });
            }
        };
    }

    check_positive_usize!(passthrough.min_acronym_len);
    check_positive_usize!(service.workers);

    if let Some(c) = s
        .numerals
        .separators
        .chars()
        .find(|c| c.is_alphanumeric() || c.is_whitespace())
    {
        return Err(SettingsError::InvalidValue {
            field: "numerals.separators".to_string(),
            reason: format!("{c:?} is a letter, digit or space"),
        });
    }

    Ok(())
}
