//! Grapheme mapping: maximal-munch walk over one phonetic word.

use std::ops::Range;

use tracing::{debug, debug_span};

use crate::rules::{GraphemeRule, MatchState, RuleKind, RuleTable};
use crate::unicode::HAL_KIRIMA;

/// One step of the walk. `rule` is `None` for an unmapped character, which
/// is carried through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedUnit<'t> {
    pub rule: Option<&'t GraphemeRule>,
    /// Byte range in the word.
    pub source: Range<usize>,
    pub output: String,
}

impl MappedUnit<'_> {
    pub fn is_unmapped(&self) -> bool {
        self.rule.is_none()
    }

    pub fn kind(&self) -> Option<RuleKind> {
        self.rule.map(|r| r.kind)
    }
}

/// Map a word to units covering it completely.
///
/// A consonant keeps its inherent vowel only when a vowel sign or modifier
/// follows; otherwise (another consonant, an unmapped character, or the end
/// of the word) its unit gets the hal kirima.
pub fn map_word<'t>(table: &'t RuleTable, word: &str) -> Vec<MappedUnit<'t>> {
    let _span = debug_span!("map_token", word).entered();

    let bytes = word.as_bytes();
    let mut units: Vec<MappedUnit<'t>> = Vec::with_capacity(word.len());
    let mut bare = false;
    let mut pos = 0;

    while pos < bytes.len() {
        let state = MatchState {
            word_start: pos == 0,
            after_consonant: bare,
        };
        if let Some(m) = table.select(bytes, pos, state) {
            let kind = m.rule.kind;
            if bare && matches!(kind, RuleKind::Consonant | RuleKind::Vowel) {
                close_consonant(&mut units);
            }
            bare = kind == RuleKind::Consonant;
            units.push(MappedUnit {
                rule: Some(m.rule),
                source: pos..pos + m.len,
                output: m.rule.output.clone(),
            });
            pos += m.len;
            continue;
        }

        let Some(c) = word[pos..].chars().next() else {
            break;
        };
        debug!(offset = pos, ch = %c, "unmapped character kept");
        if bare {
            close_consonant(&mut units);
            bare = false;
        }
        units.push(MappedUnit {
            rule: None,
            source: pos..pos + c.len_utf8(),
            output: c.to_string(),
        });
        pos += c.len_utf8();
    }

    if bare {
        close_consonant(&mut units);
    }
    units
}

fn close_consonant(units: &mut [MappedUnit<'_>]) {
    if let Some(last) = units.last_mut() {
        last.output.push(HAL_KIRIMA);
    }
}

/// Concatenate unit outputs: the raw rendering before ligature composition.
pub fn render(units: &[MappedUnit<'_>]) -> String {
    units.iter().map(|u| u.output.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(word: &str) -> String {
        let table = RuleTable::builtin().unwrap();
        render(&map_word(&table, word))
    }

    #[test]
    fn test_inherent_vowel() {
        assert_eq!(raw("mama"), "මම");
        assert_eq!(raw("gedhara"), "ගෙදර");
        assert_eq!(raw("yanavaa"), "යනවා");
    }

    #[test]
    fn test_virama_at_word_end_and_cluster() {
        assert_eq!(raw("k"), "ක්");
        assert_eq!(raw("rupiyal"), "රුපියල්");
        assert_eq!(raw("dhunnaa"), "දුන්නා");
    }

    #[test]
    fn test_independent_vowels() {
        assert_eq!(raw("oyaata"), "ඔයාට");
        assert_eq!(raw("aeya"), "ඇය");
        assert_eq!(raw("ii"), "ඊ");
    }

    #[test]
    fn test_modifier_keeps_inherent_vowel() {
        assert_eq!(raw("laQQkaava"), "ලංකාව");
        assert_eq!(raw("duHH"), "ඩුඃ");
    }

    #[test]
    fn test_unmapped_is_kept_and_closes_consonant() {
        let table = RuleTable::builtin().unwrap();
        let units = map_word(&table, "kwa");
        assert_eq!(render(&units), "ක්wඅ");
        assert!(units[1].is_unmapped());
        assert_eq!(units[1].source, 1..2);
        assert_eq!(units[2].kind(), Some(RuleKind::Vowel));
    }

    #[test]
    fn test_units_cover_word() {
        let table = RuleTable::builtin().unwrap();
        for word in ["mama", "kOw", "aeee", "DHaQQ", "සිංහල"] {
            let units = map_word(&table, word);
            let mut pos = 0;
            for u in &units {
                assert_eq!(u.source.start, pos, "{word}");
                pos = u.source.end;
            }
            assert_eq!(pos, word.len(), "{word}");
        }
    }

    #[test]
    fn test_case_changes_output() {
        assert_ne!(raw("thala"), raw("Thala"));
        assert_ne!(raw("lama"), raw("Lama"));
    }

    #[test]
    fn test_empty_word() {
        let table = RuleTable::builtin().unwrap();
        assert!(map_word(&table, "").is_empty());
    }
}
