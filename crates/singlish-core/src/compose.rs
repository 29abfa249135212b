//! Conjunct and ligature composition over mapped Sinhala output.

use std::cmp::Reverse;

use tracing::debug_span;

use crate::rules::Context;
use crate::unicode::{is_sinhala_consonant, ZWJ};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LigatureAction {
    /// Insert a ZWJ after this index of the trigger.
    JoinAfter(usize),
    /// Replace the whole trigger with one precomposed character.
    Compose(char),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LigatureDirective {
    pub name: String,
    /// Lookbehind class for the character before the trigger. Inspected,
    /// never consumed.
    pub before: Option<Context>,
    pub trigger: Vec<char>,
    pub action: LigatureAction,
}

impl LigatureDirective {
    fn matches(&self, chars: &[char], at: usize) -> bool {
        if !chars[at..].starts_with(&self.trigger) {
            return false;
        }
        let prev = at.checked_sub(1).map(|i| chars[i]);
        match self.before {
            None => true,
            Some(Context::Consonant) => prev.is_some_and(is_sinhala_consonant),
            Some(Context::NotConsonant) => !prev.is_some_and(is_sinhala_consonant),
            Some(Context::WordStart) => prev.is_none(),
            Some(Context::WordEnd) => false,
        }
    }

    fn apply(&self, out: &mut String) {
        match self.action {
            LigatureAction::JoinAfter(index) => {
                for (i, &c) in self.trigger.iter().enumerate() {
                    out.push(c);
                    if i == index {
                        out.push(ZWJ);
                    }
                }
            }
            LigatureAction::Compose(c) => out.push(c),
        }
    }
}

/// Directives ordered longest trigger first; equal lengths keep file order.
#[derive(Debug, Clone, Default)]
pub struct LigatureSet {
    directives: Vec<LigatureDirective>,
}

impl LigatureSet {
    pub fn new(mut directives: Vec<LigatureDirective>) -> Self {
        directives.sort_by_key(|d| Reverse(d.trigger.len()));
        Self { directives }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LigatureDirective> {
        self.directives.iter()
    }

    pub fn len(&self) -> usize {
        self.directives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }
}

/// Apply ligature directives in a single left-to-right pass.
///
/// A trigger consumed by one directive is not reconsidered by another.
/// Already-joined output does not match any trigger (the ZWJ sits inside the
/// sequence), so composing twice gives the same text.
pub fn compose(ligatures: &LigatureSet, text: &str) -> String {
    let _span = debug_span!("compose", len = text.len()).entered();

    if ligatures.is_empty() {
        return text.to_string();
    }
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 8);
    let mut i = 0;
    while i < chars.len() {
        match ligatures.iter().find(|d| d.matches(&chars, i)) {
            Some(directive) => {
                directive.apply(&mut out);
                i += directive.trigger.len();
            }
            None => {
                out.push(chars[i]);
                i += 1;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleTable;
    use proptest::prelude::*;

    fn builtin() -> LigatureSet {
        RuleTable::builtin().unwrap().ligatures().clone()
    }

    #[test]
    fn test_rakaransaya() {
        assert_eq!(compose(&builtin(), "ක්ර"), "ක්\u{200D}ර");
        assert_eq!(compose(&builtin(), "ප්රශ්නය"), "ප්\u{200D}රශ්නය");
    }

    #[test]
    fn test_yansaya() {
        assert_eq!(compose(&builtin(), "විද්යාව"), "විද්\u{200D}යාව");
    }

    #[test]
    fn test_join_needs_consonant_before() {
        // A virama never follows a vowel in real text; the lookbehind still
        // has to reject it.
        assert_eq!(compose(&builtin(), "අ්ර"), "අ්ර");
        assert_eq!(compose(&builtin(), "්ර"), "්ර");
    }

    #[test]
    fn test_split_vowel_signs_compose() {
        let ligs = builtin();
        assert_eq!(compose(&ligs, "ක\u{0DD9}\u{0DCF}"), "ක\u{0DDC}");
        assert_eq!(compose(&ligs, "ක\u{0DD9}\u{0DCA}"), "ක\u{0DDA}");
        assert_eq!(compose(&ligs, "ක\u{0DDC}\u{0DCA}"), "ක\u{0DDD}");
        assert_eq!(compose(&ligs, "ක\u{0DD9}\u{0DDF}"), "ක\u{0DDE}");
    }

    #[test]
    fn test_longest_trigger_first() {
        // ෙ ා ් must become ෝ, not ො followed by a stray virama.
        assert_eq!(compose(&builtin(), "බ\u{0DD9}\u{0DCF}\u{0DCA}"), "බ\u{0DDD}");
    }

    #[test]
    fn test_plain_text_untouched() {
        let ligs = builtin();
        for s in ["", "මම ගෙදර යනවා.", "KFC 500", "ක්\u{200D}ර"] {
            assert_eq!(compose(&ligs, s), s);
        }
    }

    #[test]
    fn test_empty_set_is_identity() {
        assert_eq!(compose(&LigatureSet::empty(), "ක්ර"), "ක්ර");
    }

    #[test]
    fn test_sorted_by_trigger_length() {
        let lens: Vec<usize> = builtin().iter().map(|d| d.trigger.len()).collect();
        let mut sorted = lens.clone();
        sorted.sort_by_key(|&l| Reverse(l));
        assert_eq!(lens, sorted);
    }

    fn sinhala_fragment() -> impl Strategy<Value = String> {
        let alphabet = vec![
            'ක', 'ර', 'ය', '\u{0DCA}', 'ෙ', 'ා', 'ෟ', 'ො', ZWJ, ' ', 'අ', 'ේ',
        ];
        proptest::collection::vec(proptest::sample::select(alphabet), 0..24)
            .prop_map(|v| v.into_iter().collect())
    }

    proptest! {
        #[test]
        fn compose_is_idempotent(s in sinhala_fragment()) {
            let ligs = builtin();
            let once = compose(&ligs, &s);
            let twice = compose(&ligs, &once);
            prop_assert_eq!(once, twice);
        }
    }
}
