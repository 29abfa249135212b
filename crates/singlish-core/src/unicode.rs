//! Character-level Unicode classification for Sinhala text.

/// Hal kirima (virama), U+0DCA. Suppresses the inherent vowel of a consonant.
pub const HAL_KIRIMA: char = '\u{0DCA}';

/// Zero-width joiner, U+200D. Requests the joined (rakaransaya / yansaya) form.
pub const ZWJ: char = '\u{200D}';

/// Check the full Sinhala block (U+0D80..U+0DFF).
pub fn is_sinhala(c: char) -> bool {
    ('\u{0D80}'..='\u{0DFF}').contains(&c)
}

/// Consonant letters ක (U+0D9A) through ෆ (U+0DC6).
///
/// The range includes U+0DB2 and U+0DBC, which are unassigned. They never
/// come out of a rule table, so the block-level check is kept simple.
pub fn is_sinhala_consonant(c: char) -> bool {
    ('\u{0D9A}'..='\u{0DC6}').contains(&c)
}

/// Independent vowels අ (U+0D85) through ඖ (U+0D96).
pub fn is_sinhala_vowel(c: char) -> bool {
    ('\u{0D85}'..='\u{0D96}').contains(&c)
}

/// Dependent vowel signs (pili), including the two Sinhala-specific long
/// signs ෲ and ෳ.
pub fn is_vowel_sign(c: char) -> bool {
    ('\u{0DCF}'..='\u{0DDF}').contains(&c) || c == '\u{0DF2}' || c == '\u{0DF3}'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_classification() {
        assert!(is_sinhala_consonant('ක'));
        assert!(is_sinhala_consonant('ෆ'));
        assert!(!is_sinhala_consonant('අ'));
        assert!(!is_sinhala_consonant(HAL_KIRIMA));
        assert!(is_sinhala_vowel('අ'));
        assert!(is_sinhala_vowel('ඖ'));
        assert!(!is_sinhala_vowel('ක'));
        assert!(is_vowel_sign('ා'));
        assert!(is_vowel_sign('ෲ'));
        assert!(!is_vowel_sign(HAL_KIRIMA));
        assert!(is_sinhala(HAL_KIRIMA));
        assert!(!is_sinhala(ZWJ));
    }
}
