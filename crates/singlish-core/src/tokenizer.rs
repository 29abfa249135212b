//! Splits raw text into an exact partition of typed runs.

use std::ops::Range;

use serde::Serialize;
use tracing::debug_span;

use crate::lexicon::Lexicon;
use crate::settings::NumeralSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Phonetic,
    Numeral,
    Punctuation,
    Whitespace,
    LineBreak,
    /// Assigned by the passthrough classifier, never by the tokenizer.
    Literal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offsets into the source text.
    pub span: Range<usize>,
}

impl Token {
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.span.clone()]
    }
}

pub struct Tokenizer<'a> {
    lexicon: &'a Lexicon,
    numerals: &'a NumeralSettings,
}

impl<'a> Tokenizer<'a> {
    pub fn new(lexicon: &'a Lexicon, numerals: &'a NumeralSettings) -> Self {
        Self { lexicon, numerals }
    }

    /// Tokens are gap-free and non-overlapping: their spans concatenated in
    /// order reproduce `text` exactly.
    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        let _span = debug_span!("tokenize", len = text.len()).entered();

        let mut tokens = Vec::new();
        let mut pos = 0;
        while let Some(c) = text[pos..].chars().next() {
            let (kind, end) = if c.is_alphabetic() {
                (TokenKind::Phonetic, scan_while(text, pos, char::is_alphabetic))
            } else if c.is_ascii_digit() {
                (TokenKind::Numeral, self.scan_numeral(text, pos))
            } else if c == '\r' || c == '\n' {
                let len = if text[pos..].starts_with("\r\n") { 2 } else { 1 };
                (TokenKind::LineBreak, pos + len)
            } else if c.is_whitespace() {
                (
                    TokenKind::Whitespace,
                    scan_while(text, pos, |c| c.is_whitespace() && c != '\r' && c != '\n'),
                )
            } else {
                (
                    TokenKind::Punctuation,
                    scan_while(text, pos, |c| {
                        !(c.is_alphabetic() || c.is_ascii_digit() || c.is_whitespace())
                    }),
                )
            };
            tokens.push(Token {
                kind,
                span: pos..end,
            });
            pos = end;
        }
        tokens
    }

    /// Digits, then `separator digit+` groups, then an optional unit suffix
    /// when the following letter run is exactly a known unit.
    fn scan_numeral(&self, text: &str, start: usize) -> usize {
        let mut end = scan_while(text, start, |c| c.is_ascii_digit());
        loop {
            let mut rest = text[end..].chars();
            match (rest.next(), rest.next()) {
                (Some(sep), Some(d)) if self.numerals.is_separator(sep) && d.is_ascii_digit() => {
                    end = scan_while(text, end + sep.len_utf8(), |c| c.is_ascii_digit());
                }
                _ => break,
            }
        }
        let suffix_end = scan_while(text, end, char::is_alphabetic);
        if suffix_end > end && self.lexicon.is_unit(&text[end..suffix_end]) {
            end = suffix_end;
        }
        end
    }
}

fn scan_while(text: &str, start: usize, pred: impl Fn(char) -> bool) -> usize {
    text[start..]
        .char_indices()
        .find(|&(_, c)| !pred(c))
        .map_or(text.len(), |(i, _)| start + i)
}
