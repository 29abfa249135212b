//! Reassembles output runs in source order.

use std::ops::Range;

/// Builds the output string token by token. Every source byte must be
/// covered exactly once, either copied verbatim or replaced by a rendering.
pub struct Formatter<'s> {
    source: &'s str,
    cursor: usize,
    out: String,
}

impl<'s> Formatter<'s> {
    pub fn new(source: &'s str) -> Self {
        Self {
            source,
            cursor: 0,
            out: String::with_capacity(source.len() * 3),
        }
    }

    /// Copy a source span unchanged.
    pub fn push_verbatim(&mut self, span: Range<usize>) {
        debug_assert_eq!(span.start, self.cursor, "formatter spans must be contiguous");
        self.out.push_str(&self.source[span.clone()]);
        self.cursor = span.end;
    }

    /// Emit `rendered` in place of a source span.
    pub fn push_rendered(&mut self, span: Range<usize>, rendered: &str) {
        debug_assert_eq!(span.start, self.cursor, "formatter spans must be contiguous");
        self.out.push_str(rendered);
        self.cursor = span.end;
    }

    pub fn finish(self) -> String {
        debug_assert_eq!(self.cursor, self.source.len(), "formatter left a gap");
        self.out
    }
}
