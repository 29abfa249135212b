//! Diagnostic explanation of a translation.
//!
//! Used by `ruletool explain` and `singlish --explain` to show how each token
//! was classified and which rules produced its output.

use serde::Serialize;

use crate::classifier::Classification;
use crate::compose::compose;
use crate::mapping::{map_word, render};
use crate::rules::RuleKind;
use crate::tokenizer::TokenKind;
use crate::Transliterator;

/// One mapped unit of a phonetic token.
#[derive(Debug, Clone, Serialize)]
pub struct ExplainUnit {
    pub source: String,
    /// Matched rule pattern; `None` for an unmapped character.
    pub pattern: Option<String>,
    pub kind: Option<RuleKind>,
    pub output: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExplainToken {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
    pub text: String,
    pub classification: Option<Classification>,
    pub units: Vec<ExplainUnit>,
    /// Concatenated unit output before ligature composition.
    pub raw: Option<String>,
    /// What this token contributes to the translation.
    pub rendered: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExplainReport {
    pub input: String,
    pub output: String,
    pub table_version: String,
    pub tokens: Vec<ExplainToken>,
}

impl Transliterator {
    pub fn explain(&self, text: &str) -> ExplainReport {
        let classifier = self.classifier();
        let tokens = self
            .tokenizer()
            .tokenize(text)
            .into_iter()
            .map(|token| {
                let word = token.text(text);
                let classification = classifier.classify_token(&token, text);
                let mut explained = ExplainToken {
                    kind: token.kind,
                    start: token.span.start,
                    end: token.span.end,
                    text: word.to_string(),
                    classification,
                    units: Vec::new(),
                    raw: None,
                    rendered: word.to_string(),
                };
                if token.kind != TokenKind::Phonetic {
                    return explained;
                }

                let units = map_word(self.rules(), word);
                explained.units = units
                    .iter()
                    .map(|u| ExplainUnit {
                        source: word[u.source.clone()].to_string(),
                        pattern: u.rule.map(|r| r.pattern.clone()),
                        kind: u.kind(),
                        output: u.output.clone(),
                    })
                    .collect();
                let raw = render(&units);
                if classification == Some(Classification::Phonetic) {
                    explained.rendered = compose(self.rules().ligatures(), &raw);
                } else {
                    explained.kind = TokenKind::Literal;
                }
                explained.raw = Some(raw);
                explained
            })
            .collect::<Vec<_>>();

        ExplainReport {
            input: text.to_string(),
            output: tokens.iter().map(|t| t.rendered.as_str()).collect(),
            table_version: self.rules().version().to_string(),
            tokens,
        }
    }
}

fn pad(s: &str, width: usize) -> String {
    use unicode_width::UnicodeWidthStr;
    let w = UnicodeWidthStr::width(s);
    if w < width {
        format!("{s}{}", " ".repeat(width - w))
    } else {
        s.to_string()
    }
}

fn kind_label(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::Phonetic => "phonetic",
        TokenKind::Numeral => "numeral",
        TokenKind::Punctuation => "punct",
        TokenKind::Whitespace => "space",
        TokenKind::LineBreak => "newline",
        TokenKind::Literal => "literal",
    }
}

fn class_label(class: Option<Classification>) -> String {
    match class {
        None => String::new(),
        Some(Classification::Phonetic) => "phonetic".to_string(),
        Some(Classification::Literal { reason }) => format!("literal ({reason:?})"),
    }
}

/// Format an ExplainReport as human-readable text.
pub fn format_text(report: &ExplainReport) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "=== Tokens for {:?} ({} tokens, table {}) ===\n",
        report.input,
        report.tokens.len(),
        report.table_version,
    ));

    for t in &report.tokens {
        if matches!(t.kind, TokenKind::Whitespace | TokenKind::LineBreak) {
            continue;
        }
        out.push_str(&format!(
            "  [{},{}] {} {:<8} {}\n",
            t.start,
            t.end,
            pad(&t.text, 16),
            kind_label(t.kind),
            class_label(t.classification),
        ));
        for u in &t.units {
            let pattern = u.pattern.as_deref().unwrap_or("-");
            let kind = u.kind.map_or("unmapped".to_string(), |k| format!("{k:?}"));
            out.push_str(&format!(
                "      {} {} {:<10} -> {}\n",
                pad(&u.source, 4),
                pad(pattern, 4),
                kind,
                u.output,
            ));
        }
        if let Some(raw) = &t.raw {
            if *raw != t.rendered && t.kind == TokenKind::Phonetic {
                out.push_str(&format!("      composed {} -> {}\n", raw, t.rendered));
            }
        }
    }

    out.push_str(&format!("\n=== Output ===\n{}\n", report.output));
    out
}
