use serde::Deserialize;

use super::{Context, GraphemeRule, RuleKind};
use crate::compose::{LigatureAction, LigatureDirective};
use crate::unicode::{is_sinhala, is_sinhala_vowel, is_vowel_sign, ZWJ};

/// Longest pattern accepted from a rule file. Case-insensitive rules expand
/// to every case variant, so this also caps that expansion.
pub const MAX_PATTERN_LEN: usize = 8;

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleFile {
    version: String,
    #[serde(default)]
    vowels: Vec<VowelEntry>,
    #[serde(default)]
    consonants: Vec<LetterEntry>,
    #[serde(default)]
    modifiers: Vec<LetterEntry>,
    #[serde(default)]
    ligatures: Vec<LigatureEntry>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct VowelEntry {
    pattern: String,
    independent: String,
    sign: String,
    #[serde(default)]
    priority: i32,
    #[serde(default = "default_true")]
    case_sensitive: bool,
    #[serde(default)]
    after: Option<Context>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct LetterEntry {
    pattern: String,
    output: String,
    #[serde(default)]
    priority: i32,
    #[serde(default = "default_true")]
    case_sensitive: bool,
    #[serde(default)]
    before: Option<Context>,
    #[serde(default)]
    after: Option<Context>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct LigatureEntry {
    name: String,
    #[serde(default)]
    before: Option<Context>,
    trigger: Vec<String>,
    #[serde(default)]
    join_after: Option<usize>,
    #[serde(default)]
    compose: Option<String>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, thiserror::Error)]
pub enum RuleTableError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("rule table has no rules")]
    Empty,
    #[error("empty pattern in [[{0}]]")]
    EmptyPattern(&'static str),
    #[error("non-ASCII pattern: {0}")]
    NonAsciiPattern(String),
    #[error("pattern longer than {MAX_PATTERN_LEN} characters: {0}")]
    PatternTooLong(String),
    #[error("empty output for pattern: {0}")]
    EmptyOutput(String),
    #[error("output for pattern {pattern} is not {expected}")]
    WrongScript {
        pattern: String,
        expected: &'static str,
    },
    #[error("context {context:?} cannot be used as `{side}` (pattern {pattern})")]
    BadContext {
        pattern: String,
        side: &'static str,
        context: Context,
    },
    #[error("duplicate rule for pattern {0}")]
    Duplicate(String),
    #[error("contradictory rules for pattern {pattern}: {first:?} vs {second:?}")]
    Contradiction {
        pattern: String,
        first: String,
        second: String,
    },
    #[error("rule for pattern {pattern} with priority {priority} is shadowed and never matches")]
    Unreachable { pattern: String, priority: i32 },
    #[error("ligature {name}: {reason}")]
    BadLigature { name: String, reason: String },
}

/// A rule file after parsing and per-entry checks, before the cross-rule
/// validation done by [`super::RuleTable`].
#[derive(Debug)]
pub(crate) struct CompiledRules {
    pub version: String,
    pub rules: Vec<GraphemeRule>,
    pub ligatures: Vec<LigatureDirective>,
}

/// Parse TOML text into grapheme rules and ligature directives.
///
/// Each vowel entry becomes two rules: the independent letter where no bare
/// consonant precedes, and the vowel sign where one does.
pub(crate) fn parse_rule_toml(toml_str: &str) -> Result<CompiledRules, RuleTableError> {
    let file: RuleFile =
        toml::from_str(toml_str).map_err(|e| RuleTableError::Parse(e.to_string()))?;

    let mut rules = Vec::with_capacity(file.vowels.len() * 2 + file.consonants.len());

    for v in file.vowels {
        check_pattern(&v.pattern, "vowels")?;
        if v.independent.is_empty() {
            return Err(RuleTableError::EmptyOutput(v.pattern));
        }
        check_context(&v.pattern, "after", v.after)?;
        if !v.independent.starts_with(is_sinhala_vowel) {
            return Err(wrong_script(&v.pattern, "an independent vowel"));
        }
        // An empty sign is the inherent vowel and is allowed.
        if !v.sign.chars().all(is_vowel_sign) {
            return Err(wrong_script(&v.pattern, "a vowel sign"));
        }
        rules.push(GraphemeRule {
            pattern: v.pattern.clone(),
            case_sensitive: v.case_sensitive,
            before: Some(Context::Consonant),
            after: v.after,
            output: v.sign,
            kind: RuleKind::VowelSign,
            priority: v.priority,
        });
        rules.push(GraphemeRule {
            pattern: v.pattern,
            case_sensitive: v.case_sensitive,
            before: Some(Context::NotConsonant),
            after: v.after,
            output: v.independent,
            kind: RuleKind::Vowel,
            priority: v.priority,
        });
    }

    for (section, kind, entries) in [
        ("consonants", RuleKind::Consonant, file.consonants),
        ("modifiers", RuleKind::Modifier, file.modifiers),
    ] {
        for e in entries {
            check_pattern(&e.pattern, section)?;
            if e.output.is_empty() {
                return Err(RuleTableError::EmptyOutput(e.pattern));
            }
            check_context(&e.pattern, "before", e.before)?;
            check_context(&e.pattern, "after", e.after)?;
            if !e.output.chars().all(|c| is_sinhala(c) || c == ZWJ) {
                return Err(wrong_script(&e.pattern, "Sinhala"));
            }
            rules.push(GraphemeRule {
                pattern: e.pattern,
                case_sensitive: e.case_sensitive,
                before: e.before,
                after: e.after,
                output: e.output,
                kind,
                priority: e.priority,
            });
        }
    }

    if rules.is_empty() {
        return Err(RuleTableError::Empty);
    }

    let ligatures = file
        .ligatures
        .into_iter()
        .map(compile_ligature)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CompiledRules {
        version: file.version,
        rules,
        ligatures,
    })
}

fn wrong_script(pattern: &str, expected: &'static str) -> RuleTableError {
    RuleTableError::WrongScript {
        pattern: pattern.to_string(),
        expected,
    }
}

fn check_pattern(pattern: &str, section: &'static str) -> Result<(), RuleTableError> {
    if pattern.is_empty() {
        return Err(RuleTableError::EmptyPattern(section));
    }
    if !pattern.is_ascii() {
        return Err(RuleTableError::NonAsciiPattern(pattern.to_string()));
    }
    if pattern.len() > MAX_PATTERN_LEN {
        return Err(RuleTableError::PatternTooLong(pattern.to_string()));
    }
    Ok(())
}

fn check_context(
    pattern: &str,
    side: &'static str,
    context: Option<Context>,
) -> Result<(), RuleTableError> {
    let Some(context) = context else {
        return Ok(());
    };
    let valid = match side {
        "before" => context != Context::WordEnd,
        _ => context != Context::WordStart,
    };
    if valid {
        Ok(())
    } else {
        Err(RuleTableError::BadContext {
            pattern: pattern.to_string(),
            side,
            context,
        })
    }
}

fn compile_ligature(entry: LigatureEntry) -> Result<LigatureDirective, RuleTableError> {
    let bad = |reason: &str| RuleTableError::BadLigature {
        name: entry.name.clone(),
        reason: reason.to_string(),
    };

    if entry.trigger.is_empty() {
        return Err(bad("trigger is empty"));
    }
    let mut trigger = Vec::with_capacity(entry.trigger.len());
    for item in &entry.trigger {
        let mut chars = item.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c != ZWJ => trigger.push(c),
            (Some(ZWJ), None) => return Err(bad("trigger may not contain a joiner")),
            _ => return Err(bad("each trigger item must be exactly one character")),
        }
    }
    if entry.before == Some(Context::WordEnd) {
        return Err(bad("`before` cannot be word_end"));
    }

    let action = match (entry.join_after, entry.compose.as_deref()) {
        (Some(index), None) => {
            if index + 1 >= trigger.len() {
                return Err(bad("join_after must point inside the trigger"));
            }
            LigatureAction::JoinAfter(index)
        }
        (None, Some(composed)) => {
            let mut chars = composed.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if trigger != [c] => LigatureAction::Compose(c),
                (Some(_), None) => return Err(bad("compose must change the trigger")),
                _ => return Err(bad("compose must be exactly one character")),
            }
        }
        _ => return Err(bad("exactly one of join_after or compose is required")),
    };

    Ok(LigatureDirective {
        name: entry.name,
        before: entry.before,
        trigger,
        action,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_toml() {
        let toml = r#"
version = "test"

[[vowels]]
pattern = "a"
independent = "අ"
sign = ""

[[consonants]]
pattern = "k"
output = "ක"
"#;
        let compiled = parse_rule_toml(toml).unwrap();
        assert_eq!(compiled.version, "test");
        assert_eq!(compiled.rules.len(), 3);
        assert_eq!(compiled.rules[0].kind, RuleKind::VowelSign);
        assert_eq!(compiled.rules[0].output, "");
        assert_eq!(compiled.rules[1].kind, RuleKind::Vowel);
        assert_eq!(compiled.rules[1].output, "අ");
        assert_eq!(compiled.rules[2].kind, RuleKind::Consonant);
        assert!(compiled.ligatures.is_empty());
    }

    #[test]
    fn parse_default_toml() {
        let compiled = parse_rule_toml(super::super::DEFAULT_RULES_TOML).unwrap();
        assert!(
            compiled.rules.len() > 70,
            "expected 70+ rules, got {}",
            compiled.rules.len()
        );
        assert_eq!(compiled.ligatures.len(), 7);
    }

    #[test]
    fn error_empty_rules() {
        let err = parse_rule_toml("version = \"x\"\n").unwrap_err();
        assert!(matches!(err, RuleTableError::Empty));
    }

    #[test]
    fn error_non_ascii_pattern() {
        let toml = "
version = \"x\"
[[consonants]]
pattern = \"ක\"
output = \"ක\"
";
        let err = parse_rule_toml(toml).unwrap_err();
        assert!(matches!(err, RuleTableError::NonAsciiPattern(_)));
    }

    #[test]
    fn error_empty_output() {
        let toml = r#"
version = "x"
[[consonants]]
pattern = "k"
output = ""
"#;
        let err = parse_rule_toml(toml).unwrap_err();
        assert!(matches!(err, RuleTableError::EmptyOutput(_)));
    }

    #[test]
    fn error_output_script() {
        let latin = r#"
version = "x"
[[consonants]]
pattern = "k"
output = "k"
"#;
        let err = parse_rule_toml(latin).unwrap_err();
        assert!(matches!(err, RuleTableError::WrongScript { expected: "Sinhala", .. }));

        let sign_as_letter = r#"
version = "x"
[[vowels]]
pattern = "aa"
independent = "\u0DCF"
sign = "\u0DCF"
"#;
        let err = parse_rule_toml(sign_as_letter).unwrap_err();
        assert!(matches!(err, RuleTableError::WrongScript { expected: "an independent vowel", .. }));

        let letter_as_sign = r#"
version = "x"
[[vowels]]
pattern = "aa"
independent = "\u0D86"
sign = "\u0D86"
"#;
        let err = parse_rule_toml(letter_as_sign).unwrap_err();
        assert!(matches!(err, RuleTableError::WrongScript { expected: "a vowel sign", .. }));
    }

    #[test]
    fn error_pattern_too_long() {
        let toml = r#"
version = "x"
[[consonants]]
pattern = "kkkkkkkkk"
output = "ක"
"#;
        let err = parse_rule_toml(toml).unwrap_err();
        assert!(matches!(err, RuleTableError::PatternTooLong(_)));
    }

    #[test]
    fn error_context_on_wrong_side() {
        let toml = r#"
version = "x"
[[consonants]]
pattern = "k"
output = "ක"
before = "word_end"
"#;
        let err = parse_rule_toml(toml).unwrap_err();
        assert!(matches!(err, RuleTableError::BadContext { side: "before", .. }));
    }

    #[test]
    fn error_unknown_field() {
        let toml = r#"
version = "x"
[[consonants]]
pattern = "k"
output = "ක"
weight = 3
"#;
        let err = parse_rule_toml(toml).unwrap_err();
        assert!(matches!(err, RuleTableError::Parse(_)));
    }

    #[test]
    fn error_invalid_toml() {
        let err = parse_rule_toml("not valid toml {{{").unwrap_err();
        assert!(matches!(err, RuleTableError::Parse(_)));
    }

    #[test]
    fn ligature_join_must_be_interior() {
        let toml = r#"
version = "x"
[[consonants]]
pattern = "k"
output = "ක"
[[ligatures]]
name = "edge"
trigger = ["්", "ර"]
join_after = 1
"#;
        let err = parse_rule_toml(toml).unwrap_err();
        assert!(matches!(err, RuleTableError::BadLigature { .. }));
    }

    #[test]
    fn ligature_needs_one_action() {
        let toml = r#"
version = "x"
[[consonants]]
pattern = "k"
output = "ක"
[[ligatures]]
name = "both"
trigger = ["ෙ", "ා"]
join_after = 0
compose = "ො"
"#;
        let err = parse_rule_toml(toml).unwrap_err();
        assert!(matches!(err, RuleTableError::BadLigature { .. }));
    }

    #[test]
    fn ligature_compose_must_change_trigger() {
        let toml = r#"
version = "x"
[[consonants]]
pattern = "k"
output = "ක"
[[ligatures]]
name = "noop"
trigger = ["ො"]
compose = "ො"
"#;
        let err = parse_rule_toml(toml).unwrap_err();
        assert!(matches!(err, RuleTableError::BadLigature { .. }));
    }
}
