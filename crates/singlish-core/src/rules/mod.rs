//! Grapheme rule table.
//!
//! Rules map ASCII Singlish patterns to Sinhala output. They are loaded from
//! TOML, validated once, and indexed in a byte trie so that the mapping
//! engine can do maximal-munch lookup bounded by the longest pattern.

mod config;
mod trie;

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::compose::{LigatureAction, LigatureDirective, LigatureSet};

pub use config::{RuleTableError, MAX_PATTERN_LEN};
pub use trie::{RuleTrie, TrieLookupResult};

pub(crate) const DEFAULT_RULES_TOML: &str = include_str!("default_rules.toml");

/// The embedded default rule table source.
pub fn default_toml() -> &'static str {
    DEFAULT_RULES_TOML
}

/// Index of a rule inside its [`RuleTable`].
pub type RuleId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Consonant,
    /// Independent vowel letter.
    Vowel,
    /// Dependent vowel sign; empty output is the inherent vowel.
    VowelSign,
    /// Anusvara / visarga. Leaves a preceding consonant's inherent vowel.
    Modifier,
}

impl RuleKind {
    pub fn is_vowel(self) -> bool {
        matches!(self, RuleKind::Vowel | RuleKind::VowelSign)
    }
}

/// Context predicate on one side of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Context {
    Consonant,
    NotConsonant,
    WordStart,
    WordEnd,
}

impl Context {
    /// Whether some position can satisfy both predicates.
    fn overlaps(self, other: Context) -> bool {
        use Context::*;
        self == other
            || matches!(
                (self, other),
                (WordStart, NotConsonant)
                    | (NotConsonant, WordStart)
                    | (WordEnd, NotConsonant)
                    | (NotConsonant, WordEnd)
            )
    }
}

fn contexts_overlap(a: Option<Context>, b: Option<Context>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.overlaps(b),
        _ => true,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphemeRule {
    pub pattern: String,
    pub case_sensitive: bool,
    pub before: Option<Context>,
    pub after: Option<Context>,
    pub output: String,
    pub kind: RuleKind,
    pub priority: i32,
}

impl GraphemeRule {
    /// Every byte string this rule matches. Case-insensitive rules expand to
    /// all ASCII case combinations of the pattern.
    pub fn variants(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        if self.case_sensitive {
            out.insert(self.pattern.clone());
            return out;
        }
        let mut partial = vec![String::new()];
        for c in self.pattern.chars() {
            let lower = c.to_ascii_lowercase();
            let upper = c.to_ascii_uppercase();
            let mut next = Vec::with_capacity(partial.len() * 2);
            for p in &partial {
                next.push(format!("{p}{lower}"));
                if upper != lower {
                    next.push(format!("{p}{upper}"));
                }
            }
            partial = next;
        }
        out.extend(partial);
        out
    }

    pub fn before_holds(&self, state: MatchState) -> bool {
        match self.before {
            None => true,
            Some(Context::Consonant) => state.after_consonant,
            Some(Context::NotConsonant) => !state.after_consonant,
            Some(Context::WordStart) => state.word_start,
            Some(Context::WordEnd) => false,
        }
    }

    fn canonical_line(&self) -> String {
        format!(
            "{}\t{}\t{:?}\t{:?}\t{:?}\t{}\t{}",
            self.pattern,
            self.case_sensitive,
            self.before,
            self.after,
            self.kind,
            self.output.escape_unicode(),
            self.priority
        )
    }
}

/// Left context seen by the matcher at a position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchState {
    pub word_start: bool,
    /// The previous unit is a consonant still carrying its inherent vowel.
    pub after_consonant: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct RuleMatch<'t> {
    pub rule: &'t GraphemeRule,
    /// Matched length in bytes.
    pub len: usize,
}

/// Validated, immutable rule table with its ligature set.
pub struct RuleTable {
    version: String,
    rules: Vec<GraphemeRule>,
    trie: RuleTrie,
    ligatures: LigatureSet,
    fingerprint: u32,
}

impl RuleTable {
    /// Load the embedded default table.
    pub fn builtin() -> Result<Self, RuleTableError> {
        Self::from_toml(DEFAULT_RULES_TOML)
    }

    /// Parse and validate a rule table from TOML text.
    pub fn from_toml(toml_str: &str) -> Result<Self, RuleTableError> {
        let compiled = config::parse_rule_toml(toml_str)?;
        Self::new(compiled.version, compiled.rules, compiled.ligatures)
    }

    pub fn new(
        version: String,
        rules: Vec<GraphemeRule>,
        ligatures: Vec<LigatureDirective>,
    ) -> Result<Self, RuleTableError> {
        if rules.is_empty() {
            return Err(RuleTableError::Empty);
        }

        let mut by_variant: HashMap<String, Vec<RuleId>> = HashMap::new();
        let mut trie = RuleTrie::new();
        for (id, rule) in rules.iter().enumerate() {
            for variant in rule.variants() {
                trie.insert(variant.as_bytes(), id);
                by_variant.entry(variant).or_default().push(id);
            }
        }

        let mut keys: Vec<&String> = by_variant.keys().collect();
        keys.sort();
        for key in keys {
            let ids = &by_variant[key];
            for (i, &a) in ids.iter().enumerate() {
                for &b in &ids[i + 1..] {
                    check_pair(key, &rules[a], &rules[b])?;
                }
            }
        }

        let fingerprint = fingerprint(&version, &rules, &ligatures);
        let table = Self {
            version,
            rules,
            trie,
            ligatures: LigatureSet::new(ligatures),
            fingerprint,
        };
        tracing::info!(
            version = %table.version,
            rules = table.rules.len(),
            ligatures = table.ligatures.len(),
            fingerprint = format_args!("{:08x}", table.fingerprint),
            max_pattern_len = table.max_pattern_len(),
            "rule table loaded"
        );
        Ok(table)
    }

    /// Select the rule applying at `pos`: longest matching pattern first,
    /// then highest priority among rules whose contexts hold.
    pub fn select(&self, input: &[u8], pos: usize, state: MatchState) -> Option<RuleMatch<'_>> {
        let candidates = self.trie.prefixes(&input[pos..]);
        for &(len, ids) in candidates.iter().rev() {
            let best = ids
                .iter()
                .map(|&id| &self.rules[id])
                .filter(|rule| {
                    rule.before_holds(state) && self.after_holds(rule.after, input, pos + len)
                })
                .max_by_key(|rule| rule.priority);
            if let Some(rule) = best {
                return Some(RuleMatch { rule, len });
            }
        }
        None
    }

    fn after_holds(&self, context: Option<Context>, input: &[u8], end: usize) -> bool {
        match context {
            None => true,
            Some(Context::WordEnd) => end == input.len(),
            Some(Context::Consonant) => self.starts_consonant(input, end),
            Some(Context::NotConsonant) => !self.starts_consonant(input, end),
            Some(Context::WordStart) => false,
        }
    }

    fn starts_consonant(&self, input: &[u8], at: usize) -> bool {
        self.trie
            .prefixes(&input[at..])
            .iter()
            .flat_map(|(_, ids)| ids.iter())
            .any(|&id| self.rules[id].kind == RuleKind::Consonant)
    }

    pub fn lookup(&self, pattern: &str) -> TrieLookupResult {
        self.trie.lookup(pattern)
    }

    /// All rules whose pattern (or case variant) is exactly `pattern`.
    pub fn rules_for(&self, pattern: &str) -> Vec<&GraphemeRule> {
        match self.trie.lookup(pattern) {
            TrieLookupResult::Exact(ids) | TrieLookupResult::ExactAndPrefix(ids) => {
                ids.into_iter().map(|id| &self.rules[id]).collect()
            }
            TrieLookupResult::None | TrieLookupResult::Prefix => Vec::new(),
        }
    }

    pub fn rules(&self) -> &[GraphemeRule] {
        &self.rules
    }

    pub fn rule(&self, id: RuleId) -> Option<&GraphemeRule> {
        self.rules.get(id)
    }

    pub fn ligatures(&self) -> &LigatureSet {
        &self.ligatures
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// CRC-32 over the canonical rule and ligature listing.
    pub fn fingerprint(&self) -> u32 {
        self.fingerprint
    }

    pub fn max_pattern_len(&self) -> usize {
        self.trie.depth()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn check_pair(key: &str, a: &GraphemeRule, b: &GraphemeRule) -> Result<(), RuleTableError> {
    let same_context = a.before == b.before && a.after == b.after;
    if same_context {
        if a.priority != b.priority {
            let loser = if a.priority < b.priority { a } else { b };
            return Err(RuleTableError::Unreachable {
                pattern: key.to_string(),
                priority: loser.priority,
            });
        }
        if a.output == b.output && a.kind == b.kind {
            return Err(RuleTableError::Duplicate(key.to_string()));
        }
    }
    let overlap = contexts_overlap(a.before, b.before) && contexts_overlap(a.after, b.after);
    if overlap && a.priority == b.priority {
        return Err(RuleTableError::Contradiction {
            pattern: key.to_string(),
            first: a.output.clone(),
            second: b.output.clone(),
        });
    }
    Ok(())
}

fn fingerprint(version: &str, rules: &[GraphemeRule], ligatures: &[LigatureDirective]) -> u32 {
    let mut lines: Vec<String> = rules.iter().map(GraphemeRule::canonical_line).collect();
    lines.sort();
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(version.as_bytes());
    for line in &lines {
        hasher.update(b"\n");
        hasher.update(line.as_bytes());
    }
    for lig in ligatures {
        let action = match lig.action {
            LigatureAction::JoinAfter(i) => format!("join:{i}"),
            LigatureAction::Compose(c) => format!("compose:{}", c.escape_unicode()),
        };
        let trigger: String = lig.trigger.iter().flat_map(|c| c.escape_unicode()).collect();
        hasher.update(format!("\n{}\t{:?}\t{trigger}\t{action}", lig.name, lig.before).as_bytes());
    }
    hasher.finalize()
}
