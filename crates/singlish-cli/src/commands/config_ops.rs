use std::fs;
use std::process;

use singlish_engine::lexicon::{self, Lexicon};
use singlish_engine::rules::{self, RuleTable, TrieLookupResult};
use singlish_engine::settings;

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

pub fn rules_export() {
    print!("{}", rules::default_toml());
}

pub fn rules_validate(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let table = die!(RuleTable::from_toml(&content), "Error: {}");
    println!(
        "OK: version {}, {} rules, {} ligatures, max pattern {}, fingerprint {:08x}",
        table.version(),
        table.len(),
        table.ligatures().len(),
        table.max_pattern_len(),
        table.fingerprint()
    );
}

/// Show every rule for `pattern` in the default (or given) table.
pub fn rules_lookup(pattern: &str, rules_file: Option<&str>) {
    let table = match rules_file {
        Some(file) => {
            let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
            die!(RuleTable::from_toml(&content), "Error: {}")
        }
        None => die!(RuleTable::builtin(), "Error: {}"),
    };

    let shape = match table.lookup(pattern) {
        TrieLookupResult::None => "no match",
        TrieLookupResult::Prefix => "prefix only",
        TrieLookupResult::Exact(_) => "exact",
        TrieLookupResult::ExactAndPrefix(_) => "exact, also a prefix",
    };
    println!("{pattern}: {shape}");
    for rule in table.rules_for(pattern) {
        let ctx = |c: Option<rules::Context>| c.map_or("-".to_string(), |c| format!("{c:?}"));
        println!(
            "  {:<10} -> {:<4} before={:<12} after={:<12} priority={}{}",
            format!("{:?}", rule.kind),
            rule.output,
            ctx(rule.before),
            ctx(rule.after),
            rule.priority,
            if rule.case_sensitive { "" } else { " (any case)" }
        );
    }
}

pub fn lexicon_export() {
    print!("{}", lexicon::default_toml());
}

pub fn lexicon_validate(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let lex = die!(Lexicon::from_toml(&content), "Error: {}");
    let (terms, units) = lex.counts();
    println!("OK: {terms} terms, {units} units");
}

pub fn settings_export() {
    print!("{}", settings::default_toml());
}

pub fn settings_validate(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let s = die!(settings::parse_settings_toml(&content), "Error: {}");
    println!(
        "OK: passthrough.detect_acronyms={}, numerals.separators={:?}, service.workers={}",
        s.passthrough.detect_acronyms, s.numerals.separators, s.service.workers
    );
}
