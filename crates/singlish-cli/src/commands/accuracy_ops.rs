//! Accuracy corpus runner behind `ruletool accuracy`.

use std::collections::BTreeMap;
use std::fs;
use std::process;

use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;

use singlish_engine::Transliterator;

#[derive(Debug, Deserialize)]
pub struct AccuracyCorpus {
    pub cases: Vec<AccuracyCase>,
}

#[derive(Debug, Deserialize)]
pub struct AccuracyCase {
    pub name: String,
    pub input: String,
    #[serde(default)]
    pub expected: Option<String>,
    #[serde(default)]
    pub contains: Vec<String>,
    #[serde(default)]
    pub expected_not: Option<String>,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub skip: bool,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AccuracyResult {
    pub name: String,
    pub input: String,
    pub actual: String,
    pub status: AccuracyStatus,
    pub category: String,
    /// What went wrong, one entry per failed check.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub problems: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccuracyStatus {
    Pass,
    Fail,
    Skip,
}

#[derive(Debug, Serialize)]
pub struct AccuracySummary {
    pub total: usize,
    pub pass: usize,
    pub fail: usize,
    pub skip: usize,
    pub pass_rate: String,
}

#[derive(Debug, Serialize)]
pub struct AccuracyReport {
    pub results: Vec<AccuracyResult>,
    pub summary: AccuracySummary,
}

pub fn parse_corpus(content: &str) -> Result<AccuracyCorpus, toml::de::Error> {
    toml::from_str(content)
}

fn selected(case: &AccuracyCase, tag: Option<&str>, category: Option<&str>) -> bool {
    if let Some(t) = tag {
        if !case.tags.iter().any(|c| c == t) {
            return false;
        }
    }
    if let Some(cat) = category {
        if case.category != cat {
            return false;
        }
    }
    true
}

fn check(case: &AccuracyCase, actual: &str) -> Vec<String> {
    let mut problems = Vec::new();
    if let Some(expected) = &case.expected {
        if actual != expected {
            problems.push(format!("expected: {expected}"));
        }
    }
    for needle in &case.contains {
        if !actual.contains(needle.as_str()) {
            problems.push(format!("missing: {needle}"));
        }
    }
    if let Some(not) = &case.expected_not {
        if actual.contains(not.as_str()) {
            problems.push(format!("must not produce: {not}"));
        }
    }
    problems
}

/// Run every selected case. Returns `None` when the filters match nothing.
pub fn run_corpus(
    engine: &Transliterator,
    corpus: &AccuracyCorpus,
    tag: Option<&str>,
    category: Option<&str>,
) -> Option<AccuracyReport> {
    let mut results = Vec::new();
    for case in corpus.cases.iter().filter(|c| selected(c, tag, category)) {
        if case.skip {
            results.push(AccuracyResult {
                name: case.name.clone(),
                input: case.input.clone(),
                actual: String::new(),
                status: AccuracyStatus::Skip,
                category: case.category.clone(),
                problems: Vec::new(),
                note: case.note.clone(),
            });
            continue;
        }

        let actual = engine.translate(&case.input);
        let problems = check(case, &actual);
        let status = if problems.is_empty() {
            AccuracyStatus::Pass
        } else {
            AccuracyStatus::Fail
        };
        results.push(AccuracyResult {
            name: case.name.clone(),
            input: case.input.clone(),
            actual,
            status,
            category: case.category.clone(),
            problems,
            note: case.note.clone(),
        });
    }
    if results.is_empty() {
        return None;
    }

    let count = |s: AccuracyStatus| results.iter().filter(|r| r.status == s).count();
    let (pass, fail, skip) = (
        count(AccuracyStatus::Pass),
        count(AccuracyStatus::Fail),
        count(AccuracyStatus::Skip),
    );
    let tested = results.len() - skip;
    let rate = if tested > 0 {
        pass as f64 / tested as f64 * 100.0
    } else {
        0.0
    };
    let summary = AccuracySummary {
        total: results.len(),
        pass,
        fail,
        skip,
        pass_rate: format!("{rate:.1}%"),
    };
    Some(AccuracyReport { results, summary })
}

fn pad(s: &str, width: usize) -> String {
    let w = UnicodeWidthStr::width(s);
    format!("{s}{}", " ".repeat(width.saturating_sub(w)))
}

pub fn format_report(report: &AccuracyReport, verbose: bool) -> String {
    let mut out = String::new();
    let mut grouped: BTreeMap<&str, Vec<&AccuracyResult>> = BTreeMap::new();
    for r in &report.results {
        grouped.entry(&r.category).or_default().push(r);
    }
    let name_width = report
        .results
        .iter()
        .map(|r| UnicodeWidthStr::width(r.name.as_str()))
        .max()
        .unwrap_or(0);

    for (cat, group) in &grouped {
        out.push_str(&format!("\n=== {} ({} cases) ===\n", cat, group.len()));
        for r in group {
            let name = pad(&r.name, name_width);
            match r.status {
                AccuracyStatus::Pass => {
                    if verbose {
                        out.push_str(&format!("  \u{2713} {name} \u{2192} {}\n", r.actual));
                    }
                }
                AccuracyStatus::Fail => {
                    out.push_str(&format!("  \u{2717} {name} \u{2192} {}\n", r.actual));
                    for p in &r.problems {
                        out.push_str(&format!("      {p}\n"));
                    }
                }
                AccuracyStatus::Skip => {
                    let reason = r.note.as_deref().unwrap_or("known failure");
                    out.push_str(&format!("  - {name} [skip: {reason}]\n"));
                }
            }
        }
    }

    let s = &report.summary;
    out.push('\n');
    out.push_str("=== Summary ===\n");
    out.push_str(&format!("  Total:     {}\n", s.total));
    out.push_str(&format!("  Pass:      {:>3}\n", s.pass));
    out.push_str(&format!("  Fail:      {:>3}\n", s.fail));
    out.push_str(&format!("  Skip:      {:>3}\n", s.skip));
    out.push_str(&format!(
        "  Pass rate: {} ({}/{})\n",
        s.pass_rate,
        s.pass,
        s.total - s.skip
    ));
    out
}

pub fn accuracy(
    engine: &Transliterator,
    corpus_file: &str,
    tag: Option<&str>,
    category: Option<&str>,
    verbose: bool,
    json: bool,
) {
    let content = fs::read_to_string(corpus_file).unwrap_or_else(|e| {
        eprintln!("Failed to read corpus file {corpus_file}: {e}");
        process::exit(1);
    });
    let corpus = parse_corpus(&content).unwrap_or_else(|e| {
        eprintln!("Failed to parse corpus TOML: {e}");
        process::exit(1);
    });
    let Some(report) = run_corpus(engine, &corpus, tag, category) else {
        eprintln!("No cases match the given filters");
        process::exit(1);
    };

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                eprintln!("JSON serialization failed: {e}");
                process::exit(1);
            }
        }
    } else {
        print!("{}", format_report(&report, verbose));
    }

    if report.summary.fail > 0 {
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORPUS: &str = include_str!("../../../../corpus/accuracy.toml");

    fn engine() -> Transliterator {
        Transliterator::builtin().unwrap()
    }

    #[test]
    fn bundled_corpus_passes() {
        let corpus = parse_corpus(CORPUS).unwrap();
        let report = run_corpus(&engine(), &corpus, None, None).unwrap();
        let failures: Vec<_> = report
            .results
            .iter()
            .filter(|r| r.status == AccuracyStatus::Fail)
            .map(|r| format!("{}: {} {:?}", r.name, r.actual, r.problems))
            .collect();
        assert!(failures.is_empty(), "failures:\n{}", failures.join("\n"));
        assert_eq!(report.summary.total, corpus.cases.len());
    }

    #[test]
    fn category_filter() {
        let corpus = parse_corpus(CORPUS).unwrap();
        let report = run_corpus(&engine(), &corpus, None, Some("degraded")).unwrap();
        assert!(report.results.iter().all(|r| r.category == "degraded"));
        assert!(report.summary.total > 0);
    }

    #[test]
    fn tag_filter() {
        let corpus = parse_corpus(CORPUS).unwrap();
        let report = run_corpus(&engine(), &corpus, Some("negative"), None).unwrap();
        let expected = corpus
            .cases
            .iter()
            .filter(|c| c.tags.iter().any(|t| t == "negative"))
            .count();
        assert_eq!(report.summary.total, expected);
    }

    #[test]
    fn no_match_is_none() {
        let corpus = parse_corpus(CORPUS).unwrap();
        assert!(run_corpus(&engine(), &corpus, Some("no-such-tag"), None).is_none());
    }

    #[test]
    fn failing_and_skipped_cases() {
        let corpus = parse_corpus(
            r#"
[[cases]]
name = "wrong"
input = "mama"
expected = "xx"
contains = ["yy"]
category = "a"

[[cases]]
name = "ok"
input = "mama"
expected = "මම"
expected_not = "ම ම"
category = "a"

[[cases]]
name = "later"
input = "mama"
expected = "zz"
category = "b"
skip = true
note = "pending"
"#,
        )
        .unwrap();
        let report = run_corpus(&engine(), &corpus, None, None).unwrap();
        assert_eq!(report.summary.pass, 1);
        assert_eq!(report.summary.fail, 1);
        assert_eq!(report.summary.skip, 1);
        assert_eq!(report.summary.pass_rate, "50.0%");
        assert_eq!(report.results[0].problems.len(), 2);

        let text = format_report(&report, true);
        assert!(text.contains("=== a (2 cases) ==="));
        assert!(text.contains("\u{2717} wrong"));
        assert!(text.contains("\u{2713} ok"));
        assert!(text.contains("[skip: pending]"));
        assert!(text.contains("Pass rate: 50.0% (1/2)"));

        let quiet = format_report(&report, false);
        assert!(!quiet.contains("\u{2713}"));
    }

    #[test]
    fn report_serializes_lowercase_status() {
        let corpus = parse_corpus(CORPUS).unwrap();
        let report = run_corpus(&engine(), &corpus, None, Some("greeting")).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["results"][0]["status"], "pass");
        assert!(json["results"][0].get("problems").is_none());
    }
}
