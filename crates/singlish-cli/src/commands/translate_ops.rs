use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use clap::Args;

use singlish_engine::explain::format_text;
use singlish_engine::service::{ServiceError, TranslationService};
use singlish_engine::{lexicon, rules, settings, EngineError, Transliterator};

/// Overrides for the embedded rule table, lexicon and settings.
#[derive(Debug, Default, Args)]
pub struct EngineOptions {
    /// Rule table TOML to use instead of the built-in one
    #[arg(long)]
    pub rules: Option<PathBuf>,
    /// Lexicon TOML to use instead of the built-in one
    #[arg(long)]
    pub lexicon: Option<PathBuf>,
    /// Settings TOML to use instead of the built-in one
    #[arg(long)]
    pub settings: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: io::Error,
    },
    #[error(transparent)]
    Engine(#[from] EngineError),
}

fn read_or_default(path: Option<&PathBuf>, default: &str) -> Result<String, LoadError> {
    match path {
        Some(path) => fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        }),
        None => Ok(default.to_string()),
    }
}

pub fn load_engine(opts: &EngineOptions) -> Result<Transliterator, LoadError> {
    let rules_src = read_or_default(opts.rules.as_ref(), rules::default_toml())?;
    let lexicon_src = read_or_default(opts.lexicon.as_ref(), lexicon::default_toml())?;
    let settings_src = read_or_default(opts.settings.as_ref(), settings::default_toml())?;
    Ok(Transliterator::from_toml(&rules_src, &lexicon_src, &settings_src)?)
}

/// Load the engine or exit with a message.
pub fn engine_or_exit(opts: &EngineOptions) -> Transliterator {
    load_engine(opts).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        process::exit(1);
    })
}

/// Input text: the positional argument, a file, or stdin.
pub fn read_input(text: Option<String>, file: Option<&PathBuf>) -> String {
    if let Some(text) = text {
        return text;
    }
    if let Some(path) = file {
        return fs::read_to_string(path).unwrap_or_else(|e| {
            eprintln!("Failed to read {}: {e}", path.display());
            process::exit(1);
        });
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf).unwrap_or_else(|e| {
        eprintln!("Failed to read stdin: {e}");
        process::exit(1);
    });
    buf
}

/// Worker pool sized by `jobs`, or by `[service] workers` when `None`.
/// The configured `request_timeout_ms` applies to every line.
pub fn line_service(
    engine: Transliterator,
    jobs: Option<usize>,
) -> Result<TranslationService, ServiceError> {
    TranslationService::with_workers(engine, jobs)
}

/// Translate line by line through a worker pool. Line endings are kept
/// exactly; a trailing newline stays trailing.
pub fn translate_parallel(
    engine: Transliterator,
    text: &str,
    jobs: Option<usize>,
) -> Result<String, ServiceError> {
    let mut service = line_service(engine, jobs)?;
    let timeout = service.default_timeout();

    let tickets = text
        .split_inclusive('\n')
        .map(|line| service.submit(line))
        .collect::<Result<Vec<_>, _>>()?;

    let mut out = String::with_capacity(text.len() * 2);
    for ticket in tickets {
        let line = match timeout {
            Some(t) => ticket.wait_timeout(t)?,
            None => ticket.wait()?,
        };
        out.push_str(&line);
    }
    service.shutdown();
    Ok(out)
}

pub fn translate(engine: Transliterator, text: &str, jobs: Option<usize>) {
    let out = match jobs {
        Some(_) => translate_parallel(engine, text, jobs).unwrap_or_else(|e| {
            eprintln!("Error: {e}");
            process::exit(1);
        }),
        None => engine.translate(text),
    };
    print!("{out}");
    if !out.ends_with('\n') {
        println!();
    }
}

pub fn explain(engine: &Transliterator, text: &str, json: bool) {
    let report = engine.explain(text);
    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                eprintln!("JSON serialization failed: {e}");
                process::exit(1);
            }
        }
    } else {
        print!("{}", format_text(&report));
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::time::Duration;

    use super::*;

    #[test]
    fn defaults_load() {
        let engine = load_engine(&EngineOptions::default()).unwrap();
        assert_eq!(engine.translate("mama"), "මම");
    }

    #[test]
    fn missing_file_names_path() {
        let opts = EngineOptions {
            lexicon: Some(PathBuf::from("/nonexistent/lexicon.toml")),
            ..Default::default()
        };
        let err = load_engine(&opts).err().unwrap();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/lexicon.toml"));
    }

    #[test]
    fn settings_override_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let custom = settings::default_toml()
            .replace("detect_acronyms = true", "detect_acronyms = false");
        file.write_all(custom.as_bytes()).unwrap();
        let opts = EngineOptions {
            settings: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        let engine = load_engine(&opts).unwrap();
        assert!(!engine.settings().passthrough.detect_acronyms);
    }

    #[test]
    fn invalid_rules_surface_engine_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"this is not toml [").unwrap();
        let opts = EngineOptions {
            rules: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        let err = load_engine(&opts).err().unwrap();
        assert!(matches!(err, LoadError::Engine(EngineError::Rules(_))));
    }

    #[test]
    fn parallel_matches_sequential() {
        let engine = Transliterator::builtin().unwrap();
        let text = "mama gedhara yanavaa.\n\noyaata kohomadha?\nKFC 2km\n";
        let expected = engine.translate(text);
        let got = translate_parallel(engine, text, Some(3)).unwrap();
        assert_eq!(got, expected);
    }

    #[test]
    fn parallel_without_trailing_newline() {
        let engine = Transliterator::builtin().unwrap();
        let text = "mama\noyaa";
        let expected = engine.translate(text);
        assert_eq!(translate_parallel(engine, text, Some(2)).unwrap(), expected);
    }

    fn engine_with_settings(settings_toml: &str) -> Transliterator {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(settings_toml.as_bytes()).unwrap();
        let opts = EngineOptions {
            settings: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        load_engine(&opts).unwrap()
    }

    #[test]
    fn configured_timeout_reaches_line_service() {
        let custom = settings::default_toml()
            .replace("request_timeout_ms = 0", "request_timeout_ms = 5000");
        let engine = engine_with_settings(&custom);

        let svc = line_service(engine.clone(), Some(2)).unwrap();
        assert_eq!(svc.workers(), 2);
        assert_eq!(svc.default_timeout(), Some(Duration::from_millis(5000)));

        let expected = engine.translate("mama\noyaa\n");
        assert_eq!(translate_parallel(engine, "mama\noyaa\n", Some(2)).unwrap(), expected);
    }

    #[test]
    fn configured_workers_used_without_jobs() {
        let custom = settings::default_toml().replace("workers = 4", "workers = 3");
        let svc = line_service(engine_with_settings(&custom), None).unwrap();
        assert_eq!(svc.workers(), 3);
        assert_eq!(svc.default_timeout(), None);
    }
}
