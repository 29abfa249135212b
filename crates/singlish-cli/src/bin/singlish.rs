use std::path::PathBuf;

use clap::Parser;

use singlish_cli::commands::translate_ops::{self, EngineOptions};

#[derive(Parser)]
#[command(name = "singlish", version, about = "Transliterate Singlish to Sinhala script")]
struct Cli {
    /// Text to translate (reads --file or stdin when omitted)
    text: Option<String>,
    /// Read input from a file
    #[arg(short, long, conflicts_with = "text")]
    file: Option<PathBuf>,
    /// Show the per-token breakdown instead of the output
    #[arg(long)]
    explain: bool,
    /// Print the breakdown as JSON (implies --explain)
    #[arg(long)]
    json: bool,
    /// Translate lines in parallel on N worker threads (overrides `[service] workers`)
    #[arg(short, long)]
    jobs: Option<usize>,
    /// Log pipeline decisions to stderr (needs the `trace` feature)
    #[arg(short, long)]
    verbose: bool,
    /// Write JSON trace records into this directory (needs the `trace` feature)
    #[arg(long)]
    trace_dir: Option<PathBuf>,
    #[command(flatten)]
    engine: EngineOptions,
}

fn main() {
    let cli = Cli::parse();

    let _guard = cli.trace_dir.as_deref().map(singlish_engine::init_tracing);
    if cli.verbose && cli.trace_dir.is_none() {
        singlish_engine::init_stderr_tracing();
    }

    let engine = translate_ops::engine_or_exit(&cli.engine);
    let text = translate_ops::read_input(cli.text, cli.file.as_ref());

    if cli.explain || cli.json {
        translate_ops::explain(&engine, &text, cli.json);
    } else {
        translate_ops::translate(engine, &text, cli.jobs);
    }
}
