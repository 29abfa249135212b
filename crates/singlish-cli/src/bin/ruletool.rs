use clap::{Parser, Subcommand};

use singlish_cli::commands::translate_ops::{self, EngineOptions};
use singlish_cli::commands::{accuracy_ops, config_ops};

#[derive(Parser)]
#[command(name = "ruletool", about = "Singlish rule table and accuracy diagnostics")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the built-in rule table TOML
    RulesExport,
    /// Validate a rule table TOML file
    RulesValidate {
        /// Rule table file
        file: String,
    },
    /// Show the rules registered for a pattern
    RulesLookup {
        /// ASCII pattern, e.g. "th"
        pattern: String,
        /// Rule table file (defaults to the built-in table)
        #[arg(long)]
        rules: Option<String>,
    },
    /// Print the built-in lexicon TOML
    LexiconExport,
    /// Validate a lexicon TOML file
    LexiconValidate {
        /// Lexicon file
        file: String,
    },
    /// Print the built-in settings TOML
    SettingsExport,
    /// Validate a settings TOML file
    SettingsValidate {
        /// Settings file
        file: String,
    },
    /// Explain how a text is tokenized, mapped and composed
    Explain {
        /// Singlish text
        text: String,
        /// Output as JSON instead of text
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        engine: EngineOptions,
    },
    /// Run translation accuracy tests from a TOML corpus
    Accuracy {
        /// Path to the accuracy corpus TOML file
        corpus_file: String,
        /// Filter by tag (only run cases with this tag)
        #[arg(long)]
        tag: Option<String>,
        /// Filter by category (only run cases in this category)
        #[arg(long)]
        category: Option<String>,
        /// Show passing cases too (default: only failures and skips)
        #[arg(long)]
        verbose: bool,
        /// Output as JSON instead of text
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        engine: EngineOptions,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::RulesExport => config_ops::rules_export(),
        Command::RulesValidate { file } => config_ops::rules_validate(&file),
        Command::RulesLookup { pattern, rules } => {
            config_ops::rules_lookup(&pattern, rules.as_deref())
        }
        Command::LexiconExport => config_ops::lexicon_export(),
        Command::LexiconValidate { file } => config_ops::lexicon_validate(&file),
        Command::SettingsExport => config_ops::settings_export(),
        Command::SettingsValidate { file } => config_ops::settings_validate(&file),
        Command::Explain { text, json, engine } => {
            let engine = translate_ops::engine_or_exit(&engine);
            translate_ops::explain(&engine, &text, json);
        }
        Command::Accuracy {
            corpus_file,
            tag,
            category,
            verbose,
            json,
            engine,
        } => {
            let engine = translate_ops::engine_or_exit(&engine);
            accuracy_ops::accuracy(
                &engine,
                &corpus_file,
                tag.as_deref(),
                category.as_deref(),
                verbose,
                json,
            );
        }
    }
}
