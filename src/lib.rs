//! Singlish to Sinhala transliteration engine.
//!
//! The transform itself lives in [`singlish_core`]; this crate is the
//! request/response boundary around it: a worker-pool
//! [`service::TranslationService`] and optional trace output.

pub mod service;
mod trace_init;

pub use singlish_core::{
    classifier, compose, explain, formatter, lexicon, mapping, rules, settings, tokenizer,
    unicode, EngineError, Transliterator,
};
pub use trace_init::{init_stderr_tracing, init_tracing, TraceGuard};

/// Version string of the engine crate.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
