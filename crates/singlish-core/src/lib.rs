//! Singlish to Sinhala Unicode transliteration.
//!
//! Pipeline: [`tokenizer`] splits text into runs, [`classifier`] decides which
//! letter runs are phonetic, [`mapping`] walks the [`rules`] table with
//! maximal munch, [`compose`] applies ligature directives, and
//! [`formatter`] reassembles everything in source order.

pub mod classifier;
pub mod compose;
mod error;
pub mod explain;
pub mod formatter;
pub mod lexicon;
pub mod mapping;
pub mod rules;
pub mod settings;
pub mod tokenizer;
mod translate;
pub mod unicode;

pub use error::EngineError;
pub use translate::Transliterator;
