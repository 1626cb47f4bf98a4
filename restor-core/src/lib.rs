//! restor-core
//!
//! A phrase-based monotone decoder shared by two text-restoration tasks:
//! detokenization (recovering natural spacing from whitespace-tokenized
//! text) and recasing (recovering case from lowercased text). Both run the
//! same best-first search over a log-linear combination of a translation
//! model, a phrase penalty, a word penalty and a language model; only the
//! preprocessing and the output reconstruction differ between the two.
//!
//! Public API:
//! - [`Decoder`] - the best-first-search engine
//! - [`TmProvider`]/[`LmProvider`] - oracle traits the decoder scores against
//! - [`MemoryTmProvider`]/[`MemoryLmProvider`] - in-memory, bincode-serializable providers
//! - [`DecoderConfig`] - TOML-loadable weights and smoothing knobs
//! - [`pipeline::detokenize_line`]/[`pipeline::recase_line`] - end-to-end drivers
//! - [`categorize`]/[`annotate`] - category placeholders and annotation-aware tokenization

pub mod types;
pub use types::{HypNode, Hypothesis, StateKey, Weights};

pub mod scorer_tm;
pub use scorer_tm::{TmProvider, TranslationScorer};

pub mod scorer_lm;
pub use scorer_lm::{LanguageScorer, LmProvider};

pub mod store;
pub use store::{HypothesisQueue, RecombinationTable};

pub mod decoder;
pub use decoder::Decoder;

pub mod categorize;
pub mod annotate;

pub mod config;
pub use config::DecoderConfig;

pub mod providers;
pub use providers::{MemoryLmProvider, MemoryTmProvider};

pub mod pipeline;
