//! Translation-model scoring: how plausible is it that a source phrase
//! produces a given target phrase.

use crate::types::Token;

/// Smoothing floor applied whenever a source phrase was never observed, or
/// was observed but never paired with the target phrase under scrutiny.
pub const TM_SMOOTH_PROB: f64 = 0.000001;

/// An opaque phrase-table oracle. Two in-memory implementations are shipped
/// ([`crate::providers::MemoryTmProvider`]); anything that can answer these
/// three questions can back a [`TranslationScorer`].
pub trait TmProvider {
    /// All observed target phrases for a source phrase, in no particular
    /// order. Empty if the phrase was never observed.
    fn targets(&self, src_phrase: &str) -> Vec<String>;
    /// Number of times `src_phrase` was observed at all.
    fn src_count(&self, src_phrase: &str) -> u64;
    /// Number of times `src_phrase` was observed paired with `trg_phrase`.
    fn joint_count(&self, src_phrase: &str, trg_phrase: &str) -> u64;
}

/// Wraps a [`TmProvider`] with the smoothed-probability arithmetic used by
/// the decoder's translation-model feature.
pub struct TranslationScorer<TM: TmProvider> {
    provider: TM,
    floor: f64,
}

impl<TM: TmProvider> TranslationScorer<TM> {
    pub fn new(provider: TM) -> Self {
        Self {
            provider,
            floor: TM_SMOOTH_PROB,
        }
    }

    pub fn with_floor(provider: TM, floor: f64) -> Self {
        Self { provider, floor }
    }

    /// Candidate target phrases for a source span, falling back to
    /// identity pass-through for single-token spans the provider has never
    /// seen (an unknown word translates to itself).
    pub fn targets(&self, src_tokens: &[Token]) -> Vec<String> {
        let joined = src_tokens.join(" ");
        let mut opts = self.provider.targets(&joined);
        if opts.is_empty() && src_tokens.len() == 1 {
            opts.push(src_tokens[0].clone());
        }
        opts
    }

    /// `P(trg_phrase | src_phrase)`, smoothed away from zero so the log
    /// score of an unseen pairing stays finite.
    pub fn smoothed_prob(&self, src_phrase: &str, trg_phrase: &str) -> f64 {
        let src_count = self.provider.src_count(src_phrase);
        if src_count == 0 {
            return self.floor;
        }
        let joint = self.provider.joint_count(src_phrase, trg_phrase);
        (1.0 - self.floor) * (joint as f64 / src_count as f64)
    }
}
