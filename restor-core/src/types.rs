//! Core data model shared by the scorers, the hypothesis store and the decoder.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::rc::Rc;

/// A single whitespace-delimited token, either a surface word or a
/// category placeholder such as [`CATEG_NUMBER`].
pub type Token = String;

/// Longest source phrase the decoder is allowed to span in one expansion step.
/// Fixed by design; unlike the statistical weights this is never reordered or
/// tuned, so it is not part of [`crate::config::DecoderConfig`].
pub const MAX_PHRASE_LEN: usize = 7;

pub const BOS: &str = "\u{27e8}bos\u{27e9}";
pub const EOS: &str = "\u{27e8}eos\u{27e9}";
pub const CATEG_NUMBER: &str = "\u{27e8}number\u{27e9}";
pub const CATEG_DIGIT: &str = "\u{27e8}digit\u{27e9}";
pub const CATEG_ALFANUM: &str = "\u{27e8}alfanum\u{27e9}";
pub const CATEG_COMMON_WORD: &str = "\u{27e8}common_word\u{27e9}";

/// The four log-linear feature weights combined by the decoder: translation
/// model, phrase penalty, word penalty and language model, in that order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub tm: f64,
    pub pp: f64,
    pub wp: f64,
    pub lm: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            tm: 1.0,
            pp: 1.0,
            wp: 1.0,
            lm: 1.0,
        }
    }
}

impl Weights {
    /// Build weights from an externally supplied 4-element vector, in
    /// `[tm, pp, wp, lm]` order. An arity mismatch is not fatal: the caller
    /// is expected to log a warning and fall back to [`Weights::default`].
    pub fn from_slice(values: &[f64]) -> Option<Self> {
        match values {
            [tm, pp, wp, lm] => Some(Self {
                tm: *tm,
                pp: *pp,
                wp: *wp,
                lm: *lm,
            }),
            _ => None,
        }
    }
}

/// State abstraction used for recombination: two hypotheses with the same
/// `StateKey` produce identical futures no matter which one is kept, so only
/// the higher-scoring one needs to survive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StateKey {
    /// Index (0-based) of the last source position covered, or `-1` before
    /// any phrase has been placed.
    pub tm_state: isize,
    /// Trailing target-word context, already BOS-padded to `n_max - 1`
    /// entries. Kept as an owned small vector rather than a joined string so
    /// recombination never has to re-split it.
    pub lm_state: Vec<Token>,
}

/// One node in the persistent hypothesis tree. Expanding a hypothesis never
/// copies the coverage vector or the word history: it only allocates a new
/// leaf pointing at its parent, and readers walk the parent chain on demand.
#[derive(Debug, Clone)]
pub struct HypNode {
    pub parent: Option<Hypothesis>,
    /// 1-based inclusive source span covered by this node's phrase. Unused
    /// (zeros) on the root.
    pub src_left: usize,
    pub src_right: usize,
    /// Target words produced by this expansion step (empty on the root).
    pub words: Vec<Token>,
    /// 0-based index of the last source token now covered, or `-1` on the
    /// root (nothing covered yet).
    pub covered_to: isize,
    /// Cumulative number of target words emitted up to and including this
    /// node, i.e. the 1-based exclusive target cut.
    pub trg_words_total: usize,
    /// Cumulative log-linear score up to and including this node.
    pub score: f64,
    /// Monotonically increasing insertion order, used only to break score
    /// ties deterministically in the priority queue.
    pub seq: u64,
}

pub type Hypothesis = Rc<HypNode>;

impl HypNode {
    pub fn root() -> Hypothesis {
        Rc::new(HypNode {
            parent: None,
            src_left: 0,
            src_right: 0,
            words: Vec::new(),
            covered_to: -1,
            trg_words_total: 0,
            score: 0.0,
            seq: 0,
        })
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// 0-based position of the next source token still uncovered.
    pub fn next_src_pos(&self) -> usize {
        (self.covered_to + 1) as usize
    }

    /// Full target word sequence from the root down to this node.
    pub fn words(&self) -> Vec<Token> {
        let mut chain = Vec::new();
        let mut cur = Some(self);
        while let Some(n) = cur {
            chain.push(n);
            cur = n.parent.as_deref();
        }
        let mut out = Vec::new();
        for n in chain.into_iter().rev() {
            out.extend(n.words.iter().cloned());
        }
        out
    }

    /// 0-based covered source positions in left-to-right order.
    pub fn coverage(&self) -> Vec<usize> {
        let mut out = Vec::new();
        let mut cur = Some(self);
        while let Some(n) = cur {
            if n.covered_to >= 0 {
                out.push(n.covered_to as usize);
            }
            cur = n.parent.as_deref();
        }
        out.reverse();
        out
    }

    /// Source spans and target cuts for every phrase placed so far, both in
    /// the 1-based convention used by alignment reconstruction: `srcsegms[k]`
    /// is `(left, right)` inclusive, `trgcuts[k]` is the exclusive upper
    /// bound on target-word index after phrase `k`.
    pub fn alignment(&self) -> (Vec<(usize, usize)>, Vec<usize>) {
        let mut chain = Vec::new();
        let mut cur = Some(self);
        while let Some(n) = cur {
            chain.push(n);
            cur = n.parent.as_deref();
        }
        let mut srcsegms = Vec::new();
        let mut trgcuts = Vec::new();
        for n in chain.into_iter().rev() {
            if n.is_root() {
                continue;
            }
            srcsegms.push((n.src_left, n.src_right));
            trgcuts.push(n.trg_words_total);
        }
        (srcsegms, trgcuts)
    }

    fn collect_last_words(&self, count: usize) -> Vec<Token> {
        let mut out = Vec::with_capacity(count);
        let mut cur = Some(self);
        'walk: while let Some(n) = cur {
            for w in n.words.iter().rev() {
                out.push(w.clone());
                if out.len() == count {
                    break 'walk;
                }
            }
            cur = n.parent.as_deref();
        }
        out.reverse();
        out
    }

    /// Trailing `n_max - 1` words of context, BOS-padded on the left when
    /// fewer than that many real words have been emitted yet.
    pub fn lm_history(&self, n_max: usize) -> Vec<Token> {
        let want = n_max.saturating_sub(1);
        let mut words = self.collect_last_words(want);
        while words.len() < want {
            words.insert(0, BOS.to_string());
        }
        words
    }

    pub fn state_key(&self, n_max: usize) -> StateKey {
        StateKey {
            tm_state: self.covered_to,
            lm_state: self.lm_history(n_max),
        }
    }

    pub fn is_complete(&self, source_len: usize) -> bool {
        source_len > 0 && self.covered_to + 1 == source_len as isize
    }
}

/// Max-heap entry ordering hypotheses by score, breaking ties in favour of
/// the earliest-inserted hypothesis so search order stays deterministic
/// regardless of floating-point tie patterns.
#[derive(Debug, Clone)]
pub struct QueueEntry(pub Hypothesis);

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.0.score == other.0.score && self.0.seq == other.0.seq
    }
}
impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .score
            .partial_cmp(&other.0.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.0.seq.cmp(&self.0.seq))
    }
}
