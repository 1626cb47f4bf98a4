//! Monotone best-first-search decoder: combines the translation model,
//! phrase penalty, word penalty and language model into a single log-linear
//! score and searches for the highest-scoring complete segmentation.

use crate::scorer_lm::{LanguageScorer, LmProvider};
use crate::scorer_tm::{TmProvider, TranslationScorer};
use crate::store::{HypothesisQueue, RecombinationTable};
use crate::types::{HypNode, Hypothesis, Token, Weights, EOS, MAX_PHRASE_LEN};

/// The per-phrase penalty is a constant `log(1/e) = -1`, independent of
/// phrase length; the word penalty is that same constant applied once per
/// emitted target word.
const PHRASE_PENALTY_LP: f64 = -1.0;

pub struct Decoder<TM: TmProvider, LM: LmProvider> {
    tm: TranslationScorer<TM>,
    lm: LanguageScorer<LM>,
    weights: Weights,
    max_iters: u64,
}

impl<TM: TmProvider, LM: LmProvider> Decoder<TM, LM> {
    pub fn new(tm: TranslationScorer<TM>, lm: LanguageScorer<LM>, weights: Weights, max_iters: u64) -> Self {
        Self {
            tm,
            lm,
            weights,
            max_iters,
        }
    }

    /// Runs best-first search `k` times over a single shared queue and
    /// recombination table, returning up to `k` complete hypotheses in
    /// descending score order. Each call to the inner search resumes from
    /// wherever the previous call left off, so later hypotheses are true
    /// next-best alternatives rather than independent re-searches.
    pub fn obtain_nblist(&self, source: &[Token], k: usize) -> Vec<Hypothesis> {
        let mut queue = HypothesisQueue::new();
        let mut table = RecombinationTable::new();
        let mut seq = 0u64;

        let root = HypNode::root();
        table.offer(root.state_key(self.lm.n_max()), root.score);
        queue.push(root);

        let mut nblist = Vec::with_capacity(k);
        for _ in 0..k {
            match self.best_first_search(source, &mut queue, &mut table, &mut seq) {
                Some(hyp) if !hyp.is_root() => nblist.push(hyp),
                _ => break,
            }
        }
        nblist
    }

    fn next_live_hypothesis(&self, queue: &mut HypothesisQueue, table: &RecombinationTable) -> Option<Hypothesis> {
        loop {
            let hyp = queue.pop()?;
            let key = hyp.state_key(self.lm.n_max());
            if table.is_current(&key, hyp.score) {
                return Some(hyp);
            }
            // Superseded by a better-or-equal hypothesis reaching the same
            // state: drop it without expansion (lazy deletion).
        }
    }

    fn best_first_search(
        &self,
        source: &[Token],
        queue: &mut HypothesisQueue,
        table: &mut RecombinationTable,
        seq: &mut u64,
    ) -> Option<Hypothesis> {
        let mut niter: u64 = 0;
        loop {
            let Some(hyp) = self.next_live_hypothesis(queue, table) else {
                return None;
            };
            if hyp.is_complete(source.len()) {
                return Some(hyp);
            }

            for ell in 1..=MAX_PHRASE_LEN {
                let new_cov = hyp.next_src_pos() + ell - 1;
                if new_cov >= source.len() {
                    break;
                }
                for child in self.expand(source, &hyp, new_cov, seq) {
                    let key = child.state_key(self.lm.n_max());
                    if table.offer(key, child.score) {
                        queue.push(child);
                    }
                }
            }

            niter += 1;
            if niter > self.max_iters {
                tracing::warn!("best-first search exceeded max_iters ({})", self.max_iters);
                return None;
            }
        }
    }

    /// Expands `parent` by covering source positions `[parent.next_src_pos(), new_cov]`
    /// inclusive, producing one child hypothesis per translation option.
    fn expand(&self, source: &[Token], parent: &Hypothesis, new_cov: usize, seq: &mut u64) -> Vec<Hypothesis> {
        let span_start = parent.next_src_pos();
        let span_tokens = &source[span_start..=new_cov];
        let span_joined = span_tokens.join(" ");
        let opts = self.tm.targets(span_tokens);

        let mut out = Vec::with_capacity(opts.len());
        for opt in opts {
            let opt_words: Vec<Token> = opt.split_whitespace().map(String::from).collect();

            let tm_lp = self.tm.smoothed_prob(&span_joined, &opt).ln();
            let pp_lp = PHRASE_PENALTY_LP;
            let wp_lp = -(opt_words.len() as f64);

            let mut hist = parent.lm_history(self.lm.n_max());
            let mut lm_lp = 0.0;
            for word in &opt_words {
                lm_lp += self.lm.interp_prob(&hist, word).ln();
                hist.push(word.clone());
                if hist.len() > self.lm.n_max().saturating_sub(1) {
                    hist.remove(0);
                }
            }

            let is_complete = new_cov + 1 == source.len();
            let lm_end_lp = if is_complete {
                self.lm.interp_prob(&hist, &EOS.to_string()).ln()
            } else {
                0.0
            };

            let score = parent.score
                + self.weights.tm * tm_lp
                + self.weights.pp * pp_lp
                + self.weights.wp * wp_lp
                + self.weights.lm * (lm_lp + lm_end_lp);

            *seq += 1;
            let n_words = opt_words.len();
            out.push(std::rc::Rc::new(HypNode {
                parent: Some(parent.clone()),
                src_left: span_start + 1,
                src_right: new_cov + 1,
                words: opt_words,
                covered_to: new_cov as isize,
                trg_words_total: parent.trg_words_total + n_words,
                score,
                seq: *seq,
            }));
        }
        out
    }

    /// Reconstructs the detokenized sentence by concatenating the
    /// *original* (non-categorized) source tokens within each winning
    /// phrase span, ignoring the literal target words the translation
    /// model proposed. This needs only the hypothesis's coverage, so the
    /// category placeholders that steered the search never leak into the
    /// output.
    pub fn obtain_detok_sent(&self, original_tokens: &[Token], hyp: &Hypothesis) -> String {
        if original_tokens.is_empty() {
            return String::new();
        }
        let coverage = hyp.coverage();
        let mut words = Vec::with_capacity(coverage.len());
        let mut left = 0usize;
        for &pos in &coverage {
            words.push(original_tokens[left..=pos].concat());
            left = pos + 1;
        }
        words.join(" ")
    }
}
