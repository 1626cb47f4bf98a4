//! End-to-end fixtures for the two text-restoration tasks, exercising the
//! annotator, categorizer, scorers and decoder together.

use std::rc::Rc;

use restor_core::annotate;
use restor_core::categorize::{categorize_word, is_categ, CategorizeMode};
use restor_core::decoder::Decoder;
use restor_core::pipeline::{detokenize_line, recase_line};
use restor_core::providers::{MemoryLmProvider, MemoryTmProvider};
use restor_core::scorer_lm::{LanguageScorer, LmProvider};
use restor_core::scorer_tm::{TmProvider, TranslationScorer};
use restor_core::store::{HypothesisQueue, RecombinationTable};
use restor_core::types::{HypNode, StateKey, Token, Weights, BOS, EOS};

fn lm_with_vocab(vocab: &[&str]) -> MemoryLmProvider {
    let mut lm = MemoryLmProvider::new();
    lm.add_count(&[], 10_000);
    for w in vocab.iter().chain([EOS, BOS].iter()) {
        lm.add_count(&[w.to_string()], 50);
    }
    lm
}

fn decoder_with(tm: MemoryTmProvider, lm: MemoryLmProvider) -> Decoder<MemoryTmProvider, MemoryLmProvider> {
    Decoder::new(TranslationScorer::new(tm), LanguageScorer::new(lm, 0.5, 2), Weights::default(), 100_000)
}

#[test]
fn e1_empty_input_yields_empty_output() {
    let decoder = decoder_with(MemoryTmProvider::new(), MemoryLmProvider::new());
    assert_eq!(detokenize_line(&decoder, ""), "");
    assert_eq!(recase_line(&decoder, ""), "");
}

#[test]
fn e2_unknown_word_passes_through_with_expected_score() {
    // Empty TM: no phrase was ever observed, so every span falls back to the
    // single-token identity option.
    let tm = MemoryTmProvider::new();
    let lm = lm_with_vocab(&["hello"]);
    let tm_scorer = TranslationScorer::new(tm);
    let lm_scorer = LanguageScorer::new(lm, 0.5, 2);
    let weights = Weights::default();
    let decoder = Decoder::new(tm_scorer, lm_scorer, weights, 100_000);

    let nblist = decoder.obtain_nblist(&[t("hello")], 1);
    assert_eq!(nblist.len(), 1);
    let hyp = &nblist[0];
    assert_eq!(hyp.words(), vec![t("hello")]);

    // Recompute the expected score directly from the same oracles to
    // confirm additivity (property 4) rather than hand-deriving a constant.
    let tm2 = TranslationScorer::new(MemoryTmProvider::new());
    let lm2 = LanguageScorer::new(lm_with_vocab(&["hello"]), 0.5, 2);
    let tm_lp = tm2.smoothed_prob("hello", "hello").ln();
    let pp_lp = -1.0;
    let wp_lp = -1.0;
    let lm_lp = lm2.interp_prob(&[BOS.to_string()], &t("hello")).ln();
    let lm_end_lp = lm2.interp_prob(&[t("hello")], &EOS.to_string()).ln();
    let expected = weights.tm * tm_lp + weights.pp * pp_lp + weights.wp * wp_lp + weights.lm * (lm_lp + lm_end_lp);
    assert!((hyp.score - expected).abs() < 1e-9);
}

#[test]
fn e3_categorize_then_decategorize_round_trips_the_literal() {
    let categorized: Vec<Token> = "Call 911 now"
        .split_whitespace()
        .map(|w| categorize_word(w, CategorizeMode::Detokenize))
        .collect();
    assert_eq!(categorized, vec!["Call", "\u{27e8}number\u{27e9}", "now"]);

    let mut tm = MemoryTmProvider::new();
    tm.add("Call", "Call", 10);
    tm.add("\u{27e8}number\u{27e9}", "\u{27e8}number\u{27e9}", 10);
    tm.add("now", "now", 10);
    let lm = lm_with_vocab(&["Call", "now", "\u{27e8}number\u{27e9}"]);
    let decoder = decoder_with(tm, lm);

    let out = detokenize_line(&decoder, "Call 911 now");
    assert_eq!(out, "Call 911 now");
}

#[test]
fn e4_recombination_keeps_the_higher_scoring_hypothesis() {
    // Two distinct expansion paths arrive at an identical StateKey with
    // scores -3.0 and -5.0: the table must retain -3.0, and popping the
    // -5.0 hypothesis afterwards must discard it without expansion.
    let root = HypNode::root();
    let key = StateKey {
        tm_state: 1,
        lm_state: vec![t("x")],
    };

    let mut worse = (*root).clone();
    worse.covered_to = 1;
    worse.words = vec![t("x")];
    worse.score = -5.0;
    worse.seq = 1;

    let mut better = (*root).clone();
    better.covered_to = 1;
    better.words = vec![t("x")];
    better.score = -3.0;
    better.seq = 2;

    let mut queue = HypothesisQueue::new();
    let mut table = RecombinationTable::new();

    assert!(table.offer(key.clone(), worse.score));
    queue.push(Rc::new(worse));
    assert!(table.offer(key.clone(), better.score));
    queue.push(Rc::new(better));

    // Best-first order pops -3.0 first; it is still current for `key`.
    let first = queue.pop().unwrap();
    assert_eq!(first.score, -3.0);
    assert!(table.is_current(&key, first.score));

    // -5.0 comes out next but is no longer current: it must be discarded
    // without expansion, leaving -3.0 as the only surviving hypothesis.
    let second = queue.pop().unwrap();
    assert_eq!(second.score, -5.0);
    assert!(!table.is_current(&key, second.score));

    assert!(queue.pop().is_none());
}

#[test]
fn e5_length_limit_annotation_is_preserved_through_tokenize_and_lowercase() {
    let input = "the <length_limit>12</length_limit> words";
    let toks = annotate::tokenize(input);
    assert!(toks.windows(3).any(|w| w == ["<length_limit>", "12", "</length_limit>"]));

    let lower = annotate::lowercase(input);
    assert!(lower.contains("<length_limit>"));
    assert!(lower.contains("12"));
    assert!(lower.contains("</length_limit>"));

    // "12" must never be folded into a category placeholder: it is plain
    // numeral content inside an annotation tag, not a categorizable token
    // the decoder is meant to see.
    let atoms = annotate::skeleton(input);
    let (_original, categorized) = restor_core::categorize::categorize_skeleton(&atoms, CategorizeMode::Detokenize);
    assert!(categorized.contains(&"12".to_string()));
    assert!(!categorized.iter().any(|t| is_categ(t)));
}

#[test]
fn e6_iteration_cap_yields_empty_nblist_and_no_panic() {
    // A pathological oracle that never offers a multi-token merge, forcing
    // the search to advance exactly one source position per iteration.
    let tm = MemoryTmProvider::new();
    let lm = lm_with_vocab(&["w"]);
    let tm_scorer = TranslationScorer::new(tm);
    let lm_scorer = LanguageScorer::new(lm, 0.5, 2);
    // Cap iterations well below what completing the sentence would need.
    let decoder = Decoder::new(tm_scorer, lm_scorer, Weights::default(), 2);

    let source: Vec<Token> = (0..10).map(|_| t("w")).collect();
    let nblist = decoder.obtain_nblist(&source, 1);
    assert!(nblist.is_empty());
}

#[test]
fn property_monotone_coverage_is_strictly_increasing() {
    let mut tm = MemoryTmProvider::new();
    tm.add("a", "a", 5);
    tm.add("b", "b", 5);
    let lm = lm_with_vocab(&["a", "b"]);
    let decoder = decoder_with(tm, lm);

    let nblist = decoder.obtain_nblist(&[t("a"), t("b")], 1);
    let hyp = &nblist[0];
    let coverage = hyp.coverage();
    for pair in coverage.windows(2) {
        assert!(pair[0] < pair[1]);
    }
    assert!(*coverage.last().unwrap() < 2);
}

#[test]
fn property_categorization_is_idempotent() {
    for word in ["911", "9", "3.14", "a1b2", "wonderful", "cat"] {
        let once = categorize_word(word, CategorizeMode::Detokenize);
        let twice = categorize_word(&once, CategorizeMode::Detokenize);
        assert_eq!(once, twice);
    }
}

#[test]
fn property_determinism_same_input_yields_identical_nblist() {
    let mut tm = MemoryTmProvider::new();
    tm.add("a", "a", 5);
    tm.add("b", "b", 5);
    let lm = lm_with_vocab(&["a", "b"]);
    let decoder = decoder_with(tm, lm);

    let source = vec![t("a"), t("b")];
    let first = decoder.obtain_nblist(&source, 2);
    let second = decoder.obtain_nblist(&source, 2);

    assert_eq!(first.len(), second.len());
    for (h1, h2) in first.iter().zip(second.iter()) {
        assert_eq!(h1.words(), h2.words());
        assert_eq!(h1.score, h2.score);
    }
}

#[test]
fn property_recombination_soundness_only_best_path_survives_in_nblist() {
    // "a" + "b c"->X and "a b"->Y + "c"->X both finish covering position 2
    // with last word "X", so they collide on the same StateKey. "a b"->Y is
    // deliberately the weaker translation (src_count 10, joint 2) so the
    // "a" + "b c"->X path must be the one recombination keeps.
    let mut tm = MemoryTmProvider::new();
    tm.add("a", "a", 100);
    tm.add("a b", "Y", 2);
    tm.add("a b", "Z", 8);
    tm.add("b c", "X", 100);
    tm.add("c", "X", 100);
    let lm = lm_with_vocab(&["a", "b", "c", "X", "Y", "Z"]);
    let decoder = decoder_with(tm, lm);

    let source = vec![t("a"), t("b"), t("c")];
    let nblist = decoder.obtain_nblist(&source, 5);

    let via_single_a = nblist.iter().filter(|h| h.words() == vec![t("a"), t("X")]).count();
    let via_merged_ab = nblist.iter().filter(|h| h.words() == vec![t("Y"), t("X")]).count();

    assert_eq!(
        via_single_a + via_merged_ab,
        1,
        "only one of the two colliding paths may survive recombination, got nblist {:?}",
        nblist.iter().map(|h| h.words()).collect::<Vec<_>>()
    );
    assert_eq!(via_single_a, 1, "the higher-scoring translation should be the survivor");
}

#[test]
fn property_interpolation_is_bounded_and_positive() {
    let lm = lm_with_vocab(&["a", "b"]);
    let scorer = LanguageScorer::new(lm, 0.5, 2);
    let p = scorer.interp_prob(&[t("a")], &t("b"));
    assert!(p >= 0.0);
    assert!(p <= 1.0);
    assert!(p > 0.0);
}

fn t(s: &str) -> Token {
    s.to_string()
}
