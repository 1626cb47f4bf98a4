//! Category placeholders for rare/productive surface forms, and the
//! alignment-driven decategorization that restores literals afterwards.

use crate::annotate::{self, Atom};
use crate::types::{CATEG_ALFANUM, CATEG_COMMON_WORD, CATEG_DIGIT, CATEG_NUMBER, Token};
use once_cell::sync::Lazy;
use regex::Regex;

const LEN_ANN_OPEN: &str = "<length_limit>";
const LEN_ANN_CLOSE: &str = "</length_limit>";

static ALNUM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9]+").unwrap());
static DIGIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d").unwrap());

pub fn is_number(s: &str) -> bool {
    s.parse::<f64>().is_ok()
}

pub fn is_alnum(s: &str) -> bool {
    ALNUM_RE.is_match(s)
}

fn is_all_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// Which set of categorization rules to apply. Detokenization additionally
/// folds long common words into a placeholder; recasing does not, since the
/// recaser needs to see the literal word to judge its casing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategorizeMode {
    Detokenize,
    Recase,
}

/// Maps a single raw token to its category placeholder, or returns it
/// unchanged if no rule applies.
pub fn categorize_word(word: &str, mode: CategorizeMode) -> Token {
    if is_all_digits(word) {
        if word.chars().count() > 1 {
            CATEG_NUMBER.to_string()
        } else {
            CATEG_DIGIT.to_string()
        }
    } else if is_number(word) {
        CATEG_NUMBER.to_string()
    } else if is_alnum(word) && DIGIT_RE.is_match(word) {
        CATEG_ALFANUM.to_string()
    } else if mode == CategorizeMode::Detokenize && word.chars().count() > 5 {
        CATEG_COMMON_WORD.to_string()
    } else {
        word.to_string()
    }
}

/// Whether `word` is itself one of the category placeholders.
pub fn is_categ(word: &str) -> bool {
    matches!(
        word,
        CATEG_COMMON_WORD | CATEG_NUMBER | CATEG_DIGIT | CATEG_ALFANUM
    )
}

/// Walks an annotation skeleton (see [`annotate::skeleton`]) and produces
/// two index-aligned token arrays: the original surface tokens (tag atoms
/// kept verbatim, text atoms word-split) and their categorized counterparts.
/// Words inside a `<length_limit>...</length_limit>` span are left
/// uncategorized in both arrays, since that content is a literal numeral
/// argument to the annotation, not translatable text.
pub fn categorize_skeleton(atoms: &[Atom], mode: CategorizeMode) -> (Vec<Token>, Vec<Token>) {
    let mut original = Vec::new();
    let mut categorized = Vec::new();
    let mut len_ann_active = false;

    for atom in atoms {
        if atom.is_tag {
            let tag = atom.text.trim().to_string();
            if tag == LEN_ANN_OPEN {
                len_ann_active = true;
            } else if tag == LEN_ANN_CLOSE {
                len_ann_active = false;
            }
            original.push(tag.clone());
            categorized.push(tag);
        } else {
            for word in annotate::tokenize_text_atom(&atom.text) {
                let categ = if len_ann_active {
                    word.clone()
                } else {
                    categorize_word(&word, mode)
                };
                original.push(word);
                categorized.push(categ);
            }
        }
    }
    (original, categorized)
}

/// Positions (0-based) and surface forms, within `[left, right]` inclusive
/// of `word_array`, of words that either already are a category placeholder
/// or would become one under detokenize-mode categorization.
pub fn extract_categ_words_of_segm(word_array: &[Token], left: usize, right: usize) -> Vec<(usize, Token)> {
    let mut out = Vec::new();
    for i in left..=right.min(word_array.len().saturating_sub(1)) {
        let w = &word_array[i];
        if is_categ(w) || is_categ(&categorize_word(w, CategorizeMode::Detokenize)) {
            out.push((i, w.clone()));
        }
    }
    out
}

/// Restores literal surface forms in a decoder output that contains
/// category placeholders, using the winning hypothesis's phrase alignment
/// (`srcsegms`/`trgcuts`, both as returned by [`crate::types::HypNode::alignment`])
/// to find, for each categorized target word, the corresponding source word.
pub fn decategorize(
    src_word_array: &[Token],
    trg_word_array: &[Token],
    srcsegms: &[(usize, usize)],
    trgcuts: &[usize],
) -> String {
    let mut out = Vec::with_capacity(trg_word_array.len());
    for (trgpos, word) in trg_word_array.iter().enumerate() {
        if is_categ(word) {
            out.push(decategorize_word(trgpos, src_word_array, trg_word_array, srcsegms, trgcuts));
        } else {
            out.push(word.clone());
        }
    }
    out.join(" ")
}

fn decategorize_word(
    trgpos: usize,
    src_word_array: &[Token],
    trg_word_array: &[Token],
    srcsegms: &[(usize, usize)],
    trgcuts: &[usize],
) -> Token {
    if srcsegms.is_empty() || trgcuts.is_empty() {
        // No alignment information survived (e.g. a pass-through single
        // word hypothesis): there is nothing to restore, so the category
        // placeholder itself is the best available answer.
        return trg_word_array[trgpos].clone();
    }

    let mut phrase_idx = None;
    for (k, &cut) in trgcuts.iter().enumerate() {
        let lower = if k == 0 { 0 } else { trgcuts[k - 1] };
        if trgpos + 1 > lower && trgpos + 1 <= cut {
            phrase_idx = Some(k);
            break;
        }
    }

    let Some(k) = phrase_idx else {
        return trg_word_array[trgpos].clone();
    };

    let trgleft = if k == 0 { 0 } else { trgcuts[k - 1] };
    let trgright = trgcuts[k] - 1;
    let (src_left_1, src_right_1) = srcsegms[k];
    let srcleft = src_left_1 - 1;
    let srcright = src_right_1 - 1;

    let src_categ_words = extract_categ_words_of_segm(src_word_array, srcleft, srcright);
    let trg_categ_words = extract_categ_words_of_segm(trg_word_array, trgleft, trgright);

    let curr_categ_word = &trg_word_array[trgpos];
    let mut curr_categ_word_order = 0usize;
    for (pos, word) in &trg_categ_words {
        if *pos == trgpos {
            break;
        }
        if word == curr_categ_word {
            curr_categ_word_order += 1;
        }
    }

    let mut aux_order = 0usize;
    for (_, src_word) in &src_categ_words {
        if categorize_word(src_word, CategorizeMode::Detokenize) == *curr_categ_word {
            if aux_order == curr_categ_word_order {
                return src_word.clone();
            }
            aux_order += 1;
        }
    }

    trg_word_array[trgpos].clone()
}
