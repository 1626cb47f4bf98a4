//! Line-oriented drivers wiring the annotator, categorizer and decoder
//! together for the two supported tasks. `restor-cli` is a thin I/O shell
//! around these.

use crate::annotate;
use crate::categorize::{categorize_skeleton, CategorizeMode};
use crate::decoder::Decoder;
use crate::scorer_lm::LmProvider;
use crate::scorer_tm::TmProvider;

/// Detokenizes one line: tokenizes (annotation-aware) and categorizes the
/// input, decodes the categorized sequence to find the best phrase
/// segmentation, then rebuilds spacing from the *original* tokens via
/// [`Decoder::obtain_detok_sent`]. Empty input yields an empty line.
pub fn detokenize_line<TM: TmProvider, LM: LmProvider>(decoder: &Decoder<TM, LM>, line: &str) -> String {
    let atoms = annotate::skeleton(line);
    let (original_tokens, categ_tokens) = categorize_skeleton(&atoms, CategorizeMode::Detokenize);
    if original_tokens.is_empty() {
        return String::new();
    }

    let nblist = decoder.obtain_nblist(&categ_tokens, 1);
    match nblist.first() {
        Some(hyp) => decoder.obtain_detok_sent(&original_tokens, hyp),
        None => {
            tracing::warn!("no detokenization found for line, echoing input verbatim");
            line.trim_end_matches('\n').to_string()
        }
    }
}

/// Recases one already-lowercased line: runs the decoder directly, with no
/// categorization step (categorization would hide the casing decisions the
/// recaser needs to make), and returns the winning hypothesis's words.
pub fn recase_line<TM: TmProvider, LM: LmProvider>(decoder: &Decoder<TM, LM>, line: &str) -> String {
    let tokens: Vec<String> = line.split_whitespace().map(String::from).collect();
    if tokens.is_empty() {
        return String::new();
    }

    let nblist = decoder.obtain_nblist(&tokens, 1);
    match nblist.first() {
        Some(hyp) => hyp.words().join(" "),
        None => {
            tracing::warn!("no recasing found for line, echoing input verbatim");
            line.trim_end_matches('\n').to_string()
        }
    }
}
