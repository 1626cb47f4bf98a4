//! Annotation-aware tokenizer and lowercaser. Inline `<phr_pair_annot>` /
//! `<length_limit>` markup is carried through as opaque tag atoms so it
//! survives tokenization and lowercasing untouched.

use once_cell::sync::Lazy;
use regex::Regex;

const GRP_ANN: &str = "phr_pair_annot";
const SRC_ANN: &str = "src_segm";
const TRG_ANN: &str = "trg_segm";
const LEN_ANN: &str = "length_limit";

static ANNOTATION_RE: Lazy<Regex> = Lazy::new(|| {
    let dic_patt = format!(
        r"(<{grp}>)[ ]*(<{src}>)(.+?)(</{src}>)[ ]*(<{trg}>)(.+?)(</{trg}>)[ ]*(</{grp}>)",
        grp = GRP_ANN,
        src = SRC_ANN,
        trg = TRG_ANN
    );
    let len_patt = format!(r"(<{len}>)[ ]*(\d+)[ ]*(</{len}>)", len = LEN_ANN);
    Regex::new(&format!("{}|{}", dic_patt, len_patt)).unwrap()
});

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+|[^\w\s]+").unwrap());

/// One piece of an annotated string: either an opaque XML tag/number atom
/// (`is_tag = true`) or a run of ordinary text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom {
    pub is_tag: bool,
    pub text: String,
}

/// Splits an annotated string into a flat sequence of tag and text atoms.
/// A `<phr_pair_annot>` block yields eight atoms (the three tag pairs plus
/// the two enclosed text runs); a `<length_limit>` block yields three.
pub fn skeleton(annotated: &str) -> Vec<Atom> {
    let mut out = Vec::new();
    let mut offset = 0usize;
    for m in ANNOTATION_RE.captures_iter(annotated) {
        let whole = m.get(0).unwrap();
        if offset < whole.start() {
            out.push(Atom {
                is_tag: false,
                text: annotated[offset..whole.start()].to_string(),
            });
        }
        offset = whole.end();

        if let Some(src_open) = m.get(1) {
            // dic_patt branch: groups 1..=8
            out.push(Atom { is_tag: true, text: src_open.as_str().to_string() });
            out.push(Atom { is_tag: true, text: m.get(2).unwrap().as_str().to_string() });
            out.push(Atom { is_tag: false, text: m.get(3).unwrap().as_str().to_string() });
            out.push(Atom { is_tag: true, text: m.get(4).unwrap().as_str().to_string() });
            out.push(Atom { is_tag: true, text: m.get(5).unwrap().as_str().to_string() });
            out.push(Atom { is_tag: false, text: m.get(6).unwrap().as_str().to_string() });
            out.push(Atom { is_tag: true, text: m.get(7).unwrap().as_str().to_string() });
            out.push(Atom { is_tag: true, text: m.get(8).unwrap().as_str().to_string() });
        } else if let Some(len_open) = m.get(9) {
            out.push(Atom { is_tag: true, text: len_open.as_str().to_string() });
            out.push(Atom { is_tag: false, text: m.get(10).unwrap().as_str().to_string() });
            out.push(Atom { is_tag: true, text: m.get(11).unwrap().as_str().to_string() });
        }
    }
    if offset < annotated.len() {
        out.push(Atom {
            is_tag: false,
            text: annotated[offset..].to_string(),
        });
    }
    out
}

/// Tokenizes an annotated string, preserving tag atoms as single tokens and
/// splitting text atoms on word boundaries (`\w+` runs and punctuation runs,
/// same shape as a plain whitespace-and-punctuation tokenizer).
pub fn tokenize(s: &str) -> Vec<String> {
    let mut out = Vec::new();
    for atom in skeleton(s) {
        if atom.is_tag {
            let trimmed = atom.text.trim();
            if !trimmed.is_empty() {
                out.push(trimmed.to_string());
            }
        } else {
            out.extend(tokenize_text_atom(&atom.text));
        }
    }
    out
}

/// Splits a single non-tag text run on word boundaries: `\w+` runs and
/// maximal runs of non-word, non-space punctuation. Exposed so callers that
/// need to walk the skeleton themselves (category-aware tokenization) can
/// reuse the same word-boundary rule `tokenize` uses internally.
pub fn tokenize_text_atom(text: &str) -> Vec<String> {
    WORD_RE.find_iter(text).map(|m| m.as_str().to_string()).collect()
}

/// Lowercases the text atoms of an annotated string while leaving tag atoms
/// untouched, rejoining everything with single spaces.
pub fn lowercase(s: &str) -> String {
    skeleton(s)
        .into_iter()
        .map(|atom| {
            if atom.is_tag {
                atom.text.trim().to_string()
            } else {
                atom.text.to_lowercase().trim().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Strips all annotation tags, keeping only the plain text content.
pub fn remove_xml_annotations(s: &str) -> String {
    skeleton(s)
        .into_iter()
        .filter(|atom| !atom.is_tag)
        .flat_map(|atom| {
            atom.text
                .split_whitespace()
                .map(|t| t.to_string())
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>()
        .join(" ")
}
