//! In-memory reference implementations of [`TmProvider`]/[`LmProvider`].
//! Bincode-serializable so [`restor-modelgen`] can build them offline and
//! [`restor-cli`] can load them back without re-estimating anything.

use crate::scorer_lm::LmProvider;
use crate::scorer_tm::TmProvider;
use crate::types::Token;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Phrase table held entirely in memory: source phrase -> observed target
/// phrases plus the counts needed for smoothed-probability scoring.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryTmProvider {
    targets: HashMap<String, Vec<String>>,
    src_counts: HashMap<String, u64>,
    joint_counts: HashMap<(String, String), u64>,
}

impl MemoryTmProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `joint` observations of `(src, trg)` and adds `joint` to
    /// `src`'s total count.
    pub fn add(&mut self, src: &str, trg: &str, joint: u64) {
        let entry = self.targets.entry(src.to_string()).or_default();
        if !entry.iter().any(|t| t == trg) {
            entry.push(trg.to_string());
        }
        *self.src_counts.entry(src.to_string()).or_insert(0) += joint;
        *self.joint_counts.entry((src.to_string(), trg.to_string())).or_insert(0) += joint;
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(bincode::deserialize_from(reader)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        bincode::serialize_into(writer, self)?;
        Ok(())
    }
}

impl TmProvider for MemoryTmProvider {
    fn targets(&self, src_phrase: &str) -> Vec<String> {
        self.targets.get(src_phrase).cloned().unwrap_or_default()
    }

    fn src_count(&self, src_phrase: &str) -> u64 {
        *self.src_counts.get(src_phrase).unwrap_or(&0)
    }

    fn joint_count(&self, src_phrase: &str, trg_phrase: &str) -> u64 {
        *self
            .joint_counts
            .get(&(src_phrase.to_string(), trg_phrase.to_string()))
            .unwrap_or(&0)
    }
}

/// N-gram count table held entirely in memory, keyed by the literal token
/// vector (the empty vector holds the corpus-wide total token count).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryLmProvider {
    counts: HashMap<Vec<Token>, u64>,
}

impl MemoryLmProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_count(&mut self, ngram: &[Token], count: u64) {
        self.counts.insert(ngram.to_vec(), count);
    }

    pub fn add_count(&mut self, ngram: &[Token], delta: u64) {
        *self.counts.entry(ngram.to_vec()).or_insert(0) += delta;
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(bincode::deserialize_from(reader)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        bincode::serialize_into(writer, self)?;
        Ok(())
    }
}

impl LmProvider for MemoryLmProvider {
    fn count(&self, ngram: &[Token]) -> u64 {
        *self.counts.get(ngram).unwrap_or(&0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tm_provider_roundtrips_through_bincode_bytes() {
        let mut tm = MemoryTmProvider::new();
        tm.add("it is", "itis", 9);
        tm.add("it is", "it is", 1);
        let bytes = bincode::serialize(&tm).unwrap();
        let restored: MemoryTmProvider = bincode::deserialize(&bytes).unwrap();
        assert_eq!(restored.src_count("it is"), 10);
        assert_eq!(restored.joint_count("it is", "itis"), 9);
    }

    #[test]
    fn lm_provider_tracks_corpus_total_via_empty_ngram() {
        let mut lm = MemoryLmProvider::new();
        lm.add_count(&[], 100);
        lm.add_count(&["cat".to_string()], 5);
        assert_eq!(lm.count(&[]), 100);
        assert_eq!(lm.count(&["cat".to_string()]), 5);
        assert_eq!(lm.count(&["dog".to_string()]), 0);
    }
}
