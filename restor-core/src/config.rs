//! Decoder configuration: the statistical weights and smoothing knobs,
//! loadable from TOML the same way the rest of this codebase's configs are.

use crate::scorer_lm::{DEFAULT_LAMBDA, DEFAULT_N_MAX};
use crate::scorer_tm::TM_SMOOTH_PROB;
use crate::types::Weights;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Hard ceiling on best-first-search iterations per hypothesis requested,
/// guarding against runaway search on pathological input.
pub const DEFAULT_MAX_ITERS: u64 = 100_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecoderConfig {
    pub weights: Weights,
    /// Jelinek-Mercer interpolation weight for the language model.
    pub lambda: f64,
    /// Highest n-gram order consulted by the language model.
    pub n_max: usize,
    /// Translation-model smoothing floor for unseen phrase pairs.
    pub tm_floor: f64,
    pub max_iters: u64,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            weights: Weights::default(),
            lambda: DEFAULT_LAMBDA,
            n_max: DEFAULT_N_MAX,
            tm_floor: TM_SMOOTH_PROB,
            max_iters: DEFAULT_MAX_ITERS,
        }
    }
}

impl DecoderConfig {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_toml_str(&content)?)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let cfg = DecoderConfig::default();
        let toml_str = cfg.to_toml_string().unwrap();
        let parsed = DecoderConfig::from_toml_str(&toml_str).unwrap();
        assert_eq!(cfg, parsed);
    }
}
