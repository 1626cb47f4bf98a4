use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use restor_core::providers::{MemoryLmProvider, MemoryTmProvider};

/// Builds the bincode provider files `restor-cli` loads via `--tm-model`/
/// `--lm-model`, from plain-text count dumps.
#[derive(Parser)]
#[command(name = "restor-modelgen", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a MemoryTmProvider from a phrase-table count dump.
    ///
    /// Input format: one `src_phrase<TAB>trg_phrase<TAB>count` line per
    /// observed pairing, `src_phrase`/`trg_phrase` themselves space-joined.
    Tm {
        input: PathBuf,
        output: PathBuf,
    },
    /// Build a MemoryLmProvider from an n-gram count dump.
    ///
    /// Input format: one `ngram<TAB>count` line per n-gram, `ngram` itself
    /// space-joined and possibly empty (an empty ngram holds the corpus
    /// total token count, used to floor the unigram estimate).
    Lm {
        input: PathBuf,
        output: PathBuf,
    },
}

fn split_tab_count(line: &str) -> Option<(&str, u64)> {
    let line = line.trim_end_matches('\n');
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let (head, count_str) = line.rsplit_once('\t')?;
    let count = count_str.trim().parse::<u64>().ok()?;
    Some((head, count))
}

fn build_tm(input: &PathBuf) -> Result<MemoryTmProvider> {
    let reader = BufReader::new(File::open(input).with_context(|| format!("opening {}", input.display()))?);
    let mut tm = MemoryTmProvider::new();
    for line in reader.lines() {
        let line = line?;
        let Some((head, count)) = split_tab_count(&line) else {
            continue;
        };
        let Some((src, trg)) = head.rsplit_once('\t') else {
            tracing::warn!("skipping malformed TM line: {:?}", line);
            continue;
        };
        tm.add(src, trg, count);
    }
    Ok(tm)
}

fn build_lm(input: &PathBuf) -> Result<MemoryLmProvider> {
    let reader = BufReader::new(File::open(input).with_context(|| format!("opening {}", input.display()))?);
    let mut lm = MemoryLmProvider::new();
    for line in reader.lines() {
        let line = line?;
        let Some((ngram_str, count)) = split_tab_count(&line) else {
            continue;
        };
        let ngram: Vec<String> = ngram_str.split_whitespace().map(String::from).collect();
        lm.add_count(&ngram, count);
    }
    Ok(lm)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match &cli.command {
        Command::Tm { input, output } => {
            let tm = build_tm(input)?;
            tm.save(output).with_context(|| format!("writing {}", output.display()))?;
            println!("wrote {}", output.display());
        }
        Command::Lm { input, output } => {
            let lm = build_lm(input)?;
            lm.save(output).with_context(|| format!("writing {}", output.display()))?;
            println!("wrote {}", output.display());
        }
    }
    Ok(())
}
