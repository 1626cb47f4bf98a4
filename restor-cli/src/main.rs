use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use restor_core::config::DecoderConfig;
use restor_core::decoder::Decoder;
use restor_core::pipeline::{detokenize_line, recase_line};
use restor_core::providers::{MemoryLmProvider, MemoryTmProvider};
use restor_core::scorer_lm::LanguageScorer;
use restor_core::scorer_tm::TranslationScorer;
use restor_core::types::Weights;

/// Restores naturally spaced or naturally cased text from a mechanically
/// tokenized or lowercased stream, via a statistical phrase-based decoder.
#[derive(Parser)]
#[command(name = "restor", version)]
struct Cli {
    /// Emit debug-level search tracing in addition to info-level summaries.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Recover natural spacing from whitespace-tokenized lines.
    Detokenize(TaskArgs),
    /// Recover case from lowercased lines.
    Recase(TaskArgs),
}

#[derive(Args)]
struct TaskArgs {
    /// Input file; reads stdin when omitted.
    input: Option<PathBuf>,
    /// Bincode file holding a MemoryTmProvider (see restor-modelgen).
    #[arg(long)]
    tm_model: Option<PathBuf>,
    /// Bincode file holding a MemoryLmProvider (see restor-modelgen).
    #[arg(long)]
    lm_model: Option<PathBuf>,
    /// TOML decoder configuration (weights, lambda, n_max, ...).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Comma-separated `tm,pp,wp,lm` weight override. Any arity other than
    /// 4 falls back to uniform weights with a warning, rather than erroring.
    #[arg(long)]
    weights: Option<String>,
}

fn parse_weights_override(spec: &str) -> Weights {
    let values: Vec<f64> = spec
        .split(',')
        .filter_map(|s| s.trim().parse::<f64>().ok())
        .collect();
    Weights::from_slice(&values).unwrap_or_else(|| {
        tracing::warn!(
            "--weights {:?} did not parse as exactly 4 numbers, falling back to uniform weights",
            spec
        );
        Weights::default()
    })
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "restor_cli=debug,restor_core=debug"
    } else {
        "restor_cli=info,restor_core=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn load_decoder(args: &TaskArgs) -> Result<Decoder<MemoryTmProvider, MemoryLmProvider>> {
    let config = match &args.config {
        Some(path) => DecoderConfig::load_toml(path)
            .with_context(|| format!("loading decoder config from {}", path.display()))?,
        None => DecoderConfig::default(),
    };

    let tm_provider = match &args.tm_model {
        Some(path) => MemoryTmProvider::load(path)
            .with_context(|| format!("loading TM model from {}", path.display()))?,
        None => {
            tracing::warn!("no --tm-model given, every phrase will fall back to identity pass-through");
            MemoryTmProvider::new()
        }
    };
    let lm_provider = match &args.lm_model {
        Some(path) => MemoryLmProvider::load(path)
            .with_context(|| format!("loading LM model from {}", path.display()))?,
        None => {
            tracing::warn!("no --lm-model given, language-model scoring will be uniformly zero");
            MemoryLmProvider::new()
        }
    };

    let weights = match &args.weights {
        Some(spec) => parse_weights_override(spec),
        None => config.weights,
    };

    let tm = TranslationScorer::with_floor(tm_provider, config.tm_floor);
    let lm = LanguageScorer::new(lm_provider, config.lambda, config.n_max);
    Ok(Decoder::new(tm, lm, weights, config.max_iters))
}

fn run_lines(args: &TaskArgs, process: impl Fn(&Decoder<MemoryTmProvider, MemoryLmProvider>, &str) -> String) -> Result<()> {
    let decoder = load_decoder(args)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match &args.input {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("reading input file {}", path.display()))?;
            for line in content.lines() {
                writeln!(out, "{}", process(&decoder, line))?;
            }
        }
        None => {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let line = line.context("reading line from stdin")?;
                writeln!(out, "{}", process(&decoder, &line))?;
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Command::Detokenize(args) => run_lines(args, detokenize_line),
        Command::Recase(args) => run_lines(args, recase_line),
    }
}
