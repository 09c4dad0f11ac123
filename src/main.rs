//! textphash CLI
//!
//! Compute and compare perceptual text hashes from the shell.

use std::error::Error;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use textphash::{
    fingerprint_text, percent_match, PHashConfig, PHashFileConfig, WordHashFunction,
};

#[derive(Parser)]
#[command(name = "textphash")]
#[command(version)]
#[command(about = "Perceptual hashing and similarity for text", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    params: ParamArgs,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Verbose (debug) logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Args)]
struct ParamArgs {
    /// YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Bits per word-hash bucket index
    #[arg(long, global = true)]
    bits: Option<u32>,

    /// Bits per normalized histogram counter
    #[arg(long, global = true)]
    hit_bits: Option<u32>,

    /// Tokens melded into one n-gram
    #[arg(short = 'n', long, global = true)]
    ngram_words: Option<usize>,

    /// Word hash function (djb, fnv1a, murmur3)
    #[arg(long = "hash", global = true)]
    word_hash: Option<WordHashFunction>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the digest of a text (argument, file, or stdin)
    Hash {
        /// Text to hash
        text: Option<String>,

        /// Read the text from a file
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,
    },

    /// Percent match between two digests
    Compare {
        digest_a: String,
        digest_b: String,
    },

    /// Hash two texts and report their percent match
    Similarity { text_a: String, text_b: String },
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_json);

    let cfg = resolve_config(&cli.params)?;

    match cli.command {
        Commands::Hash { text, file } => {
            let text = read_text(text, file)?;
            let fp = fingerprint_text(&text, &cfg)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&fp)?);
            } else {
                println!("{}", fp.digest);
            }
        }
        Commands::Compare { digest_a, digest_b } => {
            let pct = percent_match(&digest_a, &digest_b, &cfg)?;
            if cli.json {
                println!("{}", json!({ "percent_match": pct }));
            } else {
                println!("{pct:.2}");
            }
        }
        Commands::Similarity { text_a, text_b } => {
            let a = fingerprint_text(&text_a, &cfg)?;
            let b = fingerprint_text(&text_b, &cfg)?;
            let pct = percent_match(&a.digest, &b.digest, &cfg)?;
            if cli.json {
                println!(
                    "{}",
                    json!({
                        "digest_a": a.digest,
                        "digest_b": b.digest,
                        "percent_match": pct,
                    })
                );
            } else {
                println!("A: {}", a.digest);
                println!("B: {}", b.digest);
                println!("match: {pct:.2}%");
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool, as_json: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr);
    if as_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// File config first, then individual flags on top.
fn resolve_config(params: &ParamArgs) -> Result<PHashConfig, Box<dyn Error>> {
    let mut cfg = match &params.config {
        Some(path) => PHashFileConfig::from_file(path)?.into_config(),
        None => PHashConfig::default(),
    };
    if let Some(bits) = params.bits {
        cfg = cfg.with_word_hash_bit_size(bits);
    }
    if let Some(bits) = params.hit_bits {
        cfg = cfg.with_hit_value_bits(bits);
    }
    if let Some(n) = params.ngram_words {
        cfg = cfg.with_ngram_words(n);
    }
    if let Some(word_hash) = params.word_hash {
        cfg = cfg.with_word_hash(word_hash);
    }
    cfg.validate()?;
    Ok(cfg)
}

fn read_text(text: Option<String>, file: Option<PathBuf>) -> io::Result<String> {
    match (text, file) {
        (Some(text), _) => Ok(text),
        (None, Some(path)) => fs::read_to_string(path),
        (None, None) => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}
