//
// Copyright, 2025.  Signal65 / Futurum Group.
//
//! CLI supporting `stats` and `batches` over a tab-separated review file.
//!
//! Examples:
//! ```bash
//! reviewdl-cli stats   --data train.tsv --vocab vocab.txt
//! reviewdl-cli stats   --data train.tsv --vocab vocab.txt --buckets 10 --ratio 0.2 --scheme exp-width
//! reviewdl-cli batches --data test.tsv  --vocab vocab.txt --eval --batch-size 64
//! reviewdl-cli -v batches --data train.tsv --vocab vocab.txt --seed 42
//! ```
//!
//! Review file format: one review per line, `score<TAB>text`, score in 0..=10.

use anyhow::{anyhow, bail, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use reviewdl::{
    preprocess_dataset, BucketScheme, DataLoader, DatasetError, FixedBucketSampler, Indexer,
    PipelineConfig, RegexTokenizer, ReviewDataset, Vocabulary,
};

/// Macro to safely print with broken pipe handling
macro_rules! safe_println {
    ($($arg:tt)*) => {
        match writeln!(io::stdout(), $($arg)*) {
            Ok(_) => {},
            Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                // Gracefully exit on broken pipe (e.g., when piped to head/tail)
                std::process::exit(0);
            }
            Err(e) => return Err(e.into())
        }
    };
}

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[arg(short = 'v',
        long,
        action = ArgAction::Count,
        help = "Increase log verbosity: -v = Info, -vv = Debug",
    )]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Preprocess a review file and print the bucket layout.
    Stats {
        #[command(flatten)]
        pipeline: PipelineArgs,
    },
    /// Run one pass of the loader and print one line per batch.
    Batches {
        #[command(flatten)]
        pipeline: PipelineArgs,

        /// Flat, unshuffled fixed-size batches instead of length buckets.
        #[arg(long)]
        eval: bool,
    },
}

/// Flags override `REVIEWDL_*` environment settings, which override built-in defaults.
#[derive(Args)]
struct PipelineArgs {
    /// Review file (`score<TAB>text` per line).
    #[arg(long, value_name = "FILE")]
    data: PathBuf,

    /// Vocabulary file (one token per line, id = line number).
    #[arg(long, value_name = "FILE")]
    vocab: PathBuf,

    /// Vocabulary entry used for out-of-vocabulary tokens.
    #[arg(long, default_value = "<unk>")]
    unknown_token: String,

    /// Lower-case text before lookup.
    #[arg(long)]
    lowercase: bool,

    /// Tokens kept per review.
    #[arg(long)]
    max_len: Option<usize>,

    /// Reference batch size.
    #[arg(short = 'b', long)]
    batch_size: Option<usize>,

    /// Number of length buckets.
    #[arg(long)]
    buckets: Option<usize>,

    /// Batch-size scale-up ratio for short buckets.
    #[arg(long)]
    ratio: Option<f32>,

    /// How bucket keys are spread over the length range.
    #[arg(long, value_enum)]
    scheme: Option<BucketScheme>,

    /// Shuffle with this seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Preprocessing worker threads (0 = number of CPUs).
    #[arg(short = 'j', long = "jobs")]
    jobs: Option<usize>,
}

impl PipelineArgs {
    fn config(&self) -> Result<PipelineConfig> {
        let mut cfg = PipelineConfig::from_env().context("reading REVIEWDL_* settings")?;
        if let Some(n) = self.max_len {
            cfg.max_seq_len = n;
        }
        if let Some(n) = self.batch_size {
            cfg.bucket.batch_size = n;
        }
        if let Some(n) = self.buckets {
            cfg.bucket.num_buckets = n;
        }
        if let Some(r) = self.ratio {
            cfg.bucket.ratio = r;
        }
        if let Some(s) = self.scheme {
            cfg.bucket.scheme = s;
        }
        if let Some(seed) = self.seed {
            cfg.bucket = cfg.bucket.shuffle(true, seed);
        }
        if let Some(j) = self.jobs {
            cfg.preprocess.num_workers = j;
        }
        Ok(cfg)
    }

    fn load(&self, cfg: &PipelineConfig) -> Result<ReviewDataset> {
        let vocab = Vocabulary::from_file(&self.vocab, &self.unknown_token)?;
        let reviews = read_reviews(&self.data)?;
        info!("read {} reviews from {}", reviews.len(), self.data.display());
        let indexer = Indexer::new(RegexTokenizer::new().lowercase(self.lowercase), vocab)
            .with_max_len(cfg.max_seq_len);
        let ds = preprocess_dataset(&indexer, &reviews.rows, &cfg.preprocess)
            .map_err(|e| reviews.locate(&self.data, e))?;
        Ok(ds)
    }
}

/// Parsed review file; `lines[i]` is the 1-based file line of `rows[i]`.
struct Reviews {
    rows: Vec<(String, i32)>,
    lines: Vec<usize>,
}

impl Reviews {
    fn len(&self) -> usize {
        self.rows.len()
    }

    /// Point a per-review preprocessing error at its line in `path`.
    fn locate(&self, path: &Path, err: DatasetError) -> anyhow::Error {
        match err {
            DatasetError::Input { index, reason } => match self.lines.get(index) {
                Some(line) => anyhow!("{}:{}: {}", path.display(), line, reason),
                None => anyhow!("{}: review {}: {}", path.display(), index, reason),
            },
            other => anyhow::Error::new(other).context(format!("preprocessing {}", path.display())),
        }
    }
}

fn read_reviews(path: &Path) -> Result<Reviews> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let mut out = Reviews { rows: Vec::new(), lines: Vec::new() };
    for (n, line) in raw.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let Some((score, text)) = line.split_once('\t') else {
            bail!("{}:{}: expected `score<TAB>text`", path.display(), n + 1);
        };
        let score: i32 = score
            .trim()
            .parse()
            .with_context(|| format!("{}:{}: bad score {score:?}", path.display(), n + 1))?;
        out.rows.push((text.to_string(), score));
        out.lines.push(n + 1);
    }
    Ok(out)
}

fn stats_cmd(pipeline: &PipelineArgs) -> Result<()> {
    let cfg = pipeline.config()?;
    let ds = pipeline.load(&cfg)?;
    let sampler = FixedBucketSampler::new(ds.lengths(), &cfg.bucket)?;
    safe_println!("{}", sampler);
    Ok(())
}

fn batches_cmd(pipeline: &PipelineArgs, eval: bool) -> Result<()> {
    let cfg = pipeline.config()?;
    let ds = pipeline.load(&cfg)?;
    let mut loader = if eval {
        DataLoader::sequential(ds, cfg.bucket.batch_size, cfg.loader.clone())?
    } else {
        DataLoader::bucketed(ds, &cfg.bucket, cfg.loader.clone())?
    };

    let (mut tokens, mut padded) = (0usize, 0usize);
    for (i, batch) in loader.iter().enumerate() {
        let batch = batch?;
        let real: usize = batch.valid_length.iter().sum();
        tokens += real;
        padded += batch.padding();
        safe_println!(
            "batch {:>5}  size {:>4}  width {:>4}  padding {:>6}",
            i,
            batch.batch_size(),
            batch.width(),
            batch.padding()
        );
    }
    let total = tokens + padded;
    let ratio = if total == 0 { 0.0 } else { padded as f64 / total as f64 };
    safe_println!("{} batches, {} tokens, {:.1}% padding", loader.len(), tokens, ratio * 100.0);
    Ok(())
}

fn main() -> Result<()> {
    // Loads any variables from .env file that are not already set
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",        // no -v: WARN level
        1 => "info",        // -v: INFO level
        _ => "debug",       // -vv or more: DEBUG level
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .init();

    // Initialize tracing-log bridge to capture log crate messages from dependencies
    tracing_log::LogTracer::init().ok();

    match cli.cmd {
        Command::Stats { pipeline } => stats_cmd(&pipeline)?,
        Command::Batches { pipeline, eval } => batches_cmd(&pipeline, eval)?,
    }
    Ok(())
}
