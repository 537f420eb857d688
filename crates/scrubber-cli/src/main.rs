//! Scrubber CLI
//!
//! Command-line interface for scrubbing PII from free-text records.
//!
//! Usage:
//! ```bash
//! # Scrub a JSONL file, one {"entry_id", "text"} object per line
//! scrubber scrub --in entries.jsonl --out scrubbed.jsonl
//!
//! # With a config file and a different resolution policy
//! scrubber --config scrubber.yaml scrub --in entries.jsonl --out scrubbed.jsonl \
//!   --resolution priority_first
//!
//! # Scrub a single string
//! scrubber text "Contact me at test@example.com"
//! ```

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use scrubber_pii::{
    BatchOptions, BatchSummary, OutputRecord, ResolutionPolicy, Scrubber, ScrubberConfig,
    process_jsonl,
};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{Level, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "scrubber")]
#[command(about = "Scrubber - PII detection and redaction for free-text records", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to configuration file (YAML or TOML)
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "SCRUBBER_CONFIG",
        global = true
    )]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL", global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrub a JSONL file of records
    Scrub {
        /// Input JSONL file
        #[arg(long = "in", value_name = "FILE")]
        input: PathBuf,

        /// Output JSONL file
        #[arg(long = "out", value_name = "FILE")]
        output: PathBuf,

        /// Overlap resolution policy (earliest_start or priority_first)
        #[arg(long, value_name = "POLICY")]
        resolution: Option<ResolutionPolicy>,

        /// Abort on the first invalid record instead of skipping it
        #[arg(long, default_value = "false")]
        fail_fast: bool,
    },
    /// Scrub a single string and print the result as JSON
    Text {
        /// Identifier echoed back in the result
        #[arg(long)]
        id: Option<String>,

        /// Text to scrub
        text: String,
    },
    /// List the registered categories and their priorities
    Categories,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    init_tracing(&config.logging.level)?;

    match cli.command {
        Commands::Scrub {
            input,
            output,
            resolution,
            fail_fast,
        } => {
            // CLI flags have the highest precedence
            if let Some(policy) = resolution {
                config.resolution = policy;
            }
            if fail_fast {
                config.batch.continue_on_error = false;
            }

            let summary = run_scrub(&config, input, output).await?;
            println!(
                "Processed {} records ({} failed)",
                summary.processed, summary.failed
            );
            for error in &summary.errors {
                println!("  line {}: {}", error.line, error.message);
            }
            if summary.cancelled {
                bail!("Cancelled after {} records", summary.processed);
            }
        }
        Commands::Text { id, text } => {
            let scrubber = Scrubber::from_config(&config)?;
            println!("{}", render_text(&scrubber, &text, id.as_deref())?);
        }
        Commands::Categories => {
            let scrubber = Scrubber::from_config(&config)?;
            for (category, priority) in scrubber.priorities() {
                println!("{:<16} {}", category.as_str(), priority);
            }
        }
    }

    Ok(())
}

/// Scrub one string into the same record shape the JSONL writer emits
fn render_text(scrubber: &Scrubber, text: &str, id: Option<&str>) -> anyhow::Result<String> {
    let result = scrubber.scrub(text, id);
    let record = OutputRecord::from_result(text, result);
    Ok(serde_json::to_string_pretty(&record)?)
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ScrubberConfig> {
    let mut config = match path {
        Some(path) => ScrubberConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ScrubberConfig::default(),
    };

    // Environment variables override the config file
    config.merge_env();
    Ok(config)
}

fn init_tracing(level: &str) -> anyhow::Result<()> {
    let log_level = parse_level(level);

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::new(log_level.to_string()))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

async fn run_scrub(
    config: &ScrubberConfig,
    input: PathBuf,
    output: PathBuf,
) -> anyhow::Result<BatchSummary> {
    let scrubber = Scrubber::from_config(config)?;
    let options = BatchOptions {
        continue_on_error: config.batch.continue_on_error,
    };

    // Ctrl-C stops the run at the next record boundary
    let cancel = Arc::new(AtomicBool::new(false));
    let signal_flag = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after the current record");
            signal_flag.store(true, Ordering::SeqCst);
        }
    });

    info!(
        input = %input.display(),
        output = %output.display(),
        policy = %config.resolution,
        "Scrubbing records"
    );

    tokio::task::spawn_blocking(move || scrub_files(&scrubber, &input, &output, &options, &cancel))
        .await
        .context("Scrub task panicked")?
}

fn scrub_files(
    scrubber: &Scrubber,
    input: &Path,
    output: &Path,
    options: &BatchOptions,
    cancel: &AtomicBool,
) -> anyhow::Result<BatchSummary> {
    let reader = File::open(input)
        .map(BufReader::new)
        .with_context(|| format!("Failed to open input {}", input.display()))?;
    let writer = File::create(output)
        .map(BufWriter::new)
        .with_context(|| format!("Failed to create output {}", output.display()))?;

    let summary = process_jsonl(scrubber, reader, writer, options, cancel)
        .with_context(|| format!("Failed to scrub {}", input.display()))?;
    Ok(summary)
}
