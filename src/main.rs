//! Command-line interface for json-datagen
//!
//! # Usage Examples
//!
//! ## Random generation
//! ```bash
//! datagen run --config web-logs.yaml --max-polls 100 --output events.jsonl
//! ```
//!
//! ## File replay
//! ```bash
//! datagen run --topic-name people \
//!   --message-template '{"name": "", "city": "", "ts": 0}' \
//!   --random-field fromFile:people.csv \
//!   --event-timestamp-field ts
//! ```
//!
//! Logging is controlled with `RUST_LOG` (e.g. `RUST_LOG=info`) and goes to
//! stderr; records go to stdout unless `--output` is given.

use anyhow::Context;
use clap::{Parser, Subcommand};
use datagen_core::DatagenTask;
use json_datagen::{ConfigArgs, RecordSink, RunArgs, RunOptions, SampleArgs};
use tokio::io::AsyncWrite;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Parser)]
#[command(name = "datagen")]
#[command(about = "Generate JSON events from a message template")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll the generator until interrupted, exhausted or the poll limit is hit
    Run {
        #[command(flatten)]
        config: ConfigArgs,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Configure the generator, report the selected mode, and stop
    Validate {
        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Print a few records immediately, ignoring the poll interval
    Sample {
        #[command(flatten)]
        config: ConfigArgs,

        #[command(flatten)]
        sample: SampleArgs,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, run } => run_generator(config, run).await,
        Commands::Validate { config } => validate(config).await,
        Commands::Sample { config, sample } => sample_records(config, sample).await,
    }
}

async fn run_generator(config_args: ConfigArgs, args: RunArgs) -> anyhow::Result<()> {
    let config = config_args.load()?;
    let mut task = DatagenTask::configure(config)
        .await
        .context("Failed to configure generator")?;

    setup_shutdown_handler(task.cancellation_token());

    let writer: Box<dyn AsyncWrite + Unpin + Send> = match &args.output {
        Some(path) => Box::new(
            tokio::fs::File::create(path)
                .await
                .with_context(|| format!("Failed to create output file {path:?}"))?,
        ),
        None => Box::new(tokio::io::stdout()),
    };
    let mut sink = RecordSink::new(writer, args.format);

    let options = RunOptions {
        max_polls: args.max_polls,
        max_consecutive_failures: Some(args.max_consecutive_failures).filter(|&max| max > 0),
    };
    let metrics = json_datagen::run(&mut task, &mut sink, &options).await?;

    if metrics.failed_polls > 0 {
        tracing::warn!("{} poll(s) failed during the run", metrics.failed_polls);
    }
    Ok(())
}

async fn validate(config_args: ConfigArgs) -> anyhow::Result<()> {
    let config = config_args.load()?;
    let topic_name = config.topic_name.clone();

    let mut task = DatagenTask::configure(config)
        .await
        .context("Failed to configure generator")?;
    let mode = task.mode();
    task.stop();

    println!("Configuration OK: topic '{topic_name}', mode {mode:?}");
    Ok(())
}

async fn sample_records(config_args: ConfigArgs, args: SampleArgs) -> anyhow::Result<()> {
    let config = config_args.load()?;
    let mut task = DatagenTask::configure(config)
        .await
        .context("Failed to configure generator")?;

    let mut sink = RecordSink::new(tokio::io::stdout(), args.format);
    let written = json_datagen::sample(&mut task, &mut sink, args.count).await?;

    info!("Printed {written} sample record(s)");
    Ok(())
}

/// Cancel the task's pending poll on Ctrl+C
fn setup_shutdown_handler(token: CancellationToken) {
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            return;
        }

        info!("Received interrupt signal (Ctrl+C)");
        token.cancel();
    });
}
