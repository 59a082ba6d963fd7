//! CLI argument definitions shared by the datagen commands.

use anyhow::Context;
use clap::{Args, ValueEnum};
use datagen_core::{parse_duration, Configuration, ReadFailurePolicy};
use std::path::PathBuf;
use std::time::Duration;

/// Where the task configuration comes from.
///
/// Flags override values loaded from `--config`. Without a config file,
/// `--topic-name` and `--message-template` are required.
#[derive(Args, Clone, Debug, Default)]
pub struct ConfigArgs {
    /// Path to a YAML or TOML configuration file
    #[arg(long, short = 'c', env = "DATAGEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Topic every record is tagged with
    #[arg(long)]
    pub topic_name: Option<String>,

    /// Message template as JSON object text
    #[arg(long)]
    pub message_template: Option<String>,

    /// Randomization directive (repeatable), e.g. "ip:random_ip" or "fromFile:rows.csv"
    #[arg(long = "random-field", value_name = "DIRECTIVE")]
    pub random_fields: Vec<String>,

    /// Records per poll
    #[arg(long)]
    pub poll_size: Option<usize>,

    /// Sleep before each poll (e.g. "500", "250ms", "2s")
    #[arg(long, value_parser = parse_duration)]
    pub poll_interval: Option<Duration>,

    /// Field that receives the generation timestamp in nanoseconds
    #[arg(long)]
    pub event_timestamp_field: Option<String>,

    /// Random seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,

    /// How replay file read failures are reported
    #[arg(long, value_enum)]
    pub read_failure: Option<ReadFailureArg>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadFailureArg {
    /// Fail the poll and report the I/O error
    Surface,
    /// Treat the failure like end of file
    Legacy,
}

impl From<ReadFailureArg> for ReadFailurePolicy {
    fn from(arg: ReadFailureArg) -> Self {
        match arg {
            ReadFailureArg::Surface => ReadFailurePolicy::Surface,
            ReadFailureArg::Legacy => ReadFailurePolicy::Legacy,
        }
    }
}

impl ConfigArgs {
    /// Build the task configuration from the config file and flag overrides.
    pub fn load(&self) -> anyhow::Result<Configuration> {
        let mut config = match &self.config {
            Some(path) => Configuration::from_file(path)
                .with_context(|| format!("Failed to load config from {path:?}"))?,
            None => {
                let topic_name = self
                    .topic_name
                    .clone()
                    .context("--topic-name is required without --config")?;
                let message_template = self
                    .message_template
                    .clone()
                    .context("--message-template is required without --config")?;
                Configuration::new(topic_name, message_template)
            }
        };

        if let Some(topic_name) = &self.topic_name {
            config.topic_name = topic_name.clone();
        }
        if let Some(message_template) = &self.message_template {
            config.message_template = message_template.clone();
        }
        if !self.random_fields.is_empty() {
            config.random_fields = self.random_fields.clone();
        }
        if let Some(poll_size) = self.poll_size {
            config.poll_size = poll_size;
        }
        if let Some(poll_interval) = self.poll_interval {
            config.poll_interval = poll_interval;
        }
        if let Some(field) = &self.event_timestamp_field {
            config.event_timestamp_field = field.clone();
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(read_failure) = self.read_failure {
            config.read_failure = read_failure.into();
        }

        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}

/// How records are written to the output.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One JSON payload per line
    #[default]
    Payload,
    /// One `{"topic": ..., "payload": ...}` object per line
    Record,
}

/// Arguments for the `run` command.
#[derive(Args, Clone, Debug)]
pub struct RunArgs {
    /// Stop after this many polls (default: run until interrupted or exhausted)
    #[arg(long)]
    pub max_polls: Option<u64>,

    /// Stop after this many polls fail in a row (0 retries forever)
    #[arg(long, default_value = "10")]
    pub max_consecutive_failures: u64,

    /// Write records to this file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Output line format
    #[arg(long, value_enum, default_value_t = OutputFormat::Payload)]
    pub format: OutputFormat,
}

/// Arguments for the `sample` command.
#[derive(Args, Clone, Debug)]
pub struct SampleArgs {
    /// Number of records to print
    #[arg(long, short = 'n', default_value = "5")]
    pub count: u64,

    /// Output line format
    #[arg(long, value_enum, default_value_t = OutputFormat::Payload)]
    pub format: OutputFormat,
}
