//! Error types for configuring and polling a datagen task.

use std::num::ParseIntError;
use std::path::PathBuf;
use thiserror::Error;

/// Malformed randomization directive.
#[derive(Error, Debug)]
pub enum DirectiveError {
    /// Entry has no `:` between field name and specification
    #[error("Directive '{0}' is missing ':' between field name and specification")]
    MissingSeparator(String),

    #[error("Directive '{0}' has an empty field name")]
    EmptyFieldName(String),

    #[error("Directive '{0}' has an empty specification")]
    EmptySpec(String),

    /// `random_int` needs exactly a lower and an upper bound
    #[error("Directive '{entry}' expects random_int:<lower>:<upper>, got {found} bound(s)")]
    IntBoundsArity { entry: String, found: usize },

    #[error("Directive '{entry}' has a non-integer bound '{bound}': {source}")]
    InvalidBound {
        entry: String,
        bound: String,
        #[source]
        source: ParseIntError,
    },

    /// Lower bound is not below the (exclusive) upper bound
    #[error("Directive '{entry}' has an empty range [{lower}, {upper})")]
    EmptyRange {
        entry: String,
        lower: i64,
        upper: i64,
    },

    #[error("Directive '{0}' does not name a file to replay")]
    EmptyReplayPath(String),

    /// `fromFile` must be the only directive
    #[error("Directive '{0}' selects file replay and cannot be combined with other directives")]
    MixedReplay(String),
}

/// Fatal error raised while building or applying a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required option: {0}")]
    MissingOption(&'static str),

    #[error("Invalid value for option '{option}': {reason}")]
    InvalidOption {
        option: &'static str,
        reason: String,
    },

    #[error("Message template is not valid JSON: {0}")]
    TemplateJson(#[source] serde_json::Error),

    #[error("Message template must be a JSON object, got {0}")]
    TemplateNotObject(&'static str),

    #[error("Invalid directive: {0}")]
    Directive(#[from] DirectiveError),

    /// The replay file could not be opened
    #[error("Failed to open replay file {}: {source}", path.display())]
    OpenSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Unsupported config file format: {0}")]
    UnsupportedFormat(String),
}

/// Failure while producing a record. Fails the whole batch.
#[derive(Error, Debug)]
pub enum GenerationError {
    /// Replay line has fewer comma-separated values than the template has fields
    #[error("Line {line} has {found} column(s), template expects {expected}")]
    MissingColumns {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("Current time cannot be represented as nanoseconds since epoch")]
    TimestampOutOfRange,

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error returned by a poll cycle.
#[derive(Error, Debug)]
pub enum PollError {
    /// The task's cancellation token fired while waiting for the poll interval
    #[error("Poll cancelled")]
    Cancelled,

    #[error("Task has been stopped")]
    Stopped,

    #[error("Generation failed: {0}")]
    Generation(#[from] GenerationError),

    /// Reading the replay file failed (as opposed to reaching its end)
    #[error("Failed to read replay file {}: {source}", path.display())]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
