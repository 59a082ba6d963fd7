//! json-datagen
//!
//! A synthetic event generator that periodically produces JSON records shaped
//! like a message template, with fields filled from randomization directives
//! or replayed from a comma-separated file.
//!
//! The generation engine lives in the `datagen_core` crate. This crate is the
//! host around it: configuration loading from files and flags, the poll loop,
//! and the record sink.
//!
//! # CLI Usage
//!
//! ```bash
//! # Run from a config file, writing JSON lines to stdout
//! datagen run --config datagen.yaml
//!
//! # Override options on the command line
//! datagen run --config datagen.yaml --poll-size 100 --poll-interval 250ms --max-polls 10
//!
//! # No config file at all
//! datagen run --topic-name logs \
//!   --message-template '{"ip": "", "status": 0}' \
//!   --random-field ip:random_ip --random-field status:random_int:200:600
//!
//! # Check a configuration, or print a few records immediately
//! datagen validate --config datagen.yaml
//! datagen sample --config datagen.yaml --count 3
//! ```

pub mod args;
pub mod runner;

pub use args::{ConfigArgs, OutputFormat, ReadFailureArg, RunArgs, SampleArgs};
pub use runner::{run, sample, RecordSink, RunMetrics, RunOptions, StopReason};
