//! Template-driven JSON record generator.
//!
//! A [`DatagenTask`] periodically produces JSON records shaped like a message
//! template, with fields overwritten by randomization directives or by the
//! columns of a replay file, plus an optional event timestamp.
//!
//! # Lifecycle
//!
//! ```text
//! Configuration
//!        │  DatagenTask::configure (template + directives parsed once,
//!        ▼                          replay file opened)
//! ┌─────────────────┐
//! │   DatagenTask   │──poll()──▶ sleep(poll_interval) ─▶ up to poll_size records
//! │                 │
//! │  - mode (fixed) │──stop()──▶ replay file released
//! └─────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use datagen_core::{Configuration, DatagenTask, PollOutcome};
//! use std::time::Duration;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Configuration::new("web-logs", r#"{"ip": "", "method": "GET", "ts": 0}"#)
//!     .with_poll_interval(Duration::from_millis(500))
//!     .with_poll_size(10)
//!     .with_random_fields(["ip:random_ip", "method:GET|POST"])
//!     .with_event_timestamp_field("ts");
//!
//! let mut task = DatagenTask::configure(config).await?;
//! if let PollOutcome::Batch(records) = task.poll().await? {
//!     for record in records {
//!         println!("{} {}", record.topic, record.payload);
//!     }
//! }
//! task.stop();
//! # Ok(())
//! # }
//! ```
//!
//! # Directives
//!
//! - `field:random_ip` - address from a fixed prefix pool plus a random octet
//! - `field:uuid` - random v4 UUID
//! - `field:random_int:<lower>:<upper>` - integer in `[lower, upper)`
//! - `field:a|b|c` - one of the literals
//! - `fromFile:<path>` - as the only directive, replay comma-separated lines
//!   from `path`, mapping columns onto template fields by position

pub mod config;
pub mod directive;
pub mod duration;
pub mod error;
pub mod generator;
pub mod generators;
pub mod record;
pub mod task;
pub mod template;

// Re-exports for convenience
pub use config::{Configuration, ReadFailurePolicy};
pub use directive::{DirectivePlan, FieldRule, Rule};
pub use duration::parse_duration;
pub use error::{ConfigError, DirectiveError, GenerationError, PollError};
pub use generator::GenerationMode;
pub use record::{OutboundRecord, PollOutcome};
pub use task::DatagenTask;
pub use template::MessageTemplate;
