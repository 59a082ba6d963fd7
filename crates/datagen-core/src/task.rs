//! The datagen task: configure once, poll repeatedly, stop.

use crate::config::Configuration;
use crate::directive::DirectivePlan;
use crate::error::{ConfigError, PollError};
use crate::generator::{
    BatchSpec, GenerationMode, RandomGenerator, RecordGenerator, ReplayGenerator,
};
use crate::record::PollOutcome;
use crate::template::MessageTemplate;
use datagen_file::{LineSource, DEFAULT_BUFFER_SIZE};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// A configured record generator driven by a single host.
///
/// The generation mode is fixed by [`DatagenTask::configure`]. In file replay
/// mode the task owns the open replay file until [`DatagenTask::stop`].
pub struct DatagenTask {
    config: Configuration,
    generator: RecordGenerator,
    cancel: CancellationToken,
    stopped: bool,
}

impl DatagenTask {
    /// Validate the configuration, parse the template and directives, and open
    /// the replay file when file replay is selected.
    pub async fn configure(config: Configuration) -> Result<Self, ConfigError> {
        config.validate()?;

        let template = MessageTemplate::parse(&config.message_template)?;
        let plan = DirectivePlan::parse(config.random_fields.as_slice())?;

        let generator = match plan {
            DirectivePlan::Random(rules) => {
                info!(
                    "Configured random generation for '{}' with {} directive(s)",
                    config.topic_name,
                    rules.len()
                );
                RecordGenerator::Random(RandomGenerator::new(template, rules, config.seed))
            }
            DirectivePlan::Replay(path) => {
                let source = LineSource::open(&path, DEFAULT_BUFFER_SIZE)
                    .await
                    .map_err(|source| ConfigError::OpenSource {
                        path: path.clone(),
                        source,
                    })?;
                info!(
                    "Configured file replay for '{}' from {}",
                    config.topic_name,
                    path.display()
                );
                RecordGenerator::Replay(ReplayGenerator::new(
                    template,
                    source,
                    config.read_failure,
                ))
            }
        };

        Ok(Self {
            config,
            generator,
            cancel: CancellationToken::new(),
            stopped: false,
        })
    }

    /// Use an externally owned cancellation token instead of the task's own.
    pub fn with_cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Token that aborts a poll waiting on its interval.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn mode(&self) -> GenerationMode {
        self.generator.mode()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Whether the task still holds an open replay file.
    pub fn holds_source(&self) -> bool {
        match &self.generator {
            RecordGenerator::Replay(generator) => generator.is_open(),
            RecordGenerator::Random(_) => false,
        }
    }

    /// Wait for the poll interval, then generate one batch.
    ///
    /// Returns [`PollError::Cancelled`] if the cancellation token fires during
    /// the wait.
    pub async fn poll(&mut self) -> Result<PollOutcome, PollError> {
        if self.stopped {
            return Err(PollError::Stopped);
        }

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                debug!("Poll for '{}' cancelled", self.config.topic_name);
                return Err(PollError::Cancelled);
            }
            _ = tokio::time::sleep(self.config.poll_interval) => {}
        }

        self.generate().await
    }

    /// Generate one batch immediately, without waiting for the poll interval.
    pub async fn generate(&mut self) -> Result<PollOutcome, PollError> {
        if self.stopped {
            return Err(PollError::Stopped);
        }

        let spec = BatchSpec {
            size: self.config.poll_size,
            topic: &self.config.topic_name,
            timestamp_field: &self.config.event_timestamp_field,
        };
        self.generator.next_batch(spec).await
    }

    /// Release the replay file, if any. Safe to call more than once.
    pub fn stop(&mut self) {
        if self.stopped {
            return;
        }

        if let RecordGenerator::Replay(generator) = &mut self.generator {
            generator.close();
        }
        self.stopped = true;

        info!("Stopped datagen task for '{}'", self.config.topic_name);
    }
}
