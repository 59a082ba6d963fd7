//! Host loop: polls a datagen task and writes its records out.

use crate::args::OutputFormat;
use datagen_core::{DatagenTask, OutboundRecord, PollError, PollOutcome};
use std::time::{Duration, Instant};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, info};

/// Writes records as JSON lines.
pub struct RecordSink<W> {
    writer: W,
    format: OutputFormat,
    records_written: u64,
}

impl<W: AsyncWrite + Unpin> RecordSink<W> {
    pub fn new(writer: W, format: OutputFormat) -> Self {
        Self {
            writer,
            format,
            records_written: 0,
        }
    }

    /// Write a batch and flush it.
    pub async fn write_batch(&mut self, records: &[OutboundRecord]) -> anyhow::Result<()> {
        for record in records {
            match self.format {
                OutputFormat::Payload => self.writer.write_all(record.payload.as_bytes()).await?,
                OutputFormat::Record => {
                    let line = serde_json::to_vec(record)?;
                    self.writer.write_all(&line).await?;
                }
            }
            self.writer.write_all(b"\n").await?;
            self.records_written += 1;
        }
        self.writer.flush().await?;
        Ok(())
    }

    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// `max_polls` reached
    PollLimit,
    /// Replay file has no more lines
    Exhausted,
    /// Cancellation token fired
    Cancelled,
    /// Task was already stopped
    Stopped,
    /// `max_consecutive_failures` polls failed in a row
    TooManyFailures,
}

/// Options for [`run`].
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub max_polls: Option<u64>,
    /// Give up after this many failed polls in a row; `None` retries forever
    pub max_consecutive_failures: Option<u64>,
}

/// Metrics from a run.
#[derive(Debug, Clone, Default)]
pub struct RunMetrics {
    /// Poll cycles that completed, including failed ones
    pub polls: u64,
    pub records_emitted: u64,
    /// Polls that returned an error and emitted nothing
    pub failed_polls: u64,
    pub total_duration: Duration,
    pub stop_reason: Option<StopReason>,
}

impl RunMetrics {
    /// Calculate records per second.
    pub fn records_per_second(&self) -> f64 {
        if self.total_duration.as_secs_f64() > 0.0 {
            self.records_emitted as f64 / self.total_duration.as_secs_f64()
        } else {
            0.0
        }
    }
}

/// Poll `task` until the poll limit, exhaustion or cancellation, writing every
/// batch to `sink`. The task is stopped before returning.
///
/// A poll that fails is logged and counted; the loop carries on with the next
/// poll until `max_consecutive_failures` polls have failed in a row. Only a
/// failure to write records ends the run with an error.
pub async fn run<W: AsyncWrite + Unpin>(
    task: &mut DatagenTask,
    sink: &mut RecordSink<W>,
    options: &RunOptions,
) -> anyhow::Result<RunMetrics> {
    let start_time = Instant::now();
    let mut metrics = RunMetrics::default();
    let mut consecutive_failures = 0u64;

    let outcome = loop {
        if options.max_polls.is_some_and(|max| metrics.polls >= max) {
            info!("Reached poll limit of {}", metrics.polls);
            break Ok(StopReason::PollLimit);
        }

        match task.poll().await {
            Ok(PollOutcome::Batch(records)) => {
                metrics.polls += 1;
                consecutive_failures = 0;
                if let Err(e) = sink.write_batch(&records).await {
                    break Err(e);
                }
                metrics.records_emitted += records.len() as u64;
                debug!("Poll {} emitted {} record(s)", metrics.polls, records.len());
            }
            Ok(PollOutcome::Exhausted) => {
                metrics.polls += 1;
                info!("Replay file exhausted");
                break Ok(StopReason::Exhausted);
            }
            Err(PollError::Cancelled) => {
                info!("Run cancelled");
                break Ok(StopReason::Cancelled);
            }
            Err(PollError::Stopped) => break Ok(StopReason::Stopped),
            Err(e) => {
                metrics.polls += 1;
                metrics.failed_polls += 1;
                consecutive_failures += 1;
                error!("Poll {} failed, no records emitted: {e}", metrics.polls);

                if options
                    .max_consecutive_failures
                    .is_some_and(|max| consecutive_failures >= max)
                {
                    error!("Giving up after {consecutive_failures} consecutive failed poll(s)");
                    break Ok(StopReason::TooManyFailures);
                }
            }
        }
    };

    task.stop();
    metrics.total_duration = start_time.elapsed();
    metrics.stop_reason = Some(outcome?);

    info!(
        "Run complete: {} records in {} polls ({} failed) in {:?} ({:.2} records/sec)",
        metrics.records_emitted,
        metrics.polls,
        metrics.failed_polls,
        metrics.total_duration,
        metrics.records_per_second()
    );

    Ok(metrics)
}

/// Generate `count` records back to back, without the poll interval, and
/// write them to `sink`. Returns the number of records written, which is
/// lower than `count` if a replay file runs out first.
pub async fn sample<W: AsyncWrite + Unpin>(
    task: &mut DatagenTask,
    sink: &mut RecordSink<W>,
    count: u64,
) -> anyhow::Result<u64> {
    let mut written = 0u64;

    while written < count {
        let records = match task.generate().await? {
            PollOutcome::Batch(records) => records,
            PollOutcome::Exhausted => break,
        };
        let remaining = usize::try_from(count - written).unwrap_or(usize::MAX);
        let take = records.len().min(remaining);
        sink.write_batch(&records[..take]).await?;
        written += take as u64;
    }

    task.stop();
    Ok(written)
}
