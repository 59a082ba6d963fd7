//! Event timestamp generation.

use crate::error::GenerationError;
use chrono::Utc;

/// Current wall-clock time as nanoseconds since the Unix epoch.
pub fn now_nanos() -> Result<i64, GenerationError> {
    Utc::now()
        .timestamp_nanos_opt()
        .ok_or(GenerationError::TimestampOutOfRange)
}

/// Hands out event timestamps for one batch.
///
/// Values never go backwards within a batch, even if the wall clock does.
#[derive(Debug)]
pub struct BatchClock {
    last: i64,
}

impl BatchClock {
    pub fn new() -> Self {
        Self { last: i64::MIN }
    }

    /// Next timestamp in nanoseconds since the Unix epoch.
    pub fn next_nanos(&mut self) -> Result<i64, GenerationError> {
        self.last = self.last.max(now_nanos()?);
        Ok(self.last)
    }
}

impl Default for BatchClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_nanos_within_window() {
        let before = Utc::now().timestamp_nanos_opt().unwrap();
        let now = now_nanos().unwrap();
        let after = Utc::now().timestamp_nanos_opt().unwrap();

        assert!(before <= now && now <= after);
    }

    #[test]
    fn test_batch_clock_non_decreasing() {
        let mut clock = BatchClock::new();
        let mut previous = clock.next_nanos().unwrap();

        for _ in 0..1000 {
            let next = clock.next_nanos().unwrap();
            assert!(next >= previous);
            previous = next;
        }
    }
}
