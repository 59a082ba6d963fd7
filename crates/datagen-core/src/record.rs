//! Records handed back to the host by a poll cycle.

use serde::Serialize;

/// A serialized message tagged with its destination.
///
/// Partition and offset bookkeeping belong to the host and are not tracked here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundRecord {
    pub topic: String,
    /// UTF-8 JSON text of the generated message
    pub payload: String,
}

impl OutboundRecord {
    pub fn new(topic: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            payload: payload.into(),
        }
    }

    /// Parse the payload back into a JSON value.
    pub fn payload_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_str(&self.payload)
    }
}

/// Result of a successful poll cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// Between zero and `poll_size` records
    Batch(Vec<OutboundRecord>),
    /// The replay file has no more lines; further polls will not produce records
    Exhausted,
}

impl PollOutcome {
    /// Records of this poll; empty when exhausted.
    pub fn into_records(self) -> Vec<OutboundRecord> {
        match self {
            PollOutcome::Batch(records) => records,
            PollOutcome::Exhausted => Vec::new(),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, PollOutcome::Exhausted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serializes_with_topic() {
        let record = OutboundRecord::new("logs", r#"{"a":1}"#);
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"topic":"logs","payload":"{\"a\":1}"}"#);
        assert_eq!(record.payload_json().unwrap()["a"], 1);
    }

    #[test]
    fn test_exhausted_has_no_records() {
        assert!(PollOutcome::Exhausted.into_records().is_empty());
        assert!(PollOutcome::Exhausted.is_exhausted());
        assert!(!PollOutcome::Batch(Vec::new()).is_exhausted());
    }
}
