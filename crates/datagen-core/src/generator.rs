//! Record generation for the two modes: random synthesis and file replay.

use crate::config::ReadFailurePolicy;
use crate::directive::FieldRule;
use crate::error::{GenerationError, PollError};
use crate::generators::generate_value;
use crate::generators::timestamp::BatchClock;
use crate::record::{OutboundRecord, PollOutcome};
use crate::template::MessageTemplate;
use datagen_file::{LineRead, LineSource};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::{Map, Value};
use tracing::{debug, error};

/// Which generation mode a task runs in. Fixed at configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    Random,
    FileReplay,
}

/// Per-batch settings shared by both modes.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BatchSpec<'a> {
    pub size: usize,
    pub topic: &'a str,
    /// Empty disables timestamping
    pub timestamp_field: &'a str,
}

pub(crate) enum RecordGenerator {
    Random(RandomGenerator),
    Replay(ReplayGenerator),
}

impl RecordGenerator {
    pub fn mode(&self) -> GenerationMode {
        match self {
            RecordGenerator::Random(_) => GenerationMode::Random,
            RecordGenerator::Replay(_) => GenerationMode::FileReplay,
        }
    }

    /// Produce up to `spec.size` records.
    ///
    /// Any error discards the records built so far in this batch.
    pub async fn next_batch(&mut self, spec: BatchSpec<'_>) -> Result<PollOutcome, PollError> {
        let mut clock = BatchClock::new();
        let mut records = Vec::with_capacity(spec.size);

        for _ in 0..spec.size {
            let mut message = match self {
                RecordGenerator::Random(generator) => generator.next_message(),
                RecordGenerator::Replay(generator) => match generator.next_message().await? {
                    Some(message) => message,
                    None => break,
                },
            };

            if !spec.timestamp_field.is_empty() {
                message.insert(
                    spec.timestamp_field.to_string(),
                    Value::from(clock.next_nanos()?),
                );
            }

            let payload = serde_json::to_string(&message).map_err(GenerationError::from)?;
            records.push(OutboundRecord::new(spec.topic, payload));
        }

        if records.is_empty() && self.mode() == GenerationMode::FileReplay {
            return Ok(PollOutcome::Exhausted);
        }

        debug!("Generated {} record(s) for '{}'", records.len(), spec.topic);
        Ok(PollOutcome::Batch(records))
    }
}

/// Fills template copies with values drawn from the directive rules.
pub struct RandomGenerator {
    template: MessageTemplate,
    rules: Vec<FieldRule>,
    rng: StdRng,
}

impl RandomGenerator {
    /// Create a generator; without a seed the RNG is seeded from the OS.
    pub fn new(template: MessageTemplate, rules: Vec<FieldRule>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            template,
            rules,
            rng,
        }
    }

    /// Template copy with every directive applied in order.
    pub fn next_message(&mut self) -> Map<String, Value> {
        let mut message = self.template.instantiate();
        for FieldRule { field, rule } in &self.rules {
            message.insert(field.clone(), generate_value(rule, &mut self.rng));
        }
        message
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }
}

/// Maps lines of a comma-separated file positionally onto template fields.
pub struct ReplayGenerator {
    template: MessageTemplate,
    fields: Vec<String>,
    source: LineSource,
    read_failure: ReadFailurePolicy,
}

impl ReplayGenerator {
    pub fn new(
        template: MessageTemplate,
        source: LineSource,
        read_failure: ReadFailurePolicy,
    ) -> Self {
        let fields = template.field_names().map(str::to_string).collect();
        Self {
            template,
            fields,
            source,
            read_failure,
        }
    }

    /// Next message, or `None` once the file is exhausted.
    ///
    /// Under [`ReadFailurePolicy::Legacy`] a failed read also returns `None`.
    pub async fn next_message(&mut self) -> Result<Option<Map<String, Value>>, PollError> {
        let line = match self.source.next_line().await {
            LineRead::Line(line) => line,
            LineRead::Exhausted => return Ok(None),
            LineRead::Failed(source) => {
                return match self.read_failure {
                    ReadFailurePolicy::Surface => Err(PollError::SourceRead {
                        path: self.source.path().to_path_buf(),
                        source,
                    }),
                    ReadFailurePolicy::Legacy => {
                        error!(
                            "Failed to read {}: {source}",
                            self.source.path().display()
                        );
                        Ok(None)
                    }
                };
            }
        };

        let values: Vec<&str> = line.split(',').collect();
        if values.len() < self.fields.len() {
            return Err(GenerationError::MissingColumns {
                line: self.source.lines_read(),
                expected: self.fields.len(),
                found: values.len(),
            }
            .into());
        }

        let mut message = self.template.instantiate();
        for (field, value) in self.fields.iter().zip(values) {
            message.insert(field.clone(), Value::String(value.to_string()));
        }
        Ok(Some(message))
    }

    /// Release the replay file. Returns `true` if it was still open.
    pub fn close(&mut self) -> bool {
        self.source.close()
    }

    pub fn is_open(&self) -> bool {
        self.source.is_open()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directive::Rule;

    fn template(json: &str) -> MessageTemplate {
        MessageTemplate::parse(json).unwrap()
    }

    #[test]
    fn test_random_message_overwrites_and_appends() {
        let rules = vec![
            FieldRule {
                field: "method".to_string(),
                rule: Rule::OneOf(vec!["PUT".to_string()]),
            },
            FieldRule {
                field: "extra".to_string(),
                rule: Rule::IntRange { lower: 1, upper: 2 },
            },
        ];
        let mut generator =
            RandomGenerator::new(template(r#"{"method": "GET", "path": "/"}"#), rules, Some(1));

        let message = generator.next_message();
        let keys: Vec<_> = message.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["method", "path", "extra"]);
        assert_eq!(message["method"], "PUT");
        assert_eq!(message["path"], "/");
        assert_eq!(message["extra"], 1);
    }

    #[test]
    fn test_random_later_directive_wins() {
        let rules = vec![
            FieldRule {
                field: "a".to_string(),
                rule: Rule::OneOf(vec!["first".to_string()]),
            },
            FieldRule {
                field: "a".to_string(),
                rule: Rule::OneOf(vec!["second".to_string()]),
            },
        ];
        let mut generator = RandomGenerator::new(template("{}"), rules, None);
        assert_eq!(generator.next_message()["a"], "second");
    }

    #[test]
    fn test_random_same_seed_same_messages() {
        let rules = vec![
            FieldRule {
                field: "id".to_string(),
                rule: Rule::Uuid,
            },
            FieldRule {
                field: "ip".to_string(),
                rule: Rule::RandomIp,
            },
        ];
        let mut gen1 = RandomGenerator::new(template("{}"), rules.clone(), Some(42));
        let mut gen2 = RandomGenerator::new(template("{}"), rules, Some(42));

        for _ in 0..10 {
            assert_eq!(gen1.next_message(), gen2.next_message());
        }
    }

    #[tokio::test]
    async fn test_replay_column_mismatch() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("rows.csv");
        std::fs::write(&path, "a,b,c\nonly-one\n").unwrap();

        let source = LineSource::open(&path, 1024).await.unwrap();
        let mut generator = ReplayGenerator::new(
            template(r#"{"x": "", "y": ""}"#),
            source,
            ReadFailurePolicy::Surface,
        );

        // Extra columns are ignored
        let first = generator.next_message().await.unwrap().unwrap();
        assert_eq!(first["x"], "a");
        assert_eq!(first["y"], "b");
        assert_eq!(first.len(), 2);

        let second = generator.next_message().await;
        assert!(matches!(
            second,
            Err(PollError::Generation(GenerationError::MissingColumns {
                line: 2,
                expected: 2,
                found: 1
            }))
        ));
    }
}
