//! Datagen task configuration.
//!
//! A [`Configuration`] can be built three ways:
//!
//! - from a string property map using the connector option names
//!   (`poll.interval`, `poll.size`, `topic.name`, ...), see [`Configuration::from_properties`]
//! - from a YAML or TOML file with snake_case keys, see [`Configuration::from_file`]
//! - in code with [`Configuration::new`] and the `with_*` builders
//!
//! ```yaml
//! topic_name: web-logs
//! poll_interval: 500ms
//! poll_size: 10
//! event_timestamp_field: ts
//! message_template:
//!   ip: ""
//!   method: GET
//!   status: 200
//!   ts: 0
//! random_fields:
//!   - ip:random_ip
//!   - method:GET|POST|PUT
//!   - status:random_int:200:600
//! ```

use crate::duration::parse_duration;
use crate::error::ConfigError;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

pub const POLL_INTERVAL_CONFIG: &str = "poll.interval";
pub const POLL_SIZE_CONFIG: &str = "poll.size";
pub const TOPIC_NAME_CONFIG: &str = "topic.name";
pub const MESSAGE_TEMPLATE_CONFIG: &str = "message.template";
pub const RANDOM_FIELDS_CONFIG: &str = "random.fields";
pub const EVENT_TIMESTAMP_FIELD_CONFIG: &str = "event.timestamp.field";
pub const SEED_CONFIG: &str = "seed";
pub const READ_FAILURE_CONFIG: &str = "read.failure";

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);
pub const DEFAULT_POLL_SIZE: usize = 1;

/// How a failed read of the replay file is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadFailurePolicy {
    /// Fail the poll with `PollError::SourceRead`
    #[default]
    Surface,
    /// Log the failure and end the batch early, exactly like end of file
    Legacy,
}

impl FromStr for ReadFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "surface" => Ok(ReadFailurePolicy::Surface),
            "legacy" => Ok(ReadFailurePolicy::Legacy),
            other => Err(format!(
                "Unknown read failure policy '{other}', expected 'surface' or 'legacy'"
            )),
        }
    }
}

/// Options recognized by a datagen task.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    /// Sleep at the start of every poll
    pub poll_interval: Duration,
    /// Maximum number of records per poll
    pub poll_size: usize,
    /// Destination every record is tagged with
    pub topic_name: String,
    /// JSON object text used as the shape and defaults of every record
    pub message_template: String,
    /// Ordered `field:spec` directives, or a single `fromFile:<path>`
    pub random_fields: Vec<String>,
    /// Field overwritten with the generation timestamp; empty disables it
    pub event_timestamp_field: String,
    /// Seed for reproducible random output
    pub seed: Option<u64>,
    pub read_failure: ReadFailurePolicy,
}

impl Configuration {
    /// Create a configuration with default poll settings and no directives.
    pub fn new(topic_name: impl Into<String>, message_template: impl Into<String>) -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            poll_size: DEFAULT_POLL_SIZE,
            topic_name: topic_name.into(),
            message_template: message_template.into(),
            random_fields: Vec::new(),
            event_timestamp_field: String::new(),
            seed: None,
            read_failure: ReadFailurePolicy::default(),
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_poll_size(mut self, poll_size: usize) -> Self {
        self.poll_size = poll_size;
        self
    }

    pub fn with_random_fields<I, S>(mut self, random_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.random_fields = random_fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_event_timestamp_field(mut self, field: impl Into<String>) -> Self {
        self.event_timestamp_field = field.into();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_read_failure(mut self, policy: ReadFailurePolicy) -> Self {
        self.read_failure = policy;
        self
    }

    /// Build a configuration from connector-style string properties.
    ///
    /// `random.fields` is a comma-separated list; surrounding whitespace is
    /// trimmed from each entry. `poll.interval` is in milliseconds unless it
    /// carries a unit suffix.
    pub fn from_properties(props: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let get = |key: &str| props.get(key).map(String::as_str);

        let topic_name = get(TOPIC_NAME_CONFIG).ok_or(ConfigError::MissingOption(TOPIC_NAME_CONFIG))?;
        let message_template = get(MESSAGE_TEMPLATE_CONFIG)
            .ok_or(ConfigError::MissingOption(MESSAGE_TEMPLATE_CONFIG))?;

        let mut config = Configuration::new(topic_name, message_template);

        if let Some(value) = get(POLL_INTERVAL_CONFIG) {
            config.poll_interval = parse_duration(value).map_err(|reason| {
                ConfigError::InvalidOption {
                    option: POLL_INTERVAL_CONFIG,
                    reason,
                }
            })?;
        }

        if let Some(value) = get(POLL_SIZE_CONFIG) {
            config.poll_size = parse_option(POLL_SIZE_CONFIG, value)?;
        }

        if let Some(value) = get(RANDOM_FIELDS_CONFIG) {
            config.random_fields = value
                .split(',')
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .map(str::to_string)
                .collect();
        }

        if let Some(value) = get(EVENT_TIMESTAMP_FIELD_CONFIG) {
            config.event_timestamp_field = value.trim().to_string();
        }

        if let Some(value) = get(SEED_CONFIG) {
            config.seed = Some(parse_option(SEED_CONFIG, value)?);
        }

        if let Some(value) = get(READ_FAILURE_CONFIG) {
            config.read_failure = value
                .parse()
                .map_err(|reason| ConfigError::InvalidOption {
                    option: READ_FAILURE_CONFIG,
                    reason,
                })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file. `.yaml`, `.yml` and `.json` are read as YAML,
    /// `.toml` as TOML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") | Some("json") => Self::from_yaml(&content),
            Some("toml") => Self::from_toml(&content),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Parse a configuration from YAML text.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = serde_yaml::from_str(yaml)?;
        file.into_configuration()
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(text)?;
        file.into_configuration()
    }

    /// Check option values that can be judged without parsing the template
    /// or directives.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.topic_name.trim().is_empty() {
            return Err(ConfigError::InvalidOption {
                option: TOPIC_NAME_CONFIG,
                reason: "must not be empty".to_string(),
            });
        }
        if self.poll_size == 0 {
            return Err(ConfigError::InvalidOption {
                option: POLL_SIZE_CONFIG,
                reason: "must be a positive integer".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_option<T>(option: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidOption {
            option,
            reason: format!("'{value}': {e}"),
        })
}

/// On-disk configuration layout.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    poll_interval: Option<DurationValue>,
    poll_size: Option<usize>,
    topic_name: Option<String>,
    message_template: Option<TemplateValue>,
    #[serde(default)]
    random_fields: Vec<String>,
    #[serde(default)]
    event_timestamp_field: String,
    seed: Option<u64>,
    #[serde(default)]
    read_failure: ReadFailurePolicy,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DurationValue {
    Millis(u64),
    Text(String),
}

/// The template may be given as JSON text or written inline.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TemplateValue {
    Text(String),
    Inline(serde_json::Value),
}

impl ConfigFile {
    fn into_configuration(self) -> Result<Configuration, ConfigError> {
        let topic_name = self
            .topic_name
            .ok_or(ConfigError::MissingOption(TOPIC_NAME_CONFIG))?;

        let message_template = match self
            .message_template
            .ok_or(ConfigError::MissingOption(MESSAGE_TEMPLATE_CONFIG))?
        {
            TemplateValue::Text(text) => text,
            TemplateValue::Inline(value) => {
                serde_json::to_string(&value).map_err(ConfigError::TemplateJson)?
            }
        };

        let poll_interval = match self.poll_interval {
            None => DEFAULT_POLL_INTERVAL,
            Some(DurationValue::Millis(ms)) => Duration::from_millis(ms),
            Some(DurationValue::Text(text)) => {
                parse_duration(&text).map_err(|reason| ConfigError::InvalidOption {
                    option: POLL_INTERVAL_CONFIG,
                    reason,
                })?
            }
        };

        let config = Configuration {
            poll_interval,
            poll_size: self.poll_size.unwrap_or(DEFAULT_POLL_SIZE),
            topic_name,
            message_template,
            random_fields: self.random_fields,
            event_timestamp_field: self.event_timestamp_field,
            seed: self.seed,
            read_failure: self.read_failure,
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_from_properties_full() {
        let config = Configuration::from_properties(&props(&[
            ("topic.name", "web-logs"),
            ("message.template", r#"{"ip": "", "ts": 0}"#),
            ("poll.interval", "250"),
            ("poll.size", "50"),
            ("random.fields", "ip:random_ip, method:GET|POST ,id:uuid"),
            ("event.timestamp.field", "ts"),
            ("seed", "42"),
            ("read.failure", "legacy"),
        ]))
        .unwrap();

        assert_eq!(config.topic_name, "web-logs");
        assert_eq!(config.poll_interval, Duration::from_millis(250));
        assert_eq!(config.poll_size, 50);
        assert_eq!(
            config.random_fields,
            vec!["ip:random_ip", "method:GET|POST", "id:uuid"]
        );
        assert_eq!(config.event_timestamp_field, "ts");
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.read_failure, ReadFailurePolicy::Legacy);
    }

    #[test]
    fn test_from_properties_defaults() {
        let config = Configuration::from_properties(&props(&[
            ("topic.name", "t"),
            ("message.template", "{}"),
        ]))
        .unwrap();

        assert_eq!(config.poll_interval, DEFAULT_POLL_INTERVAL);
        assert_eq!(config.poll_size, DEFAULT_POLL_SIZE);
        assert!(config.random_fields.is_empty());
        assert!(config.event_timestamp_field.is_empty());
        assert_eq!(config.seed, None);
        assert_eq!(config.read_failure, ReadFailurePolicy::Surface);
    }

    #[test]
    fn test_from_properties_missing_required() {
        let result = Configuration::from_properties(&props(&[("message.template", "{}")]));
        assert!(matches!(
            result,
            Err(ConfigError::MissingOption(TOPIC_NAME_CONFIG))
        ));

        let result = Configuration::from_properties(&props(&[("topic.name", "t")]));
        assert!(matches!(
            result,
            Err(ConfigError::MissingOption(MESSAGE_TEMPLATE_CONFIG))
        ));
    }

    #[test]
    fn test_from_properties_invalid_values() {
        let base = [("topic.name", "t"), ("message.template", "{}")];

        for (key, value) in [
            ("poll.size", "0"),
            ("poll.size", "many"),
            ("poll.interval", "soon"),
            ("seed", "-1"),
            ("read.failure", "ignore"),
        ] {
            let mut pairs = base.to_vec();
            pairs.push((key, value));
            let result = Configuration::from_properties(&props(&pairs));
            assert!(
                matches!(result, Err(ConfigError::InvalidOption { option, .. }) if option == key),
                "{key}={value} should be rejected"
            );
        }
    }

    #[test]
    fn test_from_yaml_inline_template_keeps_order() {
        let config = Configuration::from_yaml(
            r#"
topic_name: web-logs
poll_interval: 2s
poll_size: 3
message_template:
  zeta: ""
  alpha: 1
  mid: true
random_fields:
  - zeta:uuid
"#,
        )
        .unwrap();

        assert_eq!(config.poll_interval, Duration::from_secs(2));
        assert_eq!(config.poll_size, 3);
        assert_eq!(
            config.message_template,
            r#"{"zeta":"","alpha":1,"mid":true}"#
        );
        assert_eq!(config.random_fields, vec!["zeta:uuid"]);
    }

    #[test]
    fn test_from_yaml_numeric_interval_is_millis() {
        let config = Configuration::from_yaml(
            r#"
topic_name: t
poll_interval: 750
message_template: '{"a": 1}'
"#,
        )
        .unwrap();

        assert_eq!(config.poll_interval, Duration::from_millis(750));
        assert_eq!(config.message_template, r#"{"a": 1}"#);
    }

    #[test]
    fn test_from_yaml_unknown_key() {
        let result = Configuration::from_yaml(
            r#"
topic_name: t
message_template: "{}"
pol_size: 3
"#,
        );
        assert!(matches!(result, Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_from_toml() {
        let config = Configuration::from_toml(
            r#"
topic_name = "events"
poll_interval = "100ms"
poll_size = 5
message_template = '{"id": "", "ts": 0}'
random_fields = ["id:uuid"]
event_timestamp_field = "ts"
read_failure = "legacy"
"#,
        )
        .unwrap();

        assert_eq!(config.topic_name, "events");
        assert_eq!(config.poll_interval, Duration::from_millis(100));
        assert_eq!(config.poll_size, 5);
        assert_eq!(config.event_timestamp_field, "ts");
        assert_eq!(config.read_failure, ReadFailurePolicy::Legacy);
    }

    #[test]
    fn test_from_file_by_extension() {
        let dir = tempfile::TempDir::new().unwrap();

        let yaml_path = dir.path().join("datagen.yaml");
        std::fs::write(&yaml_path, "topic_name: t\nmessage_template: '{}'\n").unwrap();
        assert_eq!(Configuration::from_file(&yaml_path).unwrap().topic_name, "t");

        let toml_path = dir.path().join("datagen.toml");
        std::fs::write(&toml_path, "topic_name = \"u\"\nmessage_template = \"{}\"\n").unwrap();
        assert_eq!(Configuration::from_file(&toml_path).unwrap().topic_name, "u");

        let ini_path = dir.path().join("datagen.ini");
        std::fs::write(&ini_path, "").unwrap();
        assert!(matches!(
            Configuration::from_file(&ini_path),
            Err(ConfigError::UnsupportedFormat(_))
        ));

        assert!(matches!(
            Configuration::from_file(dir.path().join("missing.yaml")),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_validate_empty_topic() {
        let config = Configuration::new(" ", "{}");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidOption {
                option: TOPIC_NAME_CONFIG,
                ..
            })
        ));
    }
}
