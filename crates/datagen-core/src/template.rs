//! Message template: the JSON object every record starts from.

use crate::error::ConfigError;
use serde_json::{Map, Value};

/// Parsed message template.
///
/// Field order is the order in which keys were written in the source JSON;
/// file replay maps CSV columns onto fields by this order.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageTemplate {
    fields: Map<String, Value>,
}

impl MessageTemplate {
    /// Parse a template from JSON text. The top-level value must be an object.
    pub fn parse(source: &str) -> Result<Self, ConfigError> {
        let value: Value = serde_json::from_str(source).map_err(ConfigError::TemplateJson)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(ConfigError::TemplateNotObject(json_kind(&other))),
        }
    }

    /// Field names in declared order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fresh deep copy of the template fields.
    pub fn instantiate(&self) -> Map<String, Value> {
        self.fields.clone()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
