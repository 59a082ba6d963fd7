//! Individual value generators for each directive rule.
//!
//! Strings come out of `random_ip`, `uuid` and literal sets; `random_int`
//! yields a JSON integer.

pub mod ip;
pub mod numeric;
pub mod timestamp;
pub mod uuid;

use crate::directive::Rule;
use rand::Rng;
use serde_json::Value;

/// Generate a value for the given rule.
pub fn generate_value<R: Rng>(rule: &Rule, rng: &mut R) -> Value {
    match rule {
        Rule::RandomIp => Value::String(ip::generate_random_ip(rng)),

        Rule::Uuid => Value::String(uuid::generate_uuid_v4(rng).to_string()),

        Rule::IntRange { lower, upper } => {
            Value::from(numeric::generate_int_range(rng, *lower, *upper))
        }

        Rule::OneOf(values) => {
            if values.is_empty() {
                Value::Null
            } else {
                let idx = rng.random_range(0..values.len());
                Value::String(values[idx].clone())
            }
        }
    }
}
