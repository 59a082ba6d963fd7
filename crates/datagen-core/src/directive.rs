//! Randomization directive parsing.
//!
//! A directive has the form `fieldName:spec`, where `spec` is one of:
//!
//! - `random_ip` - address from a fixed pool of prefixes plus a random last octet
//! - `uuid` - random v4 UUID
//! - `random_int:<lower>:<upper>` - integer in `[lower, upper)`
//! - `a|b|c` - one of the listed literals
//!
//! The special entry `fromFile:<path>` switches the generator to file replay,
//! and is only accepted as the sole directive.

use crate::error::DirectiveError;
use std::path::PathBuf;

pub const RANDOM_IP: &str = "random_ip";
pub const UUID: &str = "uuid";
pub const RANDOM_INT: &str = "random_int";
pub const FROM_FILE: &str = "fromFile";

/// Separator between literal candidates.
pub const LITERAL_SEPARATOR: char = '|';

/// Resolved generation rule for a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    RandomIp,
    Uuid,
    /// Integer drawn from `[lower, upper)`
    IntRange { lower: i64, upper: i64 },
    /// Uniform choice over literal values
    OneOf(Vec<String>),
}

/// A field paired with the rule that produces its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    pub field: String,
    pub rule: Rule,
}

/// What the directive list asks the generator to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectivePlan {
    /// Synthesize values, applied in directive order
    Random(Vec<FieldRule>),
    /// Replay lines from the named file
    Replay(PathBuf),
}

impl DirectivePlan {
    /// Resolve a directive list into a generation plan.
    ///
    /// File replay is selected if and only if the list holds exactly one entry
    /// and the text before that entry's first `:` is exactly `fromFile`. A bare
    /// prefix match is not enough: `fromFileName:a|b` is an ordinary directive
    /// for the field `fromFileName`. The replay path is everything after the
    /// first `:`. A `fromFile` entry next to other directives is rejected.
    pub fn parse<S: AsRef<str>>(entries: &[S]) -> Result<Self, DirectiveError> {
        if let [only] = entries {
            let only = only.as_ref();
            if is_replay_entry(only) {
                return parse_replay_path(only).map(DirectivePlan::Replay);
            }
        }

        if let Some(entry) = entries.iter().find(|e| is_replay_entry(e.as_ref())) {
            return Err(DirectiveError::MixedReplay(entry.as_ref().to_string()));
        }

        entries
            .iter()
            .map(|entry| parse_directive(entry.as_ref()))
            .collect::<Result<Vec<_>, _>>()
            .map(DirectivePlan::Random)
    }

    pub fn is_replay(&self) -> bool {
        matches!(self, DirectivePlan::Replay(_))
    }
}

fn is_replay_entry(entry: &str) -> bool {
    match entry.split_once(':') {
        Some((head, _)) => head == FROM_FILE,
        None => entry == FROM_FILE,
    }
}

fn parse_replay_path(entry: &str) -> Result<PathBuf, DirectiveError> {
    match entry.split_once(':') {
        Some((_, path)) if !path.is_empty() => Ok(PathBuf::from(path)),
        _ => Err(DirectiveError::EmptyReplayPath(entry.to_string())),
    }
}

/// Parse a single `fieldName:spec` directive.
pub fn parse_directive(entry: &str) -> Result<FieldRule, DirectiveError> {
    let (field, spec) = entry
        .split_once(':')
        .ok_or_else(|| DirectiveError::MissingSeparator(entry.to_string()))?;

    if field.is_empty() {
        return Err(DirectiveError::EmptyFieldName(entry.to_string()));
    }
    if spec.is_empty() {
        return Err(DirectiveError::EmptySpec(entry.to_string()));
    }

    let rule = match spec {
        RANDOM_IP => Rule::RandomIp,
        UUID => Rule::Uuid,
        _ => match spec.strip_prefix(RANDOM_INT) {
            Some(bounds) if bounds.is_empty() || bounds.starts_with(':') => {
                parse_int_range(entry, bounds)?
            }
            _ => Rule::OneOf(
                spec.split(LITERAL_SEPARATOR)
                    .map(str::to_string)
                    .collect(),
            ),
        },
    };

    Ok(FieldRule {
        field: field.to_string(),
        rule,
    })
}

/// Parse the `:<lower>:<upper>` tail of a `random_int` spec.
fn parse_int_range(entry: &str, bounds: &str) -> Result<Rule, DirectiveError> {
    let parts: Vec<&str> = match bounds.strip_prefix(':') {
        Some(rest) => rest.split(':').collect(),
        None => Vec::new(),
    };

    let [lower, upper] = parts.as_slice() else {
        return Err(DirectiveError::IntBoundsArity {
            entry: entry.to_string(),
            found: parts.len(),
        });
    };

    let parse_bound = |bound: &str| {
        bound
            .parse::<i64>()
            .map_err(|source| DirectiveError::InvalidBound {
                entry: entry.to_string(),
                bound: bound.to_string(),
                source,
            })
    };
    let lower = parse_bound(lower)?;
    let upper = parse_bound(upper)?;

    if lower >= upper {
        return Err(DirectiveError::EmptyRange {
            entry: entry.to_string(),
            lower,
            upper,
        });
    }

    Ok(Rule::IntRange { lower, upper })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule_of(entry: &str) -> Rule {
        parse_directive(entry).unwrap().rule
    }

    #[test]
    fn test_parse_keywords() {
        assert_eq!(rule_of("client_ip:random_ip"), Rule::RandomIp);
        assert_eq!(rule_of("request_id:uuid"), Rule::Uuid);
        assert_eq!(
            rule_of("status:random_int:200:600"),
            Rule::IntRange {
                lower: 200,
                upper: 600
            }
        );
        assert_eq!(
            rule_of("delta:random_int:-10:10"),
            Rule::IntRange {
                lower: -10,
                upper: 10
            }
        );
    }

    #[test]
    fn test_parse_literal_set() {
        let parsed = parse_directive("method:GET|POST|DELETE").unwrap();
        assert_eq!(parsed.field, "method");
        assert_eq!(
            parsed.rule,
            Rule::OneOf(vec![
                "GET".to_string(),
                "POST".to_string(),
                "DELETE".to_string()
            ])
        );

        // A single literal is a one-element set
        assert_eq!(rule_of("env:prod"), Rule::OneOf(vec!["prod".to_string()]));

        // Only the first colon separates the field name
        assert_eq!(
            rule_of("url:http://a|http://b"),
            Rule::OneOf(vec!["http://a".to_string(), "http://b".to_string()])
        );

        // Keyword prefixes without an exact match are literals
        assert_eq!(
            rule_of("kind:random_integer|uuids"),
            Rule::OneOf(vec!["random_integer".to_string(), "uuids".to_string()])
        );
    }

    #[test]
    fn test_parse_malformed() {
        assert!(matches!(
            parse_directive("no_separator"),
            Err(DirectiveError::MissingSeparator(_))
        ));
        assert!(matches!(
            parse_directive(":uuid"),
            Err(DirectiveError::EmptyFieldName(_))
        ));
        assert!(matches!(
            parse_directive("field:"),
            Err(DirectiveError::EmptySpec(_))
        ));
        assert!(matches!(
            parse_directive("field:random_int:abc:10"),
            Err(DirectiveError::InvalidBound { ref bound, .. }) if bound == "abc"
        ));
        assert!(matches!(
            parse_directive("field:random_int:1"),
            Err(DirectiveError::IntBoundsArity { found: 1, .. })
        ));
        assert!(matches!(
            parse_directive("field:random_int"),
            Err(DirectiveError::IntBoundsArity { found: 0, .. })
        ));
        assert!(matches!(
            parse_directive("field:random_int:1:2:3"),
            Err(DirectiveError::IntBoundsArity { found: 3, .. })
        ));
        assert!(matches!(
            parse_directive("field:random_int:10:10"),
            Err(DirectiveError::EmptyRange { lower: 10, upper: 10, .. })
        ));
    }

    #[test]
    fn test_plan_random_keeps_order() {
        let plan = DirectivePlan::parse(&["b:uuid", "a:x|y", "b:random_ip"]).unwrap();
        let DirectivePlan::Random(rules) = plan else {
            panic!("Expected random plan");
        };
        let fields: Vec<_> = rules.iter().map(|r| r.field.as_str()).collect();
        assert_eq!(fields, vec!["b", "a", "b"]);
    }

    #[test]
    fn test_plan_empty_is_random() {
        let entries: [&str; 0] = [];
        assert_eq!(
            DirectivePlan::parse(&entries).unwrap(),
            DirectivePlan::Random(Vec::new())
        );
    }

    #[test]
    fn test_plan_replay() {
        let plan = DirectivePlan::parse(&["fromFile:/data/events.csv"]).unwrap();
        assert_eq!(plan, DirectivePlan::Replay(PathBuf::from("/data/events.csv")));
        assert!(plan.is_replay());

        // Everything after the first colon is the path
        let plan = DirectivePlan::parse(&["fromFile:C:/data/events.csv"]).unwrap();
        assert_eq!(plan, DirectivePlan::Replay(PathBuf::from("C:/data/events.csv")));
    }

    #[test]
    fn test_plan_replay_without_path() {
        assert!(matches!(
            DirectivePlan::parse(&["fromFile:"]),
            Err(DirectiveError::EmptyReplayPath(_))
        ));
        assert!(matches!(
            DirectivePlan::parse(&["fromFile"]),
            Err(DirectiveError::EmptyReplayPath(_))
        ));
    }

    #[test]
    fn test_plan_rejects_mixed_replay() {
        let result = DirectivePlan::parse(&["id:uuid", "fromFile:/data/events.csv"]);
        assert!(matches!(result, Err(DirectiveError::MixedReplay(ref e)) if e == "fromFile:/data/events.csv"));
    }

    #[test]
    fn test_field_named_like_sentinel_is_not_replay() {
        let plan = DirectivePlan::parse(&["fromFileName:a|b"]).unwrap();
        assert!(!plan.is_replay());
    }
}
