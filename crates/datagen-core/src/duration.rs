//! Duration parsing utilities.

use std::time::Duration;

/// Parse a duration string like "250ms", "2s", "30m", "1h" or "500".
/// Supports:
/// - Plain numbers (interpreted as milliseconds): "500"
/// - Milliseconds suffix: "500ms"
/// - Seconds suffix: "2s"
/// - Minutes suffix: "30m"
/// - Hours suffix: "1h"
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Empty duration string".to_string());
    }

    // "ms" must be checked before "s" and "m"
    if let Some(num_str) = s.strip_suffix("ms") {
        return parse_count(num_str, "milliseconds").map(Duration::from_millis);
    }
    if let Some(num_str) = s.strip_suffix('h') {
        let hours = parse_count(num_str, "hours")?;
        return scale(hours, 3600, "hours", num_str).map(Duration::from_secs);
    }
    if let Some(num_str) = s.strip_suffix('m') {
        let minutes = parse_count(num_str, "minutes")?;
        return scale(minutes, 60, "minutes", num_str).map(Duration::from_secs);
    }
    if let Some(num_str) = s.strip_suffix('s') {
        return parse_count(num_str, "seconds").map(Duration::from_secs);
    }

    // No suffix - treat as milliseconds
    parse_count(s, "duration").map(Duration::from_millis)
}

fn parse_count(num_str: &str, unit: &str) -> Result<u64, String> {
    num_str
        .trim()
        .parse::<u64>()
        .map_err(|e| format!("Invalid {unit} value '{num_str}': {e}"))
}

fn scale(count: u64, factor: u64, unit: &str, num_str: &str) -> Result<u64, String> {
    count
        .checked_mul(factor)
        .ok_or_else(|| format!("Invalid {unit} value '{num_str}': out of range"))
}
