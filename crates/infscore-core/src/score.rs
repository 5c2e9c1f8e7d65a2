//! Score validation shared by the relay parser, the rankings store and the CLI.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 10.0;

/// Clamp a score into `[0, 10]`. Non-finite values are unknown.
#[must_use]
pub fn clamp_score(value: f64) -> Option<f64> {
    value
        .is_finite()
        .then(|| value.clamp(MIN_SCORE, MAX_SCORE))
}

/// Coerce a JSON value into a validated score.
///
/// Numbers and numeric strings are clamped into `[0, 10]`. Everything else,
/// including `null`, booleans, blank strings and non-numeric text, is unknown.
/// An unknown score is never turned into 0.
#[must_use]
pub fn validate_score(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().and_then(clamp_score),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok().and_then(clamp_score)
        }
        _ => None,
    }
}

/// `deserialize_with` helper that accepts any JSON value and applies [`validate_score`].
///
/// Pair with `#[serde(default)]` so a missing field is also unknown.
///
/// # Errors
///
/// Only fails when the input is not valid JSON at all.
pub fn deserialize_score<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(validate_score))
}
