//! Pulls a structured object out of free-form inference output.
//!
//! The whole response is tried as JSON first. Failing that, the first JSON
//! value starting at each opening brace is tried in order, which covers prose
//! around the object, Markdown code fences and responses with several
//! candidate objects. Work is bounded by a byte cap and a cap on the number of
//! opening braces tried. Field values are then read leniently: anything
//! out of range is clamped and anything unrecognized gets a safe default, so
//! decoding only fails when no usable object exists at all.

use crate::domain::entities::prediction::{Prediction, DEFAULT_TIMEFRAME};
use crate::domain::error::DomainError;
use crate::domain::values::direction::Direction;
use crate::domain::values::provenance::Provenance;
use crate::domain::values::recommendation::Recommendation;
use crate::domain::values::risk_level::RiskLevel;
use crate::domain::values::venue::Venue;
use serde_json::{Map, Value};
use std::str::FromStr;

pub type JsonObject = Map<String, Value>;

/// Keys whose presence marks an object as a prediction rather than some
/// unrelated JSON fragment.
const PREDICTION_KEYS: &[&str] = &[
    "prediction",
    "direction",
    "confidence",
    "recommendation",
    "target_price_change",
];

pub fn decode_prediction(raw: &str) -> Result<Prediction, DomainError> {
    let obj = find_object(raw, |obj| PREDICTION_KEYS.iter().any(|k| obj.contains_key(*k)))
        .ok_or_else(|| DomainError::DecodeFailure(format!("no prediction object in {} chars of output", raw.len())))?;
    Ok(prediction_from_object(&obj))
}

/// Replies longer than this are cut before scanning.
pub const MAX_DECODE_BYTES: usize = 32 * 1024;
/// Opening braces tried as object starts, in order of appearance.
const MAX_CANDIDATES: usize = 32;

/// First JSON object in `raw` accepted by `is_valid`. Only the first
/// `MAX_DECODE_BYTES` of `raw` are considered.
pub fn find_object<F>(raw: &str, is_valid: F) -> Option<JsonObject>
where
    F: Fn(&JsonObject) -> bool,
{
    let raw = clip_bytes(raw, MAX_DECODE_BYTES);
    if let Ok(value) = serde_json::from_str::<Value>(raw.trim()) {
        if let Some(obj) = first_valid(value, &is_valid) {
            return Some(obj);
        }
    }

    raw.char_indices()
        .filter(|(_, c)| *c == '{')
        .take(MAX_CANDIDATES)
        .filter_map(|(start, _)| leading_value(&raw[start..]))
        .find_map(|value| first_valid(value, &is_valid))
}

fn first_valid<F>(value: Value, is_valid: &F) -> Option<JsonObject>
where
    F: Fn(&JsonObject) -> bool,
{
    match value {
        Value::Object(obj) if is_valid(&obj) => Some(obj),
        Value::Array(items) => items.into_iter().find_map(|v| match v {
            Value::Object(obj) if is_valid(&obj) => Some(obj),
            _ => None,
        }),
        _ => None,
    }
}

/// The JSON value at the very start of `s`, ignoring whatever follows it.
/// The parser stops at the first syntax error, so an unclosed or malformed
/// start costs only the bytes read up to that point.
fn leading_value(s: &str) -> Option<Value> {
    serde_json::Deserializer::from_str(s)
        .into_iter::<Value>()
        .next()?
        .ok()
}

/// Longest prefix of `s` within `max` bytes that ends on a char boundary.
fn clip_bytes(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

fn prediction_from_object(obj: &JsonObject) -> Prediction {
    let direction = enum_field(obj, &["prediction", "direction"]).unwrap_or_default();

    Prediction::new(
        &string_field(obj, &["symbol"])
            .map(|s| Venue::canonical_symbol(&s))
            .unwrap_or_default(),
        direction,
        number_field(obj, &["confidence"]).map(as_percent).unwrap_or(50.0),
        number_field(obj, &["target_price_change", "target_change"]).unwrap_or(0.0),
        &string_field(obj, &["timeframe"]).unwrap_or_else(|| DEFAULT_TIMEFRAME.to_string()),
        &string_field(obj, &["reasoning", "rationale"]).unwrap_or_default(),
        enum_field::<RiskLevel>(obj, &["risk_level", "risk"]).unwrap_or_default(),
        string_list_field(obj, &["key_factors", "factors"]),
        enum_field::<Recommendation>(obj, &["recommendation"]).unwrap_or_default(),
        Provenance::Primary,
    )
}

/// Confidence given as a 0-1 fraction is scaled to 0-100.
pub fn as_percent(value: f64) -> f64 {
    if value > 0.0 && value < 1.0 {
        value * 100.0
    } else {
        value
    }
}

fn field<'a>(obj: &'a JsonObject, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| obj.get(*k)).filter(|v| !v.is_null())
}

/// Accepts JSON numbers and strings such as `"+3.5%"` or `"82"`.
pub fn number_field(obj: &JsonObject, keys: &[&str]) -> Option<f64> {
    let n = match field(obj, keys)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s
            .trim()
            .trim_end_matches('%')
            .trim_start_matches('+')
            .trim()
            .parse()
            .ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

pub fn string_field(obj: &JsonObject, keys: &[&str]) -> Option<String> {
    match field(obj, keys)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// An array of strings, or a single string taken as one item. Non-string
/// array members are rendered as JSON text.
pub fn string_list_field(obj: &JsonObject, keys: &[&str]) -> Vec<String> {
    match field(obj, keys) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s.clone()),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        Some(Value::String(s)) => vec![s.clone()],
        _ => vec![],
    }
}

pub fn enum_field<T: FromStr>(obj: &JsonObject, keys: &[&str]) -> Option<T> {
    match field(obj, keys)? {
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_json() {
        let raw = r#"{"symbol":"RELIANCE","prediction":"UP","confidence":82,"target_price_change":4.5,"timeframe":"1 month","reasoning":"Strong quarter","risk_level":"LOW","key_factors":["earnings"],"recommendation":"BUY"}"#;
        let p = decode_prediction(raw).unwrap();
        assert_eq!(p.symbol, "RELIANCE");
        assert_eq!(p.direction, Direction::Up);
        assert_eq!(p.confidence.value(), 82.0);
        assert_eq!(p.target_change_pct, 4.5);
        assert_eq!(p.risk_level, RiskLevel::Low);
        assert_eq!(p.recommendation, Recommendation::Buy);
        assert_eq!(p.provenance, Provenance::Primary);
    }

    #[test]
    fn test_prose_and_code_fence() {
        let raw = "Sure! Here is the analysis:\n```json\n{\"prediction\": \"down\", \"confidence\": \"71%\"}\n```\nLet me know.";
        let p = decode_prediction(raw).unwrap();
        assert_eq!(p.direction, Direction::Down);
        assert_eq!(p.confidence.value(), 71.0);
    }

    #[test]
    fn test_skips_unrelated_object_before_prediction() {
        let raw = r#"Context: {"note": "ignore me"} Answer: {"prediction":"UP","confidence":64}"#;
        let p = decode_prediction(raw).unwrap();
        assert_eq!(p.direction, Direction::Up);
        assert_eq!(p.confidence.value(), 64.0);
    }

    #[test]
    fn test_braces_inside_strings() {
        let raw = r#"{"prediction":"STABLE","reasoning":"a } stray { brace","confidence":40}"#;
        let p = decode_prediction(&format!("x {raw} y")).unwrap();
        assert_eq!(p.reasoning, "a } stray { brace");
    }

    #[test]
    fn test_invalid_values_get_defaults() {
        let raw = r#"{"prediction":"SIDEWAYS","confidence":400,"target_price_change":-75,"risk_level":"EXTREME","recommendation":"ACCUMULATE","key_factors":"single factor"}"#;
        let p = decode_prediction(raw).unwrap();
        assert_eq!(p.direction, Direction::Stable);
        assert_eq!(p.confidence.value(), 100.0);
        assert_eq!(p.target_change_pct, -20.0);
        assert_eq!(p.risk_level, RiskLevel::Medium);
        assert_eq!(p.recommendation, Recommendation::Hold);
        assert_eq!(p.key_factors, vec!["single factor".to_string()]);
        assert_eq!(p.timeframe, DEFAULT_TIMEFRAME);
    }

    #[test]
    fn test_fractional_confidence_scaled() {
        let p = decode_prediction(r#"{"prediction":"UP","confidence":0.82}"#).unwrap();
        assert_eq!(p.confidence.value(), 82.0);
    }

    #[test]
    fn test_brace_floods_fail_fast() {
        let floods = [
            "{".repeat(40_000),
            "{\"a\":".repeat(40_000) + "1",
            "{\"a\":1,".repeat(20_000),
        ];
        for raw in floods {
            let started = std::time::Instant::now();
            assert!(matches!(decode_prediction(&raw), Err(DomainError::DecodeFailure(_))));
            assert!(started.elapsed() < std::time::Duration::from_millis(500));
        }
    }

    #[test]
    fn test_object_after_long_prose_within_limit() {
        let raw = format!("{} {{\"prediction\":\"UP\"}}", "word ".repeat(1_000));
        assert_eq!(decode_prediction(&raw).unwrap().direction, Direction::Up);

        let beyond = format!("{}{{\"prediction\":\"UP\"}}", "x".repeat(MAX_DECODE_BYTES));
        assert!(decode_prediction(&beyond).is_err());
    }

    #[test]
    fn test_clip_bytes_respects_char_boundaries() {
        let s = "é".repeat(10);
        assert_eq!(clip_bytes(&s, 5), "éé");
        assert_eq!(clip_bytes("abc", 10), "abc");
    }

    #[test]
    fn test_no_json_is_decode_failure() {
        for raw in ["", "I cannot help with that.", "{unbalanced", r#"{"unrelated": true}"#, "[1,2]"] {
            assert!(matches!(decode_prediction(raw), Err(DomainError::DecodeFailure(_))), "{raw}");
        }
    }
}
