//! Field-level value transforms applied while casting a model to its wire
//! representation.
//!
//! Every function here is pure and stateless: raw attribute value in,
//! wire-ready `serde_json::Value` out. Models attach these to field names
//! through an explicit [`TransformRegistry`] looked up at serialization time.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::errors::ApiError;

/// A registered per-field transform.
pub type TransformFn = fn(&Value) -> Result<Value, ApiError>;

/// Mapping from field name to the transform applied during serialization.
pub type TransformRegistry = HashMap<&'static str, TransformFn>;

/// Accepted textual date layouts, tried in order after RFC 3339.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Coerces any value into an ordered key-value structure for the `address`
/// field. Contents are not validated; the remote API does its own checks.
pub fn transform_address(value: &Value) -> Result<Value, ApiError> {
    let coerced = match value {
        Value::Object(map) => map.clone(),
        Value::Array(items) => {
            let mut map = Map::new();
            for (i, item) in items.iter().enumerate() {
                map.insert(i.to_string(), item.clone());
            }
            map
        }
        Value::Null => Map::new(),
        other => {
            let mut map = Map::new();
            map.insert("0".to_string(), other.clone());
            map
        }
    };
    Ok(Value::Object(coerced))
}

/// Parses a textual date/time and renders it in the remote API's expected
/// format: UTC ISO-8601 with a literal `.000Z` suffix.
///
/// Values carrying an explicit offset are converted to UTC; naive values are
/// taken as UTC. Unparsable input is an `InvalidDate` error, never a silent
/// default.
pub fn transform_date_of_birth(value: &Value) -> Result<Value, ApiError> {
    let raw = value
        .as_str()
        .ok_or_else(|| ApiError::InvalidDate(format!("expected a date string, got {}", value)))?;
    let utc = parse_datetime_utc(raw)?;
    Ok(Value::String(format_engage_datetime(&utc)))
}

/// Maps free-form gender input onto the remote API's `FEMALE`/`MALE` codes.
///
/// The female check runs first so input containing both letters (e.g.
/// "female") resolves to `FEMALE`. Anything matching neither maps to null.
pub fn transform_gender(value: &Value) -> Result<Value, ApiError> {
    let lowered = match value.as_str() {
        Some(s) => s.to_lowercase(),
        None => value.to_string().to_lowercase(),
    };
    if lowered.contains('f') {
        Ok(Value::String("FEMALE".to_string()))
    } else if lowered.contains('m') {
        Ok(Value::String("MALE".to_string()))
    } else {
        Ok(Value::Null)
    }
}

/// Normalizes a phone number to `AAA-BBB-CCCC` when the input ends in ten
/// digits; otherwise returns the input with punctuation stripped.
///
/// Partial normalization is acceptable output. The remote API tolerates
/// non-NANP numbers, so no length validation happens here.
pub fn transform_phone(value: &Value) -> Result<Value, ApiError> {
    let raw = match value.as_str() {
        Some(s) => s.to_string(),
        None => value.to_string(),
    };
    let stripped = Regex::new(r"[\.\-\(\)\+]").unwrap().replace_all(&raw, "");
    let grouped = Regex::new(r"(\d{3})(\d{3})(\d{4})$").unwrap();
    if let Some(caps) = grouped.captures(&stripped) {
        return Ok(Value::String(format!("{}-{}-{}", &caps[1], &caps[2], &caps[3])));
    }
    Ok(Value::String(stripped.into_owned()))
}

/// Evaluates a custom field value against its declared type.
///
/// With no type given, booleans and the literal strings `"true"`/`"false"`
/// are treated as BOOL; everything else as STRING. Date-like types reuse the
/// same formatting as `dateOfBirth`; boolean types coerce by truthiness.
/// Unknown types pass the value through unchanged.
pub fn eval_custom_field(value: &Value, field_type: Option<&str>) -> Result<Value, ApiError> {
    let inferred;
    let field_type = match field_type {
        Some(t) => t,
        None => {
            inferred = infer_custom_field_type(value);
            inferred
        }
    };
    match field_type {
        "DATE" | "DATETIME" | "TIMESTAMP" | "TIME" => transform_date_of_birth(value),
        "BOOL" | "BOOLEAN" => Ok(Value::Bool(is_truthy(value))),
        _ => Ok(value.clone()),
    }
}

fn infer_custom_field_type(value: &Value) -> &'static str {
    match value {
        Value::Bool(_) => "BOOL",
        Value::String(s) if s == "true" || s == "false" => "BOOL",
        _ => "STRING",
    }
}

/// Loose truthiness: the literal string `"true"` is true, `"false"` is
/// false, and otherwise empty/zero/null values are false.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Null => false,
        Value::String(s) => match s.as_str() {
            "true" => true,
            "false" => false,
            "" | "0" => false,
            _ => true,
        },
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        _ => true,
    }
}

fn parse_datetime_utc(raw: &str) -> Result<DateTime<Utc>, ApiError> {
    let trimmed = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(naive.and_utc());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            // Midnight UTC for date-only input
            if let Some(naive) = date.and_hms_opt(0, 0, 0) {
                return Ok(naive.and_utc());
            }
        }
    }
    Err(ApiError::InvalidDate(format!(
        "unparsable date/time: '{}'",
        raw
    )))
}

/// Whole-second UTC timestamp with the literal `.000Z` suffix the remote
/// API requires.
fn format_engage_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S.000Z").to_string()
}
