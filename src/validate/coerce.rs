//! Primitive coercion
//!
//! The API is loose about primitive types (`cod` is a number on one endpoint
//! and text on another, some gateways quote numbers). Each declared kind
//! accepts the encodings that unambiguously mean a value of that kind.

use crate::error::{Error, Result};
use crate::schema::PrimitiveKind;
use crate::types::{json_type_name, JsonValue};
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde_json::Number;

/// Naive formats accepted for datetimes, read as UTC
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Coerce a non-null value to the declared primitive kind
pub fn coerce_primitive(kind: PrimitiveKind, value: &JsonValue, path: &str) -> Result<JsonValue> {
    let coerced = match kind {
        PrimitiveKind::Number => to_number(value),
        PrimitiveKind::Integer => to_integer(value),
        PrimitiveKind::String => to_text(value),
        PrimitiveKind::DateTime => to_datetime(value),
    };

    coerced.ok_or_else(|| Error::type_mismatch(path, kind.to_string(), describe(value)))
}

/// Canonical text form of an instant: RFC 3339, UTC, fractional seconds only when present
pub fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Parse RFC 3339 text or the API's `YYYY-MM-DD HH:MM:SS` form
pub fn parse_instant(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|naive| naive.and_utc())
}

fn to_number(value: &JsonValue) -> Option<JsonValue> {
    match value {
        JsonValue::Number(_) => Some(value.clone()),
        JsonValue::String(s) => parse_number(s.trim()),
        _ => None,
    }
}

fn parse_number(text: &str) -> Option<JsonValue> {
    if let Ok(i) = text.parse::<i64>() {
        return Some(JsonValue::from(i));
    }
    let f: f64 = text.parse().ok()?;
    Number::from_f64(f).map(JsonValue::Number)
}

fn to_integer(value: &JsonValue) -> Option<JsonValue> {
    match value {
        JsonValue::Number(n) if n.is_i64() || n.is_u64() => Some(value.clone()),
        JsonValue::Number(n) => n.as_f64().and_then(whole).map(JsonValue::from),
        JsonValue::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(whole))
                .map(JsonValue::from)
        }
        _ => None,
    }
}

/// A float with no fractional part, as an i64
#[allow(clippy::cast_possible_truncation)]
fn whole(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15 {
        Some(f as i64)
    } else {
        None
    }
}

fn to_text(value: &JsonValue) -> Option<JsonValue> {
    match value {
        JsonValue::String(_) => Some(value.clone()),
        JsonValue::Number(n) => Some(JsonValue::String(n.to_string())),
        JsonValue::Bool(b) => Some(JsonValue::String(b.to_string())),
        _ => None,
    }
}

fn to_datetime(value: &JsonValue) -> Option<JsonValue> {
    let instant = match value {
        JsonValue::Number(n) => {
            let secs = n.as_i64().or_else(|| n.as_f64().and_then(whole))?;
            DateTime::from_timestamp(secs, 0)?
        }
        JsonValue::String(s) => parse_instant(s)?,
        _ => return None,
    };
    Some(JsonValue::String(format_instant(instant)))
}

/// Type name plus a short preview of text values
fn describe(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => {
            let preview: String = s.chars().take(32).collect();
            format!("string \"{preview}\"")
        }
        other => json_type_name(other).to_string(),
    }
}
