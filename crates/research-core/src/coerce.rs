//! Lenient `deserialize_with` helpers for section fields.
//!
//! Research payloads arrive from HTML forms and spreadsheet imports, so a
//! numeric field may be a JSON number or a numeric string, and an empty input
//! means "not provided". Every helper here maps JSON `null`, a missing field
//! and a blank string to `None`, and rejects non-finite numbers.

use serde::{Deserialize, Deserializer, de::Error as _};
use serde_json::Value;

fn describe(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "a boolean",
    Value::Number(_) => "a number",
    Value::String(_) => "a string",
    Value::Array(_) => "an array",
    Value::Object(_) => "an object",
  }
}

/// Read the raw value, folding `null` and blank strings into `None`.
fn raw<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Value>, D::Error> {
  Ok(match Option::<Value>::deserialize(d)? {
    None | Some(Value::Null) => None,
    Some(Value::String(s)) if s.trim().is_empty() => None,
    Some(other) => Some(other),
  })
}

fn finite(n: f64) -> Option<f64> { n.is_finite().then_some(n) }

pub fn opt_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
  let Some(value) = raw(d)? else { return Ok(None) };
  let parsed = match &value {
    Value::Number(n) => n.as_f64().and_then(finite),
    Value::String(s) => s.trim().parse::<f64>().ok().and_then(finite),
    _ => None,
  };
  parsed.map(Some).ok_or_else(|| {
    D::Error::custom(format!(
      "expected a finite number, found {}",
      describe(&value)
    ))
  })
}

fn as_integer(value: &Value) -> Option<i64> {
  let whole = |f: f64| {
    (f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15).then_some(f as i64)
  };
  match value {
    Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(whole)),
    Value::String(s) => {
      let s = s.trim();
      s.parse::<i64>()
        .ok()
        .or_else(|| s.parse::<f64>().ok().and_then(whole))
    }
    _ => None,
  }
}

pub fn opt_i64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
  let Some(value) = raw(d)? else { return Ok(None) };
  as_integer(&value).map(Some).ok_or_else(|| {
    D::Error::custom(format!("expected an integer, found {}", describe(&value)))
  })
}

pub fn opt_i32<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i32>, D::Error> {
  let Some(value) = raw(d)? else { return Ok(None) };
  as_integer(&value)
    .and_then(|n| i32::try_from(n).ok())
    .map(Some)
    .ok_or_else(|| {
      D::Error::custom(format!(
        "expected a 32-bit integer, found {}",
        describe(&value)
      ))
    })
}

pub fn opt_bool<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
  let Some(value) = raw(d)? else { return Ok(None) };
  let parsed = match &value {
    Value::Bool(b) => Some(*b),
    Value::Number(n) => match n.as_i64() {
      Some(0) => Some(false),
      Some(1) => Some(true),
      _ => None,
    },
    Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
      "true" | "1" => Some(true),
      "false" | "0" => Some(false),
      _ => None,
    },
    _ => None,
  };
  parsed.map(Some).ok_or_else(|| {
    D::Error::custom(format!("expected a boolean, found {}", describe(&value)))
  })
}

/// Strings are kept verbatim, except that blank input counts as absent.
pub fn opt_string<'de, D: Deserializer<'de>>(
  d: D,
) -> Result<Option<String>, D::Error> {
  match raw(d)? {
    None => Ok(None),
    Some(Value::String(s)) => Ok(Some(s)),
    Some(other) => Err(D::Error::custom(format!(
      "expected a string, found {}",
      describe(&other)
    ))),
  }
}
