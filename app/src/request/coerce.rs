use serde::{Deserialize, Deserializer, de::Error};
use serde_json::Value;

/// To be used like this:
/// `#[serde(default = "...", deserialize_with = "coerce::float")]`
///
/// Accepts numbers and numeric strings. An explicit `null` is rejected rather than defaulted.
pub fn float<'de, D>(de: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(de)?;
    to_float(&value).map_err(D::Error::custom)
}

/// Integer counterpart of [`float`]. Floats are truncated, fractional strings are rejected.
pub fn int<'de, D>(de: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(de)?;
    to_int(&value).map_err(D::Error::custom)
}

/// To be used like this:
/// `#[serde(default, deserialize_with = "coerce::choice")]`
///
/// Table keys never fail a request: `null` and non-string values read as absent, so the
/// lookup lands on its default entry.
pub fn choice<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(de)? {
        Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

pub fn to_float(value: &Value) -> Result<f64, String> {
    let number = match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| format!("could not convert {} to a float", n))?,
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("could not convert string to float: '{}'", s))?,
        other => return Err(format!("expected a number or numeric string, got {}", kind(other))),
    };

    if number.is_finite() {
        Ok(number)
    } else {
        Err(format!("value {} is not a finite number", value))
    }
}

pub fn to_int(value: &Value) -> Result<i64, String> {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => Ok(i),
            None => {
                let f = to_float(value)?;
                if f.abs() >= i64::MAX as f64 {
                    Err(format!("value {} is out of integer range", n))
                } else {
                    Ok(f.trunc() as i64)
                }
            }
        },
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| format!("invalid literal for integer: '{}'", s)),
        other => Err(format!("expected an integer or integer string, got {}", kind(other))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
