//! Numeric classification and coercion over JSON values
//!
//! Input records usually come from forms or query strings, so numbers
//! arrive as strings as often as they arrive as JSON numbers. A value is
//! *numeric* if it is a JSON number or a string holding a decimal number
//! (optional surrounding whitespace, sign, fraction and exponent).

use serde_json::{Number, Value};

/// Returns `true` if the string is a plain decimal number.
///
/// Rejects the spellings `f64::from_str` accepts but form input never
/// means as numbers (`inf`, `NaN`, `infinity`).
pub fn is_numeric_str(s: &str) -> bool {
    let s = s.trim();
    if s.is_empty() || !s.bytes().any(|b| b.is_ascii_digit()) {
        return false;
    }
    if !s
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
    {
        return false;
    }
    s.parse::<f64>().is_ok_and(f64::is_finite)
}

/// Returns `true` if the value is a number or a numeric string.
pub fn is_numeric(value: &Value) -> bool {
    match value {
        Value::Number(_) => true,
        Value::String(s) => is_numeric_str(s),
        _ => false,
    }
}

/// Truncates a numeric value toward zero.
///
/// Out-of-range values saturate at the `i64` bounds. Returns `None` for
/// non-numeric input.
pub fn to_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|_| i64::MAX))
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) if is_numeric_str(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f.trunc() as i64))
        }
        _ => None,
    }
}

/// Converts a numeric value to a float.
pub fn to_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if is_numeric_str(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Converts a float into a JSON value.
///
/// Non-finite floats have no JSON representation and become `null`.
pub fn float_value(f: f64) -> Value {
    Number::from_f64(f).map_or(Value::Null, Value::Number)
}

/// Renders a value for inclusion in an error message.
///
/// Strings are shown raw, everything else as compact JSON.
pub fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
