//! Built-in rule tokens
//!
//! A [`RuleRegistry`] maps a rule token such as `"int"` to the function that
//! checks and coerces a field. Every function has the same shape: it reads
//! `record[field]`, may rewrite it into its canonical form, reports failures
//! to the collector, and returns whether the field passed.
//!
//! | Token        | Passes when                                 | Coercion                        |
//! |--------------|---------------------------------------------|---------------------------------|
//! | `exists`     | the key is present                          | none                            |
//! | `opt_exists` | always                                      | `null` if unset                 |
//! | `int`        | the value is numeric                        | truncated to an integer         |
//! | `opt_int`    | unset, or `int` passes                      | `null` if unset                 |
//! | `int[]`      | a non-empty array of numeric values         | every element truncated         |
//! | `opt_int[]`  | unset, or `int[]` passes                    | `[]` if unset                   |
//! | `bool`       | the value is a JSON boolean                 | none                            |
//! | `float`      | the value is numeric                        | converted to a float            |
//! | `array`      | a non-empty array or object                 | none                            |
//! | `string`     | a non-empty string                          | none                            |
//! | `opt_string` | always                                      | `null` if unset or not a string |
//! | `email`      | a conservatively well-formed address        | none                            |
//! | `date`       | a parseable date (feature `date`)           | Unix timestamp in seconds       |
//!
//! "Unset" means absent or `null`. The `optional` token is not a registry
//! entry; the engine handles it as a control-flow sentinel.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::value;
use crate::{ErrorCollector, Record};

/// Token that skips a field's remaining rules when the field is absent.
pub const OPTIONAL: &str = "optional";

/// Signature of a registry entry.
pub type RuleFn = fn(&mut Record, &str, &mut ErrorCollector) -> bool;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([a-z0-9+_\-]+)(\.[a-z0-9+_\-]+)*@([a-z0-9\-]+\.)+[a-z]{2,6}$")
        .expect("email pattern is valid")
});

/// Static mapping from rule token to its check-and-coerce function.
///
/// The registry is fixed once it is handed to a
/// [`Validator`](crate::Validator). Extra tokens are added while building it:
///
/// ```
/// use fieldgate::{ErrorCollector, Record, RuleRegistry, Validator, Mode};
/// use serde_json::json;
///
/// fn slug(record: &mut Record, field: &str, errors: &mut ErrorCollector) -> bool {
///     let ok = record
///         .get(field)
///         .and_then(|v| v.as_str())
///         .is_some_and(|s| !s.is_empty() && s.bytes().all(|b| b.is_ascii_lowercase() || b == b'-'));
///     if !ok {
///         errors.add_error(field, "not a valid slug");
///     }
///     ok
/// }
///
/// let registry = RuleRegistry::builtin().with_rule("slug", slug);
/// let mut validator = Validator::with_registry(Mode::Greedy, registry);
///
/// let mut data = json!({"path": "hello-world"});
/// assert!(validator.validate(&mut data, [("path", "string|slug")]).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct RuleRegistry {
    rules: HashMap<String, RuleFn>,
}

impl RuleRegistry {
    /// Registry with no tokens at all.
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Registry holding every built-in token.
    pub fn builtin() -> Self {
        let registry = Self::empty()
            .with_rule("exists", exists)
            .with_rule("opt_exists", opt_exists)
            .with_rule("int", int)
            .with_rule("opt_int", opt_int)
            .with_rule("int[]", int_array)
            .with_rule("opt_int[]", opt_int_array)
            .with_rule("bool", boolean)
            .with_rule("float", float)
            .with_rule("array", array)
            .with_rule("string", string)
            .with_rule("opt_string", opt_string)
            .with_rule("email", email);

        #[cfg(feature = "date")]
        let registry = registry.with_rule("date", date);

        registry
    }

    /// Add or replace a token.
    ///
    /// Registering [`OPTIONAL`] has no effect on validation; the sentinel
    /// always takes precedence.
    pub fn with_rule(mut self, token: impl Into<String>, rule: RuleFn) -> Self {
        self.rules.insert(token.into(), rule);
        self
    }

    /// Resolve a token to its function.
    pub fn lookup(&self, token: &str) -> Option<RuleFn> {
        self.rules.get(token).copied()
    }

    /// Returns `true` if the token is registered.
    pub fn contains(&self, token: &str) -> bool {
        self.rules.contains_key(token)
    }

    /// Registered tokens, in no particular order.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn is_unset(record: &Record, field: &str) -> bool {
    record.get(field).is_none_or(Value::is_null)
}

fn exists(record: &mut Record, field: &str, errors: &mut ErrorCollector) -> bool {
    if record.contains_key(field) {
        return true;
    }
    errors.add_error(field, format!("{field} does not exist"));
    false
}

fn opt_exists(record: &mut Record, field: &str, _errors: &mut ErrorCollector) -> bool {
    if is_unset(record, field) {
        record.insert(field.to_string(), Value::Null);
    }
    true
}

fn int(record: &mut Record, field: &str, errors: &mut ErrorCollector) -> bool {
    match record.get(field).and_then(value::to_int) {
        Some(n) => {
            record.insert(field.to_string(), Value::from(n));
            true
        }
        None => {
            errors.add_error(field, "not a valid integer");
            false
        }
    }
}

fn opt_int(record: &mut Record, field: &str, errors: &mut ErrorCollector) -> bool {
    if is_unset(record, field) {
        record.insert(field.to_string(), Value::Null);
        return true;
    }
    int(record, field, errors)
}

fn int_array(record: &mut Record, field: &str, errors: &mut ErrorCollector) -> bool {
    let coerced = match record.get(field) {
        Some(Value::Array(items)) if !items.is_empty() => items
            .iter()
            .map(value::to_int)
            .collect::<Option<Vec<_>>>(),
        _ => None,
    };

    match coerced {
        Some(ints) => {
            let ints = ints.into_iter().map(Value::from).collect();
            record.insert(field.to_string(), Value::Array(ints));
            true
        }
        None => {
            errors.add_error(field, "not a valid integer array");
            false
        }
    }
}

fn opt_int_array(record: &mut Record, field: &str, errors: &mut ErrorCollector) -> bool {
    if is_unset(record, field) {
        record.insert(field.to_string(), Value::Array(Vec::new()));
        return true;
    }
    int_array(record, field, errors)
}

fn boolean(record: &mut Record, field: &str, errors: &mut ErrorCollector) -> bool {
    if matches!(record.get(field), Some(Value::Bool(_))) {
        return true;
    }
    errors.add_error(field, "is not a valid boolean");
    false
}

fn float(record: &mut Record, field: &str, errors: &mut ErrorCollector) -> bool {
    match record.get(field).and_then(value::to_float) {
        Some(f) => {
            record.insert(field.to_string(), value::float_value(f));
            true
        }
        None => {
            errors.add_error(field, "not a valid float");
            false
        }
    }
}

fn array(record: &mut Record, field: &str, errors: &mut ErrorCollector) -> bool {
    let passed = match record.get(field) {
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(map)) => !map.is_empty(),
        _ => false,
    };
    if !passed {
        errors.add_error(field, "not a valid array");
    }
    passed
}

fn string(record: &mut Record, field: &str, errors: &mut ErrorCollector) -> bool {
    let passed = matches!(record.get(field), Some(Value::String(s)) if !s.is_empty());
    if !passed {
        errors.add_error(field, "not a valid string");
    }
    passed
}

fn opt_string(record: &mut Record, field: &str, _errors: &mut ErrorCollector) -> bool {
    if !matches!(record.get(field), Some(Value::String(_))) {
        record.insert(field.to_string(), Value::Null);
    }
    true
}

fn email(record: &mut Record, field: &str, errors: &mut ErrorCollector) -> bool {
    let passed = record
        .get(field)
        .and_then(Value::as_str)
        .is_some_and(|s| EMAIL.is_match(s));
    if !passed {
        errors.add_error(field, "Is not a valid email");
    }
    passed
}

#[cfg(feature = "date")]
fn date(record: &mut Record, field: &str, errors: &mut ErrorCollector) -> bool {
    let timestamp = record
        .get(field)
        .and_then(Value::as_str)
        .and_then(parse_timestamp);

    match timestamp {
        Some(ts) => {
            record.insert(field.to_string(), Value::from(ts));
            true
        }
        None => {
            let shown = record.get(field).map(value::display).unwrap_or_default();
            errors.add_error(field, format!("'{shown}' is not a valid date"));
            false
        }
    }
}

/// Parse a date or date-time into a Unix timestamp. Naive values are UTC.
#[cfg(feature = "date")]
pub(crate) fn parse_timestamp(input: &str) -> Option<i64> {
    use chrono::{DateTime, NaiveDate, NaiveDateTime};

    let s = input.trim();
    if let Some(secs) = s.strip_prefix('@') {
        return secs.parse().ok();
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.timestamp());
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc().timestamp());
        }
    }
    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc().timestamp());
        }
    }
    None
}
