//! Reusable predicate factories
//!
//! Each factory returns a [`Predicate`] that reports through the collector
//! like any built-in rule:
//!
//! - [`matches`]: the field equals another field (password confirmation)
//! - [`one_of`]: the trimmed, lowercased value is in an allowed set
//! - [`pattern`]: the value matches a regular expression
//!
//! ```
//! use fieldgate::{helpers, Validator};
//! use serde_json::json;
//!
//! let mut validator = Validator::greedy();
//! validator.add_rule("password", "string").unwrap();
//! validator
//!     .add_rule("password", helpers::matches("password2", "password confirmation"))
//!     .unwrap();
//! validator.add_rule("password2", "string").unwrap();
//!
//! let mut data = json!({"password": "x", "password2": "y"});
//! assert!(!validator.check(&mut data).unwrap());
//! assert_eq!(
//!     validator.errors().get("password").unwrap(),
//!     ["does not match password confirmation"]
//! );
//! ```

use regex::Regex;
use serde_json::Value;

use crate::value::display;
use crate::{Predicate, RuleError};

/// Passes iff `record[field] == record[other]`.
///
/// Two absent fields compare equal.
pub fn matches(other: impl Into<String>, label: impl Into<String>) -> Predicate {
    let other = other.into();
    let label = label.into();
    Predicate::new(move |errors, record, field| {
        if record.get(field) == record.get(&other) {
            return true;
        }
        errors.add_error(field, format!("does not match {label}"));
        false
    })
}

/// Passes iff the trimmed, lowercased string value is one of `allowed`.
///
/// On success the normalized value is written back.
///
/// ```
/// use fieldgate::{helpers, Validator};
/// use serde_json::json;
///
/// let mut validator = Validator::greedy();
/// validator
///     .add_rule("size", helpers::one_of(["small", "large"]))
///     .unwrap();
///
/// let mut data = json!({"size": "  Large "});
/// assert!(validator.check(&mut data).unwrap());
/// assert_eq!(data["size"], json!("large"));
/// ```
pub fn one_of<I, S>(allowed: I) -> Predicate
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let allowed: Vec<String> = allowed.into_iter().map(Into::into).collect();
    Predicate::new(move |errors, record, field| {
        let normalized = record
            .get(field)
            .and_then(Value::as_str)
            .map(|s| s.trim().to_lowercase());

        match normalized {
            Some(value) if allowed.contains(&value) => {
                record.insert(field.to_string(), Value::String(value));
                true
            }
            _ => {
                let shown = record.get(field).map(display).unwrap_or_default();
                errors.add_error(
                    field,
                    format!(
                        "'{shown}' is not in the given set of values ({})",
                        allowed.join(", ")
                    ),
                );
                false
            }
        }
    })
}

/// Passes iff the string value matches `regex`.
///
/// # Errors
///
/// Returns [`RuleError::InvalidPattern`] if `regex` does not compile.
///
/// ```
/// use fieldgate::{helpers, Validator};
/// use serde_json::json;
///
/// let zip = helpers::pattern(r"^\d{5}$", "zip code").unwrap();
/// let mut validator = Validator::greedy();
/// validator.add_rule("zip", zip).unwrap();
///
/// let mut data = json!({"zip": "1234"});
/// assert!(!validator.check(&mut data).unwrap());
/// assert_eq!(validator.errors().get("zip").unwrap(), ["'1234' is not a valid zip code"]);
/// ```
pub fn pattern(regex: &str, label: impl Into<String>) -> Result<Predicate, RuleError> {
    let compiled = Regex::new(regex).map_err(|e| RuleError::InvalidPattern {
        pattern: regex.to_string(),
        reason: e.to_string(),
    })?;
    let label = label.into();

    Ok(Predicate::new(move |errors, record, field| {
        let passed = record
            .get(field)
            .and_then(Value::as_str)
            .is_some_and(|s| compiled.is_match(s));
        if !passed {
            let shown = record.get(field).map(display).unwrap_or_default();
            errors.add_error(field, format!("'{shown}' is not a valid {label}"));
        }
        passed
    }))
}
