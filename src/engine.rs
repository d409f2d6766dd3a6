//! The validation engine
//!
//! A [`Validator`] owns a [`FieldRuleSet`], a [`RuleRegistry`] and an
//! [`ErrorCollector`]. Each call to [`Validator::validate`] runs one pass
//! over a caller-owned record:
//!
//! 1. A frugal validator that already holds errors, or a record that is not
//!    a JSON object, fails immediately without touching anything.
//! 2. The call's declarations are merged into the rule set.
//! 3. The record is projected onto the declared fields. Any other key is
//!    dropped, whether or not it would have been valid.
//! 4. Fields are evaluated in declaration order. Within a field, rules run
//!    in order and the first failing rule ends that field. A frugal
//!    validator stops at the first failing field; a greedy one keeps going.
//!
//! Rules rewrite the record in place, so after a pass every value that was
//! checked holds its coerced form.
//!
//! # Example
//!
//! ```
//! use fieldgate::Validator;
//! use serde_json::json;
//!
//! let mut validator = Validator::greedy();
//! let mut data = json!({"age": "7", "extra": 1});
//!
//! assert!(validator.validate(&mut data, [("age", "int|opt_exists")]).unwrap());
//! assert_eq!(data, json!({"age": 7}));
//! ```

use serde_json::Value;

use crate::rule::RuleItem;
use crate::{ErrorCollector, FieldRuleSet, Record, Rule, RuleError, RuleRegistry, Validation};

/// Message recorded when a custom rule fails without reporting one.
pub const FALLBACK_MESSAGE: &str = "failed validation";

/// How far a pass continues after a field fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Mode {
    /// Evaluate every field regardless of earlier failures
    Greedy,
    /// Stop at the first failing field, and refuse new passes while errors
    /// are outstanding
    #[default]
    Frugal,
}

/// Rule-based field validator.
///
/// One instance is meant for one unit of work, such as a single request.
/// Errors accumulate across passes until cleared; re-validating a field
/// replaces its previous messages.
#[derive(Debug)]
pub struct Validator {
    mode: Mode,
    registry: RuleRegistry,
    rules: FieldRuleSet,
    errors: ErrorCollector,
}

impl Validator {
    /// Validator over the built-in registry.
    pub fn new(mode: Mode) -> Self {
        Self::with_registry(mode, RuleRegistry::builtin())
    }

    /// Validator that evaluates every field.
    pub fn greedy() -> Self {
        Self::new(Mode::Greedy)
    }

    /// Validator that stops at the first failing field.
    pub fn frugal() -> Self {
        Self::new(Mode::Frugal)
    }

    /// Validator resolving tokens against a caller-built registry.
    pub fn with_registry(mode: Mode, registry: RuleRegistry) -> Self {
        Self {
            mode,
            registry,
            rules: FieldRuleSet::new(),
            errors: ErrorCollector::new(),
        }
    }

    /// The mode fixed at construction.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The registry tokens resolve against.
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// The accumulated rule set.
    pub fn rules(&self) -> &FieldRuleSet {
        &self.rules
    }

    /// Fields with rules, in evaluation order. A pass projects records onto
    /// exactly these names.
    pub fn field_names(&self) -> Vec<&str> {
        self.rules.fields().collect()
    }

    /// Merge a declaration into a field's rules.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError`] if a token is unknown or empty.
    pub fn add_rule(&mut self, field: &str, rule: impl Into<Rule>) -> Result<(), RuleError> {
        self.rules.add_rule(&self.registry, field, rule)
    }

    /// Merge a batch of pipe-delimited declarations.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError`] on the first bad declaration. Nothing from the
    /// batch is merged in that case.
    pub fn add_rules<I, K, S>(&mut self, rules: I) -> Result<(), RuleError>
    where
        I: IntoIterator<Item = (K, S)>,
        K: AsRef<str>,
        S: AsRef<str>,
    {
        self.rules.add_rules(&self.registry, rules)
    }

    /// Forget every declared rule. Errors are kept.
    pub fn clear(&mut self) {
        self.rules.clear();
    }

    /// Forget every recorded error.
    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }

    /// Forget rules and errors, readying the validator for a new unit of work.
    pub fn reset(&mut self) {
        self.rules.clear();
        self.errors.clear();
    }

    /// Record a message against a field.
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.add_error(field, message);
    }

    /// Returns `true` if no errors are recorded.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Recorded errors.
    pub fn errors(&self) -> &ErrorCollector {
        &self.errors
    }

    /// All messages joined into one `field: m1, m2` line per field.
    pub fn error_string(&self) -> String {
        self.errors.to_error_string()
    }

    /// Declare rules and run a pass over `data`.
    ///
    /// Returns `Ok(true)` when every evaluated field passed and no errors
    /// remain recorded. Invalid input is never an `Err`; it is reported
    /// through [`errors`](Self::errors).
    ///
    /// # Errors
    ///
    /// Returns [`RuleError`] if a declaration cannot be resolved. None of
    /// `fields` is merged and the pass does not run in that case.
    pub fn validate<I, K, R>(&mut self, data: &mut Value, fields: I) -> Result<bool, RuleError>
    where
        I: IntoIterator<Item = (K, R)>,
        K: AsRef<str>,
        R: Into<Rule>,
    {
        if self.mode == Mode::Frugal && !self.errors.is_empty() {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                failing = self.errors.len(),
                "frugal validator already invalid, skipping pass"
            );
            return Ok(false);
        }
        let Value::Object(record) = data else {
            #[cfg(feature = "tracing")]
            tracing::debug!("record is not an object, skipping pass");
            return Ok(false);
        };

        self.rules.add_batch(&self.registry, fields)?;

        let rules = &self.rules;
        record.retain(|key, _| rules.contains(key));

        let mut all_passed = true;
        for (field, items) in self.rules.iter_mut() {
            all_passed &= run_field(field, items, record, &mut self.errors);

            if self.mode == Mode::Frugal && !all_passed {
                #[cfg(feature = "tracing")]
                tracing::debug!(field, "frugal pass stopped at failing field");
                break;
            }
        }

        Ok(all_passed && self.errors.is_empty())
    }

    /// Run a pass using only the rules already declared.
    ///
    /// The record is projected onto every field declared so far, through
    /// [`add_rule`](Self::add_rule), [`add_rules`](Self::add_rules) or an
    /// earlier [`validate`](Self::validate) call.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the signature matches [`validate`](Self::validate).
    pub fn check(&mut self, data: &mut Value) -> Result<bool, RuleError> {
        self.validate(data, std::iter::empty::<(&str, Rule)>())
    }

    /// Run a pass over an owned record and return it as a [`Validation`].
    ///
    /// Success carries the projected, coerced record; failure carries a
    /// snapshot of the collector. A non-object input fails with whatever
    /// the collector currently holds.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError`] if a declaration cannot be resolved.
    pub fn validate_into<I, K, R>(
        &mut self,
        mut data: Value,
        fields: I,
    ) -> Result<Validation<Record, ErrorCollector>, RuleError>
    where
        I: IntoIterator<Item = (K, R)>,
        K: AsRef<str>,
        R: Into<Rule>,
    {
        let passed = self.validate(&mut data, fields)?;
        Ok(match data {
            Value::Object(record) if passed => Validation::success(record),
            _ => Validation::failure(self.errors.clone()),
        })
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(Mode::default())
    }
}

fn run_field(
    field: &str,
    items: &mut [RuleItem],
    record: &mut Record,
    errors: &mut ErrorCollector,
) -> bool {
    errors.begin(field);

    let mut passed = true;
    for item in items.iter_mut() {
        let reported = errors.count(field);
        let ok = match item {
            RuleItem::Optional => {
                if !record.contains_key(field) {
                    break;
                }
                true
            }
            RuleItem::Builtin { check, .. } => (*check)(record, field, errors),
            RuleItem::Predicate(predicate) => predicate.check(errors, record, field),
            RuleItem::Validator(validator) => {
                let value = record.entry(field).or_insert(Value::Null);
                validator.validate(errors, field, value)
            }
        };

        if !ok {
            if errors.count(field) == reported {
                errors.add_error(field, FALLBACK_MESSAGE);
            }
            #[cfg(feature = "tracing")]
            tracing::trace!(field, rule = item.label(), "rule failed");
            passed = false;
            break;
        }
    }

    errors.prune(field);
    passed
}
