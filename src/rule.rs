//! Rule declarations and the per-field rule set
//!
//! A field is validated by an ordered list of rule items. Callers declare
//! rules as a [`Rule`]:
//!
//! - a pipe-delimited token list such as `"int|opt_exists"`,
//! - a [`Predicate`] closure over the whole record,
//! - a [`CustomValidator`] object that sees only the field's value.
//!
//! Declarations are merged into a [`FieldRuleSet`]. Tokens are resolved
//! against the engine's [`RuleRegistry`] at that point, so an unknown token
//! is rejected before any data is looked at. Merging is idempotent for
//! tokens (a token already on the field is not added again), while
//! predicates and validators always append.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::registry::{RuleFn, OPTIONAL};
use crate::{ErrorCollector, Record, RuleError, RuleRegistry};

type PredicateFn = dyn Fn(&mut ErrorCollector, &mut Record, &str) -> bool + Send + Sync;

/// A caller-supplied check over the whole record.
///
/// The predicate receives the engine's error collector, the record being
/// validated and the field name. It returns whether the field passed and is
/// expected to report its own message on failure. It may rewrite the field.
///
/// # Example
///
/// ```
/// use fieldgate::{Predicate, Validator};
/// use serde_json::json;
///
/// let even = Predicate::new(|errors, record, field| {
///     let ok = record.get(field).and_then(|v| v.as_i64()).is_some_and(|n| n % 2 == 0);
///     if !ok {
///         errors.add_error(field, "must be even");
///     }
///     ok
/// });
///
/// let mut validator = Validator::greedy();
/// validator.add_rule("n", "int").unwrap();
/// validator.add_rule("n", even).unwrap();
///
/// let mut data = json!({"n": "3"});
/// assert!(!validator.check(&mut data).unwrap());
/// assert_eq!(validator.errors().get("n").unwrap(), ["must be even"]);
/// ```
#[derive(Clone)]
pub struct Predicate(Arc<PredicateFn>);

impl Predicate {
    /// Wrap a closure as a predicate.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut ErrorCollector, &mut Record, &str) -> bool + Send + Sync + 'static,
    {
        Predicate(Arc::new(f))
    }

    /// Run the predicate for one field.
    pub fn check(&self, errors: &mut ErrorCollector, record: &mut Record, field: &str) -> bool {
        (self.0)(errors, record, field)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

/// A reusable, possibly stateful, check packaged as an object.
///
/// The engine hands over the field's value by mutable reference. A field
/// absent from the record is materialised as `null` first.
///
/// # Example
///
/// ```
/// use fieldgate::{CustomValidator, ErrorCollector, Rule, Validator};
/// use serde_json::{json, Value};
///
/// /// Rejects usernames that were already seen by this validator.
/// struct Unique(Vec<String>);
///
/// impl CustomValidator for Unique {
///     fn validate(&mut self, errors: &mut ErrorCollector, field: &str, value: &mut Value) -> bool {
///         let name = value.as_str().unwrap_or_default().to_lowercase();
///         if self.0.contains(&name) {
///             errors.add_error(field, format!("'{name}' is taken"));
///             return false;
///         }
///         *value = Value::String(name.clone());
///         self.0.push(name);
///         true
///     }
/// }
///
/// let mut validator = Validator::greedy();
/// validator.add_rule("user", Rule::validator(Unique(vec!["root".into()]))).unwrap();
///
/// let mut data = json!({"user": "Alice"});
/// assert!(validator.check(&mut data).unwrap());
/// assert_eq!(data["user"], json!("alice"));
/// ```
pub trait CustomValidator: Send {
    /// Check, and optionally rewrite, one field's value.
    fn validate(&mut self, errors: &mut ErrorCollector, field: &str, value: &mut Value) -> bool;
}

/// A rule declaration for one field.
pub enum Rule {
    /// Registry tokens, applied in order
    Tokens(Vec<String>),
    /// A closure over the whole record
    Predicate(Predicate),
    /// A stateful validator object
    Validator(Box<dyn CustomValidator>),
}

impl Rule {
    /// Split a pipe-delimited declaration into tokens.
    ///
    /// Surrounding whitespace around each token is ignored.
    pub fn tokens(declaration: &str) -> Self {
        Rule::Tokens(
            declaration
                .split('|')
                .map(|token| token.trim().to_string())
                .collect(),
        )
    }

    /// Wrap a closure as a predicate rule.
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&mut ErrorCollector, &mut Record, &str) -> bool + Send + Sync + 'static,
    {
        Rule::Predicate(Predicate::new(f))
    }

    /// Wrap a validator object.
    pub fn validator(validator: impl CustomValidator + 'static) -> Self {
        Rule::Validator(Box::new(validator))
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Tokens(tokens) => f.debug_tuple("Tokens").field(tokens).finish(),
            Rule::Predicate(p) => f.debug_tuple("Predicate").field(p).finish(),
            Rule::Validator(_) => f.write_str("Validator(..)"),
        }
    }
}

impl From<&str> for Rule {
    fn from(declaration: &str) -> Self {
        Rule::tokens(declaration)
    }
}

impl From<String> for Rule {
    fn from(declaration: String) -> Self {
        Rule::tokens(&declaration)
    }
}

impl From<&String> for Rule {
    fn from(declaration: &String) -> Self {
        Rule::tokens(declaration)
    }
}

impl From<Vec<&str>> for Rule {
    fn from(tokens: Vec<&str>) -> Self {
        Rule::Tokens(tokens.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Rule {
    fn from(tokens: &[&str]) -> Self {
        Rule::Tokens(tokens.iter().map(|t| t.to_string()).collect())
    }
}

impl From<Predicate> for Rule {
    fn from(predicate: Predicate) -> Self {
        Rule::Predicate(predicate)
    }
}

impl From<Box<dyn CustomValidator>> for Rule {
    fn from(validator: Box<dyn CustomValidator>) -> Self {
        Rule::Validator(validator)
    }
}

/// A resolved rule, ready to run.
pub(crate) enum RuleItem {
    Builtin { token: String, check: RuleFn },
    Optional,
    Predicate(Predicate),
    Validator(Box<dyn CustomValidator>),
}

impl RuleItem {
    fn token(&self) -> Option<&str> {
        match self {
            RuleItem::Builtin { token, .. } => Some(token.as_str()),
            RuleItem::Optional => Some(OPTIONAL),
            RuleItem::Predicate(_) | RuleItem::Validator(_) => None,
        }
    }

    pub(crate) fn label(&self) -> &str {
        match self {
            RuleItem::Builtin { token, .. } => token.as_str(),
            RuleItem::Optional => OPTIONAL,
            RuleItem::Predicate(_) => "<predicate>",
            RuleItem::Validator(_) => "<validator>",
        }
    }
}

impl fmt::Debug for RuleItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordered rule lists keyed by field name, in field insertion order.
#[derive(Debug, Default)]
pub struct FieldRuleSet {
    fields: IndexMap<String, Vec<RuleItem>>,
}

impl FieldRuleSet {
    /// Create an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one declaration into a field's rule list.
    ///
    /// Every token is resolved before anything is added, so a declaration
    /// containing an unknown token leaves the rule set untouched.
    pub fn add_rule(
        &mut self,
        registry: &RuleRegistry,
        field: &str,
        rule: impl Into<Rule>,
    ) -> Result<(), RuleError> {
        let items = resolve(registry, field, rule.into())?;
        self.merge(field, items);
        Ok(())
    }

    /// Merge a batch of pipe-delimited declarations, in iteration order.
    ///
    /// The batch is all or nothing: one bad declaration leaves the rule set
    /// untouched.
    pub fn add_rules<I, K, S>(&mut self, registry: &RuleRegistry, rules: I) -> Result<(), RuleError>
    where
        I: IntoIterator<Item = (K, S)>,
        K: AsRef<str>,
        S: AsRef<str>,
    {
        self.add_batch(
            registry,
            rules
                .into_iter()
                .map(|(field, declaration)| (field, Rule::tokens(declaration.as_ref()))),
        )
    }

    /// Resolve every declaration, then merge them in order.
    pub(crate) fn add_batch<I, K, R>(&mut self, registry: &RuleRegistry, rules: I) -> Result<(), RuleError>
    where
        I: IntoIterator<Item = (K, R)>,
        K: AsRef<str>,
        R: Into<Rule>,
    {
        let resolved = rules
            .into_iter()
            .map(|(field, rule)| {
                let field = field.as_ref();
                resolve(registry, field, rule.into()).map(|items| (field.to_string(), items))
            })
            .collect::<Result<Vec<_>, _>>()?;

        for (field, items) in resolved {
            self.merge(&field, items);
        }
        Ok(())
    }

    fn merge(&mut self, field: &str, items: Vec<RuleItem>) {
        let list = self.fields.entry(field.to_string()).or_default();
        for item in items {
            let duplicate = item
                .token()
                .is_some_and(|token| list.iter().any(|existing| existing.token() == Some(token)));
            if !duplicate {
                list.push(item);
            }
        }
    }

    /// Remove every field and its rules.
    pub fn clear(&mut self) {
        self.fields.clear();
    }

    /// Returns `true` if the field has a rule list.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Declared field names, in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Labels of a field's rules in evaluation order.
    ///
    /// Tokens appear as written; closures and objects appear as
    /// `<predicate>` and `<validator>`.
    pub fn labels(&self, field: &str) -> Vec<&str> {
        self.fields
            .get(field)
            .map(|items| items.iter().map(RuleItem::label).collect())
            .unwrap_or_default()
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if no field is declared.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut [RuleItem])> {
        self.fields
            .iter_mut()
            .map(|(field, items)| (field.as_str(), items.as_mut_slice()))
    }
}

fn resolve(registry: &RuleRegistry, field: &str, rule: Rule) -> Result<Vec<RuleItem>, RuleError> {
    match rule {
        Rule::Tokens(tokens) => resolve_tokens(registry, field, tokens),
        Rule::Predicate(p) => Ok(vec![RuleItem::Predicate(p)]),
        Rule::Validator(v) => Ok(vec![RuleItem::Validator(v)]),
    }
}

fn resolve_tokens(
    registry: &RuleRegistry,
    field: &str,
    tokens: Vec<String>,
) -> Result<Vec<RuleItem>, RuleError> {
    tokens
        .iter()
        .map(|token| {
            if token.is_empty() {
                return Err(RuleError::EmptyToken {
                    field: field.to_string(),
                    declaration: tokens.join("|"),
                });
            }
            if token == OPTIONAL {
                return Ok(RuleItem::Optional);
            }
            registry
                .lookup(token)
                .map(|check| RuleItem::Builtin {
                    token: token.clone(),
                    check,
                })
                .ok_or_else(|| RuleError::UnknownToken {
                    field: field.to_string(),
                    token: token.clone(),
                })
        })
        .collect()
}
