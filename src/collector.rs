//! Per-field error collection
//!
//! An [`ErrorCollector`] maps field names to the ordered messages produced
//! while validating them. Fields keep the order in which they first failed.
//! The engine removes a field whose evaluation produced no messages, so a
//! field present in the collector always has at least one message.

use std::fmt;

use indexmap::IndexMap;

use crate::Semigroup;

/// Ordered mapping from field name to its failure messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ErrorCollector {
    fields: IndexMap<String, Vec<String>>,
}

impl ErrorCollector {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message to a field's error list.
    ///
    /// This is the reporting entry point for built-in rules, custom
    /// predicates and [`CustomValidator`](crate::CustomValidator)s alike.
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Messages recorded for a field, in the order they were added.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    /// Returns `true` if the field has at least one message.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Returns `true` if no field has errors.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of fields with errors.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Failing field names, in first-failure order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Iterate over `(field, messages)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }

    /// Drop a field's messages, returning them.
    pub fn remove(&mut self, field: &str) -> Option<Vec<String>> {
        self.fields.shift_remove(field)
    }

    /// Drop every message.
    pub fn clear(&mut self) {
        self.fields.clear();
    }

    /// Start a fresh, empty message list for a field about to be evaluated.
    pub(crate) fn begin(&mut self, field: &str) {
        match self.fields.get_mut(field) {
            Some(messages) => messages.clear(),
            None => {
                self.fields.insert(field.to_string(), Vec::new());
            }
        }
    }

    /// Number of messages currently recorded for a field.
    pub(crate) fn count(&self, field: &str) -> usize {
        self.fields.get(field).map_or(0, Vec::len)
    }

    /// Remove the field if it holds no messages.
    pub(crate) fn prune(&mut self, field: &str) {
        if self.fields.get(field).is_some_and(Vec::is_empty) {
            self.fields.shift_remove(field);
        }
    }

    /// Join all messages into one display string, one `field: m1, m2` line
    /// per failing field.
    ///
    /// # Examples
    ///
    /// ```
    /// use fieldgate::ErrorCollector;
    ///
    /// let mut errors = ErrorCollector::new();
    /// errors.add_error("age", "not a valid integer");
    /// errors.add_error("tags", "not a valid array");
    /// errors.add_error("tags", "too many tags");
    ///
    /// assert_eq!(
    ///     errors.to_error_string(),
    ///     "age: not a valid integer\ntags: not a valid array, too many tags\n"
    /// );
    /// ```
    pub fn to_error_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ErrorCollector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (field, messages) in &self.fields {
            writeln!(f, "{}: {}", field, messages.join(", "))?;
        }
        Ok(())
    }
}

impl Semigroup for ErrorCollector {
    fn combine(mut self, other: Self) -> Self {
        for (field, messages) in other.fields {
            self.fields.entry(field).or_default().extend(messages);
        }
        self
    }
}

impl<'a> IntoIterator for &'a ErrorCollector {
    type Item = (&'a String, &'a Vec<String>);
    type IntoIter = indexmap::map::Iter<'a, String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_keep_insertion_order() {
        let mut errors = ErrorCollector::new();
        errors.add_error("b", "first");
        errors.add_error("a", "second");
        errors.add_error("b", "third");

        assert_eq!(errors.fields().collect::<Vec<_>>(), ["b", "a"]);
        assert_eq!(errors.get("b").unwrap(), ["first", "third"]);
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn prune_only_removes_empty_lists() {
        let mut errors = ErrorCollector::new();
        errors.begin("empty");
        errors.add_error("full", "msg");
        errors.add_error("full", "stale");
        errors.begin("full");
        assert_eq!(errors.count("full"), 0);
        errors.add_error("full", "msg");

        errors.prune("empty");
        errors.prune("full");
        errors.prune("missing");

        assert!(!errors.contains("empty"));
        assert!(errors.contains("full"));
    }

    #[test]
    fn empty_collector_renders_empty_string() {
        assert_eq!(ErrorCollector::new().to_error_string(), "");
    }

    #[test]
    fn combine_concatenates_per_field() {
        let mut a = ErrorCollector::new();
        a.add_error("x", "1");
        let mut b = ErrorCollector::new();
        b.add_error("y", "2");
        b.add_error("x", "3");

        let merged = a.combine(b);
        assert_eq!(merged.get("x").unwrap(), ["1", "3"]);
        assert_eq!(merged.get("y").unwrap(), ["2"]);
    }

    #[test]
    fn remove_and_clear() {
        let mut errors = ErrorCollector::new();
        errors.add_error("x", "1");
        errors.add_error("y", "2");

        assert_eq!(errors.remove("x"), Some(vec!["1".to_string()]));
        assert_eq!(errors.count("x"), 0);
        errors.clear();
        assert!(errors.is_empty());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_as_plain_map() {
        let mut errors = ErrorCollector::new();
        errors.add_error("email", "Is not a valid email");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, serde_json::json!({"email": ["Is not a valid email"]}));
    }
}
