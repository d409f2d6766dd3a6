//! Message templates
//!
//! A language file is a JSON object of named templates. Placeholders are
//! written `{name}` or `{path.to.value}` and resolve against a JSON value;
//! a placeholder with no matching value is left as written.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::{Map, Value};

use crate::value::display;
use crate::ResourceError;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\s*([A-Za-z0-9_\-]+(?:\.[A-Za-z0-9_\-]+)*)\s*\}")
        .expect("placeholder pattern is valid")
});

/// Memoizing loader for `<root>/<name>.json` template files.
#[derive(Debug, Clone)]
pub struct LangCatalog {
    root: PathBuf,
    cache: HashMap<String, Map<String, Value>>,
}

impl LangCatalog {
    /// Catalog reading from `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: HashMap::new(),
        }
    }

    /// Templates for `name`, loaded on first request.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the file is missing, unreadable, not
    /// valid JSON or not a JSON object.
    pub fn get(&mut self, name: &str) -> Result<&Map<String, Value>, ResourceError> {
        let path = self.root.join(format!("{name}.json"));
        match self.cache.entry(name.to_string()) {
            Entry::Occupied(entry) => Ok(&*entry.into_mut()),
            Entry::Vacant(entry) => match super::load_json(name, &path)? {
                Value::Object(templates) => Ok(&*entry.insert(templates)),
                _ => Err(ResourceError::NotAnObject {
                    name: name.to_string(),
                }),
            },
        }
    }

    /// Look up a template and render it against `data`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingKey`] if `key` is absent or not a
    /// string, or any error from [`get`](Self::get).
    pub fn message(&mut self, name: &str, key: &str, data: &Value) -> Result<String, ResourceError> {
        let template = self
            .get(name)?
            .get(key)
            .and_then(Value::as_str)
            .ok_or_else(|| ResourceError::MissingKey {
                name: name.to_string(),
                key: key.to_string(),
            })?;
        Ok(Self::render(template, data))
    }

    /// Substitute `{placeholder}`s in `template` from `data`.
    ///
    /// ```
    /// use fieldgate::resources::LangCatalog;
    /// use serde_json::json;
    ///
    /// let text = LangCatalog::render(
    ///     "{field}: expected {rule.name}, got {missing}",
    ///     &json!({"field": "age", "rule": {"name": "int"}}),
    /// );
    /// assert_eq!(text, "age: expected int, got {missing}");
    /// ```
    pub fn render(template: &str, data: &Value) -> String {
        PLACEHOLDER
            .replace_all(template, |caps: &Captures<'_>| {
                let pointer = format!("/{}", caps[1].replace('.', "/"));
                match data.pointer(&pointer) {
                    Some(value) => display(value),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }

    /// Drop every loaded template file.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}
