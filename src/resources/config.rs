//! Environment-scoped configuration files

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde_json::Value;

use crate::ResourceError;

/// Deployment environment selecting a configuration subdirectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Environment {
    /// Development
    Dev,
    /// Staging
    Stg,
    /// Production
    Prd,
}

impl Environment {
    /// Directory name for this environment.
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Dev => "dev",
            Environment::Stg => "stg",
            Environment::Prd => "prd",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dev" => Ok(Environment::Dev),
            "stg" => Ok(Environment::Stg),
            "prd" => Ok(Environment::Prd),
            _ => Err(ResourceError::UnknownEnvironment(s.to_string())),
        }
    }
}

/// Memoizing loader for `<root>[/<env>]/<name>.json` files.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    root: PathBuf,
    env: Option<Environment>,
    cache: HashMap<String, Value>,
}

impl ConfigStore {
    /// Store reading directly from `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            env: None,
            cache: HashMap::new(),
        }
    }

    /// Read from `root/<env>/` instead. Clears anything already cached.
    pub fn with_env(mut self, env: Environment) -> Self {
        self.env = Some(env);
        self.cache.clear();
        self
    }

    /// The selected environment, if any.
    pub fn env(&self) -> Option<Environment> {
        self.env
    }

    /// File path backing a configuration key.
    pub fn path_for(&self, name: &str) -> PathBuf {
        let mut path = self.root.clone();
        if let Some(env) = self.env {
            path.push(env.as_str());
        }
        path.push(format!("{name}.json"));
        path
    }

    /// Configuration for `name`, loaded on first request.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the file is missing, unreadable or not
    /// valid JSON. Failures are not cached.
    pub fn get(&mut self, name: &str) -> Result<&Value, ResourceError> {
        let path = self.path_for(name);
        match self.cache.entry(name.to_string()) {
            Entry::Occupied(entry) => Ok(&*entry.into_mut()),
            Entry::Vacant(entry) => {
                let value = super::load_json(name, &path)?;
                Ok(&*entry.insert(value))
            }
        }
    }

    /// Returns `true` if `name` has been loaded.
    pub fn is_cached(&self, name: &str) -> bool {
        self.cache.contains_key(name)
    }

    /// Drop every loaded configuration.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn environment_parses_case_insensitively() {
        assert_eq!("PRD".parse::<Environment>().unwrap(), Environment::Prd);
        assert_eq!(" dev ".parse::<Environment>().unwrap(), Environment::Dev);
        assert!(matches!(
            "qa".parse::<Environment>(),
            Err(ResourceError::UnknownEnvironment(name)) if name == "qa"
        ));
    }

    #[test]
    fn path_includes_environment() {
        let store = ConfigStore::new("/etc/app").with_env(Environment::Stg);
        assert_eq!(store.path_for("db"), PathBuf::from("/etc/app/stg/db.json"));
        assert_eq!(
            ConfigStore::new("/etc/app").path_for("db"),
            PathBuf::from("/etc/app/db.json")
        );
    }

    #[test]
    fn loads_once_and_serves_from_cache() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("app.json");
        fs::write(&file, r#"{"mode": "greedy"}"#).unwrap();

        let mut store = ConfigStore::new(dir.path());
        assert_eq!(store.get("app").unwrap()["mode"], "greedy");

        fs::write(&file, r#"{"mode": "frugal"}"#).unwrap();
        assert_eq!(store.get("app").unwrap()["mode"], "greedy");

        store.clear_cache();
        assert_eq!(store.get("app").unwrap()["mode"], "frugal");
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ConfigStore::new(dir.path()).with_env(Environment::Dev);

        let err = store.get("absent").unwrap_err();
        assert!(matches!(err, ResourceError::NotFound { ref name, .. } if name == "absent"));
        assert!(!store.is_cached("absent"));
    }

    #[test]
    fn invalid_json_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.json"), "{ nope").unwrap();

        let mut store = ConfigStore::new(dir.path());
        assert!(matches!(
            store.get("bad").unwrap_err(),
            ResourceError::Parse { .. }
        ));
    }
}
