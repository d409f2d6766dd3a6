//! File-backed collaborators of the validation engine
//!
//! The engine never reads files. Applications around it usually need two
//! keyed resources: settings per deployment environment, and message
//! templates used to translate the collector's output. Both are explicit,
//! caller-constructed services that load a JSON file the first time a key
//! is requested and serve it from memory afterwards.
//!
//! ```no_run
//! use fieldgate::resources::{ConfigStore, Environment, LangCatalog};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), fieldgate::ResourceError> {
//! let mut config = ConfigStore::new("./config").with_env(Environment::Prd);
//! let db = config.get("database")?; // ./config/prd/database.json
//! println!("{}", db["host"]);
//!
//! let mut lang = LangCatalog::new("./lang");
//! let text = lang.message("en", "welcome", &json!({"user": {"name": "Ada"}}))?;
//! println!("{text}");
//! # Ok(())
//! # }
//! ```

mod config;
mod lang;

use std::fs;
use std::io;
use std::path::Path;

use serde_json::Value;

use crate::ResourceError;

pub use config::{ConfigStore, Environment};
pub use lang::LangCatalog;

fn load_json(name: &str, path: &Path) -> Result<Value, ResourceError> {
    #[cfg(feature = "tracing")]
    tracing::debug!(name, path = %path.display(), "loading resource");

    let text = fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => ResourceError::NotFound {
            name: name.to_string(),
            path: path.to_path_buf(),
        },
        _ => ResourceError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    serde_json::from_str(&text).map_err(|source| ResourceError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
