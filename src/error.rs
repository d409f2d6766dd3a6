//! Error types
//!
//! Two kinds of failure live here, and neither of them is a field
//! validation failure. Invalid input is reported through the
//! [`ErrorCollector`](crate::ErrorCollector); these errors mean the
//! caller declared something the engine cannot run ([`RuleError`]) or a
//! file-backed collaborator could not produce a resource
//! ([`ResourceError`]).

use std::path::PathBuf;

use thiserror::Error;

/// A rule declaration the engine cannot execute.
///
/// Raised while rules are registered, never for bad input data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// The token has no entry in the engine's registry.
    #[error("unknown rule token '{token}' for field '{field}'")]
    UnknownToken {
        /// Field the rule was declared for
        field: String,
        /// The unresolved token
        token: String,
    },

    /// A pipe-delimited declaration contained an empty token.
    #[error("empty rule token in declaration '{declaration}' for field '{field}'")]
    EmptyToken {
        /// Field the rule was declared for
        field: String,
        /// The full declaration as written
        declaration: String,
    },

    /// A pattern predicate was built from an invalid regular expression.
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The pattern source
        pattern: String,
        /// Why the regex engine rejected it
        reason: String,
    },
}

/// Failure to load a configuration or language resource.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// No file exists for the requested resource.
    #[error("resource '{name}' not found at {}", path.display())]
    NotFound {
        /// Resource key
        name: String,
        /// Path that was looked up
        path: PathBuf,
    },

    /// The file exists but could not be read.
    #[error("failed to read {}", path.display())]
    Io {
        /// Path being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON.
    #[error("failed to parse {}", path.display())]
    Parse {
        /// Path being parsed
        path: PathBuf,
        /// Underlying parse error
        #[source]
        source: serde_json::Error,
    },

    /// A language file must hold a JSON object of templates.
    #[error("language resource '{name}' is not an object")]
    NotAnObject {
        /// Resource key
        name: String,
    },

    /// The environment name is not one of `dev`, `stg`, `prd`.
    #[error("unknown environment '{0}'")]
    UnknownEnvironment(String),

    /// The requested template key is missing or not a string.
    #[error("no template '{key}' in language resource '{name}'")]
    MissingKey {
        /// Resource key
        name: String,
        /// Template key
        key: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn unknown_token_names_field_and_token() {
        let err = RuleError::UnknownToken {
            field: "scores".to_string(),
            token: "float[]".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "unknown rule token 'float[]' for field 'scores'"
        );
    }

    #[test]
    fn parse_error_exposes_source() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ResourceError::Parse {
            path: PathBuf::from("cfg/app.json"),
            source,
        };
        assert!(err.to_string().contains("cfg/app.json"));
        assert!(err.source().is_some());
    }
}
