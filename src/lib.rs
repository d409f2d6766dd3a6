//! # Fieldgate
//!
//! Rule-based validation and coercion for loosely typed input records.
//!
//! Input arrives as a JSON object of named values (a form post, a query
//! string, a decoded request body). Each field gets a declarative list of
//! rules. A [`Validator`] checks the record against them, rewrites values
//! into their canonical types, drops every field that was not declared,
//! and collects human-readable errors per field.
//!
//! ## Quick Example
//!
//! ```rust
//! use fieldgate::{helpers, Validator};
//! use serde_json::json;
//!
//! let mut validator = Validator::greedy();
//! validator
//!     .add_rule("password", helpers::matches("password2", "password confirmation"))
//!     .unwrap();
//!
//! let mut data = json!({
//!     "age": "7",
//!     "email": "ada@example.com",
//!     "password": "x",
//!     "password2": "x",
//!     "is_admin": true,
//! });
//!
//! let passed = validator
//!     .validate(
//!         &mut data,
//!         [
//!             ("age", "int|opt_exists"),
//!             ("email", "email"),
//!             ("password2", "string"),
//!         ],
//!     )
//!     .unwrap();
//!
//! assert!(passed);
//! assert_eq!(data["age"], json!(7));
//! assert!(data.get("is_admin").is_none());
//! ```
//!
//! ## Strategies
//!
//! Within a field, the first failing rule always ends that field. Across
//! fields, [`Mode::Greedy`] reports every failing field while
//! [`Mode::Frugal`] stops at the first one.
//!
//! ## Errors
//!
//! Bad input is never an `Err`: it lands in the [`ErrorCollector`].
//! [`RuleError`] means a rule declaration is broken (for example an unknown
//! token), and [`ResourceError`] comes from the file-backed collaborators in
//! [`resources`].

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod collector;
pub mod engine;
pub mod error;
pub mod helpers;
pub mod registry;
pub mod resources;
pub mod rule;
pub mod semigroup;
pub mod testing;
pub mod validation;
pub mod value;

/// A data record: string keys mapped to heterogeneous JSON values.
pub type Record = serde_json::Map<String, serde_json::Value>;

// Re-exports
pub use collector::ErrorCollector;
pub use engine::{Mode, Validator};
pub use error::{ResourceError, RuleError};
pub use registry::{RuleFn, RuleRegistry};
pub use rule::{CustomValidator, FieldRuleSet, Predicate, Rule};
pub use semigroup::Semigroup;
pub use validation::Validation;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::collector::ErrorCollector;
    pub use crate::engine::{Mode, Validator};
    pub use crate::error::{ResourceError, RuleError};
    pub use crate::helpers;
    pub use crate::rule::{CustomValidator, Predicate, Rule};
    pub use crate::validation::Validation;
    pub use crate::Record;
}
