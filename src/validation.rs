//! Validation outcome as a value
//!
//! [`Validator::validate`](crate::Validator::validate) mutates a record in
//! place and reports through the engine's collector. When a pass should
//! instead hand back either the coerced record or its errors, the outcome is
//! a [`Validation`]: like `Result`, but combining two failures accumulates
//! both error sets rather than keeping the first.
//!
//! # Examples
//!
//! ```
//! use fieldgate::{Validation, Validator};
//! use serde_json::json;
//!
//! let mut signup = Validator::greedy();
//! let outcome = signup
//!     .validate_into(json!({"age": "31", "debug": true}), [("age", "int")])
//!     .unwrap();
//!
//! match outcome {
//!     Validation::Success(record) => assert_eq!(record["age"], json!(31)),
//!     Validation::Failure(errors) => panic!("unexpected errors: {errors}"),
//! }
//! ```

use crate::Semigroup;

/// A validation that either succeeds with a value or fails with accumulated errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation<T, E> {
    /// Successful validation with a value
    Success(T),
    /// Failed validation with accumulated errors
    Failure(E),
}

impl<T, E> Validation<T, E> {
    /// Create a successful validation
    #[inline]
    pub fn success(value: T) -> Self {
        Validation::Success(value)
    }

    /// Create a failed validation
    #[inline]
    pub fn failure(error: E) -> Self {
        Validation::Failure(error)
    }

    /// Convert this validation to a Result
    ///
    /// # Examples
    ///
    /// ```
    /// use fieldgate::Validation;
    ///
    /// let v = Validation::<_, String>::success(42);
    /// assert_eq!(v.into_result(), Ok(42));
    /// ```
    #[inline]
    pub fn into_result(self) -> Result<T, E> {
        match self {
            Validation::Success(value) => Ok(value),
            Validation::Failure(error) => Err(error),
        }
    }

    /// Check if this validation is successful
    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, Validation::Success(_))
    }

    /// Check if this validation failed
    #[inline]
    pub fn is_failure(&self) -> bool {
        matches!(self, Validation::Failure(_))
    }

    /// Transform the success value if present
    #[inline]
    pub fn map<U, F>(self, f: F) -> Validation<U, E>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Validation::Success(value) => Validation::Success(f(value)),
            Validation::Failure(error) => Validation::Failure(error),
        }
    }

    /// Transform the error value if present
    #[inline]
    pub fn map_err<E2, F>(self, f: F) -> Validation<T, E2>
    where
        F: FnOnce(E) -> E2,
    {
        match self {
            Validation::Success(value) => Validation::Success(value),
            Validation::Failure(error) => Validation::Failure(f(error)),
        }
    }
}

impl<T, E: Semigroup> Validation<T, E> {
    /// Combine two validations, accumulating errors using the Semigroup instance
    ///
    /// # Examples
    ///
    /// ```
    /// use fieldgate::Validation;
    ///
    /// let v1 = Validation::<i32, _>::failure(vec!["billing: not a valid string"]);
    /// let v2 = Validation::<i32, _>::failure(vec!["shipping: not a valid string"]);
    /// assert_eq!(
    ///     v1.and(v2),
    ///     Validation::Failure(vec![
    ///         "billing: not a valid string",
    ///         "shipping: not a valid string",
    ///     ])
    /// );
    /// ```
    pub fn and<U>(self, other: Validation<U, E>) -> Validation<(T, U), E> {
        match (self, other) {
            (Validation::Success(a), Validation::Success(b)) => Validation::Success((a, b)),
            (Validation::Failure(e1), Validation::Failure(e2)) => {
                Validation::Failure(e1.combine(e2))
            }
            (Validation::Failure(e), _) => Validation::Failure(e),
            (_, Validation::Failure(e)) => Validation::Failure(e),
        }
    }
}

impl<T, E> From<Result<T, E>> for Validation<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Validation::Success(value),
            Err(error) => Validation::Failure(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_result() {
        assert_eq!(Validation::<_, String>::success(1).into_result(), Ok(1));
        assert_eq!(
            Validation::<i32, _>::failure("bad".to_string()).into_result(),
            Err("bad".to_string())
        );
    }

    #[test]
    fn test_map_and_map_err() {
        let v = Validation::<_, Vec<&str>>::success(5).map(|x| x * 2);
        assert_eq!(v, Validation::Success(10));

        let v = Validation::<i32, _>::failure(vec!["a", "b"]).map_err(|e| e.len());
        assert_eq!(v, Validation::Failure(2));
    }

    #[test]
    fn test_and_both_failure_accumulates() {
        let v1 = Validation::<i32, _>::failure(vec!["e1"]);
        let v2 = Validation::<i32, _>::failure(vec!["e2"]);
        assert_eq!(v1.and(v2), Validation::Failure(vec!["e1", "e2"]));
    }

    #[test]
    fn test_and_one_failure() {
        let v1 = Validation::<_, Vec<&str>>::success(1);
        let v2 = Validation::<i32, _>::failure(vec!["e2"]);
        assert_eq!(v1.and(v2), Validation::Failure(vec!["e2"]));
    }

    #[test]
    fn test_from_result() {
        let v: Validation<i32, &str> = Err("nope").into();
        assert!(v.is_failure());
        let v: Validation<i32, &str> = Ok(3).into();
        assert!(v.is_success());
    }
}
