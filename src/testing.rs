//! Testing utilities
//!
//! Assertion macros for code that validates records, and, with the
//! `proptest` feature, an `Arbitrary` implementation for [`Mode`](crate::Mode).
//!
//! # Examples
//!
//! ```rust
//! use fieldgate::{assert_field_errors, assert_invalid, assert_valid, Validator};
//! use serde_json::json;
//!
//! let mut validator = Validator::greedy();
//! let mut data = json!({"email": "not-an-email"});
//! validator.validate(&mut data, [("email", "email")]).unwrap();
//!
//! assert_invalid!(validator);
//! assert_field_errors!(validator, "email", ["Is not a valid email"]);
//!
//! validator.clear_errors();
//! assert_valid!(validator);
//! ```

/// Assert that a validator holds no errors.
///
/// Panics with the joined error string otherwise.
#[macro_export]
macro_rules! assert_valid {
    ($validator:expr) => {
        if !$validator.is_valid() {
            panic!("Expected valid, got errors:\n{}", $validator.error_string());
        }
    };
}

/// Assert that a validator holds at least one error.
#[macro_export]
macro_rules! assert_invalid {
    ($validator:expr) => {
        if $validator.is_valid() {
            panic!("Expected errors, got a valid validator");
        }
    };
}

/// Assert the exact messages recorded for one field.
///
/// # Example
///
/// ```rust
/// use fieldgate::{assert_field_errors, Validator};
/// use serde_json::json;
///
/// let mut validator = Validator::frugal();
/// let mut data = json!({});
/// validator.validate(&mut data, [("a", "exists"), ("b", "exists")]).unwrap();
///
/// assert_field_errors!(validator, "a", ["a does not exist"]);
/// ```
#[macro_export]
macro_rules! assert_field_errors {
    ($validator:expr, $field:expr, $expected:expr) => {
        match $validator.errors().get($field) {
            Some(messages) => assert_eq!(messages, $expected),
            None => panic!(
                "Expected errors {:?} for field {:?}, got none",
                $expected, $field
            ),
        }
    };
}

/// Assert that a [`Validation`](crate::Validation) succeeds.
#[macro_export]
macro_rules! assert_success {
    ($validation:expr) => {
        match $validation {
            $crate::Validation::Success(_) => {}
            $crate::Validation::Failure(e) => {
                panic!("Expected Success, got Failure: {:?}", e);
            }
        }
    };
}

/// Assert that a [`Validation`](crate::Validation) fails.
#[macro_export]
macro_rules! assert_failure {
    ($validation:expr) => {
        match $validation {
            $crate::Validation::Failure(_) => {}
            $crate::Validation::Success(v) => {
                panic!("Expected Failure, got Success: {:?}", v);
            }
        }
    };
}

#[cfg(feature = "proptest")]
use proptest::prelude::*;

#[cfg(feature = "proptest")]
impl Arbitrary for crate::Mode {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        prop_oneof![Just(crate::Mode::Greedy), Just(crate::Mode::Frugal)].boxed()
    }
}

#[cfg(test)]
mod tests {
    use crate::{Validation, Validator};
    use serde_json::json;

    fn failing() -> Validator {
        let mut validator = Validator::greedy();
        let mut data = json!({"n": "x"});
        validator.validate(&mut data, [("n", "int")]).unwrap();
        validator
    }

    #[test]
    fn assert_valid_macro() {
        assert_valid!(Validator::greedy());
    }

    #[test]
    fn assert_field_errors_macro() {
        assert_field_errors!(failing(), "n", ["not a valid integer"]);
    }

    #[test]
    #[should_panic(expected = "Expected valid, got errors")]
    fn assert_valid_panics_on_errors() {
        assert_valid!(failing());
    }

    #[test]
    #[should_panic(expected = "Expected errors, got a valid validator")]
    fn assert_invalid_panics_when_valid() {
        assert_invalid!(Validator::frugal());
    }

    #[test]
    #[should_panic(expected = "got none")]
    fn assert_field_errors_panics_on_clean_field() {
        assert_field_errors!(failing(), "other", ["anything"]);
    }

    #[test]
    fn validation_macros() {
        assert_success!(Validation::<_, Vec<String>>::success(1));
        assert_failure!(Validation::<i32, _>::failure(vec!["e".to_string()]));
    }

    #[cfg(feature = "proptest")]
    mod proptest_tests {
        use crate::Mode;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn mode_arbitrary_generates_both_variants(mode in any::<Mode>()) {
                prop_assert!(matches!(mode, Mode::Greedy | Mode::Frugal));
            }
        }
    }
}
