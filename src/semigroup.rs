//! Semigroup trait for combining error accumulations
//!
//! Combining the outcomes of several validation passes needs a way to merge
//! their errors. A Semigroup is a type with an associative `combine`:
//!
//! ```text
//! a.combine(b).combine(c) == a.combine(b.combine(c))
//! ```
//!
//! # Examples
//!
//! ```
//! use fieldgate::{ErrorCollector, Semigroup};
//!
//! let mut left = ErrorCollector::new();
//! left.add_error("email", "Is not a valid email");
//!
//! let mut right = ErrorCollector::new();
//! right.add_error("email", "is already registered");
//! right.add_error("age", "not a valid integer");
//!
//! let merged = left.combine(right);
//! assert_eq!(
//!     merged.get("email").unwrap(),
//!     ["Is not a valid email", "is already registered"]
//! );
//! assert!(merged.contains("age"));
//! ```

/// A type that supports an associative binary operation
///
/// The `combine` method takes `self` by value. Clone first if the original
/// is still needed.
pub trait Semigroup: Sized {
    /// Combine this value with another value associatively
    fn combine(self, other: Self) -> Self;
}

impl<T> Semigroup for Vec<T> {
    #[inline]
    fn combine(mut self, other: Self) -> Self {
        self.extend(other);
        self
    }
}

impl Semigroup for String {
    #[inline]
    fn combine(mut self, other: Self) -> Self {
        self.push_str(&other);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_semigroup() {
        assert_eq!(vec![1, 2].combine(vec![3]), vec![1, 2, 3]);
    }

    #[test]
    fn test_string_semigroup() {
        assert_eq!("not a ".to_string().combine("string".to_string()), "not a string");
    }

    #[test]
    fn test_vec_associativity() {
        let a = vec!["a"];
        let b = vec!["b"];
        let c = vec!["c"];

        let left = a.clone().combine(b.clone()).combine(c.clone());
        let right = a.combine(b.combine(c));

        assert_eq!(left, right);
    }
}
