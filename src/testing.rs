//! Assertion helpers for code built on validated containers
//!
//! # Examples
//!
//! ```rust
//! use weir::{assert_rejected, assert_unchanged, ValidatedVec};
//!
//! let mut v = ValidatedVec::<u8>::new();
//! v.push(1).unwrap();
//!
//! assert_rejected!(v.push(-1));
//! assert_unchanged!(v, v.push("x"));
//! ```

/// Assert that a validating operation was rejected.
///
/// Panics if the result is `Ok`.
///
/// # Example
///
/// ```rust
/// use weir::{assert_rejected, Validate};
/// use serde_json::json;
///
/// assert_rejected!(u8::validate(json!(300)));
/// ```
#[macro_export]
macro_rules! assert_rejected {
    ($result:expr) => {
        match $result {
            ::std::result::Result::Err(_) => {}
            ::std::result::Result::Ok(v) => {
                panic!("Expected rejection, got Ok: {:?}", v);
            }
        }
    };
}

/// Assert that a validating operation was rejected and left the container
/// exactly as it was.
///
/// The container must implement `Clone`, `PartialEq` and `Debug`.
///
/// # Example
///
/// ```rust
/// use weir::{assert_unchanged, ValidatedMap};
///
/// let mut m = ValidatedMap::<String, i32>::new();
/// m.insert("a", 1).unwrap();
/// assert_unchanged!(m, m.extend([("b", "2"), ("c", "three")]));
/// assert_eq!(m.len(), 1);
/// ```
#[macro_export]
macro_rules! assert_unchanged {
    ($container:expr, $op:expr) => {{
        let before = ::std::clone::Clone::clone(&$container);
        $crate::assert_rejected!($op);
        assert_eq!($container, before, "rejected operation mutated the container");
    }};
}

#[cfg(test)]
mod tests {
    use crate::error::{ValidationError, ValidationResult};
    use crate::ValidatedVec;

    fn ok() -> ValidationResult<i32> {
        Ok(1)
    }

    fn rejected() -> ValidationResult<i32> {
        Err(ValidationError::custom("no"))
    }

    #[test]
    fn assert_rejected_macro() {
        assert_rejected!(rejected());
    }

    #[test]
    #[should_panic(expected = "Expected rejection, got Ok")]
    fn assert_rejected_panics_on_ok() {
        assert_rejected!(ok());
    }

    #[test]
    fn assert_unchanged_macro() {
        let mut v = ValidatedVec::<i32>::from_raw([1, 2], None).unwrap();
        assert_unchanged!(v, v.extend([serde_json::json!(3), serde_json::json!("x")]));
    }

    #[test]
    #[should_panic(expected = "rejected operation mutated the container")]
    fn assert_unchanged_panics_on_mutation() {
        let mut v = ValidatedVec::<i32>::new();
        assert_unchanged!(v, {
            v.push(1).unwrap();
            v.push("x")
        });
    }
}
