//! Validator functions and their resolution
//!
//! A [`Validator<T>`] is a shareable function from a raw [`Value`] to a `T`,
//! or a [`ValidationError`]. Containers hold one validator per type
//! parameter and call it on every path that stores new data.
//!
//! # Resolution
//!
//! Containers pick their validators once, when they are constructed:
//!
//! 1. an explicitly supplied validator always wins;
//! 2. otherwise the validator derived from the element type's [`Validate`]
//!    implementation;
//! 3. which, for the unconstrained element type [`Value`], is the identity.
//!
//! ```
//! use weir::{Origin, Validator, ValidationError};
//!
//! let derived = Validator::<i64>::resolve(None);
//! assert_eq!(derived.origin(), Origin::Derived("i64"));
//! assert_eq!(derived.validate("12").unwrap(), 12);
//!
//! let explicit = Validator::<i64>::resolve(Some(Validator::new(|_| {
//!     Err(ValidationError::custom("nothing is allowed"))
//! })));
//! assert_eq!(explicit.origin(), Origin::Explicit);
//! assert!(explicit.validate(12).is_err());
//! ```

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ValidationError, ValidationResult};
use crate::validate::Validate;

type CheckFn<T> = dyn Fn(Value) -> ValidationResult<T> + Send + Sync;

/// Where a validator came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Supplied by the caller
    Explicit,
    /// Derived from the element type; carries the type's description
    Derived(&'static str),
    /// Derived from serde's `Deserialize` for the element type
    Deserialize(&'static str),
    /// Pass-through for unconstrained element types
    Identity,
}

/// A function that validates and coerces raw values into `T`.
///
/// Cloning is cheap: clones share the same function.
pub struct Validator<T> {
    check: Arc<CheckFn<T>>,
    strict: Option<Arc<CheckFn<T>>>,
    origin: Origin,
}

impl<T> Validator<T> {
    /// Wrap a caller-supplied validation function.
    ///
    /// # Example
    ///
    /// ```
    /// use weir::{Validator, ValidationError};
    ///
    /// let lowercase = Validator::new(|raw| match raw {
    ///     serde_json::Value::String(s) => Ok(s.to_lowercase()),
    ///     other => Err(ValidationError::type_mismatch("string", &other)),
    /// });
    /// assert_eq!(lowercase.validate("MiXeD").unwrap(), "mixed");
    /// ```
    pub fn new<F>(check: F) -> Self
    where
        F: Fn(Value) -> ValidationResult<T> + Send + Sync + 'static,
    {
        Self {
            check: Arc::new(check),
            strict: None,
            origin: Origin::Explicit,
        }
    }

    /// The validator implied by `T`'s [`Validate`] implementation.
    pub fn derived() -> Self
    where
        T: Validate + 'static,
    {
        let origin = if T::UNCONSTRAINED {
            Origin::Identity
        } else {
            Origin::Derived(T::expected())
        };
        Self {
            check: Arc::new(T::validate),
            strict: None,
            origin,
        }
        .with_strict_form()
    }

    /// A strict validator using serde's rules for `T` (no coercion).
    ///
    /// ```
    /// use weir::Validator;
    ///
    /// let strict = Validator::<i64>::deserialize();
    /// assert_eq!(strict.validate(3).unwrap(), 3);
    /// assert!(strict.validate("3").is_err());
    /// ```
    pub fn deserialize() -> Self
    where
        T: DeserializeOwned + 'static,
    {
        Self {
            check: Arc::new(|raw: Value| {
                serde_json::from_value::<T>(raw).map_err(|e| ValidationError::custom(e.to_string()))
            }),
            strict: None,
            origin: Origin::Deserialize(std::any::type_name::<T>()),
        }
    }

    /// Pick the validator for a container parameter.
    ///
    /// An explicit validator takes precedence; otherwise the type-derived
    /// one is used. Either way the result carries `T`'s strict form.
    pub fn resolve(explicit: Option<Self>) -> Self
    where
        T: Validate + 'static,
    {
        match explicit {
            Some(v) if v.strict.is_none() => v.with_strict_form(),
            Some(v) => v,
            None => Self::derived(),
        }
    }

    fn with_strict_form(mut self) -> Self
    where
        T: Validate + 'static,
    {
        if !T::UNCONSTRAINED {
            self.strict = Some(Arc::new(T::validate_strict));
        }
        self
    }

    /// Validate one raw value.
    pub fn validate(&self, raw: impl Into<Value>) -> ValidationResult<T> {
        let result = (self.check)(raw.into());
        #[cfg(feature = "tracing")]
        if let Err(err) = &result {
            tracing::debug!(origin = ?self.origin, error = %err, "value rejected");
        }
        result
    }

    /// Convert a raw value that must already have the exact shape of `T`.
    ///
    /// Uses `T`'s [`Validate::validate_strict`] when this validator was
    /// derived or resolved; otherwise falls back to
    /// [`validate`](Validator::validate). Rejections are not traced.
    ///
    /// ```
    /// use weir::Validator;
    ///
    /// let v = Validator::<i64>::derived();
    /// assert_eq!(v.validate("3").unwrap(), 3);
    /// assert!(v.validate_strict("3").is_err());
    /// assert_eq!(v.validate_strict(3).unwrap(), 3);
    /// ```
    pub fn validate_strict(&self, raw: impl Into<Value>) -> ValidationResult<T> {
        match &self.strict {
            Some(strict) => strict(raw.into()),
            None => (self.check)(raw.into()),
        }
    }

    /// Validate a batch of raw values in order.
    ///
    /// Stops at the first failure and returns it unmodified; no partially
    /// validated batch is ever returned.
    pub fn validate_all<I>(&self, raws: I) -> ValidationResult<Vec<T>>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        raws.into_iter().map(|raw| self.validate(raw)).collect()
    }

    /// Where this validator came from
    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// Whether this validator passes values through unchanged
    pub fn is_identity(&self) -> bool {
        self.origin == Origin::Identity
    }
}

impl Validator<Value> {
    /// The pass-through validator for unconstrained elements.
    pub fn identity() -> Self {
        Self {
            check: Arc::new(Ok::<Value, ValidationError>),
            strict: None,
            origin: Origin::Identity,
        }
    }
}

impl<T> Clone for Validator<T> {
    fn clone(&self) -> Self {
        Self {
            check: Arc::clone(&self.check),
            strict: self.strict.clone(),
            origin: self.origin,
        }
    }
}

impl<T> fmt::Debug for Validator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

impl<T: Validate + 'static> Default for Validator<T> {
    fn default() -> Self {
        Self::derived()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_derived_coerces() {
        let v = Validator::<Vec<f64>>::derived();
        assert_eq!(v.validate(json!(["7.5", 10])).unwrap(), vec![7.5, 10.0]);
        assert_eq!(v.origin(), Origin::Derived("array"));
    }

    #[test]
    fn test_derived_for_value_is_identity() {
        let v = Validator::<Value>::derived();
        assert!(v.is_identity());
        assert_eq!(v.validate("1").unwrap(), json!("1"));
    }

    #[test]
    fn test_identity() {
        let v = Validator::identity();
        assert_eq!(v.origin(), Origin::Identity);
        assert_eq!(v.validate(json!([1, 2])).unwrap(), json!([1, 2]));
    }

    #[test]
    fn test_explicit_takes_precedence() {
        let doubled = Validator::new(|raw| i64::validate(raw).map(|n| n * 2));
        let v = Validator::<i64>::resolve(Some(doubled));
        assert_eq!(v.origin(), Origin::Explicit);
        assert_eq!(v.validate(21).unwrap(), 42);
    }

    #[test]
    fn test_resolve_without_explicit_derives() {
        let v = Validator::<u8>::resolve(None);
        assert_eq!(v.origin(), Origin::Derived("u8"));
        assert!(v.validate(300).is_err());
    }

    #[test]
    fn test_resolved_twice_behaves_the_same() {
        let first = Validator::<i32>::resolve(None);
        let second = Validator::<i32>::resolve(None);
        for raw in [json!("5"), json!(5), json!(5.0)] {
            assert_eq!(
                first.validate(raw.clone()).unwrap(),
                second.validate(raw).unwrap()
            );
        }
    }

    #[test]
    fn test_deserialize_is_strict() {
        let v = Validator::<Vec<u8>>::deserialize();
        assert_eq!(v.validate(json!([1, 2])).unwrap(), vec![1, 2]);
        assert!(v.validate(json!(["1"])).is_err());
        assert!(matches!(v.origin(), Origin::Deserialize(_)));
    }

    #[test]
    fn test_strict_form_does_not_coerce() {
        let v = Validator::<i64>::derived();
        assert_eq!(v.validate_strict(1).unwrap(), 1);
        assert!(v.validate_strict("1").is_err());
        assert!(v.validate_strict(1.0).is_err());

        let v = Validator::<Option<Vec<f64>>>::derived();
        assert_eq!(v.validate_strict(json!(null)).unwrap(), None);
        assert_eq!(v.validate_strict(json!([1.5])).unwrap(), Some(vec![1.5]));
        assert!(v.validate_strict(json!(["1.5"])).is_err());
    }

    #[test]
    fn test_resolved_explicit_validator_gains_strict_form() {
        let upper = Validator::new(|raw| String::validate(raw).map(|s| s.to_uppercase()));
        assert_eq!(upper.validate_strict("a").unwrap(), "A");

        let resolved = Validator::resolve(Some(upper));
        assert_eq!(resolved.origin(), Origin::Explicit);
        assert_eq!(resolved.validate("a").unwrap(), "A");
        assert_eq!(resolved.validate_strict("a").unwrap(), "a");
    }

    #[test]
    fn test_validate_all_stops_at_first_failure() {
        let v = Validator::<i32>::derived();
        assert_eq!(v.validate_all(["1", "2"]).unwrap(), vec![1, 2]);

        let err = v.validate_all(["1", "x", "y"]).unwrap_err();
        assert_eq!(err, ValidationError::type_mismatch("i32", &json!("x")));
    }

    #[test]
    fn test_clone_shares_function() {
        let v = Validator::<i32>::derived();
        let cloned = v.clone();
        assert!(Arc::ptr_eq(&v.check, &cloned.check));
    }

    #[test]
    fn test_debug_hides_function() {
        let debug = format!("{:?}", Validator::<i32>::derived());
        assert!(debug.contains("Derived"));
        assert!(debug.contains("i32"));
    }

    #[test]
    fn test_validator_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Validator<i64>>();
    }

    #[cfg(feature = "tracing")]
    #[tracing_test::traced_test]
    #[test]
    fn test_rejection_is_traced() {
        let v = Validator::<u8>::derived();
        assert!(v.validate(7).is_ok());
        assert!(!logs_contain("value rejected"));

        assert!(v.validate(-7).is_err());
        assert!(logs_contain("value rejected"));
        assert!(logs_contain("out of range for u8"));
    }
}
