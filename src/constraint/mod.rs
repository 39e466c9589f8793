//! Element types that carry a constraint
//!
//! A container only ever checks the declared element type. To constrain the
//! elements further (positive scores, non-empty names) declare the element as
//! [`Constrained<T, C>`]: it validates as `T` first, then checks `C`, and the
//! container picks that up through the ordinary [`Validate`] derivation.
//!
//! # Example
//!
//! ```
//! use weir::constraint::{Constrained, NonEmpty, Positive};
//! use weir::{ValidatedMap, ValidationError};
//!
//! type Name = Constrained<String, NonEmpty>;
//! type Score = Constrained<i64, Positive>;
//!
//! let mut scores = ValidatedMap::<Name, Score>::new();
//! scores.insert("ada", "12").unwrap();
//!
//! let err = scores.insert("bob", 0).unwrap_err();
//! assert!(matches!(err, ValidationError::Constraint { .. }));
//!
//! assert!(scores.insert("", 3).is_err());
//! assert_eq!(scores.len(), 1);
//! ```
//!
//! # Custom constraints
//!
//! ```
//! use weir::constraint::{Constrained, Constraint};
//!
//! struct Even;
//!
//! impl Constraint<i32> for Even {
//!     fn check(value: &i32) -> Result<(), String> {
//!         if value % 2 == 0 {
//!             Ok(())
//!         } else {
//!             Err(format!("{} is odd", value))
//!         }
//!     }
//! }
//!
//! assert!(Constrained::<i32, Even>::new(4).is_ok());
//! let err = Constrained::<i32, Even>::new(3).unwrap_err();
//! assert!(err.to_string().starts_with("3 is odd"));
//! ```

mod predicates;

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ops::Deref;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::{ValidationError, ValidationResult};
use crate::validate::Validate;

pub use predicates::{InRange, MaxLength, NonEmpty, NonNegative, Positive};

/// A check applied to an already well-typed value.
pub trait Constraint<T>: Send + Sync + 'static {
    /// `Err` carries a message naming what is wrong with `value`.
    fn check(value: &T) -> Result<(), String>;

    /// Short description of what the constraint requires
    fn description() -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// A `T` that satisfied `C` when it was constructed.
///
/// Has the layout of `T`; `C` only exists at the type level.
pub struct Constrained<T, C: Constraint<T>> {
    value: T,
    _constraint: PhantomData<C>,
}

impl<T, C: Constraint<T>> Constrained<T, C> {
    /// Check `value` against `C`.
    ///
    /// ```
    /// use weir::constraint::{Constrained, InRange};
    ///
    /// type Percent = Constrained<u8, InRange<0, 100>>;
    /// assert_eq!(*Percent::new(40).unwrap(), 40);
    /// assert!(Percent::new(140).is_err());
    /// ```
    pub fn new(value: T) -> ValidationResult<Self> {
        C::check(&value).map_err(|message| ValidationError::Constraint {
            constraint: C::description(),
            message,
        })?;
        Ok(Self {
            value,
            _constraint: PhantomData,
        })
    }

    /// The inner value
    #[inline]
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Consume the wrapper, returning the inner value
    #[inline]
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T: Validate, C: Constraint<T>> Validate for Constrained<T, C> {
    fn validate(raw: Value) -> ValidationResult<Self> {
        Self::new(T::validate(raw)?)
    }

    fn validate_strict(raw: Value) -> ValidationResult<Self> {
        Self::new(T::validate_strict(raw)?)
    }

    fn expected() -> &'static str {
        T::expected()
    }
}

impl<T: fmt::Debug, C: Constraint<T>> fmt::Debug for Constrained<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constrained")
            .field("value", &self.value)
            .field("constraint", &C::description())
            .finish()
    }
}

impl<T: fmt::Display, C: Constraint<T>> fmt::Display for Constrained<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}

impl<T: Clone, C: Constraint<T>> Clone for Constrained<T, C> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            _constraint: PhantomData,
        }
    }
}

impl<T: PartialEq, C: Constraint<T>> PartialEq for Constrained<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: Eq, C: Constraint<T>> Eq for Constrained<T, C> {}

impl<T: PartialOrd, C: Constraint<T>> PartialOrd for Constrained<T, C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

impl<T: Ord, C: Constraint<T>> Ord for Constrained<T, C> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl<T: Hash, C: Constraint<T>> Hash for Constrained<T, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T, C: Constraint<T>> AsRef<T> for Constrained<T, C> {
    fn as_ref(&self) -> &T {
        &self.value
    }
}

impl<T, C: Constraint<T>> Deref for Constrained<T, C> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T: Serialize, C: Constraint<T>> Serialize for Constrained<T, C> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

impl<'de, T, C> Deserialize<'de> for Constrained<T, C>
where
    T: Deserialize<'de>,
    C: Constraint<T>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = T::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ValidatedSet, ValidatedVec};
    use serde_json::json;
    use std::collections::HashSet;

    struct Even;

    impl Constraint<i32> for Even {
        fn check(value: &i32) -> Result<(), String> {
            if value % 2 == 0 {
                Ok(())
            } else {
                Err("value must be even".to_string())
            }
        }

        fn description() -> &'static str {
            "even"
        }
    }

    type EvenI32 = Constrained<i32, Even>;

    #[test]
    fn test_new_checks_constraint() {
        assert_eq!(*EvenI32::new(4).unwrap().get(), 4);
        assert_eq!(
            EvenI32::new(3).unwrap_err(),
            ValidationError::Constraint {
                constraint: "even",
                message: "value must be even".to_string(),
            }
        );
    }

    #[test]
    fn test_validate_coerces_before_checking() {
        assert_eq!(EvenI32::validate(json!("8")).unwrap().into_inner(), 8);
        assert!(matches!(
            EvenI32::validate(json!("7")).unwrap_err(),
            ValidationError::Constraint { .. }
        ));
        assert!(matches!(
            EvenI32::validate(json!("x")).unwrap_err(),
            ValidationError::TypeMismatch { expected: "i32", .. }
        ));
    }

    #[test]
    fn test_strict_form_checks_without_coercing() {
        assert_eq!(EvenI32::validate_strict(json!(8)).unwrap().into_inner(), 8);
        assert!(EvenI32::validate_strict(json!("8")).is_err());
        assert!(matches!(
            EvenI32::validate_strict(json!(7)).unwrap_err(),
            ValidationError::Constraint { .. }
        ));
    }

    #[test]
    fn test_container_of_constrained_elements() {
        let mut v = ValidatedVec::<EvenI32>::new();
        v.push(2).unwrap();
        assert!(v.push(3).is_err());
        assert_eq!(v.len(), 1);
        assert_eq!(*v[0], 2);
    }

    #[test]
    fn test_delegating_traits() {
        let a = EvenI32::new(2).unwrap();
        let b = EvenI32::new(4).unwrap();
        assert!(a < b);
        assert_eq!(a.clone(), a);
        assert_eq!(a.to_string(), "2");
        assert_eq!(format!("{:?}", a), r#"Constrained { value: 2, constraint: "even" }"#);

        let set: HashSet<EvenI32> = [a.clone(), a, b].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_serde_checks_on_the_way_in() {
        let n: EvenI32 = serde_json::from_str("6").unwrap();
        assert_eq!(serde_json::to_string(&n).unwrap(), "6");

        let err = serde_json::from_str::<EvenI32>("5").unwrap_err();
        assert!(err.to_string().contains("value must be even"));

        // Deserialize is strict, unlike Validate
        assert!(serde_json::from_str::<EvenI32>(r#""6""#).is_err());
    }

    #[test]
    fn test_set_of_constrained_strings() {
        let s = ValidatedSet::<Constrained<String, NonEmpty>>::from_raw(["a", "b", "a"], None)
            .unwrap();
        assert_eq!(s.len(), 2);
        assert!(ValidatedSet::<Constrained<String, NonEmpty>>::from_raw(["a", ""], None).is_err());
    }
}
