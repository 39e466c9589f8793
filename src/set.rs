//! A hash set that validates every element it stores
//!
//! [`ValidatedSet<T>`] owns a `HashSet<T>` and a [`Validator<T>`]. Insertion
//! validates the candidate first, so two raw values that coerce to the same
//! element (`"1"` and `1` for an integer set) collapse into one. Removal
//! never validates.
//!
//! # Example
//!
//! ```
//! use weir::ValidatedSet;
//!
//! let mut tags = ValidatedSet::<u32>::new();
//! tags.insert("1").unwrap();
//! tags.insert(1).unwrap();
//! tags.insert("2").unwrap();
//! assert_eq!(tags.len(), 2);
//! assert!(tags.contains(&1) && tags.contains(&2));
//! ```

use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::ops::Deref;

use serde_json::Value;

use crate::error::ValidationResult;
use crate::schema::{ContainerSchema, SchemaHook, Shape};
use crate::validate::{self, Validate};
use crate::validator::Validator;

/// An unordered set whose elements have all passed its validator.
pub struct ValidatedSet<T> {
    items: HashSet<T>,
    validator: Validator<T>,
}

impl<T: Validate + Eq + Hash + 'static> ValidatedSet<T> {
    /// Create an empty set validating with `T`'s derived validator.
    pub fn new() -> Self {
        Self::with_validator(Validator::derived())
    }

    /// Create a set from raw items, all validated before the set exists.
    ///
    /// `validator` overrides the derived one when given.
    pub fn from_raw<I>(items: I, validator: Option<Validator<T>>) -> ValidationResult<Self>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Self::from_raw_with(items, Validator::resolve(validator))
    }
}

impl<T: Eq + Hash> ValidatedSet<T> {
    /// Create an empty set validating with `validator`.
    pub fn with_validator(validator: Validator<T>) -> Self {
        Self {
            items: HashSet::new(),
            validator,
        }
    }

    /// Create a set from raw items using exactly `validator`.
    pub fn from_raw_with<I>(items: I, validator: Validator<T>) -> ValidationResult<Self>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let items = validator.validate_all(items)?.into_iter().collect();
        Ok(Self { items, validator })
    }

    /// The validator applied to every stored element
    pub fn validator(&self) -> &Validator<T> {
        &self.validator
    }

    /// Validate `raw` and add it.
    ///
    /// Returns whether the validated element was newly added.
    pub fn insert(&mut self, raw: impl Into<Value>) -> ValidationResult<bool> {
        let item = self.validator.validate(raw)?;
        Ok(self.items.insert(item))
    }

    /// Validate every raw item, then add them all.
    ///
    /// Nothing is added unless every item passes.
    pub fn extend<I>(&mut self, raws: I) -> ValidationResult<()>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let batch = self.validator.validate_all(raws)?;
        self.items.extend(batch);
        Ok(())
    }

    /// Discard `value` if present, returning whether it was.
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.items.remove(value)
    }

    /// Remove and return the stored element equal to `value`
    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.items.take(value)
    }

    /// Keep only the elements matching `keep`
    pub fn retain<F: FnMut(&T) -> bool>(&mut self, keep: F) {
        self.items.retain(keep);
    }

    /// Remove every element
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Consume the container, returning the plain set
    pub fn into_inner(self) -> HashSet<T> {
        self.items
    }
}

impl<T: Validate + Eq + Hash + 'static> Default for ValidatedSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for ValidatedSet<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            validator: self.validator.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ValidatedSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ValidatedSet").field(&self.items).finish()
    }
}

impl<T> Deref for ValidatedSet<T> {
    type Target = HashSet<T>;

    fn deref(&self) -> &HashSet<T> {
        &self.items
    }
}

impl<T: Eq + Hash> PartialEq for ValidatedSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T: Eq + Hash> Eq for ValidatedSet<T> {}

impl<T: Eq + Hash> PartialEq<HashSet<T>> for ValidatedSet<T> {
    fn eq(&self, other: &HashSet<T>) -> bool {
        &self.items == other
    }
}

impl<T> IntoIterator for ValidatedSet<T> {
    type Item = T;
    type IntoIter = std::collections::hash_set::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a ValidatedSet<T> {
    type Item = &'a T;
    type IntoIter = std::collections::hash_set::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: Validate + Eq + Hash + 'static> Validate for ValidatedSet<T> {
    fn validate(raw: Value) -> ValidationResult<Self> {
        Self::construct(raw, &Self::derive_validators())
    }

    fn expected() -> &'static str {
        "array"
    }
}

impl<T: Validate + Eq + Hash + 'static> SchemaHook for ValidatedSet<T> {
    type Validators = Validator<T>;

    fn derive_validators() -> Self::Validators {
        Validator::derived()
    }

    fn construct(raw: Value, validators: &Self::Validators) -> ValidationResult<Self> {
        let items = validate::array(raw, Self::expected())?;
        Self::from_raw_with(items, validators.clone())
    }

    fn shape() -> Shape {
        Shape::Set { item: T::expected() }
    }
}

impl<T: Validate + Eq + Hash + 'static> ValidatedSet<T> {
    /// The schema descriptor for this container type
    pub fn schema() -> ContainerSchema<Self> {
        Self::container_schema()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::{assert_rejected, assert_unchanged};
    use serde_json::json;

    #[test]
    fn test_insert_coerces() {
        let mut s = ValidatedSet::<i64>::new();
        assert!(s.insert("1").unwrap());
        assert!(s.insert("2").unwrap());
        assert!(s.contains(&1));
        assert!(s.contains(&2));
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn test_equivalent_raw_values_collapse() {
        let mut s = ValidatedSet::<i64>::new();
        assert!(s.insert("1").unwrap());
        assert!(!s.insert(1).unwrap());
        assert!(!s.insert(" 1 ").unwrap());
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn test_insert_rejects_without_mutating() {
        let mut s = ValidatedSet::<i64>::from_raw([1, 2], None).unwrap();
        assert_unchanged!(s, s.insert("x"));
    }

    #[test]
    fn test_extend_is_all_or_nothing() {
        let mut s = ValidatedSet::<String>::new();
        assert_unchanged!(s, s.extend([json!("a"), json!(1)]));
        s.extend(["a", "b"]).unwrap();
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn test_remove_never_validates() {
        let mut s = ValidatedSet::with_validator(Validator::new(|raw| {
            let n = i32::validate(raw)?;
            if n > 0 {
                Ok(n)
            } else {
                Err(ValidationError::custom("must be positive"))
            }
        }));
        s.insert(3).unwrap();
        assert_rejected!(s.insert(-3));

        // Removing a value the validator would reject is not an error
        assert!(!s.remove(&-3));
        assert!(s.remove(&3));
        assert!(!s.remove(&3));
        assert!(s.is_empty());
    }

    #[test]
    fn test_take_and_retain() {
        let mut s = ValidatedSet::<i32>::from_raw([1, 2, 3, 4], None).unwrap();
        assert_eq!(s.take(&1), Some(1));
        s.retain(|n| n % 2 == 0);
        assert_eq!(s, HashSet::from([2, 4]));
    }

    #[test]
    fn test_equality_is_content_only() {
        let a = ValidatedSet::<i32>::from_raw(["3", "1", "2"], None).unwrap();
        let b = ValidatedSet::<i32>::from_raw([1, 2, 3], None).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, HashSet::from([1, 2, 3]));
    }

    #[test]
    fn test_from_raw_aborts_on_failure() {
        assert!(ValidatedSet::<u8>::from_raw([1, 2, 256], None).is_err());
    }

    #[test]
    fn test_iteration_visits_every_element() {
        let s = ValidatedSet::<i32>::from_raw([1, 2, 3], None).unwrap();
        let mut seen: Vec<i32> = s.iter().copied().collect();
        seen.sort();
        assert_eq!(seen, vec![1, 2, 3]);

        let mut owned: Vec<i32> = s.into_iter().collect();
        owned.sort();
        assert_eq!(owned, vec![1, 2, 3]);
    }

    #[test]
    fn test_construct_requires_array() {
        let schema = ValidatedSet::<i32>::schema();
        assert!(schema.construct(json!("1")).is_err());
        assert_eq!(schema.construct(json!([1, "1"])).unwrap().len(), 1);
    }
}
