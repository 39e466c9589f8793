//! A vector that validates every element it stores
//!
//! [`ValidatedVec<T>`] owns a plain `Vec<T>` and a [`Validator<T>`]. Every
//! operation that stores new data (push, insert, set, splice, extend) runs
//! the validator first; removals never do. Reads go through `Deref` to
//! `[T]`, so the usual slice API is available without any way to mutate
//! around the validator.
//!
//! # Example
//!
//! ```
//! use weir::ValidatedVec;
//!
//! let mut ids = ValidatedVec::<i64>::new();
//! ids.push("1").unwrap();
//! ids.push(2).unwrap();
//! assert_eq!(ids, [1, 2]);
//!
//! // Rejected values leave the vector untouched
//! assert!(ids.push("three").is_err());
//! assert_eq!(ids.len(), 2);
//! ```

use std::fmt;
use std::ops::{Deref, RangeBounds};

use serde_json::Value;

use crate::error::ValidationResult;
use crate::schema::{ContainerSchema, SchemaHook, Shape};
use crate::validate::{self, Validate};
use crate::validator::Validator;

/// An ordered sequence whose elements have all passed its validator.
pub struct ValidatedVec<T = Value> {
    items: Vec<T>,
    validator: Validator<T>,
}

impl<T: Validate + 'static> ValidatedVec<T> {
    /// Create an empty vector validating with `T`'s derived validator.
    pub fn new() -> Self {
        Self::with_validator(Validator::derived())
    }

    /// Create a vector from raw items.
    ///
    /// `validator` overrides the derived one when given. Every item is
    /// validated in order; the first failure aborts construction.
    ///
    /// # Example
    ///
    /// ```
    /// use weir::ValidatedVec;
    ///
    /// let v = ValidatedVec::<u8>::from_raw(["1", "2"], None).unwrap();
    /// assert_eq!(v, [1, 2]);
    ///
    /// assert!(ValidatedVec::<u8>::from_raw(["1", "999"], None).is_err());
    /// ```
    pub fn from_raw<I>(items: I, validator: Option<Validator<T>>) -> ValidationResult<Self>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Self::from_raw_with(items, Validator::resolve(validator))
    }
}

impl<T> ValidatedVec<T> {
    /// Create an empty vector validating with `validator`.
    pub fn with_validator(validator: Validator<T>) -> Self {
        Self {
            items: Vec::new(),
            validator,
        }
    }

    /// Create a vector from raw items using exactly `validator`.
    pub fn from_raw_with<I>(items: I, validator: Validator<T>) -> ValidationResult<Self>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let items = validator.validate_all(items)?;
        Ok(Self { items, validator })
    }

    /// The validator applied to every stored element
    pub fn validator(&self) -> &Validator<T> {
        &self.validator
    }

    /// Validate `raw` and append it.
    pub fn push(&mut self, raw: impl Into<Value>) -> ValidationResult<()> {
        let item = self.validator.validate(raw)?;
        self.items.push(item);
        Ok(())
    }

    /// Validate `raw` and insert it at `index`.
    ///
    /// Indices past the end append, matching list insertion rather than
    /// `Vec::insert`, which panics.
    pub fn insert(&mut self, index: usize, raw: impl Into<Value>) -> ValidationResult<()> {
        let item = self.validator.validate(raw)?;
        let index = index.min(self.items.len());
        self.items.insert(index, item);
        Ok(())
    }

    /// Validate `raw` and store it at `index`, returning the old element.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds, like slice indexing. The bounds
    /// check happens before validation.
    pub fn set(&mut self, index: usize, raw: impl Into<Value>) -> ValidationResult<T> {
        let len = self.items.len();
        assert!(
            index < len,
            "index out of bounds: the len is {} but the index is {}",
            len,
            index
        );
        let item = self.validator.validate(raw)?;
        Ok(std::mem::replace(&mut self.items[index], item))
    }

    /// Replace `range` with the validated `raws`, returning the removed
    /// elements.
    ///
    /// The whole replacement batch is validated before anything is touched:
    /// if any element fails, the vector is unchanged.
    ///
    /// # Panics
    ///
    /// Panics if the range is out of bounds, like `Vec::splice`.
    ///
    /// # Example
    ///
    /// ```
    /// use weir::ValidatedVec;
    ///
    /// let mut v = ValidatedVec::<i32>::from_raw([1, 2, 3], None).unwrap();
    /// let removed = v.splice(1..2, ["20", "21"]).unwrap();
    /// assert_eq!(removed, vec![2]);
    /// assert_eq!(v, [1, 20, 21, 3]);
    ///
    /// assert!(v.splice(.., ["0", "bad"]).is_err());
    /// assert_eq!(v, [1, 20, 21, 3]);
    /// ```
    pub fn splice<R, I>(&mut self, range: R, raws: I) -> ValidationResult<Vec<T>>
    where
        R: RangeBounds<usize>,
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let replacement = self.validator.validate_all(raws)?;
        Ok(self.items.splice(range, replacement).collect())
    }

    /// Validate every raw item, then append them all.
    ///
    /// Nothing is appended unless every item passes.
    pub fn extend<I>(&mut self, raws: I) -> ValidationResult<()>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let batch = self.validator.validate_all(raws)?;
        self.items.extend(batch);
        Ok(())
    }

    /// Remove and return the element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds, like `Vec::remove`.
    pub fn remove(&mut self, index: usize) -> T {
        self.items.remove(index)
    }

    /// Remove and return the last element
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    /// Keep only the first `len` elements
    pub fn truncate(&mut self, len: usize) {
        self.items.truncate(len);
    }

    /// Remove every element
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Remove `range` and return the removed elements.
    ///
    /// # Panics
    ///
    /// Panics if the range is out of bounds, like `Vec::drain`.
    pub fn drain<R: RangeBounds<usize>>(&mut self, range: R) -> Vec<T> {
        self.items.drain(range).collect()
    }

    /// Keep only the elements matching `keep`
    pub fn retain<F: FnMut(&T) -> bool>(&mut self, keep: F) {
        self.items.retain(keep);
    }

    /// The stored elements as a slice
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Consume the container, returning the plain vector
    pub fn into_inner(self) -> Vec<T> {
        self.items
    }
}

impl<T: Validate + 'static> Default for ValidatedVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for ValidatedVec<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            validator: self.validator.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ValidatedVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ValidatedVec").field(&self.items).finish()
    }
}

impl<T> Deref for ValidatedVec<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<T> AsRef<[T]> for ValidatedVec<T> {
    fn as_ref(&self) -> &[T] {
        &self.items
    }
}

// Equality ignores the validator
impl<T: PartialEq> PartialEq for ValidatedVec<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T: Eq> Eq for ValidatedVec<T> {}

impl<T: PartialEq> PartialEq<Vec<T>> for ValidatedVec<T> {
    fn eq(&self, other: &Vec<T>) -> bool {
        &self.items == other
    }
}

impl<T: PartialEq> PartialEq<[T]> for ValidatedVec<T> {
    fn eq(&self, other: &[T]) -> bool {
        self.items.as_slice() == other
    }
}

impl<T: PartialEq, const N: usize> PartialEq<[T; N]> for ValidatedVec<T> {
    fn eq(&self, other: &[T; N]) -> bool {
        self.items.as_slice() == other.as_slice()
    }
}

impl<T> IntoIterator for ValidatedVec<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a ValidatedVec<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: Validate + 'static> Validate for ValidatedVec<T> {
    fn validate(raw: Value) -> ValidationResult<Self> {
        Self::construct(raw, &Self::derive_validators())
    }

    fn expected() -> &'static str {
        "array"
    }
}

impl<T: Validate + 'static> SchemaHook for ValidatedVec<T> {
    type Validators = Validator<T>;

    fn derive_validators() -> Self::Validators {
        Validator::derived()
    }

    fn construct(raw: Value, validators: &Self::Validators) -> ValidationResult<Self> {
        let items = validate::array(raw, Self::expected())?;
        Self::from_raw_with(items, validators.clone())
    }

    fn shape() -> Shape {
        Shape::Sequence { item: T::expected() }
    }
}

impl<T: Validate + 'static> ValidatedVec<T> {
    /// The schema descriptor for this container type
    pub fn schema() -> ContainerSchema<Self> {
        Self::container_schema()
    }
}
