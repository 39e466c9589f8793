//! An insertion-ordered map that validates every key and value it stores
//!
//! [`ValidatedMap<K, V>`] owns an [`IndexMap`] plus one validator for keys
//! and one for values. Assignment always validates the key and then the
//! value, including when overwriting an existing key.
//!
//! The value type defaults to [`Value`], the unconstrained type, so a map
//! declared with a single type argument constrains only its keys.
//!
//! # Lookups
//!
//! Typed reads go through `Deref` to the inner `IndexMap` and never
//! validate. Lookups by *raw* key ([`lookup`](ValidatedMap::lookup),
//! [`contains`](ValidatedMap::contains), [`delete`](ValidatedMap::delete))
//! follow the map's [`LookupMode`]:
//!
//! - [`LookupMode::Raw`] (default): the raw key must already have the exact
//!   shape of `K`; nothing is coerced. The conversion is the key
//!   validator's [strict form](Validator::validate_strict).
//! - [`LookupMode::Validated`]: the raw key is run through the key
//!   validator first, so `"1"` finds the key `1`.
//!
//! A raw key that cannot become a `K` is simply not present. Lookups and
//! deletions never fail with a validation error.
//!
//! # Example
//!
//! ```
//! use weir::{LookupMode, ValidatedMap};
//!
//! let mut scores = ValidatedMap::<u32, Vec<f64>>::new();
//! scores.insert("1", vec!["7.5"]).unwrap();
//! assert_eq!(scores[&1], vec![7.5]);
//!
//! assert_eq!(scores.lookup("1"), None);
//! let scores = scores.with_lookup_mode(LookupMode::Validated);
//! assert_eq!(scores.lookup("1"), Some(&vec![7.5]));
//! ```

mod default_map;

pub use default_map::{DefaultFactory, ValidatedDefaultMap};

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::ops::Deref;

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::ValidationResult;
use crate::schema::{ContainerSchema, SchemaHook, Shape};
use crate::validate::{self, Validate};
use crate::validator::Validator;

/// How lookups by raw key treat the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LookupMode {
    /// Use the raw key as-is
    #[default]
    Raw,
    /// Run the raw key through the key validator first
    Validated,
}

/// An insertion-ordered map whose keys and values have all passed its
/// validators.
pub struct ValidatedMap<K, V = Value> {
    entries: IndexMap<K, V>,
    key_validator: Validator<K>,
    value_validator: Validator<V>,
    lookup: LookupMode,
}

impl<K, V> ValidatedMap<K, V>
where
    K: Validate + Eq + Hash + 'static,
    V: Validate + 'static,
{
    /// Create an empty map validating with the derived validators.
    pub fn new() -> Self {
        Self::with_validators(Validator::derived(), Validator::derived())
    }

    /// Create a map from raw key/value pairs.
    ///
    /// Explicit validators override the derived ones. Pairs are validated
    /// in input order, key before value; the first failure aborts
    /// construction. Keyword-style construction is a list of `&str` keys.
    ///
    /// # Example
    ///
    /// ```
    /// use weir::ValidatedMap;
    ///
    /// let limits = ValidatedMap::<String, u16>::from_raw(
    ///     [("connections", "100"), ("timeout", "30")],
    ///     None,
    ///     None,
    /// )
    /// .unwrap();
    /// assert_eq!(limits["timeout"], 30);
    /// ```
    pub fn from_raw<I, RK, RV>(
        pairs: I,
        key_validator: Option<Validator<K>>,
        value_validator: Option<Validator<V>>,
    ) -> ValidationResult<Self>
    where
        I: IntoIterator<Item = (RK, RV)>,
        RK: Into<Value>,
        RV: Into<Value>,
    {
        Self::from_raw_with(
            pairs,
            Validator::resolve(key_validator),
            Validator::resolve(value_validator),
        )
    }
}

impl<K: Eq + Hash, V> ValidatedMap<K, V> {
    /// Create an empty map with exactly these validators.
    pub fn with_validators(key_validator: Validator<K>, value_validator: Validator<V>) -> Self {
        Self {
            entries: IndexMap::new(),
            key_validator,
            value_validator,
            lookup: LookupMode::default(),
        }
    }

    /// Create a map from raw pairs with exactly these validators.
    pub fn from_raw_with<I, RK, RV>(
        pairs: I,
        key_validator: Validator<K>,
        value_validator: Validator<V>,
    ) -> ValidationResult<Self>
    where
        I: IntoIterator<Item = (RK, RV)>,
        RK: Into<Value>,
        RV: Into<Value>,
    {
        let mut map = Self::with_validators(key_validator, value_validator);
        let batch = map.validate_pairs(pairs)?;
        map.entries.extend(batch);
        Ok(map)
    }

    /// Switch how lookups by raw key are performed.
    pub fn with_lookup_mode(mut self, mode: LookupMode) -> Self {
        self.lookup = mode;
        self
    }

    /// How lookups by raw key are performed
    pub fn lookup_mode(&self) -> LookupMode {
        self.lookup
    }

    /// The validator applied to every stored key
    pub fn key_validator(&self) -> &Validator<K> {
        &self.key_validator
    }

    /// The validator applied to every stored value
    pub fn value_validator(&self) -> &Validator<V> {
        &self.value_validator
    }

    fn validate_pair(&self, raw_key: Value, raw_value: Value) -> ValidationResult<(K, V)> {
        let key = self.key_validator.validate(raw_key)?;
        let value = self.value_validator.validate(raw_value)?;
        Ok((key, value))
    }

    fn validate_pairs<I, RK, RV>(&self, pairs: I) -> ValidationResult<Vec<(K, V)>>
    where
        I: IntoIterator<Item = (RK, RV)>,
        RK: Into<Value>,
        RV: Into<Value>,
    {
        pairs
            .into_iter()
            .map(|(k, v)| self.validate_pair(k.into(), v.into()))
            .collect()
    }

    /// Validate a key and value and store them.
    ///
    /// Both are validated even when the key is already present. Returns
    /// the value previously stored under the key. An overwritten key keeps
    /// its position.
    pub fn insert(
        &mut self,
        raw_key: impl Into<Value>,
        raw_value: impl Into<Value>,
    ) -> ValidationResult<Option<V>> {
        let (key, value) = self.validate_pair(raw_key.into(), raw_value.into())?;
        Ok(self.entries.insert(key, value))
    }

    /// Validate every pair, then store them all.
    ///
    /// Nothing is stored unless every pair passes.
    pub fn extend<I, RK, RV>(&mut self, pairs: I) -> ValidationResult<()>
    where
        I: IntoIterator<Item = (RK, RV)>,
        RK: Into<Value>,
        RV: Into<Value>,
    {
        let batch = self.validate_pairs(pairs)?;
        self.entries.extend(batch);
        Ok(())
    }

    /// Remove `key`, preserving the order of the remaining entries.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.shift_remove(key)
    }

    /// Keep only the entries matching `keep`
    pub fn retain<F: FnMut(&K, &V) -> bool>(&mut self, mut keep: F) {
        self.entries.retain(|k, v| keep(k, v));
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Consume the container, returning the plain map
    pub fn into_inner(self) -> IndexMap<K, V> {
        self.entries
    }
}

impl<K: Eq + Hash, V> ValidatedMap<K, V> {
    fn lookup_key(&self, raw_key: Value) -> Option<K> {
        match self.lookup {
            LookupMode::Raw => self.key_validator.validate_strict(raw_key).ok(),
            LookupMode::Validated => self.key_validator.validate(raw_key).ok(),
        }
    }

    /// Look up a value by raw key, according to the lookup mode.
    pub fn lookup(&self, raw_key: impl Into<Value>) -> Option<&V> {
        let key = self.lookup_key(raw_key.into())?;
        self.entries.get(&key)
    }

    /// Whether a raw key is present, according to the lookup mode.
    pub fn contains(&self, raw_key: impl Into<Value>) -> bool {
        self.lookup(raw_key).is_some()
    }

    /// Remove an entry by raw key, according to the lookup mode.
    pub fn delete(&mut self, raw_key: impl Into<Value>) -> Option<V> {
        let key = self.lookup_key(raw_key.into())?;
        self.entries.shift_remove(&key)
    }
}

impl<K, V> Default for ValidatedMap<K, V>
where
    K: Validate + Eq + Hash + 'static,
    V: Validate + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, V: Clone> Clone for ValidatedMap<K, V> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            key_validator: self.key_validator.clone(),
            value_validator: self.value_validator.clone(),
            lookup: self.lookup,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for ValidatedMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ValidatedMap").field(&self.entries).finish()
    }
}

impl<K, V> Deref for ValidatedMap<K, V> {
    type Target = IndexMap<K, V>;

    fn deref(&self) -> &IndexMap<K, V> {
        &self.entries
    }
}

// Content equality; order and validators are ignored
impl<K: Eq + Hash, V: PartialEq> PartialEq for ValidatedMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K: Eq + Hash, V: Eq> Eq for ValidatedMap<K, V> {}

impl<K: Eq + Hash, V: PartialEq> PartialEq<IndexMap<K, V>> for ValidatedMap<K, V> {
    fn eq(&self, other: &IndexMap<K, V>) -> bool {
        &self.entries == other
    }
}

impl<K: Eq + Hash, V: PartialEq> PartialEq<HashMap<K, V>> for ValidatedMap<K, V> {
    fn eq(&self, other: &HashMap<K, V>) -> bool {
        self.entries.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(k, v)| other.get(k).is_some_and(|o| o == v))
    }
}

impl<K, V> IntoIterator for ValidatedMap<K, V> {
    type Item = (K, V);
    type IntoIter = indexmap::map::IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, K, V> IntoIterator for &'a ValidatedMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = indexmap::map::Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// The key and value validators of a mapping.
#[derive(Debug)]
pub struct MapValidators<K, V> {
    /// Applied to every key
    pub key: Validator<K>,
    /// Applied to every value
    pub value: Validator<V>,
}

impl<K, V> Clone for MapValidators<K, V> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            value: self.value.clone(),
        }
    }
}

impl<K, V> Validate for ValidatedMap<K, V>
where
    K: Validate + Eq + Hash + 'static,
    V: Validate + 'static,
{
    fn validate(raw: Value) -> ValidationResult<Self> {
        Self::construct(raw, &Self::derive_validators())
    }

    fn expected() -> &'static str {
        "object"
    }
}

impl<K, V> SchemaHook for ValidatedMap<K, V>
where
    K: Validate + Eq + Hash + 'static,
    V: Validate + 'static,
{
    type Validators = MapValidators<K, V>;

    fn derive_validators() -> Self::Validators {
        MapValidators {
            key: Validator::derived(),
            value: Validator::derived(),
        }
    }

    fn construct(raw: Value, validators: &Self::Validators) -> ValidationResult<Self> {
        let entries = validate::object(raw, Self::expected())?;
        Self::from_raw_with(
            entries,
            validators.key.clone(),
            validators.value.clone(),
        )
    }

    fn shape() -> Shape {
        Shape::Mapping {
            key: K::expected(),
            value: V::expected(),
        }
    }
}

impl<K, V> ValidatedMap<K, V>
where
    K: Validate + Eq + Hash + 'static,
    V: Validate + 'static,
{
    /// The schema descriptor for this container type
    pub fn schema() -> ContainerSchema<Self> {
        Self::container_schema()
    }
}
