//! A validated map that materializes defaults for missing keys

use std::fmt;
use std::hash::Hash;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use indexmap::map::Entry;
use serde_json::Value;

use super::ValidatedMap;
use crate::error::ValidationResult;
use crate::validate::Validate;

/// Produces the raw default for a missing key.
pub type DefaultFactory = Arc<dyn Fn() -> Value + Send + Sync>;

/// A [`ValidatedMap`] that fills in missing keys on access.
///
/// [`get_or_insert_default`](Self::get_or_insert_default) calls the factory
/// once for an absent key, validates the result like any other value, and
/// stores it. Later accesses to that key return the stored value without
/// calling the factory again. Without a factory the raw default is `null`.
///
/// Everything else is the underlying map, reachable through `Deref` and
/// `DerefMut`; its mutating methods still validate.
///
/// # Example
///
/// ```
/// use weir::ValidatedDefaultMap;
/// use serde_json::json;
///
/// let mut groups = ValidatedDefaultMap::<String, Vec<u32>>::new(|| json!([]));
/// groups.get_or_insert_default("admins").unwrap();
/// groups.insert("users", vec!["1", "2"]).unwrap();
///
/// assert_eq!(groups["admins"], Vec::<u32>::new());
/// assert_eq!(groups["users"], vec![1, 2]);
/// ```
pub struct ValidatedDefaultMap<K, V = Value> {
    map: ValidatedMap<K, V>,
    default_factory: Option<DefaultFactory>,
}

impl<K, V> ValidatedDefaultMap<K, V>
where
    K: Validate + Eq + Hash + 'static,
    V: Validate + 'static,
{
    /// Create an empty map with derived validators and a default factory.
    pub fn new<F>(default_factory: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Self::from_map(ValidatedMap::new(), Some(Arc::new(default_factory)))
    }
}

impl<K: Eq + Hash, V> ValidatedDefaultMap<K, V> {
    /// Wrap an existing map, keeping its validators and entries.
    pub fn from_map(map: ValidatedMap<K, V>, default_factory: Option<DefaultFactory>) -> Self {
        Self {
            map,
            default_factory,
        }
    }

    /// Whether missing keys get a factory-produced default
    pub fn has_default_factory(&self) -> bool {
        self.default_factory.is_some()
    }

    /// Return the value for `raw_key`, materializing the default if absent.
    ///
    /// The key is validated first. If absent, the factory runs exactly once
    /// and its result is validated before it is stored; a failure leaves the
    /// map unchanged.
    pub fn get_or_insert_default(&mut self, raw_key: impl Into<Value>) -> ValidationResult<&V> {
        let key = self.map.key_validator.validate(raw_key)?;
        match self.map.entries.entry(key) {
            Entry::Occupied(entry) => Ok(&*entry.into_mut()),
            Entry::Vacant(entry) => {
                let raw = self
                    .default_factory
                    .as_ref()
                    .map_or(Value::Null, |factory| factory());
                let value = self.map.value_validator.validate(raw)?;
                Ok(&*entry.insert(value))
            }
        }
    }

    /// Consume the container, returning the underlying map
    pub fn into_map(self) -> ValidatedMap<K, V> {
        self.map
    }
}

impl<K, V> Deref for ValidatedDefaultMap<K, V> {
    type Target = ValidatedMap<K, V>;

    fn deref(&self) -> &ValidatedMap<K, V> {
        &self.map
    }
}

impl<K, V> DerefMut for ValidatedDefaultMap<K, V> {
    fn deref_mut(&mut self) -> &mut ValidatedMap<K, V> {
        &mut self.map
    }
}

impl<K: Clone, V: Clone> Clone for ValidatedDefaultMap<K, V> {
    fn clone(&self) -> Self {
        Self {
            map: self.map.clone(),
            default_factory: self.default_factory.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for ValidatedDefaultMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ValidatedDefaultMap")
            .field(&self.map.entries)
            .finish()
    }
}

impl<K: Eq + Hash, V: PartialEq> PartialEq for ValidatedDefaultMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_unchanged;
    use crate::error::ValidationError;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_factory(calls: &Arc<AtomicUsize>) -> impl Fn() -> Value + Send + Sync + 'static {
        let calls = Arc::clone(calls);
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            json!(["0.5"])
        }
    }

    #[test]
    fn test_missing_key_materializes_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut m = ValidatedDefaultMap::<i64, Vec<f64>>::new(counting_factory(&calls));

        assert_eq!(m.get_or_insert_default("7").unwrap(), &vec![0.5]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(m.len(), 1);

        assert_eq!(m.get_or_insert_default(7).unwrap(), &vec![0.5]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn test_present_key_skips_factory() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut m = ValidatedDefaultMap::<i64, Vec<f64>>::new(counting_factory(&calls));
        m.insert(1, vec![9]).unwrap();

        assert_eq!(m.get_or_insert_default(1).unwrap(), &vec![9.0]);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_invalid_key_is_rejected_before_factory_runs() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut m = ValidatedDefaultMap::<i64, Vec<f64>>::new(counting_factory(&calls));

        assert!(m.get_or_insert_default("seven").is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(m.is_empty());
    }

    #[test]
    fn test_invalid_default_is_not_stored() {
        let mut m = ValidatedDefaultMap::<String, u8>::new(|| json!(1000));
        assert_unchanged!(m, m.get_or_insert_default("a"));
        assert!(m.is_empty());
    }

    #[test]
    fn test_without_factory_defaults_to_null() {
        let mut optional =
            ValidatedDefaultMap::<String, Option<i32>>::from_map(ValidatedMap::new(), None);
        assert!(!optional.has_default_factory());
        assert_eq!(optional.get_or_insert_default("a").unwrap(), &None);

        let mut required = ValidatedDefaultMap::<String, i32>::from_map(ValidatedMap::new(), None);
        let err = required.get_or_insert_default("a").unwrap_err();
        assert_eq!(err, ValidationError::type_mismatch("i32", &Value::Null));
    }

    #[test]
    fn test_deref_mut_keeps_validation() {
        let mut m = ValidatedDefaultMap::<String, i32>::new(|| json!(0));
        m.insert("a", "1").unwrap();
        assert!(m.insert("b", "x").is_err());
        assert_eq!(m.remove("a"), Some(1));
        assert!(m.is_empty());
    }

    #[test]
    fn test_from_map_keeps_entries_and_validators() {
        let map = ValidatedMap::<String, i32>::from_raw([("a", 1)], None, None).unwrap();
        let mut m = ValidatedDefaultMap::from_map(map, Some(Arc::new(|| json!("2"))));
        assert_eq!(m.get_or_insert_default("b").unwrap(), &2);
        assert_eq!(m.clone().into_map().len(), 2);
        assert_eq!(format!("{:?}", m), r#"ValidatedDefaultMap({"a": 1, "b": 2})"#);
    }
}
