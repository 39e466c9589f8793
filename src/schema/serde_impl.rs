//! Serde support for validated containers
//!
//! Containers serialize as their plain collection, with no framing.
//! Deserialization reads the raw value first and then goes through the
//! container's [`SchemaHook`], so the result carries the validators derived
//! from its element types and keeps using them for later mutations.
//!
//! # Example
//!
//! ```
//! use serde::{Deserialize, Serialize};
//! use weir::{ValidatedMap, ValidatedVec};
//!
//! #[derive(Serialize, Deserialize, Default)]
//! struct Inventory {
//!     #[serde(default)]
//!     counts: ValidatedMap<String, u32>,
//!     #[serde(default)]
//!     history: ValidatedVec<f64>,
//! }
//!
//! let mut inv: Inventory = serde_json::from_str(r#"{"counts": {"bolts": "12"}}"#).unwrap();
//! assert_eq!(inv.counts["bolts"], 12);
//!
//! inv.history.push("0.25").unwrap();
//! assert!(inv.counts.insert("nuts", -1).is_err());
//!
//! let json = serde_json::to_string(&inv).unwrap();
//! assert_eq!(json, r#"{"counts":{"bolts":12},"history":[0.25]}"#);
//! ```

use std::hash::Hash;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::SchemaHook;
use crate::mapping::{ValidatedDefaultMap, ValidatedMap};
use crate::sequence::ValidatedVec;
use crate::set::ValidatedSet;
use crate::validate::Validate;

impl<T: Serialize> Serialize for ValidatedVec<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_slice().serialize(serializer)
    }
}

impl<T: Serialize> Serialize for ValidatedSet<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<K: Serialize, V: Serialize> Serialize for ValidatedMap<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl<K: Serialize, V: Serialize> Serialize for ValidatedDefaultMap<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

fn construct<'de, C, D>(deserializer: D) -> Result<C, D::Error>
where
    C: SchemaHook,
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    C::container_schema()
        .construct(raw)
        .map_err(serde::de::Error::custom)
}

impl<'de, T> Deserialize<'de> for ValidatedVec<T>
where
    T: Validate + 'static,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        construct(deserializer)
    }
}

impl<'de, T> Deserialize<'de> for ValidatedSet<T>
where
    T: Validate + Eq + Hash + 'static,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        construct(deserializer)
    }
}

impl<'de, K, V> Deserialize<'de> for ValidatedMap<K, V>
where
    K: Validate + Eq + Hash + 'static,
    V: Validate + 'static,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        construct(deserializer)
    }
}
