//! Schema integration for validated containers
//!
//! Serialization frameworks see a validated container as its plain raw
//! collection: an array for sequences and sets, an object for mappings.
//! [`SchemaHook`] is what each container type offers such a framework:
//!
//! - the element validators derived from the declared element type(s);
//! - a way to construct the container from raw input, with those
//!   validators bound to it for the rest of its life;
//! - a description of its [`Shape`].
//!
//! [`ContainerSchema`] packages that into a descriptor, adding the
//! serialization direction. The serde `Serialize`/`Deserialize`
//! implementations route through the same descriptor, so a container
//! embedded as a struct field keeps validating after deserialization.
//!
//! # Example
//!
//! ```
//! use weir::{SchemaHook, Shape, ValidatedMap};
//! use serde_json::json;
//!
//! let schema = ValidatedMap::<i64, Vec<f64>>::container_schema();
//! assert_eq!(schema.shape(), Shape::Mapping { key: "i64", value: "array" });
//!
//! let mut scores = schema.construct(json!({"1": ["7.5"]})).unwrap();
//! assert_eq!(scores[&1], vec![7.5]);
//!
//! // The constructed container keeps its validators
//! assert!(scores.insert("two", vec![1.0]).is_err());
//!
//! assert_eq!(schema.serialize(&scores).unwrap(), json!({"1": [7.5]}));
//! ```

mod serde_impl;

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::error::ValidationResult;

/// What kind of container a schema describes, with its element types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// An object from keys to values
    Mapping {
        /// Description of the key type
        key: &'static str,
        /// Description of the value type
        value: &'static str,
    },
    /// An ordered array
    Sequence {
        /// Description of the item type
        item: &'static str,
    },
    /// An array without duplicates or order
    Set {
        /// Description of the item type
        item: &'static str,
    },
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Mapping { key, value } => write!(f, "mapping of {} to {}", key, value),
            Shape::Sequence { item } => write!(f, "sequence of {}", item),
            Shape::Set { item } => write!(f, "set of {}", item),
        }
    }
}

/// Capability a container type offers to schema/serialization frameworks.
pub trait SchemaHook: Sized {
    /// The element validators of this container type
    type Validators: Clone + Send + Sync + 'static;

    /// Validators derived from the declared element type(s).
    fn derive_validators() -> Self::Validators;

    /// Build a container from raw input with `validators` bound to it.
    ///
    /// Fails if the raw value has the wrong outer shape or any element is
    /// rejected; no container is produced in that case.
    fn construct(raw: Value, validators: &Self::Validators) -> ValidationResult<Self>;

    /// The container kind and element type descriptions
    fn shape() -> Shape;

    /// The descriptor over the derived validators.
    fn container_schema() -> ContainerSchema<Self> {
        ContainerSchema::with_validators(Self::derive_validators())
    }
}

/// A bidirectional description of a validated container type.
///
/// Holds the element validators once; every container it constructs
/// shares them.
pub struct ContainerSchema<C: SchemaHook> {
    validators: C::Validators,
}

impl<C: SchemaHook> ContainerSchema<C> {
    /// A descriptor over explicit validators.
    ///
    /// ```
    /// use weir::{ContainerSchema, Validate, ValidatedVec, Validator};
    /// use serde_json::json;
    ///
    /// let clamp = Validator::new(|raw| u8::validate(raw).map(|n| n.min(10)));
    /// let schema = ContainerSchema::<ValidatedVec<u8>>::with_validators(clamp);
    ///
    /// let mut v = schema.construct(json!([3, 30])).unwrap();
    /// v.push(99).unwrap();
    /// assert_eq!(v, [3, 10, 10]);
    /// ```
    pub fn with_validators(validators: C::Validators) -> Self {
        Self { validators }
    }

    /// The element validators
    pub fn validators(&self) -> &C::Validators {
        &self.validators
    }

    /// The container kind and element type descriptions
    pub fn shape(&self) -> Shape {
        C::shape()
    }

    /// Validate raw input into a container.
    pub fn construct(&self, raw: Value) -> ValidationResult<C> {
        #[cfg(feature = "tracing")]
        tracing::trace!(shape = %C::shape(), "constructing validated container");
        C::construct(raw, &self.validators)
    }

    /// The construction direction as a standalone function.
    pub fn constructor(&self) -> impl Fn(Value) -> ValidationResult<C> + Send + Sync + 'static
    where
        C: 'static,
    {
        let validators = self.validators.clone();
        move |raw| C::construct(raw, &validators)
    }
}

impl<C: SchemaHook + Serialize> ContainerSchema<C> {
    /// Convert a container back to its plain raw form.
    pub fn serialize(&self, container: &C) -> Result<Value, serde_json::Error> {
        serde_json::to_value(container)
    }

    /// The serialization direction as a standalone function.
    pub fn serializer(&self) -> fn(&C) -> Result<Value, serde_json::Error> {
        |container| serde_json::to_value(container)
    }
}

impl<C: SchemaHook> Clone for ContainerSchema<C> {
    fn clone(&self) -> Self {
        Self {
            validators: self.validators.clone(),
        }
    }
}

impl<C: SchemaHook> fmt::Debug for ContainerSchema<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerSchema")
            .field("shape", &C::shape())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::Validate;
    use crate::{ValidatedMap, ValidatedSet, ValidatedVec, Validator};
    use serde_json::json;

    type Loose = ValidatedMap<String>;

    #[test]
    fn test_shapes() {
        assert_eq!(
            ValidatedVec::<i32>::container_schema().shape(),
            Shape::Sequence { item: "i32" }
        );
        assert_eq!(
            ValidatedSet::<String>::container_schema().shape(),
            Shape::Set { item: "string" }
        );
        assert_eq!(
            Loose::container_schema().shape().to_string(),
            "mapping of string to any value"
        );
    }

    #[test]
    fn test_constructed_container_keeps_validating() {
        let construct = ValidatedVec::<i64>::container_schema().constructor();
        let mut v = construct(json!(["1"])).unwrap();
        v.push("2").unwrap();
        assert!(v.push("three").is_err());
        assert_eq!(v, [1, 2]);
    }

    #[test]
    fn test_round_trip_coerces_then_is_stable() {
        let schema = ValidatedMap::<i64, Vec<f64>>::container_schema();
        let raw = json!({"1": ["7.5"], "2": [1, "2"]});

        let first = schema.construct(raw).unwrap();
        let serialized = schema.serialize(&first).unwrap();
        assert_eq!(serialized, json!({"1": [7.5], "2": [1.0, 2.0]}));

        let second = schema.construct(serialized.clone()).unwrap();
        assert_eq!(second, first);
        assert_eq!(schema.serializer()(&second).unwrap(), serialized);
    }

    #[test]
    fn test_unconstrained_declaration_is_usable() {
        let schema = ValidatedVec::<Value>::container_schema();
        assert!(schema.validators().is_identity());
        let v = schema.construct(json!([1, "a", null])).unwrap();
        assert_eq!(v.len(), 3);
    }

    #[test]
    fn test_wrong_outer_shape_is_rejected() {
        assert!(ValidatedVec::<i32>::container_schema()
            .construct(json!("[1]"))
            .is_err());
        assert!(ValidatedMap::<String, i32>::container_schema()
            .construct(json!([]))
            .is_err());
    }

    #[test]
    fn test_explicit_validators_descriptor() {
        let schema = ContainerSchema::<ValidatedSet<i32>>::with_validators(Validator::new(|raw| {
            i32::validate(raw).map(i32::abs)
        }));
        let s = schema.clone().construct(json!([-1, 1, "-2"])).unwrap();
        assert_eq!(s.len(), 2);
        assert!(format!("{:?}", schema).contains("Set"));
    }
}
