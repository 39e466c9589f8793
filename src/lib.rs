//! # Weir
//!
//! Collections that validate what goes in.
//!
//! A weir lets water through but holds back what should not pass. The
//! containers in this crate do the same for data: [`ValidatedMap`],
//! [`ValidatedVec`] and [`ValidatedSet`] behave like their standard
//! counterparts, except that every operation that stores a new key, value or
//! element first runs it through a [`Validator`] resolved from the declared
//! element type. Accepted values are stored in validated form (`"1"` becomes
//! `1` in a sequence of `i64`); rejected ones raise a [`ValidationError`] and
//! leave the container untouched.
//!
//! ## Quick Example
//!
//! ```rust
//! use weir::{ValidatedMap, ValidatedVec};
//!
//! let mut scores = ValidatedMap::<i64, Vec<f64>>::new();
//! scores.insert("1", vec!["7.5"]).unwrap();
//! scores.insert(2, vec![7.5, 10.0]).unwrap();
//! assert_eq!(scores[&1], vec![7.5]);
//!
//! let err = scores.insert("three", vec![1.0]).unwrap_err();
//! println!("rejected: {}", err);
//! assert_eq!(scores.len(), 2);
//!
//! let mut ids = ValidatedVec::<u32>::new();
//! ids.extend(["1", "2"]).unwrap();
//! assert!(ids.push(-1).is_err());
//! assert_eq!(ids, [1, 2]);
//! ```
//!
//! ## Serialization
//!
//! Containers serialize as the plain collection and deserialize through
//! their [`SchemaHook`], so a container embedded in a serde model keeps
//! validating after it has been loaded. See the [`schema`] module.
//!
//! ## Features
//!
//! - `tracing`: emit `tracing` events for rejected values and schema
//!   construction.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod constraint;
pub mod error;
pub mod mapping;
pub mod schema;
pub mod sequence;
pub mod set;
pub mod testing;
pub mod validate;
pub mod validator;

// Re-exports
pub use constraint::{Constrained, Constraint};
pub use error::{PathSegment, ValidationError, ValidationResult};
pub use mapping::{DefaultFactory, LookupMode, MapValidators, ValidatedDefaultMap, ValidatedMap};
pub use schema::{ContainerSchema, SchemaHook, Shape};
pub use sequence::ValidatedVec;
pub use set::ValidatedSet;
pub use validate::Validate;
pub use validator::{Origin, Validator};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::constraint::{Constrained, Constraint};
    pub use crate::error::{ValidationError, ValidationResult};
    pub use crate::mapping::{LookupMode, ValidatedDefaultMap, ValidatedMap};
    pub use crate::schema::SchemaHook;
    pub use crate::sequence::ValidatedVec;
    pub use crate::set::ValidatedSet;
    pub use crate::validate::Validate;
    pub use crate::validator::Validator;
}
