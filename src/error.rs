//! The single failure kind raised by validators
//!
//! Every validated container surfaces exactly one error type:
//! [`ValidationError`]. Validators produce it, containers propagate it
//! unmodified, and nothing in this crate catches or retries it.
//!
//! Nested element types (a `Vec<f64>` inside a map, say) report *where* a
//! value failed by wrapping the inner error in [`ValidationError::At`]. The
//! full location is available through [`ValidationError::location`].
//!
//! # Example
//!
//! ```
//! use weir::{Validate, ValidationError};
//! use serde_json::json;
//!
//! let err = Vec::<i64>::validate(json!([1, "two"])).unwrap_err();
//! assert_eq!(err.location(), vec![weir::PathSegment::Index(1)]);
//! assert!(matches!(err.root(), ValidationError::TypeMismatch { .. }));
//! ```

use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// A value could not be accepted as the declared element type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The raw value has the wrong shape for the declared type.
    #[error("expected {expected}, got {found}")]
    TypeMismatch {
        /// Human-readable name of the declared type
        expected: &'static str,
        /// Short description of the rejected raw value
        found: String,
    },

    /// A numeric value does not fit the declared numeric type.
    #[error("{value} is out of range for {target}")]
    OutOfRange {
        /// The rejected value, as written
        value: String,
        /// The declared numeric type
        target: &'static str,
    },

    /// The value has the right shape but violates a constraint.
    #[error("{message} ({constraint})")]
    Constraint {
        /// Description of the violated constraint
        constraint: &'static str,
        /// What went wrong
        message: String,
    },

    /// Raised by a caller-supplied validator.
    #[error("{0}")]
    Custom(String),

    /// A failure inside a nested element.
    #[error("at {location}: {source}")]
    At {
        /// Where inside the parent value the failure happened
        location: PathSegment,
        /// The failure itself
        source: Box<ValidationError>,
    },
}

impl ValidationError {
    /// Create an error from a caller-supplied message.
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }

    /// Create a shape mismatch error describing the rejected value.
    pub fn type_mismatch(expected: &'static str, found: &Value) -> Self {
        Self::TypeMismatch {
            expected,
            found: describe(found),
        }
    }

    /// Prefix this error with the location it occurred at.
    ///
    /// ```
    /// use weir::{PathSegment, ValidationError};
    ///
    /// let err = ValidationError::custom("bad").at(PathSegment::Index(3));
    /// assert_eq!(err.to_string(), "at [3]: bad");
    /// ```
    pub fn at(self, location: PathSegment) -> Self {
        Self::At {
            location,
            source: Box::new(self),
        }
    }

    /// The path from the outermost value down to the failing element.
    pub fn location(&self) -> Vec<PathSegment> {
        let mut path = Vec::new();
        let mut current = self;
        while let Self::At { location, source } = current {
            path.push(location.clone());
            current = source;
        }
        path
    }

    /// The innermost error, with all location wrappers removed.
    pub fn root(&self) -> &ValidationError {
        let mut current = self;
        while let Self::At { source, .. } = current {
            current = source;
        }
        current
    }
}

/// One step into a nested value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Position within an array
    Index(usize),
    /// Key within an object
    Key(String),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Index(i) => write!(f, "[{}]", i),
            PathSegment::Key(k) => write!(f, "{:?}", k),
        }
    }
}

// Keep messages short for large inputs
fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {}", b),
        Value::Number(n) => format!("number {}", n),
        Value::String(s) if s.chars().count() > 32 => {
            let head: String = s.chars().take(32).collect();
            format!("string {:?}...", head)
        }
        Value::String(s) => format!("string {:?}", s),
        Value::Array(items) => format!("array of {} items", items.len()),
        Value::Object(map) => format!("object with {} keys", map.len()),
    }
}
