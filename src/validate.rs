//! The element-type validation capability
//!
//! A type can live inside a validated container when it knows how to turn a
//! raw [`Value`] into itself. That knowledge is the [`Validate`] trait: the
//! container never inspects types at runtime, it simply asks `T::validate`.
//!
//! Implementations for std types follow a lax coercion model, which is what
//! makes values read back from text formats usable:
//!
//! | Declared type            | Accepts                                               |
//! |--------------------------|-------------------------------------------------------|
//! | integers                 | integers, integral floats, numeric strings            |
//! | `f32`, `f64`             | numbers, numeric strings (finite only)                |
//! | `bool`                   | booleans, `"true"/"false"/"yes"/"no"/...`, `0`/`1`    |
//! | `String`                 | strings                                               |
//! | `Option<T>`              | `null`, or anything `T` accepts                       |
//! | `Vec<T>`, sets           | arrays whose items `T` accepts                        |
//! | maps                     | objects; keys validated as `K` from their string form |
//! | `Value`                  | anything, unchanged                                   |
//!
//! Each type also has a strict form, [`Validate::validate_strict`], which
//! accepts only values that already have the type's exact shape: `1` for an
//! integer but not `"1"` or `1.0`. Maps use it for lookups by raw key. For
//! serde's rules instead, build a validator with
//! [`Validator::deserialize`](crate::Validator::deserialize).
//!
//! # Example
//!
//! ```
//! use weir::Validate;
//! use serde_json::json;
//!
//! assert_eq!(i64::validate(json!("42")).unwrap(), 42);
//! assert_eq!(Vec::<f64>::validate(json!(["7.5", 10])).unwrap(), vec![7.5, 10.0]);
//! assert!(u8::validate(json!(300)).is_err());
//! ```

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::hash::Hash;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::{PathSegment, ValidationError, ValidationResult};

/// A type that can be produced from a raw value, or rejected.
///
/// # Example
///
/// ```
/// use weir::{Validate, ValidationError, ValidationResult};
/// use serde_json::Value;
///
/// #[derive(Debug, PartialEq)]
/// struct Celsius(f64);
///
/// impl Validate for Celsius {
///     fn validate(raw: Value) -> ValidationResult<Self> {
///         let degrees = f64::validate(raw)?;
///         if degrees < -273.15 {
///             return Err(ValidationError::custom("below absolute zero"));
///         }
///         Ok(Celsius(degrees))
///     }
/// }
///
/// assert_eq!(Celsius::validate(Value::from("21.5")).unwrap(), Celsius(21.5));
/// ```
pub trait Validate: Sized {
    /// `true` only for types that accept every value unchanged.
    ///
    /// Validators derived from such types report
    /// [`Origin::Identity`](crate::Origin::Identity).
    const UNCONSTRAINED: bool = false;

    /// Validate and coerce a raw value.
    fn validate(raw: Value) -> ValidationResult<Self>;

    /// Convert a raw value that must already have this type's exact shape.
    ///
    /// Defaults to [`validate`](Validate::validate), for types whose
    /// accepted values carry no coercion.
    fn validate_strict(raw: Value) -> ValidationResult<Self> {
        Self::validate(raw)
    }

    /// Human-readable name of what this type accepts
    fn expected() -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl Validate for Value {
    const UNCONSTRAINED: bool = true;

    fn validate(raw: Value) -> ValidationResult<Self> {
        Ok(raw)
    }

    fn expected() -> &'static str {
        "any value"
    }
}

// Widest integer form of a raw value; callers narrow it.
fn integer(raw: &Value, expected: &'static str) -> ValidationResult<i128> {
    match raw {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i128::from(i))
            } else if let Some(u) = n.as_u64() {
                Ok(i128::from(u))
            } else {
                match n.as_f64() {
                    Some(f) if f.is_finite() && f.fract() == 0.0 => {
                        // i128 tops out near 1.7e38
                        if f.abs() < 1e38 {
                            Ok(f as i128)
                        } else {
                            Err(ValidationError::OutOfRange {
                                value: n.to_string(),
                                target: expected,
                            })
                        }
                    }
                    _ => Err(ValidationError::type_mismatch(expected, raw)),
                }
            }
        }
        Value::String(s) => s
            .trim()
            .parse::<i128>()
            .map_err(|_| ValidationError::type_mismatch(expected, raw)),
        _ => Err(ValidationError::type_mismatch(expected, raw)),
    }
}

fn exact_integer(raw: &Value, expected: &'static str) -> ValidationResult<i128> {
    match raw {
        Value::Number(n) => n
            .as_i64()
            .map(i128::from)
            .or_else(|| n.as_u64().map(i128::from))
            .ok_or_else(|| ValidationError::type_mismatch(expected, raw)),
        _ => Err(ValidationError::type_mismatch(expected, raw)),
    }
}

fn narrow<T: TryFrom<i128>>(wide: i128, expected: &'static str) -> ValidationResult<T> {
    T::try_from(wide).map_err(|_| ValidationError::OutOfRange {
        value: wide.to_string(),
        target: expected,
    })
}

macro_rules! impl_validate_integer {
    ($($ty:ty),+) => {
        $(
            impl Validate for $ty {
                fn validate(raw: Value) -> ValidationResult<Self> {
                    narrow(integer(&raw, Self::expected())?, Self::expected())
                }

                fn validate_strict(raw: Value) -> ValidationResult<Self> {
                    narrow(exact_integer(&raw, Self::expected())?, Self::expected())
                }

                fn expected() -> &'static str {
                    stringify!($ty)
                }
            }
        )+
    };
}

impl_validate_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

fn float(raw: &Value, expected: &'static str) -> ValidationResult<f64> {
    let parsed = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(f) if f.is_finite() => Ok(f),
        _ => Err(ValidationError::type_mismatch(expected, raw)),
    }
}

fn exact_float(raw: &Value, expected: &'static str) -> ValidationResult<f64> {
    match raw {
        Value::Number(_) => float(raw, expected),
        _ => Err(ValidationError::type_mismatch(expected, raw)),
    }
}

fn narrow_float(wide: f64, expected: &'static str) -> ValidationResult<f32> {
    let narrow = wide as f32;
    if narrow.is_finite() {
        Ok(narrow)
    } else {
        Err(ValidationError::OutOfRange {
            value: wide.to_string(),
            target: expected,
        })
    }
}

impl Validate for f64 {
    fn validate(raw: Value) -> ValidationResult<Self> {
        float(&raw, Self::expected())
    }

    fn validate_strict(raw: Value) -> ValidationResult<Self> {
        exact_float(&raw, Self::expected())
    }

    fn expected() -> &'static str {
        "f64"
    }
}

impl Validate for f32 {
    fn validate(raw: Value) -> ValidationResult<Self> {
        narrow_float(float(&raw, Self::expected())?, Self::expected())
    }

    fn validate_strict(raw: Value) -> ValidationResult<Self> {
        narrow_float(exact_float(&raw, Self::expected())?, Self::expected())
    }

    fn expected() -> &'static str {
        "f32"
    }
}

impl Validate for bool {
    fn validate(raw: Value) -> ValidationResult<Self> {
        let parsed = match &raw {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => match n.as_u64() {
                Some(0) => Some(false),
                Some(1) => Some(true),
                _ => None,
            },
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "t" | "yes" | "y" | "on" | "1" => Some(true),
                "false" | "f" | "no" | "n" | "off" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        };
        parsed.ok_or_else(|| ValidationError::type_mismatch(Self::expected(), &raw))
    }

    fn validate_strict(raw: Value) -> ValidationResult<Self> {
        match raw {
            Value::Bool(b) => Ok(b),
            other => Err(ValidationError::type_mismatch(Self::expected(), &other)),
        }
    }

    fn expected() -> &'static str {
        "bool"
    }
}

impl Validate for String {
    fn validate(raw: Value) -> ValidationResult<Self> {
        match raw {
            Value::String(s) => Ok(s),
            other => Err(ValidationError::type_mismatch(Self::expected(), &other)),
        }
    }

    fn expected() -> &'static str {
        "string"
    }
}

impl<T: Validate> Validate for Option<T> {
    fn validate(raw: Value) -> ValidationResult<Self> {
        match raw {
            Value::Null => Ok(None),
            other => T::validate(other).map(Some),
        }
    }

    fn validate_strict(raw: Value) -> ValidationResult<Self> {
        match raw {
            Value::Null => Ok(None),
            other => T::validate_strict(other).map(Some),
        }
    }
}

/// Split a raw array into its items, or reject the value.
pub(crate) fn array(raw: Value, expected: &'static str) -> ValidationResult<Vec<Value>> {
    match raw {
        Value::Array(items) => Ok(items),
        other => Err(ValidationError::type_mismatch(expected, &other)),
    }
}

/// Split a raw object into its entries, or reject the value.
pub(crate) fn object(raw: Value, expected: &'static str) -> ValidationResult<Map<String, Value>> {
    match raw {
        Value::Object(entries) => Ok(entries),
        other => Err(ValidationError::type_mismatch(expected, &other)),
    }
}

fn located_items<T>(
    raw: Value,
    expected: &'static str,
    check: fn(Value) -> ValidationResult<T>,
) -> ValidationResult<Vec<T>> {
    array(raw, expected)?
        .into_iter()
        .enumerate()
        .map(|(i, item)| check(item).map_err(|e| e.at(PathSegment::Index(i))))
        .collect()
}

fn located_entries<K: Validate, V: Validate>(
    raw: Value,
    expected: &'static str,
) -> ValidationResult<Vec<(K, V)>> {
    object(raw, expected)?
        .into_iter()
        .map(|(k, v)| {
            let key = K::validate(Value::String(k.clone()))
                .map_err(|e| e.at(PathSegment::Key(k.clone())))?;
            let value = V::validate(v).map_err(|e| e.at(PathSegment::Key(k)))?;
            Ok((key, value))
        })
        .collect()
}

impl<T: Validate> Validate for Vec<T> {
    fn validate(raw: Value) -> ValidationResult<Self> {
        located_items(raw, Self::expected(), T::validate)
    }

    fn validate_strict(raw: Value) -> ValidationResult<Self> {
        located_items(raw, Self::expected(), T::validate_strict)
    }

    fn expected() -> &'static str {
        "array"
    }
}

impl<T: Validate + Eq + Hash> Validate for HashSet<T> {
    fn validate(raw: Value) -> ValidationResult<Self> {
        Ok(located_items(raw, Self::expected(), T::validate)?.into_iter().collect())
    }

    fn validate_strict(raw: Value) -> ValidationResult<Self> {
        Ok(located_items(raw, Self::expected(), T::validate_strict)?
            .into_iter()
            .collect())
    }

    fn expected() -> &'static str {
        "array"
    }
}

impl<T: Validate + Ord> Validate for BTreeSet<T> {
    fn validate(raw: Value) -> ValidationResult<Self> {
        Ok(located_items(raw, Self::expected(), T::validate)?.into_iter().collect())
    }

    fn validate_strict(raw: Value) -> ValidationResult<Self> {
        Ok(located_items(raw, Self::expected(), T::validate_strict)?
            .into_iter()
            .collect())
    }

    fn expected() -> &'static str {
        "array"
    }
}

impl<K: Validate + Eq + Hash, V: Validate> Validate for HashMap<K, V> {
    fn validate(raw: Value) -> ValidationResult<Self> {
        Ok(located_entries(raw, Self::expected())?.into_iter().collect())
    }

    fn expected() -> &'static str {
        "object"
    }
}

impl<K: Validate + Ord, V: Validate> Validate for BTreeMap<K, V> {
    fn validate(raw: Value) -> ValidationResult<Self> {
        Ok(located_entries(raw, Self::expected())?.into_iter().collect())
    }

    fn expected() -> &'static str {
        "object"
    }
}

impl<K: Validate + Eq + Hash, V: Validate> Validate for IndexMap<K, V> {
    fn validate(raw: Value) -> ValidationResult<Self> {
        Ok(located_entries(raw, Self::expected())?.into_iter().collect())
    }

    fn expected() -> &'static str {
        "object"
    }
}
