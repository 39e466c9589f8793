//! Built-in constraints
//!
//! - [`Positive`]: value > 0
//! - [`NonNegative`]: value >= 0
//! - [`InRange<MIN, MAX>`]: MIN <= value <= MAX, integers only
//! - [`NonEmpty`]: strings and vectors with at least one element
//! - [`MaxLength<N>`]: at most N characters or elements

use super::Constraint;

/// Value must be positive (> 0)
#[derive(Debug, Clone, Copy, Default)]
pub struct Positive;

/// Value must be non-negative (>= 0)
#[derive(Debug, Clone, Copy, Default)]
pub struct NonNegative;

/// Value must be in the inclusive range `[MIN, MAX]`
#[derive(Debug, Clone, Copy, Default)]
pub struct InRange<const MIN: i64, const MAX: i64>;

/// Value must not be empty
#[derive(Debug, Clone, Copy, Default)]
pub struct NonEmpty;

/// Value must have at most `N` characters (strings) or elements (vectors)
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxLength<const N: usize>;

macro_rules! impl_sign_constraint {
    ($constraint:ty, $zero:expr, $check:expr, $msg:literal, $desc:literal, [$($ty:ty),+]) => {
        $(
            impl Constraint<$ty> for $constraint {
                fn check(value: &$ty) -> Result<(), String> {
                    let zero: $ty = $zero;
                    if $check(*value, zero) {
                        Ok(())
                    } else {
                        Err(format!($msg, value))
                    }
                }

                fn description() -> &'static str {
                    $desc
                }
            }
        )+
    };
}

impl_sign_constraint!(
    Positive,
    0,
    |v, zero| v > zero,
    "{} is not positive",
    "positive (> 0)",
    [i8, i16, i32, i64, isize, u8, u16, u32, u64, usize]
);

impl_sign_constraint!(
    Positive,
    0.0,
    |v, zero| v > zero,
    "{} is not positive",
    "positive (> 0)",
    [f32, f64]
);

impl_sign_constraint!(
    NonNegative,
    0,
    |v, zero| v >= zero,
    "{} is negative",
    "non-negative (>= 0)",
    [i8, i16, i32, i64, isize, u8, u16, u32, u64, usize]
);

impl_sign_constraint!(
    NonNegative,
    0.0,
    |v, zero| v >= zero,
    "{} is negative",
    "non-negative (>= 0)",
    [f32, f64]
);

macro_rules! impl_in_range {
    ($($ty:ty),+) => {
        $(
            impl<const MIN: i64, const MAX: i64> Constraint<$ty> for InRange<MIN, MAX> {
                fn check(value: &$ty) -> Result<(), String> {
                    let v = *value as i128;
                    if (MIN as i128..=MAX as i128).contains(&v) {
                        Ok(())
                    } else {
                        Err(format!("{} is outside [{}, {}]", value, MIN, MAX))
                    }
                }

                fn description() -> &'static str {
                    "within range"
                }
            }
        )+
    };
}

impl_in_range!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Constraint<String> for NonEmpty {
    fn check(value: &String) -> Result<(), String> {
        if value.is_empty() {
            Err("string is empty".to_string())
        } else {
            Ok(())
        }
    }

    fn description() -> &'static str {
        "non-empty"
    }
}

impl<T> Constraint<Vec<T>> for NonEmpty {
    fn check(value: &Vec<T>) -> Result<(), String> {
        if value.is_empty() {
            Err("list is empty".to_string())
        } else {
            Ok(())
        }
    }

    fn description() -> &'static str {
        "non-empty"
    }
}

impl<const N: usize> Constraint<String> for MaxLength<N> {
    fn check(value: &String) -> Result<(), String> {
        let len = value.chars().count();
        if len <= N {
            Ok(())
        } else {
            Err(format!("length {} exceeds {}", len, N))
        }
    }

    fn description() -> &'static str {
        "bounded length"
    }
}

impl<T, const N: usize> Constraint<Vec<T>> for MaxLength<N> {
    fn check(value: &Vec<T>) -> Result<(), String> {
        if value.len() <= N {
            Ok(())
        } else {
            Err(format!("length {} exceeds {}", value.len(), N))
        }
    }

    fn description() -> &'static str {
        "bounded length"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::Constrained;
    use crate::error::ValidationError;
    use crate::validate::Validate;
    use serde_json::json;

    #[test]
    fn test_positive() {
        assert!(Constrained::<i32, Positive>::new(1).is_ok());
        assert!(Constrained::<i32, Positive>::new(0).is_err());
        assert!(Constrained::<u8, Positive>::new(0).is_err());
        assert!(Constrained::<f64, Positive>::new(0.1).is_ok());
        assert!(Constrained::<f64, Positive>::new(-0.1).is_err());
    }

    #[test]
    fn test_non_negative() {
        assert!(Constrained::<i64, NonNegative>::new(0).is_ok());
        assert_eq!(
            Constrained::<i64, NonNegative>::new(-2).unwrap_err(),
            ValidationError::Constraint {
                constraint: "non-negative (>= 0)",
                message: "-2 is negative".to_string(),
            }
        );
        assert!(Constrained::<f32, NonNegative>::new(-0.5).is_err());
    }

    #[test]
    fn test_in_range_bounds_are_inclusive() {
        type Percent = Constrained<i32, InRange<0, 100>>;
        assert!(Percent::new(0).is_ok());
        assert!(Percent::new(100).is_ok());
        assert_eq!(
            Percent::new(101).unwrap_err().to_string(),
            "101 is outside [0, 100] (within range)"
        );
        assert!(Percent::new(-1).is_err());
    }

    #[test]
    fn test_in_range_with_large_unsigned() {
        type Small = Constrained<u64, InRange<0, 10>>;
        assert!(Small::new(u64::MAX).is_err());
    }

    #[test]
    fn test_non_empty() {
        assert!(Constrained::<String, NonEmpty>::new("a".to_string()).is_ok());
        assert!(Constrained::<String, NonEmpty>::new(String::new()).is_err());
        assert!(Constrained::<Vec<i32>, NonEmpty>::new(vec![1]).is_ok());
        assert!(Constrained::<Vec<i32>, NonEmpty>::new(vec![]).is_err());
    }

    #[test]
    fn test_max_length_counts_characters() {
        type Short = Constrained<String, MaxLength<3>>;
        assert!(Short::new("héé".to_string()).is_ok());
        assert!(Short::new("abcd".to_string()).is_err());
        assert!(Constrained::<Vec<u8>, MaxLength<2>>::new(vec![1, 2, 3]).is_err());
    }

    #[test]
    fn test_validate_through_constraint() {
        type Score = Constrained<f64, NonNegative>;
        assert_eq!(*Score::validate(json!("2.5")).unwrap(), 2.5);
        assert!(Score::validate(json!(-1)).is_err());
    }
}
