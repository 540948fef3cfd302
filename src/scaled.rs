//! Fixed-point helpers for integers carrying an implicit power-of-ten
//! scaling factor.
//!
//! The factor is tracked by the caller, never stored with the value. A price
//! of `12.34` held as cents is the integer `1234` with factor `100`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::convert::clamp_int;
use crate::kind::Integer;
use crate::{NumericError, Result};

/// How to resolve a value lying between two representable multiples.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum MidpointRounding {
    /// Nearest multiple; ties go to the even quotient.
    #[default]
    ToEven = 0,
    /// Nearest multiple; ties go away from zero.
    AwayFromZero = 1,
    /// Directed: always toward zero.
    ToZero = 2,
    /// Directed: always toward negative infinity.
    ToNegativeInfinity = 3,
    /// Directed: always toward positive infinity.
    ToPositiveInfinity = 4,
}

impl MidpointRounding {
    pub const ALL: [MidpointRounding; 5] = [
        MidpointRounding::ToEven,
        MidpointRounding::AwayFromZero,
        MidpointRounding::ToZero,
        MidpointRounding::ToNegativeInfinity,
        MidpointRounding::ToPositiveInfinity,
    ];

    /// Decodes a wire code, naming `parameter` in the error.
    pub fn from_code(parameter: &'static str, code: u8) -> Result<Self> {
        match code {
            0 => Ok(MidpointRounding::ToEven),
            1 => Ok(MidpointRounding::AwayFromZero),
            2 => Ok(MidpointRounding::ToZero),
            3 => Ok(MidpointRounding::ToNegativeInfinity),
            4 => Ok(MidpointRounding::ToPositiveInfinity),
            value => {
                tracing::debug!(parameter, value, "unrecognized midpoint rounding");
                Err(NumericError::UnrecognizedRounding { parameter, value })
            }
        }
    }

    #[inline(always)]
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for MidpointRounding {
    type Error = NumericError;

    fn try_from(code: u8) -> Result<Self> {
        Self::from_code("mode", code)
    }
}

// ============================================================================
// Rounding
// ============================================================================

/// Divides `value` by a positive `factor`, rounding the quotient with `mode`.
fn div_round(value: i128, factor: i128, mode: MidpointRounding) -> i128 {
    let quotient = value / factor;
    let remainder = value % factor;
    if remainder == 0 {
        return quotient;
    }

    let away = if value < 0 { quotient - 1 } else { quotient + 1 };
    // |remainder| <= |value| < 2^64, so doubling cannot overflow.
    let twice = remainder.abs() * 2;

    match mode {
        MidpointRounding::ToZero => quotient,
        MidpointRounding::ToNegativeInfinity => {
            if value < 0 {
                away
            } else {
                quotient
            }
        }
        MidpointRounding::ToPositiveInfinity => {
            if value > 0 {
                away
            } else {
                quotient
            }
        }
        MidpointRounding::AwayFromZero => {
            if twice >= factor {
                away
            } else {
                quotient
            }
        }
        MidpointRounding::ToEven => {
            if twice > factor || (twice == factor && quotient % 2 != 0) {
                away
            } else {
                quotient
            }
        }
    }
}

/// `10^digits` when it fits in `T`.
#[inline(always)]
fn power_of_ten<T: Integer>(digits: u32) -> Option<i128> {
    10i128
        .checked_pow(digits)
        .filter(|factor| *factor <= T::max_i128())
}

/// Rounds a scaled integer to a multiple of 10 (one implicit decimal digit).
///
/// ```rust
/// use primnum::{MidpointRounding, round};
///
/// assert_eq!(round(5i32, MidpointRounding::ToEven), 0);
/// assert_eq!(round(5i32, MidpointRounding::AwayFromZero), 10);
/// assert_eq!(round(15i32, MidpointRounding::ToEven), 20);
/// ```
#[inline]
#[must_use = "this returns the result of the operation, without modifying the original"]
pub fn round<T: Integer>(value: T, mode: MidpointRounding) -> T {
    round_digits(value, 1, mode)
}

/// Rounds a scaled integer to a multiple of `10^digits`.
///
/// When `10^digits` does not fit in `T` the result is zero. When the rounded
/// multiple does not fit, the nearest multiple toward zero is returned.
#[must_use = "this returns the result of the operation, without modifying the original"]
pub fn round_digits<T: Integer>(value: T, digits: u32, mode: MidpointRounding) -> T {
    let Some(factor) = power_of_ten::<T>(digits) else {
        return T::ZERO;
    };
    let v = value.to_i128();
    let rounded = div_round(v, factor, mode) * factor;
    T::checked_from_i128(rounded).unwrap_or_else(|| T::wrapping_from_i128(v / factor * factor))
}

/// Re-expresses a scaled integer from factor `10^from_digits` to
/// `10^to_digits`.
///
/// Dropped precision is rounded with `mode`; widening saturates at the
/// bounds of `T`.
#[must_use = "this returns the result of the operation, without modifying the original"]
pub fn rescale<T: Integer>(value: T, from_digits: u32, to_digits: u32, mode: MidpointRounding) -> T {
    let v = value.to_i128();
    if to_digits >= from_digits {
        let widened = 10i128
            .checked_pow(to_digits - from_digits)
            .and_then(|factor| v.checked_mul(factor));
        return match widened {
            Some(widened) => clamp_int(widened),
            None if v < 0 => T::MIN,
            None if v > 0 => T::MAX,
            None => T::ZERO,
        };
    }

    match 10i128.checked_pow(from_digits - to_digits) {
        Some(factor) => clamp_int(div_round(v, factor, mode)),
        // The divisor exceeds every magnitude; only directed modes move off zero.
        None => match mode {
            MidpointRounding::ToPositiveInfinity if v > 0 => T::ONE,
            MidpointRounding::ToNegativeInfinity if v < 0 => clamp_int(-1),
            _ => T::ZERO,
        },
    }
}

/// Method-style access to the scaled helpers.
pub trait ScaledInteger: Integer {
    #[must_use = "this returns the result of the operation, without modifying the original"]
    fn round_scaled(self, mode: MidpointRounding) -> Self {
        round(self, mode)
    }

    #[must_use = "this returns the result of the operation, without modifying the original"]
    fn round_scaled_digits(self, digits: u32, mode: MidpointRounding) -> Self {
        round_digits(self, digits, mode)
    }

    #[must_use = "this returns the result of the operation, without modifying the original"]
    fn rescale(self, from_digits: u32, to_digits: u32, mode: MidpointRounding) -> Self {
        rescale(self, from_digits, to_digits, mode)
    }
}

impl<T: Integer> ScaledInteger for T {}

#[cfg(test)]
mod rounding_tests {
    use super::*;
    use MidpointRounding::*;

    #[test]
    fn test_round_worked_examples() {
        assert_eq!(round(4i32, ToEven), 0);
        assert_eq!(round(5i32, ToEven), 0);
        assert_eq!(round(5i32, AwayFromZero), 10);
        assert_eq!(round(15i32, ToEven), 20);
        assert_eq!(round(25i32, ToEven), 20);
        for mode in MidpointRounding::ALL {
            assert_eq!(round(6i32, mode), if mode == ToZero || mode == ToNegativeInfinity { 0 } else { 10 });
        }
    }

    #[test]
    fn test_round_directed() {
        assert_eq!(round(1i32, ToPositiveInfinity), 10);
        assert_eq!(round(9i32, ToZero), 0);
        assert_eq!(round(9i32, ToNegativeInfinity), 0);
        assert_eq!(round(-1i32, ToNegativeInfinity), -10);
        assert_eq!(round(-9i32, ToPositiveInfinity), 0);
        assert_eq!(round(-9i32, ToZero), 0);
    }

    #[test]
    fn test_round_negative_mirrors_positive() {
        for mode in [ToEven, AwayFromZero, ToZero] {
            for v in 0i64..=100 {
                assert_eq!(round(-v, mode), -round(v, mode), "{v} {mode:?}");
            }
        }
    }

    #[test]
    fn test_round_digits() {
        assert_eq!(round_digits(12_345i32, 2, ToEven), 12_300);
        assert_eq!(round_digits(12_350i32, 2, ToEven), 12_400);
        assert_eq!(round_digits(12_250i32, 2, ToEven), 12_200);
        assert_eq!(round_digits(12_250i32, 2, AwayFromZero), 12_300);
        assert_eq!(round_digits(777u16, 0, AwayFromZero), 777);
        assert_eq!(round_digits(-150i16, 2, AwayFromZero), -200);
    }

    #[test]
    fn test_unrepresentable_factor_yields_zero() {
        assert_eq!(round_digits(100i8, 3, ToEven), 0);
        assert_eq!(round_digits(u64::MAX, 20, ToEven), 0);
        assert_eq!(round_digits(i64::MAX, 40, ToPositiveInfinity), 0);
        assert_eq!(round_digits(99u8, 2, AwayFromZero), 100);
    }

    #[test]
    fn test_unrepresentable_multiple_steps_toward_zero() {
        assert_eq!(round(i64::MAX, AwayFromZero), 9_223_372_036_854_775_800);
        assert_eq!(round(i64::MAX, ToPositiveInfinity), 9_223_372_036_854_775_800);
        assert_eq!(round(i8::MIN, ToNegativeInfinity), -120);
        assert_eq!(round(u8::MAX, AwayFromZero), 250);
        assert_eq!(round(u8::MAX, ToZero), 250);
        assert_eq!(round(-126i8, ToEven), -120);
        assert_eq!(round(126i8, AwayFromZero), 120);
    }

    #[test]
    fn test_round_idempotent() {
        for mode in MidpointRounding::ALL {
            for v in -300i32..=300 {
                let once = round(v, mode);
                assert_eq!(round(once, mode), once);
            }
        }
    }

    #[test]
    fn test_rescale() {
        assert_eq!(rescale(12_345i64, 3, 1, ToEven), 123);
        assert_eq!(rescale(12_350i64, 3, 1, ToEven), 124);
        assert_eq!(rescale(-12_350i64, 3, 1, AwayFromZero), -124);
        assert_eq!(rescale(-12_301i64, 3, 1, ToNegativeInfinity), -124);
        assert_eq!(rescale(123i64, 1, 3, ToEven), 12_300);
        assert_eq!(rescale(200u8, 0, 1, ToEven), u8::MAX);
        assert_eq!(rescale(-5i32, 0, 50, ToEven), i32::MIN);
        assert_eq!(rescale(5i32, 50, 0, ToEven), 0);
        assert_eq!(rescale(5i32, 50, 0, ToPositiveInfinity), 1);
        assert_eq!(rescale(-5i32, 50, 0, ToNegativeInfinity), -1);
        assert_eq!(rescale(42u32, 2, 2, ToZero), 42);
    }

    #[test]
    fn test_scaled_integer_methods() {
        assert_eq!(1_234i32.round_scaled(ToEven), 1_230);
        assert_eq!(1_250i32.round_scaled_digits(2, ToEven), 1_200);
        assert_eq!(1_250i32.rescale(2, 0, AwayFromZero), 13);
    }

    #[test]
    fn test_rounding_codes() {
        for mode in MidpointRounding::ALL {
            assert_eq!(MidpointRounding::try_from(mode.code()), Ok(mode));
        }
        assert_eq!(
            MidpointRounding::try_from(5),
            Err(NumericError::UnrecognizedRounding {
                parameter: "mode",
                value: 5
            })
        );
    }
}
