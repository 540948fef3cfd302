//! Saturating arithmetic over every primitive kind.
//!
//! Results that would overflow are pinned to the kind's `MIN`/`MAX` instead
//! of wrapping or panicking. Float results never leave the finite range: NaN
//! becomes zero and infinities pin to the bounds. Division by zero yields
//! `MAX` and a zero remainder yields zero.

use ethnum::i256;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal::prelude::ToPrimitive;

use crate::convert::clamp_int;
use crate::kind::{Integer, Primitive, Value};
use crate::{NumericError, Result};

/// Saturating operations, one instantiation per primitive kind.
pub trait ClampedArithmetic: Primitive {
    #[must_use = "this returns the result of the operation, without modifying the original"]
    fn clamped_add(self, rhs: Self) -> Self;

    #[must_use = "this returns the result of the operation, without modifying the original"]
    fn clamped_sub(self, rhs: Self) -> Self;

    #[must_use = "this returns the result of the operation, without modifying the original"]
    fn clamped_mul(self, rhs: Self) -> Self;

    /// Division by zero yields `MAX`.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    fn clamped_div(self, rhs: Self) -> Self;

    /// Remainder by zero yields zero.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    fn clamped_rem(self, rhs: Self) -> Self;

    /// Raises `self` to `exp`. Any base raised to zero is one.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    fn clamped_pow(self, exp: Self) -> Self;

    #[must_use = "this returns the result of the operation, without modifying the original"]
    fn clamped_neg(self) -> Self;

    #[must_use = "this returns the result of the operation, without modifying the original"]
    fn clamped_abs(self) -> Self;
}

// ============================================================================
// Integers
// ============================================================================

#[inline(always)]
fn narrow_i256<T: Integer>(value: i256) -> T {
    if value > i256::from(T::max_i128()) {
        T::MAX
    } else if value < i256::from(T::min_i128()) {
        T::MIN
    } else {
        clamp_int(value.as_i128())
    }
}

#[inline(always)]
fn int_add<T: Integer>(a: T, b: T) -> T {
    narrow_i256(i256::from(a.to_i128()) + i256::from(b.to_i128()))
}

#[inline(always)]
fn int_sub<T: Integer>(a: T, b: T) -> T {
    narrow_i256(i256::from(a.to_i128()) - i256::from(b.to_i128()))
}

#[inline(always)]
fn int_mul<T: Integer>(a: T, b: T) -> T {
    narrow_i256(i256::from(a.to_i128()) * i256::from(b.to_i128()))
}

#[inline(always)]
fn int_div<T: Integer>(a: T, b: T) -> T {
    let divisor = b.to_i128();
    if divisor == 0 {
        return T::MAX;
    }
    // Operands fit in 64 bits, so the quotient cannot overflow i128.
    clamp_int(a.to_i128() / divisor)
}

#[inline(always)]
fn int_rem<T: Integer>(a: T, b: T) -> T {
    let divisor = b.to_i128();
    if divisor == 0 {
        return T::ZERO;
    }
    clamp_int(a.to_i128() % divisor)
}

fn int_pow<T: Integer>(base: T, exp: T) -> T {
    let (b, e) = (base.to_i128(), exp.to_i128());
    let odd = e % 2 != 0;
    if e == 0 {
        return T::ONE;
    }
    match b {
        0 if e < 0 => return T::MAX,
        0 => return T::ZERO,
        1 => return T::ONE,
        -1 => return clamp_int(if odd { -1 } else { 1 }),
        _ if e < 0 => return T::ZERO,
        _ => {}
    }

    let overflow = if b < 0 && odd { T::MIN } else { T::MAX };
    match u32::try_from(e).ok().and_then(|e| b.checked_pow(e)) {
        Some(power) => clamp_int(power),
        None => overflow,
    }
}

macro_rules! impl_clamped_integer {
    ($($t:ty),* $(,)?) => {
        $(
            impl ClampedArithmetic for $t {
                #[inline(always)]
                fn clamped_add(self, rhs: Self) -> Self {
                    int_add(self, rhs)
                }

                #[inline(always)]
                fn clamped_sub(self, rhs: Self) -> Self {
                    int_sub(self, rhs)
                }

                #[inline(always)]
                fn clamped_mul(self, rhs: Self) -> Self {
                    int_mul(self, rhs)
                }

                #[inline(always)]
                fn clamped_div(self, rhs: Self) -> Self {
                    int_div(self, rhs)
                }

                #[inline(always)]
                fn clamped_rem(self, rhs: Self) -> Self {
                    int_rem(self, rhs)
                }

                #[inline(always)]
                fn clamped_pow(self, exp: Self) -> Self {
                    int_pow(self, exp)
                }

                #[inline(always)]
                fn clamped_neg(self) -> Self {
                    clamp_int(-self.to_i128())
                }

                #[inline(always)]
                fn clamped_abs(self) -> Self {
                    clamp_int(self.to_i128().abs())
                }
            }
        )*
    };
}

impl_clamped_integer!(i8, u8, i16, u16, i32, u32, i64, u64);

// ============================================================================
// Floats
// ============================================================================

macro_rules! impl_clamped_float {
    ($($t:ty),* $(,)?) => {
        $(
            impl ClampedArithmetic for $t {
                #[inline(always)]
                fn clamped_add(self, rhs: Self) -> Self {
                    if self.is_nan() || rhs.is_nan() {
                        return 0.0;
                    }
                    pin(self + rhs)
                }

                #[inline(always)]
                fn clamped_sub(self, rhs: Self) -> Self {
                    if self.is_nan() || rhs.is_nan() {
                        return 0.0;
                    }
                    pin(self - rhs)
                }

                #[inline(always)]
                fn clamped_mul(self, rhs: Self) -> Self {
                    if self.is_nan() || rhs.is_nan() {
                        return 0.0;
                    }
                    pin(self * rhs)
                }

                #[inline(always)]
                fn clamped_div(self, rhs: Self) -> Self {
                    if self.is_nan() || rhs.is_nan() {
                        return 0.0;
                    }
                    if rhs == 0.0 {
                        return <$t>::MAX;
                    }
                    pin(self / rhs)
                }

                #[inline(always)]
                fn clamped_rem(self, rhs: Self) -> Self {
                    if self.is_nan() || rhs.is_nan() || rhs == 0.0 {
                        return 0.0;
                    }
                    pin(self % rhs)
                }

                #[inline(always)]
                fn clamped_pow(self, exp: Self) -> Self {
                    if exp == 0.0 {
                        return 1.0;
                    }
                    if self.is_nan() || exp.is_nan() {
                        return 0.0;
                    }
                    pin(self.powf(exp))
                }

                #[inline(always)]
                fn clamped_neg(self) -> Self {
                    pin(-self)
                }

                #[inline(always)]
                fn clamped_abs(self) -> Self {
                    pin(self.abs())
                }
            }

            impl Pin for $t {
                #[inline(always)]
                fn pin(self) -> Self {
                    if self.is_nan() {
                        0.0
                    } else {
                        self.clamp(<$t>::MIN, <$t>::MAX)
                    }
                }
            }
        )*
    };
}

/// Maps a raw float result into the finite range.
trait Pin {
    fn pin(self) -> Self;
}

#[inline(always)]
fn pin<F: Pin>(value: F) -> F {
    value.pin()
}

impl_clamped_float!(f32, f64);

// ============================================================================
// Decimal
// ============================================================================

#[inline(always)]
fn decimal_bound(negative: bool) -> Decimal {
    if negative { Decimal::MIN } else { Decimal::MAX }
}

impl ClampedArithmetic for Decimal {
    #[inline(always)]
    fn clamped_add(self, rhs: Self) -> Self {
        self.saturating_add(rhs)
    }

    #[inline(always)]
    fn clamped_sub(self, rhs: Self) -> Self {
        self.saturating_sub(rhs)
    }

    #[inline(always)]
    fn clamped_mul(self, rhs: Self) -> Self {
        self.saturating_mul(rhs)
    }

    fn clamped_div(self, rhs: Self) -> Self {
        if rhs.is_zero() {
            return Decimal::MAX;
        }
        match self.checked_div(rhs) {
            Some(result) => result,
            None => decimal_bound(self.is_sign_negative() != rhs.is_sign_negative()),
        }
    }

    fn clamped_rem(self, rhs: Self) -> Self {
        if rhs.is_zero() {
            return Decimal::ZERO;
        }
        self.checked_rem(rhs).unwrap_or(Decimal::ZERO)
    }

    fn clamped_pow(self, exp: Self) -> Self {
        if exp.is_zero() {
            return Decimal::ONE;
        }
        let integral = exp.fract().is_zero();
        let odd = integral && !(exp % Decimal::TWO).is_zero();

        if self.is_zero() {
            return if exp.is_sign_negative() { Decimal::MAX } else { Decimal::ZERO };
        }
        if self.abs() == Decimal::ONE && integral {
            return if self.is_sign_negative() && odd {
                Decimal::NEGATIVE_ONE
            } else {
                Decimal::ONE
            };
        }
        if self.is_sign_negative() && !integral {
            // No real result.
            return Decimal::ZERO;
        }

        let result = if integral {
            exp.to_i32().and_then(|e| self.checked_powi(i64::from(e)))
        } else {
            self.checked_powd(exp)
        };
        result.unwrap_or_else(|| {
            let grows = (self.abs() > Decimal::ONE) != exp.is_sign_negative();
            if !grows {
                Decimal::ZERO
            } else {
                decimal_bound(self.is_sign_negative() && odd)
            }
        })
    }

    #[inline(always)]
    fn clamped_neg(self) -> Self {
        -self
    }

    #[inline(always)]
    fn clamped_abs(self) -> Self {
        self.abs()
    }
}

// ============================================================================
// Value dispatch
// ============================================================================

macro_rules! dispatch_binary {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            pub fn $name(self, rhs: Value) -> Result<Value> {
                match (self, rhs) {
                    (Value::I8(a), Value::I8(b)) => Ok(Value::I8(a.$name(b))),
                    (Value::U8(a), Value::U8(b)) => Ok(Value::U8(a.$name(b))),
                    (Value::I16(a), Value::I16(b)) => Ok(Value::I16(a.$name(b))),
                    (Value::U16(a), Value::U16(b)) => Ok(Value::U16(a.$name(b))),
                    (Value::I32(a), Value::I32(b)) => Ok(Value::I32(a.$name(b))),
                    (Value::U32(a), Value::U32(b)) => Ok(Value::U32(a.$name(b))),
                    (Value::I64(a), Value::I64(b)) => Ok(Value::I64(a.$name(b))),
                    (Value::U64(a), Value::U64(b)) => Ok(Value::U64(a.$name(b))),
                    (Value::F32(a), Value::F32(b)) => Ok(Value::F32(a.$name(b))),
                    (Value::F64(a), Value::F64(b)) => Ok(Value::F64(a.$name(b))),
                    (Value::Decimal(a), Value::Decimal(b)) => Ok(Value::Decimal(a.$name(b))),
                    (a, b) => {
                        tracing::debug!(op = stringify!($name), lhs = %a.kind(), rhs = %b.kind(), "operand kinds differ");
                        Err(NumericError::KindMismatch {
                            expected: a.kind(),
                            found: b.kind(),
                        })
                    }
                }
            }
        )*
    };
}

macro_rules! dispatch_unary {
    ($($name:ident),* $(,)?) => {
        $(
            #[must_use = "this returns the result of the operation, without modifying the original"]
            pub fn $name(self) -> Value {
                match self {
                    Value::I8(v) => Value::I8(v.$name()),
                    Value::U8(v) => Value::U8(v.$name()),
                    Value::I16(v) => Value::I16(v.$name()),
                    Value::U16(v) => Value::U16(v.$name()),
                    Value::I32(v) => Value::I32(v.$name()),
                    Value::U32(v) => Value::U32(v.$name()),
                    Value::I64(v) => Value::I64(v.$name()),
                    Value::U64(v) => Value::U64(v.$name()),
                    Value::F32(v) => Value::F32(v.$name()),
                    Value::F64(v) => Value::F64(v.$name()),
                    Value::Decimal(v) => Value::Decimal(v.$name()),
                }
            }
        )*
    };
}

/// Saturating arithmetic on tagged values. Both operands must share a kind.
impl Value {
    dispatch_binary!(
        clamped_add,
        clamped_sub,
        clamped_mul,
        /// Division by zero yields the kind's `MAX`.
        clamped_div,
        clamped_rem,
        clamped_pow,
    );

    dispatch_unary!(clamped_neg, clamped_abs);
}
