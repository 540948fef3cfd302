//! Mode-selectable conversion between primitive kinds.
//!
//! Every conversion goes through a widened working value (`i128` for
//! integers, `f64` for floats, [`Decimal`] for the decimal kind) and is then
//! narrowed into the target kind under one of four [`ConversionMode`]s:
//!
//! | Mode        | Out of range                 | NaN            | ±Infinity       |
//! |-------------|------------------------------|----------------|-----------------|
//! | `Default`   | `Overflow` error (floats round half to even first) | `Overflow` | `Overflow` |
//! | `Cast`      | unchecked `as` cast          | `as` cast      | `as` cast       |
//! | `Clamp`     | nearest bound                | zero           | nearest bound   |
//! | `CastClamp` | unchecked `as` cast          | zero           | nearest bound   |
//!
//! Float targets never fail: `Default` and `Cast` behave like `as`. Decimal
//! conversions have no unchecked form, so `Cast` reports `Overflow` when the
//! decimal side cannot hold the value.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::kind::{Integer, Kind, Primitive, Value};
use crate::{NumericError, Result};

/// Conversion policy applied when narrowing into the target kind.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum ConversionMode {
    /// Checked standard conversion: rounds floats half to even and reports
    /// `Overflow` when the value does not fit.
    #[default]
    Default = 0,
    /// Unchecked cast: truncates bits, no range validation.
    Cast = 1,
    /// Pins to the nearest bound; NaN becomes zero.
    Clamp = 2,
    /// `Cast`, except NaN becomes zero and infinities pin to the bounds.
    CastClamp = 3,
}

impl ConversionMode {
    pub const ALL: [ConversionMode; 4] = [
        ConversionMode::Default,
        ConversionMode::Cast,
        ConversionMode::Clamp,
        ConversionMode::CastClamp,
    ];

    /// Decodes a wire code, naming `parameter` in the error.
    pub fn from_code(parameter: &'static str, code: u8) -> Result<Self> {
        match code {
            0 => Ok(ConversionMode::Default),
            1 => Ok(ConversionMode::Cast),
            2 => Ok(ConversionMode::Clamp),
            3 => Ok(ConversionMode::CastClamp),
            value => {
                tracing::debug!(parameter, value, "unrecognized conversion mode");
                Err(NumericError::UnrecognizedMode { parameter, value })
            }
        }
    }

    #[inline(always)]
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for ConversionMode {
    type Error = NumericError;

    fn try_from(code: u8) -> Result<Self> {
        Self::from_code("mode", code)
    }
}

// ============================================================================
// Typed entry points
// ============================================================================

/// Converts `value` into `T` under `mode`.
///
/// # Errors
/// Returns [`NumericError::Overflow`] when a checked mode cannot represent
/// the value in `T`.
pub fn convert<S: Primitive, T: Primitive>(value: S, mode: ConversionMode) -> Result<T> {
    let converted = value.into_value().convert(T::KIND, mode)?;
    T::from_value(converted).ok_or(NumericError::KindMismatch {
        expected: T::KIND,
        found: converted.kind(),
    })
}

impl Value {
    /// Converts this value into `target` under `mode`.
    ///
    /// # Errors
    /// Returns [`NumericError::Overflow`] when a checked mode cannot represent
    /// the value in `target`.
    pub fn convert(self, target: Kind, mode: ConversionMode) -> Result<Value> {
        let from = self.kind();
        let wide = Wide::from(self);
        let converted = match target {
            Kind::I8 => narrow_int::<i8>(wide, mode).map(Value::I8),
            Kind::U8 => narrow_int::<u8>(wide, mode).map(Value::U8),
            Kind::I16 => narrow_int::<i16>(wide, mode).map(Value::I16),
            Kind::U16 => narrow_int::<u16>(wide, mode).map(Value::U16),
            Kind::I32 => narrow_int::<i32>(wide, mode).map(Value::I32),
            Kind::U32 => narrow_int::<u32>(wide, mode).map(Value::U32),
            Kind::I64 => narrow_int::<i64>(wide, mode).map(Value::I64),
            Kind::U64 => narrow_int::<u64>(wide, mode).map(Value::U64),
            Kind::F32 => Some(Value::F32(narrow_f32(wide, mode))),
            Kind::F64 => Some(Value::F64(narrow_f64(wide, mode))),
            Kind::Decimal => narrow_decimal(wide, mode).map(Value::Decimal),
        };
        converted.ok_or_else(|| {
            tracing::trace!(%from, to = %target, ?mode, "conversion overflow");
            NumericError::Overflow { from, to: target }
        })
    }

    /// Converts using a raw mode code, rejecting codes outside the four modes.
    ///
    /// # Errors
    /// Returns [`NumericError::UnrecognizedMode`] for an unknown `mode` code and
    /// [`NumericError::Overflow`] as [`Value::convert`] does.
    pub fn convert_with_code(self, target: Kind, mode: u8) -> Result<Value> {
        let mode = ConversionMode::from_code("mode", mode)?;
        self.convert(target, mode)
    }
}

// ============================================================================
// Registry
// ============================================================================

/// One (source, target) row of the conversion table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Conversion {
    pub source: Kind,
    pub target: Kind,
}

impl Conversion {
    /// Applies this conversion with a raw mode code.
    ///
    /// # Errors
    /// Returns [`NumericError::UnrecognizedMode`] for an unknown `mode` code,
    /// [`NumericError::KindMismatch`] when `value` is not of the source kind,
    /// and [`NumericError::Overflow`] from checked modes.
    pub fn apply(&self, value: Value, mode: u8) -> Result<Value> {
        let mode = ConversionMode::from_code("mode", mode)?;
        if value.kind() != self.source {
            return Err(NumericError::KindMismatch {
                expected: self.source,
                found: value.kind(),
            });
        }
        value.convert(self.target, mode)
    }

    /// Finds the registry row for a kind pair.
    pub fn lookup(source: Kind, target: Kind) -> &'static Conversion {
        &CONVERSIONS[source as usize * Kind::COUNT + target as usize]
    }
}

/// Every (source, target) pair, source-major.
pub static CONVERSIONS: [Conversion; Kind::COUNT * Kind::COUNT] = {
    let mut table = [Conversion {
        source: Kind::I8,
        target: Kind::I8,
    }; Kind::COUNT * Kind::COUNT];
    let mut i = 0;
    while i < table.len() {
        table[i] = Conversion {
            source: Kind::ALL[i / Kind::COUNT],
            target: Kind::ALL[i % Kind::COUNT],
        };
        i += 1;
    }
    table
};

// ============================================================================
// Narrowing
// ============================================================================

/// Widened working value of a conversion source.
#[derive(Copy, Clone, Debug)]
enum Wide {
    Int(i128),
    /// `single` keeps an `f32` source as given so same-width paths stay bit-exact.
    Float { value: f64, single: Option<f32> },
    Decimal(Decimal),
}

impl From<Value> for Wide {
    fn from(value: Value) -> Self {
        match value {
            Value::I8(v) => Wide::Int(v.into()),
            Value::U8(v) => Wide::Int(v.into()),
            Value::I16(v) => Wide::Int(v.into()),
            Value::U16(v) => Wide::Int(v.into()),
            Value::I32(v) => Wide::Int(v.into()),
            Value::U32(v) => Wide::Int(v.into()),
            Value::I64(v) => Wide::Int(v.into()),
            Value::U64(v) => Wide::Int(v.into()),
            Value::F32(v) => Wide::Float {
                value: v.into(),
                single: Some(v),
            },
            Value::F64(v) => Wide::Float {
                value: v,
                single: None,
            },
            Value::Decimal(v) => Wide::Decimal(v),
        }
    }
}

/// Pins an `i128` into `T`'s range.
#[inline(always)]
pub(crate) fn clamp_int<T: Integer>(value: i128) -> T {
    if value <= T::min_i128() {
        T::MIN
    } else if value >= T::max_i128() {
        T::MAX
    } else {
        T::wrapping_from_i128(value)
    }
}

/// Pins a float into `T`'s range, truncating toward zero; NaN becomes zero.
#[inline(always)]
fn clamp_float_to_int<T: Integer>(value: f64) -> T {
    if value.is_nan() {
        T::ZERO
    } else if value <= T::min_i128() as f64 {
        T::MIN
    } else if value >= T::max_i128() as f64 {
        T::MAX
    } else {
        T::cast_from_f64(value)
    }
}

fn narrow_int<T: Integer>(wide: Wide, mode: ConversionMode) -> Option<T> {
    match wide {
        Wide::Int(v) => match mode {
            ConversionMode::Default => T::checked_from_i128(v),
            ConversionMode::Cast | ConversionMode::CastClamp => Some(T::wrapping_from_i128(v)),
            ConversionMode::Clamp => Some(clamp_int(v)),
        },
        Wide::Float { value, .. } => match mode {
            ConversionMode::Default => round_float_to_int(value),
            ConversionMode::Cast => Some(T::cast_from_f64(value)),
            ConversionMode::Clamp => Some(clamp_float_to_int(value)),
            ConversionMode::CastClamp => Some(if value.is_nan() {
                T::ZERO
            } else if value == f64::INFINITY {
                T::MAX
            } else if value == f64::NEG_INFINITY {
                T::MIN
            } else {
                T::cast_from_f64(value)
            }),
        },
        Wide::Decimal(d) => match mode {
            ConversionMode::Default => d
                .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
                .to_i128()
                .and_then(T::checked_from_i128),
            ConversionMode::Cast | ConversionMode::CastClamp => {
                d.trunc().to_i128().and_then(T::checked_from_i128)
            }
            ConversionMode::Clamp => d.trunc().to_i128().map(clamp_int),
        },
    }
}

/// Standard float-to-integer conversion: rounds half to even, fails on
/// NaN, infinities and values outside `T`.
fn round_float_to_int<T: Integer>(value: f64) -> Option<T> {
    if !value.is_finite() {
        return None;
    }
    let rounded = value.round_ties_even();
    // `MAX as f64 + 1.0` is exactly 2^n for every width, so the upper bound
    // stays exclusive even where `MAX` itself rounds up.
    let upper = T::max_i128() as f64 + 1.0;
    if rounded < T::min_i128() as f64 || rounded >= upper {
        None
    } else {
        Some(T::cast_from_f64(rounded))
    }
}

fn narrow_f64(wide: Wide, mode: ConversionMode) -> f64 {
    match wide {
        Wide::Int(v) => v as f64,
        Wide::Decimal(d) => d.to_f64().unwrap_or(0.0),
        Wide::Float { value, .. } => match mode {
            ConversionMode::Default | ConversionMode::Cast => value,
            ConversionMode::Clamp | ConversionMode::CastClamp => {
                if value.is_nan() {
                    0.0
                } else {
                    value.clamp(f64::MIN, f64::MAX)
                }
            }
        },
    }
}

fn narrow_f32(wide: Wide, mode: ConversionMode) -> f32 {
    match wide {
        Wide::Int(v) => v as f32,
        Wide::Decimal(d) => d.to_f32().unwrap_or(0.0),
        Wide::Float {
            single: Some(v), ..
        } => match mode {
            ConversionMode::Default | ConversionMode::Cast => v,
            ConversionMode::Clamp | ConversionMode::CastClamp => {
                if v.is_nan() {
                    0.0
                } else {
                    v.clamp(f32::MIN, f32::MAX)
                }
            }
        },
        Wide::Float { value, .. } => match mode {
            ConversionMode::Default | ConversionMode::Cast => value as f32,
            ConversionMode::Clamp => {
                if value.is_nan() {
                    0.0
                } else if value >= f64::from(f32::MAX) {
                    f32::MAX
                } else if value <= f64::from(f32::MIN) {
                    f32::MIN
                } else {
                    value as f32
                }
            }
            ConversionMode::CastClamp => {
                if value.is_nan() {
                    0.0
                } else if value == f64::INFINITY {
                    f32::MAX
                } else if value == f64::NEG_INFINITY {
                    f32::MIN
                } else {
                    value as f32
                }
            }
        },
    }
}

fn narrow_decimal(wide: Wide, mode: ConversionMode) -> Option<Decimal> {
    match wide {
        Wide::Int(v) => Decimal::from_i128(v),
        Wide::Decimal(d) => Some(d),
        Wide::Float { value, single } => {
            let exact = || {
                if let Some(v) = single {
                    Decimal::from_f32(v)
                } else {
                    Decimal::from_f64(value)
                }
            };
            match mode {
                ConversionMode::Default | ConversionMode::Cast => exact(),
                ConversionMode::Clamp => {
                    if value.is_nan() {
                        Some(Decimal::ZERO)
                    } else {
                        Some(exact().unwrap_or(if value > 0.0 {
                            Decimal::MAX
                        } else {
                            Decimal::MIN
                        }))
                    }
                }
                ConversionMode::CastClamp => {
                    if value.is_nan() {
                        Some(Decimal::ZERO)
                    } else if value == f64::INFINITY {
                        Some(Decimal::MAX)
                    } else if value == f64::NEG_INFINITY {
                        Some(Decimal::MIN)
                    } else {
                        exact()
                    }
                }
            }
        }
    }
}
