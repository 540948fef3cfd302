//! Type metadata for the closed set of primitive numeric kinds.

use core::fmt;
use core::hash::Hash;

use rust_decimal::Decimal;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One member of the closed set of supported numeric representations.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum Kind {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    Decimal,
}

// ============================================================================
// Metadata
// ============================================================================

impl Kind {
    /// Number of supported kinds.
    pub const COUNT: usize = 11;

    /// Every kind, ordered by discriminant.
    pub const ALL: [Kind; Self::COUNT] = [
        Kind::I8,
        Kind::U8,
        Kind::I16,
        Kind::U16,
        Kind::I32,
        Kind::U32,
        Kind::I64,
        Kind::U64,
        Kind::F32,
        Kind::F64,
        Kind::Decimal,
    ];

    /// Width of the kind's fixed byte encoding.
    #[inline(always)]
    pub const fn byte_width(self) -> usize {
        match self {
            Kind::I8 | Kind::U8 => 1,
            Kind::I16 | Kind::U16 => 2,
            Kind::I32 | Kind::U32 | Kind::F32 => 4,
            Kind::I64 | Kind::U64 | Kind::F64 => 8,
            Kind::Decimal => 16,
        }
    }

    /// Whether the kind can represent negative values.
    #[inline(always)]
    pub const fn is_signed(self) -> bool {
        !matches!(self, Kind::U8 | Kind::U16 | Kind::U32 | Kind::U64)
    }

    #[inline(always)]
    pub const fn has_nan(self) -> bool {
        matches!(self, Kind::F32 | Kind::F64)
    }

    #[inline(always)]
    pub const fn has_infinity(self) -> bool {
        matches!(self, Kind::F32 | Kind::F64)
    }

    #[inline(always)]
    pub const fn is_integer(self) -> bool {
        !matches!(self, Kind::F32 | Kind::F64 | Kind::Decimal)
    }

    #[inline(always)]
    pub const fn is_float(self) -> bool {
        matches!(self, Kind::F32 | Kind::F64)
    }

    /// Smallest representable value.
    pub const fn min_value(self) -> Value {
        match self {
            Kind::I8 => Value::I8(i8::MIN),
            Kind::U8 => Value::U8(u8::MIN),
            Kind::I16 => Value::I16(i16::MIN),
            Kind::U16 => Value::U16(u16::MIN),
            Kind::I32 => Value::I32(i32::MIN),
            Kind::U32 => Value::U32(u32::MIN),
            Kind::I64 => Value::I64(i64::MIN),
            Kind::U64 => Value::U64(u64::MIN),
            Kind::F32 => Value::F32(f32::MIN),
            Kind::F64 => Value::F64(f64::MIN),
            Kind::Decimal => Value::Decimal(Decimal::MIN),
        }
    }

    /// Largest representable value.
    pub const fn max_value(self) -> Value {
        match self {
            Kind::I8 => Value::I8(i8::MAX),
            Kind::U8 => Value::U8(u8::MAX),
            Kind::I16 => Value::I16(i16::MAX),
            Kind::U16 => Value::U16(u16::MAX),
            Kind::I32 => Value::I32(i32::MAX),
            Kind::U32 => Value::U32(u32::MAX),
            Kind::I64 => Value::I64(i64::MAX),
            Kind::U64 => Value::U64(u64::MAX),
            Kind::F32 => Value::F32(f32::MAX),
            Kind::F64 => Value::F64(f64::MAX),
            Kind::Decimal => Value::Decimal(Decimal::MAX),
        }
    }

    pub const fn zero(self) -> Value {
        match self {
            Kind::I8 => Value::I8(0),
            Kind::U8 => Value::U8(0),
            Kind::I16 => Value::I16(0),
            Kind::U16 => Value::U16(0),
            Kind::I32 => Value::I32(0),
            Kind::U32 => Value::U32(0),
            Kind::I64 => Value::I64(0),
            Kind::U64 => Value::U64(0),
            Kind::F32 => Value::F32(0.0),
            Kind::F64 => Value::F64(0.0),
            Kind::Decimal => Value::Decimal(Decimal::ZERO),
        }
    }

    /// Lowercase Rust name of the kind (`"decimal"` for the decimal kind).
    pub const fn name(self) -> &'static str {
        match self {
            Kind::I8 => "i8",
            Kind::U8 => "u8",
            Kind::I16 => "i16",
            Kind::U16 => "u16",
            Kind::I32 => "i32",
            Kind::U32 => "u32",
            Kind::I64 => "i64",
            Kind::U64 => "u64",
            Kind::F32 => "f32",
            Kind::F64 => "f64",
            Kind::Decimal => "decimal",
        }
    }

    /// Looks a kind up by its [`name`](Self::name).
    pub fn from_name(name: &str) -> Option<Kind> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Value
// ============================================================================

/// A primitive value tagged with its kind.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Value {
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    Decimal(Decimal),
}

impl Value {
    #[inline(always)]
    pub const fn kind(&self) -> Kind {
        match self {
            Value::I8(_) => Kind::I8,
            Value::U8(_) => Kind::U8,
            Value::I16(_) => Kind::I16,
            Value::U16(_) => Kind::U16,
            Value::I32(_) => Kind::I32,
            Value::U32(_) => Kind::U32,
            Value::I64(_) => Kind::I64,
            Value::U64(_) => Kind::U64,
            Value::F32(_) => Kind::F32,
            Value::F64(_) => Kind::F64,
            Value::Decimal(_) => Kind::Decimal,
        }
    }

    #[inline(always)]
    pub fn is_nan(&self) -> bool {
        match self {
            Value::F32(v) => v.is_nan(),
            Value::F64(v) => v.is_nan(),
            _ => false,
        }
    }

    #[inline(always)]
    pub fn is_infinite(&self) -> bool {
        match self {
            Value::F32(v) => v.is_infinite(),
            Value::F64(v) => v.is_infinite(),
            _ => false,
        }
    }

    /// Compares two values bit-for-bit: NaN payloads and signed zeros count,
    /// decimals compare by their encoded mantissa and scale.
    pub fn bit_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::F32(a), Value::F32(b)) => a.to_bits() == b.to_bits(),
            (Value::F64(a), Value::F64(b)) => a.to_bits() == b.to_bits(),
            (Value::Decimal(a), Value::Decimal(b)) => a.serialize() == b.serialize(),
            (a, b) => a == b,
        }
    }
}

// ============================================================================
// Primitive binding
// ============================================================================

mod private {
    pub trait Sealed {}
}

/// Binds a Rust numeric type to its [`Kind`].
pub trait Primitive: Copy + PartialOrd + PartialEq + fmt::Debug + Send + Sync + 'static + private::Sealed {
    const KIND: Kind;
    const MIN: Self;
    const MAX: Self;
    const ZERO: Self;
    const ONE: Self;

    fn into_value(self) -> Value;

    /// Returns `None` when `value` holds a different kind.
    fn from_value(value: Value) -> Option<Self>;

    #[inline(always)]
    fn is_nan(self) -> bool {
        false
    }
}

/// Fixed-width integer kinds, viewed through an `i128` working value.
pub trait Integer: Primitive + Ord + Eq + Hash {
    const BITS: u32;

    fn to_i128(self) -> i128;

    /// Keeps the low `BITS` bits of `value`, as an unchecked `as` cast does.
    fn wrapping_from_i128(value: i128) -> Self;

    /// Unchecked float cast: truncates toward zero, NaN becomes zero and
    /// out-of-range input saturates.
    fn cast_from_f64(value: f64) -> Self;

    #[inline(always)]
    fn min_i128() -> i128 {
        Self::MIN.to_i128()
    }

    #[inline(always)]
    fn max_i128() -> i128 {
        Self::MAX.to_i128()
    }

    #[inline(always)]
    fn checked_from_i128(value: i128) -> Option<Self> {
        if value < Self::min_i128() || value > Self::max_i128() {
            None
        } else {
            Some(Self::wrapping_from_i128(value))
        }
    }
}

macro_rules! impl_primitive {
    ($t:ty, $variant:ident, $zero:expr, $one:expr) => {
        impl_primitive!($t, $variant, $zero, $one, |_v| false);
    };
    ($t:ty, $variant:ident, $zero:expr, $one:expr, |$v:ident| $nan:expr) => {
        impl private::Sealed for $t {}

        impl Primitive for $t {
            const KIND: Kind = Kind::$variant;
            const MIN: Self = <$t>::MIN;
            const MAX: Self = <$t>::MAX;
            const ZERO: Self = $zero;
            const ONE: Self = $one;

            #[inline(always)]
            fn into_value(self) -> Value {
                Value::$variant(self)
            }

            #[inline(always)]
            fn from_value(value: Value) -> Option<Self> {
                match value {
                    Value::$variant(v) => Some(v),
                    _ => None,
                }
            }

            #[inline(always)]
            fn is_nan(self) -> bool {
                let $v = self;
                $nan
            }
        }

        impl From<$t> for Value {
            #[inline(always)]
            fn from(value: $t) -> Self {
                Value::$variant(value)
            }
        }
    };
}

macro_rules! impl_integer {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl_primitive!($t, $variant, 0, 1);

            impl Integer for $t {
                const BITS: u32 = <$t>::BITS;

                #[inline(always)]
                fn to_i128(self) -> i128 {
                    self as i128
                }

                #[inline(always)]
                fn wrapping_from_i128(value: i128) -> Self {
                    value as $t
                }

                #[inline(always)]
                fn cast_from_f64(value: f64) -> Self {
                    value as $t
                }
            }
        )*
    };
}

impl_integer!(
    i8 => I8,
    u8 => U8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
);

macro_rules! impl_float {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl_primitive!($t, $variant, 0.0, 1.0, |v| v.is_nan());
        )*
    };
}

impl_float!(f32 => F32, f64 => F64);

impl_primitive!(Decimal, Decimal, Decimal::ZERO, Decimal::ONE);
