//! Overflow-aware conversion and arithmetic for primitive numeric kinds
//!
//! This library is the shared core behind numeric wrapper types. It covers
//! eleven primitive kinds (`i8` through `u64`, `f32`, `f64` and a 96-bit
//! decimal) and offers four independent, pure utilities:
//!
//! - **Conversion** ([`convert`]): converts between any two kinds under an
//!   explicit [`ConversionMode`] (`Default`, `Cast`, `Clamp`, `CastClamp`)
//!   with pinned edge-case behaviour for NaN, infinities and out-of-range input.
//! - **Saturating arithmetic** ([`ClampedArithmetic`]): add, subtract,
//!   multiply, divide, remainder and power that pin to the kind's bounds
//!   instead of wrapping, panicking or producing NaN/Infinity.
//! - **Scaled arithmetic** ([`scaled`], [`parse`]): rounding of fixed-point
//!   integers under five [`MidpointRounding`] policies and culture-aware
//!   decimal parsing into a scaled integer.
//! - **Byte codec** ([`codec`]): fixed-width little-endian encoding with
//!   bit-exact round-trips, including NaN payloads.
//!
//! ## Example
//!
//! ```rust
//! use primnum::{ClampedArithmetic, ConversionMode, Culture, MidpointRounding, NumberStyles};
//!
//! // Conversion
//! let byte: u8 = primnum::convert(300i32, ConversionMode::Clamp).unwrap();
//! assert_eq!(byte, 255);
//!
//! // Saturating arithmetic
//! assert_eq!(i8::MAX.clamped_add(1), i8::MAX);
//! assert_eq!(7u16.clamped_div(0), u16::MAX);
//!
//! // Scaled arithmetic
//! assert_eq!(primnum::round(15i64, MidpointRounding::ToEven), 20);
//! let cents: i64 = primnum::parse_scaled(
//!     "1.234,56",
//!     100,
//!     NumberStyles::ALLOW_THOUSANDS,
//!     Culture::from_name("da-DK").unwrap(),
//! )
//! .unwrap();
//! assert_eq!(cents, 123_456);
//!
//! // Byte codec
//! let bytes = primnum::encode(f64::NAN);
//! let back: f64 = primnum::decode(Some(&bytes[..]), 0).unwrap();
//! assert_eq!(back.to_bits(), f64::NAN.to_bits());
//! ```

pub mod codec;
pub mod convert;
pub mod culture;
pub mod kind;
pub mod parse;
pub mod saturating;
pub mod scaled;

pub use codec::{FixedWidth, decode, decode_at, decode_iter, encode, encode_into, encode_slice};
pub use convert::{CONVERSIONS, Conversion, ConversionMode, convert};
pub use culture::Culture;
pub use kind::{Integer, Kind, Primitive, Value};
pub use parse::{NumberStyles, parse_scaled, parse_scaled_in};
pub use rust_decimal::Decimal;
pub use saturating::ClampedArithmetic;
pub use scaled::{MidpointRounding, ScaledInteger, rescale, round, round_digits};

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericError {
    #[error("parameter `{parameter}`: {value} is not a recognized conversion mode")]
    UnrecognizedMode { parameter: &'static str, value: u8 },

    #[error("parameter `{parameter}`: {value} is not a recognized midpoint rounding policy")]
    UnrecognizedRounding { parameter: &'static str, value: u8 },

    #[error("kind mismatch: expected {expected}, found {found}")]
    KindMismatch { expected: Kind, found: Kind },

    #[error("overflow: {from} value cannot be represented as {to}")]
    Overflow { from: Kind, to: Kind },

    #[error("invalid numeric format")]
    InvalidFormat,

    #[error("unknown culture")]
    UnknownCulture,

    #[error("scaling factor must be positive")]
    InvalidScalingFactor,

    #[error("missing buffer")]
    MissingBuffer,

    #[error("empty buffer")]
    EmptyBuffer,

    #[error("reading {width} bytes at offset {offset} overruns a buffer of {len} bytes")]
    OutOfRange {
        offset: usize,
        width: usize,
        len: usize,
    },

    #[error("malformed decimal: invalid scale or reserved flag bits")]
    MalformedDecimal,
}

pub type Result<T> = core::result::Result<T, NumericError>;
