//! Fixed-width little-endian byte codec.
//!
//! Every kind encodes to exactly [`Kind::byte_width`] bytes. Floats keep
//! their bit pattern, so NaN payloads, signed zeros and infinities survive a
//! round trip. Decimals use a 16-byte layout: the 96-bit mantissa as three
//! little-endian words (lo, mid, hi) followed by a flags word holding the
//! scale in bits 16..24 and the sign in bit 31.

use core::fmt;
use core::slice::ChunksExact;

use rust_decimal::Decimal;

use crate::kind::{Kind, Primitive, Value};
use crate::{NumericError, Result};

/// Bits of the decimal flags word that must be zero.
const DECIMAL_RESERVED_MASK: u32 = 0x7F00_FFFF;
const DECIMAL_MAX_SCALE: u32 = 28;

/// A primitive with a stable little-endian byte form.
pub trait FixedWidth: Primitive {
    const BYTES: usize;

    type Bytes: AsRef<[u8]> + AsMut<[u8]> + Default + Copy + fmt::Debug;

    fn encode_le(self) -> Self::Bytes;

    /// # Errors
    /// [`NumericError::MalformedDecimal`] for decimal flags with reserved bits
    /// set or a scale above 28. Other kinds accept every bit pattern.
    fn decode_le(bytes: Self::Bytes) -> Result<Self>;
}

macro_rules! impl_fixed_width {
    ($($t:ty),* $(,)?) => {
        $(
            impl FixedWidth for $t {
                const BYTES: usize = core::mem::size_of::<$t>();

                type Bytes = [u8; core::mem::size_of::<$t>()];

                #[inline(always)]
                fn encode_le(self) -> Self::Bytes {
                    self.to_le_bytes()
                }

                #[inline(always)]
                fn decode_le(bytes: Self::Bytes) -> Result<Self> {
                    Ok(<$t>::from_le_bytes(bytes))
                }
            }
        )*
    };
}

impl_fixed_width!(i8, u8, i16, u16, i32, u32, i64, u64, f32, f64);

impl FixedWidth for Decimal {
    const BYTES: usize = 16;

    type Bytes = [u8; 16];

    fn encode_le(self) -> Self::Bytes {
        // `serialize` is flags first, then lo, mid, hi.
        let raw = self.serialize();
        let mut bytes = [0u8; 16];
        bytes[..12].copy_from_slice(&raw[4..]);
        bytes[12..].copy_from_slice(&raw[..4]);
        bytes
    }

    fn decode_le(bytes: Self::Bytes) -> Result<Self> {
        let flags = u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]);
        let scale = (flags >> 16) & 0xFF;
        if flags & DECIMAL_RESERVED_MASK != 0 || scale > DECIMAL_MAX_SCALE {
            tracing::debug!(flags, scale, "malformed decimal flags");
            return Err(NumericError::MalformedDecimal);
        }
        let mut raw = [0u8; 16];
        raw[..4].copy_from_slice(&bytes[12..]);
        raw[4..].copy_from_slice(&bytes[..12]);
        Ok(Decimal::deserialize(raw))
    }
}

// ============================================================================
// Buffer access
// ============================================================================

/// Encodes `value` into its fixed-width little-endian form.
#[inline]
pub fn encode<T: FixedWidth>(value: T) -> T::Bytes {
    value.encode_le()
}

/// Decodes a `T` starting at `offset` of an optional buffer.
///
/// # Errors
/// - [`NumericError::MissingBuffer`] when `buffer` is `None`
/// - [`NumericError::EmptyBuffer`] when it holds no bytes
/// - [`NumericError::OutOfRange`] when the read would pass the end
/// - [`NumericError::MalformedDecimal`] as [`FixedWidth::decode_le`]
pub fn decode<T: FixedWidth>(buffer: Option<&[u8]>, offset: usize) -> Result<T> {
    let Some(buffer) = buffer else {
        tracing::debug!(kind = %T::KIND, "decode without a buffer");
        return Err(NumericError::MissingBuffer);
    };
    decode_at(buffer, offset)
}

/// Decodes a `T` starting at `offset` of `buffer`.
///
/// # Errors
/// As [`decode`], minus [`NumericError::MissingBuffer`].
pub fn decode_at<T: FixedWidth>(buffer: &[u8], offset: usize) -> Result<T> {
    if buffer.is_empty() {
        tracing::debug!(kind = %T::KIND, "decode from an empty buffer");
        return Err(NumericError::EmptyBuffer);
    }
    let end = span(buffer.len(), offset, T::BYTES)?;
    let mut bytes = T::Bytes::default();
    bytes.as_mut().copy_from_slice(&buffer[offset..end]);
    T::decode_le(bytes)
}

/// Writes `value` at `offset` and returns the offset just past it.
///
/// # Errors
/// [`NumericError::OutOfRange`] when `buffer` is too short.
pub fn encode_into<T: FixedWidth>(value: T, buffer: &mut [u8], offset: usize) -> Result<usize> {
    let end = span(buffer.len(), offset, T::BYTES)?;
    buffer[offset..end].copy_from_slice(value.encode_le().as_ref());
    Ok(end)
}

/// Packs `values` contiguously from the start of `buffer` and returns the
/// number of bytes written. Nothing is written when they do not all fit.
///
/// # Errors
/// [`NumericError::OutOfRange`] when `buffer` is too short.
pub fn encode_slice<T: FixedWidth>(values: &[T], buffer: &mut [u8]) -> Result<usize> {
    let total = values.len().saturating_mul(T::BYTES);
    span(buffer.len(), 0, total)?;
    for (value, chunk) in values.iter().zip(buffer.chunks_exact_mut(T::BYTES)) {
        chunk.copy_from_slice(value.encode_le().as_ref());
    }
    Ok(total)
}

/// Iterates over values packed contiguously in `buffer`.
///
/// A trailing fragment shorter than one value yields a single
/// [`NumericError::OutOfRange`].
pub fn decode_iter<T: FixedWidth>(buffer: &[u8]) -> PackedIter<'_, T> {
    let chunks = buffer.chunks_exact(T::BYTES);
    let fragment = chunks.remainder().len();
    let trailing = (fragment != 0).then(|| NumericError::OutOfRange {
        offset: buffer.len() - fragment,
        width: T::BYTES,
        len: buffer.len(),
    });
    PackedIter {
        chunks,
        trailing,
        _kind: core::marker::PhantomData,
    }
}

/// Iterator returned by [`decode_iter`].
pub struct PackedIter<'a, T> {
    chunks: ChunksExact<'a, u8>,
    trailing: Option<NumericError>,
    _kind: core::marker::PhantomData<T>,
}

impl<T: FixedWidth> Iterator for PackedIter<'_, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.chunks.next() {
            Some(chunk) => Some(decode_at(chunk, 0)),
            None => self.trailing.take().map(Err),
        }
    }
}

/// End of a `width`-byte read at `offset`, if it fits in `len` bytes.
#[inline]
fn span(len: usize, offset: usize, width: usize) -> Result<usize> {
    match offset.checked_add(width) {
        Some(end) if end <= len => Ok(end),
        _ => {
            tracing::debug!(offset, width, len, "byte range out of bounds");
            Err(NumericError::OutOfRange { offset, width, len })
        }
    }
}

// ============================================================================
// Value
// ============================================================================

impl Value {
    /// Writes this value's bytes at `offset` and returns the offset just past
    /// them.
    ///
    /// # Errors
    /// [`NumericError::OutOfRange`] when `buffer` is too short.
    pub fn encode_into(&self, buffer: &mut [u8], offset: usize) -> Result<usize> {
        match *self {
            Value::I8(v) => encode_into(v, buffer, offset),
            Value::U8(v) => encode_into(v, buffer, offset),
            Value::I16(v) => encode_into(v, buffer, offset),
            Value::U16(v) => encode_into(v, buffer, offset),
            Value::I32(v) => encode_into(v, buffer, offset),
            Value::U32(v) => encode_into(v, buffer, offset),
            Value::I64(v) => encode_into(v, buffer, offset),
            Value::U64(v) => encode_into(v, buffer, offset),
            Value::F32(v) => encode_into(v, buffer, offset),
            Value::F64(v) => encode_into(v, buffer, offset),
            Value::Decimal(v) => encode_into(v, buffer, offset),
        }
    }

    /// Reads a value of `kind` at `offset`.
    ///
    /// # Errors
    /// As [`decode_at`].
    pub fn decode(kind: Kind, buffer: &[u8], offset: usize) -> Result<Value> {
        Ok(match kind {
            Kind::I8 => Value::I8(decode_at(buffer, offset)?),
            Kind::U8 => Value::U8(decode_at(buffer, offset)?),
            Kind::I16 => Value::I16(decode_at(buffer, offset)?),
            Kind::U16 => Value::U16(decode_at(buffer, offset)?),
            Kind::I32 => Value::I32(decode_at(buffer, offset)?),
            Kind::U32 => Value::U32(decode_at(buffer, offset)?),
            Kind::I64 => Value::I64(decode_at(buffer, offset)?),
            Kind::U64 => Value::U64(decode_at(buffer, offset)?),
            Kind::F32 => Value::F32(decode_at(buffer, offset)?),
            Kind::F64 => Value::F64(decode_at(buffer, offset)?),
            Kind::Decimal => Value::Decimal(decode_at(buffer, offset)?),
        })
    }
}
