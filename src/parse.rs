//! Culture-aware parsing of decimal text into a scaled integer.
//!
//! The text is read into an exact decimal mantissa and exponent, multiplied
//! by the caller's scaling factor and rounded half away from zero:
//! `"123.999"` at factor `10` is `1239.99`, which parses as `1240`.

use bitflags::bitflags;
use ethnum::i256;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::culture::Culture;
use crate::kind::{Integer, Kind};
use crate::{NumericError, Result};

bitflags! {
    /// Which textual elements a parse accepts.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct NumberStyles: u32 {
        const ALLOW_LEADING_WHITE = 0x0001;
        const ALLOW_TRAILING_WHITE = 0x0002;
        const ALLOW_LEADING_SIGN = 0x0004;
        const ALLOW_TRAILING_SIGN = 0x0008;
        const ALLOW_PARENTHESES = 0x0010;
        const ALLOW_DECIMAL_POINT = 0x0020;
        const ALLOW_THOUSANDS = 0x0040;
        const ALLOW_EXPONENT = 0x0080;
        const ALLOW_HEX_SPECIFIER = 0x0200;

        const INTEGER = Self::ALLOW_LEADING_WHITE.bits()
            | Self::ALLOW_TRAILING_WHITE.bits()
            | Self::ALLOW_LEADING_SIGN.bits();
        const NUMBER = Self::INTEGER.bits()
            | Self::ALLOW_TRAILING_SIGN.bits()
            | Self::ALLOW_DECIMAL_POINT.bits()
            | Self::ALLOW_THOUSANDS.bits();
        const FLOAT = Self::INTEGER.bits()
            | Self::ALLOW_DECIMAL_POINT.bits()
            | Self::ALLOW_EXPONENT.bits();
        const HEX_NUMBER = Self::ALLOW_LEADING_WHITE.bits()
            | Self::ALLOW_TRAILING_WHITE.bits()
            | Self::ALLOW_HEX_SPECIFIER.bits();
        const ANY = Self::NUMBER.bits()
            | Self::ALLOW_PARENTHESES.bits()
            | Self::ALLOW_EXPONENT.bits();
    }
}

impl NumberStyles {
    /// Elements every decimal parse accepts regardless of the requested style.
    const IMPLIED: NumberStyles = NumberStyles::INTEGER.union(NumberStyles::ALLOW_DECIMAL_POINT);
}

impl Default for NumberStyles {
    fn default() -> Self {
        NumberStyles::NUMBER
    }
}

/// Mantissa digits kept before the rest are truncated.
const MAX_SIGNIFICANT_DIGITS: u32 = 50;
/// Hex digits that fit a 128-bit magnitude.
const MAX_HEX_DIGITS: u32 = 32;
/// Explicit exponents saturate here; anything larger overflows every kind.
const EXPONENT_LIMIT: i64 = 100_000;

const TEN: i256 = i256::new(10);

/// Parses culture-formatted decimal `text`, multiplies it by
/// `scaling_factor` and rounds half away from zero into `T`.
///
/// The decimal point, surrounding whitespace and a leading sign are always
/// accepted; `style` enables group separators, trailing signs, parentheses,
/// exponents or hexadecimal digits.
///
/// Hexadecimal text is read as an unsigned magnitude, never as two's
/// complement: `"FF"` into an `i8` is [`NumericError::Overflow`], not `-1`.
///
/// ```rust
/// use primnum::{Culture, NumberStyles, parse_scaled};
///
/// let us = Culture::from_name("en-US").unwrap();
/// assert_eq!(parse_scaled("123.999", 10i64, NumberStyles::default(), us), Ok(1240));
/// assert_eq!(parse_scaled("1,234.56", 100i64, NumberStyles::ALLOW_THOUSANDS, us), Ok(123_456));
/// ```
///
/// # Errors
/// - [`NumericError::InvalidScalingFactor`] when `scaling_factor <= 0`
/// - [`NumericError::InvalidFormat`] for malformed text, or any negative
///   sign when `T` is unsigned
/// - [`NumericError::Overflow`] when the scaled result does not fit `T`
pub fn parse_scaled<T: Integer>(
    text: &str,
    scaling_factor: T,
    style: NumberStyles,
    culture: &Culture,
) -> Result<T> {
    if scaling_factor <= T::ZERO {
        tracing::debug!(factor = ?scaling_factor, "non-positive scaling factor");
        return Err(NumericError::InvalidScalingFactor);
    }

    let number = if style.contains(NumberStyles::ALLOW_HEX_SPECIFIER) {
        parse_hex(text, style, T::KIND)
    } else {
        parse_decimal(text, style | NumberStyles::IMPLIED, culture)
    }
    .inspect_err(|err| tracing::debug!(text, %culture, ?style, %err, "parse failed"))?;

    if number.negative && !T::KIND.is_signed() {
        tracing::debug!(text, kind = %T::KIND, "negative text for unsigned kind");
        return Err(NumericError::InvalidFormat);
    }
    number.scale(scaling_factor.to_i128())
}

/// [`parse_scaled`] with the culture given by name.
///
/// # Errors
/// [`NumericError::UnknownCulture`] for a name outside the built-in table,
/// otherwise as [`parse_scaled`].
pub fn parse_scaled_in<T: Integer>(
    text: &str,
    scaling_factor: T,
    style: NumberStyles,
    culture_name: &str,
) -> Result<T> {
    parse_scaled(text, scaling_factor, style, Culture::from_name(culture_name)?)
}

// ============================================================================
// Scanning
// ============================================================================

/// An exact parsed value: `mantissa * 10^exponent`.
#[derive(Copy, Clone, Debug)]
struct ParsedNumber {
    negative: bool,
    mantissa: i256,
    exponent: i64,
}

impl ParsedNumber {
    /// Multiplies by `factor`, rounds half away from zero and narrows into `T`.
    fn scale<T: Integer>(self, factor: i128) -> Result<T> {
        let overflow = NumericError::Overflow {
            from: Kind::Decimal,
            to: T::KIND,
        };
        // At most 50 decimal or 32 hex digits times a 64-bit factor: fits.
        let product = self.mantissa * i256::from(factor);

        let magnitude = if product == i256::ZERO {
            i256::ZERO
        } else if self.exponent >= 0 {
            if self.exponent > 80 {
                return Err(overflow);
            }
            let mut value = product;
            for _ in 0..self.exponent {
                value = value.checked_mul(TEN).ok_or(overflow)?;
            }
            value
        } else if self.exponent < -76 {
            // 10^77 no longer fits, and the product is far below half of it.
            i256::ZERO
        } else {
            let mut divisor = i256::ONE;
            for _ in 0..-self.exponent {
                divisor *= TEN;
            }
            let quotient = product / divisor;
            let remainder = product % divisor;
            if remainder + remainder >= divisor {
                quotient + i256::ONE
            } else {
                quotient
            }
        };

        let value = if self.negative { -magnitude } else { magnitude };
        if value < i256::new(T::min_i128()) || value > i256::new(T::max_i128()) {
            tracing::debug!(kind = %T::KIND, "scaled value out of range");
            return Err(overflow);
        }
        Ok(T::wrapping_from_i128(value.as_i128()))
    }
}

/// Byte-position reader over the remaining text.
struct Cursor<'a> {
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Cursor { rest: text }
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.rest.chars().next()
    }

    #[inline]
    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.rest = &self.rest[c.len_utf8()..];
        }
    }

    /// Consumes the next char if `accept` matches it.
    #[inline]
    fn eat(&mut self, accept: impl Fn(char) -> bool) -> bool {
        match self.peek() {
            Some(c) if accept(c) => {
                self.bump();
                true
            }
            _ => false,
        }
    }

    #[inline]
    fn skip_white(&mut self) {
        self.rest = self.rest.trim_start_matches(is_white);
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.rest.is_empty()
    }
}

#[inline(always)]
fn is_white(c: char) -> bool {
    matches!(c, '\u{9}'..='\u{d}' | ' ')
}

fn parse_decimal(text: &str, style: NumberStyles, culture: &Culture) -> Result<ParsedNumber> {
    let mut cursor = Cursor::new(text);
    if style.contains(NumberStyles::ALLOW_LEADING_WHITE) {
        cursor.skip_white();
    }

    let mut negative = false;
    let mut signed = false;
    let mut parenthesized = false;
    if style.contains(NumberStyles::ALLOW_PARENTHESES) && cursor.eat(|c| c == '(') {
        negative = true;
        parenthesized = true;
    } else if style.contains(NumberStyles::ALLOW_LEADING_SIGN) {
        if cursor.eat(|c| culture.is_negative_sign(c)) {
            negative = true;
            signed = true;
        } else if cursor.eat(|c| culture.is_positive_sign(c)) {
            signed = true;
        }
    }

    let mut mantissa = i256::ZERO;
    let mut exponent: i64 = 0;
    let mut significant = 0u32;
    let mut digits = 0u32;
    let mut seen_point = false;

    while let Some(c) = cursor.peek() {
        if let Some(digit) = c.to_digit(10) {
            digits = digits.saturating_add(1);
            if mantissa == i256::ZERO && digit == 0 {
                // Leading zero: only shifts the scale.
                if seen_point {
                    exponent -= 1;
                }
            } else if significant < MAX_SIGNIFICANT_DIGITS {
                mantissa = mantissa * TEN + i256::from(digit);
                significant += 1;
                if seen_point {
                    exponent -= 1;
                }
            } else if !seen_point {
                exponent += 1;
            }
        } else if !seen_point
            && style.contains(NumberStyles::ALLOW_DECIMAL_POINT)
            && c == culture.decimal_separator
        {
            seen_point = true;
        } else if !seen_point
            && digits > 0
            && style.contains(NumberStyles::ALLOW_THOUSANDS)
            && culture.is_group_separator(c)
        {
            // Group separators carry no value.
        } else {
            break;
        }
        cursor.bump();
    }

    if digits == 0 {
        return Err(NumericError::InvalidFormat);
    }

    if style.contains(NumberStyles::ALLOW_EXPONENT) && cursor.eat(|c| c == 'e' || c == 'E') {
        let exponent_negative = if cursor.eat(|c| culture.is_negative_sign(c)) {
            true
        } else {
            cursor.eat(|c| culture.is_positive_sign(c));
            false
        };
        let mut explicit: i64 = 0;
        let mut any = false;
        while let Some(digit) = cursor.peek().and_then(|c| c.to_digit(10)) {
            explicit = (explicit * 10 + i64::from(digit)).min(EXPONENT_LIMIT);
            any = true;
            cursor.bump();
        }
        if !any {
            return Err(NumericError::InvalidFormat);
        }
        exponent += if exponent_negative { -explicit } else { explicit };
    }

    if style.contains(NumberStyles::ALLOW_TRAILING_SIGN) && !signed && !parenthesized {
        if cursor.eat(|c| culture.is_negative_sign(c)) {
            negative = true;
        } else {
            cursor.eat(|c| culture.is_positive_sign(c));
        }
    }
    if parenthesized && !cursor.eat(|c| c == ')') {
        return Err(NumericError::InvalidFormat);
    }
    if style.contains(NumberStyles::ALLOW_TRAILING_WHITE) {
        cursor.skip_white();
    }
    if !cursor.is_empty() {
        return Err(NumericError::InvalidFormat);
    }

    Ok(ParsedNumber {
        negative,
        mantissa,
        exponent,
    })
}

/// Hex digits only: no sign, point or group separators.
fn parse_hex(text: &str, style: NumberStyles, target: Kind) -> Result<ParsedNumber> {
    let mut cursor = Cursor::new(text);
    if style.contains(NumberStyles::ALLOW_LEADING_WHITE) {
        cursor.skip_white();
    }

    let mut mantissa = i256::ZERO;
    let mut significant = 0u32;
    let mut digits = 0u32;
    while let Some(digit) = cursor.peek().and_then(|c| c.to_digit(16)) {
        digits = digits.saturating_add(1);
        if mantissa != i256::ZERO || digit != 0 {
            if significant == MAX_HEX_DIGITS {
                return Err(NumericError::Overflow {
                    from: Kind::Decimal,
                    to: target,
                });
            }
            mantissa = (mantissa << 4) | i256::from(digit);
            significant += 1;
        }
        cursor.bump();
    }

    if style.contains(NumberStyles::ALLOW_TRAILING_WHITE) {
        cursor.skip_white();
    }
    if digits == 0 || !cursor.is_empty() {
        return Err(NumericError::InvalidFormat);
    }

    Ok(ParsedNumber {
        negative: false,
        mantissa,
        exponent: 0,
    })
}
