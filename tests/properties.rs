//! Property-based tests for conversion, saturation, scaling and the codec.
//!
//! These use proptest to check the algebraic guarantees over random inputs:
//! 1. `Cast` agrees with Rust's `as` for every numeric pair
//! 2. Saturating arithmetic equals exact arithmetic pinned to the bounds
//! 3. Rounding is idempotent and stays within one unit of the input
//! 4. Codec round trips are bit-exact

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use primnum::{
    ClampedArithmetic, ConversionMode, Culture, Decimal, MidpointRounding, NumberStyles, Value,
    convert, decode_at, encode, parse_scaled, rescale, round, round_digits,
};
use proptest::prelude::*;

// -- Strategies --

fn any_float() -> impl Strategy<Value = f64> {
    prop_oneof![
        any::<f64>(),
        (-1e20f64..1e20),
        (-300.0f64..300.0),
        Just(f64::NAN),
        Just(f64::INFINITY),
        Just(f64::NEG_INFINITY),
        Just(-0.0),
    ]
}

fn any_decimal() -> impl Strategy<Value = Decimal> {
    (any::<u32>(), any::<u32>(), any::<u32>(), any::<bool>(), 0u32..=28)
        .prop_map(|(lo, mid, hi, negative, scale)| Decimal::from_parts(lo, mid, hi, negative, scale))
}

fn any_rounding() -> impl Strategy<Value = MidpointRounding> {
    prop::sample::select(MidpointRounding::ALL.to_vec())
}

// -- Conversion --

proptest! {
    #[test]
    fn cast_matches_as_from_float(v in any_float()) {
        prop_assert_eq!(convert::<f64, i8>(v, ConversionMode::Cast).unwrap(), v as i8);
        prop_assert_eq!(convert::<f64, u16>(v, ConversionMode::Cast).unwrap(), v as u16);
        prop_assert_eq!(convert::<f64, i32>(v, ConversionMode::Cast).unwrap(), v as i32);
        prop_assert_eq!(convert::<f64, u64>(v, ConversionMode::Cast).unwrap(), v as u64);
        let single = convert::<f64, f32>(v, ConversionMode::Cast).unwrap();
        prop_assert_eq!(single.to_bits(), (v as f32).to_bits());
    }

    #[test]
    fn cast_matches_as_from_integer(v in any::<i64>()) {
        prop_assert_eq!(convert::<i64, u8>(v, ConversionMode::Cast).unwrap(), v as u8);
        prop_assert_eq!(convert::<i64, i16>(v, ConversionMode::Cast).unwrap(), v as i16);
        prop_assert_eq!(convert::<i64, u32>(v, ConversionMode::Cast).unwrap(), v as u32);
        prop_assert_eq!(convert::<i64, u64>(v, ConversionMode::Cast).unwrap(), v as u64);
        prop_assert_eq!(convert::<i64, f64>(v, ConversionMode::Cast).unwrap(), v as f64);
    }

    #[test]
    fn cast_matches_as_from_single(bits in any::<u32>()) {
        let v = f32::from_bits(bits);
        let same = convert::<f32, f32>(v, ConversionMode::Cast).unwrap();
        prop_assert_eq!(same.to_bits(), bits);
        let checked = convert::<f32, f32>(v, ConversionMode::Default).unwrap();
        prop_assert_eq!(checked.to_bits(), bits);
        let double = convert::<f32, f64>(v, ConversionMode::Cast).unwrap();
        if v.is_nan() {
            prop_assert!(double.is_nan());
        } else {
            prop_assert_eq!(double.to_bits(), (v as f64).to_bits());
        }
        prop_assert_eq!(convert::<f32, i16>(v, ConversionMode::Cast).unwrap(), v as i16);
        prop_assert_eq!(convert::<f32, u32>(v, ConversionMode::Cast).unwrap(), v as u32);
        prop_assert_eq!(convert::<f32, i64>(v, ConversionMode::Cast).unwrap(), v as i64);
    }

    #[test]
    fn cast_matches_as_from_unsigned(v in any::<u64>()) {
        prop_assert_eq!(convert::<u64, i8>(v, ConversionMode::Cast).unwrap(), v as i8);
        prop_assert_eq!(convert::<u64, u16>(v, ConversionMode::Cast).unwrap(), v as u16);
        prop_assert_eq!(convert::<u64, i64>(v, ConversionMode::Cast).unwrap(), v as i64);
        prop_assert_eq!(convert::<u64, u64>(v, ConversionMode::Cast).unwrap(), v);
        let single = convert::<u64, f32>(v, ConversionMode::Cast).unwrap();
        prop_assert_eq!(single.to_bits(), (v as f32).to_bits());
        let double = convert::<u64, f64>(v, ConversionMode::Cast).unwrap();
        prop_assert_eq!(double.to_bits(), (v as f64).to_bits());
    }

    #[test]
    fn cast_matches_as_same_kind(v in any::<u64>()) {
        let double = f64::from_bits(v);
        let same = convert::<f64, f64>(double, ConversionMode::Cast).unwrap();
        prop_assert_eq!(same.to_bits(), v);
        let signed = v as i64;
        prop_assert_eq!(convert::<i64, i64>(signed, ConversionMode::Cast).unwrap(), signed);
    }

    #[test]
    fn default_float_to_int_is_checked_round_half_even(v in any_float()) {
        let rounded = v.round_ties_even();
        match convert::<f64, i32>(v, ConversionMode::Default) {
            Ok(n) => prop_assert_eq!(f64::from(n), rounded),
            Err(_) => prop_assert!(!v.is_finite() || rounded < f64::from(i32::MIN) || rounded > f64::from(i32::MAX)),
        }
    }

    #[test]
    fn clamp_stays_in_range(v in any_float()) {
        let n = convert::<f64, i16>(v, ConversionMode::Clamp).unwrap();
        if v.is_nan() {
            prop_assert_eq!(n, 0);
        } else if v >= 32767.0 {
            prop_assert_eq!(n, i16::MAX);
        } else if v <= -32768.0 {
            prop_assert_eq!(n, i16::MIN);
        } else {
            prop_assert_eq!(n, v as i16);
        }
    }

    #[test]
    fn integer_widening_round_trips(v in any::<i32>()) {
        let wide: i64 = convert(v, ConversionMode::Default).unwrap();
        let back: i32 = convert(wide, ConversionMode::Default).unwrap();
        prop_assert_eq!(back, v);
        let dec: Decimal = convert(v, ConversionMode::Default).unwrap();
        prop_assert_eq!(dec, Decimal::from(v));
    }
}

// -- Saturating arithmetic --

fn pin_i32(v: i128) -> i32 {
    v.clamp(i128::from(i32::MIN), i128::from(i32::MAX)) as i32
}

proptest! {
    #[test]
    fn integer_ops_equal_pinned_exact(a in any::<i32>(), b in any::<i32>()) {
        let (x, y) = (i128::from(a), i128::from(b));
        prop_assert_eq!(a.clamped_add(b), pin_i32(x + y));
        prop_assert_eq!(a.clamped_sub(b), pin_i32(x - y));
        prop_assert_eq!(a.clamped_mul(b), pin_i32(x * y));
        if b == 0 {
            prop_assert_eq!(a.clamped_div(b), i32::MAX);
            prop_assert_eq!(a.clamped_rem(b), 0);
        } else {
            prop_assert_eq!(a.clamped_div(b), pin_i32(x / y));
            prop_assert_eq!(a.clamped_rem(b), pin_i32(x % y));
        }
    }

    #[test]
    fn unsigned_ops_never_wrap(a in any::<u64>(), b in any::<u64>()) {
        prop_assert_eq!(a.clamped_add(b), a.saturating_add(b));
        prop_assert_eq!(a.clamped_sub(b), a.saturating_sub(b));
        prop_assert_eq!(a.clamped_mul(b), a.saturating_mul(b));
    }

    #[test]
    fn integer_pow_matches_checked(base in -20i64..20, exp in 0i64..70) {
        let expected = match base.checked_pow(exp as u32) {
            Some(v) => v,
            None if base < 0 && exp % 2 == 1 => i64::MIN,
            None => i64::MAX,
        };
        prop_assert_eq!(base.clamped_pow(exp), expected);
    }

    #[test]
    fn float_results_are_finite(a in any_float(), b in any_float()) {
        for r in [
            a.clamped_add(b),
            a.clamped_sub(b),
            a.clamped_mul(b),
            a.clamped_div(b),
            a.clamped_rem(b),
            a.clamped_pow(b),
        ] {
            prop_assert!(r.is_finite());
        }
        prop_assert_eq!(a.clamped_pow(0.0), 1.0);
        if !a.is_nan() {
            prop_assert_eq!(a.clamped_div(0.0), f64::MAX);
        }
    }

    #[test]
    fn decimal_ops_never_panic(a in any_decimal(), b in any_decimal()) {
        let _ = a.clamped_add(b);
        let _ = a.clamped_sub(b);
        let _ = a.clamped_mul(b);
        let _ = a.clamped_div(b);
        let _ = a.clamped_rem(b);
        let _ = a.clamped_pow(b);
        prop_assert_eq!(a.clamped_div(Decimal::ZERO), Decimal::MAX);
        prop_assert_eq!(a.clamped_rem(Decimal::ZERO), Decimal::ZERO);
    }
}

// -- Scaled arithmetic --

proptest! {
    #[test]
    fn round_is_idempotent(v in any::<i64>(), mode in any_rounding()) {
        let once = round(v, mode);
        prop_assert_eq!(round(once, mode), once);
    }

    #[test]
    fn round_digits_stays_within_one_unit(v in any::<i64>(), digits in 0u32..=18, mode in any_rounding()) {
        let factor = 10i128.pow(digits);
        let r = i128::from(round_digits(v, digits, mode));
        prop_assert_eq!(r % factor, 0);
        prop_assert!((r - i128::from(v)).abs() < factor);
    }

    #[test]
    fn nearest_modes_mirror_around_zero(v in -1_000_000_000i64..1_000_000_000, digits in 0u32..6) {
        for mode in [MidpointRounding::ToEven, MidpointRounding::AwayFromZero, MidpointRounding::ToZero] {
            prop_assert_eq!(round_digits(-v, digits, mode), -round_digits(v, digits, mode));
        }
    }

    #[test]
    fn rescale_up_then_down_is_identity(v in -1_000_000i64..1_000_000, from in 0u32..6, extra in 0u32..6, mode in any_rounding()) {
        let up = rescale(v, from, from + extra, mode);
        prop_assert_eq!(rescale(up, from + extra, from, mode), v);
    }

    #[test]
    fn parse_reads_formatted_cents(whole in -1_000_000_000i64..1_000_000_000, cents in 0i64..100) {
        let text = format!("{}{}.{:02}", if whole < 0 { "-" } else { "" }, whole.abs(), cents);
        let sign = if whole < 0 { -1 } else { 1 };
        let parsed: i64 = parse_scaled(&text, 100, NumberStyles::NUMBER, &Culture::INVARIANT).unwrap();
        prop_assert_eq!(parsed, sign * (whole.abs() * 100 + cents));
    }

    #[test]
    fn parse_rounds_like_decimal(whole in 0u32..1_000_000, frac in 0u32..1_000) {
        let text = format!("{whole}.{frac:03}");
        let parsed: u64 = parse_scaled(&text, 10, NumberStyles::NUMBER, &Culture::INVARIANT).unwrap();
        let exact = Decimal::new(i64::from(whole) * 1_000 + i64::from(frac), 3) * Decimal::TEN;
        let expected = exact.round_dp_with_strategy(0, rust_decimal::RoundingStrategy::MidpointAwayFromZero);
        prop_assert_eq!(Decimal::from(parsed), expected);
    }
}

// -- Codec --

proptest! {
    #[test]
    fn float_codec_is_bit_exact(bits in any::<u64>()) {
        let v = f64::from_bits(bits);
        let back: f64 = decode_at(&encode(v), 0).unwrap();
        prop_assert_eq!(back.to_bits(), bits);
    }

    #[test]
    fn single_codec_is_bit_exact(bits in any::<u32>()) {
        let v = f32::from_bits(bits);
        let back: f32 = decode_at(&encode(v), 0).unwrap();
        prop_assert_eq!(back.to_bits(), bits);
    }

    #[test]
    fn integer_codec_round_trips(v in any::<i64>(), w in any::<u16>()) {
        prop_assert_eq!(decode_at::<i64>(&encode(v), 0).unwrap(), v);
        prop_assert_eq!(decode_at::<u16>(&encode(w), 0).unwrap(), w);
    }

    #[test]
    fn decimal_codec_is_bit_exact(d in any_decimal()) {
        let back: Decimal = decode_at(&encode(d), 0).unwrap();
        prop_assert_eq!(back.serialize(), d.serialize());
    }

    #[test]
    fn value_codec_round_trips_at_offset(v in any_float(), offset in 0usize..8) {
        let value = Value::F64(v);
        let mut buf = [0u8; 16];
        let end = value.encode_into(&mut buf, offset).unwrap();
        prop_assert_eq!(end, offset + 8);
        let back = Value::decode(value.kind(), &buf, offset).unwrap();
        prop_assert!(back.bit_eq(&value));
    }
}
