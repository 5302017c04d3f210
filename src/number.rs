//! Numeric conversions from validated JSON number text.
//!
//! Every function here expects text that already matched the JSON number
//! grammar (see [`Tokenizer`](crate::token::Tokenizer)). The functions
//! never wrap, truncate, or saturate an integer: a value outside the
//! target's domain is a [`NumericError::Overflow`].
//!
//! ## Integers
//!
//! Text is accumulated without loss (an `i64` fast path for short text,
//! [`BigInt`] otherwise) and narrowed with `TryFrom`:
//!
//! ```rust
//! use json_scalar::number::{parse_integer, NumericError};
//!
//! assert_eq!(parse_integer::<u8>("255"), Ok(255));
//! assert_eq!(parse_integer::<u8>("256"), Err(NumericError::Overflow));
//! assert_eq!(parse_integer::<u8>("-0"), Ok(0));
//! ```
//!
//! ## Floating point
//!
//! binary32 and binary64 are each parsed directly from the text with correct
//! rounding. Out-of-range magnitudes become signed infinity and the sign of
//! zero is kept.
//!
//! ```rust
//! use json_scalar::number::parse_f64;
//!
//! assert!(parse_f64("-0.0").unwrap().is_sign_negative());
//! assert_eq!(parse_f64("1e400").unwrap(), f64::INFINITY);
//! ```

use num_bigint::{BigInt, BigUint};
use rust_decimal::Decimal;

/// Largest scale a [`Decimal`] can carry.
pub const DECIMAL_MAX_SCALE: u32 = 28;

/// Mantissa width of a [`Decimal`], in bits.
const DECIMAL_MANTISSA_BITS: u64 = 96;

/// Most significant digits a 96-bit mantissa can hold.
const DECIMAL_MAX_DIGITS: usize = 29;

/// Why numeric text could not be converted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NumericError {
    /// The value lies outside the target's domain.
    Overflow,
    /// The text has a fraction or exponent part but the target is an integer.
    NotAnInteger,
    /// The text is not a number at all.
    Malformed,
}

/// Parses integer text into `T`, rejecting anything outside `T`'s range.
pub fn parse_integer<T>(text: &str) -> Result<T, NumericError>
where
    T: TryFrom<i64> + TryFrom<BigInt>,
{
    if text.bytes().any(|b| matches!(b, b'.' | b'e' | b'E')) {
        return Err(NumericError::NotAnInteger);
    }

    // Up to 18 characters always fit in an i64.
    if text.len() <= 18 {
        let value = text.parse::<i64>().map_err(|_| NumericError::Malformed)?;
        return T::try_from(value).map_err(|_| NumericError::Overflow);
    }

    let wide = BigInt::parse_bytes(text.as_bytes(), 10).ok_or(NumericError::Malformed)?;
    T::try_from(wide).map_err(|_| NumericError::Overflow)
}

pub fn parse_f32(text: &str) -> Result<f32, NumericError> {
    text.parse::<f32>().map_err(|_| NumericError::Malformed)
}

pub fn parse_f64(text: &str) -> Result<f64, NumericError> {
    text.parse::<f64>().map_err(|_| NumericError::Malformed)
}

/// Parses number text into a [`Decimal`].
///
/// Fractional digits past the representable precision are rounded
/// half-to-even; an integral magnitude above [`Decimal::MAX`] overflows.
///
/// # Examples
///
/// ```rust
/// use json_scalar::number::{parse_decimal, NumericError};
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_decimal("79228162514264337593543950335"), Ok(Decimal::MAX));
/// assert_eq!(
///     parse_decimal("792281625142643375935439503350"),
///     Err(NumericError::Overflow)
/// );
/// assert_eq!(parse_decimal("1.25e1").unwrap().to_string(), "12.5");
/// ```
pub fn parse_decimal(text: &str) -> Result<Decimal, NumericError> {
    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    let (significand, exponent) = match unsigned.find(['e', 'E']) {
        Some(i) => (&unsigned[..i], parse_exponent(&unsigned[i + 1..])?),
        None => (unsigned, 0),
    };

    let (integral, fraction) = match significand.find('.') {
        Some(i) => (&significand[..i], &significand[i + 1..]),
        None => (significand, ""),
    };

    let mut digits: Vec<u8> = integral.bytes().chain(fraction.bytes()).collect();
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return Err(NumericError::Malformed);
    }
    let mut scale = fraction.len() as i64 - exponent;

    let leading_zeros = digits.iter().take_while(|&&d| d == b'0').count();
    digits.drain(..leading_zeros);

    if digits.is_empty() {
        let scale = scale.clamp(0, DECIMAL_MAX_SCALE as i64) as u32;
        return Ok(Decimal::new(0, scale));
    }

    if scale < 0 {
        let shift = scale.unsigned_abs() as usize;
        if digits.len() + shift > DECIMAL_MAX_DIGITS {
            return Err(NumericError::Overflow);
        }
        digits.resize(digits.len() + shift, b'0');
        scale = 0;
    }

    let mut dropped = (scale - DECIMAL_MAX_SCALE as i64).max(0) as usize;
    loop {
        let mantissa = round_half_even(&digits, dropped);
        let remaining_scale = scale - dropped as i64;

        if mantissa.bits() <= DECIMAL_MANTISSA_BITS {
            let magnitude = u128::try_from(&mantissa).map_err(|_| NumericError::Overflow)?;
            let signed = if negative {
                -(magnitude as i128)
            } else {
                magnitude as i128
            };
            return Decimal::try_from_i128_with_scale(signed, remaining_scale as u32)
                .map_err(|_| NumericError::Overflow);
        }

        if remaining_scale == 0 {
            return Err(NumericError::Overflow);
        }
        dropped += 1;
    }
}

/// Saturates far beyond any representable scale; the digit checks reject those.
fn parse_exponent(text: &str) -> Result<i64, NumericError> {
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    if digits.is_empty() {
        return Err(NumericError::Malformed);
    }

    let mut value: i64 = 0;
    for b in digits.bytes() {
        if !b.is_ascii_digit() {
            return Err(NumericError::Malformed);
        }
        value = value.saturating_mul(10).saturating_add(i64::from(b - b'0'));
    }
    let value = value.min(i64::from(u32::MAX));
    Ok(if negative { -value } else { value })
}

/// Removes the last `dropped` ASCII digits, rounding half-to-even.
fn round_half_even(digits: &[u8], dropped: usize) -> BigUint {
    if dropped > digits.len() {
        return BigUint::default();
    }

    let split = digits.len() - dropped;
    let kept = &digits[..split];
    let mut mantissa = if kept.is_empty() {
        BigUint::default()
    } else {
        BigUint::parse_bytes(kept, 10).unwrap_or_default()
    };

    if dropped > 0 {
        let round_digit = digits[split];
        let sticky = digits[split + 1..].iter().any(|&d| d != b'0');
        let last_odd = kept.last().is_some_and(|d| (d - b'0') % 2 == 1);
        if round_digit > b'5' || (round_digit == b'5' && (sticky || last_odd)) {
            mantissa += 1u32;
        }
    }
    mantissa
}
