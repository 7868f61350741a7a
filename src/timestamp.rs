//! # Timestamp Normalizer
//!
//! Converts user and probe supplied time text into integer microseconds and back.
//!
//! Two input shapes are accepted:
//!
//! - decimal seconds, e.g. `"12.5"` or `"3"`
//! - clock durations, e.g. `"1:02:03.250"` (`[[[DD:]HH:]MM:]SS[.fraction]`)
//!
//! The fractional part is handled as text: it is padded or truncated to exactly six
//! digits, never rounded, so `"0.1234567"` is `123_456` microseconds.
//!
//! ```rust
//! use keyframe_splitter::timestamp::{microseconds_to_seconds, to_microseconds};
//!
//! assert_eq!(to_microseconds("12.5").unwrap(), 12_500_000);
//! assert_eq!(to_microseconds("1:00.25").unwrap(), 60_250_000);
//! assert_eq!(microseconds_to_seconds(60_250_000), "60.250000");
//! ```

use crate::error::TimestampError;

/// Microseconds in one second
pub const MICROS_PER_SECOND: u64 = 1_000_000;

const FRACTION_DIGITS: usize = 6;

/// Scale factors between adjacent clock components, right to left (sec→min→hour→day)
const CLOCK_MULTIPLIERS: [u64; 3] = [60, 60, 24];

/// Normalize timestamp text to microseconds
pub fn to_microseconds(text: &str) -> Result<u64, TimestampError> {
    let text = text.trim();
    if text.contains(':') {
        let decimal = clock_to_decimal_seconds(text)?;
        parse_decimal_seconds(&decimal, text)
    } else {
        parse_decimal_seconds(text, text)
    }
}

/// Render microseconds as decimal seconds with six fractional digits
pub fn microseconds_to_seconds(micros: u64) -> String {
    format!(
        "{}.{:06}",
        micros / MICROS_PER_SECOND,
        micros % MICROS_PER_SECOND
    )
}

/// Rewrite a clock duration as an intermediate `"<seconds>.<fraction>"` string.
///
/// The fraction digits are carried over verbatim so that `"0:01.05"` keeps its
/// leading zero and means 1.05 seconds.
fn clock_to_decimal_seconds(text: &str) -> Result<String, TimestampError> {
    let (clock, fraction) = match text.split_once('.') {
        Some((clock, fraction)) => (clock, fraction),
        None => (text, ""),
    };

    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TimestampError::format(text, "fraction must be decimal digits"));
    }

    let components: Vec<&str> = clock.split(':').collect();
    if components.len() > CLOCK_MULTIPLIERS.len() + 1 {
        return Err(TimestampError::format(
            text,
            format!("at most {} ':'-separated components are allowed", CLOCK_MULTIPLIERS.len() + 1),
        ));
    }

    let mut total: u64 = 0;
    let mut scale: u64 = 1;
    for (position, component) in components.iter().rev().enumerate() {
        if position > 0 {
            scale *= CLOCK_MULTIPLIERS[position - 1];
        }
        let value = parse_digits(component, text)?;
        total = value
            .checked_mul(scale)
            .and_then(|scaled| total.checked_add(scaled))
            .ok_or_else(|| TimestampError::format(text, "duration is too large"))?;
    }

    if fraction.is_empty() {
        Ok(total.to_string())
    } else {
        Ok(format!("{}.{}", total, fraction))
    }
}

fn parse_decimal_seconds(decimal: &str, input: &str) -> Result<u64, TimestampError> {
    let (whole, fraction) = match decimal.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (decimal, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(TimestampError::format(input, "no digits"));
    }

    let seconds = if whole.is_empty() {
        0
    } else {
        parse_digits(whole, input)?
    };
    let micros = parse_fraction(fraction, input)?;

    seconds
        .checked_mul(MICROS_PER_SECOND)
        .and_then(|us| us.checked_add(micros))
        .ok_or_else(|| TimestampError::format(input, "timestamp is too large"))
}

/// Pad or truncate the fractional digits to microsecond precision
fn parse_fraction(fraction: &str, input: &str) -> Result<u64, TimestampError> {
    if fraction.is_empty() {
        return Ok(0);
    }
    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TimestampError::format(input, "fraction must be decimal digits"));
    }

    let mut digits: String = fraction.chars().take(FRACTION_DIGITS).collect();
    while digits.len() < FRACTION_DIGITS {
        digits.push('0');
    }

    digits
        .parse()
        .map_err(|e: std::num::ParseIntError| TimestampError::format(input, e.to_string()))
}

fn parse_digits(digits: &str, input: &str) -> Result<u64, TimestampError> {
    if digits.is_empty() {
        return Err(TimestampError::format(input, "empty numeric component"));
    }
    // u64::from_str would also take a leading '+'
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TimestampError::format(
            input,
            format!("'{}' is not an unsigned integer", digits),
        ));
    }

    digits
        .parse()
        .map_err(|e: std::num::ParseIntError| TimestampError::format(input, e.to_string()))
}
