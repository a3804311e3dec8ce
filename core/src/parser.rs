//! Strict string coercion for primitive field types.

use crate::error::{ConfigError, ConfigResult};

/// Parse a raw value to boolean.
///
/// Accepts `true`/`t`/`false`/`f` in any casing. Numeric strings are rejected.
pub fn parse_boolean(raw: Option<&str>) -> ConfigResult<Option<bool>> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    match raw.to_lowercase().as_str() {
        "true" | "t" => Ok(Some(true)),
        "false" | "f" => Ok(Some(false)),
        _ => Err(ConfigError::NotBoolean {
            raw: raw.to_string(),
        }),
    }
}

/// Parse a raw value to number.
///
/// Follows the usual numeric literal rules of a `Number(..)` conversion:
/// surrounding whitespace is ignored, a blank string is zero, and
/// `Infinity` and `0x`/`0o`/`0b` literals are understood.
pub fn parse_number(raw: Option<&str>) -> ConfigResult<Option<f64>> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    numeric_literal(raw.trim())
        .map(Some)
        .ok_or_else(|| ConfigError::NotNumber {
            raw: raw.to_string(),
        })
}

fn numeric_literal(text: &str) -> Option<f64> {
    if text.is_empty() {
        return Some(0.0);
    }

    if let Some(value) = radix_literal(text) {
        return Some(value);
    }

    let (sign, unsigned) = match text.as_bytes()[0] {
        b'-' => (-1.0, &text[1..]),
        b'+' => (1.0, &text[1..]),
        _ => (1.0, text),
    };

    if unsigned == "Infinity" {
        return Some(sign * f64::INFINITY);
    }

    // f64::from_str is more lenient (`inf`, `nan`), so check the shape first
    if !is_decimal_literal(unsigned) {
        return None;
    }

    unsigned.parse::<f64>().ok().map(|value| sign * value)
}

fn radix_literal(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    if bytes.len() < 3 || bytes[0] != b'0' {
        return None;
    }

    let radix = match bytes[1] {
        b'x' | b'X' => 16,
        b'o' | b'O' => 8,
        b'b' | b'B' => 2,
        _ => return None,
    };

    text[2..].chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix).map(|digit| acc * f64::from(radix) + f64::from(digit))
    })
}

/// `digits [ "." digits? ] | "." digits`, then an optional exponent.
fn is_decimal_literal(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut pos = 0;

    let int_digits = count_digits(&bytes[pos..]);
    pos += int_digits;

    let mut frac_digits = 0;
    if bytes.get(pos) == Some(&b'.') {
        pos += 1;
        frac_digits = count_digits(&bytes[pos..]);
        pos += frac_digits;
    }

    if int_digits == 0 && frac_digits == 0 {
        return false;
    }

    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        pos += 1;
        if matches!(bytes.get(pos), Some(b'+' | b'-')) {
            pos += 1;
        }
        let exp_digits = count_digits(&bytes[pos..]);
        if exp_digits == 0 {
            return false;
        }
        pos += exp_digits;
    }

    pos == bytes.len()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}
