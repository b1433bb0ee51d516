//! Literal parsing for booleans, integers and floats.
//!
//! Integers are read with "base 0" rules: an optional sign, then an optional
//! `0x`, `0o` or `0b` prefix (a bare leading `0` means octal), with `_`
//! allowed between digits. The bit width is enforced after parsing.

use alloc::borrow::Cow;
use alloc::string::{String, ToString};
use core::fmt;
use core::num::IntErrorKind;

/// Why a numeric or boolean literal was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumErrorReason {
    /// The text is not a literal of the requested type.
    Syntax,
    /// The literal does not fit the requested bit width.
    Range,
}

/// A numeric or boolean literal that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumError {
    /// Name of the requested type (`bool`, `i8`, `f64`, ...).
    pub target: &'static str,
    /// The rejected input.
    pub input: String,
    /// Why it was rejected.
    pub reason: NumErrorReason,
}

impl NumError {
    fn syntax(target: &'static str, input: &str) -> Self {
        NumError {
            target,
            input: input.to_string(),
            reason: NumErrorReason::Syntax,
        }
    }

    fn range(target: &'static str, input: &str) -> Self {
        NumError {
            target,
            input: input.to_string(),
            reason: NumErrorReason::Range,
        }
    }
}

impl fmt::Display for NumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self.reason {
            NumErrorReason::Syntax => "invalid syntax",
            NumErrorReason::Range => "value out of range",
        };
        write!(f, "parsing {:?} as {}: {reason}", self.input, self.target)
    }
}

impl core::error::Error for NumError {}

/// Parses `1`, `t`, `T`, `TRUE`, `true`, `True`, `0`, `f`, `F`, `FALSE`,
/// `false` and `False`.
pub(crate) fn parse_bool(s: &str) -> Result<bool, NumError> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(NumError::syntax("bool", s)),
    }
}

/// Parses an unsigned integer that must fit in `bits` bits.
pub(crate) fn parse_uint(s: &str, bits: u32, target: &'static str) -> Result<u64, NumError> {
    let magnitude = parse_magnitude(s, s, target)?;
    let max = if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    };
    if magnitude > max {
        return Err(NumError::range(target, s));
    }
    Ok(magnitude)
}

/// Parses a signed integer that must fit in `bits` bits.
pub(crate) fn parse_int(s: &str, bits: u32, target: &'static str) -> Result<i64, NumError> {
    let (negative, unsigned) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let magnitude = parse_magnitude(unsigned, s, target)?;

    // 2^(bits-1) is reachable only by negative numbers.
    let cutoff = 1u64 << (bits.clamp(1, 64) - 1);
    if negative {
        if magnitude > cutoff {
            return Err(NumError::range(target, s));
        }
        Ok((magnitude as i64).wrapping_neg())
    } else {
        if magnitude >= cutoff {
            return Err(NumError::range(target, s));
        }
        Ok(magnitude as i64)
    }
}

/// Parses a 64-bit float, decimal or hexadecimal (`0x1.8p3`), with `_`
/// allowed between digits. Infinities are only accepted when spelled out.
pub(crate) fn parse_float(s: &str, target: &'static str) -> Result<f64, NumError> {
    let (negative, unsigned) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let cleaned = strip_underscores(unsigned).ok_or_else(|| NumError::syntax(target, s))?;

    let magnitude = match cleaned.as_bytes() {
        [b'0', b'x' | b'X', ..] => {
            parse_hex_float(&cleaned[2..]).ok_or_else(|| NumError::syntax(target, s))?
        }
        [b'+' | b'-', ..] => return Err(NumError::syntax(target, s)),
        _ => cleaned
            .parse::<f64>()
            .map_err(|_| NumError::syntax(target, s))?,
    };
    if magnitude.is_infinite() && !s.to_ascii_lowercase().contains("inf") {
        return Err(NumError::range(target, s));
    }
    Ok(if negative { -magnitude } else { magnitude })
}

/// Hex mantissa with an optional point, then a mandatory binary exponent.
fn parse_hex_float(s: &str) -> Option<f64> {
    let (mantissa, exponent) = s.split_once(['p', 'P'])?;
    let mut exponent: i32 = exponent.parse().ok()?;
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    let mut bits: u64 = 0;
    for (c, fractional) in int_part
        .chars()
        .map(|c| (c, false))
        .chain(frac_part.chars().map(|c| (c, true)))
    {
        let digit = u64::from(c.to_digit(16)?);
        if bits >> 60 == 0 {
            bits = (bits << 4) | digit;
            if fractional {
                exponent = exponent.saturating_sub(4);
            }
        } else if !fractional {
            // Beyond 60 bits of mantissa, further digits only scale.
            exponent = exponent.saturating_add(4);
        }
    }

    if bits == 0 {
        return Some(0.0);
    }
    // Split the scaling so subnormal and near-max results don't overflow midway.
    let half = exponent / 2;
    Some(bits as f64 * 2f64.powi(half) * 2f64.powi(exponent - half))
}

/// `s` without its `_` separators, `None` when they are misplaced.
fn strip_underscores(s: &str) -> Option<Cow<'_, str>> {
    if !s.contains('_') {
        return Some(Cow::Borrowed(s));
    }
    underscore_ok(s).then(|| Cow::Owned(s.replace('_', "")))
}

/// Reads an unsigned magnitude from `s`, detecting the base from its prefix.
/// Errors report `input`, the full literal including any sign.
fn parse_magnitude(s: &str, input: &str, target: &'static str) -> Result<u64, NumError> {
    let cleaned = strip_underscores(s).ok_or_else(|| NumError::syntax(target, input))?;
    let (radix, digits) = match cleaned.as_bytes() {
        [b'0', b'x' | b'X', ..] => (16, &cleaned[2..]),
        [b'0', b'o' | b'O', ..] => (8, &cleaned[2..]),
        [b'0', b'b' | b'B', ..] => (2, &cleaned[2..]),
        [b'0', ..] => (8, &cleaned[..]),
        _ => (10, &cleaned[..]),
    };

    // `from_str_radix` would take a sign of its own.
    if digits.starts_with(['+', '-']) {
        return Err(NumError::syntax(target, input));
    }
    u64::from_str_radix(digits, radix).map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow => NumError::range(target, input),
        _ => NumError::syntax(target, input),
    })
}

/// Underscores may only separate digits, or follow a base prefix.
fn underscore_ok(s: &str) -> bool {
    // `saw` tracks the previous character class: '^' start, '0' digit, '_' underscore, '!' other.
    let mut saw = b'^';
    let bytes = s.as_bytes();
    let mut i = 0;
    let mut hex = false;

    if bytes.len() >= 2
        && bytes[0] == b'0'
        && matches!(bytes[1].to_ascii_lowercase(), b'b' | b'o' | b'x')
    {
        i = 2;
        saw = b'0';
        hex = bytes[1].to_ascii_lowercase() == b'x';
    }

    while i < bytes.len() {
        let c = bytes[i];
        i += 1;
        if c.is_ascii_digit() || (hex && c.is_ascii_hexdigit()) {
            saw = b'0';
            continue;
        }
        if c == b'_' {
            if saw != b'0' {
                return false;
            }
            saw = b'_';
            continue;
        }
        if saw == b'_' {
            return false;
        }
        saw = b'!';
    }
    saw != b'_'
}
