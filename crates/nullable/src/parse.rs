// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::num::ParseIntError;
use std::str::ParseBoolError;

/// Parses a signed 64-bit integer, detecting the radix from a numeric-literal prefix.
///
/// After an optional sign, `0x`/`0X` selects hexadecimal, `0o`/`0O` and a bare leading
/// `0` select octal, `0b`/`0B` selects binary. Anything else is decimal. Underscores may
/// separate digits, or follow a radix prefix, but may not lead, trail or repeat.
pub(crate) fn int_with_prefix(src: &str) -> Result<i64, ParseIntError> {
    if src.is_empty() {
        return src.parse();
    }

    let (sign, unsigned) = match src.as_bytes().first() {
        Some(b'-') => ("-", &src[1..]),
        Some(b'+') => ("+", &src[1..]),
        _ => ("+", src),
    };

    let (radix, digits) = if let Some(rest) = strip_prefix_either(unsigned, "0x", "0X") {
        (16, rest)
    } else if let Some(rest) = strip_prefix_either(unsigned, "0o", "0O") {
        (8, rest)
    } else if let Some(rest) = strip_prefix_either(unsigned, "0b", "0B") {
        (2, rest)
    } else if unsigned.len() > 1 && unsigned.starts_with('0') {
        (8, &unsigned[1..])
    } else {
        (10, unsigned)
    };

    // Misplaced underscores are left in so that `from_str_radix` rejects them.
    let digits = if digits.contains('_') && underscores_separate_digits(unsigned) {
        digits.replace('_', "")
    } else {
        digits.to_owned()
    };

    // The sign is always re-attached so that a second sign in `digits` is rejected.
    i64::from_str_radix(&format!("{sign}{digits}"), radix)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Seen {
    Start,
    Digit,
    Underscore,
    Other,
}

/// Checks that every underscore in `unsigned` sits between two digits or right after a
/// `0x`, `0o` or `0b` prefix.
fn underscores_separate_digits(unsigned: &str) -> bool {
    let bytes = unsigned.as_bytes();
    let (rest, hex) = match bytes {
        [b'0', prefix, rest @ ..] if matches!(prefix.to_ascii_lowercase(), b'x' | b'o' | b'b') => {
            (rest, prefix.eq_ignore_ascii_case(&b'x'))
        }
        _ => (bytes, false),
    };

    // A radix prefix counts as a digit.
    let mut seen = if rest.len() < bytes.len() { Seen::Digit } else { Seen::Start };

    for &byte in rest {
        seen = if byte.is_ascii_digit() || (hex && byte.is_ascii_hexdigit()) {
            Seen::Digit
        } else if byte == b'_' {
            if seen != Seen::Digit {
                return false;
            }
            Seen::Underscore
        } else if seen == Seen::Underscore {
            return false;
        } else {
            Seen::Other
        };
    }

    seen != Seen::Underscore
}

fn strip_prefix_either<'a>(src: &'a str, lower: &str, upper: &str) -> Option<&'a str> {
    src.strip_prefix(lower).or_else(|| src.strip_prefix(upper))
}

/// Parses the boolean spellings database drivers commonly produce.
pub(crate) fn driver_bool(src: &str) -> Result<bool, ParseBoolError> {
    match src {
        "1" | "t" | "T" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "False" => Ok(false),
        other => other.parse(),
    }
}
