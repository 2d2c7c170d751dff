//! Coercion of free-text form input into numbers.
//!
//! Form fields are edited as text. Every field is turned into an `f64` with the
//! same rules a browser's `parseFloat(text) || 0` would apply: the longest numeric
//! prefix wins and anything that does not start with a number becomes `0`.
//! Input is never rejected.

/// Convert the text of a form field into a number.
///
/// # Rules
///
/// - Leading whitespace is skipped
/// - The longest valid decimal prefix is used (`"12abc"` → 12, `"1e3"` → 1000, `".5"` → 0.5)
/// - `Infinity` / `-Infinity` prefixes are accepted
/// - Empty or non-numeric text yields `0.0`
/// - Negative zero is folded into `0.0`
///
/// # Examples
///
/// ```text
/// "  42"     → 42.0
/// "-95 dBm"  → -95.0
/// "abc"      → 0.0
/// ""         → 0.0
/// ```
pub fn coerce_number(text: &str) -> f64 {
    let prefix = numeric_prefix(text.trim_start());
    match prefix.parse::<f64>() {
        Ok(value) if value != 0.0 && !value.is_nan() => value,
        _ => 0.0,
    }
}

/// Longest prefix of `text` that forms a decimal literal (sign, digits,
/// optional fraction, optional exponent) or a signed `Infinity`.
fn numeric_prefix(text: &str) -> &str {
    const INFINITY: &str = "Infinity";

    let bytes = text.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    if text[end..].starts_with(INFINITY) {
        return &text[..end + INFINITY.len()];
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digit_count = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digit_count += frac_end - frac_start;
        if digit_count > 0 {
            end = frac_end;
        }
    }

    if digit_count == 0 {
        return "";
    }

    // The exponent only counts when at least one digit follows the marker
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    &text[..end]
}
