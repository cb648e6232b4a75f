//! Lenient parsing of human-entered time expressions.
//!
//! Accepted forms are plain seconds (`"95"`, `"12.5"`), `mm:ss` and
//! `hh:mm:ss`, each with an optional leading sign. Parsing never fails:
//! anything that does not look like a number contributes `0`.

/// Sentinel returned when no text was supplied at all.
pub const UNSET: f64 = -1.0;

/// Convert a time expression into a signed number of seconds.
///
/// Every `:` folds the field before it into the running total and scales
/// the total by 60, so `"1:02:03"` is `((1 * 60) + 2) * 60 + 3`. Scanning stops
/// at the first character that is neither a digit nor a colon; the trailing
/// field is then read as a decimal number and added unscaled.
///
/// # Arguments
///
/// * `text` - The expression, or `None` when the value was never given.
///
/// # Returns
///
/// The number of seconds, or [`UNSET`] (`-1.0`) for `None`.
pub fn parse_duration(text: Option<&str>) -> f64 {
    let Some(text) = text else {
        return UNSET;
    };

    let (sign, body) = match text.as_bytes().first() {
        Some(b'-') => (-1.0, &text[1..]),
        Some(b'+') => (1.0, &text[1..]),
        _ => (1.0, text),
    };

    let mut out = 0.0;
    let mut field_start = 0;
    let mut stop = body.len();
    for (index, byte) in body.bytes().enumerate() {
        match byte {
            b':' => {
                out = (out + integer_field(&body[field_start..index])) * 60.0;
                field_start = index + 1;
            }
            b'0'..=b'9' => {}
            _ => {
                stop = index;
                break;
            }
        }
    }

    // The trailing field may run past the scan stop, e.g. the fraction in "1:30.5".
    if field_start != stop {
        out += leading_decimal(&body[field_start..]);
    }

    sign * out
}

fn integer_field(field: &str) -> f64 {
    field.parse::<f64>().unwrap_or(0.0)
}

/// Read the longest decimal prefix of `text`, `0.0` when there is none.
fn leading_decimal(text: &str) -> f64 {
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - digits_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let fraction_start = end + 1;
        let mut fraction_end = fraction_start;
        while fraction_end < bytes.len() && bytes[fraction_end].is_ascii_digit() {
            fraction_end += 1;
        }
        mantissa_digits += fraction_end - fraction_start;
        end = fraction_end;
    }

    if mantissa_digits == 0 {
        return 0.0;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exponent_end = end + 1;
        if exponent_end < bytes.len() && matches!(bytes[exponent_end], b'+' | b'-') {
            exponent_end += 1;
        }
        let exponent_digits_start = exponent_end;
        while exponent_end < bytes.len() && bytes[exponent_end].is_ascii_digit() {
            exponent_end += 1;
        }
        if exponent_end > exponent_digits_start {
            end = exponent_end;
        }
    }

    text[..end].parse::<f64>().unwrap_or(0.0)
}
