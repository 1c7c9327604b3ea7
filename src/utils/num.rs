//! Numeric utilities shared by the matcher and the modifier planners.
//!
//! Guidelines
//! - Every BSON numeric kind is read through `as_f64` for comparisons.
//! - Arithmetic keeps integer kinds while the result fits, and widens otherwise.
//! - Array indices come only from canonical decimal segments (`"0"`, `"17"`).

use bson::Bson;

/// Read any numeric BSON value as `f64`. Non-numbers yield `None`.
#[inline]
#[must_use]
pub fn as_f64(v: &Bson) -> Option<f64> {
    match v {
        Bson::Int32(i) => Some(f64::from(*i)),
        #[allow(clippy::cast_precision_loss)]
        Bson::Int64(i) => Some(*i as f64),
        Bson::Double(f) => Some(*f),
        Bson::Decimal128(d) => d.to_string().parse::<f64>().ok(),
        _ => None,
    }
}

/// True for numbers other than NaN.
#[inline]
#[must_use]
pub fn is_numeric(v: &Bson) -> bool {
    as_f64(v).is_some_and(|f| !f.is_nan())
}

/// Parse a path segment as an array index. Only canonical forms are accepted:
/// no sign, no leading zeros, no whitespace.
#[must_use]
pub fn parse_index(segment: &str) -> Option<usize> {
    let bytes = segment.as_bytes();
    if bytes.is_empty() || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    if bytes.len() > 1 && bytes[0] == b'0' {
        return None;
    }
    segment.parse::<usize>().ok()
}

/// Add two numbers, keeping the narrowest integer kind that holds the result.
/// Returns `None` when either side is not numeric.
#[must_use]
pub fn add(current: &Bson, delta: &Bson) -> Option<Bson> {
    match (current, delta) {
        (Bson::Int32(a), Bson::Int32(b)) => Some(match a.checked_add(*b) {
            Some(sum) => Bson::Int32(sum),
            None => Bson::Int64(i64::from(*a) + i64::from(*b)),
        }),
        (Bson::Int32(_) | Bson::Int64(_), Bson::Int32(_) | Bson::Int64(_)) => {
            let a = as_i64(current)?;
            let b = as_i64(delta)?;
            Some(match a.checked_add(b) {
                Some(sum) => Bson::Int64(sum),
                None => Bson::Double(as_f64(current)? + as_f64(delta)?),
            })
        }
        _ => Some(Bson::Double(as_f64(current)? + as_f64(delta)?)),
    }
}

fn as_i64(v: &Bson) -> Option<i64> {
    match v {
        Bson::Int32(i) => Some(i64::from(*i)),
        Bson::Int64(i) => Some(*i),
        _ => None,
    }
}

/// Render a number the way a JavaScript engine would when coercing it to a string.
#[must_use]
pub fn js_number_string(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_owned()
    } else if f.is_infinite() {
        if f > 0.0 { "Infinity".to_owned() } else { "-Infinity".to_owned() }
    } else if f == 0.0 {
        "0".to_owned()
    } else if f.fract() == 0.0 && f.abs() < 1e21 {
        format!("{f:.0}")
    } else {
        format!("{f}")
    }
}
