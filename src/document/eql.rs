//! MongoDB equality between a matcher value and a document value.

use bson::Bson;
use regex::{Regex, RegexBuilder};
use std::borrow::Cow;

use crate::types::defined;
use crate::utils::num::{as_f64, js_number_string};

/// Compare `value` against `matcher`.
///
/// - a null (or missing) matcher only equals null;
/// - a regular-expression matcher tests the value's string form;
/// - arrays compare element-wise and must have the same length;
/// - objects must have exactly the same key set, in any order;
/// - everything else compares by value, numbers across integer and float kinds.
///
/// The argument order matters: array elements are compared with the value's
/// element in the matcher position.
#[must_use]
pub fn equals(matcher: Option<&Bson>, value: Option<&Bson>) -> bool {
    let value = defined(value);
    let Some(matcher) = defined(matcher) else {
        return matches!(value, Some(Bson::Null));
    };
    match matcher {
        Bson::Null => matches!(value, Some(Bson::Null)),
        Bson::RegularExpression(re) => {
            compile(re.pattern.as_str(), re.options.as_str()).is_ok_and(|re| test(&re, value))
        }
        Bson::Array(expected) => match value {
            Some(Bson::Array(actual)) if actual.len() == expected.len() => {
                expected.iter().zip(actual).all(|(m, v)| equals(Some(v), Some(m)))
            }
            _ => false,
        },
        Bson::Document(expected) => match value {
            Some(Bson::Document(actual)) => {
                expected
                    .iter()
                    .all(|(k, m)| actual.contains_key(k) && equals(Some(m), actual.get(k)))
                    && actual.keys().all(|k| expected.contains_key(k))
            }
            _ => false,
        },
        other => value.is_some_and(|v| primitive_eq(other, v)),
    }
}

/// True if any element of `items` equals `value`.
#[must_use]
pub fn contains(items: &[Bson], value: &Bson) -> bool {
    items.iter().any(|item| equals(Some(value), Some(item)))
}

fn primitive_eq(a: &Bson, b: &Bson) -> bool {
    match (as_f64(a), as_f64(b)) {
        (Some(x), Some(y)) => x == y,
        (None, None) => a == b,
        _ => false,
    }
}

/// Build a regex from a pattern and BSON-style option letters.
pub(crate) fn compile(pattern: &str, options: &str) -> Result<Regex, regex::Error> {
    let mut builder = RegexBuilder::new(pattern);
    for flag in options.chars() {
        match flag {
            'i' => builder.case_insensitive(true),
            'm' => builder.multi_line(true),
            's' => builder.dot_matches_new_line(true),
            'x' => builder.ignore_whitespace(true),
            _ => &mut builder,
        };
    }
    builder.build()
}

/// Run `re` against the string form of `value`.
pub(crate) fn test(re: &Regex, value: Option<&Bson>) -> bool {
    string_form(value).is_some_and(|s| re.is_match(&s))
}

/// String form used for regex tests. A missing value reads as `undefined`;
/// containers and exotic leaves have none.
pub(crate) fn string_form(value: Option<&Bson>) -> Option<Cow<'_, str>> {
    let Some(value) = defined(value) else {
        return Some(Cow::Borrowed("undefined"));
    };
    match value {
        Bson::String(s) => Some(Cow::Borrowed(s.as_str())),
        Bson::Boolean(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
        Bson::Null => Some(Cow::Borrowed("null")),
        v => as_f64(v).map(|f| Cow::Owned(js_number_string(f))),
    }
}
