use bson::Bson;
use std::cmp::Ordering;

use crate::document::Node;
use crate::document::eql::{equals, test};
use crate::types::defined;
use crate::utils::num::{as_f64, is_numeric};

use super::eval::filter_node;
use super::types::Condition;

impl Condition {
    /// Evaluate one operator against a field value (`None` when the field is missing).
    #[must_use]
    pub fn matches(&self, value: Option<&Bson>) -> bool {
        let value = defined(value);
        match self {
            Self::Ne(operand) => !equals(Some(operand), value),
            Self::Gt(operand) => compare(operand, value, |o| o == Ordering::Greater),
            Self::Gte(operand) => compare(operand, value, |o| o != Ordering::Less),
            Self::Lt(operand) => compare(operand, value, |o| o == Ordering::Less),
            Self::Lte(operand) => compare(operand, value, |o| o != Ordering::Greater),
            Self::Regex(re) => test(re, value),
            Self::Exists(wanted) => value.is_some() == *wanted,
            Self::In(operand) => is_in(operand, value),
            Self::Nin(operand) => !is_in(operand, value),
            Self::Size(operand) => match (value, as_f64(operand)) {
                #[allow(clippy::cast_precision_loss)]
                (Some(Bson::Array(items)), Some(n)) => items.len() as f64 == n,
                _ => false,
            },
            Self::ElemMatch(query) => match value.and_then(Node::of) {
                Some(node) => filter_node(node, query).is_match(),
                None => query.is_empty(),
            },
        }
    }
}

/// Numeric comparison of `value` against `operand`; false unless both are numbers.
fn compare(operand: &Bson, value: Option<&Bson>, accept: impl Fn(Ordering) -> bool) -> bool {
    if !is_numeric(operand) {
        return false;
    }
    let (Some(x), Some(y)) = (value.and_then(as_f64), as_f64(operand)) else {
        return false;
    };
    x.partial_cmp(&y).is_some_and(accept)
}

fn is_in(operand: &Bson, value: Option<&Bson>) -> bool {
    match operand {
        Bson::Array(candidates) => candidates.iter().any(|c| equals(Some(c), value)),
        _ => false,
    }
}
