//! Modifier planners. Each one inspects the current state and returns the
//! effect it would have, `None` for a no-op, or an error when a precondition
//! fails. Nothing here mutates the document.

use bson::{Bson, Document};

use crate::document::{Node, can_write_index};
use crate::document::eql::{contains, equals};
use crate::document::path::{Parent, last_segment, parent};
use crate::errors::DocError;
use crate::query::{Condition, is_operator_doc, parse_conditions};
use crate::types::{classify, defined};
use crate::utils::num::{as_f64, is_numeric, parse_index};

use super::types::{ArrayEnd, Effect, Modifier};

/// Plan `modifier` at `path` below `root`.
///
/// # Errors
/// Returns `TypeMismatch` or `InvalidFieldName` when the document cannot take
/// the modification.
pub fn plan(
    modifier: Modifier,
    root: Node<'_>,
    path: &str,
    operand: &Bson,
) -> Result<Option<Effect>, DocError> {
    match modifier {
        Modifier::Set => set(root, path, operand),
        Modifier::Unset => Ok(unset(root, path)),
        Modifier::Rename => rename(root, path, operand),
        Modifier::Inc => inc(root, path, operand),
        Modifier::Pop => pop(root, path, operand),
        Modifier::Push => push(modifier, root, path, vec![operand.clone()], false),
        Modifier::PushAll => match operand {
            Bson::Array(values) => push(modifier, root, path, values.clone(), true),
            other => Err(array_operand_error(modifier, other)),
        },
        Modifier::Pull => pull(modifier, root, path, std::slice::from_ref(operand)),
        Modifier::PullAll => match operand {
            Bson::Array(values) => pull(modifier, root, path, values),
            other => Err(array_operand_error(modifier, other)),
        },
        Modifier::AddToSet => add_to_set(root, path, operand),
    }
}

/// Current value under the final key of a path whose parent may be created.
#[derive(Clone, Copy)]
enum Slot<'a> {
    Present(&'a Bson),
    Vacant,
}

impl<'a> Slot<'a> {
    fn value(self) -> Option<&'a Bson> {
        match self {
            Self::Present(v) => Some(v),
            Self::Vacant => None,
        }
    }
}

/// Resolve the slot a creating modifier writes to.
fn writable<'a>(modifier: Modifier, root: Node<'a>, path: &str) -> Result<Slot<'a>, DocError> {
    let key = last_segment(path);
    let found = match parent(root, path, true) {
        Parent::Created => None,
        Parent::Found(Node::Object(doc)) => defined(doc.get(key)),
        Parent::Found(Node::Array(items)) => match parse_index(key) {
            Some(i) if can_write_index(items.len(), i) => defined(items.get(i)),
            Some(i) => {
                return Err(DocError::InvalidFieldName(format!(
                    "index {i} is too far past the end of an array of length {}",
                    items.len()
                )));
            }
            None => {
                return Err(DocError::InvalidFieldName(format!(
                    "can't append to array using string field name [{key}]"
                )));
            }
        },
        Parent::Found(node @ Node::Scalar(_)) => {
            return Err(DocError::TypeMismatch(format!(
                "{modifier} only supports object not {}",
                node.tag()
            )));
        }
        Parent::Missing => {
            return Err(DocError::TypeMismatch(format!(
                "{modifier} only supports object not undefined"
            )));
        }
    };
    Ok(found.map_or(Slot::Vacant, Slot::Present))
}

/// Resolve the existing value a non-creating modifier reads. `Ok(None)` when
/// the parent or the key is missing.
fn existing<'a>(root: Node<'a>, path: &str) -> Result<Option<&'a Bson>, Node<'a>> {
    match parent(root, path, false) {
        Parent::Found(node @ (Node::Object(_) | Node::Array(_))) => {
            Ok(node.get(last_segment(path)))
        }
        Parent::Found(node) => Err(node),
        Parent::Created | Parent::Missing => Ok(None),
    }
}

fn set(root: Node<'_>, path: &str, value: &Bson) -> Result<Option<Effect>, DocError> {
    let slot = writable(Modifier::Set, root, path)?;
    if equals(slot.value(), Some(value)) {
        log::debug!("ignoring $set of \"{path}\" to an equal value");
        return Ok(None);
    }
    Ok(Some(Effect::SetAt { path: path.to_owned(), value: value.clone() }))
}

fn unset(root: Node<'_>, path: &str) -> Option<Effect> {
    if let Ok(Some(_)) = existing(root, path) {
        Some(Effect::DeleteAt { path: path.to_owned() })
    } else {
        log::debug!("ignoring unset of inexisting key \"{path}\"");
        None
    }
}

fn rename(root: Node<'_>, path: &str, operand: &Bson) -> Result<Option<Effect>, DocError> {
    let Bson::String(target) = operand else {
        return Err(DocError::TypeMismatch(format!(
            "$rename target must be a string, not {}",
            classify(Some(operand))
        )));
    };
    if path == target {
        return Err(DocError::TypeMismatch("$rename source must differ from target".into()));
    }
    if path.starts_with(&format!("{target}.")) {
        return Err(DocError::TypeMismatch("$rename target may not be a parent of source".into()));
    }
    match parent(root, path, false) {
        Parent::Found(Node::Object(doc)) => {
            if defined(doc.get(last_segment(path))).is_some() {
                Ok(Some(Effect::MoveAt { from: path.to_owned(), to: target.clone() }))
            } else {
                log::debug!("ignoring rename from inexisting source \"{path}\"");
                Ok(None)
            }
        }
        Parent::Found(_) => Err(DocError::TypeMismatch("$rename source field invalid".into())),
        Parent::Created | Parent::Missing => Ok(None),
    }
}

fn inc(root: Node<'_>, path: &str, delta: &Bson) -> Result<Option<Effect>, DocError> {
    if !is_numeric(delta) {
        return Err(DocError::TypeMismatch("Modifier $inc allowed for numbers only".into()));
    }
    if let Slot::Present(current) = writable(Modifier::Inc, root, path)? {
        if !is_numeric(current) {
            return Err(DocError::TypeMismatch("Cannot apply $inc modifier to non-number".into()));
        }
    }
    Ok(Some(Effect::IncAt { path: path.to_owned(), delta: delta.clone() }))
}

fn pop(root: Node<'_>, path: &str, operand: &Bson) -> Result<Option<Effect>, DocError> {
    match existing(root, path) {
        Ok(Some(Bson::Array(items))) if items.is_empty() => Ok(None),
        Ok(Some(Bson::Array(_))) => {
            let end = if as_f64(operand) == Some(-1.0) { ArrayEnd::Front } else { ArrayEnd::Back };
            Ok(Some(Effect::PopAt { path: path.to_owned(), end }))
        }
        Ok(Some(_)) => Err(DocError::TypeMismatch("Cannot apply $pop modifier to non-array".into())),
        Ok(None) | Err(_) => {
            log::debug!("ignoring pop to inexisting key \"{path}\"");
            Ok(None)
        }
    }
}

fn push(
    modifier: Modifier,
    root: Node<'_>,
    path: &str,
    values: Vec<Bson>,
    many: bool,
) -> Result<Option<Effect>, DocError> {
    match writable(modifier, root, path)? {
        Slot::Present(Bson::Array(_)) | Slot::Vacant => {
            Ok(Some(Effect::AppendAt { path: path.to_owned(), values, many }))
        }
        Slot::Present(_) => Err(DocError::TypeMismatch(format!(
            "Cannot apply {modifier} modifier to non-array"
        ))),
    }
}

fn add_to_set(root: Node<'_>, path: &str, operand: &Bson) -> Result<Option<Effect>, DocError> {
    let (candidates, many) = match operand {
        Bson::Document(d) => match d.get("$each") {
            Some(Bson::Array(each)) => (each.as_slice(), true),
            _ => (std::slice::from_ref(operand), false),
        },
        _ => (std::slice::from_ref(operand), false),
    };
    let current: &[Bson] = match writable(Modifier::AddToSet, root, path)? {
        Slot::Present(Bson::Array(items)) => items,
        Slot::Present(_) => {
            return Err(DocError::TypeMismatch(
                "Cannot apply $addToSet modifier to non-array".into(),
            ));
        }
        Slot::Vacant => &[],
    };
    let mut added: Vec<Bson> = Vec::new();
    for value in candidates {
        if contains(current, value) || contains(&added, value) {
            log::debug!("ignoring $addToSet of a value already in \"{path}\"");
            continue;
        }
        added.push(value.clone());
    }
    if added.is_empty() {
        return Ok(None);
    }
    Ok(Some(Effect::AppendAt { path: path.to_owned(), values: added, many }))
}

fn pull(
    modifier: Modifier,
    root: Node<'_>,
    path: &str,
    operands: &[Bson],
) -> Result<Option<Effect>, DocError> {
    let items = match existing(root, path) {
        Ok(Some(Bson::Array(items))) => items,
        Ok(Some(_)) => {
            return Err(DocError::TypeMismatch(format!(
                "Cannot apply {modifier} modifier to non-array"
            )));
        }
        Ok(None) => {
            log::debug!("ignoring pull from inexisting key \"{path}\"");
            return Ok(None);
        }
        Err(node) => {
            return Err(DocError::TypeMismatch(format!(
                "{modifier} only supports object not {}",
                node.tag()
            )));
        }
    };
    let matchers = operands.iter().map(PullMatcher::new).collect::<Result<Vec<_>, _>>()?;
    let indices: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| matchers.iter().any(|m| m.matches(item)))
        .map(|(idx, _)| idx)
        .collect();
    if indices.is_empty() {
        return Ok(None);
    }
    Ok(Some(Effect::SpliceOut { path: path.to_owned(), indices }))
}

fn array_operand_error(modifier: Modifier, operand: &Bson) -> DocError {
    DocError::TypeMismatch(format!(
        "Modifier {modifier} allowed for arrays only, not {}",
        classify(Some(operand))
    ))
}

/// How one `$pull`/`$pullAll` operand selects array elements.
enum PullMatcher<'a> {
    /// Operator object, evaluated like a filter condition.
    Conditions(Vec<Condition>),
    /// Object operand: every listed key must be equal; extra keys are allowed.
    Partial(&'a Document),
    Literal(&'a Bson),
}

impl<'a> PullMatcher<'a> {
    fn new(operand: &'a Bson) -> Result<Self, DocError> {
        Ok(match operand {
            Bson::Document(d) if is_operator_doc(d) => Self::Conditions(parse_conditions(d)?),
            Bson::Document(d) => Self::Partial(d),
            other => Self::Literal(other),
        })
    }

    fn matches(&self, item: &Bson) -> bool {
        match self {
            Self::Conditions(conds) => conds.iter().all(|c| c.matches(Some(item))),
            Self::Partial(expected) => match item {
                Bson::Document(actual) if expected.is_empty() => actual.is_empty(),
                Bson::Document(actual) => {
                    expected.iter().all(|(k, m)| equals(Some(m), actual.get(k)))
                }
                _ => false,
            },
            Self::Literal(expected) => equals(Some(expected), Some(item)),
        }
    }
}
