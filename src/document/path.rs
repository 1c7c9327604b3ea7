//! Dotted-path access: `a.b.0.c` walks object keys and canonical array indices.

use bson::{Bson, Document};

use super::{Node, NodeMut};
use crate::utils::num::parse_index;

/// Outcome of resolving the container that holds a path's final segment.
#[derive(Debug, Clone, Copy)]
pub enum Parent<'a> {
    /// The container exists.
    Found(Node<'a>),
    /// An object key on the way was missing and creation was requested; the
    /// container will be a fresh empty object once intermediates are created.
    Created,
    /// The walk hit a missing value or a node that cannot be descended.
    Missing,
}

/// Final segment of a path.
#[must_use]
pub fn last_segment(path: &str) -> &str {
    path.rsplit_once('.').map_or(path, |(_, key)| key)
}

/// Resolve the parent container of `path` without touching the document.
#[must_use]
pub fn parent<'a>(root: Node<'a>, path: &str, create: bool) -> Parent<'a> {
    let Some((head, _)) = path.rsplit_once('.') else {
        return Parent::Found(root);
    };
    let mut current = root;
    for seg in head.split('.') {
        let next = match current {
            Node::Array(items) => parse_index(seg).and_then(|i| items.get(i)),
            Node::Object(doc) => match doc.get(seg) {
                None if create => return Parent::Created,
                found => found,
            },
            Node::Scalar(_) => None,
        };
        match next.and_then(Node::of) {
            Some(node) => current = node,
            None => return Parent::Missing,
        }
    }
    Parent::Found(current)
}

/// Mutable counterpart of [`parent`]; with `create` it inserts the missing
/// intermediate objects.
pub fn parent_mut<'a>(root: NodeMut<'a>, path: &str, create: bool) -> Option<NodeMut<'a>> {
    let Some((head, _)) = path.rsplit_once('.') else {
        return Some(root);
    };
    let mut current = root;
    for seg in head.split('.') {
        let next = match current {
            NodeMut::Array(items) => parse_index(seg).and_then(|i| items.get_mut(i)),
            NodeMut::Object(doc) => {
                if create && !doc.contains_key(seg) {
                    doc.insert(seg, Document::new());
                }
                doc.get_mut(seg)
            }
            NodeMut::Scalar(_) => None,
        };
        current = NodeMut::of(next?)?;
    }
    Some(current)
}

/// Read the value at `path`.
#[must_use]
pub fn get<'a>(root: Node<'a>, path: &str) -> Option<&'a Bson> {
    match parent(root, path, false) {
        Parent::Found(node) => node.get(last_segment(path)),
        Parent::Created | Parent::Missing => None,
    }
}

/// Write `value` at `path`, creating intermediate objects. Nested writes only
/// land in objects; returns whether the value was stored.
pub fn set(root: NodeMut<'_>, path: &str, value: Bson) -> bool {
    let nested = path.contains('.');
    match parent_mut(root, path, true) {
        Some(node @ NodeMut::Object(_)) => node.write(last_segment(path), value),
        Some(node) if !nested => node.write(path, value),
        _ => false,
    }
}
