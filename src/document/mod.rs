//! Navigation over BSON trees: borrowed views of containers used by the path
//! accessor, the matcher and the modifier planners.

pub mod eql;
pub mod path;

use bson::{Bson, Document};

use crate::types::{TypeTag, classify, defined};
use crate::utils::num::parse_index;

/// Most holes a single write past the end of an array may open.
pub const MAX_ARRAY_PADDING: usize = 1 << 16;

/// Whether slot `index` of an array holding `len` elements can be written.
#[must_use]
pub fn can_write_index(len: usize, index: usize) -> bool {
    index < len || index - len <= MAX_ARRAY_PADDING
}

/// Read-only view of one node in a document tree.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Object(&'a Document),
    Array(&'a [Bson]),
    Scalar(&'a Bson),
}

impl<'a> Node<'a> {
    /// View a stored value. Array holes are not nodes.
    #[must_use]
    pub fn of(value: &'a Bson) -> Option<Self> {
        match value {
            Bson::Undefined => None,
            Bson::Document(d) => Some(Self::Object(d)),
            Bson::Array(a) => Some(Self::Array(a)),
            other => Some(Self::Scalar(other)),
        }
    }

    /// Child under `key`: object field, or array element for a canonical index.
    #[must_use]
    pub fn get(self, key: &str) -> Option<&'a Bson> {
        let found = match self {
            Self::Object(d) => d.get(key),
            Self::Array(a) => parse_index(key).and_then(|i| a.get(i)),
            Self::Scalar(_) => None,
        };
        defined(found)
    }

    #[must_use]
    pub fn tag(self) -> TypeTag {
        match self {
            Self::Object(_) => TypeTag::Object,
            Self::Array(_) => TypeTag::Array,
            Self::Scalar(v) => classify(Some(v)),
        }
    }
}

/// Mutable view of one node, used when committing planned effects.
#[derive(Debug)]
pub enum NodeMut<'a> {
    Object(&'a mut Document),
    Array(&'a mut Vec<Bson>),
    Scalar(&'a mut Bson),
}

impl<'a> NodeMut<'a> {
    #[must_use]
    pub fn of(value: &'a mut Bson) -> Option<Self> {
        match value {
            Bson::Undefined => None,
            Bson::Document(d) => Some(Self::Object(d)),
            Bson::Array(a) => Some(Self::Array(a)),
            other => Some(Self::Scalar(other)),
        }
    }

    /// Shorter-lived view of the same node.
    pub fn reborrow(&mut self) -> NodeMut<'_> {
        match self {
            Self::Object(d) => NodeMut::Object(d),
            Self::Array(a) => NodeMut::Array(a),
            Self::Scalar(v) => NodeMut::Scalar(v),
        }
    }

    /// Existing child under `key`, holes excluded.
    #[must_use]
    pub fn slot(self, key: &str) -> Option<&'a mut Bson> {
        let found = match self {
            Self::Object(d) => d.get_mut(key),
            Self::Array(a) => parse_index(key).and_then(|i| a.get_mut(i)),
            Self::Scalar(_) => None,
        };
        found.filter(|v| !matches!(v, Bson::Undefined))
    }

    /// Store `value` under `key`. Writing past the end of an array pads it with
    /// holes, up to [`MAX_ARRAY_PADDING`]. Returns false when the node cannot
    /// hold the key.
    pub fn write(self, key: &str, value: Bson) -> bool {
        match self {
            Self::Object(d) => {
                d.insert(key, value);
                true
            }
            Self::Array(a) => match parse_index(key) {
                Some(i) if i < a.len() => {
                    a[i] = value;
                    true
                }
                Some(i) if can_write_index(a.len(), i) => {
                    let Some(grow) = i.checked_add(1).map(|n| n - a.len()) else {
                        return false;
                    };
                    if a.try_reserve(grow).is_err() {
                        return false;
                    }
                    a.resize(i, Bson::Undefined);
                    a.push(value);
                    true
                }
                _ => false,
            },
            Self::Scalar(_) => false,
        }
    }

    /// Remove the child under `key`. On arrays this leaves a hole in place so
    /// that later indices keep their positions.
    pub fn remove(self, key: &str) -> Option<Bson> {
        match self {
            Self::Object(d) => d.remove(key),
            Self::Array(a) => {
                let slot = parse_index(key).and_then(|i| a.get_mut(i))?;
                match std::mem::replace(slot, Bson::Undefined) {
                    Bson::Undefined => None,
                    old => Some(old),
                }
            }
            Self::Scalar(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::bson;

    #[test]
    fn write_pads_arrays_with_holes() {
        let mut arr = vec![Bson::Int32(1)];
        assert!(NodeMut::Array(&mut arr).write("3", Bson::Int32(4)));
        assert_eq!(Bson::Array(arr), bson!([1, Bson::Undefined, Bson::Undefined, 4]));
    }

    #[test]
    fn write_refuses_indices_beyond_the_padding_limit() {
        let mut arr = vec![Bson::Int32(1)];
        let far = (MAX_ARRAY_PADDING + 2).to_string();
        assert!(!NodeMut::Array(&mut arr).write(&far, Bson::Null));
        assert!(!NodeMut::Array(&mut arr).write(&usize::MAX.to_string(), Bson::Null));
        assert_eq!(arr, vec![Bson::Int32(1)]);
        assert!(can_write_index(1, MAX_ARRAY_PADDING + 1));
        assert!(!can_write_index(1, MAX_ARRAY_PADDING + 2));
    }
}
