use bson::{Bson, Document};

use crate::document::NodeMut;
use crate::document::path::{self, last_segment, parent_mut};
use crate::utils::num::add;

use super::types::{ArrayEnd, Effect};

fn vanished(path: &str) {
    log::warn!("target \"{path}\" vanished before commit, skipping");
}

impl Effect {
    /// Apply the effect to the live document and return the value recorded in
    /// the change log.
    pub fn commit(self, doc: &mut Document) -> Option<Bson> {
        match self {
            Self::SetAt { path, value } => {
                let stored = parent_mut(NodeMut::Object(doc), &path, true)
                    .is_some_and(|node| node.write(last_segment(&path), value.clone()));
                if !stored {
                    vanished(&path);
                }
                Some(value)
            }
            Self::DeleteAt { path } => {
                let removed = parent_mut(NodeMut::Object(doc), &path, false)
                    .and_then(|node| node.remove(last_segment(&path)));
                if removed.is_none() {
                    vanished(&path);
                }
                None
            }
            Self::MoveAt { from, to } => {
                let moved = match parent_mut(NodeMut::Object(doc), &from, false) {
                    Some(NodeMut::Object(d)) => d.remove(last_segment(&from)),
                    _ => None,
                };
                match moved {
                    Some(value) => {
                        if !path::set(NodeMut::Object(doc), &to, value) {
                            log::debug!("dropping \"{from}\": \"{to}\" has no object parent");
                        }
                    }
                    None => vanished(&from),
                }
                Some(Bson::String(to))
            }
            Self::IncAt { path, delta } => {
                let key = last_segment(&path);
                match parent_mut(NodeMut::Object(doc), &path, true) {
                    Some(mut node) => {
                        let next = match node.reborrow().slot(key) {
                            Some(current) => add(current, &delta),
                            None => Some(delta.clone()),
                        };
                        match next {
                            Some(value) => {
                                node.write(key, value);
                            }
                            None => log::warn!("\"{path}\" is no longer a number, skipping"),
                        }
                    }
                    None => vanished(&path),
                }
                Some(delta)
            }
            Self::PopAt { path, end } => {
                let target = parent_mut(NodeMut::Object(doc), &path, false)
                    .and_then(|node| node.slot(last_segment(&path)));
                match target {
                    Some(Bson::Array(items)) => match end {
                        ArrayEnd::Front if items.is_empty() => None,
                        ArrayEnd::Front => Some(items.remove(0)),
                        ArrayEnd::Back => items.pop(),
                    },
                    _ => {
                        vanished(&path);
                        None
                    }
                }
            }
            Self::SpliceOut { path, indices } => {
                let target = parent_mut(NodeMut::Object(doc), &path, false)
                    .and_then(|node| node.slot(last_segment(&path)));
                let Some(Bson::Array(items)) = target else {
                    vanished(&path);
                    return Some(Bson::Array(Vec::new()));
                };
                let mut pulled = Vec::with_capacity(indices.len());
                for (removed, idx) in indices.into_iter().enumerate() {
                    let at = idx - removed;
                    if at < items.len() {
                        pulled.push(items.remove(at));
                    }
                }
                Some(Bson::Array(pulled))
            }
            Self::AppendAt { path, values, many } => {
                let key = last_segment(&path);
                match parent_mut(NodeMut::Object(doc), &path, true) {
                    Some(mut node) => {
                        let appended = match node.reborrow().slot(key) {
                            Some(Bson::Array(items)) => {
                                items.extend(values.iter().cloned());
                                true
                            }
                            Some(_) => {
                                log::warn!("\"{path}\" is no longer an array, skipping");
                                true
                            }
                            None => false,
                        };
                        if !appended && !node.write(key, Bson::Array(values.clone())) {
                            vanished(&path);
                        }
                    }
                    None => vanished(&path),
                }
                if many { Some(Bson::Array(values)) } else { values.into_iter().next() }
            }
        }
    }
}
