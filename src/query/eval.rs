use bson::{Bson, Document};

use crate::document::Node;
use crate::document::eql::equals;

use super::types::{MatchSet, Matches, Query, Spec};

/// Run `query` against `doc`.
///
/// Walking a path into an array switches to element search: every element is
/// tested against the rest of the path, and matching indices are recorded in
/// the returned [`Matches`] under the array's path.
#[must_use]
pub fn filter(doc: &Document, query: &Query) -> MatchSet {
    filter_node(Node::Object(doc), query)
}

/// Same as [`filter`] for an arbitrary root value.
#[must_use]
pub fn filter_value(value: &Bson, query: &Query) -> MatchSet {
    match Node::of(value) {
        Some(node) => filter_node(node, query),
        None if query.is_empty() => MatchSet::Matched(Matches::default()),
        None => MatchSet::Unmatched,
    }
}

pub(crate) fn filter_node(root: Node<'_>, query: &Query) -> MatchSet {
    let mut acc = Matches::default();
    for clause in &query.clauses {
        if !match_path(root, &clause.path, &clause.spec, &mut acc) {
            log::debug!("filter failed on \"{}\"", clause.path);
            return MatchSet::Unmatched;
        }
    }
    MatchSet::Matched(acc)
}

fn match_path(root: Node<'_>, path: &str, spec: &Spec, acc: &mut Matches) -> bool {
    let segments: Vec<&str> = path.split('.').collect();
    let mut target = root;
    for (i, seg) in segments.iter().enumerate() {
        let Some(value) = target.get(seg) else {
            return false;
        };
        let more = i + 1 < segments.len();
        match value {
            Bson::Array(items) => {
                let prefix = segments[..=i].join(".");
                let search = segments[i + 1..].join(".");
                if search.is_empty() && spec.has_size() {
                    return compare(spec, Some(value));
                }
                search_array(items, &prefix, &search, spec, acc);
                return true;
            }
            Bson::Document(d) if more => target = Node::Object(d),
            other => {
                // A scalar with path left over can never resolve.
                if more || !compare(spec, Some(other)) {
                    return false;
                }
            }
        }
    }
    true
}

fn search_array(items: &[Bson], prefix: &str, search: &str, spec: &Spec, acc: &mut Matches) {
    // Elements recorded by an earlier clause over the same array stay as they are.
    if acc.get(prefix).is_some() {
        log::debug!("array \"{prefix}\" already searched");
        return;
    }
    log::debug!("searching array \"{prefix}\"");
    let found: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| {
            if search.is_empty() {
                compare(spec, Some(item))
            } else {
                match item {
                    Bson::Document(sub) => {
                        let mut scratch = Matches::default();
                        match_path(Node::Object(sub), search, spec, &mut scratch)
                    }
                    _ => false,
                }
            }
        })
        .map(|(idx, _)| idx)
        .collect();
    acc.extend(prefix, found);
}

/// Compare a spec with a single value.
fn compare(spec: &Spec, value: Option<&Bson>) -> bool {
    match spec {
        Spec::Value(expected) => equals(Some(expected), value),
        Spec::Conditions(conds) => conds.iter().all(|c| c.matches(value)),
    }
}
