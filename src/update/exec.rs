use bson::{Bson, Document};

use crate::document::Node;
use crate::document::path;
use crate::errors::DocError;
use crate::query::{MatchSet, Matches, Query, filter};

use super::mods::plan;
use super::types::{ChangeLog, ChangeLogEntry, Modifier, Transaction, UpdateOptions, UpdateSpec};

/// Apply `update` to `doc`.
///
/// Every modifier is planned against the untouched document first; the first
/// failed precondition aborts the call with the document unchanged. The
/// planned transactions are then committed in order, one change log entry each.
///
/// # Errors
/// Returns the first planning error (`TypeMismatch`, `InvalidFieldName`, or a
/// malformed `$pull` condition).
pub fn apply_update(
    doc: &mut Document,
    query: &Query,
    update: &UpdateSpec,
    opts: &UpdateOptions,
) -> Result<ChangeLog, DocError> {
    let matched = (!query.is_empty()).then(|| filter(doc, query));
    if opts.strict && matches!(matched, Some(MatchSet::Unmatched)) {
        log::debug!("no matches for query, update skipped");
        return Ok(ChangeLog::new());
    }
    let transactions = plan_all(doc, matched.as_ref().and_then(MatchSet::matches), update)?;

    let mut log = ChangeLog::with_capacity(transactions.len());
    for tx in transactions {
        let value = tx.effect.commit(doc);
        log.push(ChangeLogEntry { op: tx.op, key: tx.key, value });
    }
    log::info!(target: "docquery::audit", "update applied: {} change(s)", log.len());
    Ok(log)
}

fn plan_all(
    doc: &Document,
    matches: Option<&Matches>,
    update: &UpdateSpec,
) -> Result<Vec<Transaction>, DocError> {
    let root = Node::Object(doc);
    let mut out = Vec::new();
    for group in &update.groups {
        log::debug!("found modifier \"{}\"", group.modifier);
        for (path, operand) in &group.fields {
            if let Some(tx) = plan_path(root, matches, group.modifier, path, operand)? {
                out.push(tx);
            }
        }
    }
    Ok(out)
}

/// Split `a.$.b` into `("a", Some("b"))` and `a.$` into `("a", None)`.
fn positional(path: &str) -> Option<(&str, Option<&str>)> {
    if let Some((prefix, suffix)) = path.split_once(".$.") {
        return Some((prefix, Some(suffix)));
    }
    path.strip_suffix(".$").map(|prefix| (prefix, None))
}

fn plan_path(
    root: Node<'_>,
    matches: Option<&Matches>,
    op: Modifier,
    path: &str,
    operand: &Bson,
) -> Result<Option<Transaction>, DocError> {
    let Some((prefix, suffix)) = positional(path) else {
        let effect = plan(op, root, path, operand)?;
        return Ok(effect.map(|effect| Transaction { op, key: path.to_owned(), effect }));
    };

    let Some(idx) = matches.and_then(|m| m.first(prefix)) else {
        log::debug!("ignoring \"{path}\" {op} - no matches within \"{prefix}\"");
        return Ok(None);
    };
    let base = format!("{prefix}.{idx}");
    match suffix {
        Some(suffix) => {
            let element = match path::get(root, prefix) {
                Some(Bson::Array(items)) => items.get(idx).and_then(Node::of),
                _ => None,
            };
            let Some(element) = element else {
                return Ok(None);
            };
            log::debug!("executing \"{path}\" {op} on first match within \"{prefix}\"");
            let effect = plan(op, element, suffix, operand)?;
            Ok(effect.map(|effect| Transaction {
                op,
                key: format!("{base}.{suffix}"),
                effect: effect.rebase(&base),
            }))
        }
        None => {
            let effect = plan(op, root, &base, operand)?;
            Ok(effect.map(|effect| Transaction { op, key: base, effect }))
        }
    }
}
