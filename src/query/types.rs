use bson::Bson;
use regex::Regex;
use std::collections::BTreeMap;

/// A parsed filter: every clause must hold.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub clauses: Vec<Clause>,
}

impl Query {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

/// One `path: spec` entry of a filter.
#[derive(Debug, Clone)]
pub struct Clause {
    pub path: String,
    pub spec: Spec,
}

/// What a path must satisfy.
#[derive(Debug, Clone)]
pub enum Spec {
    /// Literal value (including plain nested objects), matched by equality.
    Value(Bson),
    /// Operator object such as `{ "$gt": 1, "$lt": 5 }`; all must hold.
    Conditions(Vec<Condition>),
}

impl Spec {
    pub(crate) fn has_size(&self) -> bool {
        matches!(self, Self::Conditions(cs) if cs.iter().any(|c| matches!(c, Condition::Size(_))))
    }
}

#[derive(Debug, Clone)]
pub enum Condition {
    Ne(Bson),
    Gt(Bson),
    Gte(Bson),
    Lt(Bson),
    Lte(Bson),
    Regex(Regex),
    Exists(bool),
    In(Bson),
    Nin(Bson),
    Size(Bson),
    ElemMatch(Query),
}

impl Condition {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Ne(_) => "$ne",
            Self::Gt(_) => "$gt",
            Self::Gte(_) => "$gte",
            Self::Lt(_) => "$lt",
            Self::Lte(_) => "$lte",
            Self::Regex(_) => "$regex",
            Self::Exists(_) => "$exists",
            Self::In(_) => "$in",
            Self::Nin(_) => "$nin",
            Self::Size(_) => "$size",
            Self::ElemMatch(_) => "$elemMatch",
        }
    }
}

/// Array elements captured while filtering, keyed by the dotted path of the
/// array that holds them. Elements are identified by their index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Matches {
    arrays: BTreeMap<String, Vec<usize>>,
}

impl Matches {
    #[must_use]
    pub fn get(&self, prefix: &str) -> Option<&[usize]> {
        self.arrays.get(prefix).map(Vec::as_slice)
    }

    /// Index of the first element matched in the array at `prefix`.
    #[must_use]
    pub fn first(&self, prefix: &str) -> Option<usize> {
        self.get(prefix).and_then(|ids| ids.first().copied())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.arrays.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Append newly matched indices, skipping ones already recorded.
    pub(crate) fn extend(&mut self, prefix: &str, found: Vec<usize>) {
        if found.is_empty() {
            return;
        }
        let entry = self.arrays.entry(prefix.to_owned()).or_default();
        for idx in found {
            if !entry.contains(&idx) {
                entry.push(idx);
            }
        }
    }
}

/// Result of running a filter against a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchSet {
    Unmatched,
    Matched(Matches),
}

impl MatchSet {
    #[must_use]
    pub const fn is_match(&self) -> bool {
        matches!(self, Self::Matched(_))
    }

    #[must_use]
    pub const fn matches(&self) -> Option<&Matches> {
        match self {
            Self::Matched(m) => Some(m),
            Self::Unmatched => None,
        }
    }
}
