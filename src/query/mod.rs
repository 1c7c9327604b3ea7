// Submodules for separation of concerns
mod eval;
mod ops;
mod parse;
mod types;

// Public API re-exports
pub use eval::{filter, filter_value};
pub use parse::{parse_query_json, parse_spec};
pub use types::{Clause, Condition, MatchSet, Matches, Query, Spec};

pub(crate) use parse::{is_operator_doc, parse_conditions};
