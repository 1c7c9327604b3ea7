//! MongoDB-style filters and update modifiers over a single in-memory BSON
//! document.
//!
//! ```
//! use bson::doc;
//! use docquery::update::UpdateOptions;
//!
//! let mut d = doc! {"name": "Tobi", "location": {"country": "Canada"}};
//! let log = docquery::run(
//!     &mut d,
//!     &doc! {},
//!     &doc! {"$set": {"location.country": "US"}},
//!     &UpdateOptions::default(),
//! )
//! .unwrap();
//! assert_eq!(log.len(), 1);
//! assert_eq!(d.get_document("location").unwrap().get_str("country").unwrap(), "US");
//! ```

pub mod document;
pub mod errors;
pub mod logger;
pub mod query;
pub mod types;
pub mod update;
pub mod utils;

use bson::Document;

use crate::errors::DocError;
use crate::query::{MatchSet, Query};
use crate::update::{ChangeLog, UpdateOptions, UpdateSpec};

/// Parse `query` and `update`, then apply the update to `doc`.
///
/// # Errors
/// Returns a parse error for malformed queries or updates, or the first
/// planning error; in both cases `doc` is left untouched.
pub fn run(
    doc: &mut Document,
    query: &Document,
    update: &Document,
    opts: &UpdateOptions,
) -> Result<ChangeLog, DocError> {
    let query = Query::try_from(query)?;
    let update = UpdateSpec::try_from(update)?;
    update::apply_update(doc, &query, &update, opts)
}

/// Parse `query` and run it against `doc`.
///
/// # Errors
/// Returns an error if the query is malformed.
pub fn filter_document(doc: &Document, query: &Document) -> Result<MatchSet, DocError> {
    Ok(query::filter(doc, &Query::try_from(query)?))
}
