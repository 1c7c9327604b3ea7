//! Utility modules: JSON conversion and numeric helpers.
pub mod json;
pub mod num;
