use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocError {
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Invalid field name: {0}")]
    InvalidFieldName(String),

    #[error("Unknown operator: {0}")]
    UnknownOperator(String),

    #[error("Invalid operand: {0}")]
    InvalidOperand(String),

    #[error("Regex: {0}")]
    Regex(#[from] regex::Error),

    #[error("Serde JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("BSON: {0}")]
    Bson(String),
}

impl DocError {
    /// True for the precondition failures raised while planning an update.
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::TypeMismatch(_) | Self::InvalidFieldName(_))
    }
}
