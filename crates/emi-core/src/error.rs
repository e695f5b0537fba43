use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A single failed check on one prepayment row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrepaymentRowError {
    /// Zero-based index of the offending row in the submitted list.
    pub row: usize,
    pub field: String,
    pub reason: String,
}

impl fmt::Display for PrepaymentRowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {} {}: {}", self.row, self.field, self.reason)
    }
}

#[derive(Debug, Error)]
pub enum EmiError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid prepayment rows: {}", join_rows(.0))]
    InvalidPrepaymentRows(Vec<PrepaymentRowError>),

    #[error("Numeric degeneracy in {context}")]
    NumericDegeneracy { context: String },

    #[error("Structural mismatch: {0}")]
    StructuralMismatch(String),

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl EmiError {
    /// Rows flagged by prepayment validation, empty for every other variant.
    pub fn invalid_rows(&self) -> &[PrepaymentRowError] {
        match self {
            EmiError::InvalidPrepaymentRows(rows) => rows,
            _ => &[],
        }
    }
}

impl From<serde_json::Error> for EmiError {
    fn from(e: serde_json::Error) -> Self {
        EmiError::SerializationError(e.to_string())
    }
}

fn join_rows(rows: &[PrepaymentRowError]) -> String {
    rows.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
