//! Error types for knowledge-base access and search requests.
//!
//! "No solution" is not an error: stores report it as `Ok(None)` and the
//! gateway turns it into an empty sequence or an empty string.

use thiserror::Error;

/// Failure talking to the knowledge base.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KbError {
    /// The knowledge base is unreachable or failed to load.
    #[error("knowledge base unavailable: {0}")]
    Connection(String),

    /// The query was rejected or the response had an unexpected shape.
    #[error("query `{goal}` failed: {message}")]
    Query { goal: String, message: String },
}

impl KbError {
    pub fn query(goal: impl ToString, message: impl Into<String>) -> Self {
        KbError::Query {
            goal: goal.to_string(),
            message: message.into(),
        }
    }
}

/// Invalid search input, detected before any store query runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("select at least one property to search")]
    EmptySelection,

    #[error("property `{0}` is already selected")]
    DuplicateProperty(String),
}
