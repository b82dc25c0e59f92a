//! Query error types
//!
//! Defines all error conditions that can occur while building, rendering and
//! executing a statement.

use thiserror::Error;

/// Errors that can occur during query operations
#[derive(Error, Debug)]
pub enum QueryError {
    /// A clause builder received a value of the wrong shape
    #[error("Invalid type: {0}")]
    InvalidType(String),

    /// An unrecognized filter lookup was used
    #[error("Invalid attribute: {0}")]
    AttributeValue(String),

    /// The store reported a failure for the statement
    #[error("Backend error: {0}")]
    Backend(String),

    /// The store answered with a non-success HTTP status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Transport-level request failure
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Request timed out
    #[error("Request timeout")]
    Timeout,

    /// Store could not be reached
    #[error("Backend unavailable")]
    Unavailable,

    /// Response body could not be decoded
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl QueryError {
    pub(crate) fn invalid_type(msg: impl Into<String>) -> Self {
        QueryError::InvalidType(msg.into())
    }
}

impl From<serde_json::Error> for QueryError {
    fn from(err: serde_json::Error) -> Self {
        QueryError::Serialization(err.to_string())
    }
}

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;
