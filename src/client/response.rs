//! Response envelope
//!
//! Wraps a raw backend result and exposes the error the store may have
//! embedded in an otherwise successful HTTP response:
//!
//! ```text
//! {"error": "..."}                                  request-level error
//! {"results": [{"statement_id": 0, "error": "..."}]} statement-level error
//! ```

use serde_json::Value;

use crate::client::backend::RawResult;
use crate::query::{QueryError, QueryResult};

/// A backend result under inspection
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    raw: RawResult,
}

impl Response {
    /// Wrap a raw result
    pub fn new(raw: RawResult) -> Self {
        Self { raw }
    }

    /// Borrow the raw result
    pub fn raw(&self) -> &RawResult {
        &self.raw
    }

    /// Take back the raw result
    pub fn into_raw(self) -> RawResult {
        self.raw
    }

    /// First error reported by the store, if any
    pub fn error(&self) -> Option<&str> {
        if let Some(error) = self.raw.get("error").and_then(Value::as_str) {
            return Some(error);
        }
        self.results()
            .iter()
            .find_map(|result| result.get("error").and_then(Value::as_str))
    }

    /// Whether the store reported an error
    pub fn has_error(&self) -> bool {
        self.error().is_some()
    }

    /// Fail with [`QueryError::Backend`] if the store reported an error
    pub fn raise_if_error(&self) -> QueryResult<()> {
        match self.error() {
            Some(error) => Err(QueryError::Backend(error.to_string())),
            None => Ok(()),
        }
    }

    /// Per-statement results
    pub fn results(&self) -> &[Value] {
        self.raw
            .get("results")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every series across all statement results
    pub fn series(&self) -> Vec<&Value> {
        self.results()
            .iter()
            .filter_map(|result| result.get("series").and_then(Value::as_array))
            .flatten()
            .collect()
    }
}

impl From<RawResult> for Response {
    fn from(raw: RawResult) -> Self {
        Self::new(raw)
    }
}
