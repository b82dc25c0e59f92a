//! Result formatters used by `Query::evaluate`.

use crate::client::{RawResult, Response};
use crate::query::QueryResult;

/// Converts a checked response into the caller's output type
///
/// Options travel on the implementing value itself.
pub trait Serializer {
    /// Converted output
    type Output;

    /// Convert the response
    fn convert(&self, response: Response) -> QueryResult<Self::Output>;
}

/// Pass-through formatter returning the raw JSON unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct RawSerializer;

impl Serializer for RawSerializer {
    type Output = RawResult;

    fn convert(&self, response: Response) -> QueryResult<Self::Output> {
        Ok(response.into_raw())
    }
}
