//! Execution backend trait

use async_trait::async_trait;

use crate::query::QueryResult;

/// Raw backend result, as decoded from the store's JSON body
pub type RawResult = serde_json::Value;

/// HTTP verb used to send a statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HttpMethod {
    /// Read-only statements
    Get,
    /// Any statement, including writes such as `SELECT ... INTO`
    #[default]
    Post,
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
        }
    }
}

/// Something that can run statements and accept line-protocol writes
#[async_trait]
pub trait QueryBackend: Send + Sync {
    /// Run a statement against `database` (or the backend's default)
    async fn execute_query(
        &self,
        statement: &str,
        method: HttpMethod,
        database: Option<&str>,
    ) -> QueryResult<RawResult>;

    /// Write line-protocol points into `database` (or the backend's default)
    async fn write_points(&self, points: &str, database: Option<&str>) -> QueryResult<RawResult>;
}
