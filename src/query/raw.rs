//! Raw Statements and Memoized Execution
//!
//! Every executable object owns a [`ResolveCache`] mapping
//! `(statement, database)` to the backend's raw result. The first call for a
//! key reaches the backend; later calls with the same key are served from the
//! cache for the lifetime of the object. The cache lock is held across the
//! backend call, so concurrent callers on one instance never issue the same
//! request twice. Failed calls are not cached.

use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::client::{HttpMethod, QueryBackend, RawResult};
use crate::query::error::QueryResult;

/// How a statement reaches the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Dispatch {
    /// `execute_query` with the given verb
    Query(HttpMethod),
    /// `write_points`
    Write,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    statement: String,
    database: Option<String>,
}

/// Per-instance memoization of backend results
#[derive(Debug, Default)]
pub(crate) struct ResolveCache {
    entries: Mutex<HashMap<CacheKey, RawResult>>,
}

impl ResolveCache {
    /// Return the cached result for the key, or call the backend once
    pub(crate) async fn resolve(
        &self,
        backend: &dyn QueryBackend,
        dispatch: Dispatch,
        statement: &str,
        database: Option<&str>,
    ) -> QueryResult<RawResult> {
        let key = CacheKey {
            statement: statement.to_string(),
            database: database.map(str::to_string),
        };

        let mut entries = self.entries.lock().await;
        if let Some(hit) = entries.get(&key) {
            tracing::debug!(statement = %statement, "Serving statement from cache");
            return Ok(hit.clone());
        }

        let result = match dispatch {
            Dispatch::Query(method) => backend.execute_query(statement, method, database).await?,
            Dispatch::Write => backend.write_points(statement, database).await?,
        };

        entries.insert(key, result.clone());
        Ok(result)
    }

    /// Number of resolved keys
    pub(crate) async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Forget every resolved key
    pub(crate) async fn clear(&self) {
        self.entries.lock().await.clear();
    }
}

/// A literal statement, executed as written
#[derive(Debug, Default)]
pub struct RawQuery {
    statement: String,
    database: Option<String>,
    cache: ResolveCache,
}

impl RawQuery {
    /// Create a raw query from statement text
    pub fn new(statement: impl Into<String>) -> Self {
        Self {
            statement: statement.into(),
            database: None,
            cache: ResolveCache::default(),
        }
    }

    /// Target a specific database
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// The statement text
    pub fn query(&self) -> &str {
        &self.statement
    }

    /// Run the statement, at most once per instance
    pub async fn execute(&self, backend: &dyn QueryBackend) -> QueryResult<RawResult> {
        self.cache
            .resolve(
                backend,
                Dispatch::Query(HttpMethod::Post),
                &self.statement,
                self.database.as_deref(),
            )
            .await
    }

    /// Number of distinct statements resolved so far
    pub async fn resolved_count(&self) -> usize {
        self.cache.len().await
    }

    /// Drop cached results so the next execution reaches the backend
    pub async fn reset(&self) {
        self.cache.clear().await;
    }
}

/// Line-protocol points sent through `write_points`
#[derive(Debug, Default)]
pub struct BulkInsert {
    points: String,
    database: Option<String>,
    cache: ResolveCache,
}

impl BulkInsert {
    /// Create a bulk insert from line-protocol text
    pub fn new(points: impl Into<String>) -> Self {
        Self {
            points: points.into(),
            database: None,
            cache: ResolveCache::default(),
        }
    }

    /// Target a specific database
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// The line-protocol text
    pub fn points(&self) -> &str {
        &self.points
    }

    /// Write the points, at most once per instance
    pub async fn execute(&self, backend: &dyn QueryBackend) -> QueryResult<RawResult> {
        self.cache
            .resolve(backend, Dispatch::Write, &self.points, self.database.as_deref())
            .await
    }
}
