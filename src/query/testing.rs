//! In-memory backend for unit tests

use async_trait::async_trait;
use serde_json::json;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::client::{HttpMethod, QueryBackend, RawResult};
use crate::query::{QueryError, QueryResult};

/// Records every call and answers with a canned result
pub(crate) struct RecordingBackend {
    response: RawResult,
    fail_next: AtomicBool,
    query_calls: AtomicUsize,
    write_calls: AtomicUsize,
    statements: Mutex<Vec<(String, Option<String>)>>,
}

impl RecordingBackend {
    pub(crate) fn new() -> Self {
        Self::with_response(json!({
            "results": [{
                "statement_id": 0,
                "series": [{"name": "cpu", "columns": ["time", "value"], "values": [[0, 1]]}]
            }]
        }))
    }

    pub(crate) fn with_response(response: RawResult) -> Self {
        Self {
            response,
            fail_next: AtomicBool::new(false),
            query_calls: AtomicUsize::new(0),
            write_calls: AtomicUsize::new(0),
            statements: Mutex::new(Vec::new()),
        }
    }

    /// The first call fails with `Unavailable`, later calls succeed
    pub(crate) fn failing_once() -> Self {
        let backend = Self::new();
        backend.fail_next.store(true, Ordering::SeqCst);
        backend
    }

    pub(crate) fn query_calls(&self) -> usize {
        self.query_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn write_calls(&self) -> usize {
        self.write_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn statements(&self) -> Vec<(String, Option<String>)> {
        self.statements.lock().unwrap().clone()
    }

    async fn answer(&self, statement: &str, database: Option<&str>) -> QueryResult<RawResult> {
        self.statements
            .lock()
            .unwrap()
            .push((statement.to_string(), database.map(str::to_string)));
        // Give concurrent callers a chance to interleave
        tokio::task::yield_now().await;
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(QueryError::Unavailable);
        }
        Ok(self.response.clone())
    }
}

#[async_trait]
impl QueryBackend for RecordingBackend {
    async fn execute_query(
        &self,
        statement: &str,
        _method: HttpMethod,
        database: Option<&str>,
    ) -> QueryResult<RawResult> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        self.answer(statement, database).await
    }

    async fn write_points(&self, points: &str, database: Option<&str>) -> QueryResult<RawResult> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        self.answer(points, database).await
    }
}
