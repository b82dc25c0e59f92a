//! InfluxDB HTTP Backend
//!
//! Sends statements to the InfluxDB 1.x HTTP API:
//!
//! ```text
//! GET|POST /query?q=<statement>&db=<database>
//! POST     /write?db=<database>          (line protocol body)
//! GET      /ping
//! ```

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};

use crate::client::backend::{HttpMethod, QueryBackend, RawResult};
use crate::config::InfluxConfig;
use crate::query::{QueryError, QueryResult};

/// Configuration for the HTTP backend
#[derive(Debug, Clone)]
pub struct HttpBackendConfig {
    /// Base URL of the store (e.g., "http://localhost:8086")
    pub base_url: String,
    /// Database used when a statement names none
    pub database: Option<String>,
    /// Basic-auth user
    pub username: Option<String>,
    /// Basic-auth password
    pub password: Option<String>,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for HttpBackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8086".to_string(),
            database: None,
            username: None,
            password: None,
            request_timeout_ms: 10_000,
        }
    }
}

impl From<&InfluxConfig> for HttpBackendConfig {
    fn from(config: &InfluxConfig) -> Self {
        Self {
            base_url: config.url.clone(),
            database: config.database.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
            request_timeout_ms: config.request_timeout_ms,
        }
    }
}

/// [`QueryBackend`] over the InfluxDB HTTP API
pub struct HttpBackend {
    client: Client,
    config: HttpBackendConfig,
}

impl HttpBackend {
    /// Create a new backend with the given configuration
    pub fn new(config: HttpBackendConfig) -> QueryResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &HttpBackendConfig {
        &self.config
    }

    /// Check if the store is reachable
    pub async fn ping(&self) -> QueryResult<()> {
        let response = self
            .client
            .get(self.endpoint("ping"))
            .send()
            .await
            .map_err(classify)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(QueryError::Unavailable)
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn database<'a>(&'a self, database: Option<&'a str>) -> Option<&'a str> {
        database.or(self.config.database.as_deref())
    }

    fn authenticate(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.username {
            Some(user) => request.basic_auth(user, self.config.password.as_deref()),
            None => request,
        }
    }

    /// Send a request and decode the JSON body
    async fn send(&self, request: RequestBuilder) -> QueryResult<RawResult> {
        let request_id = uuid::Uuid::new_v4();
        let started = std::time::Instant::now();

        let response = self.authenticate(request).send().await.map_err(classify)?;
        let status = response.status();

        tracing::debug!(
            request_id = %request_id,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Backend request finished"
        );

        let text = response.text().await.map_err(classify)?;

        if !status.is_success() {
            tracing::warn!(request_id = %request_id, status = status.as_u16(), "Backend rejected request");
            return Err(QueryError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        if status == StatusCode::NO_CONTENT || text.trim().is_empty() {
            return Ok(RawResult::Null);
        }

        Ok(serde_json::from_str(&text)?)
    }
}

/// Map a transport error onto the error taxonomy
fn classify(e: reqwest::Error) -> QueryError {
    if e.is_timeout() {
        QueryError::Timeout
    } else if e.is_connect() {
        QueryError::Unavailable
    } else {
        QueryError::Request(e)
    }
}

#[async_trait]
impl QueryBackend for HttpBackend {
    async fn execute_query(
        &self,
        statement: &str,
        method: HttpMethod,
        database: Option<&str>,
    ) -> QueryResult<RawResult> {
        let mut params = vec![("q", statement)];
        if let Some(db) = self.database(database) {
            params.push(("db", db));
        }

        tracing::info!(method = %method, database = ?self.database(database), "Executing statement");

        let url = self.endpoint("query");
        let request = match method {
            HttpMethod::Get => self.client.get(url).query(&params),
            HttpMethod::Post => self.client.post(url).form(&params),
        };

        self.send(request).await
    }

    async fn write_points(&self, points: &str, database: Option<&str>) -> QueryResult<RawResult> {
        let mut request = self.client.post(self.endpoint("write"));
        if let Some(db) = self.database(database) {
            request = request.query(&[("db", db)]);
        }

        tracing::info!(
            database = ?self.database(database),
            lines = points.lines().count(),
            "Writing points"
        );

        self.send(request.body(points.to_string())).await
    }
}
