//! # influxql-builder
//!
//! A fluent builder for InfluxQL statements with memoized execution against
//! an InfluxDB 1.x HTTP endpoint.
//!
//! ## Modules
//!
//! - [`query`]: Expression algebra, clause builders, and the statement composer
//! - [`client`]: Backend trait and the HTTP implementation
//! - [`serializer`]: Result formatters
//! - [`duration`]: Interval literal conversion
//! - [`timezone`]: IANA timezone registry
//! - [`config`]: TOML and environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use influxql_builder::client::{HttpBackend, HttpBackendConfig};
//! use influxql_builder::query::Query;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = HttpBackend::new(HttpBackendConfig {
//!         database: Some("telegraf".to_string()),
//!         ..Default::default()
//!     })?;
//!
//!     let mut query = Query::new();
//!     query
//!         .select(["value"])?
//!         .from_measurements(["cpu"])?
//!         .filter_by("host", "server1")?
//!         .limit(5)?;
//!
//!     // SELECT value FROM "cpu" WHERE host = 'server1' LIMIT 5
//!     println!("{}", query.explain());
//!
//!     let result = query.evaluate(&backend).await?;
//!     println!("{}", result);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod duration;
pub mod logging;
pub mod query;
pub mod serializer;
pub mod timezone;

// Re-export top-level types for convenience
pub use client::{HttpBackend, HttpBackendConfig, HttpMethod, QueryBackend, RawResult, Response};

pub use config::{Config, ConfigError, InfluxConfig, LoggingConfig};

pub use duration::DurationInput;

pub use query::{
    BulkInsert, Criteria, Now, Operator, Q, Query, QueryError, QueryResult, RangeOptions,
    RawQuery, Value,
};

pub use serializer::{RawSerializer, Serializer};
