//! Execution Backends
//!
//! The seam between statement building and the store:
//!
//! - **QueryBackend**: async trait every backend implements
//! - **HttpBackend**: InfluxDB 1.x HTTP API over `reqwest`
//! - **Response**: envelope exposing store-reported errors

mod backend;
mod http;
mod response;

pub use backend::{HttpMethod, QueryBackend, RawResult};
pub use http::{HttpBackend, HttpBackendConfig};
pub use response::Response;
