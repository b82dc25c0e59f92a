//! Query Builder
//!
//! Composes InfluxQL SELECT statements from typed parts:
//!
//! - **Criteria**: expression algebra for WHERE and SELECT
//! - **Filter**: `field__lookup` keyword translation
//! - **Aggregation**: `MEAN(usage)`, `COUNT(/^usage$/)` and friends
//! - **Clause**: one state value per clause
//! - **Statement**: [`Query`], the composer with memoized execution
//! - **Raw**: literal statements and line-protocol writes
//!
//! # Examples
//!
//! ```rust,ignore
//! use influxql_builder::query::{Now, Query, RangeOptions};
//! use chrono::Duration;
//!
//! let mut query = Query::with_database("telegraf");
//! query
//!     .mean("usage_idle")?
//!     .from_measurements(["cpu"])?
//!     .filter_by("time__gte", Now::minus("1h")?)?
//!     .range_by(Duration::minutes(5), RangeOptions::new().fill(0))?
//!     .tz("Europe/Paris")?;
//!
//! // SELECT MEAN(usage_idle) FROM "cpu" WHERE time >= now() - 1h
//! //   GROUP BY time(5m) fill(0) tz('Europe/Paris')
//! println!("{}", query.explain());
//!
//! let result = query.evaluate(&backend).await?;
//! ```

mod aggregation;
mod clause;
mod criteria;
mod error;
mod filter;
mod raw;
mod statement;

#[cfg(test)]
pub(crate) mod testing;

pub use aggregation::{generate_values, Aggregation, AggregationFunc};
pub use clause::{GroupKey, RangeOptions};
pub use criteria::{Criteria, Now, Operator, Selectable, Value};
pub use error::{QueryError, QueryResult};
pub use filter::{process_filter, Lookup, Q};
pub use raw::{BulkInsert, RawQuery};
pub use statement::{ClauseKind, Query, CLAUSE_ORDER};
