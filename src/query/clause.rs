//! Clause Builders
//!
//! One state struct per statement clause. Each validates its own input and
//! renders its own fragment; an unset clause renders as an empty string.

use crate::duration::DurationInput;
use crate::query::criteria::{Criteria, Selectable};
use crate::query::error::{QueryError, QueryResult};
use crate::timezone;
use chrono::Duration;

/// A renderable statement clause
pub(crate) trait Clause {
    /// Render the fragment, or an empty string when the clause is unset
    fn render(&self) -> String;
}

/// Reject empty names
fn validate_name(name: &str, what: &str) -> QueryResult<()> {
    if name.trim().is_empty() {
        return Err(QueryError::invalid_type(format!("{} should not be empty", what)));
    }
    Ok(())
}

/// Validate a tag list, requiring at least one entry
fn validate_tags(tags: &[String]) -> QueryResult<()> {
    if tags.is_empty() {
        return Err(QueryError::invalid_type("tags should not be empty"));
    }
    tags.iter().try_for_each(|tag| validate_name(tag, "tag"))
}

// ============================================
// SELECT
// ============================================

#[derive(Debug, Clone, Default)]
pub(crate) struct SelectClause {
    fields: Vec<String>,
}

impl SelectClause {
    pub(crate) fn push(&mut self, field: Selectable) -> QueryResult<()> {
        if let Selectable::Field(name) = &field {
            validate_name(name, "field")?;
        }
        self.fields.push(field.evaluate());
        Ok(())
    }
}

impl Clause for SelectClause {
    fn render(&self) -> String {
        if self.fields.is_empty() {
            "SELECT *".to_string()
        } else {
            format!("SELECT {}", self.fields.join(","))
        }
    }
}

// ============================================
// INTO
// ============================================

#[derive(Debug, Clone, Default)]
pub(crate) struct IntoClause {
    measurement: Option<String>,
}

impl IntoClause {
    pub(crate) fn set(&mut self, measurement: &str) -> QueryResult<()> {
        validate_name(measurement, "measurement")?;
        self.measurement = Some(measurement.to_string());
        Ok(())
    }
}

impl Clause for IntoClause {
    fn render(&self) -> String {
        self.measurement
            .as_ref()
            .map(|m| format!("INTO {}", m))
            .unwrap_or_default()
    }
}

// ============================================
// FROM
// ============================================

/// Measurement used when none was selected
const DEFAULT_MEASUREMENT: &str = "\"default\"";

#[derive(Debug, Clone, Default)]
pub(crate) struct FromClause {
    source: Option<String>,
}

impl FromClause {
    pub(crate) fn set_measurements(&mut self, measurements: &[String]) -> QueryResult<()> {
        if measurements.is_empty() {
            return Err(QueryError::invalid_type("measurements should not be empty"));
        }
        measurements
            .iter()
            .try_for_each(|m| validate_name(m, "measurement"))?;

        let quoted: Vec<String> = measurements.iter().map(|m| quote_identifier(m)).collect();
        self.source = Some(quoted.join(","));
        Ok(())
    }

    pub(crate) fn set_subquery(&mut self, statement: String) {
        self.source = Some(format!("({})", statement));
    }
}

impl Clause for FromClause {
    fn render(&self) -> String {
        format!(
            "FROM {}",
            self.source.as_deref().unwrap_or(DEFAULT_MEASUREMENT)
        )
    }
}

/// Double-quote an identifier, escaping backslashes and embedded quotes
fn quote_identifier(name: &str) -> String {
    let mut quoted = String::with_capacity(name.len() + 2);
    quoted.push('"');
    for c in name.chars() {
        if c == '\\' || c == '"' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

// ============================================
// WHERE
// ============================================

#[derive(Debug, Clone, Default)]
pub(crate) struct WhereClause {
    criteria: Vec<Criteria>,
}

impl WhereClause {
    fn validate(criteria: &[Criteria]) -> QueryResult<()> {
        if criteria.is_empty() {
            return Err(QueryError::invalid_type("criteria should not be empty"));
        }
        criteria.iter().try_for_each(Criteria::validate)
    }

    pub(crate) fn replace(&mut self, criteria: Vec<Criteria>) -> QueryResult<()> {
        Self::validate(&criteria)?;
        self.criteria = criteria;
        Ok(())
    }

    pub(crate) fn extend(&mut self, criteria: Vec<Criteria>) -> QueryResult<()> {
        Self::validate(&criteria)?;
        self.criteria.extend(criteria);
        Ok(())
    }
}

impl Clause for WhereClause {
    fn render(&self) -> String {
        if self.criteria.is_empty() {
            return String::new();
        }
        let joined = self
            .criteria
            .iter()
            .map(Criteria::evaluate)
            .collect::<Vec<_>>()
            .join(" AND ");
        format!("WHERE {}", joined)
    }
}

// ============================================
// LIMIT / OFFSET / SLIMIT / SOFFSET
// ============================================

/// A clause holding one strictly positive integer
#[derive(Debug, Clone)]
pub(crate) struct PositiveClause {
    keyword: &'static str,
    value: Option<u64>,
}

impl PositiveClause {
    pub(crate) fn new(keyword: &'static str) -> Self {
        Self {
            keyword,
            value: None,
        }
    }

    pub(crate) fn set(&mut self, value: i64) -> QueryResult<()> {
        if value <= 0 {
            return Err(QueryError::invalid_type(format!(
                "{} value must be a positive integer, got {}",
                self.keyword, value
            )));
        }
        self.value = Some(value as u64);
        Ok(())
    }
}

impl Clause for PositiveClause {
    fn render(&self) -> String {
        self.value
            .map(|n| format!("{} {}", self.keyword, n))
            .unwrap_or_default()
    }
}

// ============================================
// GROUP BY
// ============================================

/// One argument to a GROUP BY call: a tag name or a time interval
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupKey {
    /// Group by a tag (or `*` for all tags)
    Tag(String),
    /// Group into time buckets of this width
    Interval(Duration),
}

impl From<&str> for GroupKey {
    fn from(tag: &str) -> Self {
        Self::Tag(tag.to_string())
    }
}

impl From<String> for GroupKey {
    fn from(tag: String) -> Self {
        Self::Tag(tag)
    }
}

impl From<Duration> for GroupKey {
    fn from(interval: Duration) -> Self {
        Self::Interval(interval)
    }
}

/// Optional parts of a time-bucket grouping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeOptions {
    shift: Option<DurationInput>,
    fill: Option<i64>,
    tags: Vec<String>,
}

impl RangeOptions {
    /// Create empty options
    pub fn new() -> Self {
        Self::default()
    }

    /// Offset the bucket boundaries: `time(interval,shift)`
    ///
    /// A zero or negative offset is valid and renders as given.
    pub fn shift(mut self, shift: impl Into<DurationInput>) -> Self {
        self.shift = Some(shift.into());
        self
    }

    /// Value for empty buckets: `fill(n)`
    ///
    /// `fill(0)` is rendered too; only an unset fill is omitted.
    pub fn fill(mut self, fill: i64) -> Self {
        self.fill = Some(fill);
        self
    }

    /// Additional tags to group by after the time bucket
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub(crate) fn has_time_parts(&self) -> bool {
        self.shift.is_some() || self.fill.is_some()
    }
}

/// Resolved time-bucket grouping
#[derive(Debug, Clone, PartialEq, Eq)]
struct TimeBucket {
    interval: String,
    shift: Option<String>,
    fill: Option<i64>,
    tags: Vec<String>,
}

/// GROUP BY is either by tags or by time, never both
#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum GroupMode {
    #[default]
    Unset,
    Tags(Vec<String>),
    Time(TimeBucket),
}

#[derive(Debug, Clone, Default)]
pub(crate) struct GroupByClause {
    mode: GroupMode,
}

impl GroupByClause {
    pub(crate) fn by_tags(&mut self, tags: Vec<String>) -> QueryResult<()> {
        validate_tags(&tags)?;
        self.mode = GroupMode::Tags(tags);
        Ok(())
    }

    pub(crate) fn by_time(&mut self, interval: DurationInput, options: RangeOptions) -> QueryResult<()> {
        if !options.tags.is_empty() {
            validate_tags(&options.tags)?;
        }
        if interval.to_duration()? <= Duration::zero() {
            return Err(QueryError::invalid_type(format!(
                "time interval must be positive, got {}",
                interval.to_literal()?
            )));
        }
        let bucket = TimeBucket {
            interval: interval.to_literal()?,
            shift: options.shift.map(|s| s.to_literal()).transpose()?,
            fill: options.fill,
            tags: options.tags,
        };
        self.mode = GroupMode::Time(bucket);
        Ok(())
    }
}

impl Clause for GroupByClause {
    fn render(&self) -> String {
        match &self.mode {
            GroupMode::Unset => String::new(),
            GroupMode::Tags(tags) => format!("GROUP BY {}", tags.join(", ")),
            GroupMode::Time(bucket) => {
                let mut clause = match &bucket.shift {
                    Some(shift) => format!("GROUP BY time({},{})", bucket.interval, shift),
                    None => format!("GROUP BY time({})", bucket.interval),
                };
                if !bucket.tags.is_empty() {
                    clause.push(',');
                    clause.push_str(&bucket.tags.join(","));
                }
                if let Some(fill) = bucket.fill {
                    clause.push_str(&format!(" fill({})", fill));
                }
                clause
            }
        }
    }
}

// ============================================
// ORDER BY
// ============================================

#[derive(Debug, Clone, Default)]
pub(crate) struct OrderByClause {
    ascending: Option<bool>,
    field: Option<String>,
}

impl OrderByClause {
    pub(crate) fn set_direction(&mut self, ascending: bool) {
        self.ascending = Some(ascending);
    }

    /// A leading `-` sorts descending
    pub(crate) fn set_field(&mut self, field: &str) -> QueryResult<()> {
        let (ascending, name) = match field.strip_prefix('-') {
            Some(name) => (false, name),
            None => (true, field),
        };
        validate_name(name, "order field")?;
        self.ascending = Some(ascending);
        self.field = Some(name.to_string());
        Ok(())
    }
}

impl Clause for OrderByClause {
    fn render(&self) -> String {
        let Some(ascending) = self.ascending else {
            return String::new();
        };
        let direction = if ascending { "ASC" } else { "DESC" };
        match &self.field {
            Some(field) => format!("ORDER BY {} {}", field, direction),
            None => format!("ORDER BY {}", direction),
        }
    }
}

// ============================================
// tz()
// ============================================

#[derive(Debug, Clone, Default)]
pub(crate) struct TimezoneClause {
    name: Option<String>,
}

impl TimezoneClause {
    pub(crate) fn set(&mut self, name: &str) -> QueryResult<()> {
        if !timezone::is_valid(name) {
            return Err(QueryError::invalid_type(format!(
                "'{}' is an invalid timezone",
                name
            )));
        }
        self.name = Some(name.to_string());
        Ok(())
    }
}

impl Clause for TimezoneClause {
    fn render(&self) -> String {
        self.name
            .as_ref()
            .map(|tz| format!("tz('{}')", tz))
            .unwrap_or_default()
    }
}
