//! Statement Composer
//!
//! [`Query`] owns one state value per clause and renders them in the order
//! the store requires:
//!
//! ```text
//! SELECT … INTO … FROM … WHERE … OFFSET … SLIMIT … SOFFSET …
//! GROUP BY … ORDER BY … tz(…) LIMIT …
//! ```
//!
//! Builder calls return `&mut Query` so they chain; calls that validate input
//! return `QueryResult<&mut Query>` and chain with `?`.

use crate::client::{HttpMethod, QueryBackend, RawResult, Response};
use crate::duration::DurationInput;
use crate::query::clause::{
    Clause, FromClause, GroupByClause, GroupKey, IntoClause, OrderByClause, PositiveClause,
    RangeOptions, SelectClause, TimezoneClause, WhereClause,
};
use crate::query::criteria::{Criteria, Selectable, Value};
use crate::query::error::{QueryError, QueryResult};
use crate::query::filter::{process_filter, Q};
use crate::query::raw::{Dispatch, ResolveCache};
use crate::serializer::{RawSerializer, Serializer};

/// Statement clauses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClauseKind {
    Select,
    Into,
    From,
    Where,
    Offset,
    SLimit,
    SOffset,
    GroupBy,
    OrderBy,
    Timezone,
    Limit,
}

/// Render order. The store rejects statements whose clauses appear in any
/// other order.
pub const CLAUSE_ORDER: [ClauseKind; 11] = [
    ClauseKind::Select,
    ClauseKind::Into,
    ClauseKind::From,
    ClauseKind::Where,
    ClauseKind::Offset,
    ClauseKind::SLimit,
    ClauseKind::SOffset,
    ClauseKind::GroupBy,
    ClauseKind::OrderBy,
    ClauseKind::Timezone,
    ClauseKind::Limit,
];

/// One state value per clause
#[derive(Debug, Clone)]
struct Clauses {
    select: SelectClause,
    into: IntoClause,
    from: FromClause,
    filter: WhereClause,
    limit: PositiveClause,
    offset: PositiveClause,
    slimit: PositiveClause,
    soffset: PositiveClause,
    group_by: GroupByClause,
    order_by: OrderByClause,
    timezone: TimezoneClause,
}

impl Default for Clauses {
    fn default() -> Self {
        Self {
            select: SelectClause::default(),
            into: IntoClause::default(),
            from: FromClause::default(),
            filter: WhereClause::default(),
            limit: PositiveClause::new("LIMIT"),
            offset: PositiveClause::new("OFFSET"),
            slimit: PositiveClause::new("SLIMIT"),
            soffset: PositiveClause::new("SOFFSET"),
            group_by: GroupByClause::default(),
            order_by: OrderByClause::default(),
            timezone: TimezoneClause::default(),
        }
    }
}

impl Clauses {
    fn clause(&self, kind: ClauseKind) -> &dyn Clause {
        match kind {
            ClauseKind::Select => &self.select,
            ClauseKind::Into => &self.into,
            ClauseKind::From => &self.from,
            ClauseKind::Where => &self.filter,
            ClauseKind::Offset => &self.offset,
            ClauseKind::SLimit => &self.slimit,
            ClauseKind::SOffset => &self.soffset,
            ClauseKind::GroupBy => &self.group_by,
            ClauseKind::OrderBy => &self.order_by,
            ClauseKind::Timezone => &self.timezone,
            ClauseKind::Limit => &self.limit,
        }
    }
}

/// A composable SELECT statement with memoized execution
#[derive(Debug, Default)]
pub struct Query {
    clauses: Clauses,
    database: Option<String>,
    cache: ResolveCache,
}

impl Query {
    /// Create an empty query (renders `SELECT * FROM "default"`)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty query targeting `database`
    pub fn with_database(database: impl Into<String>) -> Self {
        Self {
            database: Some(database.into()),
            ..Self::default()
        }
    }

    /// Target database, if any
    pub fn target_database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    // ============================================
    // SELECT / INTO / FROM
    // ============================================

    /// Add fields or expressions to the SELECT list
    pub fn select<I, S>(&mut self, fields: I) -> QueryResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<Selectable>,
    {
        for field in fields {
            self.clauses.select.push(field.into())?;
        }
        Ok(self)
    }

    /// Alias of [`Query::select`]
    pub fn only<I, S>(&mut self, fields: I) -> QueryResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<Selectable>,
    {
        self.select(fields)
    }

    /// Write results into another measurement
    pub fn into_measurement(&mut self, measurement: &str) -> QueryResult<&mut Self> {
        self.clauses.into.set(measurement)?;
        Ok(self)
    }

    /// Read from one or more measurements
    pub fn from_measurements<I, S>(&mut self, measurements: I) -> QueryResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let measurements: Vec<String> = measurements.into_iter().map(Into::into).collect();
        self.clauses.from.set_measurements(&measurements)?;
        Ok(self)
    }

    /// Read from the result of another query: `FROM (<inner>)`
    pub fn subquery(&mut self, inner: &Query) -> &mut Self {
        self.clauses.from.set_subquery(inner.explain());
        self
    }

    // ============================================
    // WHERE
    // ============================================

    /// Replace all criteria
    pub fn where_<I>(&mut self, criteria: I) -> QueryResult<&mut Self>
    where
        I: IntoIterator<Item = Criteria>,
    {
        self.clauses.filter.replace(criteria.into_iter().collect())?;
        Ok(self)
    }

    /// Append every member of a filter group
    pub fn filter(&mut self, group: Q) -> QueryResult<&mut Self> {
        self.clauses.filter.extend(group.into_inner())?;
        Ok(self)
    }

    /// Append one `field__lookup` filter
    pub fn filter_by(&mut self, key: &str, value: impl Into<Value>) -> QueryResult<&mut Self> {
        self.clauses.filter.extend(vec![process_filter(key, value)?])?;
        Ok(self)
    }

    /// Append the negation of every member of a filter group
    ///
    /// Members are negated one by one and stay ANDed: excluding
    /// `a = 1 AND b = 2` renders `a != 1 AND b != 2`, not `NOT (a AND b)`.
    /// Pass a single combined expression to negate the group as a whole.
    pub fn exclude(&mut self, group: Q) -> QueryResult<&mut Self> {
        let negated = group
            .into_inner()
            .into_iter()
            .map(Criteria::negate)
            .collect::<QueryResult<Vec<_>>>()?;
        self.clauses.filter.extend(negated)?;
        Ok(self)
    }

    /// Append the negation of one `field__lookup` filter
    pub fn exclude_by(&mut self, key: &str, value: impl Into<Value>) -> QueryResult<&mut Self> {
        self.clauses
            .filter
            .extend(vec![process_filter(key, value)?.negate()?])?;
        Ok(self)
    }

    // ============================================
    // LIMIT / OFFSET / SLIMIT / SOFFSET
    // ============================================

    /// `LIMIT n`, n > 0
    pub fn limit(&mut self, value: i64) -> QueryResult<&mut Self> {
        self.clauses.limit.set(value)?;
        Ok(self)
    }

    /// `OFFSET n`, n > 0
    pub fn offset(&mut self, value: i64) -> QueryResult<&mut Self> {
        self.clauses.offset.set(value)?;
        Ok(self)
    }

    /// `SLIMIT n`, n > 0
    pub fn slimit(&mut self, value: i64) -> QueryResult<&mut Self> {
        self.clauses.slimit.set(value)?;
        Ok(self)
    }

    /// `SOFFSET n`, n > 0
    pub fn soffset(&mut self, value: i64) -> QueryResult<&mut Self> {
        self.clauses.soffset.set(value)?;
        Ok(self)
    }

    // ============================================
    // GROUP BY
    // ============================================

    /// Group by tags, or by time when one of the keys is an interval
    pub fn group_by<I, K>(&mut self, keys: I) -> QueryResult<&mut Self>
    where
        I: IntoIterator<Item = K>,
        K: Into<GroupKey>,
    {
        self.group_by_with(keys, RangeOptions::default())
    }

    /// [`Query::group_by`] with shift and fill for the time bucket
    ///
    /// The remaining tag keys are appended after the time bucket. Shift and
    /// fill without an interval are rejected.
    pub fn group_by_with<I, K>(&mut self, keys: I, options: RangeOptions) -> QueryResult<&mut Self>
    where
        I: IntoIterator<Item = K>,
        K: Into<GroupKey>,
    {
        let mut interval = None;
        let mut tags = Vec::new();
        for key in keys {
            match key.into() {
                GroupKey::Tag(tag) => tags.push(tag),
                GroupKey::Interval(duration) => {
                    if interval.replace(duration).is_some() {
                        return Err(QueryError::invalid_type(
                            "group_by accepts at most one interval",
                        ));
                    }
                }
            }
        }

        match interval {
            Some(duration) => self.range_by(duration, options.tags(tags)),
            None => {
                if options.has_time_parts() {
                    return Err(QueryError::invalid_type(
                        "shift and fill require a time interval",
                    ));
                }
                self.clauses.group_by.by_tags(tags)?;
                Ok(self)
            }
        }
    }

    /// Group into time buckets: `GROUP BY time(interval[,shift])[,tags][ fill(n)]`
    pub fn range_by(
        &mut self,
        interval: impl Into<DurationInput>,
        options: RangeOptions,
    ) -> QueryResult<&mut Self> {
        self.clauses.group_by.by_time(interval.into(), options)?;
        Ok(self)
    }

    // ============================================
    // ORDER BY / tz()
    // ============================================

    /// `ORDER BY ASC`
    pub fn asc(&mut self) -> &mut Self {
        self.clauses.order_by.set_direction(true);
        self
    }

    /// `ORDER BY DESC`
    pub fn desc(&mut self) -> &mut Self {
        self.clauses.order_by.set_direction(false);
        self
    }

    /// `ORDER BY field ASC`, or `DESC` when the field starts with `-`
    pub fn order_by(&mut self, field: &str) -> QueryResult<&mut Self> {
        self.clauses.order_by.set_field(field)?;
        Ok(self)
    }

    /// `tz('name')` for a known IANA timezone
    pub fn tz(&mut self, name: &str) -> QueryResult<&mut Self> {
        self.clauses.timezone.set(name)?;
        Ok(self)
    }

    // ============================================
    // Rendering
    // ============================================

    /// Render one clause on its own
    pub fn clause(&self, kind: ClauseKind) -> String {
        self.clauses.clause(kind).render()
    }

    /// Render the full statement without executing it
    pub fn explain(&self) -> String {
        let joined = CLAUSE_ORDER
            .iter()
            .map(|kind| self.clause(*kind))
            .collect::<Vec<_>>()
            .join(" ");
        joined.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    // ============================================
    // Execution
    // ============================================

    /// Send the rendered statement, at most once per distinct statement text
    pub async fn execute(&self, backend: &dyn QueryBackend) -> QueryResult<RawResult> {
        let statement = self.explain();
        tracing::debug!(statement = %statement, database = ?self.database, "Executing query");
        self.cache
            .resolve(
                backend,
                Dispatch::Query(HttpMethod::Post),
                &statement,
                self.database.as_deref(),
            )
            .await
    }

    /// Execute, fail on a store-reported error, return the raw JSON
    pub async fn evaluate(&self, backend: &dyn QueryBackend) -> QueryResult<RawResult> {
        self.evaluate_with(backend, &RawSerializer).await
    }

    /// Execute, fail on a store-reported error, convert with `serializer`
    pub async fn evaluate_with<S: Serializer>(
        &self,
        backend: &dyn QueryBackend,
        serializer: &S,
    ) -> QueryResult<S::Output> {
        let response = Response::new(self.execute(backend).await?);
        response.raise_if_error()?;
        Self::format(response, serializer)
    }

    /// Convert a response with `serializer`
    pub fn format<S: Serializer>(response: Response, serializer: &S) -> QueryResult<S::Output> {
        serializer.convert(response)
    }

    /// Number of distinct statements resolved so far
    pub async fn resolved_count(&self) -> usize {
        self.cache.len().await
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.explain())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::criteria::{Now, Operator};
    use crate::query::testing::RecordingBackend;
    use chrono::Duration;
    use serde_json::json;

    #[test]
    fn test_end_to_end_render() {
        let mut query = Query::new();
        query
            .select(["value"])
            .unwrap()
            .from_measurements(["cpu"])
            .unwrap()
            .filter_by("host", "server1")
            .unwrap()
            .limit(5)
            .unwrap();

        assert_eq!(
            query.explain(),
            "SELECT value FROM \"cpu\" WHERE host = 'server1' LIMIT 5"
        );
    }

    #[test]
    fn test_chaining_with_question_mark() -> QueryResult<()> {
        let mut query = Query::new();
        query
            .select(["usage", "host"])?
            .from_measurements(["cpu", "mem"])?
            .filter_by("usage__gte", 90)?
            .order_by("-time")?;

        assert_eq!(
            query.to_string(),
            "SELECT usage,host FROM \"cpu\",\"mem\" WHERE usage >= 90 ORDER BY time DESC"
        );
        Ok(())
    }

    #[test]
    fn test_empty_query() {
        assert_eq!(Query::new().explain(), "SELECT * FROM \"default\"");
    }

    #[test]
    fn test_clause_order() {
        let mut query = Query::new();
        query
            .limit(10)
            .unwrap()
            .tz("UTC")
            .unwrap()
            .asc()
            .group_by(["host"])
            .unwrap()
            .soffset(4)
            .unwrap()
            .slimit(3)
            .unwrap()
            .offset(2)
            .unwrap()
            .filter_by("a", 1)
            .unwrap()
            .from_measurements(["m"])
            .unwrap()
            .into_measurement("dest")
            .unwrap()
            .select(["f"])
            .unwrap();

        assert_eq!(
            query.explain(),
            "SELECT f INTO dest FROM \"m\" WHERE a = 1 OFFSET 2 SLIMIT 3 SOFFSET 4 \
             GROUP BY host ORDER BY ASC tz('UTC') LIMIT 10"
        );
    }

    #[test]
    fn test_explain_is_idempotent() {
        let mut query = Query::new();
        query.select(["value"]).unwrap().from_measurements(["cpu"]).unwrap();
        let first = query.explain();
        let second = query.explain();
        assert_eq!(first, second);
    }

    #[test]
    fn test_from_measurements_validation() {
        let mut query = Query::new();
        assert!(matches!(
            query.from_measurements(Vec::<String>::new()),
            Err(QueryError::InvalidType(_))
        ));
        assert!(query.from_measurements([""]).is_err());
    }

    #[test]
    fn test_limit_validation() {
        let mut query = Query::new();
        for n in [1, 7, 1000] {
            query.limit(n).unwrap();
            assert_eq!(query.clause(ClauseKind::Limit), format!("LIMIT {}", n));
        }
        assert!(matches!(query.limit(0), Err(QueryError::InvalidType(_))));
        assert!(matches!(query.limit(-1), Err(QueryError::InvalidType(_))));
        assert!(matches!(query.offset(0), Err(QueryError::InvalidType(_))));
        assert!(matches!(query.slimit(-3), Err(QueryError::InvalidType(_))));
        assert!(matches!(query.soffset(0), Err(QueryError::InvalidType(_))));
    }

    #[test]
    fn test_where_replaces_and_filter_appends() {
        let mut query = Query::new();
        query
            .filter_by("a", 1)
            .unwrap()
            .where_([Criteria::comparison("b", Operator::Eq, 2)])
            .unwrap()
            .filter(Q::lookup("c__lt", 3).unwrap().and(Criteria::range("d", 0, 9)))
            .unwrap();

        assert_eq!(
            query.clause(ClauseKind::Where),
            "WHERE b = 2 AND c < 3 AND (d >= 0 AND d <= 9)"
        );
        assert!(query.where_(Vec::new()).is_err());
        assert!(query.filter(Q::new()).is_err());
    }

    #[test]
    fn test_filter_with_disjunction() {
        let either = Q::lookup("host", "a")
            .unwrap()
            .or_else(Q::lookup("host", "b").unwrap())
            .unwrap();
        let mut query = Query::new();
        query.where_([either]).unwrap();
        assert_eq!(
            query.clause(ClauseKind::Where),
            "WHERE (host = 'a' OR host = 'b')"
        );
    }

    #[test]
    fn test_filter_with_clock() {
        let mut query = Query::new();
        query
            .filter_by("time__gte", Now::minus("1h").unwrap())
            .unwrap();
        assert_eq!(query.clause(ClauseKind::Where), "WHERE time >= now() - 1h");
    }

    #[test]
    fn test_exclude() {
        let mut query = Query::new();
        query
            .exclude_by("host", "a")
            .unwrap()
            .exclude(Q::lookup("name__in", vec!["x", "y"]).unwrap())
            .unwrap();
        assert_eq!(
            query.clause(ClauseKind::Where),
            "WHERE host != 'a' AND (name != 'x' AND name != 'y')"
        );
    }

    #[test]
    fn test_exclude_rejects_clock() {
        let mut query = Query::new();
        let group = Q::new().and(Now::minus("1h").unwrap());
        assert!(matches!(query.exclude(group), Err(QueryError::InvalidType(_))));
        assert_eq!(query.clause(ClauseKind::Where), "");
    }

    #[test]
    fn test_unknown_lookup_is_attribute_error() {
        let mut query = Query::new();
        let err = query.filter_by("field__bogus", 1).unwrap_err();
        assert!(matches!(err, QueryError::AttributeValue(_)));
        assert!(err.to_string().contains("bogus"));
    }

    #[test]
    fn test_group_by_tag_then_time() {
        let mut query = Query::new();
        query.group_by(["tag"]).unwrap();
        assert_eq!(query.clause(ClauseKind::GroupBy), "GROUP BY tag");

        query.group_by([Duration::minutes(10)]).unwrap();
        assert_eq!(query.clause(ClauseKind::GroupBy), "GROUP BY time(10m)");
    }

    #[test]
    fn test_group_by_mixed_keys() {
        let mut query = Query::new();
        query
            .group_by_with(
                [GroupKey::from("host"), GroupKey::from(Duration::hours(1)), GroupKey::from("region")],
                RangeOptions::new().fill(0),
            )
            .unwrap();
        assert_eq!(
            query.clause(ClauseKind::GroupBy),
            "GROUP BY time(1h),host,region fill(0)"
        );
    }

    #[test]
    fn test_group_by_validation() {
        let mut query = Query::new();
        assert!(query.group_by(Vec::<String>::new()).is_err());
        assert!(query
            .group_by([Duration::hours(1), Duration::hours(2)])
            .is_err());
        assert!(query
            .group_by_with(["host"], RangeOptions::new().fill(0))
            .is_err());
        assert!(query.group_by([""]).is_err());
        assert_eq!(query.clause(ClauseKind::GroupBy), "");
    }

    #[test]
    fn test_range_by() {
        let mut query = Query::new();
        query
            .range_by("30m", RangeOptions::new().shift(Duration::minutes(5)).tags(["host"]))
            .unwrap();
        assert_eq!(
            query.clause(ClauseKind::GroupBy),
            "GROUP BY time(30m,5m),host"
        );
    }

    #[test]
    fn test_order_by_direction() {
        let mut query = Query::new();
        query.order_by("-time").unwrap();
        assert_eq!(query.clause(ClauseKind::OrderBy), "ORDER BY time DESC");
        query.order_by("time").unwrap();
        assert_eq!(query.clause(ClauseKind::OrderBy), "ORDER BY time ASC");
        query.desc();
        assert_eq!(query.clause(ClauseKind::OrderBy), "ORDER BY time DESC");
    }

    #[test]
    fn test_invalid_timezone() {
        let mut query = Query::new();
        assert!(matches!(query.tz("Atlantis/Central"), Err(QueryError::InvalidType(_))));
        assert_eq!(query.clause(ClauseKind::Timezone), "");
    }

    #[test]
    fn test_subquery() {
        let mut inner = Query::new();
        inner
            .mean("usage")
            .unwrap()
            .from_measurements(["cpu"])
            .unwrap()
            .group_by([Duration::minutes(1)])
            .unwrap();

        let mut outer = Query::new();
        outer.select(["max_mean"]).unwrap().subquery(&inner);

        assert_eq!(
            outer.explain(),
            "SELECT max_mean FROM (SELECT MEAN(usage) FROM \"cpu\" GROUP BY time(1m))"
        );
    }

    #[tokio::test]
    async fn test_execute_memoizes_per_statement() {
        let backend = RecordingBackend::new();
        let mut query = Query::with_database("telegraf");
        query.select(["value"]).unwrap().from_measurements(["cpu"]).unwrap();

        query.execute(&backend).await.unwrap();
        query.execute(&backend).await.unwrap();
        assert_eq!(backend.query_calls(), 1);

        // Same rendered text: still served from cache
        query.from_measurements(["cpu"]).unwrap();
        query.execute(&backend).await.unwrap();
        assert_eq!(backend.query_calls(), 1);

        // Different rendered text: a new backend call
        query.limit(5).unwrap();
        query.execute(&backend).await.unwrap();
        assert_eq!(backend.query_calls(), 2);
        assert_eq!(query.resolved_count().await, 2);

        let statements = backend.statements();
        assert_eq!(statements[1].0, "SELECT value FROM \"cpu\" LIMIT 5");
        assert_eq!(statements[1].1.as_deref(), Some("telegraf"));
    }

    #[tokio::test]
    async fn test_evaluate_returns_raw_result() {
        let backend = RecordingBackend::new();
        let query = Query::new();
        let result = query.evaluate(&backend).await.unwrap();
        assert_eq!(result["results"][0]["series"][0]["name"], "cpu");
    }

    #[tokio::test]
    async fn test_evaluate_raises_backend_error() {
        let backend = RecordingBackend::with_response(json!({
            "results": [{"statement_id": 0, "error": "measurement not found"}]
        }));
        let err = Query::new().evaluate(&backend).await.unwrap_err();
        assert!(matches!(err, QueryError::Backend(msg) if msg == "measurement not found"));
    }

    #[tokio::test]
    async fn test_execute_does_not_inspect_errors() {
        let backend = RecordingBackend::with_response(json!({"error": "boom"}));
        let raw = Query::new().execute(&backend).await.unwrap();
        assert_eq!(raw["error"], "boom");
    }

    /// Counts series, optionally only those with a given name
    struct SeriesCounter {
        name: Option<&'static str>,
    }

    impl Serializer for SeriesCounter {
        type Output = usize;

        fn convert(&self, response: Response) -> QueryResult<usize> {
            Ok(response
                .series()
                .iter()
                .filter(|s| self.name.map_or(true, |n| s["name"] == n))
                .count())
        }
    }

    #[tokio::test]
    async fn test_evaluate_with_custom_serializer() {
        let backend = RecordingBackend::new();
        let query = Query::new();

        let all = query
            .evaluate_with(&backend, &SeriesCounter { name: None })
            .await
            .unwrap();
        let mem = query
            .evaluate_with(&backend, &SeriesCounter { name: Some("mem") })
            .await
            .unwrap();

        assert_eq!(all, 1);
        assert_eq!(mem, 0);
        assert_eq!(backend.query_calls(), 1);
    }

    #[test]
    fn test_exclude_negates_members_separately() {
        let group = Q::lookup("a", 1).unwrap().and_lookup("b", 2).unwrap();
        let mut query = Query::new();
        query.exclude(group.clone()).unwrap();
        assert_eq!(query.clause(ClauseKind::Where), "WHERE a != 1 AND b != 2");

        let mut query = Query::new();
        query.exclude(Q::from(group.into_criteria().unwrap())).unwrap();
        assert_eq!(query.clause(ClauseKind::Where), "WHERE (a != 1 OR b != 2)");
    }

    #[test]
    fn test_malformed_filters_never_render() {
        let mut query = Query::new();
        assert!(matches!(
            query.where_([Criteria::Conjunction(Vec::new())]),
            Err(QueryError::InvalidType(_))
        ));
        assert!(query.filter_by("host", vec!["a", "b"]).is_err());
        assert!(query.filter_by("ratio__gt", f64::NAN).is_err());
        assert_eq!(query.explain(), "SELECT * FROM \"default\"");
    }

    #[test]
    fn test_group_by_rejects_non_positive_interval() {
        let mut query = Query::new();
        assert!(query.group_by([Duration::minutes(-5)]).is_err());
        assert!(query.range_by("0s", RangeOptions::new()).is_err());
        assert_eq!(query.clause(ClauseKind::GroupBy), "");
    }
}
