//! Aggregation Functions
//!
//! Selector wrappers such as `MEAN(usage)` or `COUNT(/^usage$/)` and the
//! `Query` shortcuts that add them to the SELECT list.

use crate::query::criteria::{Criteria, Selectable};
use crate::query::error::QueryResult;
use crate::query::statement::Query;

/// Aggregation functions available in SELECT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregationFunc {
    /// Number of non-null values
    Count,
    /// Unique values
    Distinct,
    /// Area under the curve
    Integral,
    /// Arithmetic mean
    Mean,
    /// Middle value
    Median,
    /// Most frequent value
    Mode,
    /// Difference between min and max
    Spread,
    /// Standard deviation
    StdDev,
    /// Sum of values
    Sum,
}

impl std::fmt::Display for AggregationFunc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Count => write!(f, "COUNT"),
            Self::Distinct => write!(f, "DISTINCT"),
            Self::Integral => write!(f, "INTEGRAL"),
            Self::Mean => write!(f, "MEAN"),
            Self::Median => write!(f, "MEDIAN"),
            Self::Mode => write!(f, "MODE"),
            Self::Spread => write!(f, "SPREAD"),
            Self::StdDev => write!(f, "STDDEV"),
            Self::Sum => write!(f, "SUM"),
        }
    }
}

/// An aggregation applied to a field selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation {
    /// Function to apply
    pub func: AggregationFunc,
    /// Field name, `*`, or a regex selector
    pub argument: String,
}

impl Aggregation {
    /// Create a new aggregation
    pub fn new(func: AggregationFunc, argument: impl Into<String>) -> Self {
        Self {
            func,
            argument: argument.into(),
        }
    }

    /// Render the fragment
    pub fn evaluate(&self) -> String {
        format!("{}({})", self.func, self.argument)
    }
}

/// Build a field selector for multi-field functions
///
/// No values selects everything (`*`), one value becomes an anchored regex
/// (`/^usage$/`), several become an alternation (`/usage|idle/`).
pub fn generate_values<I, S>(values: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let values: Vec<String> = values
        .into_iter()
        .map(|v| v.as_ref().to_string())
        .collect();
    match values.as_slice() {
        [] => "*".to_string(),
        [single] => format!("/^{}$/", single),
        many => format!("/{}/", many.join("|")),
    }
}

impl Query {
    fn aggregate(&mut self, func: AggregationFunc, argument: String) -> QueryResult<&mut Self> {
        self.select([Aggregation::new(func, argument)])
    }

    /// `COUNT(...)` over zero or more fields
    pub fn count<I, S>(&mut self, values: I) -> QueryResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.aggregate(AggregationFunc::Count, generate_values(values))
    }

    /// `INTEGRAL(...)` over zero or more fields
    pub fn integral<I, S>(&mut self, values: I) -> QueryResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.aggregate(AggregationFunc::Integral, generate_values(values))
    }

    /// `DISTINCT(field)`; pass `*` for every field
    pub fn distinct(&mut self, field: &str) -> QueryResult<&mut Self> {
        self.aggregate(AggregationFunc::Distinct, field.to_string())
    }

    /// `MEAN(field)`
    pub fn mean(&mut self, field: &str) -> QueryResult<&mut Self> {
        self.aggregate(AggregationFunc::Mean, field.to_string())
    }

    /// `MEDIAN(field)`
    pub fn median(&mut self, field: &str) -> QueryResult<&mut Self> {
        self.aggregate(AggregationFunc::Median, field.to_string())
    }

    /// `MODE(field)`
    pub fn mode(&mut self, field: &str) -> QueryResult<&mut Self> {
        self.aggregate(AggregationFunc::Mode, field.to_string())
    }

    /// `SPREAD(field)`
    pub fn spread(&mut self, field: &str) -> QueryResult<&mut Self> {
        self.aggregate(AggregationFunc::Spread, field.to_string())
    }

    /// `STDDEV(field)`
    pub fn std_dev(&mut self, field: &str) -> QueryResult<&mut Self> {
        self.aggregate(AggregationFunc::StdDev, field.to_string())
    }

    /// `SUM(field)`
    pub fn sum(&mut self, field: &str) -> QueryResult<&mut Self> {
        self.aggregate(AggregationFunc::Sum, field.to_string())
    }

    /// Select expressions under output names: `<expr> AS <name>`
    pub fn annotate<I, N, S>(&mut self, annotations: I) -> QueryResult<&mut Self>
    where
        I: IntoIterator<Item = (N, S)>,
        N: AsRef<str>,
        S: Into<Selectable>,
    {
        let aliases: Vec<Criteria> = annotations
            .into_iter()
            .map(|(name, expr)| Criteria::alias(expr, Some(name.as_ref())))
            .collect();
        self.select(aliases)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_values() {
        assert_eq!(generate_values(Vec::<&str>::new()), "*");
        assert_eq!(generate_values(["usage"]), "/^usage$/");
        assert_eq!(generate_values(["usage", "idle", "iowait"]), "/usage|idle|iowait/");
    }

    #[test]
    fn test_aggregation_render() {
        assert_eq!(Aggregation::new(AggregationFunc::Mean, "usage").evaluate(), "MEAN(usage)");
        assert_eq!(Aggregation::new(AggregationFunc::StdDev, "*").evaluate(), "STDDEV(*)");
    }

    #[test]
    fn test_query_aggregations() {
        let mut query = Query::new();
        query.count(["usage"]).unwrap().mean("idle").unwrap();
        assert_eq!(query.explain(), "SELECT COUNT(/^usage$/),MEAN(idle) FROM \"default\"");

        let mut query = Query::new();
        query
            .integral(Vec::<&str>::new())
            .unwrap()
            .distinct("*")
            .unwrap()
            .median("a")
            .unwrap()
            .mode("b")
            .unwrap()
            .spread("c")
            .unwrap()
            .std_dev("d")
            .unwrap()
            .sum("e")
            .unwrap();
        assert_eq!(
            query.explain(),
            "SELECT INTEGRAL(*),DISTINCT(*),MEDIAN(a),MODE(b),SPREAD(c),STDDEV(d),SUM(e) FROM \"default\""
        );
    }

    #[test]
    fn test_annotate() {
        let mut query = Query::new();
        query
            .annotate([
                ("avg_usage", Selectable::from(Aggregation::new(AggregationFunc::Mean, "usage"))),
                ("peak", Selectable::from("max_usage")),
            ])
            .unwrap();
        assert_eq!(
            query.explain(),
            "SELECT MEAN(usage) AS avg_usage,max_usage AS peak FROM \"default\""
        );
    }
}
