//! Expression Algebra
//!
//! Immutable expression nodes that render to InfluxQL fragments:
//!
//! ```text
//! host = 'server1'                  comparison
//! (usage > 90 AND host = 'a')       conjunction
//! (host = 'a' OR host = 'b')        disjunction
//! now() - 1h                        clock arithmetic
//! MEAN(usage) AS avg_usage          alias
//! ```
//!
//! Every node exposes [`Criteria::evaluate`]. Combinators are named methods
//! (`or_else`, `negate`, `Now::plus`, `Now::minus`) rather than operators.

use chrono::Duration;

use crate::duration::{to_interval_literal, DurationInput};
use crate::query::aggregation::Aggregation;
use crate::query::error::{QueryError, QueryResult};

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Greater than
    Gt,
    /// Greater than or equal to
    Gte,
    /// Less than
    Lt,
    /// Less than or equal to
    Lte,
    /// Equal to
    Eq,
    /// Not equal to
    Ne,
    /// Regex match
    Match,
    /// Regex non-match
    NotMatch,
}

impl Operator {
    /// The operator selecting exactly the rows this one rejects
    pub fn negate(self) -> Self {
        match self {
            Self::Gt => Self::Lte,
            Self::Gte => Self::Lt,
            Self::Lt => Self::Gte,
            Self::Lte => Self::Gt,
            Self::Eq => Self::Ne,
            Self::Ne => Self::Eq,
            Self::Match => Self::NotMatch,
            Self::NotMatch => Self::Match,
        }
    }

    /// Whether the right-hand side is a regex literal
    pub fn is_regex(self) -> bool {
        matches!(self, Self::Match | Self::NotMatch)
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gt => write!(f, ">"),
            Self::Gte => write!(f, ">="),
            Self::Lt => write!(f, "<"),
            Self::Lte => write!(f, "<="),
            Self::Eq => write!(f, "="),
            Self::Ne => write!(f, "!="),
            Self::Match => write!(f, "=~"),
            Self::NotMatch => write!(f, "!~"),
        }
    }
}

/// Right-hand side of a comparison
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// String value, rendered single-quoted
    Str(String),
    /// Integer value
    Int(i64),
    /// Float value
    Float(f64),
    /// Boolean value
    Bool(bool),
    /// Duration, rendered as an interval literal
    Duration(Duration),
    /// Sequence of values, used by the `in` and `range` lookups
    List(Vec<Value>),
    /// Regex literal including its delimiters, rendered verbatim
    Regex(String),
    /// Nested expression such as `now() - 1h`, rendered unquoted
    Expression(Box<Criteria>),
}

impl Value {
    /// Render as a statement literal
    pub fn literal(&self) -> String {
        match self {
            Self::Str(s) => quote(s),
            Self::Int(n) => n.to_string(),
            Self::Float(x) => format!("{:?}", x),
            Self::Bool(b) => b.to_string(),
            Self::Duration(d) => to_interval_literal(*d),
            Self::List(items) => items
                .iter()
                .map(Value::literal)
                .collect::<Vec<_>>()
                .join(","),
            Self::Regex(pattern) => pattern.clone(),
            Self::Expression(expr) => expr.evaluate(),
        }
    }

    /// Reject values with no literal form: non-finite floats, anywhere
    pub fn validate(&self) -> QueryResult<()> {
        match self {
            Self::Float(x) if !x.is_finite() => Err(QueryError::invalid_type(format!(
                "{} has no literal form",
                x
            ))),
            Self::List(items) => items.iter().try_for_each(Value::validate),
            Self::Expression(expr) => expr.validate(),
            _ => Ok(()),
        }
    }

    /// Text of the value without quoting, used to build regex patterns
    pub fn raw_text(&self) -> String {
        match self {
            Self::Str(s) | Self::Regex(s) => s.clone(),
            other => other.literal(),
        }
    }
}

/// Single-quote a string, escaping backslashes and quotes
fn quote(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('\'');
    for c in s.chars() {
        if c == '\\' || c == '\'' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('\'');
    quoted
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Int(n as i64)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Int(n as i64)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Duration> for Value {
    fn from(d: Duration) -> Self {
        Self::Duration(d)
    }
}

impl From<Criteria> for Value {
    fn from(expr: Criteria) -> Self {
        Self::Expression(Box::new(expr))
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(items: [T; N]) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

/// An expression node
#[derive(Debug, Clone, PartialEq)]
pub enum Criteria {
    /// `field OP literal`
    Comparison {
        field: String,
        value: Value,
        operator: Operator,
    },
    /// Children joined with AND; never empty
    Conjunction(Vec<Criteria>),
    /// `(left OR right)`
    Disjunction(Box<Criteria>, Box<Criteria>),
    /// `now() + delta` or `now() - delta`
    Clock { delta: Duration, forward: bool },
    /// Rendered fragment with an optional output name
    Alias {
        fragment: String,
        name: Option<String>,
    },
}

impl Criteria {
    /// Create a comparison
    pub fn comparison(field: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        Self::Comparison {
            field: field.into(),
            value: value.into(),
            operator,
        }
    }

    /// AND together one or more expressions
    pub fn conjunction(children: impl IntoIterator<Item = Criteria>) -> QueryResult<Self> {
        let children: Vec<Criteria> = children.into_iter().collect();
        if children.is_empty() {
            return Err(QueryError::invalid_type("conjunction should not be empty"));
        }
        Ok(Self::Conjunction(children))
    }

    /// OR two expressions
    pub fn disjunction(left: Criteria, right: Criteria) -> Self {
        Self::Disjunction(Box::new(left), Box::new(right))
    }

    /// OR together one or more expressions, folding from the right:
    /// `[a, b, c]` becomes `(a OR (b OR c))`
    pub fn any_of(items: impl IntoIterator<Item = Criteria>) -> QueryResult<Self> {
        let mut items: Vec<Criteria> = items.into_iter().collect();
        let mut folded = items
            .pop()
            .ok_or_else(|| QueryError::invalid_type("disjunction should not be empty"))?;
        while let Some(item) = items.pop() {
            folded = Self::disjunction(item, folded);
        }
        Ok(folded)
    }

    /// Inclusive bound on one field: `(field >= lower AND field <= upper)`
    pub fn range(field: impl Into<String>, lower: impl Into<Value>, upper: impl Into<Value>) -> Self {
        let field = field.into();
        Self::Conjunction(vec![
            Self::comparison(field.clone(), Operator::Gte, lower),
            Self::comparison(field, Operator::Lte, upper),
        ])
    }

    /// Name a selectable fragment: `<fragment> AS <name>`
    pub fn alias(inner: impl Into<Selectable>, name: Option<&str>) -> Self {
        Self::Alias {
            fragment: inner.into().evaluate(),
            name: name.map(str::to_string),
        }
    }

    /// Combine with another expression using OR
    pub fn or_else(self, other: Criteria) -> Self {
        Self::disjunction(self, other)
    }

    /// Combine with another expression using AND
    pub fn and_also(self, other: Criteria) -> Self {
        match self {
            Self::Conjunction(mut children) => {
                children.push(other);
                Self::Conjunction(children)
            }
            single => Self::Conjunction(vec![single, other]),
        }
    }

    /// Check that the tree renders valid syntax
    ///
    /// Catches nodes built directly from the enum variants: empty
    /// conjunctions, lists on the right of a comparison, non-finite floats.
    pub fn validate(&self) -> QueryResult<()> {
        match self {
            Self::Comparison { value, .. } => {
                if let Value::List(_) = value {
                    return Err(QueryError::invalid_type(
                        "a list is only valid for the in and range lookups",
                    ));
                }
                value.validate()
            }
            Self::Conjunction(children) => {
                if children.is_empty() {
                    return Err(QueryError::invalid_type("conjunction should not be empty"));
                }
                children.iter().try_for_each(Criteria::validate)
            }
            Self::Disjunction(left, right) => {
                left.validate()?;
                right.validate()
            }
            Self::Clock { .. } | Self::Alias { .. } => Ok(()),
        }
    }

    /// Logical NOT, pushed down to the comparisons
    ///
    /// The store has no NOT keyword: comparison operators are flipped and
    /// AND/OR are swapped. Clock arithmetic and aliases have no negation.
    pub fn negate(self) -> QueryResult<Self> {
        match self {
            Self::Comparison {
                field,
                value,
                operator,
            } => Ok(Self::Comparison {
                field,
                value,
                operator: operator.negate(),
            }),
            Self::Conjunction(children) => {
                if children.is_empty() {
                    return Err(QueryError::invalid_type("conjunction should not be empty"));
                }
                let negated = children
                    .into_iter()
                    .map(Criteria::negate)
                    .collect::<QueryResult<Vec<_>>>()?;
                Self::any_of(negated)
            }
            Self::Disjunction(left, right) => Ok(Self::Conjunction(vec![
                left.negate()?,
                right.negate()?,
            ])),
            Self::Clock { .. } => Err(QueryError::invalid_type(
                "clock arithmetic cannot be negated",
            )),
            Self::Alias { .. } => Err(QueryError::invalid_type("an alias cannot be negated")),
        }
    }

    /// Render the fragment
    pub fn evaluate(&self) -> String {
        match self {
            Self::Comparison {
                field,
                value,
                operator,
            } => format!("{} {} {}", field, operator, value.literal()),
            Self::Conjunction(children) => {
                if children.len() == 1 {
                    children[0].evaluate()
                } else {
                    let joined = children
                        .iter()
                        .map(Criteria::evaluate)
                        .collect::<Vec<_>>()
                        .join(" AND ");
                    format!("({})", joined)
                }
            }
            Self::Disjunction(left, right) => {
                format!("({} OR {})", left.evaluate(), right.evaluate())
            }
            Self::Clock { delta, forward } => {
                let sign = if *forward { '+' } else { '-' };
                format!("{} {} {}", Now::evaluate(), sign, to_interval_literal(*delta))
            }
            Self::Alias { fragment, name } => match name {
                Some(name) => format!("{} AS {}", fragment, name),
                None => fragment.clone(),
            },
        }
    }
}

impl std::fmt::Display for Criteria {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.evaluate())
    }
}

/// The store's reference clock
#[derive(Debug, Clone, Copy, Default)]
pub struct Now;

impl Now {
    /// `now() + delta`
    pub fn plus(delta: impl Into<DurationInput>) -> QueryResult<Criteria> {
        Self::shift(delta.into().to_duration()?, true)
    }

    /// `now() - delta`
    pub fn minus(delta: impl Into<DurationInput>) -> QueryResult<Criteria> {
        Self::shift(delta.into().to_duration()?, false)
    }

    /// The bare clock fragment
    pub fn evaluate() -> &'static str {
        "now()"
    }

    fn shift(delta: Duration, forward: bool) -> QueryResult<Criteria> {
        // Keep the literal positive so it stays valid syntax
        if delta < Duration::zero() {
            return Ok(Criteria::Clock {
                delta: -delta,
                forward: !forward,
            });
        }
        Ok(Criteria::Clock { delta, forward })
    }
}

/// Anything that can appear in a SELECT list
#[derive(Debug, Clone, PartialEq)]
pub enum Selectable {
    /// Plain field or tag name
    Field(String),
    /// Expression rendered through its own `evaluate`
    Expression(Criteria),
    /// Aggregation call like `MEAN(usage)`
    Aggregation(Aggregation),
}

impl Selectable {
    /// Render the fragment
    pub fn evaluate(&self) -> String {
        match self {
            Self::Field(name) => name.clone(),
            Self::Expression(expr) => expr.evaluate(),
            Self::Aggregation(agg) => agg.evaluate(),
        }
    }
}

impl From<&str> for Selectable {
    fn from(name: &str) -> Self {
        Self::Field(name.to_string())
    }
}

impl From<String> for Selectable {
    fn from(name: String) -> Self {
        Self::Field(name)
    }
}

impl From<Criteria> for Selectable {
    fn from(expr: Criteria) -> Self {
        Self::Expression(expr)
    }
}

impl From<Aggregation> for Selectable {
    fn from(agg: Aggregation) -> Self {
        Self::Aggregation(agg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparison_quoting() {
        assert_eq!(
            Criteria::comparison("host", Operator::Eq, "server1").evaluate(),
            "host = 'server1'"
        );
        assert_eq!(Criteria::comparison("age", Operator::Gte, 18).evaluate(), "age >= 18");
        assert_eq!(
            Criteria::comparison("ratio", Operator::Lt, 0.5).evaluate(),
            "ratio < 0.5"
        );
        assert_eq!(
            Criteria::comparison("usage", Operator::Gt, 1.0).evaluate(),
            "usage > 1.0"
        );
        assert_eq!(
            Criteria::comparison("up", Operator::Ne, false).evaluate(),
            "up != false"
        );
    }

    #[test]
    fn test_comparison_escapes_quotes() {
        assert_eq!(
            Criteria::comparison("name", Operator::Eq, "o'neil").evaluate(),
            r"name = 'o\'neil'"
        );
        assert_eq!(
            Criteria::comparison("path", Operator::Eq, r"c:\tmp").evaluate(),
            r"path = 'c:\\tmp'"
        );
    }

    #[test]
    fn test_regex_value_not_quoted() {
        let expr = Criteria::comparison("host", Operator::Match, Value::Regex("/^web/".into()));
        assert_eq!(expr.evaluate(), "host =~ /^web/");
    }

    #[test]
    fn test_conjunction() {
        let single = Criteria::conjunction([Criteria::comparison("a", Operator::Eq, 1)]).unwrap();
        assert_eq!(single.evaluate(), "a = 1");

        let many = Criteria::conjunction([
            Criteria::comparison("a", Operator::Eq, 1),
            Criteria::comparison("b", Operator::Gt, 2),
            Criteria::comparison("c", Operator::Lt, 3),
        ])
        .unwrap();
        assert_eq!(many.evaluate(), "(a = 1 AND b > 2 AND c < 3)");

        assert!(matches!(
            Criteria::conjunction(Vec::new()),
            Err(QueryError::InvalidType(_))
        ));
    }

    #[test]
    fn test_disjunction_always_parenthesized() {
        let expr = Criteria::comparison("a", Operator::Eq, 1)
            .or_else(Criteria::comparison("b", Operator::Eq, 2));
        assert_eq!(expr.evaluate(), "(a = 1 OR b = 2)");
    }

    #[test]
    fn test_any_of_folds_right() {
        let expr = Criteria::any_of(["a", "b", "c"].map(|v| Criteria::comparison("x", Operator::Eq, v)))
            .unwrap();
        assert_eq!(expr.evaluate(), "(x = 'a' OR (x = 'b' OR x = 'c'))");

        let single = Criteria::any_of([Criteria::comparison("x", Operator::Eq, 1)]).unwrap();
        assert_eq!(single.evaluate(), "x = 1");
    }

    #[test]
    fn test_range() {
        assert_eq!(
            Criteria::range("size", 1, 10).evaluate(),
            "(size >= 1 AND size <= 10)"
        );
    }

    #[test]
    fn test_and_also_extends_conjunction() {
        let expr = Criteria::range("size", 1, 10).and_also(Criteria::comparison("ok", Operator::Eq, true));
        assert_eq!(expr.evaluate(), "(size >= 1 AND size <= 10 AND ok = true)");
    }

    #[test]
    fn test_clock_arithmetic() {
        assert_eq!(Now::minus("1h").unwrap().evaluate(), "now() - 1h");
        assert_eq!(Now::plus(90).unwrap().evaluate(), "now() + 1m30s");
        assert_eq!(
            Now::minus(Duration::days(7)).unwrap().evaluate(),
            "now() - 7d"
        );
        assert_eq!(
            Now::plus(Duration::minutes(-5)).unwrap().evaluate(),
            "now() - 5m"
        );
        assert!(Now::minus("yesterday").is_err());
    }

    #[test]
    fn test_clock_as_comparison_value() {
        let expr = Criteria::comparison("time", Operator::Gte, Now::minus("2h30m").unwrap());
        assert_eq!(expr.evaluate(), "time >= now() - 2h30m");
    }

    #[test]
    fn test_alias() {
        assert_eq!(Criteria::alias("usage", Some("u")).evaluate(), "usage AS u");
        assert_eq!(Criteria::alias("usage", None).evaluate(), "usage");

        let inner = Criteria::comparison("a", Operator::Eq, 1);
        assert_eq!(Criteria::alias(inner, Some("flag")).evaluate(), "a = 1 AS flag");
    }

    #[test]
    fn test_negate_comparison() {
        let cases = [
            (Operator::Eq, "!="),
            (Operator::Ne, "="),
            (Operator::Gt, "<="),
            (Operator::Gte, "<"),
            (Operator::Lt, ">="),
            (Operator::Lte, ">"),
            (Operator::Match, "!~"),
            (Operator::NotMatch, "=~"),
        ];
        for (op, expected) in cases {
            let negated = Criteria::comparison("x", op, 1).negate().unwrap();
            assert_eq!(negated.evaluate(), format!("x {} 1", expected));
        }
    }

    #[test]
    fn test_negate_de_morgan() {
        let range = Criteria::range("size", 1, 10).negate().unwrap();
        assert_eq!(range.evaluate(), "(size < 1 OR size > 10)");

        let either = Criteria::comparison("h", Operator::Eq, "a")
            .or_else(Criteria::comparison("h", Operator::Eq, "b"))
            .negate()
            .unwrap();
        assert_eq!(either.evaluate(), "(h != 'a' AND h != 'b')");
    }

    #[test]
    fn test_negate_rejects_clock_and_alias() {
        assert!(matches!(
            Now::minus("1h").unwrap().negate(),
            Err(QueryError::InvalidType(_))
        ));
        assert!(matches!(
            Criteria::alias("x", Some("y")).negate(),
            Err(QueryError::InvalidType(_))
        ));
    }

    #[test]
    fn test_validate_rejects_malformed_trees() {
        assert!(Criteria::Conjunction(Vec::new()).validate().is_err());
        assert!(Criteria::comparison("x", Operator::Eq, f64::NAN).validate().is_err());
        assert!(Criteria::comparison("x", Operator::Eq, vec![1, 2]).validate().is_err());
        assert!(Criteria::range("x", 0.5, 1.5).validate().is_ok());
        assert!(Now::minus("1h").unwrap().validate().is_ok());
    }

    #[test]
    fn test_negate_empty_conjunction() {
        assert!(matches!(
            Criteria::Conjunction(Vec::new()).negate(),
            Err(QueryError::InvalidType(_))
        ));
    }
}
