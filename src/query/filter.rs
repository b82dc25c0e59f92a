//! Filter Lookups
//!
//! Translates `field__lookup` keys into expression nodes:
//!
//! ```text
//! host="a"                  host = 'a'
//! age__gte=18               age >= 18
//! name__in=["a", "b"]       (name = 'a' OR name = 'b')
//! size__range=[1, 10]       (size >= 1 AND size <= 10)
//! host__regex="web"         host =~ /web/
//! ```

use std::str::FromStr;

use crate::query::criteria::{Criteria, Operator, Value};
use crate::query::error::{QueryError, QueryResult};

/// Separator between a field name and its lookup
const LOOKUP_SEPARATOR: &str = "__";

/// Lookup keywords accepted after the separator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    Regex,
    IRegex,
    StartsWith,
    IStartsWith,
    EndsWith,
    IEndsWith,
    Range,
}

impl Lookup {
    /// Whether this lookup renders as a regex match.
    ///
    /// The case-insensitive and anchored variants all render the same
    /// unanchored, case-sensitive pattern.
    pub fn is_regex(self) -> bool {
        matches!(
            self,
            Self::Regex
                | Self::IRegex
                | Self::StartsWith
                | Self::IStartsWith
                | Self::EndsWith
                | Self::IEndsWith
        )
    }

    fn operator(self) -> Operator {
        match self {
            Self::Ne => Operator::Ne,
            Self::Gt => Operator::Gt,
            Self::Gte => Operator::Gte,
            Self::Lt => Operator::Lt,
            Self::Lte => Operator::Lte,
            lookup if lookup.is_regex() => Operator::Match,
            _ => Operator::Eq,
        }
    }
}

impl FromStr for Lookup {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eq" => Ok(Self::Eq),
            "ne" => Ok(Self::Ne),
            "gt" => Ok(Self::Gt),
            "gte" => Ok(Self::Gte),
            "lt" => Ok(Self::Lt),
            "lte" => Ok(Self::Lte),
            "in" => Ok(Self::In),
            "regex" => Ok(Self::Regex),
            "iregex" => Ok(Self::IRegex),
            "startswith" => Ok(Self::StartsWith),
            "istartswith" => Ok(Self::IStartsWith),
            "endswith" => Ok(Self::EndsWith),
            "iendswith" => Ok(Self::IEndsWith),
            "range" => Ok(Self::Range),
            other => Err(QueryError::AttributeValue(format!("Invalid lookup: {}", other))),
        }
    }
}

/// Translate a `field__lookup` key and its value into an expression
pub fn process_filter(key: &str, value: impl Into<Value>) -> QueryResult<Criteria> {
    let value = value.into();
    value.validate()?;
    let (field, lookup) = match key.split_once(LOOKUP_SEPARATOR) {
        Some((field, lookup)) => (field, lookup.parse::<Lookup>()?),
        None => (key, Lookup::Eq),
    };

    match lookup {
        Lookup::In => {
            let items = into_list(value, "in")?;
            Criteria::any_of(
                items
                    .into_iter()
                    .map(|item| Criteria::comparison(field, Operator::Eq, item)),
            )
        }
        Lookup::Range => {
            let [lower, upper]: [Value; 2] = into_list(value, "range")?
                .try_into()
                .map_err(|_| QueryError::invalid_type("range lookup expects exactly [lower, upper]"))?;
            Ok(Criteria::range(field, lower, upper))
        }
        _ if matches!(value, Value::List(_)) => Err(QueryError::invalid_type(format!(
            "{} lookup expects a single value, not a list",
            key
        ))),
        lookup if lookup.is_regex() => {
            let pattern = format!("/{}/", escape_slashes(&value.raw_text()));
            Ok(Criteria::comparison(field, Operator::Match, Value::Regex(pattern)))
        }
        lookup => Ok(Criteria::comparison(field, lookup.operator(), value)),
    }
}

/// Escape `/` inside a regex body; already escaped slashes are kept
fn escape_slashes(body: &str) -> String {
    let mut escaped = String::with_capacity(body.len());
    let mut backslashes = 0;
    for c in body.chars() {
        if c == '/' && backslashes % 2 == 0 {
            escaped.push('\\');
        }
        backslashes = if c == '\\' { backslashes + 1 } else { 0 };
        escaped.push(c);
    }
    escaped
}

fn into_list(value: Value, lookup: &str) -> QueryResult<Vec<Value>> {
    match value {
        Value::List(items) if !items.is_empty() => Ok(items),
        Value::List(_) => Err(QueryError::invalid_type(format!(
            "{} lookup expects a non-empty list",
            lookup
        ))),
        _ => Err(QueryError::invalid_type(format!(
            "{} lookup expects a list",
            lookup
        ))),
    }
}

/// A group of criteria ANDed together
///
/// Collects positional expressions and keyword lookups, the way a WHERE
/// clause call does. Two groups can be combined with [`Q::or_else`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Q {
    criteria: Vec<Criteria>,
}

impl Q {
    /// Create an empty group
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a group from a single lookup
    pub fn lookup(key: &str, value: impl Into<Value>) -> QueryResult<Self> {
        Self::new().and_lookup(key, value)
    }

    /// Add an expression
    pub fn and(mut self, criteria: Criteria) -> Self {
        self.criteria.push(criteria);
        self
    }

    /// Add a keyword lookup
    pub fn and_lookup(mut self, key: &str, value: impl Into<Value>) -> QueryResult<Self> {
        self.criteria.push(process_filter(key, value)?);
        Ok(self)
    }

    /// Check if the group holds no criteria
    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    /// Number of criteria in the group
    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    /// Collapse the group into one expression
    pub fn into_criteria(self) -> QueryResult<Criteria> {
        Criteria::conjunction(self.criteria)
    }

    /// `(self OR other)`
    pub fn or_else(self, other: Q) -> QueryResult<Criteria> {
        Ok(Criteria::disjunction(self.into_criteria()?, other.into_criteria()?))
    }

    /// The individual criteria, in insertion order
    pub fn into_inner(self) -> Vec<Criteria> {
        self.criteria
    }

    /// Render the group
    pub fn evaluate(&self) -> String {
        match self.criteria.as_slice() {
            [single] => single.evaluate(),
            all => format!(
                "({})",
                all.iter()
                    .map(Criteria::evaluate)
                    .collect::<Vec<_>>()
                    .join(" AND ")
            ),
        }
    }
}

impl From<Criteria> for Q {
    fn from(criteria: Criteria) -> Self {
        Self::new().and(criteria)
    }
}
