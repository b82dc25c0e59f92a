//! Duration Literals
//!
//! Converts between native durations and InfluxQL duration literals such as
//! `90s`, `1h30m` or `7d`.
//!
//! # Supported Units
//!
//! ```text
//! w   weeks
//! d   days
//! h   hours
//! m   minutes
//! s   seconds
//! ms  milliseconds
//! ```

use chrono::Duration;
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::digit1,
    combinator::{all_consuming, map_res, value},
    multi::many1,
    IResult,
};

use crate::query::{QueryError, QueryResult};

const SECOND_MS: i64 = 1000;
const MINUTE_MS: i64 = 60 * SECOND_MS;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;
const WEEK_MS: i64 = 7 * DAY_MS;

/// Units used when formatting, largest first. Weeks are never emitted.
const FORMAT_UNITS: [(&str, i64); 5] = [
    ("d", DAY_MS),
    ("h", HOUR_MS),
    ("m", MINUTE_MS),
    ("s", SECOND_MS),
    ("ms", 1),
];

/// Format a duration as an InfluxQL interval literal
///
/// Zero renders as `0s`; negative durations keep a leading `-`.
pub fn to_interval_literal(duration: Duration) -> String {
    let total = duration.num_milliseconds();
    if total == 0 {
        return "0s".to_string();
    }

    let mut literal = String::new();
    if total < 0 {
        literal.push('-');
    }

    let mut remaining = total.unsigned_abs();
    for (unit, size) in FORMAT_UNITS {
        let size = size as u64;
        let count = remaining / size;
        if count > 0 {
            literal.push_str(&format!("{}{}", count, unit));
            remaining %= size;
        }
    }

    literal
}

/// Parse a duration literal into whole seconds (sub-second parts truncate)
pub fn to_seconds(literal: &str) -> QueryResult<i64> {
    Ok(to_millis(literal)? / SECOND_MS)
}

/// Parse a duration literal into milliseconds
pub fn to_millis(literal: &str) -> QueryResult<i64> {
    let invalid = || QueryError::invalid_type(format!("invalid duration literal: '{}'", literal));

    let (_, parts) = parse_components(literal.trim()).map_err(|_| invalid())?;

    parts
        .into_iter()
        .try_fold(0i64, |acc, (amount, unit)| {
            amount.checked_mul(unit).and_then(|ms| acc.checked_add(ms))
        })
        .ok_or_else(invalid)
}

/// Parse a whole literal like "2h30m"
fn parse_components(input: &str) -> IResult<&str, Vec<(i64, i64)>> {
    all_consuming(many1(parse_component))(input)
}

/// Parse one "<amount><unit>" pair, returning (amount, unit in ms)
fn parse_component(input: &str) -> IResult<&str, (i64, i64)> {
    let (input, amount) = map_res(digit1, |s: &str| s.parse::<i64>())(input)?;
    let (input, unit) = alt((
        // "ms" must be tried before "m"
        value(1i64, tag("ms")),
        value(WEEK_MS, tag("w")),
        value(DAY_MS, tag("d")),
        value(HOUR_MS, tag("h")),
        value(MINUTE_MS, tag("m")),
        value(SECOND_MS, tag("s")),
    ))(input)?;

    Ok((input, (amount, unit)))
}

/// A duration as callers may supply it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DurationInput {
    /// Native duration value
    Native(Duration),
    /// Literal such as "2h30m"
    Literal(String),
    /// Whole number of seconds
    Seconds(i64),
}

impl DurationInput {
    /// Resolve to a native duration
    pub fn to_duration(&self) -> QueryResult<Duration> {
        let out_of_range = || QueryError::invalid_type("duration out of range");
        match self {
            Self::Native(duration) => Ok(*duration),
            Self::Literal(literal) => Duration::try_milliseconds(to_millis(literal)?).ok_or_else(out_of_range),
            Self::Seconds(seconds) => Duration::try_seconds(*seconds).ok_or_else(out_of_range),
        }
    }

    /// Render as an interval literal
    ///
    /// Literal strings are validated and kept as written; native values and
    /// second counts are formatted with [`to_interval_literal`].
    pub fn to_literal(&self) -> QueryResult<String> {
        match self {
            Self::Literal(literal) => {
                to_millis(literal)?;
                Ok(literal.trim().to_string())
            }
            other => Ok(to_interval_literal(other.to_duration()?)),
        }
    }
}

impl From<Duration> for DurationInput {
    fn from(duration: Duration) -> Self {
        Self::Native(duration)
    }
}

impl From<&str> for DurationInput {
    fn from(literal: &str) -> Self {
        Self::Literal(literal.to_string())
    }
}

impl From<String> for DurationInput {
    fn from(literal: String) -> Self {
        Self::Literal(literal)
    }
}

impl From<i64> for DurationInput {
    fn from(seconds: i64) -> Self {
        Self::Seconds(seconds)
    }
}

impl From<i32> for DurationInput {
    fn from(seconds: i32) -> Self {
        Self::Seconds(seconds as i64)
    }
}
