use crate::{
    field::{FieldKind, FieldSpec, FieldValueType},
    CronParseError, Result,
};
use chrono::{Datelike, NaiveDateTime, TimeDelta};
use std::{fmt::Display, str::FromStr};

/// Represents a parsed cron schedule expression with its query methods.
///
/// For the schedule format clarification and usage examples, please refer
/// to the [crate documentation](crate).
///
/// An instance is fully resolved by [`parse`](Expression::parse) and immutable
/// afterward, so it's safe to query from multiple threads without locking.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String"))]
#[cfg_attr(feature = "serde", serde(into = "String"))]
pub struct Expression {
    second: FieldSpec,
    minute: FieldSpec,
    hour: FieldSpec,
    dom: FieldSpec,
    month: FieldSpec,
    dow: FieldSpec,
    year: FieldSpec,
    raw: String,
}

impl Expression {
    /// Parses and validates the provided schedule text and constructs an [`Expression`] instance.
    ///
    /// The text must contain 6 or 7 whitespace-separated fields in the order
    /// second, minute, hour, day-of-month, month, day-of-week and an optional
    /// year; a missing year field means "every year".
    ///
    /// Returns [`CronParseError`] if any field violates the grammar or its
    /// domain; no partially parsed value is ever produced.
    pub fn parse(expression: impl Into<String>) -> Result<Self> {
        let raw = expression.into();
        let fragments: Vec<&str> = raw.split_whitespace().collect();

        if fragments.is_empty() {
            return Err(CronParseError::EmptyExpression);
        }
        if fragments.len() != 6 && fragments.len() != 7 {
            return Err(CronParseError::InvalidFieldCount(fragments.len()));
        }

        let year = FieldSpec::parse(FieldKind::Year, fragments.get(6).copied().unwrap_or("*"))?;

        Ok(Self {
            second: FieldSpec::parse(FieldKind::Second, fragments[0])?,
            minute: FieldSpec::parse(FieldKind::Minute, fragments[1])?,
            hour: FieldSpec::parse(FieldKind::Hour, fragments[2])?,
            dom: FieldSpec::parse(FieldKind::DayOfMonth, fragments[3])?,
            month: FieldSpec::parse(FieldKind::Month, fragments[4])?,
            dow: FieldSpec::parse(FieldKind::DayOfWeek, fragments[5])?,
            year,
            raw,
        })
    }

    /// Returns `true` if the timestamp satisfies every field of the schedule.
    ///
    /// Component remapping: second, minute, hour and day-of-month are taken
    /// as is, month is 0-based, day-of-week is 1-based with Sunday=1,
    /// year as is. Fields are checked in positional order with a short-circuit
    /// on the first mismatch.
    pub fn matches(&self, timestamp: &NaiveDateTime) -> bool {
        self.fields().iter().all(|field| field.matches_timestamp(timestamp))
    }

    /// Returns an iterator over up to `count` timestamps strictly after `start`
    /// that satisfy [`matches`](Expression::matches), in ascending order.
    ///
    /// The cursor advances one second at a time, so correctness is guaranteed
    /// for every schedule, but very sparse ones may need a long scan between
    /// matches. Iteration stops once `count` matches were produced or the
    /// cursor's year exceeds the highest allowed year of the schedule, which
    /// bounds the scan even when fewer than `count` matches exist.
    ///
    /// The consumer may stop pulling at any point; repeated calls with the
    /// same `start` enumerate independently.
    pub fn next_occurrences(&self, start: &NaiveDateTime, count: usize) -> impl Iterator<Item = NaiveDateTime> {
        OccurrenceIterator {
            expression: self.clone(),
            cursor: *start,
            remaining: count,
            horizon: self.year.last_allowed_value(),
        }
    }

    /// Returns a human-readable dump of the schedule: the raw text followed
    /// by one line per field with its fragment and resolved values.
    ///
    /// The content is diagnostic only and is not meant to be parsed back.
    pub fn describe(&self) -> String {
        let mut result = format!("{}\n", self.raw);
        for field in self.fields() {
            result.push_str(&format!("\t{}\n", field.describe()));
        }

        result
    }

    #[inline]
    fn fields(&self) -> [&FieldSpec; 7] {
        [
            &self.second,
            &self.minute,
            &self.hour,
            &self.dom,
            &self.month,
            &self.dow,
            &self.year,
        ]
    }
}

/// Contains enumeration state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct OccurrenceIterator {
    expression: Expression,
    cursor: NaiveDateTime,
    remaining: usize,
    horizon: Option<FieldValueType>,
}

impl Iterator for OccurrenceIterator {
    type Item = NaiveDateTime;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let horizon = self.horizon?;

        while self.cursor.year() <= horizon {
            self.cursor = self.cursor.checked_add_signed(TimeDelta::seconds(1))?;
            if self.expression.matches(&self.cursor) {
                self.remaining -= 1;
                return Some(self.cursor);
            }
        }

        None
    }
}

impl From<Expression> for String {
    fn from(value: Expression) -> Self {
        value.to_string()
    }
}

impl From<&Expression> for String {
    fn from(value: &Expression) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for Expression {
    type Error = CronParseError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(value)
    }
}

impl TryFrom<&String> for Expression {
    type Error = CronParseError;

    fn try_from(value: &String) -> Result<Self> {
        Self::parse(value)
    }
}

impl TryFrom<&str> for Expression {
    type Error = CronParseError;

    fn try_from(value: &str) -> Result<Self> {
        Self::parse(value)
    }
}

impl FromStr for Expression {
    type Err = CronParseError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}
