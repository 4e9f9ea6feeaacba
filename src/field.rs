use crate::{bitset::DomainSet, CronParseError, Result};
use chrono::{Datelike, Local, NaiveDateTime, Timelike};
use std::fmt::Display;

pub(crate) type FieldValueType = i32;

/// Sentinel produced by a bare `L` token, never stored into the allowed set.
const LAST_SENTINEL: FieldValueType = -1;

/// Positional field of a cron expression with its fixed numeric domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) enum FieldKind {
    Second = 0,
    Minute = 1,
    Hour = 2,
    DayOfMonth = 3,
    Month = 4,
    DayOfWeek = 5,
    Year = 6,
}

impl FieldKind {
    pub(crate) const DAYS_OF_WEEK: [&'static str; 7] = [
        "Sunday",
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
        "Friday",
        "Saturday",
    ];
    const MONTHS: [&'static str; 12] = [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ];

    /// Closed domain of valid values.
    ///
    /// Months are 0-based, days of week are 1-based with Sunday=1,
    /// the year domain is 100 years around the current one, captured at call time.
    pub(crate) fn domain(&self) -> (FieldValueType, FieldValueType) {
        match self {
            Self::Second | Self::Minute => (0, 59),
            Self::Hour => (0, 23),
            Self::DayOfMonth => (1, 31),
            Self::Month => (0, 11),
            Self::DayOfWeek => (1, 7),
            Self::Year => {
                let current = Local::now().year();
                (current - 100, current + 100)
            }
        }
    }

    fn names(&self) -> &'static [&'static str] {
        match self {
            Self::Month => &Self::MONTHS,
            Self::DayOfWeek => &Self::DAYS_OF_WEEK,
            _ => &[],
        }
    }

    /// Extracts the matching component of a timestamp, remapped into this field's domain.
    pub(crate) fn component(&self, timestamp: &NaiveDateTime) -> FieldValueType {
        match self {
            Self::Second => timestamp.second() as FieldValueType,
            Self::Minute => timestamp.minute() as FieldValueType,
            Self::Hour => timestamp.hour() as FieldValueType,
            Self::DayOfMonth => timestamp.day() as FieldValueType,
            Self::Month => timestamp.month0() as FieldValueType,
            Self::DayOfWeek => timestamp.weekday().num_days_from_sunday() as FieldValueType + 1,
            Self::Year => timestamp.year(),
        }
    }
}

impl Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Second => "second",
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::DayOfMonth => "day-of-month",
            Self::Month => "month",
            Self::DayOfWeek => "day-of-week",
            Self::Year => "year",
        };
        write!(f, "{name}")
    }
}

/// Secondary parsing flag altering a field's interpretation beyond its allowed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) enum Modifier {
    None,
    /// `?`: positional wildcard, the field value doesn't matter.
    CurrentUnspecified,
    /// Trailing `L`: "last" day of month or week.
    Last,
    /// `a#b`: b-th occurrence of weekday a within a month.
    NthWeekdayOfMonth,
}

/// Parsed state of a single cron field: allowed-value set plus modifier metadata.
///
/// Immutable once `parse` returns.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct FieldSpec {
    kind: FieldKind,
    allowed: DomainSet,
    modifier: Modifier,
    // anchor weekday (1-7) and occurrence (1-5), recorded for `#` fields only
    nth_weekday: Option<(FieldValueType, FieldValueType)>,
    raw: String,
}

impl FieldSpec {
    /// Parses one field fragment according to the per-field grammar.
    ///
    /// Returns a fully resolved spec or the first grammar/domain violation,
    /// never a partially populated value.
    pub(crate) fn parse(kind: FieldKind, input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(CronParseError::EmptyField(kind.to_string()));
        }

        let (start, end) = kind.domain();
        let mut spec = Self {
            kind,
            allowed: DomainSet::new(start, end),
            modifier: Modifier::None,
            nth_weekday: None,
            raw: input.to_owned(),
        };

        spec.resolve(trimmed)?;

        if spec.modifier == Modifier::Last && !matches!(kind, FieldKind::DayOfMonth | FieldKind::DayOfWeek) {
            return Err(CronParseError::InvalidModifier(spec.detail(trimmed)));
        }

        Ok(spec)
    }

    /// Dispatches the fragment to the first matching grammar rule.
    ///
    /// `*` and `?` are valid for the whole field only: inside a list they fall
    /// through to the plain-value rule and fail as non-numeric tokens.
    fn resolve(&mut self, input: &str) -> Result<()> {
        if input == "*" {
            self.allowed.fill();
            Ok(())
        } else if input == "?" {
            self.modifier = Modifier::CurrentUnspecified;
            self.allowed.fill();
            Ok(())
        } else if input.contains(',') {
            self.resolve_list(input)
        } else if input.contains('-') {
            self.resolve_range(input)
        } else if input.contains('/') {
            self.resolve_step(input)
        } else if input.contains('#') {
            self.resolve_nth_weekday(input)
        } else {
            let value = self.resolve_value(input)?;
            self.assign(value)
        }
    }

    /// `a,b,c`: at least two non-empty items, each a range, a step or a plain value.
    fn resolve_list(&mut self, input: &str) -> Result<()> {
        let items: Vec<&str> = input.split(',').collect();
        if items.len() < 2 {
            return Err(CronParseError::InvalidList(self.detail(input)));
        }

        for item in items {
            if item.trim().is_empty() {
                return Err(CronParseError::InvalidList(self.detail(input)));
            } else if item.contains('-') {
                self.resolve_range(item)?;
            } else if item.contains('/') {
                self.resolve_step(item)?;
            } else {
                let value = self.resolve_value(item)?;
                self.assign(value)?;
            }
        }

        Ok(())
    }

    /// `a-b` or `a-b/c`: fills `a..=b` stepping by `c` (1 by default).
    fn resolve_range(&mut self, input: &str) -> Result<()> {
        let parts: Vec<&str> = input.split('-').collect();
        if parts.len() != 2 {
            return Err(CronParseError::InvalidRange(self.detail(input)));
        }

        if parts[1].contains('/') {
            let step_parts: Vec<&str> = parts[1].split('/').collect();
            if step_parts.len() != 2 {
                return Err(CronParseError::InvalidStep(self.detail(input)));
            }

            let start = self.resolve_value(parts[0])?;
            let end = self.resolve_value(step_parts[0])?;
            let step = self.resolve_value(step_parts[1])?;
            self.fill_range(start, end, step)
        } else {
            let start = self.resolve_value(parts[0])?;
            let end = self.resolve_value(parts[1])?;
            self.fill_range(start, end, 1)
        }
    }

    /// `a/c`: fills from `a` up to the domain's end stepping by `c`.
    fn resolve_step(&mut self, input: &str) -> Result<()> {
        let parts: Vec<&str> = input.split('/').collect();
        if parts.len() != 2 {
            return Err(CronParseError::InvalidStep(self.detail(input)));
        }

        let start = self.resolve_value(parts[0])?;
        let step = self.resolve_value(parts[1])?;
        let end = self.allowed.end();
        self.fill_range(start, end, step)
    }

    /// `a#b`: records the anchor weekday and occurrence, day-of-week field only.
    ///
    /// The anchor and occurrence are diagnostic metadata: the matcher consults
    /// only the allowed set, which stays unpopulated for `#` fields.
    fn resolve_nth_weekday(&mut self, input: &str) -> Result<()> {
        if self.kind != FieldKind::DayOfWeek {
            return Err(CronParseError::InvalidModifier(self.detail(input)));
        }

        let parts: Vec<&str> = input.split('#').collect();
        if parts.len() != 2 {
            return Err(CronParseError::InvalidModifier(self.detail(input)));
        }

        let anchor = self.resolve_value(parts[0])?;
        let occurrence = self.resolve_value(parts[1])?;
        if !(1..=7).contains(&anchor) || !(1..=5).contains(&occurrence) {
            return Err(CronParseError::OutOfRange(self.detail(input)));
        }

        self.modifier = Modifier::NthWeekdayOfMonth;
        self.nth_weekday = Some((anchor, occurrence));

        Ok(())
    }

    /// Fills `start..=end` stepping by `step`, domain-checking every value.
    ///
    /// An inverted range produces an empty fill, not an error.
    fn fill_range(&mut self, start: FieldValueType, end: FieldValueType, step: FieldValueType) -> Result<()> {
        if step < 1 {
            return Err(CronParseError::OutOfRange(self.detail(&step.to_string())));
        }

        let mut value = start;
        while value <= end {
            self.assign(value)?;
            value = match value.checked_add(step) {
                Some(next) => next,
                None => break,
            };
        }

        Ok(())
    }

    /// Resolves one plain token to a numeric value.
    ///
    /// A trailing `L`/`l` sets the `Last` modifier and is stripped first;
    /// the rest resolves by name (full or 3-letter prefix, case-insensitive)
    /// or as an unsigned decimal number. A token that is empty after stripping
    /// (bare `L`) yields the sentinel skipped by [`assign`](Self::assign).
    fn resolve_value(&mut self, token: &str) -> Result<FieldValueType> {
        let mut token = token;
        if token.ends_with(['L', 'l']) {
            self.modifier = Modifier::Last;
            token = &token[..token.len() - 1];
        }

        if let Some(value) = self.resolve_name(token) {
            return Ok(value);
        }

        let token = token.trim();
        if token.is_empty() && self.modifier == Modifier::Last {
            return Ok(LAST_SENTINEL);
        }

        if !token.is_empty() && token.bytes().all(|byte| byte.is_ascii_digit()) {
            if let Ok(value) = token.parse() {
                return Ok(value);
            }
        }

        Err(CronParseError::NonNumericValue(self.detail(token)))
    }

    /// Matches the token against the kind's named values, if any.
    ///
    /// Day-of-week names map to 1-based values (Sunday=1), month names to 0-based.
    fn resolve_name(&self, token: &str) -> Option<FieldValueType> {
        self.kind
            .names()
            .iter()
            .position(|name| {
                name.eq_ignore_ascii_case(token) || (token.len() == 3 && name[..3].eq_ignore_ascii_case(token))
            })
            .map(|index| {
                if self.kind == FieldKind::DayOfWeek {
                    index as FieldValueType + 1
                } else {
                    index as FieldValueType
                }
            })
    }

    /// Single funnel for every resolved value: domain check, then bit set.
    fn assign(&mut self, value: FieldValueType) -> Result<()> {
        if value == LAST_SENTINEL && self.modifier == Modifier::Last {
            return Ok(());
        }

        if value < self.allowed.start() || value > self.allowed.end() {
            return Err(CronParseError::OutOfRange(self.detail(&value.to_string())));
        }

        self.allowed.insert(value);
        Ok(())
    }

    fn detail(&self, fragment: &str) -> String {
        format!("'{fragment}' in {} field", self.kind)
    }

    /// Membership test against the allowed set, O(1).
    #[inline]
    pub(crate) fn matches(&self, value: FieldValueType) -> bool {
        self.allowed.contains(value)
    }

    /// Tests the matching component of a timestamp.
    #[inline]
    pub(crate) fn matches_timestamp(&self, timestamp: &NaiveDateTime) -> bool {
        self.matches(self.kind.component(timestamp))
    }

    /// Highest allowed value, or `None` when the set is empty.
    pub(crate) fn last_allowed_value(&self) -> Option<FieldValueType> {
        self.allowed.last()
    }

    /// One-line human-readable dump of the raw fragment and resolved values.
    pub(crate) fn describe(&self) -> String {
        let values = if let Some((anchor, occurrence)) = self.nth_weekday {
            format!("{}#{occurrence}", FieldKind::DAYS_OF_WEEK[(anchor - 1) as usize])
        } else {
            let mut values = if self.allowed.is_empty() {
                "none".to_owned()
            } else {
                self.allowed
                    .iter()
                    .map(|value| value.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            if self.modifier == Modifier::Last {
                values.push_str(" (last)");
            }
            values
        };

        format!("- parsed: {} - field: {} - values: {values}", self.raw, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn allowed(spec: &FieldSpec) -> Vec<FieldValueType> {
        spec.allowed.iter().collect()
    }

    #[rstest]
    #[case(FieldKind::Second)]
    #[case(FieldKind::Minute)]
    #[case(FieldKind::Hour)]
    #[case(FieldKind::DayOfMonth)]
    #[case(FieldKind::Month)]
    #[case(FieldKind::DayOfWeek)]
    #[case(FieldKind::Year)]
    fn wildcard_fills_whole_domain(#[case] kind: FieldKind) {
        let (start, end) = kind.domain();
        let spec = FieldSpec::parse(kind, "*").unwrap();

        assert_eq!(allowed(&spec), (start..=end).collect::<Vec<_>>());
        assert_eq!(spec.modifier, Modifier::None);
        assert_eq!(spec.last_allowed_value(), Some(end));
    }

    #[rstest]
    #[case(FieldKind::Second)]
    #[case(FieldKind::DayOfMonth)]
    #[case(FieldKind::DayOfWeek)]
    fn unspecified_fills_whole_domain(#[case] kind: FieldKind) {
        let (start, end) = kind.domain();
        let spec = FieldSpec::parse(kind, "?").unwrap();

        assert_eq!(allowed(&spec), (start..=end).collect::<Vec<_>>());
        assert_eq!(spec.modifier, Modifier::CurrentUnspecified);
    }

    #[rstest]
    #[case(FieldKind::Second, "0", vec![0])]
    #[case(FieldKind::Second, "59", vec![59])]
    #[case(FieldKind::Second, "07", vec![7])]
    #[case(FieldKind::Minute, "0-20/5", vec![0, 5, 10, 15, 20])]
    #[case(FieldKind::Minute, "57/2", vec![57, 59])]
    #[case(FieldKind::Hour, "1,3,7-10,18/2", vec![1, 3, 7, 8, 9, 10, 18, 20, 22])]
    #[case(FieldKind::Hour, "22-23", vec![22, 23])]
    #[case(FieldKind::DayOfMonth, "1,15,31", vec![1, 15, 31])]
    #[case(FieldKind::DayOfMonth, "10/7", vec![10, 17, 24, 31])]
    #[case(FieldKind::Month, "0", vec![0])]
    #[case(FieldKind::Month, "JAN", vec![0])]
    #[case(FieldKind::Month, "January", vec![0])]
    #[case(FieldKind::Month, "jan", vec![0])]
    #[case(FieldKind::Month, "dec", vec![11])]
    #[case(FieldKind::Month, "July", vec![6])]
    #[case(FieldKind::Month, "jan,mar,sep", vec![0, 2, 8])]
    #[case(FieldKind::Month, "FEB-MAY", vec![1, 2, 3, 4])]
    #[case(FieldKind::DayOfWeek, "MON", vec![2])]
    #[case(FieldKind::DayOfWeek, "sunday", vec![1])]
    #[case(FieldKind::DayOfWeek, "sat", vec![7])]
    #[case(FieldKind::DayOfWeek, "MON-FRI", vec![2, 3, 4, 5, 6])]
    #[case(FieldKind::DayOfWeek, "1,7", vec![1, 7])]
    #[case(FieldKind::Second, "5-3", vec![])]
    fn parse_valid_values(#[case] kind: FieldKind, #[case] input: &str, #[case] expected: Vec<FieldValueType>) {
        let spec = FieldSpec::parse(kind, input);
        assert!(spec.is_ok(), "kind = {kind:?}, input = {input}, error = {}", spec.err().unwrap());
        assert_eq!(allowed(&spec.unwrap()), expected, "input = {input}");
    }

    #[test]
    fn parse_valid_year_values() {
        let (start, end) = FieldKind::Year.domain();

        let spec = FieldSpec::parse(FieldKind::Year, &start.to_string()).unwrap();
        assert_eq!(allowed(&spec), vec![start]);

        let spec = FieldSpec::parse(FieldKind::Year, &end.to_string()).unwrap();
        assert_eq!(allowed(&spec), vec![end]);

        let input = format!("{}-{}", end - 3, end);
        let spec = FieldSpec::parse(FieldKind::Year, &input).unwrap();
        assert_eq!(allowed(&spec), (end - 3..=end).collect::<Vec<_>>());
    }

    #[rstest]
    // empty and malformed fragments
    #[case(FieldKind::Second, "")]
    #[case(FieldKind::Second, " ")]
    #[case(FieldKind::Second, ",")]
    #[case(FieldKind::Second, "1,")]
    #[case(FieldKind::Second, ",1")]
    #[case(FieldKind::Second, "-")]
    #[case(FieldKind::Second, "1-")]
    #[case(FieldKind::Second, "1-2-3")]
    #[case(FieldKind::Second, "/")]
    #[case(FieldKind::Second, "5/")]
    #[case(FieldKind::Second, "1/2/3")]
    #[case(FieldKind::Second, "a")]
    #[case(FieldKind::Second, "a,b,c")]
    #[case(FieldKind::Second, "a-b")]
    #[case(FieldKind::Second, "1.5")]
    #[case(FieldKind::Second, "-5")]
    // wildcards are not list items
    #[case(FieldKind::Second, "*,1")]
    #[case(FieldKind::DayOfMonth, "?,4")]
    // step base may not be a wildcard
    #[case(FieldKind::Second, "*/10")]
    // zero step
    #[case(FieldKind::Second, "0/0")]
    // out of domain
    #[case(FieldKind::Second, "60")]
    #[case(FieldKind::Minute, "60")]
    #[case(FieldKind::Hour, "24")]
    #[case(FieldKind::DayOfMonth, "0")]
    #[case(FieldKind::DayOfMonth, "32")]
    #[case(FieldKind::Month, "12")]
    #[case(FieldKind::DayOfWeek, "0")]
    #[case(FieldKind::DayOfWeek, "8")]
    #[case(FieldKind::Year, "205")]
    #[case(FieldKind::Year, "1800")]
    // unknown names and short prefixes
    #[case(FieldKind::Month, "janu")]
    #[case(FieldKind::Month, "ja")]
    #[case(FieldKind::Month, "j@n")]
    #[case(FieldKind::DayOfWeek, "we")]
    #[case(FieldKind::DayOfWeek, "weekend")]
    // trailing l is taken as the last-day modifier, so these never resolve
    #[case(FieldKind::Month, "Jul")]
    #[case(FieldKind::Month, "jul")]
    #[case(FieldKind::Month, "April")]
    // L is valid for day-of-month and day-of-week only
    #[case(FieldKind::Second, "L")]
    #[case(FieldKind::Minute, "30L")]
    #[case(FieldKind::Hour, "5L")]
    #[case(FieldKind::Month, "1L")]
    #[case(FieldKind::Year, "L")]
    // # is valid for day-of-week only, with bounded anchor and occurrence
    #[case(FieldKind::Second, "1#1")]
    #[case(FieldKind::DayOfMonth, "1#1")]
    #[case(FieldKind::Month, "1#1")]
    #[case(FieldKind::DayOfWeek, "0#1")]
    #[case(FieldKind::DayOfWeek, "8#1")]
    #[case(FieldKind::DayOfWeek, "1#0")]
    #[case(FieldKind::DayOfWeek, "1#6")]
    #[case(FieldKind::DayOfWeek, "1#2#3")]
    #[case(FieldKind::DayOfWeek, "#")]
    fn parse_invalid(#[case] kind: FieldKind, #[case] input: &str) {
        let spec = FieldSpec::parse(kind, input);
        assert!(spec.is_err(), "kind = {kind:?}, input = '{input}'");
    }

    #[rstest]
    #[case(FieldKind::DayOfMonth, "31L", vec![31])]
    #[case(FieldKind::DayOfMonth, "15l", vec![15])]
    #[case(FieldKind::DayOfWeek, "5L", vec![5])]
    #[case(FieldKind::DayOfMonth, "1,15,L", vec![1, 15])]
    fn parse_last_modifier(#[case] kind: FieldKind, #[case] input: &str, #[case] expected: Vec<FieldValueType>) {
        let spec = FieldSpec::parse(kind, input).unwrap();

        assert_eq!(spec.modifier, Modifier::Last);
        assert_eq!(allowed(&spec), expected);
    }

    #[test]
    fn parse_bare_last_keeps_allowed_set_empty() {
        let spec = FieldSpec::parse(FieldKind::DayOfMonth, "L").unwrap();

        assert_eq!(spec.modifier, Modifier::Last);
        assert!(allowed(&spec).is_empty());
        assert_eq!(spec.last_allowed_value(), None);
    }

    #[rstest]
    #[case("1#1", (1, 1))]
    #[case("7#5", (7, 5))]
    #[case("fri#2", (6, 2))]
    #[case("Sunday#1", (1, 1))]
    fn parse_nth_weekday(#[case] input: &str, #[case] expected: (FieldValueType, FieldValueType)) {
        let spec = FieldSpec::parse(FieldKind::DayOfWeek, input).unwrap();

        assert_eq!(spec.modifier, Modifier::NthWeekdayOfMonth);
        assert_eq!(spec.nth_weekday, Some(expected));
        // the anchor is metadata only, the allowed set stays empty
        assert!(allowed(&spec).is_empty());
        assert!(!spec.matches(expected.0));
    }

    #[rstest]
    #[case(FieldKind::Second, "10,12,20/5,25-30,40-45/2", vec![10, 12, 20, 25, 26, 27, 28, 29, 30, 35, 40, 42, 44, 45, 50, 55])]
    #[case(FieldKind::Hour, "0-5,12,20/2", vec![0, 1, 2, 3, 4, 5, 12, 20, 22])]
    #[case(FieldKind::Month, "jan,mar-may,6/3", vec![0, 2, 3, 4, 6, 9])]
    fn parse_combined_lists(#[case] kind: FieldKind, #[case] input: &str, #[case] expected: Vec<FieldValueType>) {
        let spec = FieldSpec::parse(kind, input).unwrap();
        assert_eq!(allowed(&spec), expected, "input = {input}");
    }

    #[rstest]
    #[case("2026-03-02T09:30:45", FieldKind::Second, 45)]
    #[case("2026-03-02T09:30:45", FieldKind::Minute, 30)]
    #[case("2026-03-02T09:30:45", FieldKind::Hour, 9)]
    #[case("2026-03-02T09:30:45", FieldKind::DayOfMonth, 2)]
    #[case("2026-03-02T09:30:45", FieldKind::Month, 2)] // March is 2 in the 0-based domain
    #[case("2026-03-02T09:30:45", FieldKind::DayOfWeek, 2)] // Monday
    #[case("2026-03-01T00:00:00", FieldKind::DayOfWeek, 1)] // Sunday
    #[case("2026-03-07T00:00:00", FieldKind::DayOfWeek, 7)] // Saturday
    #[case("2026-03-02T09:30:45", FieldKind::Year, 2026)]
    fn component_remapping(#[case] timestamp: &str, #[case] kind: FieldKind, #[case] expected: FieldValueType) {
        let timestamp = timestamp.parse::<NaiveDateTime>().unwrap();
        assert_eq!(kind.component(&timestamp), expected);
    }

    #[test]
    fn matches_is_total_outside_domain() {
        let spec = FieldSpec::parse(FieldKind::Month, "*").unwrap();

        assert!(spec.matches(0));
        assert!(spec.matches(11));
        assert!(!spec.matches(12));
        assert!(!spec.matches(-1));
    }

    #[test]
    fn describe_contains_raw_and_values() {
        let spec = FieldSpec::parse(FieldKind::Hour, "1,3").unwrap();
        let description = spec.describe();

        assert!(description.contains("1,3"));
        assert!(description.contains("hour"));
        assert!(description.contains("1, 3"));

        let spec = FieldSpec::parse(FieldKind::DayOfWeek, "fri#2").unwrap();
        assert!(spec.describe().contains("Friday#2"));

        let spec = FieldSpec::parse(FieldKind::DayOfMonth, "15L").unwrap();
        assert!(spec.describe().contains("(last)"));
    }
}
