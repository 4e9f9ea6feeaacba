//! Extended cron expressions parser with timestamp matching and occurrences enumeration.
#![deny(unsafe_code, warnings, missing_docs)]

//! This is a tiny crate, intended to:
//! - parse seven-field cron-style schedule expressions;
//! - answer whether a timestamp matches a schedule;
//! - enumerate the next timestamps that match a schedule.
//!
//! It has a single external runtime dependency - [chrono](https://crates.io/crates/chrono).
//!
//! _This is not a cron jobs scheduler or runner._ It only answers membership and
//! enumeration queries about human-authored schedule strings; all timestamps are
//! naive (no timezone handling).
//!
//! ## Cron schedule format
//!
//! A schedule expression has 6 or 7 whitespace-separated fields: seconds, minutes,
//! hours, day of month, month, day of week and an optional year. If the year field
//! is omitted, `*` (every year) is assumed.
//!
//! The table below describes valid values and patterns of each field:
//!
//! | Field        | Required | Allowed values        | Allowed special characters |
//! |--------------|----------|-----------------------|----------------------------|
//! | Seconds      | Yes      | 0-59                  | * ? , - /                  |
//! | Minutes      | Yes      | 0-59                  | * ? , - /                  |
//! | Hours        | Yes      | 0-23                  | * ? , - /                  |
//! | Day of Month | Yes      | 1-31                  | * ? , - / L                |
//! | Month        | Yes      | 0-11 or JAN-DEC       | * ? , - /                  |
//! | Day of Week  | Yes      | 1-7 or SUN-SAT        | * ? , - / L #              |
//! | Year         | No       | now-100 ... now+100   | * ? , - /                  |
//!
//! Months are 0-based (`0` is January), days of week are 1-based with Sunday as `1`.
//! Month and weekday names are accepted in full or as a 3-letter prefix,
//! case-insensitively.
//!
//! Patterns meanings:
//! - `*` - each possible value, i.e. `0,1,2,...,59` for minutes;
//! - `?` - same as `*`, marks a field whose value intentionally doesn't matter;
//! - `,` - list of values, ranges or steps, i.e. `1,7,12`, `1,15-20`;
//! - `-` - range of values, optionally stepped, i.e. `0-15`, `JAN-MAR`, `10-30/5`;
//! - `/` - repeating values from a start up to the end of the field's domain, i.e. `10/5`;
//! - `L` - as a suffix of a day-of-month or day-of-week value, or alone, marks the
//!   "last" intent; it is kept as metadata and shown by diagnostics;
//! - `#` - N-th weekday of the month, day-of-week field only, i.e. `FRI#2`, `1#4`;
//!   kept as metadata and shown by diagnostics, such a field matches no timestamp.
//!
//! ## How to use
//!
//! The single public entity of the crate is an [`Expression`] structure, which has
//! three basic methods:
//! - [parse()](Expression::parse): constructor to parse and validate the provided schedule;
//! - [matches()](Expression::matches): tests whether a timestamp satisfies the schedule;
//! - [next_occurrences()](Expression::next_occurrences): returns an `Iterator` over the
//!   next matching timestamps.
//!
//! ### Example with `matches`
//! ```rust
//! use chrono::NaiveDate;
//! use cron_match::{Expression, Result};
//!
//! fn matches() -> Result<()> {
//!     let expression = Expression::parse("0 30 9 ? * MON-FRI")?;
//!
//!     // 2026-03-02 is a Monday
//!     let timestamp = NaiveDate::from_ymd_opt(2026, 3, 2)
//!         .unwrap()
//!         .and_hms_opt(9, 30, 0)
//!         .unwrap();
//!     assert!(expression.matches(&timestamp));
//!
//!     Ok(())
//! }
//! # matches().unwrap();
//! ```
//!
//! ### Example with `next_occurrences`
//! ```rust
//! use chrono::NaiveDate;
//! use cron_match::{Expression, Result};
//!
//! fn occurrences() -> Result<()> {
//!     let expression = Expression::parse("0 0 12 * * ?")?;
//!     let start = NaiveDate::from_ymd_opt(2026, 1, 1)
//!         .unwrap()
//!         .and_hms_opt(0, 0, 0)
//!         .unwrap();
//!
//!     // Get the next 3 matching timestamps after the start
//!     expression
//!         .next_occurrences(&start, 3)
//!         .for_each(|t| println!("next: {t}"));
//!
//!     Ok(())
//! }
//! # occurrences().unwrap();
//! ```
//!
//! # Feature flags
//! * `serde`: adds [`Serialize`](https://docs.rs/serde/latest/serde/trait.Serialize.html)
//!   and [`Deserialize`](https://docs.rs/serde/latest/serde/trait.Deserialize.html) trait
//!   implementation for [`Expression`] through its string form.

mod bitset;
/// Crate specific Error implementation.
pub mod error;
/// Cron expression parser, matcher and occurrences generator.
pub mod expression;
mod field;

// Re-export of public entities.
pub use error::CronParseError;
pub use expression::Expression;

/// Convenient alias for `Result`.
pub type Result<T, E = CronParseError> = std::result::Result<T, E>;
