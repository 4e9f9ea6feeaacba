use thiserror::Error;

/// Crate specific Errors implementation.
///
/// Every failure is a parse-time failure: once an [`Expression`](crate::Expression)
/// has been constructed, matching and enumeration never fail.
/// Each message embeds the offending fragment and the field it belongs to.
#[derive(Debug, Error, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CronParseError {
    /// Schedule text is empty or contains whitespace only.
    #[error("empty cron expression")]
    EmptyExpression,
    /// Schedule has other than 6 or 7 whitespace-separated fields.
    #[error("invalid number of fields: expected 6 or 7, got {0}")]
    InvalidFieldCount(usize),
    /// Single field fragment is empty.
    #[error("empty field: {0}")]
    EmptyField(String),
    /// List with fewer than two items or with an empty item.
    #[error("invalid list: {0}")]
    InvalidList(String),
    /// Range with a malformed part count.
    #[error("invalid range: {0}")]
    InvalidRange(String),
    /// Step with a malformed part count.
    #[error("invalid step: {0}")]
    InvalidStep(String),
    /// Token is neither numeric nor a known month/weekday name.
    #[error("non-numeric value: {0}")]
    NonNumericValue(String),
    /// Resolved value lies outside the field's domain.
    #[error("value out of range: {0}")]
    OutOfRange(String),
    /// `L` or `#` modifier used on a field that does not support it.
    #[error("invalid modifier: {0}")]
    InvalidModifier(String),
}
