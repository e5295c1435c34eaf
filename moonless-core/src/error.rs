use chrono::NaiveDate;
use thiserror::Error;

/// Input errors raised by the report computation.
///
/// Degenerate astronomy (no darkness, no night hours) is not an error; it is
/// carried as data and rendered with a fallback.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ForecastError {
    #[error("Latitude must be in [-90, 90]. Provided: {0}")]
    InvalidLatitude(f64),

    #[error("Longitude must be in [-180, 180]. Provided: {0}")]
    InvalidLongitude(f64),

    #[error("Expected exactly {expected} forecast days, got {found}")]
    WrongDayCount { expected: usize, found: usize },

    #[error("Forecast days are not consecutive: {previous} is followed by {next}")]
    NonConsecutiveDays { previous: NaiveDate, next: NaiveDate },

    #[error("Invalid UTC offset: {0} hours")]
    InvalidUtcOffset(f64),
}
