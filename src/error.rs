//! error.rs
//!
//! Error types for the nongli crate.

use chrono::NaiveDate;

use crate::table::{MAX_YEAR, MIN_YEAR};

/// Error type for all fallible operations in the nongli crate.
///
/// A reverse lookup that finds nothing is not an error (it yields
/// `Ok(None)`), and neither is a malformed birthday line (it yields `None`).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalendarError {
    /// Returned when a year argument lies outside the lunar year table.
    #[error("year {year} outside supported range {min}..={max}", min = MIN_YEAR, max = MAX_YEAR)]
    YearOutOfRange {
        /// The rejected year.
        year: i32,
    },

    /// Returned when a Gregorian date does not fall inside any tabulated lunar year.
    #[error("date {date} outside supported lunar years {min}..={max}", min = MIN_YEAR, max = MAX_YEAR)]
    DateOutOfRange {
        /// The rejected date.
        date: NaiveDate,
    },

    /// Returned when a lunar month is not in 1..=12 or does not exist in that year.
    #[error("invalid lunar month {month}")]
    InvalidMonth {
        /// The rejected month number.
        month: u32,
    },

    /// Returned when a lunar day is not in 1..=30 or exceeds its month.
    #[error("invalid lunar day {day}")]
    InvalidDay {
        /// The rejected day number.
        day: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_year_out_of_range() {
        let e = CalendarError::YearOutOfRange { year: 2050 };
        assert_eq!(e.to_string(), "year 2050 outside supported range 1900..=2049");
    }

    #[test]
    fn error_date_out_of_range() {
        let date = NaiveDate::from_ymd_opt(1900, 1, 30).unwrap();
        let e = CalendarError::DateOutOfRange { date };
        assert_eq!(
            e.to_string(),
            "date 1900-01-30 outside supported lunar years 1900..=2049"
        );
    }

    #[test]
    fn error_invalid_month_and_day() {
        assert_eq!(
            CalendarError::InvalidMonth { month: 13 }.to_string(),
            "invalid lunar month 13"
        );
        assert_eq!(
            CalendarError::InvalidDay { day: 31 }.to_string(),
            "invalid lunar day 31"
        );
    }
}
