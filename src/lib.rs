//! Chinese lunisolar (农历) calendar conversion for lunar years 1900–2049,
//! driven by a packed table of month lengths and leap months.
//!
//! The crate exposes three operations:
//!
//! 1. **`solar_to_lunar(date)`**: converts a Gregorian date into a
//!    [`LunarDate`] with its month and day labels and festival, if any.
//! 2. **`lunar_to_solar_in_year(year, month, day)`**: finds the first day
//!    of Gregorian `year` with the given lunar month and day.
//! 3. **`parse_and_resolve_birthday_line(line)`**: parses a record like
//!    `妈妈 农历 12.28` and returns this year's Gregorian date for it.
//!
//! # Usage
//!
//! ```
//! use chrono::NaiveDate;
//! use nongli::{lunar_to_solar_in_year, solar_to_lunar};
//!
//! let date = NaiveDate::from_ymd_opt(2025, 1, 29).unwrap();
//! let lunar = solar_to_lunar(date).unwrap();
//! assert_eq!((lunar.month(), lunar.day()), (1, 1));
//! assert_eq!(lunar.festival(), Some("春节"));
//!
//! let found = lunar_to_solar_in_year(2025, 1, 1).unwrap();
//! assert_eq!(found, Some(date));
//! ```
//!
//! All functions are pure apart from the clock read in
//! [`parse_and_resolve_birthday_line`], and the tables are immutable
//! statics, so everything can be called from any thread.

pub mod birthday;
pub mod convert;
pub mod error;
pub mod fmt;
pub mod table;

pub use birthday::{parse_and_resolve_birthday_line, parse_line, BirthdayLine, Marker};
pub use convert::{lunar_to_solar, lunar_to_solar_in_year, solar_to_lunar, LunarDate};
pub use error::CalendarError;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_golden_date() {
        let lunar = solar_to_lunar(NaiveDate::from_ymd_opt(2025, 5, 26).unwrap()).unwrap();
        assert_eq!(2025, lunar.year());
        assert_eq!(4, lunar.month());
        assert_eq!(29, lunar.day());
        assert!(!lunar.is_leap());
        assert_eq!("四月", lunar.month_label());
        assert_eq!("廿九", lunar.day_label());
        assert_eq!(None, lunar.festival());
    }

    #[test]
    fn test_reverse_golden_date() {
        assert_eq!(
            Ok(NaiveDate::from_ymd_opt(2025, 1, 27)),
            lunar_to_solar_in_year(2025, 12, 28)
        );
    }

    #[test]
    fn test_out_of_range_is_error() {
        let date = NaiveDate::from_ymd_opt(2050, 1, 23).unwrap();
        assert!(matches!(
            solar_to_lunar(date),
            Err(CalendarError::DateOutOfRange { .. })
        ));
    }
}
