//! table.rs
//!
//! The packed lunar year table and its accessors.
//!
//! Every supported lunar year from [`MIN_YEAR`] to [`MAX_YEAR`] is described
//! by one 20-bit word:
//!
//! - bits 0–3: index of the leap month (1..=12), or 0 when the year has none;
//! - bits 4–15: one flag per ordinary month, month 1 at bit 15 down to
//!   month 12 at bit 4 (set = 30 days, clear = 29 days);
//! - bit 16: size of the leap month (set = 30 days, clear = 29 days).
//!
//! The accessors below decode these words. Each of them rejects a year
//! outside the table with [`CalendarError::YearOutOfRange`].

use once_cell::sync::Lazy;

use crate::error::CalendarError;

/// First lunar year described by the table.
pub const MIN_YEAR: i32 = 1900;

/// Last lunar year described by the table.
pub const MAX_YEAR: i32 = 2049;

/// Low nibble: leap month index, 0 for none.
pub const LEAP_MONTH_MASK: u32 = 0xf;

/// Bit 16: leap month has 30 days.
pub const LEAP_SIZE_BIT: u32 = 0x10000;

/// Bit flag of ordinary month 1; month `m` is `MONTH_1_BIT >> (m - 1)`.
pub const MONTH_1_BIT: u32 = 0x8000;

/// Bit flag of ordinary month 12.
pub const MONTH_12_BIT: u32 = 0x10;

/// Days in a "small" month.
pub const SHORT_MONTH_DAYS: u32 = 29;

/// Days in a "big" month.
pub const LONG_MONTH_DAYS: u32 = 30;

const YEAR_COUNT: usize = (MAX_YEAR - MIN_YEAR + 1) as usize;

/// Packed descriptors, indexed by `year - MIN_YEAR`.
static LUNAR_INFO: [u32; YEAR_COUNT] = [
    0x04bd8, 0x04ae0, 0x0a570, 0x054d5, 0x0d260, 0x0d950, 0x16554, 0x056a0, 0x09ad0, 0x055d2, // 1900-1909
    0x04ae0, 0x0a5b6, 0x0a4d0, 0x0d250, 0x1d255, 0x0b540, 0x0d6a0, 0x0ada2, 0x095b0, 0x14977, // 1910-1919
    0x04970, 0x0a4b0, 0x0b4b5, 0x06a50, 0x06d40, 0x1ab54, 0x02b60, 0x09570, 0x052f2, 0x04970, // 1920-1929
    0x06566, 0x0d4a0, 0x0ea50, 0x16a95, 0x05ad0, 0x02b60, 0x186e3, 0x092e0, 0x1c8d7, 0x0c950, // 1930-1939
    0x0d4a0, 0x1d8a6, 0x0b550, 0x056a0, 0x1a5b4, 0x025d0, 0x092d0, 0x0d2b2, 0x0a950, 0x0b557, // 1940-1949
    0x06ca0, 0x0b550, 0x15355, 0x04da0, 0x0a5d0, 0x14573, 0x052d0, 0x0a9a8, 0x0e950, 0x06aa0, // 1950-1959
    0x0aea6, 0x0ab50, 0x04b60, 0x0aae4, 0x0a570, 0x05260, 0x0f263, 0x0d950, 0x05b57, 0x056a0, // 1960-1969
    0x096d0, 0x04dd5, 0x04ad0, 0x0a4d0, 0x0d4d4, 0x0d250, 0x0d558, 0x0b540, 0x0b5a0, 0x195a6, // 1970-1979
    0x095b0, 0x049b0, 0x0a974, 0x0a4b0, 0x0b27a, 0x06a50, 0x06d40, 0x0af46, 0x0ab60, 0x09570, // 1980-1989
    0x04af5, 0x04970, 0x064b0, 0x074a3, 0x0ea50, 0x06b58, 0x05ac0, 0x0ab60, 0x096d5, 0x092e0, // 1990-1999
    0x0c960, 0x0d954, 0x0d4a0, 0x0da50, 0x07552, 0x056a0, 0x0abb7, 0x025d0, 0x092d0, 0x0cab5, // 2000-2009
    0x0a950, 0x0b4a0, 0x0baa4, 0x0ad50, 0x055d9, 0x04ba0, 0x0a5b0, 0x15176, 0x052b0, 0x0a930, // 2010-2019
    0x07954, 0x06aa0, 0x0ad50, 0x05b52, 0x04b60, 0x0a6e6, 0x0a4e0, 0x0d260, 0x0ea65, 0x0d530, // 2020-2029
    0x05aa0, 0x076a3, 0x096d0, 0x04bd7, 0x04ad0, 0x0a4d0, 0x1d0b6, 0x0d250, 0x0d520, 0x0dd45, // 2030-2039
    0x0b5a0, 0x056d0, 0x055b2, 0x049b0, 0x0a577, 0x0a4b0, 0x0aa50, 0x1b255, 0x06d20, 0x0ada0, // 2040-2049
];

/// Year lengths decoded once, indexed like `LUNAR_INFO`.
static YEAR_DAYS: Lazy<[u32; YEAR_COUNT]> = Lazy::new(|| LUNAR_INFO.map(decode_total_days));

/// Returns `true` if `year` is described by the table.
///
/// ```
/// # use nongli::table::is_supported_year;
/// assert!(is_supported_year(1900));
/// assert!(is_supported_year(2049));
/// assert!(!is_supported_year(2050));
/// ```
pub fn is_supported_year(year: i32) -> bool {
    (MIN_YEAR..=MAX_YEAR).contains(&year)
}

/// Returns the raw packed descriptor of `year`.
pub fn year_info(year: i32) -> Result<u32, CalendarError> {
    if !is_supported_year(year) {
        return Err(CalendarError::YearOutOfRange { year });
    }
    Ok(LUNAR_INFO[(year - MIN_YEAR) as usize])
}

/// Returns the number of days in lunar `year`, leap month included.
///
/// This is 12 × 29 days plus one day for each 30-day ordinary month, plus
/// the length of the leap month if the year has one.
///
/// ```
/// # use nongli::table::year_total_days;
/// assert_eq!(year_total_days(2024).unwrap(), 354);
/// assert_eq!(year_total_days(2025).unwrap(), 384); // leap 6th month
/// assert!(year_total_days(1899).is_err());
/// ```
pub fn year_total_days(year: i32) -> Result<u32, CalendarError> {
    year_info(year)?;
    Ok(YEAR_DAYS[(year - MIN_YEAR) as usize])
}

fn decode_total_days(info: u32) -> u32 {
    let mut sum = 12 * SHORT_MONTH_DAYS;
    let mut bit = MONTH_1_BIT;
    while bit >= MONTH_12_BIT {
        if info & bit != 0 {
            sum += 1;
        }
        bit >>= 1;
    }
    sum + decode_leap_days(info)
}

fn decode_leap_days(info: u32) -> u32 {
    if info & LEAP_MONTH_MASK == 0 {
        0
    } else if info & LEAP_SIZE_BIT != 0 {
        LONG_MONTH_DAYS
    } else {
        SHORT_MONTH_DAYS
    }
}

/// Returns the ordinary month after which the leap month is inserted, or 0
/// when `year` has no leap month.
///
/// ```
/// # use nongli::table::leap_month_index;
/// assert_eq!(leap_month_index(2023).unwrap(), 2);
/// assert_eq!(leap_month_index(2024).unwrap(), 0);
/// ```
pub fn leap_month_index(year: i32) -> Result<u32, CalendarError> {
    Ok(year_info(year)? & LEAP_MONTH_MASK)
}

/// Returns the length of the leap month of `year`: 0 when there is none,
/// otherwise 29 or 30.
pub fn leap_month_days(year: i32) -> Result<u32, CalendarError> {
    Ok(decode_leap_days(year_info(year)?))
}

/// Returns the length (29 or 30) of ordinary month `month` (1-based) of `year`.
///
/// ```
/// # use nongli::table::ordinary_month_days;
/// assert_eq!(ordinary_month_days(2025, 1).unwrap(), 30);
/// assert_eq!(ordinary_month_days(2025, 12).unwrap(), 29);
/// assert!(ordinary_month_days(2025, 13).is_err());
/// ```
pub fn ordinary_month_days(year: i32, month: u32) -> Result<u32, CalendarError> {
    let info = year_info(year)?;
    if !(1..=12).contains(&month) {
        return Err(CalendarError::InvalidMonth { month });
    }
    if info & (MONTH_1_BIT >> (month - 1)) != 0 {
        Ok(LONG_MONTH_DAYS)
    } else {
        Ok(SHORT_MONTH_DAYS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_invariants() {
        for year in MIN_YEAR..=MAX_YEAR {
            let info = year_info(year).unwrap();
            assert!(info < 0x20000, "{year}: {info:#x} wider than 17 bits");
            let leap = info & LEAP_MONTH_MASK;
            assert!(leap <= 12, "{year}: leap index {leap}");
            if leap == 0 {
                assert_eq!(info & LEAP_SIZE_BIT, 0, "{year}: leap size without leap month");
            }
            let total = year_total_days(year).unwrap();
            assert!((353..=385).contains(&total), "{year}: {total} days");
        }
    }

    #[test]
    fn out_of_range_years() {
        for year in [MIN_YEAR - 1, MAX_YEAR + 1, 0, -1, i32::MAX] {
            assert_eq!(
                Err(CalendarError::YearOutOfRange { year }),
                year_total_days(year)
            );
            assert!(leap_month_index(year).is_err());
            assert!(leap_month_days(year).is_err());
            assert!(ordinary_month_days(year, 1).is_err());
        }
    }

    #[test]
    fn leap_months() {
        // (year, leap index, leap length)
        for (year, index, days) in [
            (1900, 8, 29),
            (2017, 6, 30),
            (2020, 4, 29),
            (2023, 2, 29),
            (2024, 0, 0),
            (2025, 6, 29),
        ] {
            assert_eq!(index, leap_month_index(year).unwrap(), "{year}");
            assert_eq!(days, leap_month_days(year).unwrap(), "{year}");
        }
    }

    #[test]
    fn month_lengths_2025() {
        // 0x0a6e6: 1010 0110 1110, leap 6
        let stds = [30, 29, 30, 29, 29, 30, 30, 29, 30, 30, 30, 29];
        for (m, std) in (1..=12).zip(stds) {
            assert_eq!(std, ordinary_month_days(2025, m).unwrap(), "month {m}");
        }
    }

    #[test]
    fn invalid_month() {
        assert_eq!(
            Err(CalendarError::InvalidMonth { month: 0 }),
            ordinary_month_days(2000, 0)
        );
        assert_eq!(
            Err(CalendarError::InvalidMonth { month: 13 }),
            ordinary_month_days(2000, 13)
        );
    }
}
