//! convert.rs
//!
//! Conversion between Gregorian dates and lunar dates.
//!
//! - **`solar_to_lunar(date)`**: walks the lunar year table forward from the
//!   epoch anchor (1900-01-31, 正月初一 of lunar 1900) to locate the lunar
//!   year, month and day of a Gregorian date.
//! - **`lunar_to_solar_in_year(year, month, day)`**: scans every day of a
//!   Gregorian year and returns the first one carrying the given lunar month
//!   and day, leap or not.
//! - **`lunar_to_solar(year, month, is_leap, day)`**: the exact inverse of
//!   `solar_to_lunar`, accumulating forward from the start of the lunar year.
//!
//! The leap month is reported under the running month counter at the point
//! it is inserted, i.e. one past the ordinary month it follows, with
//! `is_leap() == true`: 2017-07-23 (traditionally 闰六月初一) is month 7, day 1,
//! leap. [`LunarDate::traditional_month`] gives the traditional number.

use std::fmt;

use chrono::{Datelike, Days, NaiveDate};
use tracing::{debug, trace};

use crate::error::CalendarError;
use crate::fmt::{day_label, festival, month_label, LEAP_PREFIX};
use crate::table::{
    leap_month_days, leap_month_index, ordinary_month_days, year_total_days, MAX_YEAR, MIN_YEAR,
};

/// Gregorian date of 正月初一 of the first tabulated lunar year.
pub const EPOCH: NaiveDate = match NaiveDate::from_ymd_opt(MIN_YEAR, 1, 31) {
    Some(date) => date,
    None => panic!("invalid epoch anchor"),
};

/// A date of the lunar calendar, with its labels and festival.
///
/// Values are only produced by the conversions of this module and cannot
/// be changed afterwards.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct LunarDate {
    year: i32,
    month: u32,
    day: u32,
    is_leap: bool,
    traditional_month: u32,
    month_label: &'static str,
    day_label: &'static str,
    festival: Option<&'static str>,
}

impl LunarDate {
    fn new(
        year: i32,
        month: u32,
        day: u32,
        is_leap: bool,
        traditional_month: u32,
    ) -> Result<Self, CalendarError> {
        let month_label = month_label(month).ok_or(CalendarError::InvalidMonth { month })?;
        let day_label = day_label(day).ok_or(CalendarError::InvalidDay { day })?;
        Ok(Self {
            year,
            month,
            day,
            is_leap,
            traditional_month,
            month_label,
            day_label,
            festival: festival(month_label, day_label),
        })
    }

    /// Lunar year, numbered after the Gregorian year in which it begins.
    pub fn year(&self) -> i32 {
        self.year
    }
    /// Lunar month, `1..=12`. The leap month carries the number of the
    /// ordinary month that comes right after it.
    pub fn month(&self) -> u32 {
        self.month
    }
    /// Month number in traditional naming, where the leap month takes the
    /// number of the ordinary month it follows (闰六月 is 6).
    pub fn traditional_month(&self) -> u32 {
        self.traditional_month
    }
    /// Lunar day, `1..=30`.
    pub fn day(&self) -> u32 {
        self.day
    }
    /// `true` inside the inserted leap month.
    pub fn is_leap(&self) -> bool {
        self.is_leap
    }
    /// Label of [`month`](Self::month) such as 正月 or 腊月, without any leap prefix.
    pub fn month_label(&self) -> &'static str {
        self.month_label
    }
    /// Day label such as 初一 or 廿九.
    pub fn day_label(&self) -> &'static str {
        self.day_label
    }
    /// Festival falling on this date, if any.
    ///
    /// The lookup uses the labels alone and ignores [`is_leap`](Self::is_leap).
    pub fn festival(&self) -> Option<&'static str> {
        self.festival
    }
    /// Sort key `(year, month, !is_leap, day)`; the leap month precedes the
    /// ordinary month of the same number. Consecutive Gregorian days have
    /// strictly increasing keys.
    pub fn key(&self) -> (i32, u32, bool, u32) {
        (self.year, self.month, !self.is_leap, self.day)
    }
}

/// Traditional name, e.g. `四月廿九` or `闰六月初一`.
impl fmt::Display for LunarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_leap {
            f.write_str(LEAP_PREFIX)?;
        }
        let month = month_label(self.traditional_month).unwrap_or(self.month_label);
        write!(f, "{}{}", month, self.day_label)
    }
}

impl TryFrom<NaiveDate> for LunarDate {
    type Error = CalendarError;

    fn try_from(date: NaiveDate) -> Result<Self, Self::Error> {
        solar_to_lunar(date)
    }
}

/// One month of a lunar year, as visited by [`LunarMonths`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct MonthSpan {
    /// Running month number; the leap month shares it with the ordinary
    /// month that follows it.
    pub month: u32,
    /// `true` for the leap month.
    pub is_leap: bool,
    /// Length in days, 29 or 30.
    pub days: u32,
}

/// Position of the month walk inside one lunar year.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
struct MonthCursor {
    /// Running ordinary month counter.
    month: u32,
    in_leap: bool,
    leap_consumed: bool,
}

impl MonthCursor {
    fn start() -> Self {
        Self {
            month: 1,
            in_leap: false,
            leap_consumed: false,
        }
    }

    /// Steps past the current month. The counter only moves when leaving an
    /// ordinary month; the leap occurrence is entered once, the first time
    /// the counter reaches `leap_index + 1`. 0 means no leap month.
    fn advance(&mut self, leap_index: u32) {
        if self.in_leap {
            self.in_leap = false;
            self.leap_consumed = true;
            return;
        }
        self.month += 1;
        if leap_index != 0 && !self.leap_consumed && self.month == leap_index + 1 {
            self.in_leap = true;
        }
    }

    /// Reported month number. A leap month after the 12th month stays 12.
    fn reported_month(&self) -> u32 {
        self.month.min(12)
    }

    fn is_done(&self) -> bool {
        self.month > 12 && !self.in_leap
    }
}

/// Iterator over the 12 or 13 months of a lunar year, in order.
///
/// ```
/// # use nongli::convert::LunarMonths;
/// let months: Vec<_> = LunarMonths::new(2023).unwrap().collect();
/// assert_eq!(months.len(), 13);
/// assert_eq!((months[2].month, months[2].is_leap), (3, true));
/// assert_eq!((months[3].month, months[3].is_leap), (3, false));
/// ```
#[derive(Debug, Clone)]
pub struct LunarMonths {
    leap_index: u32,
    leap_days: u32,
    lengths: [u32; 12],
    cursor: MonthCursor,
}

impl LunarMonths {
    /// Creates the month walk of lunar `year`.
    pub fn new(year: i32) -> Result<Self, CalendarError> {
        let mut lengths = [0; 12];
        for (month, len) in (1..=12).zip(lengths.iter_mut()) {
            *len = ordinary_month_days(year, month)?;
        }
        Ok(Self::from_parts(
            leap_month_index(year)?,
            leap_month_days(year)?,
            lengths,
        ))
    }

    fn from_parts(leap_index: u32, leap_days: u32, lengths: [u32; 12]) -> Self {
        Self {
            leap_index,
            leap_days,
            lengths,
            cursor: MonthCursor::start(),
        }
    }
}

impl Iterator for LunarMonths {
    type Item = MonthSpan;

    fn next(&mut self) -> Option<MonthSpan> {
        if self.cursor.is_done() {
            return None;
        }
        let MonthCursor { month, in_leap, .. } = self.cursor;
        let days = if in_leap {
            self.leap_days
        } else {
            self.lengths[(month - 1) as usize]
        };
        let month = self.cursor.reported_month();
        self.cursor.advance(self.leap_index);
        Some(MonthSpan {
            month,
            is_leap: in_leap,
            days,
        })
    }
}

/// Converts a Gregorian date to its lunar date.
///
/// Fails with [`CalendarError::DateOutOfRange`] for dates before [`EPOCH`]
/// or after the last day of lunar year [`MAX_YEAR`].
///
/// ```
/// # use chrono::NaiveDate;
/// # use nongli::convert::solar_to_lunar;
/// let date = NaiveDate::from_ymd_opt(2025, 5, 26).unwrap();
/// let lunar = solar_to_lunar(date).unwrap();
/// assert_eq!((2025, 4, 29, false), (lunar.year(), lunar.month(), lunar.day(), lunar.is_leap()));
/// assert_eq!("四月廿九", lunar.to_string());
/// ```
pub fn solar_to_lunar(date: NaiveDate) -> Result<LunarDate, CalendarError> {
    let out_of_range = CalendarError::DateOutOfRange { date };
    let mut offset = u32::try_from(date.signed_duration_since(EPOCH).num_days())
        .map_err(|_| out_of_range.clone())?;

    let mut year = MIN_YEAR;
    loop {
        if year > MAX_YEAR {
            return Err(out_of_range);
        }
        let days = year_total_days(year)?;
        if offset < days {
            break;
        }
        offset -= days;
        year += 1;
    }
    trace!(%date, year, offset, "resolved lunar year");

    let leap_index = leap_month_index(year)?;
    for span in LunarMonths::new(year)? {
        if offset < span.days {
            let traditional = if span.is_leap { leap_index } else { span.month };
            return LunarDate::new(year, span.month, offset + 1, span.is_leap, traditional);
        }
        offset -= span.days;
    }
    // the months of a year always add up to year_total_days
    Err(out_of_range)
}

/// Finds the first day of Gregorian `year` whose lunar month and day are
/// `month` and `day`.
///
/// Leap and ordinary occurrences of a month are not told apart: whichever
/// comes first in the year wins. Returns `Ok(None)` when no day of `year`
/// matches, which happens for instance with 三十 of a month that only has 29
/// days that year.
///
/// Days of `year` outside the lunar year table are skipped. Fails with
/// [`CalendarError::YearOutOfRange`] when no day of `year` is in the table.
///
/// ```
/// # use chrono::NaiveDate;
/// # use nongli::convert::lunar_to_solar_in_year;
/// assert_eq!(
///     lunar_to_solar_in_year(2025, 12, 28).unwrap(),
///     NaiveDate::from_ymd_opt(2025, 1, 27)
/// );
/// ```
#[tracing::instrument(level = "debug")]
pub fn lunar_to_solar_in_year(
    year: i32,
    month: u32,
    day: u32,
) -> Result<Option<NaiveDate>, CalendarError> {
    check_month_day(month, day)?;
    // lunar 2049 ends in January of the following Gregorian year
    if !(MIN_YEAR..=MAX_YEAR + 1).contains(&year) {
        return Err(CalendarError::YearOutOfRange { year });
    }
    let start = NaiveDate::from_ymd_opt(year, 1, 1).ok_or(CalendarError::YearOutOfRange { year })?;

    let mut skipped = 0;
    for date in start.iter_days().take_while(|d| d.year() == year) {
        let lunar = match solar_to_lunar(date) {
            Ok(lunar) => lunar,
            Err(CalendarError::DateOutOfRange { .. }) => {
                skipped += 1;
                continue;
            }
            Err(e) => return Err(e),
        };
        if lunar.month() == month && lunar.day() == day {
            return Ok(Some(date));
        }
    }
    if skipped > 0 {
        debug!(skipped, "days outside the lunar year table");
    }
    debug!("no matching day");
    Ok(None)
}

/// Converts a lunar date back to its Gregorian date.
///
/// `is_leap` selects the leap occurrence of `month`. Fails with
/// [`CalendarError::InvalidMonth`] if that month does not exist in `year`
/// and with [`CalendarError::InvalidDay`] if `day` exceeds its length.
///
/// ```
/// # use chrono::NaiveDate;
/// # use nongli::convert::lunar_to_solar;
/// assert_eq!(
///     lunar_to_solar(2017, 7, true, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2017, 7, 23).unwrap()
/// );
/// assert!(lunar_to_solar(2024, 6, true, 1).is_err());
/// ```
pub fn lunar_to_solar(
    year: i32,
    month: u32,
    is_leap: bool,
    day: u32,
) -> Result<NaiveDate, CalendarError> {
    check_month_day(month, day)?;
    let mut offset = 0u64;
    for y in MIN_YEAR..year {
        offset += u64::from(year_total_days(y)?);
    }
    for span in LunarMonths::new(year)? {
        if span.month == month && span.is_leap == is_leap {
            if day > span.days {
                return Err(CalendarError::InvalidDay { day });
            }
            return EPOCH
                .checked_add_days(Days::new(offset + u64::from(day - 1)))
                .ok_or(CalendarError::YearOutOfRange { year });
        }
        offset += u64::from(span.days);
    }
    Err(CalendarError::InvalidMonth { month })
}

/// Gregorian date of 正月初一 of lunar `year`.
///
/// ```
/// # use chrono::NaiveDate;
/// # use nongli::convert::lunar_new_year;
/// assert_eq!(lunar_new_year(2025).unwrap(), NaiveDate::from_ymd_opt(2025, 1, 29).unwrap());
/// ```
pub fn lunar_new_year(year: i32) -> Result<NaiveDate, CalendarError> {
    lunar_to_solar(year, 1, false, 1)
}

/// Last Gregorian date that [`solar_to_lunar`] accepts.
pub fn last_supported_date() -> Result<NaiveDate, CalendarError> {
    let start = lunar_new_year(MAX_YEAR)?;
    let days = year_total_days(MAX_YEAR)?;
    start
        .checked_add_days(Days::new(u64::from(days - 1)))
        .ok_or(CalendarError::YearOutOfRange { year: MAX_YEAR })
}

fn check_month_day(month: u32, day: u32) -> Result<(), CalendarError> {
    if !(1..=12).contains(&month) {
        return Err(CalendarError::InvalidMonth { month });
    }
    if !(1..=30).contains(&day) {
        return Err(CalendarError::InvalidDay { day });
    }
    Ok(())
}
