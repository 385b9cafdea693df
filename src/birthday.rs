//! birthday.rs
//!
//! Parsing of one-line birthday records and resolution to Gregorian dates.
//!
//! A record has the shape `<label> <marker> <month>.<day>`, for example
//! `妈妈 农历 12.28` or `爸爸 阳历 5.12`. The marker says whether the month
//! and day belong to the lunar or the Gregorian calendar; recognized spellings
//! are listed in the alias table below. Further whitespace-separated fields
//! after the date are ignored.
//!
//! Malformed records never produce an error: the parsers return `None` and
//! the caller shows "no data".

use std::collections::HashMap;

use chrono::{Datelike, Local, NaiveDate};
use lazy_static::lazy_static;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::convert::{lunar_to_solar_in_year, solar_to_lunar};

/// Which calendar the month and day of a record belong to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Marker {
    /// Month and day of the lunar calendar.
    Lunar,
    /// Month and day of the Gregorian calendar.
    Solar,
}

/// Accepted spellings of the calendar marker.
static MARKER_ALIASES: Lazy<HashMap<&'static str, Marker>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("农历", Marker::Lunar);
    m.insert("阴历", Marker::Lunar);
    m.insert("lunar", Marker::Lunar);
    m.insert("阳历", Marker::Solar);
    m.insert("公历", Marker::Solar);
    m.insert("新历", Marker::Solar);
    m.insert("solar", Marker::Solar);
    m
});

lazy_static! {
    /// `<label> <marker> <date>` followed by anything.
    static ref LINE_REGEX: Regex =
        Regex::new(r"^\s*(?P<label>\S+)\s+(?P<marker>\S+)\s+(?P<date>\S+)(?:\s.*)?$")
            .expect("valid record pattern");

    /// `<month>.<day>`, one or two digits each.
    static ref MONTH_DAY_REGEX: Regex =
        Regex::new(r"^(?P<month>\d{1,2})\.(?P<day>\d{1,2})$").expect("valid month.day pattern");
}

/// Number of days searched ahead for the next lunar occurrence; longer than
/// any lunar year.
const UPCOMING_SCAN_DAYS: usize = 390;

/// Number of years searched ahead for the next solar occurrence, enough to
/// reach a leap day.
const UPCOMING_SCAN_YEARS: i32 = 8;

impl Marker {
    /// Resolves a marker spelling, case-insensitively for the Latin ones.
    ///
    /// ```
    /// # use nongli::birthday::Marker;
    /// assert_eq!(Marker::from_alias("农历"), Some(Marker::Lunar));
    /// assert_eq!(Marker::from_alias("Solar"), Some(Marker::Solar));
    /// assert_eq!(Marker::from_alias("明天"), None);
    /// ```
    pub fn from_alias(s: &str) -> Option<Marker> {
        MARKER_ALIASES.get(s.to_lowercase().as_str()).copied()
    }
}

/// A parsed birthday record.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct BirthdayLine {
    pub label: String,
    pub marker: Marker,
    pub month: u32,
    pub day: u32,
}

/// Parses `<month>.<day>` into a pair of integers.
///
/// Only the shape is checked here; ranges are checked by [`parse_line`].
///
/// ```
/// # use nongli::birthday::parse_month_day;
/// assert_eq!(parse_month_day("12.28"), Some((12, 28)));
/// assert_eq!(parse_month_day("12-28"), None);
/// ```
pub fn parse_month_day(text: &str) -> Option<(u32, u32)> {
    let caps = MONTH_DAY_REGEX.captures(text)?;
    let month = caps["month"].parse().ok()?;
    let day = caps["day"].parse().ok()?;
    Some((month, day))
}

/// Parses a record line. Returns `None` if the line does not have the
/// `<label> <marker> <month>.<day>` shape, the marker is unknown, or the
/// month or day is out of range for its calendar.
///
/// ```
/// # use nongli::birthday::{parse_line, Marker};
/// let line = parse_line("妈妈 农历 12.28").unwrap();
/// assert_eq!(line.label, "妈妈");
/// assert_eq!((line.marker, line.month, line.day), (Marker::Lunar, 12, 28));
/// assert!(parse_line("妈妈 农历").is_none());
/// ```
pub fn parse_line(line: &str) -> Option<BirthdayLine> {
    let Some(caps) = LINE_REGEX.captures(line) else {
        debug!(line, "record does not match <label> <marker> <month>.<day>");
        return None;
    };
    let Some(marker) = Marker::from_alias(&caps["marker"]) else {
        debug!(line, marker = &caps["marker"], "unknown calendar marker");
        return None;
    };
    let Some((month, day)) = parse_month_day(&caps["date"]) else {
        debug!(line, "malformed month.day");
        return None;
    };
    let max_day = match marker {
        Marker::Lunar => 30,
        Marker::Solar => 31,
    };
    if !(1..=12).contains(&month) || !(1..=max_day).contains(&day) {
        debug!(line, month, day, "month or day out of range");
        return None;
    }
    Some(BirthdayLine {
        label: caps["label"].to_string(),
        marker,
        month,
        day,
    })
}

impl BirthdayLine {
    /// Returns the Gregorian date of this record in Gregorian `year`.
    ///
    /// A solar record is built directly and yields `None` for dates that
    /// do not exist that year (2.29 in a common year). A lunar record is
    /// looked up with [`lunar_to_solar_in_year`]; `None` when there is no
    /// such day in `year` or `year` is outside the lunar table.
    pub fn resolve_in_year(&self, year: i32) -> Option<NaiveDate> {
        match self.marker {
            Marker::Solar => NaiveDate::from_ymd_opt(year, self.month, self.day),
            Marker::Lunar => match lunar_to_solar_in_year(year, self.month, self.day) {
                Ok(date) => date,
                Err(e) => {
                    debug!(label = %self.label, error = %e, "lunar record not resolvable");
                    None
                }
            },
        }
    }

    /// Returns the first occurrence of this record on or after `today`.
    ///
    /// A lunar record is matched day by day over the following lunar year,
    /// so a lunar date occurring twice in one Gregorian year is found at
    /// its next occurrence, not its first.
    pub fn next_occurrence(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self.marker {
            Marker::Solar => (today.year()..=today.year() + UPCOMING_SCAN_YEARS)
                .filter_map(|y| NaiveDate::from_ymd_opt(y, self.month, self.day))
                .find(|date| *date >= today),
            Marker::Lunar => today
                .iter_days()
                .take(UPCOMING_SCAN_DAYS)
                .filter_map(|date| solar_to_lunar(date).ok().map(|lunar| (date, lunar)))
                .find(|(_, lunar)| lunar.month() == self.month && lunar.day() == self.day)
                .map(|(date, _)| date),
        }
    }

    /// Days from `today` to [`next_occurrence`](Self::next_occurrence); 0 on the day itself.
    pub fn days_until(&self, today: NaiveDate) -> Option<i64> {
        self.next_occurrence(today)
            .map(|date| date.signed_duration_since(today).num_days())
    }
}

/// Sorts records by their next occurrence after `today`, soonest first.
/// Records without an upcoming occurrence go last.
pub fn sort_by_upcoming(entries: &mut [BirthdayLine], today: NaiveDate) {
    entries.sort_by_cached_key(|entry| {
        let next = entry.next_occurrence(today);
        (next.is_none(), next)
    });
}

/// Parses a record and resolves it in Gregorian `year`.
///
/// ```
/// # use chrono::NaiveDate;
/// # use nongli::birthday::parse_and_resolve_birthday_line_in_year;
/// assert_eq!(
///     parse_and_resolve_birthday_line_in_year("妈妈 农历 12.28", 2025),
///     NaiveDate::from_ymd_opt(2025, 1, 27)
/// );
/// assert_eq!(
///     parse_and_resolve_birthday_line_in_year("爸爸 阳历 5.12", 2025),
///     NaiveDate::from_ymd_opt(2025, 5, 12)
/// );
/// ```
pub fn parse_and_resolve_birthday_line_in_year(line: &str, year: i32) -> Option<NaiveDate> {
    parse_line(line)?.resolve_in_year(year)
}

/// Parses a record and resolves it in the current local Gregorian year.
pub fn parse_and_resolve_birthday_line(line: &str) -> Option<NaiveDate> {
    parse_and_resolve_birthday_line_in_year(line, Local::now().year())
}
