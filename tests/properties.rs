//! Whole-table properties of the conversions.

use chrono::{Datelike, NaiveDate};
use nongli::convert::{last_supported_date, lunar_to_solar, EPOCH};
use nongli::table::{
    leap_month_days, leap_month_index, ordinary_month_days, year_total_days, MAX_YEAR, MIN_YEAR,
};
use nongli::{lunar_to_solar_in_year, solar_to_lunar, CalendarError};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn supported_days() -> impl Iterator<Item = NaiveDate> {
    let last = last_supported_date().unwrap();
    EPOCH.iter_days().take_while(move |d| *d <= last)
}

#[test]
fn year_length_decomposes() {
    for year in MIN_YEAR..=MAX_YEAR {
        let long_months = (1..=12)
            .filter(|&m| ordinary_month_days(year, m).unwrap() == 30)
            .count() as u32;
        assert_eq!(
            29 * 12 + long_months + leap_month_days(year).unwrap(),
            year_total_days(year).unwrap(),
            "{year}"
        );
    }
}

#[test]
fn consecutive_days_increase() {
    let mut prev = solar_to_lunar(EPOCH).unwrap();
    for date in supported_days().skip(1) {
        let lunar = solar_to_lunar(date).unwrap();
        assert!(prev.key() < lunar.key(), "{date}: {:?} !< {:?}", prev.key(), lunar.key());
        if lunar.day() != 1 {
            assert_eq!(prev.day() + 1, lunar.day(), "{date}");
            assert_eq!((prev.year(), prev.month(), prev.is_leap()), (lunar.year(), lunar.month(), lunar.is_leap()));
        }
        prev = lunar;
    }
    assert_eq!((MAX_YEAR, 12), (prev.year(), prev.month()));
}

#[test]
fn direct_inverse_round_trips() {
    for date in supported_days() {
        let lunar = solar_to_lunar(date).unwrap();
        assert_eq!(
            Ok(date),
            lunar_to_solar(lunar.year(), lunar.month(), lunar.is_leap(), lunar.day()),
            "{date} {lunar}"
        );
    }
}

/// Checks that the reverse scan finds `date` from its lunar month and day,
/// or an earlier day of the same Gregorian year with the same labels.
fn assert_reverse_scan(date: NaiveDate) {
    let lunar = solar_to_lunar(date).unwrap();
    let found = lunar_to_solar_in_year(date.year(), lunar.month(), lunar.day())
        .unwrap()
        .unwrap();
    if found == date {
        return;
    }
    // an earlier day of the same Gregorian year carries the same month and
    // day, from the previous lunar year or from the leap occurrence
    assert!(found < date, "{date}: found {found}");
    let earlier = solar_to_lunar(found).unwrap();
    assert_eq!((lunar.month(), lunar.day()), (earlier.month(), earlier.day()), "{date}");
    assert!(earlier.is_leap() || earlier.year() != lunar.year(), "{date}: found {found}");
}

fn days_of(year: i32) -> impl Iterator<Item = NaiveDate> {
    ymd(year, 1, 1).iter_days().take_while(move |d| d.year() == year)
}

#[test]
fn reverse_scan_round_trips() {
    for year in MIN_YEAR + 1..=MAX_YEAR {
        for date in days_of(year).step_by(11) {
            assert_reverse_scan(date);
        }
    }
}

#[test]
fn reverse_scan_round_trips_in_leap_years() {
    for year in [2017, 2020, 2023, 2025] {
        assert_ne!(0, leap_month_index(year).unwrap(), "{year}");
        for date in days_of(year) {
            assert_reverse_scan(date);
        }
    }
}

#[test]
fn boundaries() {
    let first = solar_to_lunar(ymd(1900, 1, 31)).unwrap();
    assert_eq!((1900, 1, 1, false), (first.year(), first.month(), first.day(), first.is_leap()));

    let last = solar_to_lunar(ymd(2050, 1, 22)).unwrap();
    assert_eq!((2049, 12, 29, false), (last.year(), last.month(), last.day(), last.is_leap()));

    for date in [ymd(1900, 1, 30), ymd(2050, 1, 23), ymd(1, 1, 1), ymd(9999, 12, 31)] {
        assert_eq!(Err(CalendarError::DateOutOfRange { date }), solar_to_lunar(date));
    }
}

#[test]
fn festivals() {
    let new_year = solar_to_lunar(ymd(2025, 1, 29)).unwrap();
    assert_eq!(("正月", "初一"), (new_year.month_label(), new_year.day_label()));
    assert_eq!(Some("春节"), new_year.festival());

    let mid_autumn = solar_to_lunar(ymd(2025, 10, 6)).unwrap();
    assert_eq!(Some("中秋节"), mid_autumn.festival());

    let plain = solar_to_lunar(ymd(2025, 1, 30)).unwrap();
    assert_eq!(None, plain.festival());
}
