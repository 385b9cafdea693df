//! fmt.rs
//!
//! Month, day and festival labels of the lunar calendar.
//!
//! Labels are plain lookups into fixed tables; festivals are matched on the
//! concatenated month and day labels (e.g. `"正月" + "初一"` is 春节).

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Month labels, index `month - 1`. The 11th and 12th months are 冬月 and 腊月.
pub const MONTH_LABELS: [&str; 12] = [
    "正月", "二月", "三月", "四月", "五月", "六月", "七月", "八月", "九月", "十月", "冬月", "腊月",
];

/// Day labels, index `day - 1`.
pub const DAY_LABELS: [&str; 30] = [
    "初一", "初二", "初三", "初四", "初五", "初六", "初七", "初八", "初九", "初十",
    "十一", "十二", "十三", "十四", "十五", "十六", "十七", "十八", "十九", "二十",
    "廿一", "廿二", "廿三", "廿四", "廿五", "廿六", "廿七", "廿八", "廿九", "三十",
];

/// Prefix of a leap month's name.
pub const LEAP_PREFIX: &str = "闰";

/// Traditional festivals keyed by `month label + day label`.
static FESTIVALS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("正月初一", "春节");
    m.insert("正月十五", "元宵节");
    m.insert("五月初五", "端午节");
    m.insert("七月初七", "七夕节");
    m.insert("八月十五", "中秋节");
    m.insert("九月初九", "重阳节");
    // only reached when the 12th month has 30 days
    m.insert("腊月三十", "除夕");
    m
});

/// Returns the label of `month` (1..=12), or `None` outside that range.
///
/// ```
/// # use nongli::fmt::month_label;
/// assert_eq!(month_label(1), Some("正月"));
/// assert_eq!(month_label(11), Some("冬月"));
/// assert_eq!(month_label(13), None);
/// ```
pub fn month_label(month: u32) -> Option<&'static str> {
    let idx = month.checked_sub(1)? as usize;
    MONTH_LABELS.get(idx).copied()
}

/// Returns the label of `day` (1..=30), or `None` outside that range.
///
/// ```
/// # use nongli::fmt::day_label;
/// assert_eq!(day_label(10), Some("初十"));
/// assert_eq!(day_label(25), Some("廿五"));
/// assert_eq!(day_label(0), None);
/// ```
pub fn day_label(day: u32) -> Option<&'static str> {
    let idx = day.checked_sub(1)? as usize;
    DAY_LABELS.get(idx).copied()
}

/// Looks up the festival whose key is exactly `month_label` followed by
/// `day_label`.
///
/// Only labels take part in the match, so the leap occurrence of a month
/// matches the same festivals as its ordinary namesake.
///
/// ```
/// # use nongli::fmt::festival;
/// assert_eq!(festival("八月", "十五"), Some("中秋节"));
/// assert_eq!(festival("八月", "十六"), None);
/// ```
pub fn festival(month_label: &str, day_label: &str) -> Option<&'static str> {
    let key = format!("{}{}", month_label, day_label);
    FESTIVALS.get(key.as_str()).copied()
}
