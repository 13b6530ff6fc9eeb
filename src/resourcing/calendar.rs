//! Week keys, quarter codes and day keys.

use chrono::{Datelike, Days, NaiveDate};

/// ISO-8601 week key (`2025-W45`) for the Monday-to-Sunday week containing
/// `date`.
///
/// The week's Thursday decides the year, so 2024-12-30 is `2025-W01` and
/// 2021-01-03 is `2020-W53`. Zero padding keeps keys of the same year in
/// lexicographic order.
pub fn week_key(date: NaiveDate) -> String {
    let week = date.iso_week();
    format!("{}-W{:02}", week.year(), week.week())
}

/// Split a week key into ISO year and week number. Returns `None` for anything
/// that is not a valid `YYYY-Www` key.
pub fn parse_week_key(key: &str) -> Option<(i32, u32)> {
    let (year, week) = key.trim().split_once("-W")?;
    let year: i32 = year.parse().ok()?;
    let week: u32 = week.parse().ok()?;
    NaiveDate::from_isoywd_opt(year, week, chrono::Weekday::Mon)?;
    Some((year, week))
}

/// The Monday a week key starts on.
pub fn week_start(key: &str) -> Option<NaiveDate> {
    let (year, week) = parse_week_key(key)?;
    NaiveDate::from_isoywd_opt(year, week, chrono::Weekday::Mon)
}

/// Quarter code for a date: `Q` + quarter number + two-digit year, so
/// 2025-11-03 is `Q425`.
pub fn quarter_code(date: NaiveDate) -> String {
    let quarter = (date.month0() / 3) + 1;
    format!("Q{}{:02}", quarter, date.year().rem_euclid(100))
}

/// `YYYY-MM-DD` key used by the daily logs.
pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn previous_day(date: NaiveDate) -> NaiveDate {
    date.checked_sub_days(Days::new(1)).unwrap_or(date)
}

pub fn parse_day(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}
