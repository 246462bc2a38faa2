//! Localized air date parsing.
//!
//! Episode blocks show dates like `الأربعاء 01 فبراير 2020`: an optional
//! weekday, the day, the Arabic month name and the year. Clients want
//! ISO-8601 timestamps.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

/// Year used when neither the date nor the entry carries one.
pub const FALLBACK_YEAR: &str = "1970";

const MONTHS: &[(&str, u32)] = &[
    ("يناير", 1),
    ("فبراير", 2),
    ("مارس", 3),
    ("أبريل", 4),
    ("ابريل", 4),
    ("إبريل", 4),
    ("مايو", 5),
    ("يونيو", 6),
    ("يوليو", 7),
    ("أغسطس", 8),
    ("اغسطس", 8),
    ("سبتمبر", 9),
    ("أكتوبر", 10),
    ("اكتوبر", 10),
    ("نوفمبر", 11),
    ("ديسمبر", 12),
];

static DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{1,2})\s+(\S+)\s+([0-9]{4})").expect("Invalid date pattern")
});

static YEAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{4}").expect("Invalid year pattern"));

fn month_number(name: &str) -> Option<u32> {
    MONTHS
        .iter()
        .find(|(month, _)| *month == name)
        .map(|(_, number)| *number)
}

fn iso_midnight(date: NaiveDate) -> String {
    date.format("%Y-%m-%dT00:00:00.000Z").to_string()
}

/// Parse a localized date into `YYYY-MM-DDT00:00:00.000Z`.
pub fn parse_localized_date(text: &str) -> Option<String> {
    let caps = DATE_PATTERN.captures(text)?;
    let day = caps[1].parse::<u32>().ok()?;
    let month = month_number(&caps[2])?;
    let year = caps[3].parse::<i32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day).map(iso_midnight)
}

/// Release timestamp for an episode.
///
/// Uses the parsed air date when possible, otherwise January 1st of the
/// entry's year.
pub fn release_date(aired: Option<&str>, year: Option<&str>) -> String {
    if let Some(date) = aired.and_then(parse_localized_date) {
        return date;
    }
    let year = year
        .and_then(|y| YEAR_PATTERN.find(y))
        .map(|m| m.as_str())
        .unwrap_or(FALLBACK_YEAR);
    format!("{year}-01-01T00:00:00.000Z")
}
