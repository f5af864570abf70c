//! Date parsing for inline `<date>` tags.

use chrono::NaiveDate;

use super::patterns::LONG_DATE;

/// Parse a date written as `27 April 2022`.
///
/// The day must have exactly two digits, the month must be a full English
/// month name (any case) and the year exactly four digits, separated by
/// single spaces with nothing around them. Anything else is `None`.
pub fn parse_long_date(raw: &str) -> Option<NaiveDate> {
    let caps = LONG_DATE.captures(raw)?;

    let day: u32 = caps[1].parse().ok()?;
    let month = month_to_number(&caps[2])?;
    let year: i32 = caps[3].parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

fn month_to_number(month: &str) -> Option<u32> {
    let number = match month.to_lowercase().as_str() {
        "january" => 1,
        "february" => 2,
        "march" => 3,
        "april" => 4,
        "may" => 5,
        "june" => 6,
        "july" => 7,
        "august" => 8,
        "september" => 9,
        "october" => 10,
        "november" => 11,
        "december" => 12,
        _ => return None,
    };
    Some(number)
}
