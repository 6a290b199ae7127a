use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DateError {
    #[error("No date found in '{0}'")]
    NotFound(String),

    #[error("Not a valid date: '{0}'")]
    Unparseable(String),

    #[error("Invalid date format: '{0}'")]
    InvalidFormat(String),
}

#[derive(Debug, Clone, Copy)]
enum FieldOrder {
    YearMonthDay,
    MonthDayYear,
    DayMonthYear,
    Compact,
}

struct DatePattern {
    regex: Regex,
    order: FieldOrder,
}

impl DatePattern {
    fn new(body: &str, order: FieldOrder) -> Self {
        // Digits may not run on either side of the date.
        let regex = Regex::new(&format!("(?:^|[^0-9])({})(?:[^0-9]|$)", body)).unwrap();
        Self { regex, order }
    }
}

// Priority order: the first pattern that matches anywhere wins.
static DATE_PATTERNS: Lazy<Vec<DatePattern>> = Lazy::new(|| {
    vec![
        // 2023-05-01, 2023/05/01
        DatePattern::new(r"[0-9]{4}[-/][0-9]{2}[-/][0-9]{2}", FieldOrder::YearMonthDay),
        // 05-01-2023, 05/01/2023
        DatePattern::new(r"[0-9]{2}[-/][0-9]{2}[-/][0-9]{4}", FieldOrder::MonthDayYear),
        // 1-5-23, 01/05/2023
        DatePattern::new(
            r"[0-9]{1,2}[-/][0-9]{1,2}[-/][0-9]{2,4}",
            FieldOrder::DayMonthYear,
        ),
        // 20230501
        DatePattern::new(r"[0-9]{8}", FieldOrder::Compact),
    ]
});

static SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-/]").unwrap());

/// Find the first date in `text` and rewrite it with `format` (strftime syntax).
///
/// Only the first occurrence is replaced. Text around the date is kept as is.
pub fn recognize_date(text: &str, format: &str) -> Result<String, DateError> {
    let (pattern, found) = DATE_PATTERNS
        .iter()
        .find_map(|p| p.regex.captures(text).and_then(|c| c.get(1)).map(|m| (p, m)))
        .ok_or_else(|| DateError::NotFound(text.to_string()))?;

    let date = parse_date(found.as_str(), pattern.order)?;
    let formatted = format_date(date, format)?;

    debug!(matched = found.as_str(), formatted = %formatted, "Recognized date");

    let mut result = String::with_capacity(text.len() + formatted.len());
    result.push_str(&text[..found.start()]);
    result.push_str(&formatted);
    result.push_str(&text[found.end()..]);
    Ok(result)
}

fn parse_date(matched: &str, order: FieldOrder) -> Result<NaiveDate, DateError> {
    let unparseable = || DateError::Unparseable(matched.to_string());

    let (year, month, day) = match order {
        FieldOrder::Compact => (&matched[0..4], &matched[4..6], &matched[6..8]),
        _ => {
            let fields: Vec<&str> = SEPARATOR.split(matched).collect();
            if fields.len() != 3 {
                return Err(unparseable());
            }
            match order {
                FieldOrder::YearMonthDay => (fields[0], fields[1], fields[2]),
                FieldOrder::MonthDayYear => (fields[2], fields[0], fields[1]),
                _ => (fields[2], fields[1], fields[0]),
            }
        }
    };

    let mut year: i32 = year.parse().map_err(|_| unparseable())?;
    let month: u32 = month.parse().map_err(|_| unparseable())?;
    let day: u32 = day.parse().map_err(|_| unparseable())?;

    // Two-digit years pivot the same way strptime's %y does.
    if matched_year_digits(matched, order) == 2 {
        year += if year < 69 { 2000 } else { 1900 };
    }

    // A field out of range for its slot is retried with day and month swapped,
    // so 13-05-2023 reads as 13 May and 5-13-2023 as 13 May.
    NaiveDate::from_ymd_opt(year, month, day)
        .or_else(|| NaiveDate::from_ymd_opt(year, day, month))
        .ok_or_else(unparseable)
}

fn matched_year_digits(matched: &str, order: FieldOrder) -> usize {
    match order {
        FieldOrder::Compact => 4,
        FieldOrder::YearMonthDay => SEPARATOR.split(matched).next().map_or(0, str::len),
        _ => SEPARATOR.split(matched).last().map_or(0, str::len),
    }
}

fn format_date(date: NaiveDate, format: &str) -> Result<String, DateError> {
    let invalid = || DateError::InvalidFormat(format.to_string());

    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(invalid());
    }

    // Time fields cannot be rendered from a bare date and fail here.
    let mut out = String::new();
    write!(out, "{}", date.format_with_items(StrftimeItems::new(format))).map_err(|_| invalid())?;
    Ok(out)
}
