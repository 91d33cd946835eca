//! Timestamp normalization for WHOIS date fields
//!
//! Registries disagree on date layouts, so values are parsed either strictly
//! against a configured `strftime` pattern or best-effort against a list of
//! layouts seen in the wild. Timezone information is dropped and the wall
//! clock time kept as written.

use crate::error::{Result, WhoisError};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use std::sync::LazyLock;

/// Format name reported when no free-form layout matches
pub const FREE_FORM: &str = "free-form";

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%z",
    "%Y-%m-%d %H:%M:%S%z",
    "%Y-%m-%d %H:%M:%S %z",
    "%Y-%m-%d %H:%M:%S%.f %z",
];

// Slash dates are month first; the day-first layouts only match once the
// first field is above 12.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y.%m.%d %H:%M:%S",
    "%d.%m.%Y %H:%M:%S",
    "%d-%b-%Y %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%b %d %H:%M:%S %Y",
    "%a %b %d %H:%M:%S %Y",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%d-%b-%Y",
    "%d-%B-%Y",
    "%d.%m.%Y",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
];

const WEEKDAYS: &[&str] = &[
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Time of day followed by an hour-only offset such as `+08`
static SHORT_OFFSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*\d{1,2}:\d{2}(?::\d{2}(?:\.\d+)?)?)\s*([+-]\d{2})$")
        .expect("valid short offset regex")
});

/// Parse a WHOIS date value, strictly when `format` is given.
///
/// Without a format every known layout is tried; a value none of them
/// accepts fails with `TimeParse` and [`FREE_FORM`] as the format.
pub fn parse_time(value: &str, format: Option<&str>) -> Result<Option<NaiveDateTime>> {
    match format {
        Some(format) => parse_strict(value, format).map(Some),
        None => parse_free_form(value).map(Some).ok_or_else(|| {
            WhoisError::time_parse(value.trim(), FREE_FORM, "no known date layout matched")
        }),
    }
}

/// Parse against an explicit `strftime` pattern; date-only patterns map to midnight
pub fn parse_strict(value: &str, format: &str) -> Result<NaiveDateTime> {
    let value = value.trim();

    let error = match NaiveDateTime::parse_from_str(value, format) {
        Ok(parsed) => return Ok(parsed),
        Err(e) => e,
    };
    if let Ok(date) = NaiveDate::parse_from_str(value, format) {
        return Ok(date.and_time(NaiveTime::MIN));
    }
    if let Ok(parsed) = DateTime::parse_from_str(value, format) {
        return Ok(parsed.naive_local());
    }

    Err(WhoisError::time_parse(value, format, error.to_string()))
}

/// Best-effort parse of a date in any commonly used registry layout
pub fn parse_free_form(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    try_layouts(value)
        .or_else(|| expand_short_offset(value).and_then(|expanded| try_layouts(&expanded)))
        .or_else(|| strip_zone_name(value).and_then(try_layouts))
        .or_else(|| strip_weekday(value).and_then(parse_free_form))
}

/// `2020-01-15 10:00:00+08` -> `2020-01-15 10:00:00+0800`
fn expand_short_offset(value: &str) -> Option<String> {
    let caps = SHORT_OFFSET.captures(value)?;
    Some(format!("{}{}00", &caps[1], &caps[2]))
}

/// Drop a trailing zone name: `... UTC`, `... CST`, `... (UTC+8)`
fn strip_zone_name(value: &str) -> Option<&str> {
    let (head, tail) = value.rsplit_once(char::is_whitespace)?;
    let is_zone_name = tail.starts_with('(') || tail.chars().all(|c| c.is_ascii_alphabetic());
    is_zone_name.then(|| head.trim_end())
}

/// Drop a leading weekday, which is not checked against the date
fn strip_weekday(value: &str) -> Option<&str> {
    let (head, tail) = value.split_once(char::is_whitespace)?;
    let name = head.trim_end_matches(',').to_lowercase();
    let is_weekday = name.len() >= 3
        && WEEKDAYS.iter().any(|day| *day == name || day[..3] == name);
    is_weekday.then(|| tail.trim_start())
}

fn try_layouts(value: &str) -> Option<NaiveDateTime> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.naive_local());
    }
    if let Ok(parsed) = DateTime::parse_from_rfc2822(value) {
        return Some(parsed.naive_local());
    }

    OFFSET_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(value, format).ok())
        .map(|parsed| parsed.naive_local())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        })
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}
