// ============================================================
// FIELD NORMALIZER
// ============================================================
// Canonical dates and amounts. Never fails: anything that cannot
// be interpreted is passed through unchanged.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::record::CANONICAL_DATE_FORMAT;

static COMPACT_DATE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})(\d{2})(\d{2})$").unwrap());

/// Year-first and year-last shapes, tried in order
static DATE_PATTERNS: Lazy<Vec<(Regex, DateOrder)>> = Lazy::new(|| {
    vec![
        (Regex::new(r"(\d{4})/(\d{1,2})/(\d{1,2})").unwrap(), DateOrder::YearFirst),
        (Regex::new(r"(\d{4})-(\d{1,2})-(\d{1,2})").unwrap(), DateOrder::YearFirst),
        (Regex::new(r"(\d{4})\.(\d{1,2})\.(\d{1,2})").unwrap(), DateOrder::YearFirst),
        (Regex::new(r"(\d{1,2})/(\d{1,2})/(\d{4})").unwrap(), DateOrder::YearLast),
    ]
});

static PLAIN_NUMBER_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(-?)(\d+)(\.\d+)?$").unwrap());

/// Fallback layouts for the generic parser
const GENERIC_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"];
const GENERIC_DATE_FORMATS: &[&str] = &["%B %d, %Y", "%b %d, %Y", "%b %d %Y", "%d %b %Y", "%d %B %Y"];

#[derive(Debug, Clone, Copy)]
enum DateOrder {
    YearFirst,
    YearLast,
}

/// Normalize a date string to `YYYY-MM-DD`.
///
/// Recognizes `YYYYMMDD`, `YYYY/M/D`, `YYYY-M-D`, `YYYY.M.D` and `M/D/YYYY`,
/// then a handful of generic layouts. Returns the trimmed input unchanged
/// when nothing yields a real calendar date.
pub fn standardize_date(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    parse_date(trimmed)
        .map(|date| date.format(CANONICAL_DATE_FORMAT).to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

/// Parse a date in any of the shapes `standardize_date` understands
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();

    if let Some(caps) = COMPACT_DATE_PATTERN.captures(trimmed) {
        if let Some(date) = ymd(&caps[1], &caps[2], &caps[3]) {
            return Some(date);
        }
    }

    for (pattern, order) in DATE_PATTERNS.iter() {
        let Some(caps) = pattern.captures(trimmed) else {
            continue;
        };
        let date = match order {
            DateOrder::YearFirst => ymd(&caps[1], &caps[2], &caps[3]),
            DateOrder::YearLast => ymd(&caps[3], &caps[1], &caps[2]),
        };
        if date.is_some() {
            return date;
        }
    }

    generic_parse(trimmed)
}

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

fn generic_parse(value: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.date_naive());
    }
    for format in GENERIC_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.date());
        }
    }
    GENERIC_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

/// Amount as an integer, keeping only its digits. `None` when no digit
/// is present or the value does not fit.
pub fn amount_digits(raw: &str) -> Option<u64> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Amount as written into machine-readable exports
pub fn export_amount(raw: &str) -> String {
    amount_digits(raw).map(|n| n.to_string()).unwrap_or_default()
}

/// Amount for display: thousands-grouped when numeric, `-` when empty,
/// the original text otherwise
pub fn format_amount(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return "-".to_string();
    }

    let compact: String = trimmed.chars().filter(|c| *c != ',').collect();
    match PLAIN_NUMBER_PATTERN.captures(&compact) {
        Some(caps) => {
            let sign = &caps[1];
            let integer = caps[2].trim_start_matches('0');
            let integer = if integer.is_empty() { "0" } else { integer };
            let fraction = caps.get(3).map(|m| m.as_str()).unwrap_or("");
            format!("{}{}{}", sign, group_thousands(integer), fraction)
        }
        None => trimmed.to_string(),
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
