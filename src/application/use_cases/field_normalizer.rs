// ============================================================
// FIELD NORMALIZERS
// ============================================================
// Per-field canonicalisation. Every function returns `None` when the value
// is absent or cannot be normalized; nothing here raises an error.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::record::CellValue;

/// Fewer digits than this is not a usable phone number
pub const MIN_CONTACT_DIGITS: usize = 6;

static NON_NAME_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z\s]").unwrap());

static DIGITS_ONLY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[+-]?\d+$").unwrap());

/// Digit-only values shorter than this are never read as epoch timestamps
const MIN_EPOCH_DIGITS: usize = 9;

/// Length of a compact `YYYYMMDD` value
const COMPACT_DATE_DIGITS: usize = 8;

/// Datetime layouts without zone, read as UTC
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%y %H:%M:%S",
    "%m/%d/%y %H:%M",
    "%m/%d/%y %I:%M %p",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
];

/// Datetime layouts carrying an offset, converted to UTC
const ZONED_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S %z",
    "%Y-%m-%d %H:%M:%S%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%z",
];

/// Calendar-date layouts. Slash dates without a leading year are read
/// month-first.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%m/%d/%y",
    "%m-%d-%y",
    "%d.%m.%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%d-%b-%Y",
    "%a, %d %b %Y",
    "%A, %B %d, %Y",
];

/// Normalize a date to `YYYY-MM-DD` (UTC, time of day dropped).
///
/// Digit-only values (text or integral numbers) of exactly 8 digits are
/// tried as `YYYYMMDD` first. Otherwise they need at least 9 digits to be
/// read as an epoch timestamp: text is seconds up to 10 digits and
/// milliseconds beyond, numbers are always milliseconds. Shorter digit runs,
/// such as a bare year, are not dates.
pub fn normalize_date(value: Option<&CellValue>) -> Option<String> {
    let date = match value? {
        CellValue::Number(n) => parse_date_number(*n),
        CellValue::Text(text) => parse_date_text(text.trim()),
    }?;

    // Keep the output inside the 4-digit-year pattern
    if !(1..=9999).contains(&date.year()) {
        return None;
    }

    Some(date.format("%Y-%m-%d").to_string())
}

fn parse_date_number(n: f64) -> Option<NaiveDate> {
    if !n.is_finite() || n.abs() >= i64::MAX as f64 {
        return None;
    }

    let whole = n.trunc() as i64;
    let digits = whole.unsigned_abs().to_string();

    if whole > 0 && n.fract() == 0.0 && digits.len() == COMPACT_DATE_DIGITS {
        if let Some(date) = parse_compact_date(&digits) {
            return Some(date);
        }
    }

    if digits.len() < MIN_EPOCH_DIGITS {
        return None;
    }

    DateTime::<Utc>::from_timestamp_millis(whole).map(|dt| dt.date_naive())
}

fn parse_compact_date(digits: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(digits, "%Y%m%d").ok()
}

fn parse_date_text(text: &str) -> Option<NaiveDate> {
    if text.is_empty() {
        return None;
    }

    if DIGITS_ONLY.is_match(text) {
        let digits = text.trim_start_matches(['+', '-']);
        if digits.len() == COMPACT_DATE_DIGITS && !text.starts_with('-') {
            if let Some(date) = parse_compact_date(digits) {
                return Some(date);
            }
        }

        if digits.len() < MIN_EPOCH_DIGITS {
            return None;
        }

        let number: i64 = text.parse().ok()?;
        let dt = if digits.len() <= 10 {
            DateTime::<Utc>::from_timestamp(number, 0)
        } else {
            DateTime::<Utc>::from_timestamp_millis(number)
        };
        return dt.map(|dt| dt.date_naive());
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }

    for format in ZONED_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(text, format) {
            if keeps_full_year(text, format, dt.year()) {
                return Some(dt.with_timezone(&Utc).date_naive());
            }
        }
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            if keeps_full_year(text, format, dt.year()) {
                return Some(dt.date());
            }
        }
    }

    DATE_FORMATS.iter().find_map(|format| {
        NaiveDate::parse_from_str(text, format)
            .ok()
            .filter(|date| keeps_full_year(text, format, date.year()))
    })
}

/// `%Y` also accepts one- and two-digit years, so "01/05/20" would parse as
/// year 1 under `%Y/%m/%d`. A `%Y` layout only counts when the text carries
/// the parsed year as four digits.
fn keeps_full_year(text: &str, format: &str, year: i32) -> bool {
    !format.contains("%Y") || text.contains(&format!("{:04}", year))
}

/// Normalize a person's name: ASCII letters and whitespace only, title-cased
/// tokens joined by single spaces. Non-text values yield `None`.
pub fn normalize_name(value: Option<&CellValue>) -> Option<String> {
    let text = value?.as_text()?;
    let letters = NON_NAME_CHARS.replace_all(text, "");

    let tokens: Vec<String> = letters.split_whitespace().map(title_case).collect();
    if tokens.is_empty() {
        return None;
    }

    Some(tokens.join(" "))
}

fn title_case(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => {
            let mut out = String::with_capacity(token.len());
            out.push(first.to_ascii_uppercase());
            out.push_str(&chars.as_str().to_ascii_lowercase());
            out
        }
        None => String::new(),
    }
}

/// Normalize a phone number to its digits, in original order. No
/// reformatting and no country-code handling.
pub fn normalize_contact(value: Option<&CellValue>) -> Option<String> {
    let text = value?.to_display_string();
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() < MIN_CONTACT_DIGITS {
        return None;
    }

    Some(digits)
}

/// Addresses pass through untouched
pub fn normalize_address(value: Option<&CellValue>) -> Option<CellValue> {
    value.cloned()
}
