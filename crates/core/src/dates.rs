//! Date and year normalisation for loosely formatted metadata values.
//!
//! Formats are strptime strings tried in order with chrono; the first one
//! that consumes the whole trimmed input and names a real calendar day wins.
//! Day formats produce `YYYY-MM-DD`, a bare four-digit year produces `YYYY`.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

/// Tried in order; the first full match wins.
const DATE_FORMATS: &[&str] = &[
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%y %H:%M:%S",
    "%d/%m/%Y",
    "%d/%m/%y",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d-%m-%Y",
    "%d-%m-%y",
];

/// Two-digit years at or below this map to the 2000s, the rest to the 1900s.
pub const TWO_DIGIT_PIVOT: u32 = 25;

static FOUR_DIGIT_YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(20\d{2})").unwrap());
static TWO_DIGIT_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(\d{2})\b").unwrap());

/// Expand a two-digit year using [`TWO_DIGIT_PIVOT`].
pub fn expand_two_digit_year(yy: u32) -> u32 {
    if yy <= TWO_DIGIT_PIVOT { 2000 + yy } else { 1900 + yy }
}

fn parse_with(format: &str, input: &str) -> Option<NaiveDate> {
    let date = NaiveDate::parse_from_str(input, format).ok()?;

    if format.contains("%y") {
        // chrono pivots `%y` at 69; re-pivot the century
        let yy = date.year().rem_euclid(100) as u32;
        return date.with_year(expand_two_digit_year(yy) as i32);
    }

    // `%Y` accepts short years, which belong to the `%y` formats
    (1000..=9999).contains(&date.year()).then_some(date)
}

fn bare_year(input: &str) -> Option<String> {
    (input.len() == 4 && input.bytes().all(|b| b.is_ascii_digit())).then(|| input.to_string())
}

/// Normalise a date-like string to `YYYY-MM-DD` or `YYYY`.
///
/// Falls back to [`extract_year`] when no pattern matches.
///
/// # Example
///
/// ```rust
/// use datacat_core::normalize_date;
///
/// assert_eq!(normalize_date("15/03/2023"), Some("2023-03-15".to_string()));
/// assert_eq!(normalize_date("2023"), Some("2023".to_string()));
/// assert_eq!(normalize_date("random text"), None);
/// ```
pub fn normalize_date(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| parse_with(format, trimmed))
        .map(|date| date.format("%Y-%m-%d").to_string())
        .or_else(|| bare_year(trimmed))
        .or_else(|| extract_year(trimmed))
}

/// Pull a year out of free text.
///
/// Prefers a `20xx` run anywhere in the text, then the first standalone
/// two-digit token expanded with the pivot rule.
pub fn extract_year(text: &str) -> Option<String> {
    if text.is_empty() {
        return None;
    }

    if let Some(m) = FOUR_DIGIT_YEAR.find(text) {
        return Some(m.as_str().to_string());
    }

    let caps = TWO_DIGIT_TOKEN.captures(text)?;
    let yy: u32 = caps.get(1)?.as_str().parse().ok()?;
    Some(expand_two_digit_year(yy).to_string())
}
