//! Lenient date parsing for free-text sheet cells.
//!
//! Cells are typed by hand or by a form, so a date is tried against an ordered
//! list of strategies and the first one that yields a valid calendar date wins.
//! Nothing here returns an error: an unparseable cell is simply `None`.

use chrono::{DateTime, Datelike, Month, NaiveDate, NaiveDateTime};
use tracing::trace;

/// Positional numeric date pattern such as `M/d/yyyy`.
#[derive(Debug, Clone, Copy)]
pub struct DatePattern {
    /// Human-readable pattern name
    pub label: &'static str,
    /// chrono format string used once the shape check passes
    pub format: &'static str,
    separator: char,
    year_first: bool,
    /// Day and month must be two digits
    padded: bool,
}

impl DatePattern {
    const fn new(
        label: &'static str,
        format: &'static str,
        separator: char,
        year_first: bool,
        padded: bool,
    ) -> Self {
        Self {
            label,
            format,
            separator,
            year_first,
            padded,
        }
    }

    /// Parse `raw` if its shape matches this pattern exactly.
    pub fn parse(&self, raw: &str) -> Option<NaiveDate> {
        let parts: Vec<&str> = raw.split(self.separator).collect();
        if parts.len() != 3 || !parts.iter().all(|p| p.chars().all(|c| c.is_ascii_digit())) {
            return None;
        }

        let (year, rest) = if self.year_first {
            (parts[0], [parts[1], parts[2]])
        } else {
            (parts[2], [parts[0], parts[1]])
        };
        if year.len() != 4 {
            return None;
        }
        let width_ok = |token: &str| {
            if self.padded {
                token.len() == 2
            } else {
                (1..=2).contains(&token.len())
            }
        };
        if !rest.iter().all(|token| width_ok(token)) {
            return None;
        }

        NaiveDate::parse_from_str(raw, self.format).ok()
    }
}

/// Deadline patterns, in the order they are tried.
pub const DATE_PATTERNS: [DatePattern; 7] = [
    DatePattern::new("M/d/yyyy", "%m/%d/%Y", '/', false, false),
    DatePattern::new("MM/dd/yyyy", "%m/%d/%Y", '/', false, true),
    DatePattern::new("d/M/yyyy", "%d/%m/%Y", '/', false, false),
    DatePattern::new("yyyy/MM/dd", "%Y/%m/%d", '/', true, true),
    DatePattern::new("yyyy-MM-dd", "%Y-%m-%d", '-', true, true),
    DatePattern::new("dd-MM-yyyy", "%d-%m-%Y", '-', false, true),
    DatePattern::new("dd.MM.yyyy", "%d.%m.%Y", '.', false, true),
];

const GENERIC_DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const GENERIC_DATE_FORMATS: [&str; 6] = [
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
];

/// Parse a date cell: positional patterns first, then free-form fallbacks.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    DATE_PATTERNS
        .iter()
        .find_map(|pattern| {
            let date = pattern.parse(raw)?;
            trace!(raw, pattern = pattern.label, "date matched");
            Some(date)
        })
        .or_else(|| parse_generic(raw))
}

/// Free-form parse used after every positional pattern has failed.
pub fn parse_generic(raw: &str) -> Option<NaiveDate> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.date_naive());
    }
    if let Ok(parsed) = DateTime::parse_from_rfc2822(raw) {
        return Some(parsed.date_naive());
    }
    GENERIC_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|parsed| parsed.date())
        .or_else(|| {
            GENERIC_DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        })
}

/// Long English month name of a date.
pub fn month_name(date: NaiveDate) -> &'static str {
    Month::try_from(date.month() as u8)
        .map(|month| month.name())
        .unwrap_or("January")
}

/// Short US form used for dates tasksheet writes itself (`5/1/2024`).
pub fn format_sheet_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.month(), date.day(), date.year())
}
