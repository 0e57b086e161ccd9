//! Supported date/time formats for query classification.
//!
//! The set of accepted formats is a fixed enumerated list: day precision
//! (`02.03.2001`) plus optional time suffixes down to seconds. A word is a
//! date parameter only if it parses under one of these formats exactly.

use chrono::{NaiveDate, NaiveDateTime};

/// Date/time formats accepted by the query parser, most specific first.
pub const SUPPORTED_FORMATS: &[&str] = &["%d.%m.%Y %H:%M:%S", "%d.%m.%Y %H:%M"];

/// Date-only format accepted by the query parser.
pub const SUPPORTED_DATE_FORMAT: &str = "%d.%m.%Y";

/// Backend-side format list matching [`SUPPORTED_FORMATS`] and
/// [`SUPPORTED_DATE_FORMAT`], in the engine's date-format syntax. Attached to
/// generated date clauses so the engine parses bounds the same way the query
/// parser does.
pub const BACKEND_DATE_FORMATS: &str = "dd.MM.yyyy HH:mm:ss||dd.MM.yyyy HH:mm||dd.MM.yyyy";

/// Try to parse a word as a date/time under one of the supported formats.
///
/// A date-only word is taken at midnight. Returns `None` when the word does
/// not match any supported format.
pub fn parse_date_time(word: &str) -> Option<NaiveDateTime> {
    for format in SUPPORTED_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(word, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(word, SUPPORTED_DATE_FORMAT)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Try to parse a word as a date-only value (no time component allowed).
pub fn parse_date(word: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(word, SUPPORTED_DATE_FORMAT).ok()
}

/// Check whether a word parses under any supported date/time format.
pub fn can_parse(word: &str) -> bool {
    parse_date_time(word).is_some()
}

/// Render a date/time value in the day-precision supported format when it
/// falls on midnight, or the full format otherwise.
pub fn format_date_time(value: &NaiveDateTime) -> String {
    if value.time() == chrono::NaiveTime::MIN {
        value.format(SUPPORTED_DATE_FORMAT).to_string()
    } else {
        value.format(SUPPORTED_FORMATS[0]).to_string()
    }
}
