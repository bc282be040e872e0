//! Calendar-date helpers over the persisted `YYYY-MM-DD` representation.
//!
//! # Invariants
//! - Well-formed ISO dates compare chronologically under string ordering.
//! - A date is well-formed only when it matches the fixed-width pattern and
//!   names a real calendar day.

use chrono::{Datelike, Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

static ISO_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("valid iso date regex"));

/// Formats a calendar date as `YYYY-MM-DD`.
pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

/// Parses a strict `YYYY-MM-DD` string.
///
/// Returns `None` for padded, partial or impossible dates (`2025-02-30`).
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    if !ISO_DATE_RE.is_match(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, ISO_DATE_FORMAT).ok()
}

pub fn is_valid_iso_date(value: &str) -> bool {
    parse_iso_date(value).is_some()
}

/// Local calendar date of the host clock.
///
/// Only entry points (FFI, CLI) call this; engines take `today` explicitly.
pub fn today_local() -> NaiveDate {
    Local::now().date_naive()
}

/// Renders `YYYY-MM-DD` as `DD/MM/YYYY` for list display.
///
/// Input that does not have the ISO shape is returned unchanged.
pub fn format_exam_date_for_display(iso: &str) -> String {
    if !ISO_DATE_RE.is_match(iso) {
        return iso.to_string();
    }
    let mut parts = iso.split('-');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(year), Some(month), Some(day)) => format!("{day}/{month}/{year}"),
        _ => iso.to_string(),
    }
}

/// Short `d/m` label without zero padding, used by the calendar strip.
pub fn day_month_label(date: NaiveDate) -> String {
    format!("{}/{}", date.day(), date.month())
}

#[cfg(test)]
mod tests {
    use super::{
        day_month_label, format_exam_date_for_display, format_iso_date, is_valid_iso_date,
        parse_iso_date,
    };
    use chrono::NaiveDate;

    #[test]
    fn format_pads_month_and_day() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(format_iso_date(date), "2025-03-07");
    }

    #[test]
    fn parse_rejects_loose_and_impossible_dates() {
        assert!(parse_iso_date("2025-12-20").is_some());
        assert!(parse_iso_date("2025-2-01").is_none());
        assert!(parse_iso_date(" 2025-12-20").is_none());
        assert!(parse_iso_date("2025-02-30").is_none());
        assert!(!is_valid_iso_date(""));
        assert!(!is_valid_iso_date("tomorrow"));
    }

    #[test]
    fn display_format_swaps_to_day_first() {
        assert_eq!(format_exam_date_for_display("2025-12-20"), "20/12/2025");
        assert_eq!(format_exam_date_for_display("soon"), "soon");
    }

    #[test]
    fn day_month_label_is_unpadded() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        assert_eq!(day_month_label(date), "5/1");
    }
}
