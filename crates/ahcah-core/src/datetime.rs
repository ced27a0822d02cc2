//! Export date handling.
//!
//! The tracking system prints every date column as `Apr/19/2023 12:00 AM`,
//! a calendar date wearing a fixed midnight suffix. The newer export
//! variant adds a real timestamp on its `created` column. Values parse
//! strictly against these shapes and are written back in ISO form; the
//! fixed suffix is part of the format string, so a date with an actual
//! time of day is rejected rather than silently truncated.

use chrono::{NaiveDate, NaiveDateTime, ParseError};

/// Date columns as exported: abbreviated month, literal midnight.
pub const EXPORT_DATE_FORMAT: &str = "%b/%d/%Y 12:00 AM";

/// The `created` column of the newer export variant: a true 12-hour
/// timestamp.
pub const EXPORT_DATETIME_FORMAT: &str = "%b/%d/%Y %I:%M %p";

/// ISO forms the standardized tables carry.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";
pub const ISO_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parses one date cell (`Jan/05/2023 12:00 AM`).
pub fn parse_export_date(value: &str) -> Result<NaiveDate, ParseError> {
    NaiveDate::parse_from_str(value.trim(), EXPORT_DATE_FORMAT)
}

/// Parses one `created` cell (`Apr/19/2023 1:50 PM`).
pub fn parse_export_datetime(value: &str) -> Result<NaiveDateTime, ParseError> {
    NaiveDateTime::parse_from_str(value.trim(), EXPORT_DATETIME_FORMAT)
}

/// ISO date text (`2023-01-05`).
pub fn iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

/// ISO datetime text (`2023-04-19 13:50:00`).
pub fn iso_datetime(datetime: NaiveDateTime) -> String {
    datetime.format(ISO_DATETIME_FORMAT).to_string()
}
