//! Timestamp, phone number and customer name formats
//!
//! The canonical timestamp form is `MM/dd/yyyy HH:mm` (24-hour, minute
//! precision). It is used by the text codec and the query boundary alike.

use chrono::{NaiveDateTime, Timelike};

/// Canonical `MM/dd/yyyy HH:mm` pattern
pub const TIMESTAMP_FORMAT: &str = "%m/%d/%Y %H:%M";

/// 12-hour form accepted from clients, e.g. `02/27/2026 8:56 am`
const CLIENT_TIMESTAMP_FORMAT: &str = "%m/%d/%Y %I:%M %p";

/// Render a timestamp in the canonical pattern
pub fn format_timestamp(value: &NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a timestamp written in the canonical pattern
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT).ok()
}

/// Parse a timestamp supplied by a client
///
/// Accepts the canonical 24-hour pattern and the 12-hour `am`/`pm` form.
pub fn parse_request_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    parse_timestamp(value).or_else(|| {
        NaiveDateTime::parse_from_str(&value.to_uppercase(), CLIENT_TIMESTAMP_FORMAT).ok()
    })
}

/// Drop anything finer than a minute
pub fn truncate_to_minute(value: NaiveDateTime) -> NaiveDateTime {
    value
        .with_second(0)
        .and_then(|v| v.with_nanosecond(0))
        .unwrap_or(value)
}

/// Check the `nnn-nnn-nnnn` phone number format
pub fn is_valid_phone_number(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 12
        && bytes.iter().enumerate().all(|(i, b)| match i {
            3 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Check that a customer name fits on the header line of a text bill
///
/// It must contain something other than whitespace and no line breaks.
pub fn is_valid_customer_name(value: &str) -> bool {
    !value.trim().is_empty() && !value.contains(['\n', '\r'])
}
