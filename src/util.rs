// Utility helpers for parsing and rounding.
//
// This module centralizes the forgiving JSON/CSV field handling so the
// rest of the code can assume clean, typed values.
use crate::types::RawValue;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use num_format::{Locale, ToFormattedString};

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Read a raw value as a text field, trimming surrounding whitespace.
///
/// Numbers are rendered back to text so a CSV column that happens to look
/// numeric still yields a name.
pub fn text_field(v: Option<&RawValue>) -> Option<String> {
    let s = match v? {
        RawValue::Text(s) => s.trim().to_string(),
        RawValue::Int(i) => i.to_string(),
        RawValue::Float(f) => f.to_string(),
        RawValue::Other(_) => return None,
    };
    if s.is_empty() {
        return None;
    }
    Some(s)
}

/// Largest id a spreadsheet number cell holds exactly (2^53).
pub const MAX_TICKET_ID: u64 = 1 << 53;

/// Parse a ticket id: a positive integer given as a number or numeric text.
///
/// Floats are accepted only when they carry no fractional part (`7.0`).
/// Ids above [`MAX_TICKET_ID`] are refused.
pub fn parse_id_safe(v: Option<&RawValue>) -> Option<u64> {
    let id = match v? {
        RawValue::Int(i) => u64::try_from(*i).ok()?,
        RawValue::Float(f) => {
            if !f.is_finite() || f.fract() != 0.0 || *f < 1.0 || *f > u64::MAX as f64 {
                return None;
            }
            *f as u64
        }
        RawValue::Text(s) => {
            let s = s.trim();
            match s.parse::<u64>() {
                Ok(i) => i,
                Err(_) => return parse_id_safe(Some(&RawValue::Float(s.parse::<f64>().ok()?))),
            }
        }
        RawValue::Other(_) => return None,
    };
    (1..=MAX_TICKET_ID).contains(&id).then_some(id)
}

/// Parse a timestamp from text, or from epoch milliseconds when numeric.
pub fn parse_datetime_safe(v: Option<&RawValue>) -> Option<NaiveDateTime> {
    match v? {
        RawValue::Int(ms) => DateTime::from_timestamp_millis(*ms).map(|d| d.naive_utc()),
        RawValue::Float(ms) if ms.is_finite() => {
            DateTime::from_timestamp_millis(*ms as i64).map(|d| d.naive_utc())
        }
        RawValue::Float(_) => None,
        RawValue::Text(s) => parse_datetime_str(s),
        RawValue::Other(_) => None,
    }
}

fn parse_datetime_str(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    // Offsets are dropped: the sheet shows the wall-clock time that was sent.
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Average of integer scores in hundredths, rounded half-up.
///
/// Integer arithmetic keeps `x.xx5` from drifting below the midpoint.
pub fn average_hundredths(sum: u64, count: u64) -> u32 {
    if count == 0 {
        return 0;
    }
    ((200 * sum + count) / (2 * count)) as u32
}

pub fn format_hundredths(h: u32) -> String {
    format!("{}.{:02}", h / 100, h % 100)
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Thin wrapper around `num-format` for counts in console messages
    // (e.g., `1,250 tickets loaded`).
    n.to_formatted_string(&Locale::en)
}
