use chrono::{NaiveDate, NaiveTime};
use starload_core::CellValue;

use super::{Fallback, Normalized};

/// Date substituted for values that cannot be parsed.
pub const SENTINEL_DATE: NaiveDate = match NaiveDate::from_ymd_opt(1900, 1, 1) {
    Some(date) => date,
    None => NaiveDate::MIN,
};

/// Accepted input layouts, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%B %Y %d", "%Y %B %d", "%Y/%m/%d"];

/// Parse a calendar date; anything else becomes [`SENTINEL_DATE`].
pub fn normalize_date(value: &CellValue) -> Normalized {
    if let CellValue::Date(date) = value {
        return Normalized::value(CellValue::Date(*date));
    }

    let parsed = value.as_str().map(str::trim).and_then(|text| {
        DATE_FORMATS
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
    });

    match parsed {
        Some(date) => Normalized::value(CellValue::Date(date)),
        None => Normalized::fallback(CellValue::Date(SENTINEL_DATE), Fallback::SentinelDate),
    }
}

/// Keep `HH:MM:SS` time-of-day strings.
pub fn normalize_timestamp(value: &CellValue) -> CellValue {
    match value.as_str() {
        Some(text) if NaiveTime::parse_from_str(text, "%H:%M:%S").is_ok() => {
            CellValue::text(text)
        }
        _ => CellValue::Null,
    }
}
