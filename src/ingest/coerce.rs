use chrono::{DateTime, NaiveDate, NaiveDateTime};
use thiserror::Error;

/// Why a single field could not be used by the aggregations.
///
/// Never surfaced to the caller: the row carrying the field is left out of
/// every sum that needs it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoercionError {
    #[error("field {0} is missing")]
    Missing(&'static str),

    #[error("field {field} has invalid value {value:?}")]
    Invalid { field: &'static str, value: String },
}

const DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const OFFSET_DATE_TIME_FORMATS: [&str; 2] =
    ["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%d %H:%M%#z"];

// Spreadsheet exports, e.g. "January 5, 2025, 3:04 PM"
const LONG_DATE_TIME_FORMATS: [&str; 2] =
    ["%B %d, %Y, %I:%M %p", "%B %d, %Y, %I:%M:%S %p"];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%B %d, %Y"];

/// Parses a USD amount. Accepts an optional leading `$` and `,` thousands
/// separators; negative and non-finite amounts are rejected.
pub fn parse_amount(
    field: &'static str,
    value: Option<&str>,
) -> Result<f64, CoercionError> {
    let raw = value.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(CoercionError::Missing(field));
    }

    let cleaned = raw.strip_prefix('$').unwrap_or(raw).replace(',', "");
    let invalid = || CoercionError::Invalid {
        field,
        value: raw.to_owned(),
    };

    let amount = cleaned.trim().parse::<f64>().map_err(|_| invalid())?;
    if !amount.is_finite() || amount < 0.0 {
        return Err(invalid());
    }

    Ok(amount)
}

/// Parses a timestamp keeping the wall-clock time as written. Offsets are
/// accepted but no time-zone conversion is applied, so the calendar date is
/// the one in the file.
pub fn parse_timestamp(
    field: &'static str,
    value: Option<&str>,
) -> Result<NaiveDateTime, CoercionError> {
    let raw = value.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(CoercionError::Missing(field));
    }

    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(at.naive_local());
    }

    let naive = raw.strip_suffix('Z').unwrap_or(raw);

    for format in DATE_TIME_FORMATS.iter().chain(LONG_DATE_TIME_FORMATS.iter())
    {
        if let Ok(at) = NaiveDateTime::parse_from_str(naive, format) {
            return Ok(at);
        }
    }

    for format in OFFSET_DATE_TIME_FORMATS {
        if let Ok(at) = DateTime::parse_from_str(raw, format) {
            return Ok(at.naive_local());
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(naive, format) {
            if let Some(at) = date.and_hms_opt(0, 0, 0) {
                return Ok(at);
            }
        }
    }

    Err(CoercionError::Invalid {
        field,
        value: raw.to_owned(),
    })
}
