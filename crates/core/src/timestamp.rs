//! Flexible timestamp parsing and normalization.
//!
//! Clients submit booking times in several granularities: minute-precision
//! datetime-local strings (`2025-08-01T22:02`), full ISO-8601 with or
//! without a `Z`/offset marker, and space-separated SQL style. All inputs
//! are normalized to UTC truncated to whole seconds before any arithmetic,
//! so stored values compare consistently regardless of source format.

use chrono::{DateTime, NaiveDateTime, TimeZone, Timelike, Utc};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Accepted naive (offset-free) formats, tried in order.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Truncate a timestamp to whole seconds.
///
/// Sub-second precision varies by client and is meaningless for hourly
/// billing, so the canonical representation drops it.
pub fn truncate_to_seconds(ts: Timestamp) -> Timestamp {
    // with_nanosecond(0) only fails for out-of-range values, which 0 is not.
    ts.with_nanosecond(0).unwrap_or(ts)
}

/// Parse a client-supplied timestamp string into canonical UTC form.
///
/// Offset-carrying inputs (RFC 3339, trailing `Z`) are converted to UTC;
/// offset-free inputs are interpreted as already being UTC.
pub fn parse_flexible(input: &str) -> Result<Timestamp, CoreError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "timestamp must not be empty".to_string(),
        ));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(truncate_to_seconds(dt.with_timezone(&Utc)));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(truncate_to_seconds(Utc.from_utc_datetime(&naive)));
        }
    }

    Err(CoreError::Validation(format!(
        "Unrecognized timestamp format: '{trimmed}'"
    )))
}
