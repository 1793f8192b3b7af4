//! Cost arithmetic for bookings.
//!
//! Planned cost is an estimate captured at booking time; final cost is
//! derived from real elapsed time at release, always using the hourly rate
//! captured when the booking was created (never the lot's current price).

use crate::types::Timestamp;

/// Seconds per hour (3600.0).
pub const SECS_PER_HOUR: f64 = 3600.0;

/// Milliseconds per hour, for fractional-hour duration computation.
const MILLIS_PER_HOUR: f64 = SECS_PER_HOUR * 1000.0;

/// Elapsed fractional hours between `start` and `now`, clamped at zero.
///
/// Clock skew can make `now` precede `start`; a negative duration must
/// never reach cost computation.
pub fn elapsed_hours(start: Timestamp, now: Timestamp) -> f64 {
    let millis = (now - start).num_milliseconds();
    if millis <= 0 {
        0.0
    } else {
        millis as f64 / MILLIS_PER_HOUR
    }
}

/// Estimated cost at booking time.
pub fn planned_cost(planned_duration_hours: f64, hourly_rate: f64) -> f64 {
    planned_duration_hours * hourly_rate
}

/// Final cost at release, from actual elapsed hours and the captured rate.
pub fn final_cost(actual_duration_hours: f64, hourly_rate: f64) -> f64 {
    actual_duration_hours * hourly_rate
}

/// Round a monetary or duration value to 2 decimal places for responses.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
