//! Live slot-snapshot derivation for dashboards.
//!
//! For an occupied slot the current duration and running cost are derived
//! on every read from the booking start time and the captured hourly rate.
//! These values are never persisted. When the start time is missing or
//! unusable the snapshot degrades to the planned duration/cost instead of
//! failing the read, since snapshots are advisory.

use serde::Serialize;

use crate::cost::{self, round2};
use crate::types::Timestamp;

/// Derived state of an occupied slot at one instant.
#[derive(Debug, Clone, Serialize)]
pub struct SlotSnapshot {
    /// Hours elapsed since the booking started, rounded to 2 decimals.
    pub current_duration_hours: f64,
    /// Running cost at the captured hourly rate, rounded to 2 decimals.
    pub estimated_current_cost: f64,
    /// True when derived from planned values because the start time was
    /// unavailable.
    pub is_planned_fallback: bool,
}

/// Compute the snapshot for an occupied slot.
///
/// `start_time` is the occupant binding's booking start; `None` triggers
/// the planned-value fallback. Missing planned values fall back to zero.
pub fn current_snapshot(
    start_time: Option<Timestamp>,
    planned_duration_hours: Option<f64>,
    hourly_rate: f64,
    now: Timestamp,
) -> SlotSnapshot {
    match start_time {
        Some(start) => {
            let duration = cost::elapsed_hours(start, now);
            SlotSnapshot {
                current_duration_hours: round2(duration),
                estimated_current_cost: round2(cost::final_cost(duration, hourly_rate)),
                is_planned_fallback: false,
            }
        }
        None => {
            let planned = planned_duration_hours.unwrap_or(0.0);
            SlotSnapshot {
                current_duration_hours: round2(planned),
                estimated_current_cost: round2(cost::planned_cost(planned, hourly_rate)),
                is_planned_fallback: true,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn snapshot_derives_from_start_time() {
        let now = Utc::now();
        let start = now - Duration::minutes(90);
        let snap = current_snapshot(Some(start), Some(4.0), 40.0, now);
        assert_eq!(snap.current_duration_hours, 1.5);
        assert_eq!(snap.estimated_current_cost, 60.0);
        assert!(!snap.is_planned_fallback);
    }

    #[test]
    fn snapshot_falls_back_to_planned_values() {
        let now = Utc::now();
        let snap = current_snapshot(None, Some(2.0), 50.0, now);
        assert_eq!(snap.current_duration_hours, 2.0);
        assert_eq!(snap.estimated_current_cost, 100.0);
        assert!(snap.is_planned_fallback);
    }

    #[test]
    fn snapshot_fallback_without_planned_duration_is_zero() {
        let now = Utc::now();
        let snap = current_snapshot(None, None, 50.0, now);
        assert_eq!(snap.current_duration_hours, 0.0);
        assert_eq!(snap.estimated_current_cost, 0.0);
    }

    #[test]
    fn snapshot_clamps_future_start_time() {
        let now = Utc::now();
        let start = now + Duration::minutes(10);
        let snap = current_snapshot(Some(start), Some(1.0), 50.0, now);
        assert_eq!(snap.current_duration_hours, 0.0);
        assert_eq!(snap.estimated_current_cost, 0.0);
    }
}
