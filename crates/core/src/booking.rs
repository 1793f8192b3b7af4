//! Booking status state machine, booking-code generation, and input
//! validation shared by the repository layer.

use rand::Rng;
use serde::Serialize;

use crate::error::CoreError;

/// Prefix for externally visible booking codes.
pub const BOOKING_CODE_PREFIX: &str = "BK-";

/// Number of random characters after the prefix.
pub const BOOKING_CODE_RANDOM_LEN: usize = 8;

/// Alphabet for the random part of a booking code.
const BOOKING_CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Upper bound on a booking's planned duration: one year.
pub const MAX_PLANNED_DURATION_HOURS: f64 = 8760.0;

/// Lifecycle status of a booking.
///
/// `Active` is the sole initial state; `Completed` and `Cancelled` are
/// terminal. Stored as lowercase TEXT in the `bookings.status` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Active,
    Completed,
    Cancelled,
}

/// All valid status strings, for error messages.
const VALID_STATUS_STRINGS: &[&str] = &["active", "completed", "cancelled"];

impl BookingStatus {
    /// Return the status as the lowercase string stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parse a status from its stored string form.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(CoreError::Validation(format!(
                "Invalid booking status '{s}'. Must be one of: {}",
                VALID_STATUS_STRINGS.join(", ")
            ))),
        }
    }

    /// Whether no further transition may leave this status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Whether the transition `self -> next` is allowed.
    ///
    /// Only `Active -> Completed` (release) and `Active -> Cancelled`
    /// (forced user deletion) are legal.
    pub fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Active, Self::Completed) | (Self::Active, Self::Cancelled)
        )
    }
}

/// Generate a booking code of the form `BK-XXXXXXXX` (uppercase
/// alphanumerics). Uniqueness is enforced by the `uq_bookings_code`
/// constraint; a collision surfaces as a store conflict.
pub fn generate_booking_code() -> String {
    let mut rng = rand::rng();
    let mut code = String::with_capacity(BOOKING_CODE_PREFIX.len() + BOOKING_CODE_RANDOM_LEN);
    code.push_str(BOOKING_CODE_PREFIX);
    for _ in 0..BOOKING_CODE_RANDOM_LEN {
        let idx = rng.random_range(0..BOOKING_CODE_CHARSET.len());
        code.push(BOOKING_CODE_CHARSET[idx] as char);
    }
    code
}

/// Validate booking input before any store access.
///
/// The vehicle number must be non-blank and the planned duration strictly
/// positive, finite, and at most [`MAX_PLANNED_DURATION_HOURS`]. The upper
/// bound keeps the derived end time inside chrono's representable range.
pub fn validate_booking_input(
    vehicle_number: &str,
    planned_duration_hours: f64,
) -> Result<(), CoreError> {
    if vehicle_number.trim().is_empty() {
        return Err(CoreError::Validation(
            "vehicle_number must not be empty".to_string(),
        ));
    }
    if !planned_duration_hours.is_finite() || planned_duration_hours <= 0.0 {
        return Err(CoreError::Validation(format!(
            "duration must be a positive number of hours, got {planned_duration_hours}"
        )));
    }
    if planned_duration_hours > MAX_PLANNED_DURATION_HOURS {
        return Err(CoreError::Validation(format!(
            "duration must be at most {MAX_PLANNED_DURATION_HOURS} hours, \
             got {planned_duration_hours}"
        )));
    }
    Ok(())
}

/// Validate lot input for creation.
pub fn validate_lot_input(
    name: &str,
    address: &str,
    price_per_hour: f64,
    total_slots: i32,
) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation("name must not be empty".to_string()));
    }
    if address.trim().is_empty() {
        return Err(CoreError::Validation(
            "address must not be empty".to_string(),
        ));
    }
    if !price_per_hour.is_finite() || price_per_hour < 0.0 {
        return Err(CoreError::Validation(format!(
            "price_per_hour must be non-negative, got {price_per_hour}"
        )));
    }
    if total_slots <= 0 {
        return Err(CoreError::Validation(format!(
            "total_slots must be positive, got {total_slots}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn booking_code_has_expected_shape() {
        let code = generate_booking_code();
        assert_eq!(code.len(), BOOKING_CODE_PREFIX.len() + BOOKING_CODE_RANDOM_LEN);
        assert!(code.starts_with(BOOKING_CODE_PREFIX));
        assert!(code[BOOKING_CODE_PREFIX.len()..]
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            BookingStatus::Active,
            BookingStatus::Completed,
            BookingStatus::Cancelled,
        ] {
            assert_eq!(BookingStatus::from_str(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_string_is_rejected() {
        assert_matches!(
            BookingStatus::from_str("pending"),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn only_active_can_transition() {
        assert!(BookingStatus::Active.can_transition_to(BookingStatus::Completed));
        assert!(BookingStatus::Active.can_transition_to(BookingStatus::Cancelled));
        assert!(!BookingStatus::Completed.can_transition_to(BookingStatus::Active));
        assert!(!BookingStatus::Completed.can_transition_to(BookingStatus::Cancelled));
        assert!(!BookingStatus::Cancelled.can_transition_to(BookingStatus::Completed));
    }

    #[test]
    fn terminal_statuses() {
        assert!(!BookingStatus::Active.is_terminal());
        assert!(BookingStatus::Completed.is_terminal());
        assert!(BookingStatus::Cancelled.is_terminal());
    }

    #[test]
    fn empty_vehicle_number_fails_validation() {
        assert_matches!(
            validate_booking_input("", 2.0),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            validate_booking_input("   ", 2.0),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn non_positive_duration_fails_validation() {
        assert_matches!(
            validate_booking_input("KA01AB1234", 0.0),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            validate_booking_input("KA01AB1234", -1.5),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            validate_booking_input("KA01AB1234", f64::NAN),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn absurd_duration_fails_validation() {
        // Durations past the one-year cap would push the derived end time
        // out of chrono's representable range.
        assert_matches!(
            validate_booking_input("KA01AB1234", 1e12),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            validate_booking_input("KA01AB1234", MAX_PLANNED_DURATION_HOURS + 1.0),
            Err(CoreError::Validation(_))
        );
        validate_booking_input("KA01AB1234", MAX_PLANNED_DURATION_HOURS).unwrap();
    }

    #[test]
    fn valid_booking_input_passes() {
        validate_booking_input("KA01AB1234", 2.0).unwrap();
    }

    #[test]
    fn lot_input_validation() {
        validate_lot_input("Central", "1 Main St", 50.0, 20).unwrap();
        assert_matches!(
            validate_lot_input("", "1 Main St", 50.0, 20),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            validate_lot_input("Central", "1 Main St", -0.5, 20),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            validate_lot_input("Central", "1 Main St", 50.0, 0),
            Err(CoreError::Validation(_))
        );
    }
}
