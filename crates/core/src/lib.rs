//! Pure domain logic for the Parkwise booking backend.
//!
//! No I/O lives here: the crate defines the typed error taxonomy, the
//! booking status state machine, cost arithmetic, booking-code generation,
//! flexible timestamp normalization, and live slot-snapshot derivation.
//! The `parkwise-db` crate applies these rules inside transactions.

pub mod booking;
pub mod cost;
pub mod error;
pub mod snapshot;
pub mod timestamp;
pub mod types;
