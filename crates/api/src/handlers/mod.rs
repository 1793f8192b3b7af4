//! Request handlers.
//!
//! Each submodule provides async handler functions for a single resource.
//! Handlers delegate to the corresponding repository in `parkwise_db` and
//! map errors via [`crate::error::AppError`].

pub mod bookings;
pub mod lots;
pub mod users;
