//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async operations that
//! accept `&PgPool` as the first argument. Multi-row transitions (lot
//! creation, booking, release, forced release) run inside a single
//! transaction so partial writes are never visible.

pub mod booking_repo;
pub mod lot_repo;
pub mod slot_repo;
pub mod user_repo;

pub use booking_repo::BookingRepo;
pub use lot_repo::LotRepo;
pub use slot_repo::SlotRepo;
pub use user_repo::UserRepo;
