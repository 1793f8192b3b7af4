//! Repository error type.
//!
//! Domain rule violations (validation, ownership, slot conflicts) surface
//! as [`CoreError`]; anything the store itself reports stays a
//! [`sqlx::Error`] and is never swallowed or retried here. An error inside
//! a transaction rolls the whole transaction back, so partial writes are
//! never visible.

use parkwise_core::error::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Domain(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] sqlx::Error),
}
