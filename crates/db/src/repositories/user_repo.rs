//! Repository for the `users` table (admin surface).
//!
//! Deleting a user force-releases everything they hold in the same
//! transaction: occupied slots are cleared and active bookings cancelled
//! before the account row is removed. Booking history survives deletion.

use parkwise_core::error::CoreError;
use parkwise_core::types::DbId;
use sqlx::PgPool;

use crate::error::RepoError;
use crate::models::user::{CreateUser, User};
use crate::repositories::BookingRepo;

/// Column list for `users` queries.
const COLUMNS: &str = "id, full_name, email, phone, created_at";

/// Provides CRUD operations for user accounts.
pub struct UserRepo;

impl UserRepo {
    /// Create a user. Email uniqueness is enforced by `uq_users_email`.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, RepoError> {
        if input.full_name.trim().is_empty() {
            return Err(CoreError::Validation("full_name must not be empty".to_string()).into());
        }
        if input.email.trim().is_empty() {
            return Err(CoreError::Validation("email must not be empty".to_string()).into());
        }

        let query = format!(
            "INSERT INTO users (full_name, email, phone) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(input.full_name.trim())
            .bind(input.email.trim())
            .bind(&input.phone)
            .fetch_one(pool)
            .await
            .map_err(Into::into)
    }

    /// Find a user by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all users, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users ORDER BY created_at DESC");
        sqlx::query_as::<_, User>(&query).fetch_all(pool).await
    }

    /// Delete a user, force-releasing their slots and cancelling their
    /// active bookings in the same transaction.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<(), RepoError> {
        let mut tx = pool.begin().await?;

        BookingRepo::force_release_in_tx(&mut tx, id).await?;

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound {
                entity: "User",
                id,
            }
            .into());
        }

        tx.commit().await?;

        tracing::info!(user_id = id, "Deleted user");
        Ok(())
    }
}
