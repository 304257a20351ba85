//! Repository for the `verification_tokens` table.

use sqlx::PgExecutor;

use bistro_core::types::DbId;

use crate::models::verification_token::{NewVerificationToken, VerificationToken};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, token, user_id, created_at, expires_at";

/// Provides operations for verification tickets.
pub struct VerificationTokenRepo;

impl VerificationTokenRepo {
    /// Insert a freshly issued ticket, returning the created row.
    pub async fn create<'e, E>(
        exec: E,
        input: &NewVerificationToken,
    ) -> Result<VerificationToken, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO verification_tokens (token, user_id, expires_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, VerificationToken>(&query)
            .bind(&input.token)
            .bind(input.user_id)
            .bind(input.expires_at)
            .fetch_one(exec)
            .await
    }

    /// Atomically claim an unexpired ticket: compare-and-delete in a single
    /// statement so two concurrent consumers can never both succeed.
    ///
    /// Returns the deleted row, or `None` when the token does not exist or
    /// is past its expiry. Expired rows are NOT deleted here; they are left
    /// for [`Self::cleanup_expired`].
    pub async fn claim<'e, E>(exec: E, token: &str) -> Result<Option<VerificationToken>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "DELETE FROM verification_tokens
             WHERE token = $1 AND expires_at > NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, VerificationToken>(&query)
            .bind(token)
            .fetch_optional(exec)
            .await
    }

    /// Diagnostic lookup used after a failed claim to distinguish an
    /// expired ticket from one that never existed.
    pub async fn find_by_token<'e, E>(
        exec: E,
        token: &str,
    ) -> Result<Option<VerificationToken>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM verification_tokens WHERE token = $1");
        sqlx::query_as::<_, VerificationToken>(&query)
            .bind(token)
            .fetch_optional(exec)
            .await
    }

    /// Number of live (unexpired) tickets held by an account.
    pub async fn count_live_for_user<'e, E>(exec: E, user_id: DbId) -> Result<i64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM verification_tokens
             WHERE user_id = $1 AND expires_at > NOW()",
        )
        .bind(user_id)
        .fetch_one(exec)
        .await
    }

    /// Delete expired tickets. Returns the count of deleted rows. Called by
    /// a maintenance sweep, never by the core flows.
    pub async fn cleanup_expired<'e, E>(exec: E) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM verification_tokens WHERE expires_at < NOW()")
            .execute(exec)
            .await?;
        Ok(result.rows_affected())
    }
}
