//! Repository for the `user_sessions` table.

use sqlx::PgExecutor;

use bistro_core::types::DbId;

use crate::models::session::{NewSession, Session};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, refresh_token_hash, issued_at, expires_at, \
                        validated_at, is_revoked, created_at, updated_at";

/// Provides operations for refresh-token-backed sessions.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new live session, returning the created row.
    pub async fn create<'e, E>(exec: E, input: &NewSession) -> Result<Session, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO user_sessions (user_id, refresh_token_hash, issued_at, expires_at)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(input.user_id)
            .bind(&input.refresh_token_hash)
            .bind(input.issued_at)
            .bind(input.expires_at)
            .fetch_one(exec)
            .await
    }

    /// Atomically claim a live session for rotation: the guarded UPDATE
    /// revokes the row and stamps `validated_at` in one statement, so of two
    /// concurrent requests bearing the same refresh token exactly one
    /// observes the returned row and the other gets `None`.
    pub async fn claim_for_rotation<'e, E>(
        exec: E,
        refresh_token_hash: &str,
    ) -> Result<Option<Session>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "UPDATE user_sessions
             SET is_revoked = true, validated_at = NOW()
             WHERE refresh_token_hash = $1
               AND is_revoked = false
               AND expires_at > NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(refresh_token_hash)
            .fetch_optional(exec)
            .await
    }

    /// Revoke all live sessions for an account. Returns the count of
    /// revoked sessions.
    pub async fn revoke_all_for_user<'e, E>(exec: E, user_id: DbId) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            "UPDATE user_sessions SET is_revoked = true
             WHERE user_id = $1 AND is_revoked = false",
        )
        .bind(user_id)
        .execute(exec)
        .await?;
        Ok(result.rows_affected())
    }

    /// Number of live (not revoked, not expired) sessions for an account.
    pub async fn count_live_for_user<'e, E>(exec: E, user_id: DbId) -> Result<i64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM user_sessions
             WHERE user_id = $1 AND is_revoked = false AND expires_at > NOW()",
        )
        .bind(user_id)
        .fetch_one(exec)
        .await
    }

    /// Delete expired or revoked sessions. Returns the count of deleted
    /// rows. Maintenance sweep only.
    pub async fn cleanup_expired<'e, E>(exec: E) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result =
            sqlx::query("DELETE FROM user_sessions WHERE expires_at < NOW() OR is_revoked = true")
                .execute(exec)
                .await?;
        Ok(result.rows_affected())
    }
}
