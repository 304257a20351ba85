//! Repository for the `users` table.

use sqlx::PgExecutor;

use bistro_core::types::DbId;

use crate::models::user::{Account, NewAccount};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, phone, password_hash, full_name, status, \
                        email_verified_at, created_at, updated_at";

/// Provides CRUD operations for accounts.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new account with status PENDING, returning the created row.
    ///
    /// A duplicate email or phone surfaces as a unique-constraint violation
    /// (`uq_users_email` / `uq_users_phone`).
    pub async fn create<'e, E>(exec: E, input: &NewAccount) -> Result<Account, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO users (email, phone, password_hash, full_name, status)
             VALUES ($1, $2, $3, $4, 'PENDING')
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Account>(&query)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.password_hash)
            .bind(&input.full_name)
            .fetch_one(exec)
            .await
    }

    /// Find an account by internal ID.
    pub async fn find_by_id<'e, E>(exec: E, id: DbId) -> Result<Option<Account>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, Account>(&query)
            .bind(id)
            .fetch_optional(exec)
            .await
    }

    /// Find an account by email (case-sensitive).
    pub async fn find_by_email<'e, E>(exec: E, email: &str) -> Result<Option<Account>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, Account>(&query)
            .bind(email)
            .fetch_optional(exec)
            .await
    }

    /// Fast existence pre-check by email. The unique constraint remains the
    /// final arbiter under concurrent registration.
    pub async fn exists_by_email<'e, E>(exec: E, email: &str) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(exec)
            .await
    }

    /// Fast existence pre-check by phone.
    pub async fn exists_by_phone<'e, E>(exec: E, phone: &str) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE phone = $1)")
            .bind(phone)
            .fetch_one(exec)
            .await
    }

    /// Activate a PENDING account, stamping `email_verified_at`.
    ///
    /// The status guard in the WHERE clause makes activation idempotent-safe
    /// under races: only one caller observes the updated row. Returns `None`
    /// when the account is missing or already ACTIVE.
    pub async fn activate<'e, E>(exec: E, id: DbId) -> Result<Option<Account>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "UPDATE users SET status = 'ACTIVE', email_verified_at = NOW()
             WHERE id = $1 AND status = 'PENDING'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Account>(&query)
            .bind(id)
            .fetch_optional(exec)
            .await
    }

    /// Replace an account's password hash. Returns `true` if the row was
    /// updated.
    pub async fn update_password<'e, E>(
        exec: E,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(exec)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
