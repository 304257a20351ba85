//! Persistence layer for the auth core: sqlx models and repositories for
//! the `users`, `roles`, `verification_tokens`, and `user_sessions` tables.
//!
//! Repositories are stateless unit structs whose associated functions take
//! any [`sqlx::PgExecutor`], so callers can pass a pool for single
//! statements or a transaction handle where a flow needs atomicity.

pub mod models;
pub mod repositories;

/// Shared connection pool alias used across the workspace.
pub type DbPool = sqlx::PgPool;

/// Open a connection pool against the given PostgreSQL URL.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    sqlx::postgres::PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}
