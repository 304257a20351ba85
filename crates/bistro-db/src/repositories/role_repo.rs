//! Repository for the `roles` and `users_roles` tables.

use sqlx::PgExecutor;

use bistro_core::types::DbId;

use crate::models::role::Role;

/// Provides lookups and assignment for role reference data.
pub struct RoleRepo;

impl RoleRepo {
    /// Find a role by its unique name.
    pub async fn find_by_name<'e, E>(exec: E, name: &str) -> Result<Option<Role>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Role>("SELECT id, name FROM roles WHERE name = $1")
            .bind(name)
            .fetch_optional(exec)
            .await
    }

    /// Link an account to a role by role name. Returns `true` if the link
    /// was created (`false` when the role name does not exist).
    pub async fn assign<'e, E>(exec: E, user_id: DbId, role_name: &str) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            "INSERT INTO users_roles (user_id, role_id)
             SELECT $1, id FROM roles WHERE name = $2
             ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(role_name)
        .execute(exec)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// All role names assigned to an account, sorted for deterministic
    /// token claims.
    pub async fn names_for_user<'e, E>(exec: E, user_id: DbId) -> Result<Vec<String>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar(
            "SELECT r.name FROM roles r
             JOIN users_roles ur ON ur.role_id = r.id
             WHERE ur.user_id = $1
             ORDER BY r.name",
        )
        .bind(user_id)
        .fetch_all(exec)
        .await
    }
}
