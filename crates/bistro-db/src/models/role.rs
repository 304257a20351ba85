//! Role reference data: named permission groups, seeded by migration.

use sqlx::FromRow;

use bistro_core::types::DbId;

/// A role row from the `roles` table. Immutable reference data.
#[derive(Debug, Clone, FromRow)]
pub struct Role {
    pub id: DbId,
    pub name: String,
}
