//! Verification ticket model and DTOs.

use sqlx::FromRow;

use bistro_core::types::{DbId, Timestamp};

/// A verification ticket row from the `verification_tokens` table.
///
/// Consumable at most once; consumption deletes the row. Expired rows are
/// rejected but retained for the lazy cleanup sweep.
#[derive(Debug, Clone, FromRow)]
pub struct VerificationToken {
    pub id: DbId,
    pub token: String,
    pub user_id: DbId,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
}

/// DTO for persisting a freshly issued ticket.
#[derive(Debug)]
pub struct NewVerificationToken {
    pub token: String,
    pub user_id: DbId,
    pub expires_at: Timestamp,
}
