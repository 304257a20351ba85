//! Session model and DTOs.

use sqlx::FromRow;

use bistro_core::types::{DbId, Timestamp};

/// A session row from the `user_sessions` table.
///
/// Backs exactly one refresh token, stored as its SHA-256 hex digest so a
/// database leak does not compromise live sessions. Sessions are never
/// hard-deleted by the core flows; rotation and revocation set
/// `is_revoked` instead.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: DbId,
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub issued_at: Timestamp,
    pub expires_at: Timestamp,
    pub validated_at: Option<Timestamp>,
    pub is_revoked: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for persisting a new live session.
#[derive(Debug)]
pub struct NewSession {
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub issued_at: Timestamp,
    pub expires_at: Timestamp,
}
