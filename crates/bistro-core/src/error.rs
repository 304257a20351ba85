//! The error taxonomy shared by every auth component.
//!
//! All variants are request-scoped failures surfaced to the caller with a
//! stable machine-readable code; none are retried internally. Unexpected
//! failures (store unavailable, codec misconfiguration) collapse into
//! [`AuthError::Internal`] / [`AuthError::Database`] and must never leak
//! detail to the caller beyond the generic message.

use crate::types::{DbId, Timestamp};
use crate::validation::ValidationReport;

/// Domain error for the authentication and session-lifecycle core.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// One or more request fields failed validation.
    #[error("validation failed")]
    Validation(ValidationReport),

    /// A uniqueness constraint (email or phone) was violated.
    #[error("{field} already exists")]
    Conflict { field: String },

    /// Bad login or password-change secret. Unknown email and wrong
    /// password both map here so the response does not reveal whether an
    /// account exists.
    #[error("invalid email or password")]
    InvalidCredential,

    /// The verification token does not exist (never issued, or consumed).
    #[error("invalid verification token")]
    InvalidTicket,

    /// The verification token exists but is past its expiry.
    #[error("verification token has expired")]
    TicketExpired,

    /// Signature, format, issuer, audience, or token-type mismatch.
    #[error("invalid token")]
    TokenInvalid,

    /// The bearer token's `exp` has passed. Carries the original expiry
    /// instant so callers can distinguish "just expired" from garbage.
    #[error("token expired at {expired_at}")]
    TokenExpired { expired_at: Timestamp },

    /// The refresh token has no live backing session (rotated, revoked, or
    /// never issued).
    #[error("invalid or revoked refresh token")]
    SessionInvalid,

    /// The refresh token itself is past its expiry.
    #[error("refresh token expired at {expired_at}")]
    SessionExpired { expired_at: Timestamp },

    /// Idempotency guard: the account is already ACTIVE.
    #[error("user already verified")]
    AlreadyVerified,

    /// Backing data was deleted after token issuance. Fatal for the
    /// request, not retryable.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Unexpected failure inside the core (hashing, signing, ...).
    #[error("internal error: {0}")]
    Internal(String),

    /// Database error from sqlx that is not a recognised constraint
    /// violation.
    #[error("database error: {0}")]
    Database(sqlx::Error),
}

/// Convenience alias used throughout the auth crates.
pub type AuthResult<T> = Result<T, AuthError>;

impl AuthError {
    /// Stable machine-readable code for API consumers.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::Validation(_) => "VALIDATION_ERROR",
            AuthError::Conflict { .. } => "CONFLICT",
            AuthError::InvalidCredential => "INVALID_CREDENTIAL",
            AuthError::InvalidTicket => "INVALID_TICKET",
            AuthError::TicketExpired => "TICKET_EXPIRED",
            AuthError::TokenInvalid => "TOKEN_INVALID",
            AuthError::TokenExpired { .. } => "TOKEN_EXPIRED",
            AuthError::SessionInvalid => "SESSION_INVALID",
            AuthError::SessionExpired { .. } => "SESSION_EXPIRED",
            AuthError::AlreadyVerified => "ALREADY_VERIFIED",
            AuthError::NotFound { .. } => "NOT_FOUND",
            AuthError::Internal(_) | AuthError::Database(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<sqlx::Error> for AuthError {
    /// Classify a sqlx error into the domain taxonomy.
    ///
    /// A PostgreSQL unique-constraint violation (error code 23505) on one of
    /// the named `uq_users_*` constraints is the final arbiter for duplicate
    /// registration races and maps to [`AuthError::Conflict`]; the
    /// `exists_by_*` pre-checks are an optimization only.
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some("23505") {
                let field = match db_err.constraint() {
                    Some("uq_users_email") => "email",
                    Some("uq_users_phone") => "phone",
                    Some(other) => other,
                    None => "unknown",
                };
                return AuthError::Conflict {
                    field: field.to_string(),
                };
            }
        }
        AuthError::Database(err)
    }
}
