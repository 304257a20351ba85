//! Session store: persisted refresh-token records with rotation and
//! revocation.
//!
//! Refresh tokens are single-use. Rotation claims the backing row with a
//! guarded UPDATE and opens the successor inside the same transaction, so
//! a replayed refresh token always observes "already rotated".

use chrono::Utc;
use serde::Serialize;

use bistro_core::error::{AuthError, AuthResult};
use bistro_core::types::DbId;
use bistro_db::models::session::NewSession;
use bistro_db::models::user::Account;
use bistro_db::repositories::{RoleRepo, SessionRepo, UserRepo};
use bistro_db::DbPool;

use crate::token::{hash_refresh_token, TokenCodec, TokenUse};

/// The pair returned by every session-opening operation.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

/// Issues token pairs and owns the session rows that back refresh tokens.
#[derive(Clone)]
pub struct SessionStore {
    pool: DbPool,
    codec: TokenCodec,
}

impl SessionStore {
    pub fn new(pool: DbPool, codec: TokenCodec) -> Self {
        Self { pool, codec }
    }

    /// Issue a fresh token pair and persist a live session bound to the
    /// refresh token's digest.
    pub async fn open(&self, account: &Account, roles: &[String]) -> AuthResult<TokenPair> {
        let issued_at = Utc::now();
        let (access_token, access_expires_at) =
            self.codec.sign_access(account.id, &account.email, roles)?;
        let (refresh_token, refresh_expires_at) =
            self.codec.sign_refresh(account.id, &account.email)?;

        SessionRepo::create(
            &self.pool,
            &NewSession {
                user_id: account.id,
                refresh_token_hash: hash_refresh_token(&refresh_token),
                issued_at,
                expires_at: refresh_expires_at,
            },
        )
        .await?;

        tracing::info!(account_id = account.id, "session opened");
        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_in: (access_expires_at - issued_at).num_seconds(),
        })
    }

    /// Exchange a live refresh token for a new pair, revoking its session.
    ///
    /// Codec failures surface as [`AuthError::SessionExpired`] /
    /// [`AuthError::SessionInvalid`]; a refresh token whose session was
    /// already rotated or revoked fails with [`AuthError::SessionInvalid`]
    /// even though its signature still verifies.
    pub async fn rotate(&self, refresh_token: &str) -> AuthResult<TokenPair> {
        let claims = self
            .codec
            .verify(refresh_token, TokenUse::Refresh)
            .map_err(|err| match err {
                AuthError::TokenExpired { expired_at } => AuthError::SessionExpired { expired_at },
                AuthError::TokenInvalid => AuthError::SessionInvalid,
                other => other,
            })?;

        let mut tx = self.pool.begin().await.map_err(AuthError::from)?;

        let session = SessionRepo::claim_for_rotation(&mut *tx, &hash_refresh_token(refresh_token))
            .await?
            .ok_or(AuthError::SessionInvalid)?;

        let account = UserRepo::find_by_id(&mut *tx, session.user_id)
            .await?
            .ok_or(AuthError::NotFound {
                entity: "account",
                id: session.user_id,
            })?;
        let roles = RoleRepo::names_for_user(&mut *tx, account.id).await?;

        let issued_at = Utc::now();
        let (access_token, access_expires_at) =
            self.codec.sign_access(account.id, &account.email, &roles)?;
        let (new_refresh_token, refresh_expires_at) =
            self.codec.sign_refresh(account.id, &account.email)?;

        SessionRepo::create(
            &mut *tx,
            &NewSession {
                user_id: account.id,
                refresh_token_hash: hash_refresh_token(&new_refresh_token),
                issued_at,
                expires_at: refresh_expires_at,
            },
        )
        .await?;

        tx.commit().await.map_err(AuthError::from)?;

        tracing::info!(
            account_id = account.id,
            session_id = session.id,
            jti = %claims.jti,
            "refresh token rotated"
        );
        Ok(TokenPair {
            access_token,
            refresh_token: new_refresh_token,
            expires_in: (access_expires_at - issued_at).num_seconds(),
        })
    }

    /// Revoke every live session for the account (logout, password
    /// change). Returns the number of sessions revoked.
    pub async fn revoke_all(&self, account_id: DbId) -> AuthResult<u64> {
        let revoked = SessionRepo::revoke_all_for_user(&self.pool, account_id).await?;
        tracing::info!(account_id, revoked, "sessions revoked");
        Ok(revoked)
    }
}
