//! Auth orchestrator: composes the credential store, token codec,
//! verification ledger, and session store into the register / verify /
//! login / refresh state machine.
//!
//! Per account the states are UNREGISTERED -> PENDING -> ACTIVE; per
//! session LIVE -> (ROTATED | REVOKED | EXPIRED). No ambient security
//! context exists: every authenticated operation takes the acting account
//! id explicitly.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use bistro_core::error::{AuthError, AuthResult};
use bistro_core::types::DbId;
use bistro_core::validation::{
    check_email, check_full_name, check_password, check_phone, ValidationReport,
};
use bistro_db::models::user::AccountStatus;
use bistro_db::DbPool;
use bistro_events::{AuthEvent, EventBus, UserRegistered};

use crate::config::AuthConfig;
use crate::credentials::{CredentialStore, NewCredential};
use crate::session::{SessionStore, TokenPair};
use crate::token::TokenCodec;
use crate::verification::VerificationLedger;

/// Registration input as received from the transport layer.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    pub full_name: String,
    pub phone: String,
}

/// Minimal confirmation returned by registration: no tokens are issued
/// before the account is ACTIVE.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationReceipt {
    pub email: String,
}

/// The authentication and session-lifecycle orchestrator.
#[derive(Clone)]
pub struct AuthService {
    credentials: CredentialStore,
    ledger: VerificationLedger,
    sessions: SessionStore,
    events: Arc<EventBus>,
}

impl AuthService {
    pub fn new(pool: DbPool, config: &AuthConfig, events: Arc<EventBus>) -> Self {
        let codec = TokenCodec::new(config);
        Self {
            credentials: CredentialStore::new(pool.clone()),
            ledger: VerificationLedger::new(pool.clone()),
            sessions: SessionStore::new(pool, codec),
            events,
        }
    }

    /// Register a new account.
    ///
    /// Creates the account in PENDING, issues a verification ticket, and
    /// publishes exactly one `UserRegistered` event for the notification
    /// collaborator. Field problems aggregate into a single
    /// [`AuthError::Validation`]; duplicates fail with
    /// [`AuthError::Conflict`].
    pub async fn register(&self, request: RegistrationRequest) -> AuthResult<RegistrationReceipt> {
        tracing::info!(email = %request.email, "registration attempt");

        let mut report = ValidationReport::new();
        report.check("email", check_email(&request.email));
        report.check("password", check_password(&request.password));
        if request.password != request.password_confirmation {
            report.push("passwordConfirmation", "Passwords do not match");
        }
        report.check("fullName", check_full_name(&request.full_name));
        report.check("phone", check_phone(&request.phone));
        report.into_result()?;

        let account = self
            .credentials
            .create(&NewCredential {
                email: request.email,
                phone: request.phone,
                password_plain: request.password,
                full_name: request.full_name,
            })
            .await?;

        let ticket = self.ledger.issue(account.id).await?;

        self.events
            .publish(AuthEvent::UserRegistered(UserRegistered {
                email: account.email.clone(),
                full_name: account.full_name.clone(),
                verification_token: ticket,
            }));

        Ok(RegistrationReceipt {
            email: account.email,
        })
    }

    /// Consume a verification ticket, activate the account, and open its
    /// first session.
    pub async fn verify_email(&self, ticket_token: &str) -> AuthResult<TokenPair> {
        let account = self.ledger.consume(ticket_token).await?;

        if account.status == AccountStatus::Active {
            return Err(AuthError::AlreadyVerified);
        }
        let account = self.credentials.activate(account.id).await?;

        let roles = self.credentials.roles(account.id).await?;
        self.sessions.open(&account, &roles).await
    }

    /// Authenticate with email + password and open a session.
    ///
    /// Unknown email and wrong password produce the same
    /// [`AuthError::InvalidCredential`] so responses do not reveal whether
    /// an account exists. Login is intentionally not gated on verification
    /// status: a PENDING account with correct credentials signs in.
    pub async fn login(&self, email: &str, password: &str) -> AuthResult<TokenPair> {
        let account = match self.credentials.find_by_email(email).await? {
            Some(account) => account,
            None => {
                tracing::warn!("login failed: unknown email");
                return Err(AuthError::InvalidCredential);
            }
        };

        if !self.credentials.verify_password(&account, password).await? {
            tracing::warn!(account_id = account.id, "login failed: bad password");
            return Err(AuthError::InvalidCredential);
        }

        let roles = self.credentials.roles(account.id).await?;
        self.sessions.open(&account, &roles).await
    }

    /// Exchange a live refresh token for a new pair (single-use rotation).
    pub async fn refresh(&self, refresh_token: &str) -> AuthResult<TokenPair> {
        self.sessions.rotate(refresh_token).await
    }

    /// Revoke every live session for the account.
    pub async fn logout(&self, account_id: DbId) -> AuthResult<()> {
        self.sessions.revoke_all(account_id).await?;
        Ok(())
    }

    /// Change the account password and revoke all live sessions so stolen
    /// refresh tokens die with the old secret.
    pub async fn change_password(
        &self,
        account_id: DbId,
        current_password: &str,
        new_password: &str,
    ) -> AuthResult<()> {
        self.credentials
            .change_password(account_id, current_password, new_password)
            .await?;
        self.sessions.revoke_all(account_id).await?;
        Ok(())
    }
}
