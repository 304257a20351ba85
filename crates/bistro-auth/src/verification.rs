//! Verification ledger: single-use, time-boxed proofs of email ownership.

use chrono::{Duration, Utc};
use rand::Rng;

use bistro_core::error::{AuthError, AuthResult};
use bistro_core::types::DbId;
use bistro_db::models::user::Account;
use bistro_db::models::verification_token::NewVerificationToken;
use bistro_db::repositories::{UserRepo, VerificationTokenRepo};
use bistro_db::DbPool;

/// Ticket lifetime in hours from issuance.
pub const TICKET_TTL_HOURS: i64 = 24;

/// Number of random bytes behind each ticket token.
const TICKET_ENTROPY_BYTES: usize = 32;

/// Issues and consumes verification tickets. Tickets prove control of a
/// registered email address and are consumable at most once.
#[derive(Clone)]
pub struct VerificationLedger {
    pool: DbPool,
}

impl VerificationLedger {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Issue a fresh ticket for the account and return the opaque token
    /// string for out-of-band delivery.
    ///
    /// The token is 32 bytes of OS randomness, hex-encoded: non-guessable
    /// and URL-safe.
    pub async fn issue(&self, account_id: DbId) -> AuthResult<String> {
        let mut bytes = [0u8; TICKET_ENTROPY_BYTES];
        rand::rng().fill(&mut bytes[..]);
        let token: String = bytes.iter().map(|b| format!("{b:02x}")).collect();

        let issued_at = Utc::now();
        VerificationTokenRepo::create(
            &self.pool,
            &NewVerificationToken {
                token: token.clone(),
                user_id: account_id,
                expires_at: issued_at + Duration::hours(TICKET_TTL_HOURS),
            },
        )
        .await?;

        tracing::info!(account_id, "verification ticket issued");
        Ok(token)
    }

    /// Consume a ticket, returning the owning account.
    ///
    /// The claim is a single compare-and-delete statement, so two
    /// concurrent requests bearing the same token yield exactly one
    /// success. Fails with [`AuthError::TicketExpired`] when the row exists
    /// but is past its expiry (the row is retained for the sweep) and
    /// [`AuthError::InvalidTicket`] when it does not exist at all.
    pub async fn consume(&self, token: &str) -> AuthResult<Account> {
        let ticket = match VerificationTokenRepo::claim(&self.pool, token).await? {
            Some(ticket) => ticket,
            None => {
                // Diagnostic only: the claim already settled the race.
                return match VerificationTokenRepo::find_by_token(&self.pool, token).await? {
                    Some(_) => Err(AuthError::TicketExpired),
                    None => Err(AuthError::InvalidTicket),
                };
            }
        };

        let account = UserRepo::find_by_id(&self.pool, ticket.user_id)
            .await?
            .ok_or(AuthError::NotFound {
                entity: "account",
                id: ticket.user_id,
            })?;

        tracing::info!(account_id = account.id, "verification ticket consumed");
        Ok(account)
    }

    /// Delete expired tickets. Maintenance sweep, not part of the core
    /// flows.
    pub async fn sweep_expired(&self) -> AuthResult<u64> {
        Ok(VerificationTokenRepo::cleanup_expired(&self.pool).await?)
    }
}
