//! Authentication and session-lifecycle core.
//!
//! Composes five components into the register -> verify-email -> login ->
//! refresh -> revoke state machine:
//!
//! - [`credentials::CredentialStore`] — password hashes and role
//!   assignments.
//! - [`token::TokenCodec`] — stateless signing/verification of bearer
//!   tokens.
//! - [`verification::VerificationLedger`] — single-use, time-boxed email
//!   ownership tickets.
//! - [`session::SessionStore`] — persisted refresh-token records with
//!   rotation and revocation.
//! - [`service::AuthService`] — the orchestrator tying them together.
//!
//! HTTP transport, request routing, and email delivery live outside this
//! crate; the only outward surface besides the service API is the
//! `UserRegistered` event published on the [`bistro_events::EventBus`].

pub mod config;
pub mod credentials;
pub mod password;
pub mod service;
pub mod session;
pub mod token;
pub mod verification;

pub use config::AuthConfig;
pub use service::{AuthService, RegistrationReceipt, RegistrationRequest};
pub use session::TokenPair;
pub use token::{Claims, TokenCodec, TokenKind, TokenUse};
