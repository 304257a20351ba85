//! Account entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use bistro_core::types::{DbId, Timestamp};

/// Lifecycle status of an account.
///
/// The only legal transition is PENDING -> ACTIVE, driven by successful
/// email verification and applied at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "account_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountStatus {
    Pending,
    Active,
}

/// Full account row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to external output.
/// The orchestrator returns purpose-built response types instead.
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: DbId,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub full_name: String,
    pub status: AccountStatus,
    pub email_verified_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a new account. The password is already hashed here;
/// plaintext never reaches the repository layer.
#[derive(Debug)]
pub struct NewAccount {
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub full_name: String,
}
