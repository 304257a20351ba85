//! Credential store: owns password hashes and role assignments.

use bistro_core::error::{AuthError, AuthResult};
use bistro_core::types::DbId;
use bistro_core::validation::{check_password, ValidationReport};
use bistro_core::roles::ROLE_USER;
use bistro_db::models::user::{Account, NewAccount};
use bistro_db::repositories::{RoleRepo, UserRepo};
use bistro_db::DbPool;

use crate::password::{hash_password, verify_password};

/// Plaintext registration input for [`CredentialStore::create`].
/// Field validation happens in the orchestrator before this is built.
#[derive(Debug)]
pub struct NewCredential {
    pub email: String,
    pub phone: String,
    pub password_plain: String,
    pub full_name: String,
}

/// Owns account rows, password hashes, and role links. Leaf component: no
/// dependency on the other auth components.
#[derive(Clone)]
pub struct CredentialStore {
    pool: DbPool,
}

impl CredentialStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create a PENDING account with a salted password hash and the
    /// default `ROLE_USER` role.
    ///
    /// The existence pre-checks give fast, field-accurate `Conflict`
    /// failures; the unique constraints settle concurrent duplicates via
    /// the 23505 mapping in `AuthError::from`.
    pub async fn create(&self, input: &NewCredential) -> AuthResult<Account> {
        if UserRepo::exists_by_email(&self.pool, &input.email).await? {
            return Err(AuthError::Conflict {
                field: "email".into(),
            });
        }
        if UserRepo::exists_by_phone(&self.pool, &input.phone).await? {
            return Err(AuthError::Conflict {
                field: "phone".into(),
            });
        }

        let password_hash = hash_password(&input.password_plain)
            .map_err(|e| AuthError::Internal(format!("password hashing failed: {e}")))?;

        let account = UserRepo::create(
            &self.pool,
            &NewAccount {
                email: input.email.clone(),
                phone: input.phone.clone(),
                password_hash,
                full_name: input.full_name.clone(),
            },
        )
        .await?;

        if !RoleRepo::assign(&self.pool, account.id, ROLE_USER).await? {
            return Err(AuthError::Internal(format!(
                "seed role {ROLE_USER} is missing"
            )));
        }

        tracing::info!(account_id = account.id, "account created (pending verification)");
        Ok(account)
    }

    /// Check a plaintext password against the stored hash.
    pub async fn verify_password(&self, account: &Account, password: &str) -> AuthResult<bool> {
        verify_password(password, &account.password_hash)
            .map_err(|e| AuthError::Internal(format!("password verification failed: {e}")))
    }

    /// Activate a PENDING account, stamping `email_verified_at`.
    ///
    /// Fails with [`AuthError::AlreadyVerified`] when the account is
    /// already ACTIVE, and [`AuthError::NotFound`] when it no longer
    /// exists.
    pub async fn activate(&self, account_id: DbId) -> AuthResult<Account> {
        match UserRepo::activate(&self.pool, account_id).await? {
            Some(account) => {
                tracing::info!(account_id, "account activated");
                Ok(account)
            }
            // The guarded UPDATE touched nothing: either the account is
            // gone or someone else already activated it.
            None => match UserRepo::find_by_id(&self.pool, account_id).await? {
                Some(_) => Err(AuthError::AlreadyVerified),
                None => Err(AuthError::NotFound {
                    entity: "account",
                    id: account_id,
                }),
            },
        }
    }

    /// Replace the password hash after checking the current secret and the
    /// complexity policy for the new one.
    pub async fn change_password(
        &self,
        account_id: DbId,
        current_plain: &str,
        new_plain: &str,
    ) -> AuthResult<()> {
        let account = UserRepo::find_by_id(&self.pool, account_id)
            .await?
            .ok_or(AuthError::NotFound {
                entity: "account",
                id: account_id,
            })?;

        if !self.verify_password(&account, current_plain).await? {
            return Err(AuthError::InvalidCredential);
        }

        let mut report = ValidationReport::new();
        report.check("password", check_password(new_plain));
        report.into_result()?;

        let password_hash = hash_password(new_plain)
            .map_err(|e| AuthError::Internal(format!("password hashing failed: {e}")))?;
        UserRepo::update_password(&self.pool, account_id, &password_hash).await?;

        tracing::info!(account_id, "password changed");
        Ok(())
    }

    /// Role names for an account, sorted, as stamped into access tokens.
    pub async fn roles(&self, account_id: DbId) -> AuthResult<Vec<String>> {
        Ok(RoleRepo::names_for_user(&self.pool, account_id).await?)
    }

    /// Look up an account by email.
    pub async fn find_by_email(&self, email: &str) -> AuthResult<Option<Account>> {
        Ok(UserRepo::find_by_email(&self.pool, email).await?)
    }

    /// Look up an account by id.
    pub async fn find_by_id(&self, account_id: DbId) -> AuthResult<Option<Account>> {
        Ok(UserRepo::find_by_id(&self.pool, account_id).await?)
    }
}
