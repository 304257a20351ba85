//! Stateless signing and verification of bearer tokens.
//!
//! Access and refresh tokens share one HS256-signed envelope; the `type`
//! claim is modelled as a tagged enum rather than a free-form string, so an
//! access token can never deserialize into a refresh slot (or vice versa)
//! without tripping [`TokenUse`] checking.
//!
//! Expiry is checked manually rather than by the JWT library so the
//! failure can carry the original expiry instant: callers need to tell
//! "just expired" apart from a garbage token.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use bistro_core::error::{AuthError, AuthResult};
use bistro_core::types::{DbId, Timestamp};

use crate::config::AuthConfig;

/// The slot a token is being presented for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenUse {
    Access,
    Refresh,
}

/// The tagged token-type claim. Access tokens carry the role names used
/// for authorization; refresh tokens carry identity only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TokenKind {
    Access { roles: Vec<String> },
    Refresh,
}

impl TokenKind {
    /// Which slot this kind is valid for.
    pub fn token_use(&self) -> TokenUse {
        match self {
            TokenKind::Access { .. } => TokenUse::Access,
            TokenKind::Refresh => TokenUse::Refresh,
        }
    }
}

/// The full claim set carried by every bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Unique token identifier (UUID v4) for audit and diagnostics.
    pub jti: String,
    /// Subject -- the account's email.
    pub sub: String,
    /// The account's internal database id.
    #[serde(rename = "accountId")]
    pub account_id: DbId,
    pub iss: String,
    pub aud: String,
    /// Issued-at (UTC Unix timestamp).
    pub iat: i64,
    /// Expiration (UTC Unix timestamp).
    pub exp: i64,
    /// Token type plus type-specific payload, flattened into the claim set
    /// as a `type` discriminant.
    #[serde(flatten)]
    pub kind: TokenKind,
}

/// Stateless token signer/verifier over an immutable symmetric key.
///
/// Purely computational: safe for concurrent use with no shared mutable
/// state.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    audience: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenCodec {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            access_ttl: Duration::minutes(config.access_ttl_mins),
            refresh_ttl: Duration::days(config.refresh_ttl_days),
        }
    }

    /// Sign an access token carrying the account's roles.
    ///
    /// Returns the compact serialization and its expiry instant.
    pub fn sign_access(
        &self,
        account_id: DbId,
        email: &str,
        roles: &[String],
    ) -> AuthResult<(String, Timestamp)> {
        self.sign(
            account_id,
            email,
            TokenKind::Access {
                roles: roles.to_vec(),
            },
            self.access_ttl,
        )
    }

    /// Sign a refresh token carrying identity only.
    pub fn sign_refresh(&self, account_id: DbId, email: &str) -> AuthResult<(String, Timestamp)> {
        self.sign(account_id, email, TokenKind::Refresh, self.refresh_ttl)
    }

    fn sign(
        &self,
        account_id: DbId,
        email: &str,
        kind: TokenKind,
        ttl: Duration,
    ) -> AuthResult<(String, Timestamp)> {
        let issued_at = Utc::now();
        let expires_at = issued_at + ttl;

        let claims = Claims {
            jti: Uuid::new_v4().to_string(),
            sub: email.to_string(),
            account_id,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            kind,
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("token signing failed: {e}")))?;
        Ok((token, expires_at))
    }

    /// Verify a token presented for the given slot.
    ///
    /// Fails with [`AuthError::TokenExpired`] (carrying the original expiry
    /// instant) when `exp` has passed, and with [`AuthError::TokenInvalid`]
    /// for any signature, format, issuer, audience, or token-type mismatch.
    pub fn verify(&self, token: &str, expected: TokenUse) -> AuthResult<Claims> {
        // Signature and structure only; exp and aud are checked by hand
        // below so the expiry failure can report the original instant.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|_| AuthError::TokenInvalid)?;
        let claims = data.claims;

        if claims.exp < Utc::now().timestamp() {
            return Err(AuthError::TokenExpired {
                expired_at: timestamp_from_unix(claims.exp),
            });
        }
        if claims.iss != self.issuer || claims.aud != self.audience {
            return Err(AuthError::TokenInvalid);
        }
        if claims.kind.token_use() != expected {
            return Err(AuthError::TokenInvalid);
        }

        Ok(claims)
    }
}

/// Compute the SHA-256 hex digest of a refresh token.
///
/// Only this digest is persisted in the session store, so a database leak
/// does not compromise live sessions.
pub fn hash_refresh_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn timestamp_from_unix(secs: i64) -> Timestamp {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn test_config() -> AuthConfig {
        AuthConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            issuer: "bistro-auth".to_string(),
            audience: "bistro-api".to_string(),
            access_ttl_mins: 15,
            refresh_ttl_days: 7,
        }
    }

    fn roles() -> Vec<String> {
        vec!["ROLE_USER".to_string()]
    }

    #[test]
    fn access_token_round_trip_preserves_claims() {
        let codec = TokenCodec::new(&test_config());
        let (token, expires_at) = codec
            .sign_access(42, "a@b.com", &roles())
            .expect("signing should succeed");

        let claims = codec
            .verify(&token, TokenUse::Access)
            .expect("verification should succeed");
        assert_eq!(claims.sub, "a@b.com");
        assert_eq!(claims.account_id, 42);
        assert_eq!(claims.iss, "bistro-auth");
        assert_eq!(claims.aud, "bistro-api");
        assert_eq!(claims.exp, expires_at.timestamp());
        assert!(claims.exp > claims.iat);
        assert!(!claims.jti.is_empty());
        assert_eq!(claims.kind, TokenKind::Access { roles: roles() });
    }

    #[test]
    fn refresh_token_carries_no_roles() {
        let codec = TokenCodec::new(&test_config());
        let (token, _) = codec.sign_refresh(7, "a@b.com").unwrap();

        let claims = codec.verify(&token, TokenUse::Refresh).unwrap();
        assert_eq!(claims.kind, TokenKind::Refresh);
    }

    #[test]
    fn expired_token_fails_as_expired_never_invalid() {
        let config = test_config();
        let codec = TokenCodec::new(&config);

        // Manually craft an already-expired but otherwise valid token.
        let exp = Utc::now().timestamp() - 300;
        let claims = Claims {
            jti: Uuid::new_v4().to_string(),
            sub: "a@b.com".to_string(),
            account_id: 1,
            iss: config.issuer.clone(),
            aud: config.audience.clone(),
            iat: exp - 600,
            exp,
            kind: TokenKind::Refresh,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .expect("encoding should succeed");

        let err = codec.verify(&token, TokenUse::Refresh).unwrap_err();
        assert_matches!(err, AuthError::TokenExpired { expired_at }
            if expired_at.timestamp() == exp);
    }

    #[test]
    fn wrong_secret_is_invalid() {
        let codec_a = TokenCodec::new(&test_config());
        let mut other = test_config();
        other.secret = "a-completely-different-signing-secret".to_string();
        let codec_b = TokenCodec::new(&other);

        let (token, _) = codec_a.sign_refresh(1, "a@b.com").unwrap();
        assert_matches!(
            codec_b.verify(&token, TokenUse::Refresh),
            Err(AuthError::TokenInvalid)
        );
    }

    #[test]
    fn wrong_audience_or_issuer_is_invalid() {
        let codec = TokenCodec::new(&test_config());

        let mut foreign = test_config();
        foreign.audience = "some-other-api".to_string();
        let (token, _) = TokenCodec::new(&foreign).sign_refresh(1, "a@b.com").unwrap();
        assert_matches!(
            codec.verify(&token, TokenUse::Refresh),
            Err(AuthError::TokenInvalid)
        );

        let mut foreign = test_config();
        foreign.issuer = "some-other-issuer".to_string();
        let (token, _) = TokenCodec::new(&foreign).sign_refresh(1, "a@b.com").unwrap();
        assert_matches!(
            codec.verify(&token, TokenUse::Refresh),
            Err(AuthError::TokenInvalid)
        );
    }

    #[test]
    fn token_type_confusion_is_invalid() {
        let codec = TokenCodec::new(&test_config());

        let (access, _) = codec.sign_access(1, "a@b.com", &roles()).unwrap();
        assert_matches!(
            codec.verify(&access, TokenUse::Refresh),
            Err(AuthError::TokenInvalid)
        );

        let (refresh, _) = codec.sign_refresh(1, "a@b.com").unwrap();
        assert_matches!(
            codec.verify(&refresh, TokenUse::Access),
            Err(AuthError::TokenInvalid)
        );
    }

    #[test]
    fn garbage_input_is_invalid() {
        let codec = TokenCodec::new(&test_config());
        assert_matches!(
            codec.verify("not-a-jwt", TokenUse::Access),
            Err(AuthError::TokenInvalid)
        );
        assert_matches!(
            codec.verify("", TokenUse::Refresh),
            Err(AuthError::TokenInvalid)
        );
    }

    #[test]
    fn refresh_token_hash_is_stable_sha256_hex() {
        let codec = TokenCodec::new(&test_config());
        let (token, _) = codec.sign_refresh(1, "a@b.com").unwrap();

        let hash = hash_refresh_token(&token);
        assert_eq!(hash, hash_refresh_token(&token));
        assert_eq!(hash.len(), 64);
    }
}
