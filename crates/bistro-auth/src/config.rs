//! Environment-driven configuration for the auth core.

/// Configuration for token signing and session lifetimes.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens. A key of at
    /// least 32 bytes is recommended.
    pub secret: String,
    /// `iss` claim stamped into and required from every token.
    pub issuer: String,
    /// `aud` claim stamped into and required from every token.
    pub audience: String,
    /// Access token lifetime in minutes (default: 15).
    pub access_ttl_mins: i64,
    /// Refresh token lifetime in days (default: 7).
    pub refresh_ttl_days: i64,
}

/// Default access token expiry in minutes.
const DEFAULT_ACCESS_TTL_MINS: i64 = 15;
/// Default refresh token expiry in days.
const DEFAULT_REFRESH_TTL_DAYS: i64 = 7;

impl AuthConfig {
    /// Load auth configuration from environment variables.
    ///
    /// | Env Var                | Required | Default          |
    /// |------------------------|----------|------------------|
    /// | `JWT_SECRET`           | **yes**  | --               |
    /// | `JWT_ISSUER`           | no       | `bistro-auth`    |
    /// | `JWT_AUDIENCE`         | no       | `bistro-api`     |
    /// | `JWT_ACCESS_TTL_MINS`  | no       | `15`             |
    /// | `JWT_REFRESH_TTL_DAYS` | no       | `7`              |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let issuer = std::env::var("JWT_ISSUER").unwrap_or_else(|_| "bistro-auth".into());
        let audience = std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "bistro-api".into());

        let access_ttl_mins: i64 = std::env::var("JWT_ACCESS_TTL_MINS")
            .unwrap_or_else(|_| DEFAULT_ACCESS_TTL_MINS.to_string())
            .parse()
            .expect("JWT_ACCESS_TTL_MINS must be a valid i64");

        let refresh_ttl_days: i64 = std::env::var("JWT_REFRESH_TTL_DAYS")
            .unwrap_or_else(|_| DEFAULT_REFRESH_TTL_DAYS.to_string())
            .parse()
            .expect("JWT_REFRESH_TTL_DAYS must be a valid i64");

        Self {
            secret,
            issuer,
            audience,
            access_ttl_mins,
            refresh_ttl_days,
        }
    }
}
