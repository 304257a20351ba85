//! Well-known role name constants.
//!
//! These must match the seed data in `0002_create_roles.sql`.

pub const ROLE_USER: &str = "ROLE_USER";
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";
