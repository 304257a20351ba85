//! Domain primitives shared across the bistro platform services.
//!
//! This crate carries no I/O of its own: the error taxonomy, shared id and
//! timestamp aliases, well-known role names, and the explicit field
//! validators used by the registration flow.

pub mod error;
pub mod roles;
pub mod types;
pub mod validation;

pub use error::{AuthError, AuthResult};
