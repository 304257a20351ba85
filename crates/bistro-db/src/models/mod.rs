pub mod role;
pub mod session;
pub mod user;
pub mod verification_token;
