pub mod role_repo;
pub mod session_repo;
pub mod user_repo;
pub mod verification_token_repo;

pub use role_repo::RoleRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
pub use verification_token_repo::VerificationTokenRepo;
