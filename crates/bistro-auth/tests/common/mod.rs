//! Shared helpers for the auth integration tests.

use std::sync::Arc;

use bistro_auth::{AuthConfig, AuthService, RegistrationRequest};
use bistro_db::DbPool;
use bistro_events::{AuthEvent, EventBus};

/// Build a test `AuthConfig` with a known secret and the default TTLs.
pub fn test_config() -> AuthConfig {
    AuthConfig {
        secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
        issuer: "bistro-auth".to_string(),
        audience: "bistro-api".to_string(),
        access_ttl_mins: 15,
        refresh_ttl_days: 7,
    }
}

/// Build an `AuthService` over the given pool, returning the event bus so
/// tests can observe published events.
pub fn build_service(pool: DbPool) -> (AuthService, Arc<EventBus>) {
    init_tracing();
    let events = Arc::new(EventBus::default());
    let service = AuthService::new(pool, &test_config(), Arc::clone(&events));
    (service, events)
}

/// Install a test tracing subscriber honoring `RUST_LOG`. Safe to call
/// from every test; only the first install wins.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A registration request that passes every field validator.
pub fn sample_registration() -> RegistrationRequest {
    RegistrationRequest {
        email: "a@b.com".to_string(),
        password: "Abc12345!".to_string(),
        password_confirmation: "Abc12345!".to_string(),
        full_name: "A B".to_string(),
        phone: "+375291234567".to_string(),
    }
}

/// Register the sample account and return the verification ticket captured
/// from the `UserRegistered` event.
pub async fn register_and_get_ticket(
    service: &AuthService,
    events: &EventBus,
    request: RegistrationRequest,
) -> String {
    let mut rx = events.subscribe();
    service
        .register(request)
        .await
        .expect("registration should succeed");
    let envelope = rx.try_recv().expect("a UserRegistered event must be published");
    let AuthEvent::UserRegistered(payload) = envelope.event;
    payload.verification_token
}
