//! Integration tests for the registration flow: account creation, ticket
//! issuance, event emission, duplicate handling, and field validation.

mod common;

use assert_matches::assert_matches;
use sqlx::PgPool;

use bistro_auth::RegistrationRequest;
use bistro_core::error::AuthError;
use bistro_db::models::user::AccountStatus;
use bistro_db::repositories::{UserRepo, VerificationTokenRepo};

use common::{build_service, sample_registration};

/// A valid registration creates a PENDING account, exactly one live
/// verification ticket, and one `UserRegistered` event with matching
/// email and full name.
#[sqlx::test(migrations = "../bistro-db/migrations")]
async fn register_creates_pending_account_ticket_and_event(pool: PgPool) {
    let (service, events) = build_service(pool.clone());
    let mut rx = events.subscribe();

    let receipt = service
        .register(sample_registration())
        .await
        .expect("registration should succeed");
    assert_eq!(receipt.email, "a@b.com");

    let account = UserRepo::find_by_email(&pool, "a@b.com")
        .await
        .unwrap()
        .expect("account row must exist");
    assert_eq!(account.status, AccountStatus::Pending);
    assert!(account.email_verified_at.is_none());
    assert_eq!(account.full_name, "A B");
    assert_eq!(account.phone, "+375291234567");
    assert_ne!(account.password_hash, "Abc12345!", "hash, never plaintext");

    let tickets = VerificationTokenRepo::count_live_for_user(&pool, account.id)
        .await
        .unwrap();
    assert_eq!(tickets, 1);

    let envelope = rx.try_recv().expect("one event must be published");
    let bistro_events::AuthEvent::UserRegistered(payload) = envelope.event;
    assert_eq!(payload.email, "a@b.com");
    assert_eq!(payload.full_name, "A B");
    assert!(!payload.verification_token.is_empty());

    assert!(rx.try_recv().is_err(), "exactly one event, not more");
}

/// A second registration with the same email fails Conflict.
#[sqlx::test(migrations = "../bistro-db/migrations")]
async fn register_duplicate_email_conflicts(pool: PgPool) {
    let (service, _events) = build_service(pool);

    service.register(sample_registration()).await.unwrap();

    let mut dup = sample_registration();
    dup.phone = "+375297654321".to_string();
    let err = service.register(dup).await.unwrap_err();
    assert_matches!(err, AuthError::Conflict { field } if field == "email");
}

/// A second registration with the same phone fails Conflict.
#[sqlx::test(migrations = "../bistro-db/migrations")]
async fn register_duplicate_phone_conflicts(pool: PgPool) {
    let (service, _events) = build_service(pool);

    service.register(sample_registration()).await.unwrap();

    let mut dup = sample_registration();
    dup.email = "other@b.com".to_string();
    let err = service.register(dup).await.unwrap_err();
    assert_matches!(err, AuthError::Conflict { field } if field == "phone");
}

/// The store-level unique constraint is the final arbiter: inserting a
/// duplicate directly (bypassing the pre-check) still maps to Conflict.
#[sqlx::test(migrations = "../bistro-db/migrations")]
async fn unique_violation_maps_to_conflict(pool: PgPool) {
    let (service, _events) = build_service(pool.clone());
    service.register(sample_registration()).await.unwrap();

    let dup = bistro_db::models::user::NewAccount {
        email: "a@b.com".to_string(),
        phone: "+375290000001".to_string(),
        password_hash: "irrelevant".to_string(),
        full_name: "Dup".to_string(),
    };
    let err: AuthError = UserRepo::create(&pool, &dup).await.unwrap_err().into();
    assert_matches!(err, AuthError::Conflict { field } if field == "email");
}

/// Field validation failures aggregate per field and reject the request
/// before anything is persisted.
#[sqlx::test(migrations = "../bistro-db/migrations")]
async fn register_validation_failures(pool: PgPool) {
    let (service, _events) = build_service(pool.clone());

    let cases: Vec<(RegistrationRequest, &str)> = vec![
        (
            RegistrationRequest {
                password: "short1!".to_string(),
                password_confirmation: "short1!".to_string(),
                ..sample_registration()
            },
            "password",
        ),
        (
            RegistrationRequest {
                password: "alllowercase1!".to_string(),
                password_confirmation: "alllowercase1!".to_string(),
                ..sample_registration()
            },
            "password",
        ),
        (
            RegistrationRequest {
                password_confirmation: "Different1!".to_string(),
                ..sample_registration()
            },
            "passwordConfirmation",
        ),
        (
            RegistrationRequest {
                phone: "not-a-phone".to_string(),
                ..sample_registration()
            },
            "phone",
        ),
        (
            RegistrationRequest {
                email: "not-an-email".to_string(),
                ..sample_registration()
            },
            "email",
        ),
    ];

    for (request, expected_field) in cases {
        let err = service.register(request).await.unwrap_err();
        match err {
            AuthError::Validation(report) => {
                assert!(
                    report
                        .violations()
                        .iter()
                        .any(|v| v.field == expected_field),
                    "expected a violation on field {expected_field}, got {:?}",
                    report.violations()
                );
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    let account = UserRepo::find_by_email(&pool, "a@b.com").await.unwrap();
    assert!(account.is_none(), "no account row for rejected requests");
}
