//! Service-level tests for the authorization pipelines, run against an
//! in-memory credential store with real token, membership, auth, and
//! access control services.

mod common;

use std::sync::atomic::Ordering;

use tenancy_api::domain::NewOrganisation;
use tenancy_api::errors::AppError;
use tenancy_api::services::AuthService;

use common::{registration, TestEnv};

// =============================================================================
// Registration
// =============================================================================

#[tokio::test]
async fn test_registration_creates_user_default_org_and_membership() {
    let env = TestEnv::new();

    let (user, token) = env
        .auth
        .register(registration("John", "Doe", "johndoe@email.com"))
        .await
        .unwrap();

    assert_eq!(user.email, "johndoe@email.com");
    assert_eq!(env.store.user_count(), 1);
    assert_eq!(env.store.org_count(), 1);
    assert_eq!(env.store.membership_count(), 1);

    // The default organisation is named after the new user
    let orgs = env.access.list_organisations(user.id).await.unwrap();
    assert_eq!(orgs.len(), 1);
    assert_eq!(orgs[0].name, "John's Organisation");
    assert_eq!(orgs[0].description, "Default organisation for John Doe");

    // The issued token speaks for the new user
    let claims = env.tokens.verify(&token.access_token).unwrap();
    assert_eq!(claims.sub, user.id);
    assert_eq!(claims.email, user.email);
}

#[tokio::test]
async fn test_registration_persists_nothing_when_atomic_write_fails() {
    let env = TestEnv::new();
    env.store.fail_atomic_writes.store(true, Ordering::SeqCst);

    let result = env
        .auth
        .register(registration("John", "Doe", "johndoe@email.com"))
        .await;

    assert!(result.is_err());
    // No orphan user without a default organisation
    assert_eq!(env.store.user_count(), 0);
    assert_eq!(env.store.org_count(), 0);
    assert_eq!(env.store.membership_count(), 0);
}

#[tokio::test]
async fn test_duplicate_email_registration_is_conflict() {
    let env = TestEnv::new();

    env.auth
        .register(registration("John", "Doe", "a@x.com"))
        .await
        .unwrap();

    let result = env
        .auth
        .register(registration("Jane", "Doe", "a@x.com"))
        .await;

    match result {
        Err(AppError::Conflict(field)) => assert_eq!(field, "email"),
        other => panic!("expected Conflict, got {:?}", other.map(|(u, _)| u.email)),
    }

    // The failed registration left nothing behind
    assert_eq!(env.store.user_count(), 1);
    assert_eq!(env.store.org_count(), 1);
}

// =============================================================================
// Login
// =============================================================================

#[tokio::test]
async fn test_login_returns_token_for_valid_credentials() {
    let env = TestEnv::new();
    let (user, _) = env
        .auth
        .register(registration("John", "Doe", "johndoe@email.com"))
        .await
        .unwrap();

    let (logged_in, token) = env
        .auth
        .login("johndoe@email.com".to_string(), "C0mpl3xP@ssw0rd".to_string())
        .await
        .unwrap();

    assert_eq!(logged_in.id, user.id);
    let claims = env.tokens.verify(&token.access_token).unwrap();
    assert_eq!(claims.sub, user.id);
}

#[tokio::test]
async fn test_login_rejects_wrong_password_and_unknown_email() {
    let env = TestEnv::new();
    env.auth
        .register(registration("John", "Doe", "johndoe@email.com"))
        .await
        .unwrap();

    let wrong_password = env
        .auth
        .login("johndoe@email.com".to_string(), "Wr0ngP@ssword!".to_string())
        .await;
    assert!(matches!(wrong_password, Err(AppError::InvalidCredentials)));

    let unknown_email = env
        .auth
        .login("nobody@email.com".to_string(), "C0mpl3xP@ssw0rd".to_string())
        .await;
    assert!(matches!(unknown_email, Err(AppError::InvalidCredentials)));
}

// =============================================================================
// User visibility
// =============================================================================

#[tokio::test]
async fn test_self_access_always_succeeds() {
    let env = TestEnv::new();
    let (user, _) = env
        .auth
        .register(registration("John", "Doe", "johndoe@email.com"))
        .await
        .unwrap();

    let fetched = env.access.get_user(user.id, user.id).await.unwrap();
    assert_eq!(fetched.id, user.id);
    assert_eq!(fetched.email, "johndoe@email.com");
}

#[tokio::test]
async fn test_cross_tenant_user_read_is_concealed_as_not_found() {
    let env = TestEnv::new();
    let (john, _) = env
        .auth
        .register(registration("John", "Doe", "johndoe@email.com"))
        .await
        .unwrap();
    let (jane, _) = env
        .auth
        .register(registration("Jane", "Doe", "janedoe@email.com"))
        .await
        .unwrap();

    // No shared organisation in either direction
    let result = env.access.get_user(john.id, jane.id).await;
    assert!(matches!(result, Err(AppError::NotFound)));

    let result = env.access.get_user(jane.id, john.id).await;
    assert!(matches!(result, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_shared_organisation_grants_user_visibility() {
    let env = TestEnv::new();
    let (john, _) = env
        .auth
        .register(registration("John", "Doe", "johndoe@email.com"))
        .await
        .unwrap();
    let (juliet, _) = env
        .auth
        .register(registration("Juliet", "Doe", "julietdoe@email.com"))
        .await
        .unwrap();

    let org = env
        .access
        .create_organisation(
            john.id,
            NewOrganisation {
                name: "Test Organisation".to_string(),
                description: "Shared org".to_string(),
            },
        )
        .await
        .unwrap();
    env.access.add_member(org.id, juliet.id).await.unwrap();

    // Visibility now holds in both directions
    let fetched = env.access.get_user(john.id, juliet.id).await.unwrap();
    assert_eq!(fetched.id, juliet.id);
    let fetched = env.access.get_user(juliet.id, john.id).await.unwrap();
    assert_eq!(fetched.id, john.id);
}

#[tokio::test]
async fn test_shares_organisation_is_symmetric_over_the_store() {
    let env = TestEnv::new();
    let (john, _) = env
        .auth
        .register(registration("John", "Doe", "johndoe@email.com"))
        .await
        .unwrap();
    let (jane, _) = env
        .auth
        .register(registration("Jane", "Doe", "janedoe@email.com"))
        .await
        .unwrap();

    assert_eq!(
        env.resolver
            .shares_organisation(john.id, jane.id)
            .await
            .unwrap(),
        env.resolver
            .shares_organisation(jane.id, john.id)
            .await
            .unwrap()
    );

    let org = env
        .access
        .create_organisation(
            john.id,
            NewOrganisation {
                name: "Test Organisation".to_string(),
                description: "Shared org".to_string(),
            },
        )
        .await
        .unwrap();
    env.access.add_member(org.id, jane.id).await.unwrap();

    assert!(env
        .resolver
        .shares_organisation(john.id, jane.id)
        .await
        .unwrap());
    assert!(env
        .resolver
        .shares_organisation(jane.id, john.id)
        .await
        .unwrap());
}

// =============================================================================
// Organisation visibility
// =============================================================================

#[tokio::test]
async fn test_organisation_read_distinguishes_absent_from_forbidden() {
    let env = TestEnv::new();
    let (john, _) = env
        .auth
        .register(registration("John", "Doe", "johndoe@email.com"))
        .await
        .unwrap();
    let (jane, _) = env
        .auth
        .register(registration("Jane", "Doe", "janedoe@email.com"))
        .await
        .unwrap();

    let org = env
        .access
        .create_organisation(
            john.id,
            NewOrganisation {
                name: "John's Second Organisation".to_string(),
                description: "Private".to_string(),
            },
        )
        .await
        .unwrap();

    // A real organisation the caller is not in: existence acknowledged,
    // access denied
    let result = env.access.get_organisation(jane.id, org.id).await;
    assert!(matches!(result, Err(AppError::Forbidden)));

    // A nonexistent organisation: absent
    let result = env
        .access
        .get_organisation(jane.id, uuid::Uuid::new_v4())
        .await;
    assert!(matches!(result, Err(AppError::NotFound)));

    // The creator reads it back
    let fetched = env.access.get_organisation(john.id, org.id).await.unwrap();
    assert_eq!(fetched.id, org.id);
}

#[tokio::test]
async fn test_added_member_gains_organisation_access() {
    let env = TestEnv::new();
    let (x, _) = env
        .auth
        .register(registration("Xavier", "Doe", "x@email.com"))
        .await
        .unwrap();
    let (y, _) = env
        .auth
        .register(registration("Yvonne", "Doe", "y@email.com"))
        .await
        .unwrap();
    let (z, _) = env
        .auth
        .register(registration("Zara", "Doe", "z@email.com"))
        .await
        .unwrap();

    let org = env
        .access
        .create_organisation(
            x.id,
            NewOrganisation {
                name: "O".to_string(),
                description: "X's org".to_string(),
            },
        )
        .await
        .unwrap();

    // Y shares nothing with X
    assert!(matches!(
        env.access.get_organisation(y.id, org.id).await,
        Err(AppError::Forbidden)
    ));

    // Z is added and can now read the organisation
    env.access.add_member(org.id, z.id).await.unwrap();
    let fetched = env.access.get_organisation(z.id, org.id).await.unwrap();
    assert_eq!(fetched.name, "O");

    // And Z shows up in the member listing
    let members = env.access.list_members(x.id, org.id).await.unwrap();
    let member_ids: Vec<_> = members.iter().map(|m| m.id).collect();
    assert!(member_ids.contains(&x.id));
    assert!(member_ids.contains(&z.id));
    assert!(!member_ids.contains(&y.id));
}

// =============================================================================
// Membership writes
// =============================================================================

#[tokio::test]
async fn test_duplicate_membership_insert_is_idempotent() {
    let env = TestEnv::new();
    let (john, _) = env
        .auth
        .register(registration("John", "Doe", "johndoe@email.com"))
        .await
        .unwrap();
    let (jane, _) = env
        .auth
        .register(registration("Jane", "Doe", "janedoe@email.com"))
        .await
        .unwrap();

    let org = env
        .access
        .create_organisation(
            john.id,
            NewOrganisation {
                name: "Test Organisation".to_string(),
                description: "Org".to_string(),
            },
        )
        .await
        .unwrap();

    let before = env.store.membership_count();
    env.access.add_member(org.id, jane.id).await.unwrap();
    env.access.add_member(org.id, jane.id).await.unwrap();
    assert_eq!(env.store.membership_count(), before + 1);
}

#[tokio::test]
async fn test_add_member_validates_referenced_entities() {
    let env = TestEnv::new();
    let (john, _) = env
        .auth
        .register(registration("John", "Doe", "johndoe@email.com"))
        .await
        .unwrap();

    let org = env
        .access
        .create_organisation(
            john.id,
            NewOrganisation {
                name: "Test Organisation".to_string(),
                description: "Org".to_string(),
            },
        )
        .await
        .unwrap();

    // Missing organisation
    let result = env
        .access
        .add_member(uuid::Uuid::new_v4(), john.id)
        .await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    // Missing user
    let result = env.access.add_member(org.id, uuid::Uuid::new_v4()).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));
}

#[tokio::test]
async fn test_create_organisation_persists_nothing_when_atomic_write_fails() {
    let env = TestEnv::new();
    let (john, _) = env
        .auth
        .register(registration("John", "Doe", "johndoe@email.com"))
        .await
        .unwrap();

    let orgs_before = env.store.org_count();
    let memberships_before = env.store.membership_count();

    env.store.fail_atomic_writes.store(true, Ordering::SeqCst);
    let result = env
        .access
        .create_organisation(
            john.id,
            NewOrganisation {
                name: "Doomed".to_string(),
                description: "Never persists".to_string(),
            },
        )
        .await;

    assert!(result.is_err());
    // No organisation with zero members
    assert_eq!(env.store.org_count(), orgs_before);
    assert_eq!(env.store.membership_count(), memberships_before);
}
