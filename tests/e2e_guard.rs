//! End-to-end tests for session gating.
//!
//! Drives the guard the way a protected page would: seed storage,
//! evaluate the page's access policy, and resolve a render gate with
//! the decision.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use skillmart::storage::keys;
use skillmart::{
    AccessPolicy, Destination, Gate, GuardDecision, InMemoryStorage, KeyValueStorage, Role,
    SessionGuard, SessionStore, StoredUser,
};

fn seeded_storage() -> Arc<InMemoryStorage> {
    Arc::new(InMemoryStorage::new())
}

#[tokio::test]
async fn visitor_without_token_is_sent_to_login() {
    let storage = seeded_storage();
    let guard = SessionGuard::new(storage);

    let decision = guard.evaluate(&AccessPolicy::require([Role::Student])).await;

    assert_eq!(decision, GuardDecision::Redirect(Destination::Login));

    let mut gate = Gate::new();
    gate.resolve(&decision);
    assert!(!gate.is_open());
}

#[tokio::test]
async fn mentor_session_passes_mentor_or_admin_policy() {
    let storage = seeded_storage();
    storage.set(keys::TOKEN, "abc").await.unwrap();
    storage
        .set(keys::USER, r#"{"role":"mentor"}"#)
        .await
        .unwrap();

    let guard = SessionGuard::new(storage);
    let decision = guard
        .evaluate(&AccessPolicy::from_raw(["mentor", "admin"]))
        .await;

    assert!(decision.is_authorized());
}

#[tokio::test]
async fn student_never_sees_mentor_area() {
    let storage = seeded_storage();
    storage.set(keys::TOKEN, "abc").await.unwrap();
    storage
        .set(keys::USER, r#"{"role":"student"}"#)
        .await
        .unwrap();

    let guard = SessionGuard::new(storage);
    let mut gate = Gate::new();

    let decision = guard.evaluate(&AccessPolicy::require([Role::Mentor])).await;
    gate.resolve(&decision);

    assert_eq!(decision, GuardDecision::Redirect(Destination::StudentHome));
    assert!(!gate.is_open());
}

#[tokio::test]
async fn admin_authorizes_regardless_of_policy() {
    let storage = seeded_storage();
    storage.set(keys::TOKEN, "abc").await.unwrap();
    storage.set(keys::USER, r#"{"role":"admin"}"#).await.unwrap();

    let guard = SessionGuard::new(storage);

    for policy in [
        AccessPolicy::any_authenticated(),
        AccessPolicy::require([Role::Mentor]),
        AccessPolicy::require([Role::Student]),
        AccessPolicy::require([Role::Admin]),
    ] {
        let decision = guard.evaluate(&policy).await;
        assert!(decision.is_authorized(), "admin denied by {policy:?}");
    }
}

#[tokio::test]
async fn legacy_user_role_is_gated_as_student() {
    let storage = seeded_storage();
    storage.set(keys::TOKEN, "abc").await.unwrap();
    storage.set(keys::USER, r#"{"role":"user"}"#).await.unwrap();

    let guard = SessionGuard::new(storage);

    let decision = guard
        .evaluate(&AccessPolicy::from_raw(["student"]))
        .await;
    assert!(decision.is_authorized());

    let decision = guard.evaluate(&AccessPolicy::require([Role::Mentor])).await;
    assert_eq!(decision, GuardDecision::Redirect(Destination::StudentHome));
}

#[tokio::test]
async fn logout_invalidates_subsequent_evaluations() {
    let storage = seeded_storage();
    let sessions = SessionStore::new(storage.clone());
    let user = StoredUser {
        role: Some("mentor".to_owned()),
        name: "Rafiq".to_owned(),
        email: "rafiq@example.com".to_owned(),
    };
    sessions.save("abc", &user).await.unwrap();

    let guard = SessionGuard::new(storage);
    assert!(guard
        .evaluate(&AccessPolicy::require([Role::Mentor]))
        .await
        .is_authorized());

    sessions.clear().await.unwrap();

    let decision = guard.evaluate(&AccessPolicy::require([Role::Mentor])).await;
    assert_eq!(decision, GuardDecision::Redirect(Destination::Login));
}

#[tokio::test]
async fn corrupt_user_record_degrades_to_login_not_panic() {
    let storage = seeded_storage();
    storage.set(keys::TOKEN, "abc").await.unwrap();
    storage.set(keys::USER, "[1,2,3").await.unwrap();

    let guard = SessionGuard::new(storage);
    let decision = guard.evaluate(&AccessPolicy::any_authenticated()).await;

    assert_eq!(decision, GuardDecision::Redirect(Destination::Login));
}

#[tokio::test]
async fn authorized_decision_carries_the_session() {
    let storage = seeded_storage();
    storage.set(keys::TOKEN, "tok-42").await.unwrap();
    storage
        .set(
            keys::USER,
            r#"{"role":"student","name":"Ana","email":"ana@example.com"}"#,
        )
        .await
        .unwrap();

    let guard = SessionGuard::new(storage);
    match guard.evaluate(&AccessPolicy::any_authenticated()).await {
        GuardDecision::Authorized(session) => {
            assert_eq!(session.token, "tok-42");
            assert_eq!(session.user.role, Some(Role::Student));
            assert_eq!(session.user.name, "Ana");
        }
        other => panic!("expected authorization, got {other:?}"),
    }
}
