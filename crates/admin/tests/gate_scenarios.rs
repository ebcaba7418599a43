//! Integration tests for the admin access gate.
//!
//! These tests drive the full decision chain through in-memory fakes of
//! the three authority sources, without any web machinery or a live
//! backend.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use secrecy::SecretString;

use souk_sparkle_admin::config::ServiceLogin;
use souk_sparkle_admin::gate::{
    AccessGate, AdminDirectory, AuthBackend, AuthorizedVia, DenyReason, ExternalServiceError,
    FlagStore, GateOutcome, GateState, LEGACY_FLAG_KEY, LEGACY_FLAG_TRUE,
};
use souk_sparkle_admin::models::AdminRecord;
use souk_sparkle_admin::supabase::{AuthUser, Session};
use souk_sparkle_core::{AdminId, UserId};

// =============================================================================
// Test Fakes
// =============================================================================

fn opaque_error(message: &str) -> ExternalServiceError {
    ExternalServiceError(message.to_owned().into())
}

fn session_for(user_id: UserId) -> Session {
    Session {
        access_token: "test-token".to_owned(),
        user: AuthUser {
            id: user_id,
            email: Some("admin@example.com".to_owned()),
        },
    }
}

fn record_for(user_id: UserId) -> AdminRecord {
    AdminRecord {
        id: AdminId::random(),
        user_id,
        username: "admin".to_owned(),
        is_super_admin: false,
        created_at: None,
    }
}

/// Scripted auth service: returns a fixed session result and counts
/// sign-in attempts.
struct FakeBackend {
    session: Result<Option<Session>, String>,
    sign_in_succeeds: bool,
    sign_in_calls: AtomicUsize,
}

impl FakeBackend {
    fn with_session(session: Session) -> Self {
        Self {
            session: Ok(Some(session)),
            sign_in_succeeds: true,
            sign_in_calls: AtomicUsize::new(0),
        }
    }

    fn without_session() -> Self {
        Self {
            session: Ok(None),
            sign_in_succeeds: true,
            sign_in_calls: AtomicUsize::new(0),
        }
    }

    fn failing() -> Self {
        Self {
            session: Err("connection refused".to_owned()),
            sign_in_succeeds: false,
            sign_in_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl AuthBackend for FakeBackend {
    async fn get_session(&self) -> Result<Option<Session>, ExternalServiceError> {
        match &self.session {
            Ok(session) => Ok(session.clone()),
            Err(message) => Err(opaque_error(message)),
        }
    }

    async fn sign_in_with_password(
        &self,
        _email: &str,
        _password: &str,
    ) -> Result<Session, ExternalServiceError> {
        self.sign_in_calls.fetch_add(1, Ordering::SeqCst);
        if self.sign_in_succeeds {
            Ok(session_for(UserId::random()))
        } else {
            Err(opaque_error("sign-in rejected"))
        }
    }
}

/// Scripted admins table: one optional row, with a call counter to
/// prove the legacy fast path never consults it.
struct FakeDirectory {
    record: Result<Option<AdminRecord>, String>,
    lookups: AtomicUsize,
}

impl FakeDirectory {
    fn with_record(record: AdminRecord) -> Self {
        Self {
            record: Ok(Some(record)),
            lookups: AtomicUsize::new(0),
        }
    }

    fn empty() -> Self {
        Self {
            record: Ok(None),
            lookups: AtomicUsize::new(0),
        }
    }

    fn failing() -> Self {
        Self {
            record: Err("table unavailable".to_owned()),
            lookups: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl AdminDirectory for FakeDirectory {
    async fn find_by_user_id(
        &self,
        _user_id: UserId,
    ) -> Result<Option<AdminRecord>, ExternalServiceError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        match &self.record {
            Ok(record) => Ok(record.clone()),
            Err(message) => Err(opaque_error(message)),
        }
    }
}

/// In-memory stand-in for the visitor's client-local store.
#[derive(Default)]
struct MemoryFlags {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryFlags {
    fn with_legacy_flag(value: &str) -> Self {
        let flags = Self::default();
        flags
            .items
            .lock()
            .unwrap()
            .insert(LEGACY_FLAG_KEY.to_owned(), value.to_owned());
        flags
    }
}

#[async_trait]
impl FlagStore for MemoryFlags {
    async fn get_item(&self, key: &str) -> Option<String> {
        self.items.lock().unwrap().get(key).cloned()
    }

    async fn set_item(&self, key: &str, value: &str) {
        self.items
            .lock()
            .unwrap()
            .insert(key.to_owned(), value.to_owned());
    }

    async fn remove_item(&self, key: &str) {
        self.items.lock().unwrap().remove(key);
    }
}

fn service_login() -> ServiceLogin {
    ServiceLogin {
        email: "service@example.com".to_owned(),
        password: SecretString::from("service-password".to_owned()),
    }
}

fn gate(backend: FakeBackend, admins: FakeDirectory) -> AccessGate {
    AccessGate::new(
        std::sync::Arc::new(backend),
        std::sync::Arc::new(admins),
        None,
    )
}

// =============================================================================
// Legacy Flag Fast Path
// =============================================================================

#[tokio::test]
async fn test_legacy_flag_authorizes_without_backend_calls() {
    let admins = FakeDirectory::empty();
    let lookups_handle = std::sync::Arc::new(admins);
    let gate = AccessGate::new(
        std::sync::Arc::new(FakeBackend::failing()),
        lookups_handle.clone(),
        None,
    );
    let flags = MemoryFlags::with_legacy_flag(LEGACY_FLAG_TRUE);

    let outcome = gate.evaluate(&flags).await;

    assert!(outcome.is_authorized());
    assert!(matches!(
        outcome,
        GateOutcome::Authorized {
            via: AuthorizedVia::LegacyFlag,
            ..
        }
    ));
    // The admins table is never consulted on the fast path.
    assert_eq!(lookups_handle.lookups.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_legacy_flag_value_must_be_exact() {
    for value in ["TRUE", "True", "1", "yes", ""] {
        let gate = gate(FakeBackend::without_session(), FakeDirectory::empty());
        let flags = MemoryFlags::with_legacy_flag(value);

        let outcome = gate.evaluate(&flags).await;

        assert!(
            matches!(outcome, GateOutcome::Denied(DenyReason::NotAuthenticated)),
            "flag value {value:?} must not authorize"
        );
    }
}

#[tokio::test]
async fn test_removed_flag_falls_through_to_session_chain() {
    let user_id = UserId::random();
    let gate = gate(
        FakeBackend::with_session(session_for(user_id)),
        FakeDirectory::with_record(record_for(user_id)),
    );
    let flags = MemoryFlags::with_legacy_flag(LEGACY_FLAG_TRUE);
    flags.remove_item(LEGACY_FLAG_KEY).await;

    let outcome = gate.evaluate(&flags).await;

    assert!(matches!(
        outcome,
        GateOutcome::Authorized {
            via: AuthorizedVia::Session(_),
            ..
        }
    ));
}

// =============================================================================
// Session Chain
// =============================================================================

#[tokio::test]
async fn test_session_with_admin_record_authorizes() {
    let user_id = UserId::random();
    let record = record_for(user_id);
    let expected_admin = record.id;
    let gate = gate(
        FakeBackend::with_session(session_for(user_id)),
        FakeDirectory::with_record(record),
    );

    let outcome = gate.evaluate(&MemoryFlags::default()).await;

    match outcome {
        GateOutcome::Authorized {
            via: AuthorizedVia::Session(record),
            background,
        } => {
            assert_eq!(record.id, expected_admin);
            // No background sign-in fires on the session path.
            assert!(background.is_none());
        }
        _ => panic!("expected session authorization"),
    }
}

#[tokio::test]
async fn test_no_session_denies_as_not_authenticated() {
    let gate = gate(FakeBackend::without_session(), FakeDirectory::empty());

    let outcome = gate.evaluate(&MemoryFlags::default()).await;

    assert!(matches!(
        outcome,
        GateOutcome::Denied(DenyReason::NotAuthenticated)
    ));
    assert_eq!(outcome.state(), GateState::Denied);
}

#[tokio::test]
async fn test_session_without_admin_record_denies_as_not_authorized() {
    let user_id = UserId::random();
    let gate = gate(
        FakeBackend::with_session(session_for(user_id)),
        FakeDirectory::empty(),
    );

    let outcome = gate.evaluate(&MemoryFlags::default()).await;

    assert!(matches!(
        outcome,
        GateOutcome::Denied(DenyReason::NotAuthorized)
    ));
}

// =============================================================================
// Fail-Closed Behavior
// =============================================================================

#[tokio::test]
async fn test_session_lookup_failure_fails_closed() {
    let gate = gate(FakeBackend::failing(), FakeDirectory::empty());

    let outcome = gate.evaluate(&MemoryFlags::default()).await;

    assert!(matches!(
        outcome,
        GateOutcome::Denied(DenyReason::ExternalService)
    ));
}

#[tokio::test]
async fn test_admin_lookup_failure_fails_closed() {
    let user_id = UserId::random();
    let gate = gate(
        FakeBackend::with_session(session_for(user_id)),
        FakeDirectory::failing(),
    );

    let outcome = gate.evaluate(&MemoryFlags::default()).await;

    assert!(matches!(
        outcome,
        GateOutcome::Denied(DenyReason::ExternalService)
    ));
}

// =============================================================================
// Idempotence
// =============================================================================

#[tokio::test]
async fn test_repeated_evaluation_repeats_the_outcome() {
    let user_id = UserId::random();
    let gate = gate(
        FakeBackend::with_session(session_for(user_id)),
        FakeDirectory::with_record(record_for(user_id)),
    );
    let flags = MemoryFlags::default();

    let first = gate.evaluate(&flags).await;
    let second = gate.evaluate(&flags).await;

    assert_eq!(first.state(), second.state());
    assert!(first.is_authorized() && second.is_authorized());
}

#[tokio::test]
async fn test_denial_flips_to_authorization_when_external_state_changes() {
    // No caching: a fresh evaluation sees the current external state.
    let user_id = UserId::random();
    let flags = MemoryFlags::default();

    let denied_gate = gate(FakeBackend::without_session(), FakeDirectory::empty());
    assert_eq!(denied_gate.evaluate(&flags).await.state(), GateState::Denied);

    flags.set_item(LEGACY_FLAG_KEY, LEGACY_FLAG_TRUE).await;
    assert_eq!(
        denied_gate.evaluate(&flags).await.state(),
        GateState::Authorized
    );
}

// =============================================================================
// Background Sign-In
// =============================================================================

#[tokio::test]
async fn test_legacy_path_spawns_background_sign_in() {
    let gate = AccessGate::new(
        std::sync::Arc::new(FakeBackend::without_session()),
        std::sync::Arc::new(FakeDirectory::empty()),
        Some(service_login()),
    );
    let flags = MemoryFlags::with_legacy_flag(LEGACY_FLAG_TRUE);

    let outcome = gate.evaluate(&flags).await;

    let GateOutcome::Authorized { background, .. } = outcome else {
        panic!("expected authorization");
    };
    let background = background.expect("legacy path should spawn a sign-in");
    assert!(background.completed().await);
}

#[tokio::test]
async fn test_background_sign_in_failure_does_not_revoke_access() {
    let backend = std::sync::Arc::new(FakeBackend::failing());
    let gate = AccessGate::new(
        backend.clone(),
        std::sync::Arc::new(FakeDirectory::empty()),
        Some(service_login()),
    );
    let flags = MemoryFlags::with_legacy_flag(LEGACY_FLAG_TRUE);

    let outcome = gate.evaluate(&flags).await;
    assert!(outcome.is_authorized());

    let GateOutcome::Authorized { background, .. } = outcome else {
        panic!("expected authorization");
    };
    assert!(!background.unwrap().completed().await);
    assert_eq!(backend.sign_in_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_no_service_login_skips_background_sign_in() {
    let backend = std::sync::Arc::new(FakeBackend::without_session());
    let gate = AccessGate::new(
        backend.clone(),
        std::sync::Arc::new(FakeDirectory::empty()),
        None,
    );
    let flags = MemoryFlags::with_legacy_flag(LEGACY_FLAG_TRUE);

    let outcome = gate.evaluate(&flags).await;

    let GateOutcome::Authorized { background, .. } = outcome else {
        panic!("expected authorization");
    };
    assert!(background.is_none());
    assert_eq!(backend.sign_in_calls.load(Ordering::SeqCst), 0);
}
