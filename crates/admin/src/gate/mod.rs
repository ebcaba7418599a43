//! The access gate for the admin back office.
//!
//! One navigation attempt into the protected area produces exactly one
//! of three outcomes: still checking, authorized, or denied. The
//! decision consults up to three authority sources in a fixed fallback
//! order (fastest and most trusted first):
//!
//! 1. the legacy flag in the visitor's client-local store,
//! 2. the current session at the hosted auth service,
//! 3. the `admins` row for that session's identity.
//!
//! The whole chain is a single predicate over three seams
//! ([`FlagStore`], [`AuthBackend`], [`AdminDirectory`]) so it can be
//! unit-tested without any web machinery. Every external failure
//! collapses to a denial: the gate fails closed and never surfaces an
//! error to its caller.

mod adapters;

pub use adapters::{CookieFlagStore, TokenAuthBackend};

use core::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use thiserror::Error;
use tokio::task::JoinHandle;

use souk_sparkle_core::UserId;

use crate::config::ServiceLogin;
use crate::models::AdminRecord;
use crate::supabase::Session;

/// Client-local store key of the legacy flag.
pub const LEGACY_FLAG_KEY: &str = "admin_logged_in";

/// The only value of the legacy flag that authorizes. Anything else,
/// including casing variants, is treated as absent.
pub const LEGACY_FLAG_TRUE: &str = "true";

/// The gate's ternary contract with the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// Decision not yet settled; render a placeholder.
    Checking,
    /// Terminal: render the protected content.
    Authorized,
    /// Terminal: redirect to the login entry point.
    Denied,
}

impl fmt::Display for GateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Checking => f.write_str("checking"),
            Self::Authorized => f.write_str("authorized"),
            Self::Denied => f.write_str("denied"),
        }
    }
}

/// Why the gate denied. Diagnostic only: every reason produces the same
/// user-visible redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// An external call failed; the gate fails closed.
    ExternalService,
    /// No session exists at the auth service.
    NotAuthenticated,
    /// A session exists but no admin row references its identity.
    NotAuthorized,
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExternalService => f.write_str("external service failure"),
            Self::NotAuthenticated => f.write_str("not authenticated"),
            Self::NotAuthorized => f.write_str("not authorized"),
        }
    }
}

/// Opaque failure of an authority source. The gate never inspects it
/// beyond logging; any error means "not authorized".
#[derive(Debug, Error)]
#[error("external service failure: {0}")]
pub struct ExternalServiceError(pub Box<dyn std::error::Error + Send + Sync>);

impl From<crate::supabase::SupabaseError> for ExternalServiceError {
    fn from(e: crate::supabase::SupabaseError) -> Self {
        Self(Box::new(e))
    }
}

/// The hosted auth service, as the gate sees it.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// The current session, if one exists.
    async fn get_session(&self) -> Result<Option<Session>, ExternalServiceError>;

    /// Establish a session with credentials. Used only by the
    /// best-effort background sign-in on the legacy fast path.
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, ExternalServiceError>;
}

/// The `admins` table, as the gate sees it.
#[async_trait]
pub trait AdminDirectory: Send + Sync {
    /// The admin row referencing an identity, if any.
    async fn find_by_user_id(
        &self,
        user_id: UserId,
    ) -> Result<Option<AdminRecord>, ExternalServiceError>;
}

/// Client-local persistent storage, as the gate sees it.
#[async_trait]
pub trait FlagStore: Send + Sync {
    /// Read a stored value.
    async fn get_item(&self, key: &str) -> Option<String>;
    /// Store a value.
    async fn set_item(&self, key: &str, value: &str);
    /// Delete a stored value.
    async fn remove_item(&self, key: &str);
}

/// Which authority source authorized the visitor.
#[derive(Debug, Clone)]
pub enum AuthorizedVia {
    /// The legacy flag was set; no backend call gated the decision.
    LegacyFlag,
    /// A session plus a matching admin row.
    Session(AdminRecord),
}

/// Handle to the fire-and-forget sign-in spawned on the legacy fast
/// path. The task runs detached; the handle exists so diagnostics and
/// tests can observe completion instead of losing it to the void.
pub struct BackgroundSignIn {
    handle: JoinHandle<bool>,
}

impl BackgroundSignIn {
    /// Wait for the task and report whether the sign-in succeeded.
    /// Failure is expected and non-fatal.
    pub async fn completed(self) -> bool {
        self.handle.await.unwrap_or(false)
    }

    /// Let the task finish on its own.
    pub fn detach(self) {
        drop(self.handle);
    }
}

/// Terminal result of one gate evaluation.
pub enum GateOutcome {
    /// Render the protected content.
    Authorized {
        /// Which authority source decided.
        via: AuthorizedVia,
        /// Background sign-in, when the legacy path fired one.
        background: Option<BackgroundSignIn>,
    },
    /// Redirect to the login entry point.
    Denied(DenyReason),
}

impl GateOutcome {
    /// The terminal [`GateState`] of this outcome.
    #[must_use]
    pub const fn state(&self) -> GateState {
        match self {
            Self::Authorized { .. } => GateState::Authorized,
            Self::Denied(_) => GateState::Denied,
        }
    }

    /// Whether the visitor may enter.
    #[must_use]
    pub const fn is_authorized(&self) -> bool {
        matches!(self, Self::Authorized { .. })
    }
}

/// The authorization predicate, evaluated once per navigation attempt.
///
/// No outcome is cached: repeated attempts repeat the full chain against
/// current external state.
pub struct AccessGate {
    backend: Arc<dyn AuthBackend>,
    admins: Arc<dyn AdminDirectory>,
    service_login: Option<ServiceLogin>,
}

impl AccessGate {
    /// Assemble a gate over its three authority sources.
    ///
    /// `service_login` powers the best-effort background sign-in on the
    /// legacy fast path; without it the fast path still authorizes, it
    /// just skips the sign-in.
    #[must_use]
    pub fn new(
        backend: Arc<dyn AuthBackend>,
        admins: Arc<dyn AdminDirectory>,
        service_login: Option<ServiceLogin>,
    ) -> Self {
        Self {
            backend,
            admins,
            service_login,
        }
    }

    /// Run the decision chain: legacy flag, then session, then admin
    /// row. Fails closed on any error.
    pub async fn evaluate(&self, flags: &dyn FlagStore) -> GateOutcome {
        tracing::debug!(state = %GateState::Checking, "access gate evaluation started");

        // Authority source 1: the legacy flag. Trusted unconditionally;
        // the session chain is never consulted when it is set.
        if flags.get_item(LEGACY_FLAG_KEY).await.as_deref() == Some(LEGACY_FLAG_TRUE) {
            tracing::debug!(state = %GateState::Authorized, via = "legacy_flag", "access granted");
            return GateOutcome::Authorized {
                via: AuthorizedVia::LegacyFlag,
                background: self.spawn_background_sign_in(),
            };
        }

        // Authority source 2: the session.
        let session = match self.backend.get_session().await {
            Ok(Some(session)) => session,
            Ok(None) => return Self::deny(DenyReason::NotAuthenticated),
            Err(error) => {
                tracing::warn!(%error, "session lookup failed");
                return Self::deny(DenyReason::ExternalService);
            }
        };

        // Authority source 3: the admin row for the session's identity.
        match self.admins.find_by_user_id(session.user_id()).await {
            Ok(Some(record)) => {
                tracing::debug!(
                    state = %GateState::Authorized,
                    via = "session",
                    admin = %record.id,
                    "access granted"
                );
                GateOutcome::Authorized {
                    via: AuthorizedVia::Session(record),
                    background: None,
                }
            }
            Ok(None) => Self::deny(DenyReason::NotAuthorized),
            Err(error) => {
                tracing::warn!(%error, "admin lookup failed");
                Self::deny(DenyReason::ExternalService)
            }
        }
    }

    fn deny(reason: DenyReason) -> GateOutcome {
        tracing::debug!(state = %GateState::Denied, %reason, "access denied");
        GateOutcome::Denied(reason)
    }

    /// Fire the best-effort sign-in that satisfies downstream row-level
    /// security after a legacy-flag entry. Deliberately not awaited so
    /// it can never block or change the decision.
    fn spawn_background_sign_in(&self) -> Option<BackgroundSignIn> {
        let login = self.service_login.clone()?;
        let backend = Arc::clone(&self.backend);

        let handle = tokio::spawn(async move {
            match backend
                .sign_in_with_password(&login.email, login.password.expose_secret())
                .await
            {
                Ok(_) => {
                    tracing::debug!("background sign-in completed");
                    true
                }
                Err(error) => {
                    // Non-fatal: the visitor is already authorized.
                    tracing::warn!(%error, "background sign-in failed");
                    false
                }
            }
        });

        Some(BackgroundSignIn { handle })
    }
}
