//! Authentication middleware and extractors.
//!
//! [`RequireAdminAccess`] is the router-facing face of the access gate:
//! handlers that take it render only for authorized visitors, everyone
//! else is redirected to the login entry point (or receives 401 on API
//! paths). Handlers never see why a visitor was denied.

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use serde::Serialize;
use tower_sessions::Session;

use crate::gate::{
    AccessGate, AdminDirectory, AuthorizedVia, CookieFlagStore, FlagStore, GateOutcome,
    LEGACY_FLAG_KEY, TokenAuthBackend,
};
use crate::models::{AdminRecord, CurrentAdmin, session_keys};
use crate::state::AppState;
use crate::supabase;

/// Who passed the gate.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AdminIdentity {
    /// Entered via the legacy flag; no backend identity is attached.
    Legacy,
    /// Entered via a backend session plus admin row.
    Admin(CurrentAdmin),
}

impl AdminIdentity {
    /// Name to show in the back-office chrome.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self {
            Self::Legacy => "admin",
            Self::Admin(admin) => &admin.username,
        }
    }

    /// Role label to show next to the name.
    #[must_use]
    pub const fn role_label(&self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::Admin(admin) => {
                if admin.role.is_super() {
                    "super_admin"
                } else {
                    "admin"
                }
            }
        }
    }
}

/// Extractor that runs the access gate for the current visitor.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAdminAccess(identity): RequireAdminAccess,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", identity.display_name())
/// }
/// ```
pub struct RequireAdminAccess(pub AdminIdentity);

/// Error returned when the gate denies.
pub enum GateRejection {
    /// Redirect to the login entry point (for HTML requests).
    RedirectToLogin,
    /// Unauthorized response (for API requests).
    Unauthorized,
}

impl IntoResponse for GateRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/admin").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

impl FromRequestParts<AppState> for RequireAdminAccess {
    type Rejection = GateRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Session comes from extensions (set by SessionManagerLayer).
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(GateRejection::Unauthorized)?;

        let access_token = session
            .get::<String>(session_keys::ACCESS_TOKEN)
            .await
            .ok()
            .flatten();

        let client = state.supabase().clone();
        let gate = AccessGate::new(
            Arc::new(TokenAuthBackend::new(client.clone(), access_token)),
            Arc::new(client) as Arc<dyn AdminDirectory>,
            state.config().service_login.clone(),
        );
        let flags = CookieFlagStore::new(session);

        match gate.evaluate(&flags).await {
            GateOutcome::Authorized { via, background } => {
                // The sign-in keeps running after the response is sent.
                if let Some(task) = background {
                    task.detach();
                }
                let identity = match via {
                    AuthorizedVia::LegacyFlag => AdminIdentity::Legacy,
                    AuthorizedVia::Session(record) => {
                        AdminIdentity::Admin(CurrentAdmin::from(&record))
                    }
                };
                Ok(Self(identity))
            }
            GateOutcome::Denied(_) => Err(rejection_for_path(parts.uri.path())),
        }
    }
}

/// Shape of a denial depends on the route: API paths get a bare 401,
/// page paths get sent back to the login form.
fn rejection_for_path(path: &str) -> GateRejection {
    if path.starts_with("/admin/api/") {
        GateRejection::Unauthorized
    } else {
        GateRejection::RedirectToLogin
    }
}

/// Store a successful backend login in the visitor's session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn store_login(
    session: &Session,
    backend_session: &supabase::Session,
    record: &AdminRecord,
) -> Result<(), tower_sessions::session::Error> {
    session
        .insert(session_keys::ACCESS_TOKEN, &backend_session.access_token)
        .await?;
    session
        .insert(session_keys::CURRENT_ADMIN, CurrentAdmin::from(record))
        .await
}

/// Clear every authentication trace from the visitor's session: legacy
/// flag, access token and cached identity.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_login(session: &Session) -> Result<(), tower_sessions::session::Error> {
    CookieFlagStore::new(session.clone())
        .remove_item(LEGACY_FLAG_KEY)
        .await;
    session.remove::<String>(session_keys::ACCESS_TOKEN).await?;
    session
        .remove::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
        .await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::header;

    #[test]
    fn test_denied_api_path_gets_unauthorized() {
        let response = rejection_for_path("/admin/api/me").into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_denied_page_path_redirects_to_login() {
        let response = rejection_for_path("/admin/dashboard").into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/admin"
        );
    }

    #[test]
    fn test_api_prefix_must_match_exactly() {
        // Sibling paths that merely contain "api" stay on the page rule.
        for path in ["/admin", "/admin/apikeys", "/api/admin"] {
            assert!(matches!(
                rejection_for_path(path),
                GateRejection::RedirectToLogin
            ));
        }
    }
}
