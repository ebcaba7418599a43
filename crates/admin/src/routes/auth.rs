//! Authentication route handlers.
//!
//! Two login flows coexist, mirroring the marketplace's history:
//!
//! - the legacy form at `/admin` checks locally configured credentials
//!   and sets the legacy flag in the visitor's session, and
//! - the JSON API at `/admin/api/login` performs a real backend sign-in
//!   and requires an `admins` row.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json, Router,
    extract::{Form, State},
    http::StatusCode,
    response::{IntoResponse, Redirect},
    routing::{get, post},
};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::error::AppError;
use crate::gate::{CookieFlagStore, FlagStore, LEGACY_FLAG_KEY, LEGACY_FLAG_TRUE};
use crate::middleware::{clear_login, store_login};
use crate::models::{CurrentAdmin, session_keys};
use crate::services::AdminAuthService;
use crate::state::AppState;

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
struct LoginPageTemplate {
    error: Option<String>,
}

/// Legacy login form fields.
#[derive(Debug, Deserialize)]
struct LegacyLoginForm {
    username: String,
    password: String,
}

/// Backend login request body.
#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

/// Backend login response body.
#[derive(Debug, Serialize)]
struct LoginResponse {
    admin: CurrentAdmin,
}

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin", get(login_page).post(legacy_login))
        .route("/admin/logout", post(logout))
        .route("/admin/api/login", post(api_login))
        .route("/admin/api/reset", post(reset_auth))
}

/// Render the login page, or skip it for a visitor who is already in.
///
/// GET /admin
async fn login_page(session: Session) -> impl IntoResponse {
    let flags = CookieFlagStore::new(session);
    let already_in = flags.get_item(LEGACY_FLAG_KEY).await.as_deref() == Some(LEGACY_FLAG_TRUE);

    if already_in {
        Redirect::to("/admin/dashboard").into_response()
    } else {
        LoginPageTemplate { error: None }.into_response()
    }
}

/// Legacy credential check: on a match, set the legacy flag and enter.
///
/// POST /admin
async fn legacy_login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LegacyLoginForm>,
) -> impl IntoResponse {
    let matches = state.config().legacy_login.as_ref().is_some_and(|expected| {
        expected.username == form.username && expected.password.expose_secret() == form.password
    });

    if matches {
        // Best-effort write through the same seam the gate reads; if it
        // fails the dashboard bounces the visitor back here.
        CookieFlagStore::new(session)
            .set_item(LEGACY_FLAG_KEY, LEGACY_FLAG_TRUE)
            .await;
        tracing::info!("legacy admin login succeeded");
        Redirect::to("/admin/dashboard").into_response()
    } else {
        tracing::info!("legacy admin login rejected");
        LoginPageTemplate {
            error: Some("Invalid admin credentials".to_owned()),
        }
        .into_response()
    }
}

/// Backend sign-in: authenticate, verify the admin row, cache the
/// result in the session.
///
/// POST /admin/api/login
async fn api_login(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let service = AdminAuthService::new(state.supabase());
    let (backend_session, record) = service
        .login_with_password(&request.email, &request.password)
        .await?;

    store_login(&session, &backend_session, &record)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(LoginResponse {
        admin: CurrentAdmin::from(&record),
    }))
}

/// Sign out: clear the session's auth state and revoke the backend
/// session when one exists.
///
/// POST /admin/logout
async fn logout(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let access_token = session
        .get::<String>(session_keys::ACCESS_TOKEN)
        .await
        .ok()
        .flatten();

    if let Err(error) = clear_login(&session).await {
        tracing::warn!(%error, "failed to clear session on logout");
    }

    if let Some(token) = access_token {
        if let Err(error) = AdminAuthService::new(state.supabase()).logout(&token).await {
            // Best effort; the local session is already gone.
            tracing::warn!(%error, "backend sign-out failed");
        }
    }

    Redirect::to("/admin")
}

/// Completely reset authentication state for this visitor. Escape hatch
/// for when auth gets stuck.
///
/// POST /admin/api/reset
async fn reset_auth(State(state): State<AppState>, session: Session) -> StatusCode {
    let access_token = session
        .get::<String>(session_keys::ACCESS_TOKEN)
        .await
        .ok()
        .flatten();

    if let Some(token) = access_token {
        if let Err(error) = AdminAuthService::new(state.supabase()).logout(&token).await {
            tracing::warn!(%error, "backend sign-out failed during reset");
        }
    }

    if let Err(error) = session.flush().await {
        tracing::warn!(%error, "failed to flush session during reset");
        return StatusCode::INTERNAL_SERVER_ERROR;
    }

    tracing::info!("authentication state reset");
    StatusCode::NO_CONTENT
}
