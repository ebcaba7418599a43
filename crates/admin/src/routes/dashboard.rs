//! Protected back-office routes.
//!
//! Every handler here takes [`RequireAdminAccess`], so the access gate
//! runs before any of them render.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json, Router,
    response::IntoResponse,
    routing::get,
};

use crate::middleware::{AdminIdentity, RequireAdminAccess};
use crate::state::AppState;

/// Dashboard shell template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/home.html")]
struct DashboardTemplate {
    name: String,
    role: String,
}

/// Build the dashboard router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/dashboard", get(dashboard))
        .route("/admin/api/me", get(me))
}

/// Render the dashboard shell.
///
/// GET /admin/dashboard
async fn dashboard(RequireAdminAccess(identity): RequireAdminAccess) -> impl IntoResponse {
    DashboardTemplate {
        name: identity.display_name().to_owned(),
        role: identity.role_label().to_owned(),
    }
}

/// Who am I, as the gate sees it.
///
/// GET /admin/api/me
async fn me(RequireAdminAccess(identity): RequireAdminAccess) -> Json<AdminIdentity> {
    Json(identity)
}
