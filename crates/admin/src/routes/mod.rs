//! Route handlers for the admin panel.

mod auth;
mod dashboard;

use axum::Router;

use crate::state::AppState;

/// Build the complete admin router.
pub fn routes() -> Router<AppState> {
    Router::new().merge(auth::router()).merge(dashboard::router())
}
