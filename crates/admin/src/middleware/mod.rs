//! Middleware for the admin panel.

mod auth;
mod session;

pub use auth::{AdminIdentity, GateRejection, RequireAdminAccess, clear_login, store_login};
pub use session::{SESSION_COOKIE_NAME, create_session_layer};
