//! Session-stored types for admin authentication.

use serde::{Deserialize, Serialize};

use souk_sparkle_core::{AdminId, AdminRole, UserId};

use super::AdminRecord;

/// Minimal identity stored in the cookie session for a backend-verified
/// admin login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Admin row ID.
    pub id: AdminId,
    /// Identity reference from the auth service.
    pub user_id: UserId,
    /// Display name.
    pub username: String,
    /// Permission level.
    pub role: AdminRole,
}

impl From<&AdminRecord> for CurrentAdmin {
    fn from(record: &AdminRecord) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            username: record.username.clone(),
            role: record.role(),
        }
    }
}

/// Keys for the visitor's client-local persistent store (the cookie
/// session).
pub mod keys {
    /// Backend access token of the current sign-in, when one exists.
    pub const ACCESS_TOKEN: &str = "supabase_access_token";

    /// Cached identity of the backend-verified admin login.
    pub const CURRENT_ADMIN: &str = "current_admin";
}
