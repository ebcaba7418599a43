//! The row that grants administrative privilege to an identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use souk_sparkle_core::{AdminId, AdminRole, UserId};

/// A row of the `admins` table.
///
/// Holding a session is not enough to enter the back office; the
/// session's identity must also be referenced by one of these rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminRecord {
    /// Row ID.
    pub id: AdminId,
    /// Identity reference from the auth service.
    pub user_id: UserId,
    /// Display name shown in the back office.
    pub username: String,
    /// Whether the account may manage other admins.
    pub is_super_admin: bool,
    /// When the row was created. Absent on projects that predate the
    /// column.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl AdminRecord {
    /// Permission level derived from the super-admin flag.
    #[must_use]
    pub const fn role(&self) -> AdminRole {
        AdminRole::from_super_flag(self.is_super_admin)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserializes_postgrest_row() {
        let record: AdminRecord = serde_json::from_value(serde_json::json!({
            "id": "3f2c8a90-61a1-4b52-9f6d-6f2fbc5f1d11",
            "user_id": "8e435d46-3c64-4b5e-8f34-4f20d0a0e3a4",
            "username": "amira",
            "is_super_admin": true,
            "created_at": "2024-03-01T10:00:00+00:00"
        }))
        .unwrap();

        assert_eq!(record.username, "amira");
        assert_eq!(record.role(), AdminRole::SuperAdmin);
    }

    #[test]
    fn test_created_at_is_optional() {
        let record: AdminRecord = serde_json::from_value(serde_json::json!({
            "id": "3f2c8a90-61a1-4b52-9f6d-6f2fbc5f1d11",
            "user_id": "8e435d46-3c64-4b5e-8f34-4f20d0a0e3a4",
            "username": "amira",
            "is_super_admin": false
        }))
        .unwrap();

        assert!(record.created_at.is_none());
        assert_eq!(record.role(), AdminRole::Admin);
    }
}
