//! Admin role/permission level.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Permission level of an admin account.
///
/// The backing table stores this as the `is_super_admin` boolean, so the
/// enum converts to and from that flag at the table boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    /// Ordinary admin: full back-office access.
    Admin,
    /// Super admin: may additionally manage other admin accounts.
    SuperAdmin,
}

impl AdminRole {
    /// Convert from the `is_super_admin` column value.
    #[must_use]
    pub const fn from_super_flag(is_super_admin: bool) -> Self {
        if is_super_admin {
            Self::SuperAdmin
        } else {
            Self::Admin
        }
    }

    /// Whether this role carries super-admin privilege.
    #[must_use]
    pub const fn is_super(self) -> bool {
        matches!(self, Self::SuperAdmin)
    }
}

impl fmt::Display for AdminRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => f.write_str("admin"),
            Self::SuperAdmin => f.write_str("super_admin"),
        }
    }
}

impl FromStr for AdminRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "super_admin" => Ok(Self::SuperAdmin),
            other => Err(format!("unknown admin role: {other}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_super_flag() {
        assert_eq!(AdminRole::from_super_flag(true), AdminRole::SuperAdmin);
        assert_eq!(AdminRole::from_super_flag(false), AdminRole::Admin);
    }

    #[test]
    fn test_display_parse_round_trip() {
        for role in [AdminRole::Admin, AdminRole::SuperAdmin] {
            let parsed: AdminRole = role.to_string().parse().unwrap();
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!("root".parse::<AdminRole>().is_err());
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&AdminRole::SuperAdmin).unwrap();
        assert_eq!(json, "\"super_admin\"");
    }
}
