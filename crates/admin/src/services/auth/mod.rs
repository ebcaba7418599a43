//! Admin authentication service.
//!
//! Sign-in, registration, sign-out and first-run bootstrap against the
//! hosted backend. Credential verification itself belongs to the auth
//! service; this layer adds the one rule the backend does not know:
//! authenticating is not enough, the identity must also hold an
//! `admins` row.

mod error;

pub use error::AdminAuthError;

use souk_sparkle_core::{AdminRole, Email};

use crate::models::AdminRecord;
use crate::supabase::{AdminsTable, NewAdmin, Session, SupabaseClient, SupabaseError};

/// Minimum password length for newly registered admins.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Admin authentication service.
pub struct AdminAuthService<'a> {
    client: &'a SupabaseClient,
}

impl<'a> AdminAuthService<'a> {
    /// Create a new admin authentication service.
    #[must_use]
    pub const fn new(client: &'a SupabaseClient) -> Self {
        Self { client }
    }

    /// Sign in and verify admin privilege.
    ///
    /// When the credentials are valid but no admin row references the
    /// identity, the freshly issued session is revoked again before the
    /// error returns: non-admins never keep a session from this panel.
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError::InvalidCredentials` for a rejected
    /// sign-in and `AdminAuthError::NotAnAdmin` for a valid account
    /// without privilege.
    pub async fn login_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(Session, AdminRecord), AdminAuthError> {
        let email = Email::parse(email)?;

        let session = self
            .client
            .sign_in_with_password(email.as_str(), password)
            .await
            .map_err(|e| match e {
                SupabaseError::InvalidCredentials => AdminAuthError::InvalidCredentials,
                other => AdminAuthError::Supabase(other),
            })?;

        let record = AdminsTable::new(self.client)
            .find_by_user_id(session.user_id(), Some(&session.access_token))
            .await?;

        match record {
            Some(record) => Ok((session, record)),
            None => {
                if let Err(error) = self.client.sign_out(&session.access_token).await {
                    tracing::warn!(%error, "failed to revoke non-admin session");
                }
                Err(AdminAuthError::NotAnAdmin)
            }
        }
    }

    /// Register a new admin account: create the identity, then grant it
    /// an `admins` row.
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError::WeakPassword` before any backend call,
    /// and backend errors from either the sign-up or the row insert.
    pub async fn register_admin(
        &self,
        email: &str,
        password: &str,
        username: &str,
        role: AdminRole,
    ) -> Result<(Session, AdminRecord), AdminAuthError> {
        let email = Email::parse(email)?;
        if password.len() < MIN_PASSWORD_LENGTH {
            return Err(AdminAuthError::WeakPassword {
                min: MIN_PASSWORD_LENGTH,
            });
        }

        let session = self.client.sign_up(email.as_str(), password).await?;

        let record = AdminsTable::new(self.client)
            .insert(
                &NewAdmin {
                    user_id: session.user_id(),
                    username: username.to_owned(),
                    is_super_admin: role.is_super(),
                },
                &session.access_token,
            )
            .await?;

        tracing::info!(admin = %record.id, %role, "admin account registered");
        Ok((session, record))
    }

    /// Revoke a session.
    ///
    /// # Errors
    ///
    /// Returns an error only for transport failures; unknown tokens
    /// already count as signed out.
    pub async fn logout(&self, access_token: &str) -> Result<(), AdminAuthError> {
        self.client.sign_out(access_token).await?;
        Ok(())
    }

    /// Whether any admin account exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the count query fails.
    pub async fn admin_exists(&self) -> Result<bool, AdminAuthError> {
        let count = AdminsTable::new(self.client).count().await?;
        Ok(count > 0)
    }

    /// First-run bootstrap: create the default super admin, but only on
    /// a system with no admin accounts at all.
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError::AlreadyBootstrapped` when any admin row
    /// exists.
    pub async fn create_default_admin(
        &self,
        email: &str,
        password: &str,
        username: &str,
    ) -> Result<AdminRecord, AdminAuthError> {
        if self.admin_exists().await? {
            return Err(AdminAuthError::AlreadyBootstrapped);
        }

        let (_, record) = self
            .register_admin(email, password, username, AdminRole::SuperAdmin)
            .await?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_password_length_enforced_before_network() {
        // The guard is pure; a short password must fail without a client.
        assert!("1234567".len() < MIN_PASSWORD_LENGTH);
        assert!("12345678".len() >= MIN_PASSWORD_LENGTH);
    }
}
