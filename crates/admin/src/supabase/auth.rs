//! GoTrue auth operations: sign-in, sign-up, sign-out, session lookup.

use core::fmt;

use serde::Deserialize;

use souk_sparkle_core::UserId;

use super::{SupabaseClient, SupabaseError};

/// The authenticated identity behind a session.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    /// Identity reference issued by the auth service.
    pub id: UserId,
    /// Address the account was registered with, when known.
    pub email: Option<String>,
}

/// A server-issued proof of authenticated identity.
///
/// Implements `Debug` manually so the access token never lands in logs.
#[derive(Clone, Deserialize)]
pub struct Session {
    /// Bearer token for row-level-security-scoped requests.
    pub access_token: String,
    /// The identity this session belongs to.
    pub user: AuthUser,
}

impl Session {
    /// Identity reference of the session holder.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user.id
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"[REDACTED]")
            .field("user", &self.user)
            .finish()
    }
}

/// Sign-up may or may not come with a session, depending on whether the
/// project requires email confirmation.
#[derive(Deserialize)]
struct SignUpResponse {
    access_token: Option<String>,
    user: Option<AuthUser>,
}

impl SupabaseClient {
    /// Exchange email and password for a session.
    ///
    /// # Errors
    ///
    /// Returns [`SupabaseError::InvalidCredentials`] when the service
    /// rejects the credentials, and transport or API errors otherwise.
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, SupabaseError> {
        let url = format!("{}?grant_type=password", self.auth_endpoint("token"));
        let body = serde_json::json!({ "email": email, "password": password });

        let response = self
            .http()
            .post(&url)
            .bearer_auth(self.anon_key())
            .json(&body)
            .send()
            .await?;
        let status = response.status();

        if status.as_u16() == 400 || status.as_u16() == 401 {
            return Err(SupabaseError::InvalidCredentials);
        }
        if !status.is_success() {
            return Err(SupabaseError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        response
            .json::<Session>()
            .await
            .map_err(|e| SupabaseError::Parse(e.to_string()))
    }

    /// Register a new account, marked as an admin candidate in its
    /// user metadata.
    ///
    /// # Errors
    ///
    /// Returns [`SupabaseError::ConfirmationRequired`] when the project
    /// withholds the session pending email confirmation.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<Session, SupabaseError> {
        let url = self.auth_endpoint("signup");
        let body = serde_json::json!({
            "email": email,
            "password": password,
            "data": { "is_admin": true },
        });

        let response = self
            .http()
            .post(&url)
            .bearer_auth(self.anon_key())
            .json(&body)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            return Err(SupabaseError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let signup: SignUpResponse = response
            .json()
            .await
            .map_err(|e| SupabaseError::Parse(e.to_string()))?;

        match (signup.access_token, signup.user) {
            (Some(access_token), Some(user)) => Ok(Session { access_token, user }),
            _ => Err(SupabaseError::ConfirmationRequired),
        }
    }

    /// Look up the identity behind an access token.
    ///
    /// Returns `Ok(None)` when the token is expired or revoked; the
    /// caller treats that exactly like "no session".
    ///
    /// # Errors
    ///
    /// Returns an error only for transport failures or unexpected API
    /// responses.
    pub async fn current_user(&self, access_token: &str) -> Result<Option<AuthUser>, SupabaseError> {
        let url = self.auth_endpoint("user");
        let response = self.http().get(&url).bearer_auth(access_token).send().await?;
        let status = response.status();

        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(SupabaseError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let user: AuthUser = response
            .json()
            .await
            .map_err(|e| SupabaseError::Parse(e.to_string()))?;
        Ok(Some(user))
    }

    /// Revoke a session.
    ///
    /// A token the service no longer recognizes counts as signed out.
    ///
    /// # Errors
    ///
    /// Returns an error for transport failures or unexpected statuses.
    pub async fn sign_out(&self, access_token: &str) -> Result<(), SupabaseError> {
        let url = self.auth_endpoint("logout");
        let response = self
            .http()
            .post(&url)
            .bearer_auth(access_token)
            .send()
            .await?;
        let status = response.status();

        if status.is_success() || status.as_u16() == 401 || status.as_u16() == 404 {
            Ok(())
        } else {
            Err(SupabaseError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_session_debug_redacts_token() {
        let session: Session = serde_json::from_value(serde_json::json!({
            "access_token": "very-secret-token",
            "user": { "id": "8e435d46-3c64-4b5e-8f34-4f20d0a0e3a4", "email": "a@b.c" }
        }))
        .unwrap();

        let debug = format!("{session:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("very-secret-token"));
    }

    #[test]
    fn test_session_deserializes_token_payload() {
        let session: Session = serde_json::from_value(serde_json::json!({
            "access_token": "jwt",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "refresh",
            "user": { "id": "8e435d46-3c64-4b5e-8f34-4f20d0a0e3a4", "email": null }
        }))
        .unwrap();

        assert_eq!(
            session.user_id().to_string(),
            "8e435d46-3c64-4b5e-8f34-4f20d0a0e3a4"
        );
    }
}
