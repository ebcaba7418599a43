//! Production implementations of the gate's authority-source seams.

use async_trait::async_trait;
use tower_sessions::Session as CookieSession;

use souk_sparkle_core::UserId;

use crate::models::AdminRecord;
use crate::supabase::{AdminsTable, Session, SupabaseClient};

use super::{AdminDirectory, AuthBackend, ExternalServiceError, FlagStore};

/// [`AuthBackend`] bound to the access token the visitor's cookie
/// session carries (or to no token at all).
///
/// "Current session" on the server means: validate the stored token
/// against the auth service's user endpoint.
pub struct TokenAuthBackend {
    client: SupabaseClient,
    access_token: Option<String>,
}

impl TokenAuthBackend {
    /// Bind the backend to one visitor's stored token.
    #[must_use]
    pub const fn new(client: SupabaseClient, access_token: Option<String>) -> Self {
        Self {
            client,
            access_token,
        }
    }
}

#[async_trait]
impl AuthBackend for TokenAuthBackend {
    async fn get_session(&self) -> Result<Option<Session>, ExternalServiceError> {
        let Some(token) = &self.access_token else {
            return Ok(None);
        };

        let user = self.client.current_user(token).await?;
        Ok(user.map(|user| Session {
            access_token: token.clone(),
            user,
        }))
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, ExternalServiceError> {
        Ok(self.client.sign_in_with_password(email, password).await?)
    }
}

#[async_trait]
impl AdminDirectory for SupabaseClient {
    async fn find_by_user_id(
        &self,
        user_id: UserId,
    ) -> Result<Option<AdminRecord>, ExternalServiceError> {
        Ok(AdminsTable::new(self).find_by_user_id(user_id, None).await?)
    }
}

/// [`FlagStore`] backed by the visitor's cookie session.
///
/// Storage failures read as "absent" and writes are best-effort: the
/// gate must keep working (fail closed) when the session store misbehaves.
pub struct CookieFlagStore {
    session: CookieSession,
}

impl CookieFlagStore {
    /// Wrap a visitor's cookie session.
    #[must_use]
    pub const fn new(session: CookieSession) -> Self {
        Self { session }
    }
}

#[async_trait]
impl FlagStore for CookieFlagStore {
    async fn get_item(&self, key: &str) -> Option<String> {
        self.session.get::<String>(key).await.ok().flatten()
    }

    async fn set_item(&self, key: &str, value: &str) {
        if let Err(error) = self.session.insert(key, value.to_owned()).await {
            tracing::warn!(%error, key, "failed to write client-local store");
        }
    }

    async fn remove_item(&self, key: &str) {
        if let Err(error) = self.session.remove::<String>(key).await {
            tracing::warn!(%error, key, "failed to clear client-local store");
        }
    }
}
