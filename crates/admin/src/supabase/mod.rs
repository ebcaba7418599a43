//! Client for the hosted backend-as-a-service.
//!
//! The marketplace keeps no database of its own: identity and sessions
//! live in the backend's GoTrue auth API, rows in its PostgREST table
//! API, both reached over plain HTTPS. This module is the only place
//! that knows the wire details; everything above it works with domain
//! types.

mod admins;
mod auth;
mod error;

pub use admins::{AdminsTable, NewAdmin};
pub use auth::{AuthUser, Session};
pub use error::SupabaseError;

use reqwest::header::{HeaderMap, HeaderValue};

use crate::config::SupabaseConfig;

/// HTTP client for one backend project.
///
/// Cheap to clone; holds a connection pool internally.
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseClient {
    /// Create a client for the configured project.
    ///
    /// The project's anon key is attached to every request as the
    /// `apikey` header; per-request `Authorization` headers carry either
    /// the anon key or a user access token.
    ///
    /// # Errors
    ///
    /// Returns an error if the anon key is not a valid header value or
    /// the HTTP client fails to build.
    pub fn new(config: &SupabaseConfig) -> Result<Self, SupabaseError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "apikey",
            HeaderValue::from_str(&config.anon_key)
                .map_err(|e| SupabaseError::Parse(format!("invalid anon key: {e}")))?,
        );

        let http = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_owned(),
            anon_key: config.anon_key.clone(),
        })
    }

    /// Liveness probe against the auth service.
    ///
    /// # Errors
    ///
    /// Returns an error if the service is unreachable or unhealthy.
    pub async fn health(&self) -> Result<(), SupabaseError> {
        let url = self.auth_endpoint("health");
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(SupabaseError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            })
        }
    }

    pub(crate) fn auth_endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.base_url)
    }

    pub(crate) fn rest_endpoint(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    pub(crate) const fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// The bearer value for requests not made on behalf of a user.
    pub(crate) fn anon_key(&self) -> &str {
        &self.anon_key
    }
}
