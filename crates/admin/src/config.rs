//! Admin panel configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SOUK_SUPABASE_URL` - Base URL of the hosted backend project
//! - `SOUK_SUPABASE_ANON_KEY` - The project's public (anon) API key
//!
//! ## Optional
//! - `SOUK_ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `SOUK_ADMIN_PORT` - Listen port (default: 3001)
//! - `SOUK_ADMIN_BASE_URL` - Public URL of the panel (default: http://localhost:3001)
//! - `SOUK_LEGACY_ADMIN_USERNAME` / `SOUK_LEGACY_ADMIN_PASSWORD` - Credentials
//!   for the legacy login form; both or neither must be set. When unset the
//!   legacy form rejects everything.
//! - `SOUK_SERVICE_EMAIL` / `SOUK_SERVICE_PASSWORD` - Backend account used for
//!   the best-effort background sign-in after a legacy-flag entry; both or
//!   neither must be set.
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Values that indicate someone shipped the template instead of a key.
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "todo",
    "fixme",
    "insert",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure value in {0}: {1}")]
    InsecureValue(String, String),
    #[error("{0} and {1} must be set together")]
    IncompletePair(&'static str, &'static str),
}

/// Admin panel configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Hosted backend project.
    pub supabase: SupabaseConfig,
    /// IP address to bind the server to.
    pub host: IpAddr,
    /// Port to listen on.
    pub port: u16,
    /// Public base URL of the panel.
    pub base_url: String,
    /// Legacy login form credentials, when the form is enabled.
    pub legacy_login: Option<LegacyLogin>,
    /// Backend account for the background sign-in, when configured.
    pub service_login: Option<ServiceLogin>,
    /// Sentry DSN for error tracking.
    pub sentry_dsn: Option<String>,
    /// Sentry environment name.
    pub sentry_environment: Option<String>,
}

/// Connection details of the hosted backend project.
///
/// The anon key is public by design (it ships to browsers), so it is a
/// plain `String`.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Base URL, e.g. `https://project.supabase.co`.
    pub url: String,
    /// Public (anon) API key.
    pub anon_key: String,
}

/// Credentials accepted by the legacy login form.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct LegacyLogin {
    /// Expected username.
    pub username: String,
    /// Expected password.
    pub password: SecretString,
}

impl std::fmt::Debug for LegacyLogin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LegacyLogin")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Backend account used for the best-effort background sign-in.
#[derive(Clone)]
pub struct ServiceLogin {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: SecretString,
}

impl std::fmt::Debug for ServiceLogin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceLogin")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or
    /// invalid, if the anon key looks like a placeholder, or if a
    /// credential pair is only half set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let supabase = SupabaseConfig::from_env()?;

        let host = get_env_or_default("SOUK_ADMIN_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("SOUK_ADMIN_HOST".to_owned(), e.to_string()))?;
        let port = get_env_or_default("SOUK_ADMIN_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("SOUK_ADMIN_PORT".to_owned(), e.to_string()))?;
        let base_url = get_env_or_default("SOUK_ADMIN_BASE_URL", "http://localhost:3001");

        let legacy_login = credential_pair(
            "SOUK_LEGACY_ADMIN_USERNAME",
            "SOUK_LEGACY_ADMIN_PASSWORD",
            get_optional_env("SOUK_LEGACY_ADMIN_USERNAME"),
            get_optional_env("SOUK_LEGACY_ADMIN_PASSWORD"),
        )?
        .map(|(username, password)| LegacyLogin { username, password });

        let service_login = credential_pair(
            "SOUK_SERVICE_EMAIL",
            "SOUK_SERVICE_PASSWORD",
            get_optional_env("SOUK_SERVICE_EMAIL"),
            get_optional_env("SOUK_SERVICE_PASSWORD"),
        )?
        .map(|(email, password)| ServiceLogin { email, password });

        Ok(Self {
            supabase,
            host,
            port,
            base_url,
            legacy_login,
            service_login,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl SupabaseConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let url = get_required_env("SOUK_SUPABASE_URL")?;
        Url::parse(&url)
            .map_err(|e| ConfigError::InvalidEnvVar("SOUK_SUPABASE_URL".to_owned(), e.to_string()))?;

        let anon_key = get_required_env("SOUK_SUPABASE_ANON_KEY")?;
        validate_not_placeholder(&anon_key, "SOUK_SUPABASE_ANON_KEY")?;

        Ok(Self { url, anon_key })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_owned()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Reject values that are obviously the template, not a key.
fn validate_not_placeholder(value: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = value.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureValue(
                var_name.to_owned(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }
    Ok(())
}

/// Assemble an all-or-nothing credential pair.
fn credential_pair(
    first_key: &'static str,
    second_key: &'static str,
    first: Option<String>,
    second: Option<String>,
) -> Result<Option<(String, SecretString)>, ConfigError> {
    match (first, second) {
        (Some(first), Some(second)) => Ok(Some((first, SecretString::from(second)))),
        (None, None) => Ok(None),
        _ => Err(ConfigError::IncompletePair(first_key, second_key)),
    }
}
