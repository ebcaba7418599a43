//! Error types for the hosted backend client.

use thiserror::Error;

/// Errors that can occur when talking to the hosted backend.
#[derive(Debug, Error)]
pub enum SupabaseError {
    /// HTTP transport failed (connection, DNS, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with an error status.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, as returned by the service.
        message: String,
    },

    /// The auth service rejected the credentials.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Sign-up succeeded but the service withheld a session
    /// (email confirmation is enabled on the project).
    #[error("sign-up requires email confirmation before a session is issued")]
    ConfirmationRequired,

    /// A response could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),
}
