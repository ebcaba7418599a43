//! Admin authentication error types.

use thiserror::Error;

use crate::supabase::SupabaseError;

/// Errors that can occur during admin authentication operations.
#[derive(Debug, Error)]
pub enum AdminAuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] souk_sparkle_core::EmailError),

    /// Wrong email/password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The account authenticated but holds no admin row.
    #[error("account is not an admin")]
    NotAnAdmin,

    /// Password too weak.
    #[error("password must be at least {min} characters")]
    WeakPassword {
        /// Minimum required length.
        min: usize,
    },

    /// Bootstrap refused because admin accounts already exist.
    #[error("admin accounts already exist")]
    AlreadyBootstrapped,

    /// Backend call failed.
    #[error("backend error: {0}")]
    Supabase(#[from] SupabaseError),
}
