//! Unified error handling for the admin panel.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::services::AdminAuthError;
use crate::supabase::SupabaseError;

/// Application-level error type for the admin panel.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend call failed.
    #[error("Backend error: {0}")]
    Supabase(#[from] SupabaseError),

    /// Authentication flow failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AdminAuthError),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Server-side failures go to Sentry; auth denials are routine.
        if matches!(self, Self::Supabase(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
            );
        }

        let status = match &self {
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Supabase(_) => StatusCode::BAD_GATEWAY,
            Self::Auth(AdminAuthError::Supabase(_)) => StatusCode::BAD_GATEWAY,
            // Malformed input is the client's mistake, not a failed login.
            Self::Auth(
                AdminAuthError::InvalidEmail(_) | AdminAuthError::WeakPassword { .. },
            )
            | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Auth(_) | Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Internal(_) => "Internal server error".to_owned(),
            Self::Supabase(_) | Self::Auth(AdminAuthError::Supabase(_)) => {
                "External service error".to_owned()
            }
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            status_of(AppError::Unauthorized("x".to_owned())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(AppError::BadRequest("x".to_owned())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Internal("x".to_owned())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(AppError::Auth(AdminAuthError::NotAnAdmin)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(AppError::Auth(AdminAuthError::InvalidCredentials)),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_malformed_input_is_bad_request_not_unauthorized() {
        assert_eq!(
            status_of(AppError::Auth(AdminAuthError::WeakPassword { min: 8 })),
            StatusCode::BAD_REQUEST
        );

        let email_error = souk_sparkle_core::Email::parse("not-an-email").unwrap_err();
        assert_eq!(
            status_of(AppError::Auth(AdminAuthError::InvalidEmail(email_error))),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_internal_detail_not_exposed() {
        let err = AppError::Internal("secret detail".to_owned());
        assert_eq!(err.to_string(), "Internal error: secret detail");
        // The response body is generic; only logs carry the detail.
    }
}
