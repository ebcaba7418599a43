//! Admin account management commands.
//!
//! # Usage
//!
//! ```bash
//! # Create the default super admin (first run only)
//! souk-cli admin bootstrap -e admin@example.com -p <password> -n admin
//!
//! # Register an additional admin account
//! souk-cli admin create -e staff@example.com -p <password> -n staff -r admin
//! ```
//!
//! # Environment Variables
//!
//! - `SOUK_SUPABASE_URL` - Base URL of the hosted backend project
//! - `SOUK_SUPABASE_ANON_KEY` - Publishable API key for that project

use thiserror::Error;

use souk_sparkle_admin::config::{AdminConfig, ConfigError};
use souk_sparkle_admin::services::{AdminAuthError, AdminAuthService};
use souk_sparkle_admin::supabase::{SupabaseClient, SupabaseError};
use souk_sparkle_core::AdminRole;

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The backend client could not be built or reached.
    #[error("Backend error: {0}")]
    Supabase(#[from] SupabaseError),

    /// The auth operation itself failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AdminAuthError),

    /// Invalid role.
    #[error("Invalid role: {0}. Valid roles: super_admin, admin")]
    InvalidRole(String),
}

fn connect() -> Result<SupabaseClient, AdminError> {
    dotenvy::dotenv().ok();
    let config = AdminConfig::from_env()?;
    Ok(SupabaseClient::new(&config.supabase)?)
}

/// Create the default super admin account.
///
/// Refuses to run when any admin account already exists, so a deployed
/// system cannot be re-bootstrapped by accident.
pub async fn bootstrap(email: &str, password: &str, username: &str) -> Result<(), AdminError> {
    let client = connect()?;
    let service = AdminAuthService::new(&client);

    tracing::info!("Creating default super admin: {email}");
    let record = service.create_default_admin(email, password, username).await?;

    tracing::info!(
        "Default admin created successfully! ID: {}, Username: {}",
        record.id,
        record.username
    );
    Ok(())
}

/// Register an admin account with an explicit role.
pub async fn create(
    email: &str,
    password: &str,
    username: &str,
    role: &str,
) -> Result<(), AdminError> {
    let role: AdminRole = role
        .parse()
        .map_err(|_| AdminError::InvalidRole(role.to_owned()))?;

    let client = connect()?;
    let service = AdminAuthService::new(&client);

    tracing::info!("Creating admin account: {email} ({role})");
    let (_, record) = service
        .register_admin(email, password, username, role)
        .await?;

    tracing::info!(
        "Admin created successfully! ID: {}, Username: {}, Role: {}",
        record.id,
        record.username,
        record.role()
    );
    Ok(())
}

/// Report whether any admin account exists.
pub async fn exists() -> Result<(), AdminError> {
    let client = connect()?;
    let service = AdminAuthService::new(&client);

    if service.admin_exists().await? {
        tracing::info!("At least one admin account exists");
    } else {
        tracing::info!("No admin account exists yet; run 'admin bootstrap'");
    }
    Ok(())
}
