//! Souk Sparkle CLI - admin account management tools.
//!
//! # Usage
//!
//! ```bash
//! # First-run bootstrap: create the default super admin
//! souk-cli admin bootstrap -e admin@example.com -p <password> -n admin
//!
//! # Create an additional admin account
//! souk-cli admin create -e staff@example.com -p <password> -n staff -r admin
//!
//! # Check whether any admin account exists
//! souk-cli admin exists
//! ```
//!
//! # Commands
//!
//! - `admin bootstrap` - Create the default super admin (first run only)
//! - `admin create` - Register an admin account
//! - `admin exists` - Report whether any admin account exists

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "souk-cli")]
#[command(author, version, about = "Souk Sparkle CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage admin accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create the default super admin (fails if any admin exists)
    Bootstrap {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Admin password
        #[arg(short, long)]
        password: String,

        /// Admin username
        #[arg(short = 'n', long, default_value = "admin")]
        username: String,
    },
    /// Register an admin account
    Create {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Admin password
        #[arg(short, long)]
        password: String,

        /// Admin username
        #[arg(short = 'n', long)]
        username: String,

        /// Admin role (`super_admin`, `admin`)
        #[arg(short, long, default_value = "admin")]
        role: String,
    },
    /// Report whether any admin account exists
    Exists,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Admin { action } => match action {
            AdminAction::Bootstrap {
                email,
                password,
                username,
            } => {
                commands::admin::bootstrap(&email, &password, &username).await?;
            }
            AdminAction::Create {
                email,
                password,
                username,
                role,
            } => {
                commands::admin::create(&email, &password, &username, &role).await?;
            }
            AdminAction::Exists => {
                commands::admin::exists().await?;
            }
        },
    }
    Ok(())
}
