//! Mindwhiz CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Apply database migrations
//! mw-cli migrate
//!
//! # Reset the tables and load the sample catalog and users
//! mw-cli seed
//!
//! # Create a user
//! mw-cli user create -e admin@example.com -p 'long-password' -r admin
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Load sample data
//! - `user create` - Create users

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use mindwhiz_core::Role;

mod commands;

#[derive(Parser)]
#[command(name = "mw-cli")]
#[command(author, version, about = "Mindwhiz CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database with sample products and users
    Seed {
        /// Keep existing rows instead of truncating first
        #[arg(long)]
        keep_existing: bool,
    },
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password (at least 8 characters)
        #[arg(short, long)]
        password: String,

        /// Role (`admin`, `customer`)
        #[arg(short, long, default_value = "customer")]
        role: Role,
    },
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
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { keep_existing } => commands::seed::run(keep_existing).await?,
        Commands::User { action } => match action {
            UserAction::Create {
                email,
                password,
                role,
            } => {
                commands::user::create(&email, &password, role).await?;
            }
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_user_create() {
        let cli = Cli::try_parse_from([
            "mw-cli", "user", "create", "-e", "a@b.co", "-p", "password123", "-r", "Admin",
        ]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::User {
                action: UserAction::Create {
                    role: Role::Admin,
                    ..
                }
            })
        ));
    }

    #[test]
    fn test_parse_seed_flag() {
        let cli = Cli::try_parse_from(["mw-cli", "seed", "--keep-existing"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Seed {
                keep_existing: true
            })
        ));
    }
}
