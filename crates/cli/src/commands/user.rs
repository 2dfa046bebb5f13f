//! User management commands.
//!
//! # Usage
//!
//! ```bash
//! mw-cli user create -e admin@example.com -p 'long-password' -r admin
//! ```
//!
//! # Environment Variables
//!
//! - `MINDWHIZ_DATABASE_URL` - `PostgreSQL` connection string

use mindwhiz_api::db::PgStore;
use mindwhiz_api::services::auth::register_user;
use mindwhiz_core::Role;

use super::{CommandError, connect};

/// Create a new user with a hashed password.
///
/// # Errors
///
/// Returns an error if the email is invalid, the password is too short,
/// the email is taken, or the database is unreachable.
pub async fn create(email: &str, password: &str, role: Role) -> Result<(), CommandError> {
    let store = PgStore::new(connect().await?);
    let user = register_user(&store, email, password, role).await?;

    tracing::info!(
        user_id = %user.id,
        email = %user.email,
        role = %user.role,
        "User created"
    );
    Ok(())
}
