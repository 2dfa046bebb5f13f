//! CLI command implementations.

pub mod migrate;
pub mod seed;
pub mod user;

use secrecy::SecretString;
use sqlx::PgPool;
use thiserror::Error;

/// Errors shared by the database commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Repository operation failed.
    #[error("Repository error: {0}")]
    Repository(#[from] mindwhiz_api::db::RepositoryError),

    /// Sample data could not be built.
    #[error("Invalid seed data: {0}")]
    InvalidSeed(String),

    /// User creation failed.
    #[error("{0}")]
    Auth(#[from] mindwhiz_api::services::auth::AuthError),
}

/// Connect using `MINDWHIZ_DATABASE_URL` (or `DATABASE_URL`).
pub async fn connect() -> Result<PgPool, CommandError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("MINDWHIZ_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| CommandError::MissingEnvVar("MINDWHIZ_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = mindwhiz_api::db::create_pool(&database_url).await?;
    Ok(pool)
}
