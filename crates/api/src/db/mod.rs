//! Persistence for the shop `PostgreSQL` database.
//!
//! # Schema: `shop`
//!
//! - `app_user` - Accounts (unique on `lower(email)`)
//! - `product` - Catalog
//! - `cart_item` - One row per (user, product), `quantity >= 1`
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p mindwhiz-cli -- migrate
//! ```
//!
//! Services talk to the repository traits below rather than to `PgPool`, so
//! they can be exercised against the in-memory store in unit tests.

mod cart;
#[cfg(test)]
pub mod memory;
mod products;
mod users;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use mindwhiz_core::{CartItemId, Email, Product, ProductId, Quantity, Role, UserId};

use crate::models::{CartItem, NewProduct, User, UserCredentials};

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// An increment would push a cart quantity past the column's range.
    #[error("quantity out of range")]
    QuantityOverflow,
}

/// Map a unique violation to `Conflict`, everything else to `Database`.
pub(crate) fn conflict_on_unique(err: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(what.to_owned());
    }
    RepositoryError::Database(err)
}

/// Map SQLSTATE 22003 (`numeric_value_out_of_range`) to `QuantityOverflow`.
pub(crate) fn overflow_on_out_of_range(err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.code().as_deref() == Some("22003")
    {
        return RepositoryError::QuantityOverflow;
    }
    RepositoryError::Database(err)
}

/// User accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Look up a user and their password hash by case-folded email.
    async fn find_user_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<UserCredentials>, RepositoryError>;

    /// Insert a user.
    ///
    /// Returns `RepositoryError::Conflict` if the email is taken.
    async fn create_user(
        &self,
        email: &Email,
        password_hash: &str,
        role: Role,
    ) -> Result<User, RepositoryError>;
}

/// Product catalog.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// All products, newest first.
    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError>;

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;

    /// Fetch several products at once. Missing ids are silently absent.
    async fn get_products(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError>;

    async fn create_product(&self, product: &NewProduct) -> Result<Product, RepositoryError>;
}

/// Per-user cart rows.
///
/// Every row-level operation is scoped by `user`, so a row owned by someone
/// else behaves exactly like a missing one.
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// The user's rows, oldest first.
    async fn list_cart_items(&self, user: UserId) -> Result<Vec<CartItem>, RepositoryError>;

    /// Atomically add `by` to the existing (user, product) row.
    ///
    /// Returns `None` when there is no such row and
    /// `RepositoryError::QuantityOverflow` if the sum does not fit.
    async fn increment_cart_item(
        &self,
        user: UserId,
        product: ProductId,
        by: Quantity,
    ) -> Result<Option<CartItem>, RepositoryError>;

    /// Insert a new (user, product) row.
    ///
    /// Returns `RepositoryError::Conflict` if the row already exists.
    async fn insert_cart_item(
        &self,
        user: UserId,
        product: ProductId,
        quantity: Quantity,
    ) -> Result<CartItem, RepositoryError>;

    /// Overwrite the quantity of one of the user's rows.
    async fn set_cart_item_quantity(
        &self,
        user: UserId,
        item: CartItemId,
        quantity: Quantity,
    ) -> Result<Option<CartItem>, RepositoryError>;

    /// Delete one of the user's rows. Returns whether a row was removed.
    async fn delete_cart_item(&self, user: UserId, item: CartItemId)
    -> Result<bool, RepositoryError>;

    /// Delete all of the user's rows. Returns the number removed.
    async fn clear_cart(&self, user: UserId) -> Result<u64, RepositoryError>;
}

/// Everything the API needs from persistence.
#[async_trait]
pub trait Store: UserRepository + ProductRepository + CartRepository {
    /// Check that the backing store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// `PostgreSQL`-backed [`Store`].
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool (used by the CLI for migrations and seeding).
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
