//! Integration tests for the Mindwhiz shop API.
//!
//! # Running Tests
//!
//! ```bash
//! # Prepare a database and start the server
//! cargo run -p mindwhiz-cli -- migrate
//! cargo run -p mindwhiz-cli -- seed
//! cargo run -p mindwhiz-api
//!
//! # Run the ignored end-to-end tests
//! cargo test -p mindwhiz-integration-tests -- --ignored
//! ```
//!
//! Tests log in as the seeded users and talk to the server at
//! `MINDWHIZ_API_URL` (default `http://localhost:5000/api`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use mindwhiz_client::ApiClient;
use uuid::Uuid;

/// Password of the seeded users.
pub const SEED_PASSWORD: &str = "password123";

/// Seeded admin account.
pub const SEED_ADMIN: &str = "admin@mindwhiz.com";

/// Seeded customer account.
pub const SEED_CUSTOMER: &str = "customer@mindwhiz.com";

/// Base URL of the API under test.
#[must_use]
pub fn api_base_url() -> String {
    std::env::var("MINDWHIZ_API_URL").unwrap_or_else(|_| "http://localhost:5000/api".to_string())
}

/// A client with no token.
#[must_use]
pub fn anonymous_client() -> ApiClient {
    ApiClient::new(api_base_url())
}

/// A client logged in as `email` with the seed password.
///
/// # Panics
///
/// Panics if login fails; the database must be seeded.
#[allow(clippy::expect_used)]
pub async fn logged_in_client(email: &str) -> ApiClient {
    let mut client = anonymous_client();
    client
        .login(email, SEED_PASSWORD)
        .await
        .expect("login failed; run `mw-cli seed` first");
    client
}

/// A product name no other test run will reuse.
#[must_use]
pub fn unique_product_name(prefix: &str) -> String {
    format!("{prefix} {}", Uuid::new_v4().simple())
}
