//! Seed the database with the sample catalog and users.
//!
//! # Usage
//!
//! ```bash
//! # Truncate users, products and carts, then insert the samples
//! mw-cli seed
//!
//! # Insert on top of what is already there
//! mw-cli seed --keep-existing
//! ```

use mindwhiz_api::db::{PgStore, ProductRepository};
use mindwhiz_api::models::NewProduct;
use mindwhiz_api::services::auth::{AuthError, register_user};
use mindwhiz_core::{Availability, Price, PriceError, Role};
use rust_decimal::Decimal;
use tracing::{info, warn};

use super::{CommandError, connect};

/// Password shared by the sample users.
const SAMPLE_PASSWORD: &str = "password123";

const SAMPLE_IMAGE_URL: &str = "https://www.shutterstock.com/image-photo/hamburg-germany-06192024-photo-english-600nw-2527038531.jpg";

const SAMPLE_USERS: [(&str, Role); 2] = [
    ("admin@mindwhiz.com", Role::Admin),
    ("customer@mindwhiz.com", Role::Customer),
];

/// The five sample products; "Product 3" is out of stock.
fn sample_products() -> Result<Vec<NewProduct>, PriceError> {
    let rows = [
        (
            "Product 1",
            "Lorem ipsum dolor sit amet, consectetur adipiscing elit. Nulla cursus leo id nis, pulvinar, id dapibus quam ultrices.",
            25,
            Availability::InStock,
        ),
        (
            "Product 2",
            "Sed do eiusmod tempor incididunt ut labore et dolore magna aliqua. Ut enim ad minim veniam.",
            30,
            Availability::InStock,
        ),
        (
            "Product 3",
            "Duis aute irure dolor in reprehenderit in voluptate velit esse cillum dolore eu fugiat nulla pariatur.",
            20,
            Availability::OutOfStock,
        ),
        (
            "Product 4",
            "Excepteur sint occaecat cupidatat non proident, sunt in culpa qui officia deserunt mollit anim id est laborum.",
            15,
            Availability::InStock,
        ),
        (
            "Product 5",
            "Ut enim ad minima veniam, quis nostrum exercitationem ullam corporis suscipit laboriosam.",
            12,
            Availability::InStock,
        ),
    ];

    rows.into_iter()
        .map(|(name, description, price, availability)| {
            Ok(NewProduct {
                name: name.to_string(),
                description: description.to_string(),
                price: Price::new(Decimal::from(price))?,
                availability,
                image_url: SAMPLE_IMAGE_URL.to_string(),
            })
        })
        .collect()
}

/// Load the sample data.
///
/// # Errors
///
/// Returns an error if the database is unreachable or an insert fails.
pub async fn run(keep_existing: bool) -> Result<(), CommandError> {
    let pool = connect().await?;

    if keep_existing {
        info!("Keeping existing rows");
    } else {
        sqlx::query("TRUNCATE shop.cart_item, shop.product, shop.app_user RESTART IDENTITY CASCADE")
            .execute(&pool)
            .await?;
        info!("Cleared users, products and carts");
    }

    let store = PgStore::new(pool);

    let products = sample_products().map_err(|e| CommandError::InvalidSeed(e.to_string()))?;
    for product in &products {
        store.create_product(product).await?;
    }
    info!(count = products.len(), "Products seeded");

    for (email, role) in SAMPLE_USERS {
        match register_user(&store, email, SAMPLE_PASSWORD, role).await {
            Ok(user) => info!(user_id = %user.id, %email, %role, "User seeded"),
            Err(AuthError::UserAlreadyExists) => warn!(%email, "User already exists, skipping"),
            Err(e) => return Err(e.into()),
        }
    }

    info!("Sample logins: admin@mindwhiz.com / password123, customer@mindwhiz.com / password123");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_products() {
        let products = sample_products().unwrap();
        assert_eq!(products.len(), 5);

        let out_of_stock: Vec<_> = products
            .iter()
            .filter(|p| !p.availability.is_purchasable())
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(out_of_stock, ["Product 3"]);

        let prices: Vec<Decimal> = products.iter().map(|p| p.price.amount()).collect();
        assert_eq!(
            prices,
            [25, 30, 20, 15, 12].map(Decimal::from).to_vec()
        );
    }
}
