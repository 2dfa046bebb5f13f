//! Integration tests for the product catalog.
//!
//! These tests require:
//! - A migrated and seeded `PostgreSQL` database (mw-cli migrate && mw-cli seed)
//! - The API server running (cargo run -p mindwhiz-api)

use mindwhiz_client::NewProductRequest;
use mindwhiz_core::{Availability, Price, ProductId};
use mindwhiz_integration_tests::{
    SEED_ADMIN, SEED_CUSTOMER, anonymous_client, logged_in_client, unique_product_name,
};
use reqwest::StatusCode;
use rust_decimal::Decimal;

fn widget(name: String) -> NewProductRequest {
    NewProductRequest {
        name,
        description: "Integration test product".to_string(),
        price: Price::new(Decimal::new(999, 2)).expect("valid price"),
        availability: None,
        image_url: None,
    }
}

#[tokio::test]
#[ignore = "Requires running API server and seeded database"]
async fn test_seeded_catalog_is_listed() {
    let products = anonymous_client()
        .products()
        .await
        .expect("list products");

    assert!(products.iter().any(|p| p.name == "Product 1"));
    assert!(
        products
            .iter()
            .any(|p| p.name == "Product 3" && p.availability == Availability::OutOfStock)
    );
}

#[tokio::test]
#[ignore = "Requires running API server and seeded database"]
async fn test_admin_creates_product_newest_first() {
    let admin = logged_in_client(SEED_ADMIN).await;
    let name = unique_product_name("Widget");

    let created = admin
        .create_product(&widget(name.clone()))
        .await
        .expect("create product");
    assert_eq!(created.name, name);
    assert_eq!(created.availability, Availability::InStock);
    assert_eq!(created.image_url, "");

    let fetched = anonymous_client()
        .product(created.id)
        .await
        .expect("get product");
    assert_eq!(fetched, created);

    let products = anonymous_client().products().await.expect("list products");
    assert_eq!(products.first().map(|p| p.id), Some(created.id));
}

#[tokio::test]
#[ignore = "Requires running API server and seeded database"]
async fn test_customer_cannot_create_product() {
    let customer = logged_in_client(SEED_CUSTOMER).await;
    let err = customer
        .create_product(&widget(unique_product_name("Forbidden")))
        .await
        .expect_err("customer create");
    assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
}

#[tokio::test]
#[ignore = "Requires running API server and seeded database"]
async fn test_missing_product_is_not_found() {
    let err = anonymous_client()
        .product(ProductId::new(i32::MAX))
        .await
        .expect_err("missing product");
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
}
