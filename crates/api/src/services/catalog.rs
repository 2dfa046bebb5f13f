//! Product catalog service.

use serde::Deserialize;
use thiserror::Error;

use mindwhiz_core::{Availability, Price, PriceError, Product, ProductId};

use crate::db::{ProductRepository, RepositoryError};
use crate::models::NewProduct;

/// Errors from catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The request failed validation; the message is client-facing.
    #[error("{0}")]
    Validation(String),

    #[error("Product not found")]
    NotFound,

    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Product creation input as submitted by the admin form.
///
/// Fields are optional here so missing values produce a validation message
/// instead of a deserialization error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<serde_json::Value>,
    pub availability: Option<String>,
    pub image_url: Option<String>,
}

impl ProductDraft {
    /// Validate and normalize into a [`NewProduct`].
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` for missing required fields, a
    /// non-numeric or negative price, or an unknown availability.
    pub fn validate(self) -> Result<NewProduct, CatalogError> {
        let name = self.name.map(|n| n.trim().to_owned()).unwrap_or_default();
        let description = self.description.unwrap_or_default();
        let price = self.price.filter(|p| !p.is_null());

        let Some(price) = price.filter(|_| !name.is_empty() && !description.is_empty()) else {
            return Err(CatalogError::Validation(
                "Name, description, and price are required".to_owned(),
            ));
        };

        let price = Price::from_json(&price).map_err(|e| {
            CatalogError::Validation(match e {
                PriceError::Negative => "Price cannot be negative".to_owned(),
                PriceError::NotANumber => "Price must be a valid number".to_owned(),
                PriceError::TooPrecise => "Price must have at most 2 decimal places".to_owned(),
                PriceError::TooLarge => format!("Price must be at most {}", Price::MAX_AMOUNT),
            })
        })?;

        let availability = match self.availability.as_deref().map(str::trim) {
            None | Some("") => Availability::default(),
            Some(raw) => raw.parse::<Availability>().map_err(|_| {
                CatalogError::Validation(
                    "Availability must be 'In Stock' or 'Out of Stock'".to_owned(),
                )
            })?,
        };

        Ok(NewProduct {
            name,
            description,
            price,
            availability,
            image_url: self.image_url.unwrap_or_default(),
        })
    }
}

/// Read and create catalog products.
pub struct CatalogService<'a, S: ProductRepository + ?Sized> {
    products: &'a S,
}

impl<'a, S: ProductRepository + ?Sized> CatalogService<'a, S> {
    #[must_use]
    pub const fn new(products: &'a S) -> Self {
        Self { products }
    }

    /// All products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the query fails.
    pub async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.list_products().await?)
    }

    /// Fetch one product by its path id.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if `raw_id` is not a valid id or no
    /// such product exists.
    pub async fn get_product(&self, raw_id: &str) -> Result<Product, CatalogError> {
        let id: ProductId = raw_id.parse().map_err(|_| CatalogError::NotFound)?;
        self.products
            .get_product(id)
            .await?
            .ok_or(CatalogError::NotFound)
    }

    /// Validate and store a new product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` if the draft is invalid.
    pub async fn create_product(&self, draft: ProductDraft) -> Result<Product, CatalogError> {
        let new_product = draft.validate()?;
        let product = self.products.create_product(&new_product).await?;

        tracing::info!(product_id = %product.id, name = %product.name, "product created");
        Ok(product)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;
    use crate::db::memory::MemoryStore;

    fn draft(value: serde_json::Value) -> ProductDraft {
        serde_json::from_value(value).unwrap()
    }

    fn validation_message(result: Result<NewProduct, CatalogError>) -> String {
        match result {
            Err(CatalogError::Validation(message)) => message,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_defaults_applied() {
        let product = draft(json!({"name": " Widget ", "description": "d", "price": 9.99}))
            .validate()
            .unwrap();
        assert_eq!(product.name, "Widget");
        assert_eq!(product.price.amount(), Decimal::new(999, 2));
        assert_eq!(product.availability, Availability::InStock);
        assert_eq!(product.image_url, "");
    }

    #[test]
    fn test_required_fields() {
        for body in [
            json!({"description": "d", "price": 1}),
            json!({"name": "   ", "description": "d", "price": 1}),
            json!({"name": "Widget", "price": 1}),
            json!({"name": "Widget", "description": "", "price": 1}),
            json!({"name": "Widget", "description": "d"}),
            json!({"name": "Widget", "description": "d", "price": null}),
        ] {
            assert_eq!(
                validation_message(draft(body).validate()),
                "Name, description, and price are required"
            );
        }
    }

    #[test]
    fn test_price_validation() {
        let message = validation_message(
            draft(json!({"name": "Widget", "description": "d", "price": "abc"})).validate(),
        );
        assert_eq!(message, "Price must be a valid number");

        let message = validation_message(
            draft(json!({"name": "Widget", "description": "d", "price": -1})).validate(),
        );
        assert_eq!(message, "Price cannot be negative");

        let product = draft(json!({"name": "Widget", "description": "d", "price": "12.50"}))
            .validate()
            .unwrap();
        assert_eq!(product.price.amount(), Decimal::new(1250, 2));
    }

    #[test]
    fn test_price_must_fit_column() {
        for (price, expected) in [
            (json!(9.999), "Price must have at most 2 decimal places"),
            (json!("0.0001"), "Price must have at most 2 decimal places"),
            (json!(1e12), "Price must be at most 9999999999.99"),
        ] {
            let message = validation_message(
                draft(json!({"name": "Widget", "description": "d", "price": price})).validate(),
            );
            assert_eq!(message, expected);
        }

        let product = draft(json!({"name": "Widget", "description": "d", "price": 9_999_999_999.99}))
            .validate()
            .unwrap();
        assert_eq!(product.price.amount(), Price::MAX_AMOUNT);
    }

    #[test]
    fn test_availability_validation() {
        let product = draft(json!({
            "name": "Widget", "description": "d", "price": 0, "availability": "Out of Stock"
        }))
        .validate()
        .unwrap();
        assert_eq!(product.availability, Availability::OutOfStock);

        let product = draft(json!({
            "name": "Widget", "description": "d", "price": 0, "availability": ""
        }))
        .validate()
        .unwrap();
        assert_eq!(product.availability, Availability::InStock);

        assert!(matches!(
            draft(json!({
                "name": "Widget", "description": "d", "price": 0, "availability": "Backordered"
            }))
            .validate(),
            Err(CatalogError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let store = MemoryStore::new();
        let catalog = CatalogService::new(&store);

        let created = catalog
            .create_product(draft(
                json!({"name": "Widget", "description": "d", "price": 9.99, "imageUrl": "/w.png"}),
            ))
            .await
            .unwrap();
        assert_eq!(created.image_url, "/w.png");

        let fetched = catalog
            .get_product(&created.id.to_string())
            .await
            .unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_get_missing_or_malformed_id_is_not_found() {
        let store = MemoryStore::new();
        let catalog = CatalogService::new(&store);

        assert!(matches!(
            catalog.get_product("999").await,
            Err(CatalogError::NotFound)
        ));
        assert!(matches!(
            catalog.get_product("64b7f0c2e4b0a1a2b3c4d5e6").await,
            Err(CatalogError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let store = MemoryStore::new();
        let catalog = CatalogService::new(&store);

        for name in ["First", "Second", "Third"] {
            catalog
                .create_product(draft(json!({"name": name, "description": "d", "price": 1})))
                .await
                .unwrap();
        }

        let names: Vec<String> = catalog
            .list_products()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, ["Third", "Second", "First"]);
    }
}
