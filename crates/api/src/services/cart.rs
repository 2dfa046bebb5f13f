//! Per-user cart service.
//!
//! Each (user, product) pair has at most one row. Adding a product that is
//! already in the cart increments that row instead of creating another.

use std::collections::HashMap;

use thiserror::Error;

use mindwhiz_core::{CartItemId, CartItemView, Product, ProductId, Quantity, QuantityError, UserId};

use crate::db::{CartRepository, ProductRepository, RepositoryError};
use crate::models::CartItem;

/// Errors from cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The request failed validation; the message is client-facing.
    #[error("{0}")]
    Validation(String),

    #[error("Product not found")]
    ProductNotFound,

    #[error("Cart item not found")]
    ItemNotFound,

    /// The row appeared and vanished again while adding.
    #[error("Item already in cart")]
    AlreadyInCart,

    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Whether an add created a row or merged into an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Created,
    Merged,
}

/// Cart operations for a single store.
pub struct CartService<'a, S: CartRepository + ProductRepository + ?Sized> {
    store: &'a S,
}

impl<'a, S: CartRepository + ProductRepository + ?Sized> CartService<'a, S> {
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// The user's cart, oldest line first, with products resolved.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if a query fails.
    pub async fn get_cart(&self, user: UserId) -> Result<Vec<CartItemView>, CartError> {
        let items = self.store.list_cart_items(user).await?;

        let mut ids: Vec<ProductId> = items.iter().map(|item| item.product_id).collect();
        ids.sort_unstable();
        ids.dedup();

        let products: HashMap<ProductId, Product> = self
            .store
            .get_products(&ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        Ok(items
            .into_iter()
            .filter_map(|item| {
                let Some(product) = products.get(&item.product_id) else {
                    tracing::warn!(
                        cart_item_id = %item.id,
                        product_id = %item.product_id,
                        "cart item references a missing product"
                    );
                    return None;
                };
                Some(item.into_view(product.clone()))
            })
            .collect())
    }

    /// Add `quantity` (default 1) of a product to the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Validation` for a missing product id, a quantity
    /// below 1, or an out-of-stock product, and `CartError::ProductNotFound`
    /// if the product does not exist.
    #[tracing::instrument(skip(self))]
    pub async fn add_to_cart(
        &self,
        user: UserId,
        product_id: Option<&str>,
        quantity: Option<i64>,
    ) -> Result<(CartItemView, AddOutcome), CartError> {
        let Some(raw_id) = product_id.map(str::trim).filter(|s| !s.is_empty()) else {
            return Err(CartError::Validation("Product ID is required".to_owned()));
        };
        let quantity = quantity.map_or(Ok(Quantity::ONE), parse_quantity)?;

        let product_id: ProductId = raw_id.parse().map_err(|_| CartError::ProductNotFound)?;
        let product = self
            .store
            .get_product(product_id)
            .await?
            .ok_or(CartError::ProductNotFound)?;

        if !product.availability.is_purchasable() {
            return Err(CartError::Validation("Product is out of stock".to_owned()));
        }

        let (item, outcome) = self.merge_or_insert(user, product_id, quantity).await?;
        Ok((item.into_view(product), outcome))
    }

    async fn merge_or_insert(
        &self,
        user: UserId,
        product: ProductId,
        quantity: Quantity,
    ) -> Result<(CartItem, AddOutcome), CartError> {
        if let Some(item) = self.increment(user, product, quantity).await? {
            return Ok((item, AddOutcome::Merged));
        }

        match self.store.insert_cart_item(user, product, quantity).await {
            Ok(item) => Ok((item, AddOutcome::Created)),
            Err(RepositoryError::Conflict(_)) => {
                // A concurrent add created the row between our two statements
                tracing::debug!(%user, %product, "cart insert raced, retrying as merge");
                self.increment(user, product, quantity)
                    .await?
                    .map(|item| (item, AddOutcome::Merged))
                    .ok_or(CartError::AlreadyInCart)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn increment(
        &self,
        user: UserId,
        product: ProductId,
        by: Quantity,
    ) -> Result<Option<CartItem>, CartError> {
        match self.store.increment_cart_item(user, product, by).await {
            Ok(item) => Ok(item),
            Err(RepositoryError::QuantityOverflow) => Err(too_large()),
            Err(e) => Err(e.into()),
        }
    }

    /// Set the absolute quantity of one of the user's cart lines.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Validation` if `quantity` is missing or below 1,
    /// and `CartError::ItemNotFound` unless the line exists and belongs to
    /// `user`.
    #[tracing::instrument(skip(self))]
    pub async fn update_cart_item(
        &self,
        user: UserId,
        raw_item_id: &str,
        quantity: Option<i64>,
    ) -> Result<CartItemView, CartError> {
        let quantity = quantity
            .and_then(|q| Quantity::new(q).ok())
            .ok_or_else(|| CartError::Validation("Valid quantity is required".to_owned()))?;

        let item_id: CartItemId = raw_item_id.parse().map_err(|_| CartError::ItemNotFound)?;
        let item = self
            .store
            .set_cart_item_quantity(user, item_id, quantity)
            .await?
            .ok_or(CartError::ItemNotFound)?;

        let product = self.store.get_product(item.product_id).await?.ok_or_else(|| {
            RepositoryError::DataCorruption(format!(
                "cart item {} references missing product {}",
                item.id, item.product_id
            ))
        })?;

        Ok(item.into_view(product))
    }

    /// Remove one of the user's cart lines.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ItemNotFound` unless the line exists and belongs to
    /// `user`.
    #[tracing::instrument(skip(self))]
    pub async fn remove_from_cart(&self, user: UserId, raw_item_id: &str) -> Result<(), CartError> {
        let item_id: CartItemId = raw_item_id.parse().map_err(|_| CartError::ItemNotFound)?;
        if self.store.delete_cart_item(user, item_id).await? {
            Ok(())
        } else {
            Err(CartError::ItemNotFound)
        }
    }

    /// Remove every line from the user's cart. Succeeds on an empty cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the delete fails.
    #[tracing::instrument(skip(self))]
    pub async fn clear_cart(&self, user: UserId) -> Result<u64, CartError> {
        let removed = self.store.clear_cart(user).await?;
        tracing::debug!(removed, "cart cleared");
        Ok(removed)
    }
}

fn parse_quantity(value: i64) -> Result<Quantity, CartError> {
    Quantity::new(value).map_err(|e| match e {
        QuantityError::TooSmall => CartError::Validation("Quantity must be at least 1".to_owned()),
        QuantityError::TooLarge { .. } => too_large(),
    })
}

fn too_large() -> CartError {
    CartError::Validation(format!("Quantity must be at most {}", i32::MAX))
}
