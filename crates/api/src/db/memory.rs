//! In-memory [`Store`] for unit tests.
//!
//! Enforces the same uniqueness rules as the database: one user per email and
//! one cart row per (user, product).
#![allow(clippy::unwrap_used)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;

use mindwhiz_core::{CartItemId, Email, Product, ProductId, Quantity, Role, UserId};

use super::{CartRepository, ProductRepository, RepositoryError, Store, UserRepository};
use crate::models::{CartItem, NewProduct, User, UserCredentials};

#[derive(Default)]
struct Tables {
    users: Vec<UserCredentials>,
    products: Vec<Product>,
    cart: Vec<CartItem>,
    next_id: i32,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `ping` fail, as if the database went away.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of cart rows across all users.
    pub fn cart_row_count(&self) -> usize {
        self.tables.lock().unwrap().cart.len()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_user_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<UserCredentials>, RepositoryError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| &u.user.email == email).cloned())
    }

    async fn create_user(
        &self,
        email: &Email,
        password_hash: &str,
        role: Role,
    ) -> Result<User, RepositoryError> {
        let mut tables = self.tables.lock().unwrap();
        if tables.users.iter().any(|u| &u.user.email == email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }
        let now = Utc::now();
        let user = User {
            id: UserId::new(tables.next_id()),
            email: email.clone(),
            role,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(UserCredentials {
            user: user.clone(),
            password_hash: password_hash.to_owned(),
        });
        Ok(user)
    }
}

#[async_trait]
impl ProductRepository for MemoryStore {
    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError> {
        let mut products = self.tables.lock().unwrap().products.clone();
        products.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(products)
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.products.iter().find(|p| p.id == id).cloned())
    }

    async fn get_products(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .products
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn create_product(&self, product: &NewProduct) -> Result<Product, RepositoryError> {
        let mut tables = self.tables.lock().unwrap();
        let now = Utc::now();
        let product = Product {
            id: ProductId::new(tables.next_id()),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            availability: product.availability,
            image_url: product.image_url.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.products.push(product.clone());
        Ok(product)
    }
}

#[async_trait]
impl CartRepository for MemoryStore {
    async fn list_cart_items(&self, user: UserId) -> Result<Vec<CartItem>, RepositoryError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .cart
            .iter()
            .filter(|item| item.user_id == user)
            .cloned()
            .collect())
    }

    async fn increment_cart_item(
        &self,
        user: UserId,
        product: ProductId,
        by: Quantity,
    ) -> Result<Option<CartItem>, RepositoryError> {
        let mut tables = self.tables.lock().unwrap();
        let Some(item) = tables
            .cart
            .iter_mut()
            .find(|item| item.user_id == user && item.product_id == product)
        else {
            return Ok(None);
        };
        item.quantity = item
            .quantity
            .checked_add(by)
            .ok_or(RepositoryError::QuantityOverflow)?;
        item.updated_at = Utc::now();
        Ok(Some(item.clone()))
    }

    async fn insert_cart_item(
        &self,
        user: UserId,
        product: ProductId,
        quantity: Quantity,
    ) -> Result<CartItem, RepositoryError> {
        let mut tables = self.tables.lock().unwrap();
        if tables
            .cart
            .iter()
            .any(|item| item.user_id == user && item.product_id == product)
        {
            return Err(RepositoryError::Conflict("item already in cart".to_owned()));
        }
        let now = Utc::now();
        let item = CartItem {
            id: CartItemId::new(tables.next_id()),
            user_id: user,
            product_id: product,
            quantity,
            created_at: now,
            updated_at: now,
        };
        tables.cart.push(item.clone());
        Ok(item)
    }

    async fn set_cart_item_quantity(
        &self,
        user: UserId,
        item: CartItemId,
        quantity: Quantity,
    ) -> Result<Option<CartItem>, RepositoryError> {
        let mut tables = self.tables.lock().unwrap();
        Ok(tables
            .cart
            .iter_mut()
            .find(|row| row.id == item && row.user_id == user)
            .map(|row| {
                row.quantity = quantity;
                row.updated_at = Utc::now();
                row.clone()
            }))
    }

    async fn delete_cart_item(
        &self,
        user: UserId,
        item: CartItemId,
    ) -> Result<bool, RepositoryError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.cart.len();
        tables
            .cart
            .retain(|row| !(row.id == item && row.user_id == user));
        Ok(tables.cart.len() < before)
    }

    async fn clear_cart(&self, user: UserId) -> Result<u64, RepositoryError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.cart.len();
        tables.cart.retain(|row| row.user_id != user);
        Ok((before - tables.cart.len()) as u64)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RepositoryError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}
