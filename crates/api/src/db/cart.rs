//! `shop.cart_item` queries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use mindwhiz_core::{CartItemId, ProductId, Quantity, UserId};

use super::{
    CartRepository, PgStore, RepositoryError, conflict_on_unique, overflow_on_out_of_range,
};
use crate::models::CartItem;

const CART_COLUMNS: &str = "id, user_id, product_id, quantity, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct CartItemRow {
    id: i32,
    user_id: i32,
    product_id: i32,
    quantity: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CartItemRow> for CartItem {
    type Error = RepositoryError;

    fn try_from(row: CartItemRow) -> Result<Self, Self::Error> {
        let quantity = Quantity::new(i64::from(row.quantity)).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid quantity for cart item {}: {e}", row.id))
        })?;

        Ok(Self {
            id: CartItemId::new(row.id),
            user_id: UserId::new(row.user_id),
            product_id: ProductId::new(row.product_id),
            quantity,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl CartRepository for PgStore {
    async fn list_cart_items(&self, user: UserId) -> Result<Vec<CartItem>, RepositoryError> {
        let sql = format!(
            "SELECT {CART_COLUMNS} FROM shop.cart_item WHERE user_id = $1 ORDER BY created_at ASC, id ASC"
        );
        let rows = sqlx::query_as::<_, CartItemRow>(&sql)
            .bind(user.as_i32())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(CartItem::try_from).collect()
    }

    async fn increment_cart_item(
        &self,
        user: UserId,
        product: ProductId,
        by: Quantity,
    ) -> Result<Option<CartItem>, RepositoryError> {
        // Single statement so concurrent adds never lose an increment
        let sql = format!(
            r"
            UPDATE shop.cart_item
            SET quantity = quantity + $3, updated_at = now()
            WHERE user_id = $1 AND product_id = $2
            RETURNING {CART_COLUMNS}
            "
        );
        let row = sqlx::query_as::<_, CartItemRow>(&sql)
            .bind(user.as_i32())
            .bind(product.as_i32())
            .bind(by.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(overflow_on_out_of_range)?;

        row.map(CartItem::try_from).transpose()
    }

    async fn insert_cart_item(
        &self,
        user: UserId,
        product: ProductId,
        quantity: Quantity,
    ) -> Result<CartItem, RepositoryError> {
        let sql = format!(
            r"
            INSERT INTO shop.cart_item (user_id, product_id, quantity)
            VALUES ($1, $2, $3)
            RETURNING {CART_COLUMNS}
            "
        );
        let row = sqlx::query_as::<_, CartItemRow>(&sql)
            .bind(user.as_i32())
            .bind(product.as_i32())
            .bind(quantity.get())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| conflict_on_unique(e, "item already in cart"))?;

        CartItem::try_from(row)
    }

    async fn set_cart_item_quantity(
        &self,
        user: UserId,
        item: CartItemId,
        quantity: Quantity,
    ) -> Result<Option<CartItem>, RepositoryError> {
        let sql = format!(
            r"
            UPDATE shop.cart_item
            SET quantity = $3, updated_at = now()
            WHERE id = $1 AND user_id = $2
            RETURNING {CART_COLUMNS}
            "
        );
        let row = sqlx::query_as::<_, CartItemRow>(&sql)
            .bind(item.as_i32())
            .bind(user.as_i32())
            .bind(quantity.get())
            .fetch_optional(&self.pool)
            .await?;

        row.map(CartItem::try_from).transpose()
    }

    async fn delete_cart_item(
        &self,
        user: UserId,
        item: CartItemId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.cart_item WHERE id = $1 AND user_id = $2")
            .bind(item.as_i32())
            .bind(user.as_i32())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn clear_cart(&self, user: UserId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.cart_item WHERE user_id = $1")
            .bind(user.as_i32())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
