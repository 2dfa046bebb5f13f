//! Cart row type.

use chrono::{DateTime, Utc};

use mindwhiz_core::{CartItemId, CartItemView, Product, ProductId, Quantity, UserId};

/// A cart row as stored, with the product still a reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    pub id: CartItemId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: Quantity,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CartItem {
    /// Attach the resolved product to produce the wire view.
    #[must_use]
    pub fn into_view(self, product: Product) -> CartItemView {
        CartItemView {
            id: self.id,
            user_id: self.user_id,
            product,
            quantity: self.quantity,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
