//! Cart route handlers.
//!
//! Every route requires a bearer token and only ever touches the caller's
//! own cart.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use mindwhiz_core::{CartItemView, MessageResponse};

use crate::error::Result;
use crate::extract::{ApiJson, IdInput};
use crate::middleware::RequireAuth;
use crate::services::cart::{AddOutcome, CartService};
use crate::state::AppState;

/// Add-to-cart form data.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    #[serde(default)]
    pub product_id: Option<IdInput>,
    #[serde(default)]
    pub quantity: Option<i64>,
}

/// Update-quantity form data.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    #[serde(default)]
    pub quantity: Option<i64>,
}

/// The caller's cart with products resolved.
#[instrument(skip(state, identity), fields(user_id = %identity.user_id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(identity): RequireAuth,
) -> Result<Json<Vec<CartItemView>>> {
    let items = CartService::new(state.store())
        .get_cart(identity.user_id)
        .await?;
    Ok(Json(items))
}

/// Add a product, merging into an existing line.
///
/// Responds 201 for a new line and 200 when merged.
#[instrument(skip(state, identity), fields(user_id = %identity.user_id))]
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(identity): RequireAuth,
    ApiJson(form): ApiJson<AddToCartRequest>,
) -> Result<(StatusCode, Json<CartItemView>)> {
    let product_id = form.product_id.as_ref().map(IdInput::to_text);
    let (item, outcome) = CartService::new(state.store())
        .add_to_cart(identity.user_id, product_id.as_deref(), form.quantity)
        .await?;

    let status = match outcome {
        AddOutcome::Created => StatusCode::CREATED,
        AddOutcome::Merged => StatusCode::OK,
    };
    Ok((status, Json(item)))
}

/// Set the quantity of one line.
#[instrument(skip(state, identity), fields(user_id = %identity.user_id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(identity): RequireAuth,
    Path(item_id): Path<String>,
    ApiJson(form): ApiJson<UpdateQuantityRequest>,
) -> Result<Json<CartItemView>> {
    let item = CartService::new(state.store())
        .update_cart_item(identity.user_id, &item_id, form.quantity)
        .await?;
    Ok(Json(item))
}

/// Remove one line.
#[instrument(skip(state, identity), fields(user_id = %identity.user_id))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(identity): RequireAuth,
    Path(item_id): Path<String>,
) -> Result<Json<MessageResponse>> {
    CartService::new(state.store())
        .remove_from_cart(identity.user_id, &item_id)
        .await?;
    Ok(Json(MessageResponse::new("Item removed from cart")))
}

/// Empty the cart.
#[instrument(skip(state, identity), fields(user_id = %identity.user_id))]
pub async fn clear(
    State(state): State<AppState>,
    RequireAuth(identity): RequireAuth,
) -> Result<Json<MessageResponse>> {
    CartService::new(state.store())
        .clear_cart(identity.user_id)
        .await?;
    Ok(Json(MessageResponse::new("Cart cleared")))
}
