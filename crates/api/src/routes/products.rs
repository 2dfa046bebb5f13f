//! Product route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use mindwhiz_core::Product;

use crate::error::Result;
use crate::extract::ApiJson;
use crate::middleware::RequireAdmin;
use crate::services::catalog::{CatalogService, ProductDraft};
use crate::state::AppState;

/// List the catalog, newest first.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = CatalogService::new(state.store()).list_products().await?;
    Ok(Json(products))
}

/// Show one product.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Product>> {
    let product = CatalogService::new(state.store()).get_product(&id).await?;
    Ok(Json(product))
}

/// Create a product (admin only).
#[instrument(skip(state, admin, draft), fields(admin_id = %admin.user_id))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiJson(draft): ApiJson<ProductDraft>,
) -> Result<(StatusCode, Json<Product>)> {
    let product = CatalogService::new(state.store())
        .create_product(draft)
        .await?;
    Ok((StatusCode::CREATED, Json(product)))
}
