//! Login route.

use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use mindwhiz_core::LoginResponse;

use crate::error::Result;
use crate::extract::ApiJson;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Login form data.
#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Exchange email and password for a bearer token.
#[instrument(skip(state, form))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let auth = AuthService::new(state.store(), state.tokens());
    let response = auth
        .login(
            form.email.as_deref().unwrap_or_default(),
            form.password.as_deref().unwrap_or_default(),
        )
        .await?;

    Ok(Json(response))
}
