//! Typed client for the Mindwhiz shop API.
//!
//! ```rust,ignore
//! let mut api = ApiClient::new("http://localhost:5000/api");
//! api.login("customer@mindwhiz.com", "password123").await?;
//! let item = api.add_to_cart(product.id, 2).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use mindwhiz_core::{
    Availability, CartItemId, CartItemView, ErrorBody, HealthResponse, LoginResponse,
    MessageResponse, Price, Product, ProductId,
};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, instrument};

/// Errors returned by [`ApiClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure or undecodable response.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with an error status.
    #[error("API error ({status}): {message}")]
    Api { status: StatusCode, message: String },
}

impl ClientError {
    /// HTTP status of an API error.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(_) => None,
        }
    }
}

/// Body of `POST /products`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProductRequest {
    pub name: String,
    pub description: String,
    pub price: Price,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability: Option<Availability>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// HTTP client for the shop API.
///
/// Holds the bearer token from the last successful [`login`](Self::login)
/// and attaches it to every request.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<SecretString>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for the API mounted at `base_url` (e.g. `http://localhost:5000/api`).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Create a client that reuses an existing `reqwest` client.
    #[must_use]
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Whether a bearer token is held.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Use an already issued token.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(SecretString::from(token.into()));
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match &self.token {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    /// Send a request and decode a JSON success body.
    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let response = check(builder.send().await?).await?;
        Ok(response.json().await?)
    }

    /// Log in and keep the issued token for later requests.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` with status 401 for bad credentials.
    #[instrument(skip(self, password))]
    pub async fn login(&mut self, email: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let body = json!({ "email": email, "password": password });
        let response: LoginResponse = self
            .send(self.request(Method::POST, "/login").json(&body))
            .await?;
        self.set_token(response.token.clone());
        debug!(user_id = %response.user.id, "logged in");
        Ok(response)
    }

    /// Forget the held token.
    pub fn logout(&mut self) {
        self.token = None;
    }

    /// Liveness probe.
    ///
    /// # Errors
    ///
    /// Returns error if the server is unreachable.
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        self.send(self.request(Method::GET, "/health")).await
    }

    /// All products, newest first.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn products(&self) -> Result<Vec<Product>, ClientError> {
        self.send(self.request(Method::GET, "/products")).await
    }

    /// One product.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` with status 404 if it does not exist.
    pub async fn product(&self, id: ProductId) -> Result<Product, ClientError> {
        self.send(self.request(Method::GET, &format!("/products/{id}")))
            .await
    }

    /// Create a product (admin only).
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` with 401/403 without an admin token and
    /// 400 on validation failure.
    #[instrument(skip(self, product), fields(name = %product.name))]
    pub async fn create_product(&self, product: &NewProductRequest) -> Result<Product, ClientError> {
        self.send(self.request(Method::POST, "/products").json(product))
            .await
    }

    /// The caller's cart.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` with 401 when not logged in.
    pub async fn cart(&self) -> Result<Vec<CartItemView>, ClientError> {
        self.send(self.request(Method::GET, "/cart")).await
    }

    /// Add a product to the cart, merging with an existing line.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` on validation failure, unknown or
    /// out-of-stock products.
    #[instrument(skip(self))]
    pub async fn add_to_cart(
        &self,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<CartItemView, ClientError> {
        let body = json!({ "productId": product_id, "quantity": quantity });
        self.send(self.request(Method::POST, "/cart").json(&body))
            .await
    }

    /// Set the quantity of a cart line.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` with 404 if the line is not the caller's.
    #[instrument(skip(self))]
    pub async fn update_cart_item(
        &self,
        item_id: CartItemId,
        quantity: i64,
    ) -> Result<CartItemView, ClientError> {
        let body = json!({ "quantity": quantity });
        self.send(
            self.request(Method::PUT, &format!("/cart/{item_id}"))
                .json(&body),
        )
        .await
    }

    /// Remove a cart line.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` with 404 if the line is not the caller's.
    pub async fn remove_from_cart(&self, item_id: CartItemId) -> Result<MessageResponse, ClientError> {
        self.send(self.request(Method::DELETE, &format!("/cart/{item_id}")))
            .await
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` with 401 when not logged in.
    pub async fn clear_cart(&self) -> Result<MessageResponse, ClientError> {
        self.send(self.request(Method::DELETE, "/cart")).await
    }
}

/// Turn an error status into `ClientError::Api` with the server's message.
async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    Err(ClientError::Api {
        status,
        message: error_message(status, &text),
    })
}

fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body).map_or_else(
        |_| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        },
        |body| body.error,
    )
}
