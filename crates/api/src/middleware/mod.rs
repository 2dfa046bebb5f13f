//! HTTP middleware and extractors.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (installed by the binary only)
//! 2. `TraceLayer` (request span with `request_id` / `user_id` fields)
//! 3. Request ID (fills the span field, echoes the header)
//! 4. CORS

pub mod auth;
pub mod request_id;

pub use auth::{RequireAdmin, RequireAuth};
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
