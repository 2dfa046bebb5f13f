//! Domain models for the API.
//!
//! These are validated records as the services see them. Wire shapes live in
//! `mindwhiz_core::wire`.

pub mod cart;
pub mod product;
pub mod user;

pub use cart::CartItem;
pub use product::NewProduct;
pub use user::{User, UserCredentials};
