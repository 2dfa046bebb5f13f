//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Password login, bearer tokens, role gate
//! - `catalog` - Product listing and creation
//! - `cart` - Per-user cart with merge-on-add
//!
//! Services borrow a repository for the duration of a request and are
//! generic over it, so handlers pass the shared `dyn Store` and tests pass
//! the in-memory store.

pub mod auth;
pub mod cart;
pub mod catalog;
