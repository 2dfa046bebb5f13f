//! Mindwhiz Core - Shared types library.
//!
//! This crate provides common types used across all Mindwhiz components:
//! - `api` - JSON REST server for the catalog, auth and cart
//! - `client` - Typed HTTP client used by the storefront and tests
//! - `cli` - Command-line tools for migrations, seeding and users
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, quantities, emails and enums
//! - [`wire`] - JSON payloads exchanged between the API and its clients

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;
pub mod wire;

pub use types::*;
pub use wire::*;
