//! Mindwhiz shop API library.
//!
//! The server is exposed as a library so the router can be exercised in
//! tests and the CLI can reuse the auth and persistence layers.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
