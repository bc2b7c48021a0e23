//! # givetastic_core
//!
//! Core domain logic for Givetastic: role-scoped access codes, the entry
//! flow that turns a code into a session identity, and view gating.

pub mod access;
pub mod auth;
pub mod config;
pub mod migrate;
pub mod models;
pub mod navigation;
pub mod store;
pub mod uuid;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
