//! Services backing the request handlers.

pub mod cookies;
pub mod sessions;
