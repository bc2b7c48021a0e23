//! Request handlers.

pub mod auth;
pub mod codes;
pub mod hello;
pub mod views;
