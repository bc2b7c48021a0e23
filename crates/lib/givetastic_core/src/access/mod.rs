//! Access codes: generation, validation, issuance and revocation.
//!
//! [`AccessCodeRegistry`] is the only component that creates or changes
//! access-code records. It works against any [`crate::store::AccessStore`];
//! with the fallback store it validates against a fixed allow-list and
//! returns issued codes without persisting them.

pub mod code;
pub mod registry;

use thiserror::Error;

use crate::models::CodeKind;
use crate::store::StoreError;

pub use registry::{AccessCodeRegistry, MAX_SEED_COUNT, SeedCounts, SeedReport};

/// Access-code registry errors.
#[derive(Debug, Error)]
pub enum AccessError {
    #[error("Store not configured")]
    NotConfigured,

    #[error("{0}")]
    Invalid(String),

    #[error("Could not generate a unique {kind} code after {attempts} attempts")]
    Exhausted { kind: CodeKind, attempts: usize },

    #[error(transparent)]
    Store(#[from] StoreError),
}
