//! Store capabilities. The core reaches persisted state only through these.
//!
//! Two capabilities are defined here:
//!
//! - [`AccessStore`]: access-code namespaces (`team_codes`, `coach_codes`,
//!   `company_codes`) plus the profile/role linkage written at sign-up.
//! - [`IdentityStore`]: email + password accounts.
//!
//! # Implementations
//!
//! - [`fallback`]: fixed allow-list, nothing persisted, no identity store
//! - [`memory`]: in-process maps, useful for demos and tests
//! - [`postgres`]: PostgreSQL via sqlx
//!
//! A backend is chosen once, at composition time (see [`crate::config`]).

pub mod fallback;
pub mod memory;
pub mod postgres;

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::models::{AccessCode, CodeKind, Profile, RoleLink, SignUpMetadata};

/// Errors raised by store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Duplicate record: {0}")]
    Conflict(String),

    #[error("Store not configured")]
    NotConfigured,
}

impl StoreError {
    /// Whether this error reports a uniqueness violation.
    pub fn is_conflict(&self) -> bool {
        match self {
            StoreError::Conflict(_) => true,
            StoreError::Db(sqlx::Error::Database(db)) => db.is_unique_violation(),
            _ => false,
        }
    }
}

/// Errors raised by identity stores. Messages are user-facing.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("User already registered")]
    EmailTaken(String),

    #[error("Password should be at least {0} characters")]
    WeakPassword(usize),

    #[error("Invalid login credentials")]
    InvalidCredentials,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Which backend a store talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreMode {
    Fallback,
    Memory,
    Postgres,
}

impl StoreMode {
    /// Whether writes to this backend survive the call that made them.
    pub fn is_persistent(&self) -> bool {
        !matches!(self, StoreMode::Fallback)
    }
}

impl fmt::Display for StoreMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StoreMode::Fallback => "fallback",
            StoreMode::Memory => "memory",
            StoreMode::Postgres => "postgres",
        };
        f.write_str(s)
    }
}

/// Access-code and profile storage.
#[async_trait]
pub trait AccessStore: Send + Sync {
    /// Look up a code by exact value within `kind`'s namespace, active or not.
    async fn find_code(&self, kind: CodeKind, value: &str)
    -> Result<Option<AccessCode>, StoreError>;

    /// Insert codes into `kind`'s namespace. A duplicate value fails the
    /// whole batch with [`StoreError::Conflict`].
    async fn insert_codes(&self, kind: CodeKind, codes: &[AccessCode]) -> Result<(), StoreError>;

    /// Set the `active` flag of an existing code. Returns `false` when no such
    /// code exists.
    async fn set_code_active(
        &self,
        kind: CodeKind,
        value: &str,
        active: bool,
    ) -> Result<bool, StoreError>;

    /// Insert the profile written at sign-up.
    async fn insert_profile(&self, profile: &Profile) -> Result<(), StoreError>;

    /// Insert the role linkage written at sign-up.
    async fn insert_role_link(&self, link: &RoleLink) -> Result<(), StoreError>;

    /// Fetch a profile by account id.
    async fn find_profile(&self, user_id: &str) -> Result<Option<Profile>, StoreError>;

    /// Backend this store talks to.
    fn mode(&self) -> StoreMode;
}

/// Email + password accounts.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Create an account, returning its id.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: &SignUpMetadata,
    ) -> Result<String, IdentityError>;

    /// Authenticate an existing account, returning its id.
    async fn sign_in_with_password(&self, email: &str, password: &str)
    -> Result<String, IdentityError>;
}

/// Normalize an email for account lookup.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}
