//! Fallback access store: a fixed allow-list for disconnected or demo runs.
//!
//! Lookups answer from [`ALLOW_LIST`]. Inserts succeed without persisting
//! anything, so a code issued in fallback mode cannot be looked up again.
//! Revocation and profile writes are refused with
//! [`StoreError::NotConfigured`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{AccessStore, StoreError, StoreMode};
use crate::models::{AccessCode, CodeKind, Profile, RoleLink};

/// Codes accepted in fallback mode, per kind.
pub const ALLOW_LIST: [(CodeKind, &[&str]); 3] = [
    (
        CodeKind::Team,
        &["TEAM001", "TEAM002", "TEAM003", "TEAM004", "TEAM005"],
    ),
    (CodeKind::Coach, &["COACH001", "COACH002", "COACH003"]),
    (CodeKind::Company, &["COMPANY001", "COMPANY002"]),
];

/// Allow-listed codes for one kind.
pub fn allowed_codes(kind: CodeKind) -> &'static [&'static str] {
    ALLOW_LIST
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, codes)| *codes)
        .unwrap_or_default()
}

/// Access store backed by [`ALLOW_LIST`].
#[derive(Debug, Default, Clone, Copy)]
pub struct FallbackAccessStore;

impl FallbackAccessStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AccessStore for FallbackAccessStore {
    async fn find_code(
        &self,
        kind: CodeKind,
        value: &str,
    ) -> Result<Option<AccessCode>, StoreError> {
        Ok(allowed_codes(kind)
            .iter()
            .find(|code| **code == value)
            .map(|code| AccessCode {
                value: (*code).to_string(),
                kind,
                active: true,
                created_at: DateTime::<Utc>::UNIX_EPOCH,
            }))
    }

    async fn insert_codes(&self, kind: CodeKind, codes: &[AccessCode]) -> Result<(), StoreError> {
        tracing::debug!(%kind, count = codes.len(), "fallback store: insert not persisted");
        Ok(())
    }

    async fn set_code_active(
        &self,
        _kind: CodeKind,
        _value: &str,
        _active: bool,
    ) -> Result<bool, StoreError> {
        Err(StoreError::NotConfigured)
    }

    async fn insert_profile(&self, _profile: &Profile) -> Result<(), StoreError> {
        Err(StoreError::NotConfigured)
    }

    async fn insert_role_link(&self, _link: &RoleLink) -> Result<(), StoreError> {
        Err(StoreError::NotConfigured)
    }

    async fn find_profile(&self, _user_id: &str) -> Result<Option<Profile>, StoreError> {
        Err(StoreError::NotConfigured)
    }

    fn mode(&self) -> StoreMode {
        StoreMode::Fallback
    }
}
