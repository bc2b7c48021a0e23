//! In-process stores backed by concurrent maps.
//!
//! State lives as long as the store value. Used by the `memory` backend and
//! throughout the test suites.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use super::{AccessStore, IdentityError, IdentityStore, StoreError, StoreMode, normalize_email};
use crate::auth::password;
use crate::models::{AccessCode, CodeKind, Profile, Role, RoleLink, SignUpMetadata};
use crate::uuid::uuidv7;

/// Access store keeping codes, profiles and role links in memory.
#[derive(Debug, Default)]
pub struct MemoryAccessStore {
    codes: DashMap<(CodeKind, String), AccessCode>,
    profiles: DashMap<String, Profile>,
    links: DashMap<(Role, String), RoleLink>,
}

impl MemoryAccessStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of codes held for `kind`, active or not.
    pub fn code_count(&self, kind: CodeKind) -> usize {
        self.codes.iter().filter(|e| e.key().0 == kind).count()
    }

    /// Role link stored for a user, if any.
    pub fn role_link(&self, role: Role, user_id: &str) -> Option<RoleLink> {
        self.links
            .get(&(role, user_id.to_string()))
            .map(|l| l.clone())
    }
}

#[async_trait]
impl AccessStore for MemoryAccessStore {
    async fn find_code(
        &self,
        kind: CodeKind,
        value: &str,
    ) -> Result<Option<AccessCode>, StoreError> {
        Ok(self
            .codes
            .get(&(kind, value.to_string()))
            .map(|c| c.clone()))
    }

    async fn insert_codes(&self, kind: CodeKind, codes: &[AccessCode]) -> Result<(), StoreError> {
        let mut inserted = Vec::with_capacity(codes.len());
        for code in codes {
            let key = (kind, code.value.clone());
            let taken = match self.codes.entry(key.clone()) {
                Entry::Occupied(_) => true,
                Entry::Vacant(slot) => {
                    slot.insert(code.clone());
                    false
                }
            };
            if taken {
                // Keep the batch all-or-nothing.
                for key in &inserted {
                    self.codes.remove(key);
                }
                return Err(StoreError::Conflict(code.value.clone()));
            }
            inserted.push(key);
        }
        Ok(())
    }

    async fn set_code_active(
        &self,
        kind: CodeKind,
        value: &str,
        active: bool,
    ) -> Result<bool, StoreError> {
        match self.codes.get_mut(&(kind, value.to_string())) {
            Some(mut code) => {
                code.active = active;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn insert_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        match self.profiles.entry(profile.user_id.clone()) {
            Entry::Occupied(_) => Err(StoreError::Conflict(format!(
                "profile for {}",
                profile.user_id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(profile.clone());
                Ok(())
            }
        }
    }

    async fn insert_role_link(&self, link: &RoleLink) -> Result<(), StoreError> {
        self.links
            .insert((link.role, link.user_id.clone()), link.clone());
        Ok(())
    }

    async fn find_profile(&self, user_id: &str) -> Result<Option<Profile>, StoreError> {
        Ok(self.profiles.get(user_id).map(|p| p.clone()))
    }

    fn mode(&self) -> StoreMode {
        StoreMode::Memory
    }
}

/// Account record held by [`MemoryIdentityStore`].
#[derive(Debug, Clone)]
struct Account {
    id: String,
    password_hash: String,
    metadata: SignUpMetadata,
}

/// Identity store keeping bcrypt-hashed accounts in memory, keyed by email.
#[derive(Debug, Default)]
pub struct MemoryIdentityStore {
    accounts: DashMap<String, Account>,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered accounts.
    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    /// Metadata recorded at sign-up for an email.
    pub fn metadata(&self, email: &str) -> Option<SignUpMetadata> {
        self.accounts
            .get(&normalize_email(email))
            .map(|a| a.metadata.clone())
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: &SignUpMetadata,
    ) -> Result<String, IdentityError> {
        password::check_strength(password)?;
        let email = normalize_email(email);
        let password_hash = password::hash_password(password)?;

        match self.accounts.entry(email.clone()) {
            Entry::Occupied(_) => Err(IdentityError::EmailTaken(email)),
            Entry::Vacant(slot) => {
                let id = uuidv7().to_string();
                slot.insert(Account {
                    id: id.clone(),
                    password_hash,
                    metadata: metadata.clone(),
                });
                Ok(id)
            }
        }
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<String, IdentityError> {
        let account = self
            .accounts
            .get(&normalize_email(email))
            .map(|a| a.clone())
            .ok_or(IdentityError::InvalidCredentials)?;

        if !password::verify_password(password, &account.password_hash)? {
            return Err(IdentityError::InvalidCredentials);
        }
        Ok(account.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(value: &str) -> AccessCode {
        AccessCode::issued(CodeKind::Team, value.to_string())
    }

    #[tokio::test]
    async fn inserted_code_is_found_under_its_kind() {
        let store = MemoryAccessStore::new();
        store
            .insert_codes(CodeKind::Team, &[code("ABCD1234")])
            .await
            .unwrap();
        assert!(store
            .find_code(CodeKind::Team, "ABCD1234")
            .await
            .unwrap()
            .is_some());
        assert!(store
            .find_code(CodeKind::Coach, "ABCD1234")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn duplicate_in_batch_rolls_back() {
        let store = MemoryAccessStore::new();
        store
            .insert_codes(CodeKind::Team, &[code("AAAA0000")])
            .await
            .unwrap();
        let err = store
            .insert_codes(CodeKind::Team, &[code("BBBB0000"), code("AAAA0000")])
            .await
            .unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(store.code_count(CodeKind::Team), 1);
    }

    #[tokio::test]
    async fn deactivation_keeps_the_record() {
        let store = MemoryAccessStore::new();
        store
            .insert_codes(CodeKind::Team, &[code("CCCC0000")])
            .await
            .unwrap();
        assert!(store
            .set_code_active(CodeKind::Team, "CCCC0000", false)
            .await
            .unwrap());
        let found = store
            .find_code(CodeKind::Team, "CCCC0000")
            .await
            .unwrap()
            .unwrap();
        assert!(!found.active);
        assert!(!store
            .set_code_active(CodeKind::Team, "MISSING0", false)
            .await
            .unwrap());
    }

    fn metadata() -> SignUpMetadata {
        SignUpMetadata {
            name: "Ada".into(),
            role: Role::Employee,
            code: "TEAM001".into(),
        }
    }

    #[tokio::test]
    async fn sign_up_then_sign_in() {
        let store = MemoryIdentityStore::new();
        let id = store
            .sign_up("ada@example.com", "secret123", &metadata())
            .await
            .unwrap();
        let again = store
            .sign_in_with_password("ADA@example.com", "secret123")
            .await
            .unwrap();
        assert_eq!(id, again);
        assert_eq!(store.metadata("ada@example.com"), Some(metadata()));
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = MemoryIdentityStore::new();
        store
            .sign_up("ada@example.com", "secret123", &metadata())
            .await
            .unwrap();
        let err = store
            .sign_up("ada@example.com", "another1", &metadata())
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::EmailTaken(_)));
        assert_eq!(err.to_string(), "User already registered");
        assert_eq!(store.account_count(), 1);
    }

    #[tokio::test]
    async fn weak_password_is_rejected() {
        let store = MemoryIdentityStore::new();
        let err = store
            .sign_up("ada@example.com", "123", &metadata())
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::WeakPassword(6)));
    }

    #[tokio::test]
    async fn wrong_password_is_invalid_credentials() {
        let store = MemoryIdentityStore::new();
        store
            .sign_up("ada@example.com", "secret123", &metadata())
            .await
            .unwrap();
        let err = store
            .sign_in_with_password("ada@example.com", "wrong-pass")
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::InvalidCredentials));
        let err = store
            .sign_in_with_password("nobody@example.com", "secret123")
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::InvalidCredentials));
    }
}
