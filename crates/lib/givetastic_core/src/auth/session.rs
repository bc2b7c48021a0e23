//! Session identity: who is using this client right now.
//!
//! A [`Session`] is a plain value owned by whoever composes the application
//! (one per HTTP client, one per CLI run). It never validates anything;
//! callers run the access-code check before [`Session::login`].

use crate::models::{Role, UserIdentity};

/// A single current-identity slot.
///
/// `ANONYMOUS -[login]-> AUTHENTICATED(role) -[logout]-> ANONYMOUS`
#[derive(Debug, Clone, Default)]
pub struct Session {
    current: Option<UserIdentity>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Establish `role`/`code`/`name` as the current identity, replacing any
    /// previous one.
    pub fn login(&mut self, role: Role, code: &str, name: &str) -> &UserIdentity {
        self.current.insert(UserIdentity::new(role, code, name))
    }

    /// Clear the current identity. Idempotent.
    pub fn logout(&mut self) {
        self.current = None;
    }

    pub fn current_user(&self) -> Option<&UserIdentity> {
        self.current.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }
}
