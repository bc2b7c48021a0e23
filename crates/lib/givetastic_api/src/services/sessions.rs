//! Per-client sessions keyed by an opaque cookie token.
//!
//! Each token owns its own [`Session`] slot, so two browsers never share an
//! identity. Entries are only touched synchronously: callers finish every
//! `.await` before opening or reading a session.
//!
//! Entries live for [`SESSION_TTL`] after they are opened. An expired entry
//! reads as anonymous and is dropped on lookup; `open` sweeps the rest.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use givetastic_core::auth::flow::Admission;
use givetastic_core::auth::session::Session;
use givetastic_core::models::UserIdentity;
use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use tracing::debug;

const TOKEN_LEN: usize = 64;

/// Server-side session lifetime. Matches the cookie `Max-Age`.
pub const SESSION_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Generate a random session token (64 alphanumeric chars).
fn generate_token() -> String {
    rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

struct Entry {
    session: Session,
    opened_at: Instant,
}

impl Entry {
    fn is_live(&self, ttl: Duration) -> bool {
        self.opened_at.elapsed() < ttl
    }
}

#[derive(Clone)]
pub struct SessionTable {
    sessions: Arc<DashMap<String, Entry>>,
    ttl: Duration,
}

impl Default for SessionTable {
    fn default() -> Self {
        Self::with_ttl(SESSION_TTL)
    }
}

impl SessionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            ttl,
        }
    }

    /// Log `admission` into a fresh session and return its token.
    pub fn open(&self, admission: &Admission) -> (String, UserIdentity) {
        self.sweep();

        let token = generate_token();
        let mut session = Session::new();
        let user = session
            .login(admission.role, &admission.code, &admission.name)
            .clone();
        self.sessions.insert(
            token.clone(),
            Entry {
                session,
                opened_at: Instant::now(),
            },
        );
        debug!(user_id = %user.id(), role = %user.role(), "session opened");
        (token, user)
    }

    /// The identity logged into `token`'s session, if any and not expired.
    pub fn current(&self, token: &str) -> Option<UserIdentity> {
        {
            let entry = self.sessions.get(token)?;
            if entry.is_live(self.ttl) {
                return entry.session.current_user().cloned();
            }
        }
        // The read guard is released before removing.
        self.sessions.remove_if(token, |_, e| !e.is_live(self.ttl));
        debug!("expired session dropped");
        None
    }

    /// Drop every expired entry.
    fn sweep(&self) {
        let before = self.sessions.len();
        self.sessions.retain(|_, e| e.is_live(self.ttl));
        let swept = before.saturating_sub(self.sessions.len());
        if swept > 0 {
            debug!(swept, "expired sessions swept");
        }
    }

    /// Log out and forget `token`. Returns whether a session existed.
    pub fn end(&self, token: &str) -> bool {
        match self.sessions.remove(token) {
            Some((_, mut entry)) => {
                entry.session.logout();
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use givetastic_core::models::Role;

    use super::*;

    fn admission(role: Role, code: &str) -> Admission {
        Admission {
            role,
            code: code.into(),
            name: "Ada".into(),
        }
    }

    #[test]
    fn tokens_are_long_and_distinct() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), TOKEN_LEN);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }

    #[test]
    fn sessions_are_isolated_per_token() {
        let table = SessionTable::new();
        let (employee, _) = table.open(&admission(Role::Employee, "TEAM001"));
        let (coach, _) = table.open(&admission(Role::Coach, "COACH001"));

        assert_eq!(table.current(&employee).unwrap().role(), Role::Employee);
        assert_eq!(table.current(&coach).unwrap().role(), Role::Coach);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn end_is_idempotent() {
        let table = SessionTable::new();
        let (token, user) = table.open(&admission(Role::Admin, "COMPANY001"));
        assert_eq!(user.company_code(), Some("COMPANY001"));

        assert!(table.end(&token));
        assert!(!table.end(&token));
        assert!(table.current(&token).is_none());
        assert!(table.is_empty());
    }

    #[test]
    fn expired_session_reads_as_anonymous() {
        let table = SessionTable::with_ttl(Duration::ZERO);
        let (token, _) = table.open(&admission(Role::Employee, "TEAM001"));

        assert!(table.current(&token).is_none());
        assert!(table.is_empty());
    }

    #[test]
    fn open_sweeps_expired_sessions() {
        let table = SessionTable::with_ttl(Duration::ZERO);
        let (first, _) = table.open(&admission(Role::Employee, "TEAM001"));
        let (second, _) = table.open(&admission(Role::Coach, "COACH001"));

        assert_eq!(table.len(), 1);
        assert!(!table.end(&first));
        assert!(table.end(&second));
    }

    #[test]
    fn live_sessions_survive_a_sweep() {
        let table = SessionTable::new();
        let (first, _) = table.open(&admission(Role::Employee, "TEAM001"));
        table.open(&admission(Role::Coach, "COACH001"));

        assert_eq!(table.len(), 2);
        assert_eq!(table.current(&first).unwrap().role(), Role::Employee);
    }
}
