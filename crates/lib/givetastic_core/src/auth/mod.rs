//! Authentication: the entry flow, session identity and password policy.
//!
//! [`flow::AuthFlow`] validates the access code, talks to the identity
//! store when one is configured, and then logs the resulting identity into a
//! [`session::Session`].

pub mod flow;
pub mod password;
pub mod session;

use thiserror::Error;

use crate::store::{IdentityError, StoreError};

/// Hint shown when an access code is rejected.
pub const INVALID_CODE_MESSAGE: &str =
    "Invalid access code. Try: TEAM001 (employee), COACH001 (coach), or COMPANY001 (admin)";

/// Entry-flow errors. `Display` output is the user-facing message.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{}", INVALID_CODE_MESSAGE)]
    InvalidCode,

    #[error("{0}")]
    StoreUnavailable(String),

    #[error("{0}")]
    IdentityConflict(String),

    #[error("{0}")]
    Identity(String),

    #[error("{0}")]
    ProfileLinkage(String),

    #[error("Profile not found")]
    ProfileMissing,

    #[error("{0}")]
    Validation(String),
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        AuthError::StoreUnavailable(e.to_string())
    }
}

impl From<IdentityError> for AuthError {
    fn from(e: IdentityError) -> Self {
        match e {
            IdentityError::EmailTaken(_) => AuthError::IdentityConflict(e.to_string()),
            IdentityError::Store(inner) => AuthError::from(inner),
            other => AuthError::Identity(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_code_message_names_example_codes() {
        let msg = AuthError::InvalidCode.to_string();
        assert!(msg.contains("TEAM001"));
        assert!(msg.contains("COACH001"));
        assert!(msg.contains("COMPANY001"));
    }

    #[test]
    fn identity_errors_surface_verbatim() {
        let conflict = AuthError::from(IdentityError::EmailTaken("a@b.c".into()));
        assert!(matches!(conflict, AuthError::IdentityConflict(_)));
        assert_eq!(conflict.to_string(), "User already registered");

        let creds = AuthError::from(IdentityError::InvalidCredentials);
        assert_eq!(creds.to_string(), "Invalid login credentials");

        let store = AuthError::from(IdentityError::Store(StoreError::Unavailable(
            "timeout".into(),
        )));
        assert!(matches!(store, AuthError::StoreUnavailable(_)));
    }
}
