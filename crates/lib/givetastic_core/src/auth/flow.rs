//! The entry flow: access-code check, optional account step, session login.
//!
//! 1. Upper-case the submitted code.
//! 2. Validate it under the role's code kind. Reject with
//!    [`AuthError::InvalidCode`] otherwise.
//! 3. With an identity store: sign up (account, profile, role link) or sign
//!    in (account, profile lookup). Without one: mock path, display name
//!    from the form.
//! 4. Log the identity into the session and report the landing view.
//!
//! Any failure leaves the session anonymous.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use super::AuthError;
use super::session::Session;
use crate::access::AccessCodeRegistry;
use crate::access::code::normalize;
use crate::models::{Profile, Role, RoleLink, SignUpMetadata};
use crate::navigation::View;
use crate::store::{IdentityStore, StoreError};

/// Whether the user is creating an account or returning to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntryMode {
    SignUp,
    SignIn,
}

/// What the entry form submits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryRequest {
    pub mode: EntryMode,
    pub role: Role,
    pub code: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// A caller who passed the entry flow, not yet logged into any session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admission {
    pub role: Role,
    pub code: String,
    pub name: String,
}

impl Admission {
    /// Where this caller lands after logging in.
    pub fn landing(&self) -> View {
        View::landing(self.role)
    }

    /// Log this admission into `session`.
    pub fn login(&self, session: &mut Session) -> View {
        session.login(self.role, &self.code, &self.name);
        self.landing()
    }
}

/// Display name for the mock path: the given name, else the email's local
/// part.
pub fn display_name(name: Option<&str>, email: Option<&str>) -> String {
    match name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => name.to_string(),
        None => email
            .and_then(|e| e.split('@').next())
            .unwrap_or_default()
            .to_string(),
    }
}

fn required<'a>(value: Option<&'a str>, message: &str) -> Result<&'a str, AuthError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AuthError::Validation(message.to_string()))
}

/// Composes the access-code registry with an optional identity store.
#[derive(Clone)]
pub struct AuthFlow {
    registry: AccessCodeRegistry,
    identity: Option<Arc<dyn IdentityStore>>,
}

impl AuthFlow {
    pub fn new(registry: AccessCodeRegistry, identity: Option<Arc<dyn IdentityStore>>) -> Self {
        Self { registry, identity }
    }

    pub fn registry(&self) -> &AccessCodeRegistry {
        &self.registry
    }

    /// Whether real accounts are used (otherwise the mock path runs).
    pub fn has_identity_store(&self) -> bool {
        self.identity.is_some()
    }

    /// Run steps 1–3 without touching any session.
    pub async fn admit(&self, request: &EntryRequest) -> Result<Admission, AuthError> {
        let code = normalize(&request.code);
        let kind = request.role.code_kind();

        if !self.registry.validate(kind, &code).await {
            warn!(role = %request.role, %kind, "rejected access code");
            return Err(AuthError::InvalidCode);
        }

        let Some(identity) = &self.identity else {
            info!(role = %request.role, "identity store not configured, using mock authentication");
            return Ok(Admission {
                role: request.role,
                code,
                name: display_name(request.name.as_deref(), request.email.as_deref()),
            });
        };

        match request.mode {
            EntryMode::SignUp => self.sign_up(identity.as_ref(), request, code).await,
            EntryMode::SignIn => self.sign_in(identity.as_ref(), request, code).await,
        }
    }

    /// Run the whole flow against `session`, returning the landing view.
    pub async fn submit(
        &self,
        session: &mut Session,
        request: &EntryRequest,
    ) -> Result<View, AuthError> {
        match self.admit(request).await {
            Ok(admission) => Ok(admission.login(session)),
            Err(e) => {
                session.logout();
                Err(e)
            }
        }
    }

    async fn sign_up(
        &self,
        identity: &dyn IdentityStore,
        request: &EntryRequest,
        code: String,
    ) -> Result<Admission, AuthError> {
        let email = required(request.email.as_deref(), "Email is required")?;
        let password = required(request.password.as_deref(), "Password is required")?;
        let name = required(request.name.as_deref(), "Name is required")?;
        let role = request.role;

        let metadata = SignUpMetadata {
            name: name.to_string(),
            role,
            code: code.clone(),
        };
        let user_id = identity.sign_up(email, password, &metadata).await?;
        info!(%user_id, %role, "account created");

        let store = self.registry.store();
        let profile = Profile {
            user_id: user_id.clone(),
            name: name.to_string(),
            role,
            email: email.to_string(),
        };
        store
            .insert_profile(&profile)
            .await
            .map_err(|e| linkage_failure(&user_id, "profile", e))?;

        let link = RoleLink {
            user_id: user_id.clone(),
            role,
            code: code.clone(),
        };
        store
            .insert_role_link(&link)
            .await
            .map_err(|e| linkage_failure(&user_id, link.table(), e))?;

        Ok(Admission {
            role,
            code,
            name: name.to_string(),
        })
    }

    async fn sign_in(
        &self,
        identity: &dyn IdentityStore,
        request: &EntryRequest,
        code: String,
    ) -> Result<Admission, AuthError> {
        let email = required(request.email.as_deref(), "Email is required")?;
        let password = required(request.password.as_deref(), "Password is required")?;

        let user_id = identity.sign_in_with_password(email, password).await?;
        let profile = self
            .registry
            .store()
            .find_profile(&user_id)
            .await?
            .ok_or(AuthError::ProfileMissing)?;

        // The stored profile decides role and name, not the form.
        Ok(Admission {
            role: profile.role,
            code,
            name: profile.name,
        })
    }
}

/// The account exists but its profile/role rows do not. Nothing is rolled
/// back.
fn linkage_failure(user_id: &str, step: &str, e: StoreError) -> AuthError {
    error!(%user_id, step, error = %e, "account created but profile linkage failed");
    AuthError::ProfileLinkage(e.to_string())
}
