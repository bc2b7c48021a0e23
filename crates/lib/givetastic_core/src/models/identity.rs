//! Identity domain models.
//!
//! These are internal domain models. The HTTP layer serializes
//! [`UserIdentity`] directly, so its JSON form uses camelCase and omits the
//! code fields that do not belong to the identity's role.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::access::CodeKind;
use crate::uuid::uuidv7;

/// User role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Employee,
    Admin,
    Coach,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employee => "employee",
            Role::Admin => "admin",
            Role::Coach => "coach",
        }
    }

    /// The access-code namespace this role joins with.
    pub fn code_kind(&self) -> CodeKind {
        match self {
            Role::Employee => CodeKind::Team,
            Role::Admin => CodeKind::Company,
            Role::Coach => CodeKind::Coach,
        }
    }

    /// Label shown next to the code input for this role.
    pub fn code_label(&self) -> &'static str {
        match self {
            Role::Employee => "Team Code",
            Role::Admin => "Company Code",
            Role::Coach => "Coach Code",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown role.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "employee" => Ok(Role::Employee),
            "admin" => Ok(Role::Admin),
            "coach" => Ok(Role::Coach),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

/// The user currently holding a session.
///
/// Exactly one of `team_code`, `company_code`, `coach_code` is set, chosen by
/// `role`. The fields are private so that invariant cannot be broken after
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    id: String,
    name: String,
    role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    team_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    company_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    coach_code: Option<String>,
}

impl UserIdentity {
    /// Build an identity with a fresh opaque id, stamping `code` into the
    /// field that matches `role`.
    pub fn new(role: Role, code: &str, name: &str) -> Self {
        let code = Some(code.to_string());
        let (team_code, company_code, coach_code) = match role {
            Role::Employee => (code, None, None),
            Role::Admin => (None, code, None),
            Role::Coach => (None, None, code),
        };
        Self {
            id: uuidv7().to_string(),
            name: name.to_string(),
            role,
            team_code,
            company_code,
            coach_code,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn team_code(&self) -> Option<&str> {
        self.team_code.as_deref()
    }

    pub fn company_code(&self) -> Option<&str> {
        self.company_code.as_deref()
    }

    pub fn coach_code(&self) -> Option<&str> {
        self.coach_code.as_deref()
    }

    /// The code this identity logged in with, whichever field holds it.
    pub fn access_code(&self) -> &str {
        self.team_code
            .as_deref()
            .or(self.company_code.as_deref())
            .or(self.coach_code.as_deref())
            .unwrap_or_default()
    }
}

/// Profile record written at sign-up and read back at sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: String,
    pub name: String,
    pub role: Role,
    pub email: String,
}

/// Link between a signed-up user and the code they joined with.
///
/// Stored in `team_members`, `coaches` or `companies` depending on role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleLink {
    pub user_id: String,
    pub role: Role,
    pub code: String,
}

impl RoleLink {
    /// Storage namespace for this link.
    pub fn table(&self) -> &'static str {
        match self.role {
            Role::Employee => "team_members",
            Role::Coach => "coaches",
            Role::Admin => "companies",
        }
    }

    /// Column holding the code within [`RoleLink::table`].
    pub fn code_column(&self) -> &'static str {
        match self.role {
            Role::Employee => "team_code",
            Role::Coach => "coach_code",
            Role::Admin => "company_code",
        }
    }
}

/// Metadata attached to an account at sign-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignUpMetadata {
    pub name: String,
    pub role: Role,
    pub code: String,
}
