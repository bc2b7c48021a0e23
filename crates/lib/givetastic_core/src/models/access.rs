//! Access-code domain models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Namespace partition for access codes. Each user role joins with a code of
/// exactly one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeKind {
    Team,
    Coach,
    Company,
}

impl CodeKind {
    /// All kinds, in seeding order.
    pub const ALL: [CodeKind; 3] = [CodeKind::Team, CodeKind::Coach, CodeKind::Company];

    pub fn as_str(&self) -> &'static str {
        match self {
            CodeKind::Team => "team",
            CodeKind::Coach => "coach",
            CodeKind::Company => "company",
        }
    }

    /// Storage namespace holding codes of this kind.
    pub fn table(&self) -> &'static str {
        match self {
            CodeKind::Team => "team_codes",
            CodeKind::Coach => "coach_codes",
            CodeKind::Company => "company_codes",
        }
    }
}

impl fmt::Display for CodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown code kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown code kind: {0}")]
pub struct UnknownCodeKind(pub String);

impl FromStr for CodeKind {
    type Err = UnknownCodeKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "team" => Ok(CodeKind::Team),
            "coach" => Ok(CodeKind::Coach),
            "company" => Ok(CodeKind::Company),
            _ => Err(UnknownCodeKind(s.to_string())),
        }
    }
}

/// An access code record as held by a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessCode {
    pub value: String,
    pub kind: CodeKind,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl AccessCode {
    /// A freshly issued, active code.
    pub fn issued(kind: CodeKind, value: String) -> Self {
        Self {
            value,
            kind,
            active: true,
            created_at: Utc::now(),
        }
    }
}
