//! Request and response bodies. JSON field names are camelCase.

use givetastic_core::models::{CodeKind, Role, UserIdentity};
use givetastic_core::navigation::Navigation;
use givetastic_core::store::StoreMode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HelloResponse {
    pub greeting: String,
    pub version: String,
    pub store_mode: StoreMode,
    pub identity_store: bool,
}

/// Body of `POST /auth/sign-up` and `POST /auth/sign-in`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryBody {
    pub role: Role,
    pub code: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user: UserIdentity,
    /// Path of the view the client should show.
    pub landing: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutResponse {
    pub logged_out: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ViewQuery {
    pub path: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewResponse {
    pub requested: String,
    /// `action` (`render` or `redirect`) and the resulting `path`.
    #[serde(flatten)]
    pub navigation: Navigation,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValidateCodeRequest {
    pub kind: CodeKind,
    pub code: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateCodeResponse {
    pub kind: CodeKind,
    pub code: String,
    pub valid: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedCodeResponse {
    pub kind: CodeKind,
    pub code: String,
    /// `false` in fallback mode: the code was generated but not stored.
    pub persisted: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedRequest {
    pub team: Option<usize>,
    pub coach: Option<usize>,
    pub company: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedResponse {
    pub team: Vec<String>,
    pub coach: Vec<String>,
    pub company: Vec<String>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevokeResponse {
    pub kind: CodeKind,
    pub code: String,
    pub revoked: bool,
}
