//! Access-code handlers. Everything except validation requires an admin
//! session.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use givetastic_core::access::SeedCounts;
use givetastic_core::access::code::normalize;
use givetastic_core::models::CodeKind;
use tracing::info;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::models::{
    IssuedCodeResponse, RevokeResponse, SeedRequest, SeedResponse, ValidateCodeRequest,
    ValidateCodeResponse,
};

fn parse_kind(kind: &str) -> AppResult<CodeKind> {
    kind.parse::<CodeKind>()
        .map_err(|e| AppError::Validation(e.to_string()))
}

/// `POST /api/codes/validate`
pub async fn validate_handler(
    State(state): State<AppState>,
    AppJson(body): AppJson<ValidateCodeRequest>,
) -> Json<ValidateCodeResponse> {
    let code = normalize(&body.code);
    let valid = state.flow.registry().validate(body.kind, &code).await;
    Json(ValidateCodeResponse {
        kind: body.kind,
        code,
        valid,
    })
}

/// `POST /api/codes/{kind}`: issue one code.
pub async fn issue_handler(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> AppResult<Json<IssuedCodeResponse>> {
    let kind = parse_kind(&kind)?;
    let registry = state.flow.registry();
    let code = registry.issue(kind).await?;
    info!(%kind, "access code issued over http");
    Ok(Json(IssuedCodeResponse {
        kind,
        code,
        persisted: registry.mode().is_persistent(),
    }))
}

/// `POST /api/codes/seed`: bulk seed. Missing counts use the defaults.
pub async fn seed_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Json<SeedResponse>> {
    let request: SeedRequest = if body.is_empty() {
        SeedRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| AppError::Validation(e.to_string()))?
    };
    let defaults = SeedCounts::default();
    let counts = SeedCounts {
        team: request.team.unwrap_or(defaults.team),
        coach: request.coach.unwrap_or(defaults.coach),
        company: request.company.unwrap_or(defaults.company),
    };

    let report = state.flow.registry().seed(counts).await?;
    Ok(Json(SeedResponse {
        total: report.total(),
        team: report.team,
        coach: report.coach,
        company: report.company,
    }))
}

/// `POST /api/codes/{kind}/{code}/revoke`
pub async fn revoke_handler(
    State(state): State<AppState>,
    Path((kind, code)): Path<(String, String)>,
) -> AppResult<Json<RevokeResponse>> {
    let kind = parse_kind(&kind)?;
    let code = normalize(&code);
    if !state.flow.registry().revoke(kind, &code).await? {
        return Err(AppError::NotFound(format!("No {kind} code {code}")));
    }
    Ok(Json(RevokeResponse {
        kind,
        code,
        revoked: true,
    }))
}
