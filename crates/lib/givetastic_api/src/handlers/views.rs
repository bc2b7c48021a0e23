//! View gating.

use axum::Json;
use axum::extract::State;
use axum_extra::extract::cookie::CookieJar;
use givetastic_core::navigation::{View, navigate};

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::extract::AppQuery;
use crate::middleware::auth::session_user;
use crate::models::{ViewQuery, ViewResponse};

/// `GET /api/views?path=`: what the caller's session sees at `path`.
pub async fn view_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    AppQuery(query): AppQuery<ViewQuery>,
) -> AppResult<Json<ViewResponse>> {
    let view = View::from_path(&query.path).map_err(|e| AppError::NotFound(e.to_string()))?;
    let user = session_user(&state, &jar);

    Ok(Json(ViewResponse {
        navigation: navigate(user.as_ref(), view),
        requested: query.path,
    }))
}
