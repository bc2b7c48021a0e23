//! Session middleware: resolve the session cookie and gate on role.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use givetastic_core::models::{Role, UserIdentity};

use crate::AppState;
use crate::error::AppError;
use crate::services::cookies::SESSION_COOKIE;

/// Key used to store the caller's identity in request extensions.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub UserIdentity);

/// The identity behind the request's session cookie, if any.
pub fn session_user(state: &AppState, jar: &CookieJar) -> Option<UserIdentity> {
    jar.get(SESSION_COOKIE)
        .and_then(|c| state.sessions.current(c.value()))
}

/// Axum middleware: resolves the `givetastic_session` cookie and injects
/// `AuthenticatedUser` into request extensions.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let jar = CookieJar::from_headers(request.headers());
    let user = session_user(&state, &jar)
        .ok_or_else(|| AppError::Unauthorized("Not logged in".into()))?;

    request.extensions_mut().insert(AuthenticatedUser(user));

    Ok(next.run(request).await)
}

/// Axum middleware: rejects callers whose session role is not admin.
/// Must run after [`require_session`].
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AppError> {
    let role = request
        .extensions()
        .get::<AuthenticatedUser>()
        .map(|u| u.0.role())
        .ok_or_else(|| AppError::Unauthorized("Not logged in".into()))?;

    if role != Role::Admin {
        return Err(AppError::Forbidden(format!(
            "{role} sessions cannot manage access codes"
        )));
    }

    Ok(next.run(request).await)
}
