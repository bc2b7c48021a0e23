//! Entry, logout and current-identity handlers.

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::CookieJar;
use givetastic_core::auth::flow::{EntryMode, EntryRequest};
use tracing::{info, warn};

use crate::AppState;
use crate::error::AppError;
use crate::extract::AppJson;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{EntryBody, LogoutResponse, SessionResponse};
use crate::services::cookies::{SESSION_COOKIE, clear_session_cookie, session_cookie};

/// `POST /auth/sign-up`: validate the code, create the account, log in.
pub async fn sign_up_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(body): AppJson<EntryBody>,
) -> Response {
    enter(state, jar, EntryMode::SignUp, body).await
}

/// `POST /auth/sign-in`: validate the code, check credentials, log in.
pub async fn sign_in_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(body): AppJson<EntryBody>,
) -> Response {
    enter(state, jar, EntryMode::SignIn, body).await
}

async fn enter(state: AppState, jar: CookieJar, mode: EntryMode, body: EntryBody) -> Response {
    // A new attempt always replaces the caller's previous session.
    if let Some(previous) = jar.get(SESSION_COOKIE) {
        state.sessions.end(previous.value());
    }

    let request = EntryRequest {
        mode,
        role: body.role,
        code: body.code,
        name: body.name,
        email: body.email,
        password: body.password,
    };
    let secure = state.config.secure_cookies;

    match state.flow.admit(&request).await {
        Ok(admission) => {
            let (token, user) = state.sessions.open(&admission);
            info!(user_id = %user.id(), role = %user.role(), ?mode, "entry succeeded");
            let body = SessionResponse {
                user,
                landing: admission.landing().path().to_string(),
            };
            (jar.add(session_cookie(&token, secure)), Json(body)).into_response()
        }
        Err(e) => {
            warn!(role = %request.role, ?mode, error = %e, "entry failed");
            (jar.add(clear_session_cookie(secure)), AppError::from(e)).into_response()
        }
    }
}

/// `POST /auth/logout`: end the caller's session. Idempotent.
pub async fn logout_handler(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<LogoutResponse>) {
    let ended = jar
        .get(SESSION_COOKIE)
        .is_some_and(|c| state.sessions.end(c.value()));
    if ended {
        info!("session ended");
    }
    let jar = jar.add(clear_session_cookie(state.config.secure_cookies));
    (jar, Json(LogoutResponse { logged_out: true }))
}

/// `GET /auth/me`: the identity behind the session cookie.
pub async fn me_handler(
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
) -> Json<SessionResponse> {
    let user = user.0;
    let landing = givetastic_core::navigation::View::landing(user.role())
        .path()
        .to_string();
    Json(SessionResponse { user, landing })
}
