//! Integration tests: build the router over in-process stores and drive it
//! with `oneshot`.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use givetastic_api::{AppState, config::ApiConfig};
use givetastic_core::config::Stores;
use serde_json::{Value, json};
use tower::ServiceExt;

fn fallback_app() -> Router {
    givetastic_api::router(AppState::new(Stores::fallback(), ApiConfig::default()))
}

fn memory_app() -> Router {
    givetastic_api::router(AppState::new(Stores::memory(), ApiConfig::default()))
}

struct Reply {
    status: StatusCode,
    session: Option<String>,
    json: Value,
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> Reply {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(token) = cookie {
        req = req.header(header::COOKIE, format!("givetastic_session={token}"));
    }
    let req = match body {
        Some(body) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };

    let resp = app.clone().oneshot(req).await.expect("request");
    let status = resp.status();
    let session = resp
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .filter_map(|pair| pair.strip_prefix("givetastic_session="))
        .map(str::to_string)
        .last();

    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("parse JSON")
    };
    Reply {
        status,
        session,
        json,
    }
}

/// Enter with the given body and return the session token.
async fn enter(app: &Router, path: &str, body: Value) -> String {
    let reply = send(app, "POST", path, None, Some(body)).await;
    assert_eq!(reply.status, StatusCode::OK, "entry failed: {}", reply.json);
    reply
        .session
        .filter(|t| !t.is_empty())
        .expect("session cookie")
}

#[tokio::test]
async fn hello_reports_store_mode() {
    let reply = send(&fallback_app(), "GET", "/api/hello", None, None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json["storeMode"], "fallback");
    assert_eq!(reply.json["identityStore"], false);
    let greeting = reply.json["greeting"].as_str().expect("greeting is string");
    assert!(greeting.starts_with("Hello from givetastic_core v"));
}

#[tokio::test]
async fn fallback_entry_sets_cookie_and_me_returns_identity() {
    let app = fallback_app();
    let reply = send(
        &app,
        "POST",
        "/auth/sign-in",
        None,
        Some(json!({ "role": "employee", "code": "team001", "email": "sam@example.com" })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json["landing"], "/employee-hero");
    assert_eq!(reply.json["user"]["teamCode"], "TEAM001");
    assert_eq!(reply.json["user"]["name"], "sam");
    assert!(reply.json["user"].get("coachCode").is_none());
    let token = reply.session.expect("session cookie");

    let me = send(&app, "GET", "/auth/me", Some(&token), None).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.json["user"]["role"], "employee");
    assert_eq!(me.json["user"]["teamCode"], "TEAM001");
}

#[tokio::test]
async fn invalid_code_is_rejected_with_hint() {
    let reply = send(
        &fallback_app(),
        "POST",
        "/auth/sign-up",
        None,
        Some(json!({ "role": "admin", "code": "BADCODE1", "name": "Pat" })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.json["error"], "unauthorized");
    let message = reply.json["message"].as_str().unwrap();
    assert!(message.contains("COMPANY001"));
    assert_eq!(reply.session.as_deref(), Some(""));
}

#[tokio::test]
async fn me_without_session_is_unauthorized() {
    let app = fallback_app();
    let reply = send(&app, "GET", "/auth/me", None, None).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);

    let reply = send(&app, "GET", "/auth/me", Some("not-a-token"), None).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_twice_succeeds_both_times() {
    let app = fallback_app();
    let token = enter(
        &app,
        "/auth/sign-in",
        json!({ "role": "coach", "code": "COACH001", "name": "Lin" }),
    )
    .await;

    for _ in 0..2 {
        let reply = send(&app, "POST", "/auth/logout", Some(&token), None).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.json["loggedOut"], true);
    }

    let me = send(&app, "GET", "/auth/me", Some(&token), None).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn views_are_gated_by_role() {
    let app = fallback_app();

    let anon = send(&app, "GET", "/api/views?path=/teams-board", None, None).await;
    assert_eq!(anon.json["action"], "redirect");
    assert_eq!(anon.json["path"], "/");

    let token = enter(
        &app,
        "/auth/sign-in",
        json!({ "role": "employee", "code": "TEAM002", "name": "Ada" }),
    )
    .await;

    let wrong = send(&app, "GET", "/api/views?path=/coach-hero", Some(&token), None).await;
    assert_eq!(wrong.json["action"], "redirect");
    assert_eq!(wrong.json["path"], "/");

    let entry = send(&app, "GET", "/api/views?path=/", Some(&token), None).await;
    assert_eq!(entry.json["action"], "redirect");
    assert_eq!(entry.json["path"], "/employee-hero");

    let board = send(&app, "GET", "/api/views?path=/personal-board", Some(&token), None).await;
    assert_eq!(board.json["action"], "render");

    let missing = send(&app, "GET", "/api/views?path=/nope", Some(&token), None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn validate_normalizes_code() {
    let app = fallback_app();
    let reply = send(
        &app,
        "POST",
        "/api/codes/validate",
        None,
        Some(json!({ "kind": "company", "code": "company002" })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json["code"], "COMPANY002");
    assert_eq!(reply.json["valid"], true);

    let reply = send(
        &app,
        "POST",
        "/api/codes/validate",
        None,
        Some(json!({ "kind": "team", "code": "COMPANY002" })),
    )
    .await;
    assert_eq!(reply.json["valid"], false);
}

#[tokio::test]
async fn non_admin_cannot_issue_codes() {
    let app = fallback_app();
    let token = enter(
        &app,
        "/auth/sign-in",
        json!({ "role": "employee", "code": "TEAM001", "name": "Ada" }),
    )
    .await;

    let reply = send(&app, "POST", "/api/codes/team", Some(&token), None).await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);
    assert_eq!(reply.json["error"], "forbidden");

    let anon = send(&app, "POST", "/api/codes/team", None, None).await;
    assert_eq!(anon.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn fallback_admin_issues_unpersisted_code_but_cannot_seed() {
    let app = fallback_app();
    let token = enter(
        &app,
        "/auth/sign-in",
        json!({ "role": "admin", "code": "COMPANY001", "name": "Grace" }),
    )
    .await;

    let issued = send(&app, "POST", "/api/codes/coach", Some(&token), None).await;
    assert_eq!(issued.status, StatusCode::OK);
    assert_eq!(issued.json["persisted"], false);
    assert_eq!(issued.json["code"].as_str().unwrap().len(), 8);

    let seeded = send(&app, "POST", "/api/codes/seed", Some(&token), None).await;
    assert_eq!(seeded.status, StatusCode::SERVICE_UNAVAILABLE);

    let revoked = send(&app, "POST", "/api/codes/team/TEAM001/revoke", Some(&token), None).await;
    assert_eq!(revoked.status, StatusCode::SERVICE_UNAVAILABLE);

    let unknown = send(&app, "POST", "/api/codes/club", Some(&token), None).await;
    assert_eq!(unknown.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_json_gets_validation_error_body() {
    let app = fallback_app();

    let reply = send(
        &app,
        "POST",
        "/auth/sign-in",
        None,
        Some(json!({ "role": "boss", "code": "TEAM001" })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.json["error"], "validation_error");
    assert!(reply.json["message"].as_str().is_some());

    let reply = send(
        &app,
        "POST",
        "/api/codes/validate",
        None,
        Some(json!({ "kind": "club", "code": "TEAM001" })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.json["error"], "validation_error");

    let reply = send(&app, "GET", "/api/views", None, None).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.json["error"], "validation_error");
}

#[tokio::test]
async fn oversized_seed_is_a_validation_error() {
    let state = AppState::new(Stores::memory(), ApiConfig::default());
    let company = state
        .flow
        .registry()
        .issue(givetastic_core::models::CodeKind::Company)
        .await
        .unwrap();
    let app = givetastic_api::router(state);
    let admin = enter(
        &app,
        "/auth/sign-up",
        json!({
            "role": "admin",
            "code": company,
            "name": "Grace",
            "email": "grace@example.com",
            "password": "hopper1906"
        }),
    )
    .await;

    for team in [json!(10_001), json!(u64::MAX)] {
        let reply = send(
            &app,
            "POST",
            "/api/codes/seed",
            Some(&admin),
            Some(json!({ "team": team, "coach": 0, "company": 0 })),
        )
        .await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST, "{}", reply.json);
        assert_eq!(reply.json["error"], "validation_error");
    }

    let reply = send(
        &app,
        "POST",
        "/api/codes/validate",
        None,
        Some(json!({ "kind": "team", "code": "TEAM001" })),
    )
    .await;
    assert_eq!(reply.json["valid"], false);
}

#[tokio::test]
async fn memory_backend_full_lifecycle() {
    let app = memory_app();

    // Bootstrap an admin: the memory store starts empty, so validate a
    // company code issued through the registry of this very state.
    let state = AppState::new(Stores::memory(), ApiConfig::default());
    let company = state
        .flow
        .registry()
        .issue(givetastic_core::models::CodeKind::Company)
        .await
        .unwrap();
    let app_with_code = givetastic_api::router(state);

    let admin = enter(
        &app_with_code,
        "/auth/sign-up",
        json!({
            "role": "admin",
            "code": company.to_lowercase(),
            "name": "Grace",
            "email": "grace@example.com",
            "password": "hopper1906"
        }),
    )
    .await;

    let seeded = send(
        &app_with_code,
        "POST",
        "/api/codes/seed",
        Some(&admin),
        Some(json!({ "team": 3, "coach": 0, "company": 0 })),
    )
    .await;
    assert_eq!(seeded.status, StatusCode::OK);
    assert_eq!(seeded.json["total"], 3);
    let team_code = seeded.json["team"][0].as_str().unwrap().to_string();

    let signup = json!({
        "role": "employee",
        "code": team_code,
        "name": "Ada",
        "email": "ada@example.com",
        "password": "engine42"
    });
    enter(&app_with_code, "/auth/sign-up", signup.clone()).await;

    let duplicate = send(&app_with_code, "POST", "/auth/sign-up", None, Some(signup)).await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);
    assert_eq!(duplicate.json["message"], "User already registered");

    let wrong = send(
        &app_with_code,
        "POST",
        "/auth/sign-in",
        None,
        Some(json!({
            "role": "employee",
            "code": team_code,
            "email": "ada@example.com",
            "password": "wrong-one"
        })),
    )
    .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.json["message"], "Invalid login credentials");

    let revoked = send(
        &app_with_code,
        "POST",
        &format!("/api/codes/team/{team_code}/revoke"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(revoked.status, StatusCode::OK);
    assert_eq!(revoked.json["revoked"], true);

    let after = send(
        &app_with_code,
        "POST",
        "/auth/sign-in",
        None,
        Some(json!({
            "role": "employee",
            "code": team_code,
            "email": "ada@example.com",
            "password": "engine42"
        })),
    )
    .await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);

    // A fresh memory store knows no codes at all.
    let empty = send(
        &app,
        "POST",
        "/api/codes/validate",
        None,
        Some(json!({ "kind": "team", "code": "TEAM001" })),
    )
    .await;
    assert_eq!(empty.json["valid"], false);
}
