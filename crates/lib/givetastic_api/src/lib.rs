//! # givetastic_api
//!
//! HTTP API library for Givetastic.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use axum::Router;
use axum::routing::{get, post};
use givetastic_core::access::AccessCodeRegistry;
use givetastic_core::auth::flow::AuthFlow;
use givetastic_core::config::Stores;
use tower_http::cors::{Any, CorsLayer};

use crate::config::ApiConfig;
use crate::handlers::{auth, codes, hello, views};
use crate::services::sessions::SessionTable;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Entry flow over the configured stores.
    pub flow: AuthFlow,
    /// Live sessions, keyed by cookie token.
    pub sessions: SessionTable,
    /// API configuration.
    pub config: ApiConfig,
}

impl AppState {
    pub fn new(stores: Stores, config: ApiConfig) -> Self {
        let registry = AccessCodeRegistry::new(stores.access);
        Self {
            flow: AuthFlow::new(registry, stores.identity),
            sessions: SessionTable::new(),
            config,
        }
    }
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no session required)
    let public = Router::new()
        .route("/api/hello", get(hello::hello_world))
        .route("/auth/sign-up", post(auth::sign_up_handler))
        .route("/auth/sign-in", post(auth::sign_in_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .route("/api/views", get(views::view_handler))
        .route("/api/codes/validate", post(codes::validate_handler));

    let session = Router::new().route("/auth/me", get(auth::me_handler));

    // Admin routes; layers run bottom-up, so the session is resolved first.
    let admin = Router::new()
        .route("/api/codes/seed", post(codes::seed_handler))
        .route("/api/codes/{kind}", post(codes::issue_handler))
        .route("/api/codes/{kind}/{code}/revoke", post(codes::revoke_handler))
        .layer(axum::middleware::from_fn(middleware::auth::require_admin));

    let protected = session.merge(admin).layer(axum::middleware::from_fn_with_state(
        state.clone(),
        middleware::auth::require_session,
    ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(cors)
        .with_state(state)
}
