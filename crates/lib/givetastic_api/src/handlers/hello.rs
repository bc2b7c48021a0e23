//! Hello endpoint: bootstrap health check.

use axum::Json;
use axum::extract::State;

use crate::AppState;
use crate::models::HelloResponse;

/// `GET /api/hello`: version and which store backs this server.
pub async fn hello_world(State(state): State<AppState>) -> Json<HelloResponse> {
    let version = givetastic_core::version();
    Json(HelloResponse {
        greeting: format!("Hello from givetastic_core v{version}"),
        version: version.to_string(),
        store_mode: state.flow.registry().mode(),
        identity_store: state.flow.has_identity_store(),
    })
}
