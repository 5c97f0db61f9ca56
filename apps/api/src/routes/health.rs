use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
///
/// `mailCredentials` reports whether the credential codec came up with a
/// usable key.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "applymate-api",
        "version": env!("CARGO_PKG_VERSION"),
        "mailCredentials": if state.codec.is_some() { "ready" } else { "disabled" },
    }))
}
