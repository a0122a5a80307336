//! Printer discovery handlers.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::sync::Arc;

use super::super::state::AppState;
use super::error_response;

/// GET /api/health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({
        "success": true,
        "boot_time": state.boot_time,
        "connected": state.session.bridge().is_active().await,
    }))
}

/// GET /api/printers - connect if needed and list printers.
pub async fn list(State(state): State<Arc<AppState>>) -> Response {
    match state.session.printers().await {
        Ok(printers) => Json(json!({ "success": true, "printers": printers })).into_response(),
        Err(e) => error_response(&e),
    }
}
