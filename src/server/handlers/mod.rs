//! HTTP handlers for the server.

pub mod print;
pub mod printers;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::error::NextposError;

/// Map an error to a status code and the `{success, title, error}` body
/// the POS screen turns into a notice.
pub fn error_response(e: &NextposError) -> Response {
    let status = match e {
        NextposError::NoInvoiceOpen | NextposError::InvalidCommand(_) => StatusCode::BAD_REQUEST,
        NextposError::NoInvoiceFound => StatusCode::NOT_FOUND,
        NextposError::BridgeUnavailable(_)
        | NextposError::ConnectionFailed(_)
        | NextposError::NoPrintersFound
        | NextposError::ConfiguredPrinterMissing(_) => StatusCode::SERVICE_UNAVAILABLE,
        NextposError::SendFailed(_) | NextposError::SigningFailed(_) | NextposError::Host(_) => {
            StatusCode::BAD_GATEWAY
        }
        NextposError::Config(_) | NextposError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (
        status,
        Json(json!({
            "success": false,
            "title": e.title(),
            "error": e.to_string(),
        })),
    )
        .into_response()
}
