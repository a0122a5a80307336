//! Print and drawer handlers.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::sync::Arc;
use tracing::error;

use crate::error::NextposError;
use crate::printer::DrawerConfig;
use crate::session::{PrintReport, UiEvent};

use super::super::state::AppState;
use super::error_response;

/// Body for POST /api/print/current.
#[derive(Debug, Deserialize)]
pub struct CurrentDocument {
    pub doctype: String,
    pub name: String,
    #[serde(default)]
    pub pos_profile: Option<String>,
}

/// Body for POST /api/print/last.
#[derive(Debug, Default, Deserialize)]
pub struct ReprintRequest {
    #[serde(default)]
    pub pos_profile: Option<String>,
}

/// POST /api/print/current
pub async fn current(
    State(state): State<Arc<AppState>>,
    Json(doc): Json<CurrentDocument>,
) -> Response {
    run(
        state,
        UiEvent::PrintCurrent {
            doctype: doc.doctype,
            name: doc.name,
            pos_profile: doc.pos_profile,
        },
    )
    .await
}

/// POST /api/print/last
pub async fn last(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let req: ReprintRequest = match optional_body(&body) {
        Ok(req) => req.unwrap_or_default(),
        Err(e) => return error_response(&e),
    };
    run(
        state,
        UiEvent::ReprintLast {
            pos_profile: req.pos_profile,
        },
    )
    .await
}

/// POST /api/print/test
pub async fn test_print(State(state): State<Arc<AppState>>) -> Response {
    run(state, UiEvent::TestPrint).await
}

/// POST /api/drawer/test - an empty body kicks pin 0 with the default pulse.
pub async fn test_drawer(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let drawer: Option<DrawerConfig> = match optional_body(&body) {
        Ok(drawer) => drawer,
        Err(e) => return error_response(&e),
    };
    run(state, UiEvent::TestDrawer { drawer }).await
}

/// POST /api/events - tagged UI event, e.g. `{"action": "test_print"}`.
pub async fn event(State(state): State<Arc<AppState>>, Json(event): Json<UiEvent>) -> Response {
    run(state, event).await
}

/// Run the action on its own task. A client that disconnects drops this
/// handler, not the job: copies and the drawer kick still go out.
async fn run(state: Arc<AppState>, event: UiEvent) -> Response {
    let job = tokio::spawn(async move { state.session.dispatch(event).await });

    let result = job.await.unwrap_or_else(|e| {
        Err(NextposError::SendFailed(format!("print task failed: {}", e)))
    });

    match result {
        Ok(report) => success_response(&report),
        Err(e) => {
            log_failure(&e);
            error_response(&e)
        }
    }
}

/// An empty body means "use the defaults"; anything else must parse.
fn optional_body<T: DeserializeOwned>(body: &[u8]) -> Result<Option<T>, NextposError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body)
        .map(Some)
        .map_err(|e| NextposError::InvalidCommand(format!("invalid request body: {}", e)))
}

fn log_failure(e: &NextposError) {
    match e {
        NextposError::NoInvoiceOpen | NextposError::NoInvoiceFound => {}
        _ => error!(error = %e, "print request failed"),
    }
}

fn success_response(report: &PrintReport) -> Response {
    let message = match &report.invoice {
        Some(invoice) => format!("Sent {} to {}", invoice, report.printer),
        None => format!("Sent to {}", report.printer),
    };
    Json(json!({
        "success": true,
        "message": message,
        "report": report,
    }))
    .into_response()
}
