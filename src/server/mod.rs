//! # HTTP Print Agent
//!
//! Local HTTP endpoints the POS screen calls in place of a browser-resident
//! printer bridge.
//!
//! ## Usage
//!
//! ```bash
//! nextpos --config nextpos.toml serve
//! ```
//!
//! | Method | Path | Action |
//! |--------|------|--------|
//! | GET | `/api/health` | Liveness and boot time |
//! | GET | `/api/printers` | Printers the bridge can reach |
//! | POST | `/api/print/current` | Print the open POS Invoice |
//! | POST | `/api/print/last` | Reprint the newest submitted invoice |
//! | POST | `/api/print/test` | Print the sample ticket |
//! | POST | `/api/drawer/test` | Kick the cash drawer |
//! | POST | `/api/events` | Any of the above as a tagged UI event |

mod handlers;
mod state;

pub use state::{AppState, ServerConfig};

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::NextposError;
use crate::session::PrintSession;

/// Build the router over shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(handlers::printers::health))
        .route("/api/printers", get(handlers::printers::list))
        .route("/api/print/current", post(handlers::print::current))
        .route("/api/print/last", post(handlers::print::last))
        .route("/api/print/test", post(handlers::print::test_print))
        .route("/api/drawer/test", post(handlers::print::test_drawer))
        .route("/api/events", post(handlers::print::event))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use std::sync::Arc;
/// use nextpos::bridge::LocalBridge;
/// use nextpos::config::load_config;
/// use nextpos::host::FrappeClient;
/// use nextpos::server::{serve, ServerConfig};
/// use nextpos::session::PrintSession;
///
/// # async fn example() -> Result<(), nextpos::NextposError> {
/// let config = load_config("nextpos.toml")?;
/// let session = PrintSession::new(
///     Arc::new(LocalBridge::from_config(&config)),
///     Arc::new(FrappeClient::new(&config.host)?),
/// );
/// let server = ServerConfig { listen_addr: config.agent.listen_addr.clone() };
///
/// serve(server, session).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig, session: PrintSession) -> Result<(), NextposError> {
    let app_state = Arc::new(AppState::new(config.clone(), session));
    let app = router(app_state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| {
            NextposError::ConnectionFailed(format!(
                "Failed to bind to {}: {}",
                config.listen_addr, e
            ))
        })?;

    info!(listen_addr = %config.listen_addr, "nextpos print agent listening");

    axum::serve(listener, app)
        .await
        .map_err(|e| NextposError::ConnectionFailed(format!("Server error: {}", e)))?;

    Ok(())
}
