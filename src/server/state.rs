//! Server state and configuration.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::session::PrintSession;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "127.0.0.1:8182")
    pub listen_addr: String,
}

/// Application state shared across handlers.
pub struct AppState {
    pub config: ServerConfig,
    pub session: PrintSession,
    /// Unix timestamp of server boot, reported by the health endpoint.
    pub boot_time: u64,
}

impl AppState {
    pub fn new(config: ServerConfig, session: PrintSession) -> Self {
        let boot_time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        Self {
            config,
            session,
            boot_time,
        }
    }
}
