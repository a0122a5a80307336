//! # Printer Bridge
//!
//! The capability that knows which printers exist and moves segments to
//! them. Sessions hold a bridge explicitly; there is no process-wide
//! connection.
//!
//! ```text
//! PrintSession ──connect(trust)──▶ PrinterBridge ──send(target, segments)──▶ printer
//!                                       ▲
//!                                       └── find_printers / default_printer
//! ```
//!
//! [`LocalBridge`] serves printers declared in the agent configuration.

pub mod local;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::NextposError;
use crate::host::TrustProvider;
use crate::payload::Segment;

pub use local::LocalBridge;

/// A print destination created by the bridge for one printer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrintTarget {
    pub printer: String,
}

impl PrintTarget {
    pub fn new(printer: impl Into<String>) -> Self {
        Self {
            printer: printer.into(),
        }
    }
}

#[async_trait]
pub trait PrinterBridge: Send + Sync {
    /// Whether a connection is already established.
    async fn is_active(&self) -> bool;

    /// Establish the connection, running the trust handshake.
    async fn connect(&self, trust: &dyn TrustProvider) -> Result<(), NextposError>;

    /// Every printer the bridge can reach, in preference order.
    async fn find_printers(&self) -> Result<Vec<String>, NextposError>;

    /// The system default printer. Fails when none is set.
    async fn default_printer(&self) -> Result<String, NextposError>;

    /// Destination for `printer`.
    fn create_config(&self, printer: &str) -> PrintTarget {
        PrintTarget::new(printer)
    }

    /// Transmit segments, in order, as one job.
    async fn send(&self, target: &PrintTarget, segments: &[Segment]) -> Result<(), NextposError>;
}
