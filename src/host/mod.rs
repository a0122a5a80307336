//! # Host Capabilities
//!
//! What the print path needs from the ERP/POS host, as traits so sessions
//! receive them explicitly:
//!
//! - [`HostApi`]: rendered receipt payloads, per-profile print
//!   configuration, and the newest submitted invoice for reprints
//! - [`TrustProvider`]: the certificate and challenge signing a printer
//!   bridge needs before it accepts jobs
//!
//! [`FrappeClient`] implements both over the host's REST API.

pub mod frappe;

use async_trait::async_trait;

use crate::error::NextposError;
use crate::payload::PrintPayload;
use crate::printer::PrintConfig;

pub use frappe::FrappeClient;

/// Trust establishment for a printer bridge.
#[async_trait]
pub trait TrustProvider: Send + Sync {
    /// Publisher certificate (PEM text).
    async fn certificate(&self) -> Result<String, NextposError>;

    /// Sign `to_sign`, returning the base64 signature.
    async fn sign(&self, to_sign: &str) -> Result<String, NextposError>;
}

/// Content delivery from the host.
#[async_trait]
pub trait HostApi: TrustProvider {
    /// Rendered receipt payload for a POS Invoice.
    async fn print_payload(&self, invoice: &str) -> Result<PrintPayload, NextposError>;

    /// Print configuration for a POS profile (`None`: site defaults).
    async fn print_config(&self, pos_profile: Option<&str>) -> Result<PrintConfig, NextposError>;

    /// Name of the most recently created submitted POS Invoice, if any.
    async fn last_submitted_invoice(&self) -> Result<Option<String>, NextposError>;
}
