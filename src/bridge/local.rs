//! Bridge over printers listed in the agent configuration.
//!
//! Each printer name maps to an [`Endpoint`]. A send decodes every segment
//! to bytes, opens the endpoint, writes the job and closes it again, so a
//! printer that is switched off only fails the job that hits it.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tracing::{debug, info};

use super::{PrintTarget, PrinterBridge};
use crate::config::{Config, PrinterEntry};
use crate::error::NextposError;
use crate::host::TrustProvider;
use crate::payload::Segment;
use crate::transport::{Endpoint, RawTransport};

pub struct LocalBridge {
    printers: Vec<PrinterEntry>,
    default_printer: Option<String>,
    skip_trust_handshake: bool,
    active: AtomicBool,
}

impl LocalBridge {
    pub fn new(printers: Vec<PrinterEntry>, default_printer: Option<String>) -> Self {
        Self {
            printers,
            default_printer,
            skip_trust_handshake: false,
            active: AtomicBool::new(false),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let mut bridge = Self::new(config.printers.clone(), config.agent.default_printer.clone());
        bridge.skip_trust_handshake = config.agent.skip_trust_handshake;
        bridge
    }

    /// Connect without asking the host for a certificate or signature.
    pub fn without_trust_handshake(mut self) -> Self {
        self.skip_trust_handshake = true;
        self
    }

    fn endpoint(&self, printer: &str) -> Option<&Endpoint> {
        self.printers
            .iter()
            .find(|p| p.name == printer)
            .map(|p| &p.endpoint)
    }

    fn ensure_active(&self) -> Result<(), NextposError> {
        if self.active.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(NextposError::ConnectionFailed("bridge is not connected".to_string()))
        }
    }
}

#[async_trait]
impl PrinterBridge for LocalBridge {
    async fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    async fn connect(&self, trust: &dyn TrustProvider) -> Result<(), NextposError> {
        if self.printers.is_empty() {
            return Err(NextposError::BridgeUnavailable(
                "no [[printers]] configured".to_string(),
            ));
        }

        if !self.skip_trust_handshake {
            let certificate = trust.certificate().await?;
            let challenge = format!(
                "{}:{}",
                uuid::Uuid::new_v4(),
                chrono::Utc::now().timestamp_millis()
            );
            let signature = trust.sign(&challenge).await?;
            debug!(
                certificate_len = certificate.len(),
                signature_len = signature.len(),
                "trust handshake complete"
            );
        }

        self.active.store(true, Ordering::Release);
        info!(printers = self.printers.len(), "printer bridge connected");
        Ok(())
    }

    async fn find_printers(&self) -> Result<Vec<String>, NextposError> {
        self.ensure_active()?;
        Ok(self.printers.iter().map(|p| p.name.clone()).collect())
    }

    async fn default_printer(&self) -> Result<String, NextposError> {
        self.ensure_active()?;
        self.default_printer
            .clone()
            .ok_or_else(|| NextposError::ConfiguredPrinterMissing("system default".to_string()))
    }

    async fn send(&self, target: &PrintTarget, segments: &[Segment]) -> Result<(), NextposError> {
        self.ensure_active()?;

        let endpoint = self.endpoint(&target.printer).ok_or_else(|| {
            NextposError::SendFailed(format!("unknown printer '{}'", target.printer))
        })?;

        let mut data = Vec::new();
        for (i, segment) in segments.iter().enumerate() {
            let bytes = segment
                .to_bytes()
                .map_err(|e| NextposError::SendFailed(format!("segment {}: {}", i, e)))?;
            data.extend(bytes);
        }

        debug!(printer = %target.printer, %endpoint, bytes = data.len(), "sending job");
        let mut transport = RawTransport::open(endpoint).await?;
        transport.write_all(&data).await?;
        transport.shutdown().await
    }
}
