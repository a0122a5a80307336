//! In-memory bridge and host used by the integration tests.

#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use nextpos::{
    NextposError, PrintConfig, PrintPayload, Segment,
    bridge::{PrintTarget, PrinterBridge},
    host::{HostApi, TrustProvider},
};

/// One recorded `send` call.
#[derive(Debug, Clone)]
pub struct Sent {
    pub printer: String,
    pub segments: Vec<Segment>,
}

impl Sent {
    pub fn is_drawer_kick(&self) -> bool {
        self.segments.len() == 1 && self.segments[0].data.starts_with("1B70")
    }
}

#[derive(Default)]
pub struct FakeBridge {
    pub printers: Vec<String>,
    pub default_printer: Option<String>,
    pub fail_drawer: bool,
    /// Fail the n-th send (0-based)
    pub fail_send_at: Option<usize>,
    /// Time each send takes before it is recorded
    pub send_delay: Option<Duration>,
    pub connects: AtomicUsize,
    pub finds: AtomicUsize,
    pub active: AtomicBool,
    pub sent: Mutex<Vec<Sent>>,
}

impl FakeBridge {
    pub fn with_printers(printers: &[&str]) -> Self {
        Self {
            printers: printers.iter().map(|p| p.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn with_default(mut self, printer: &str) -> Self {
        self.default_printer = Some(printer.to_string());
        self
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl PrinterBridge for FakeBridge {
    async fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    async fn connect(&self, trust: &dyn TrustProvider) -> Result<(), NextposError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        trust.certificate().await?;
        trust.sign("challenge").await?;
        self.active.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn find_printers(&self) -> Result<Vec<String>, NextposError> {
        self.finds.fetch_add(1, Ordering::SeqCst);
        Ok(self.printers.clone())
    }

    async fn default_printer(&self) -> Result<String, NextposError> {
        self.default_printer
            .clone()
            .ok_or_else(|| NextposError::ConfiguredPrinterMissing("system default".to_string()))
    }

    async fn send(&self, target: &PrintTarget, segments: &[Segment]) -> Result<(), NextposError> {
        if let Some(delay) = self.send_delay {
            tokio::time::sleep(delay).await;
        }
        let mut sent = self.sent.lock().unwrap();
        let entry = Sent {
            printer: target.printer.clone(),
            segments: segments.to_vec(),
        };
        if self.fail_drawer && entry.is_drawer_kick() {
            return Err(NextposError::SendFailed("drawer port closed".to_string()));
        }
        if self.fail_send_at == Some(sent.len()) {
            return Err(NextposError::Io(std::io::Error::other("paper out")));
        }
        sent.push(entry);
        Ok(())
    }
}

pub struct FakeHost {
    pub config: PrintConfig,
    pub payload: PrintPayload,
    pub last_invoice: Option<String>,
    pub fail_sign: bool,
    pub payload_requests: Mutex<Vec<String>>,
    pub config_requests: Mutex<Vec<Option<String>>>,
}

impl FakeHost {
    pub fn new(config: PrintConfig) -> Self {
        Self {
            config,
            payload: PrintPayload::from(vec![
                Segment::hex(&[0x1B, 0x40]),
                Segment::command("TOTAL              10.50\n"),
            ]),
            last_invoice: None,
            fail_sign: false,
            payload_requests: Mutex::new(Vec::new()),
            config_requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl TrustProvider for FakeHost {
    async fn certificate(&self) -> Result<String, NextposError> {
        Ok("-----BEGIN CERTIFICATE-----".to_string())
    }

    async fn sign(&self, _to_sign: &str) -> Result<String, NextposError> {
        if self.fail_sign {
            Err(NextposError::SigningFailed("no private key".to_string()))
        } else {
            Ok("c2lnbmVk".to_string())
        }
    }
}

#[async_trait]
impl HostApi for FakeHost {
    async fn print_payload(&self, invoice: &str) -> Result<PrintPayload, NextposError> {
        self.payload_requests.lock().unwrap().push(invoice.to_string());
        Ok(self.payload.clone())
    }

    async fn print_config(&self, pos_profile: Option<&str>) -> Result<PrintConfig, NextposError> {
        self.config_requests
            .lock()
            .unwrap()
            .push(pos_profile.map(str::to_string));
        Ok(self.config.clone())
    }

    async fn last_submitted_invoice(&self) -> Result<Option<String>, NextposError> {
        Ok(self.last_invoice.clone())
    }
}
