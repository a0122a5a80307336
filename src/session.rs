//! # Print Session
//!
//! Orchestrates one print request against an explicitly supplied bridge and
//! host:
//!
//! 1. connect the bridge once (trust handshake through the host)
//! 2. fetch the receipt payload and the profile's print configuration
//! 3. pick the printer (configured, substituted, default, or prompted)
//! 4. plan the sends with the [`encoder`](crate::encoder) and run them
//!
//! Copies go out strictly one after another. A failing copy aborts the
//! job with `SendFailed`; a failing drawer kick after good copies is only
//! logged and reported.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{Instrument, info, info_span, warn};

use crate::bridge::{PrintTarget, PrinterBridge};
use crate::encoder::{self, Resolution, SendOp, build_drawer_command, plan_print};
use crate::error::NextposError;
use crate::host::{HostApi, TrustProvider};
use crate::payload::PrintPayload;
use crate::printer::DrawerConfig;
use crate::receipt::{current_datetime, sample_receipt};

/// Doctype the print buttons act on.
pub const POS_INVOICE_DOCTYPE: &str = "POS Invoice";

// ============================================================================
// UI ABSTRACTIONS
// ============================================================================

/// Printer selection prompt, shown when there is no default printer.
#[async_trait]
pub trait PrinterChooser: Send + Sync {
    /// Pick one of `printers` (never empty). `None` means the user gave up.
    async fn choose(&self, printers: &[String]) -> Option<String>;
}

/// Chooser that always takes the first printer.
pub struct FirstAvailable;

#[async_trait]
impl PrinterChooser for FirstAvailable {
    async fn choose(&self, printers: &[String]) -> Option<String> {
        printers.first().cloned()
    }
}

/// Actions raised by the POS screen.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum UiEvent {
    /// "Print Receipt" on the open document
    PrintCurrent {
        doctype: String,
        name: String,
        #[serde(default)]
        pos_profile: Option<String>,
    },
    /// "Reprint Last Invoice"
    ReprintLast {
        #[serde(default)]
        pos_profile: Option<String>,
    },
    /// "Test Print" from the settings page
    TestPrint,
    /// "Test Drawer" from the settings page
    TestDrawer {
        #[serde(default)]
        drawer: Option<DrawerConfig>,
    },
}

// ============================================================================
// REPORT
// ============================================================================

/// What happened to the drawer kick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "error", rename_all = "snake_case")]
pub enum DrawerOutcome {
    NotRequested,
    Opened,
    Failed(String),
}

/// Result of one print request, for the cashier notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrintReport {
    pub job_id: String,
    pub invoice: Option<String>,
    pub printer: String,
    /// Configured printer that was missing, when a stand-in was used
    pub substituted_for: Option<String>,
    pub copies_sent: u32,
    pub drawer: DrawerOutcome,
    pub notices: Vec<String>,
}

impl PrintReport {
    fn new(job_id: &str, invoice: Option<&str>, printer: &str) -> Self {
        Self {
            job_id: job_id.to_string(),
            invoice: invoice.map(str::to_string),
            printer: printer.to_string(),
            substituted_for: None,
            copies_sent: 0,
            drawer: DrawerOutcome::NotRequested,
            notices: Vec::new(),
        }
    }
}

// ============================================================================
// SESSION
// ============================================================================

pub struct PrintSession {
    bridge: Arc<dyn PrinterBridge>,
    host: Arc<dyn HostApi>,
    trust: Arc<dyn TrustProvider>,
    chooser: Arc<dyn PrinterChooser>,
}

impl PrintSession {
    pub fn new<H: HostApi + 'static>(bridge: Arc<dyn PrinterBridge>, host: Arc<H>) -> Self {
        Self {
            bridge,
            trust: host.clone(),
            host,
            chooser: Arc::new(FirstAvailable),
        }
    }

    /// Replace the printer selection prompt.
    pub fn with_chooser(mut self, chooser: Arc<dyn PrinterChooser>) -> Self {
        self.chooser = chooser;
        self
    }

    pub fn bridge(&self) -> &dyn PrinterBridge {
        self.bridge.as_ref()
    }

    /// Connect the bridge unless it already is.
    pub async fn ensure_connected(&self) -> Result<(), NextposError> {
        if self.bridge.is_active().await {
            return Ok(());
        }
        self.bridge
            .connect(self.trust.as_ref())
            .await
            .map_err(|e| match e {
                NextposError::SigningFailed(_)
                | NextposError::ConnectionFailed(_)
                | NextposError::BridgeUnavailable(_) => e,
                other => NextposError::ConnectionFailed(other.to_string()),
            })
    }

    /// Printers the bridge can reach; connects first.
    pub async fn printers(&self) -> Result<Vec<String>, NextposError> {
        self.ensure_connected().await?;
        self.bridge.find_printers().await
    }

    /// The default printer, or, when that lookup fails, one picked from
    /// the full list by the chooser. The fallback runs once.
    pub async fn printer_or_prompt(&self) -> Result<String, NextposError> {
        match self.bridge.default_printer().await {
            Ok(printer) => Ok(printer),
            Err(e) => {
                warn!(error = %e, "default printer not found, prompting");
                let printers = self.bridge.find_printers().await?;
                if printers.is_empty() {
                    return Err(NextposError::NoPrintersFound);
                }
                self.chooser
                    .choose(&printers)
                    .await
                    .ok_or(NextposError::NoPrintersFound)
            }
        }
    }

    /// Print a POS Invoice with its profile's configuration.
    pub async fn print_invoice(
        &self,
        invoice: &str,
        pos_profile: Option<&str>,
    ) -> Result<PrintReport, NextposError> {
        let job_id = uuid::Uuid::new_v4().to_string();
        let span = info_span!("print_invoice", job_id = %job_id, invoice, pos_profile);

        async {
            self.ensure_connected().await?;

            let config = self.host.print_config(pos_profile).await?;
            let payload = self.host.print_payload(invoice).await?;

            let resolution = match config.printer.as_deref() {
                Some(configured) => {
                    let available = self.bridge.find_printers().await?;
                    encoder::resolve_printer(Some(configured), &available)?
                }
                None => Resolution {
                    printer: self.printer_or_prompt().await?,
                    substituted_for: None,
                },
            };

            let mut report = PrintReport::new(&job_id, Some(invoice), &resolution.printer);
            if let Some(notice) = resolution.notice() {
                warn!(printer = %resolution.printer, "{}", notice);
                report.notices.push(notice);
            }
            report.substituted_for = resolution.substituted_for.clone();

            let target = self.bridge.create_config(&resolution.printer);
            self.execute(&target, plan_print(payload, &config), &mut report)
                .await?;

            info!(
                printer = %report.printer,
                copies = report.copies_sent,
                "printed successfully"
            );
            Ok::<_, NextposError>(report)
        }
        .instrument(span)
        .await
    }

    /// Reprint the newest submitted invoice.
    pub async fn reprint_last(
        &self,
        pos_profile: Option<&str>,
    ) -> Result<PrintReport, NextposError> {
        let invoice = self
            .host
            .last_submitted_invoice()
            .await?
            .ok_or(NextposError::NoInvoiceFound)?;
        self.print_invoice(&invoice, pos_profile).await
    }

    /// Print the built-in sample ticket on the default (or chosen) printer.
    pub async fn test_print(&self) -> Result<PrintReport, NextposError> {
        self.ensure_connected().await?;
        let printer = self.printer_or_prompt().await?;
        let job_id = uuid::Uuid::new_v4().to_string();
        let mut report = PrintReport::new(&job_id, None, &printer);

        let target = self.bridge.create_config(&printer);
        let ops = vec![SendOp::Print(sample_receipt(&current_datetime()))];
        self.execute(&target, ops, &mut report).await?;

        info!(printer = %printer, "sent cut test");
        Ok(report)
    }

    /// Kick the drawer on the first available printer.
    pub async fn test_drawer(&self, drawer: DrawerConfig) -> Result<PrintReport, NextposError> {
        self.ensure_connected().await?;
        let printers = self.bridge.find_printers().await?;
        let printer = printers.first().ok_or(NextposError::NoPrintersFound)?;

        let job_id = uuid::Uuid::new_v4().to_string();
        let mut report = PrintReport::new(&job_id, None, printer);

        let target = self.bridge.create_config(printer);
        let segment = build_drawer_command(drawer.pin, drawer.pulse_on, drawer.pulse_off);
        self.bridge
            .send(&target, std::slice::from_ref(&segment))
            .await
            .map_err(into_send_failed)?;
        report.drawer = DrawerOutcome::Opened;

        info!(printer = %printer, pin = drawer.pin, "drawer test command sent");
        Ok(report)
    }

    /// Route a UI action to the matching operation.
    pub async fn dispatch(&self, event: UiEvent) -> Result<PrintReport, NextposError> {
        match event {
            UiEvent::PrintCurrent {
                doctype,
                name,
                pos_profile,
            } => {
                if doctype != POS_INVOICE_DOCTYPE || name.trim().is_empty() {
                    return Err(NextposError::NoInvoiceOpen);
                }
                self.print_invoice(&name, pos_profile.as_deref()).await
            }
            UiEvent::ReprintLast { pos_profile } => self.reprint_last(pos_profile.as_deref()).await,
            UiEvent::TestPrint => self.test_print().await,
            UiEvent::TestDrawer { drawer } => self.test_drawer(drawer.unwrap_or_default()).await,
        }
    }

    /// Run a send plan. Print failures abort; drawer failures are recorded.
    async fn execute(
        &self,
        target: &PrintTarget,
        ops: Vec<SendOp>,
        report: &mut PrintReport,
    ) -> Result<(), NextposError> {
        for op in ops {
            match op {
                SendOp::Print(payload) => {
                    self.send_payload(target, &payload).await?;
                    report.copies_sent += 1;
                }
                SendOp::Settle(delay) => tokio::time::sleep(delay).await,
                SendOp::Drawer(segment) => {
                    match self.bridge.send(target, std::slice::from_ref(&segment)).await {
                        Ok(()) => report.drawer = DrawerOutcome::Opened,
                        Err(e) => {
                            warn!(error = %e, "drawer kick failed after printing");
                            report.drawer = DrawerOutcome::Failed(e.to_string());
                        }
                    }
                }
            }
        }
        Ok(())
    }

    async fn send_payload(
        &self,
        target: &PrintTarget,
        payload: &PrintPayload,
    ) -> Result<(), NextposError> {
        self.bridge
            .send(target, payload.segments())
            .await
            .map_err(into_send_failed)
    }
}

fn into_send_failed(e: NextposError) -> NextposError {
    match e {
        NextposError::SendFailed(_) => e,
        other => NextposError::SendFailed(other.to_string()),
    }
}
