//! # Error Types
//!
//! This module defines the error type used throughout the nextpos library.
//!
//! The first six variants are the print-path taxonomy every caller surfaces
//! to the cashier as a notice. The rest cover the ambient plumbing (host
//! HTTP calls, configuration, I/O).

use thiserror::Error;

/// Main error type for nextpos operations
#[derive(Debug, Error)]
pub enum NextposError {
    /// No printer bridge is available to this process
    #[error("Printer bridge unavailable: {0}")]
    BridgeUnavailable(String),

    /// Bridge handshake or connect failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The bridge is reachable but enumerates no printers
    #[error("No printers found")]
    NoPrintersFound,

    /// The configured printer is not installed; recoverable by substitution
    #[error("Configured printer '{0}' is not available")]
    ConfiguredPrinterMissing(String),

    /// Transmission of a print segment failed
    #[error("Send failed: {0}")]
    SendFailed(String),

    /// The host rejected the trust handshake
    #[error("Signing failed: {0}")]
    SigningFailed(String),

    /// Host API call failed (HTTP status, transport, bad envelope)
    #[error("Host error: {0}")]
    Host(String),

    /// Invalid command or parameter
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// Configuration file could not be loaded or is inconsistent
    #[error("Config error: {0}")]
    Config(String),

    /// The UI asked to print a document that is not a POS Invoice
    #[error("No POS Invoice is currently open")]
    NoInvoiceOpen,

    /// Reprint requested but the host has no submitted invoices
    #[error("No submitted POS invoices found")]
    NoInvoiceFound,

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for NextposError {
    fn from(e: reqwest::Error) -> Self {
        NextposError::Host(e.to_string())
    }
}

impl From<toml::de::Error> for NextposError {
    fn from(e: toml::de::Error) -> Self {
        NextposError::Config(e.to_string())
    }
}

impl NextposError {
    /// Short title shown above the notice, mirroring the messages the POS
    /// screen displays for each failure class.
    pub fn title(&self) -> &'static str {
        match self {
            NextposError::BridgeUnavailable(_) => "Printer Bridge Not Loaded",
            NextposError::ConnectionFailed(_) => "Printer Bridge Not Running",
            NextposError::NoPrintersFound => "No Printers Found",
            NextposError::ConfiguredPrinterMissing(_) => "Printer Substituted",
            NextposError::SendFailed(_) => "Print Failed",
            NextposError::SigningFailed(_) => "Signing Failed",
            NextposError::Host(_) => "Host Error",
            NextposError::InvalidCommand(_) => "Invalid Command",
            NextposError::Config(_) => "Configuration Error",
            NextposError::NoInvoiceOpen | NextposError::NoInvoiceFound => "POS Invoice",
            NextposError::Io(_) => "I/O Error",
        }
    }
}
