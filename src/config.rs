//! # Agent Configuration
//!
//! The print agent reads a single TOML file.
//!
//! ## Example
//!
//! ```toml
//! [host]
//! base_url = "https://erp.example.com"
//! api_key = "0123456789abcdef"
//! api_secret = "fedcba9876543210"
//!
//! [agent]
//! listen_addr = "127.0.0.1:8182"
//! default_printer = "Front Counter"
//!
//! [[printers]]
//! name = "Front Counter"
//! endpoint = "tcp://192.168.1.50:9100"
//!
//! [[printers]]
//! name = "Kitchen"
//! endpoint = "/dev/usb/lp0"
//! ```
//!
//! Printers are offered to sessions in file order; the first one is the
//! stand-in when a configured printer is missing.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::NextposError;
use crate::transport::Endpoint;

/// Where the ERP host lives and how to authenticate.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HostConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_secret: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Print agent settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AgentConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// Printer reported as the bridge default, if any
    #[serde(default)]
    pub default_printer: Option<String>,
    /// Skip the certificate/signature handshake on connect
    #[serde(default)]
    pub skip_trust_handshake: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            default_printer: None,
            skip_trust_handshake: false,
        }
    }
}

/// One locally reachable printer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PrinterEntry {
    pub name: String,
    pub endpoint: Endpoint,
}

/// Top-level configuration file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub host: HostConfig,
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub printers: Vec<PrinterEntry>,
}

impl Config {
    /// Parse and validate configuration text.
    pub fn from_toml(text: &str) -> Result<Self, NextposError> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field consistency.
    pub fn validate(&self) -> Result<(), NextposError> {
        if self.host.base_url.trim().is_empty() {
            return Err(NextposError::Config("host.base_url is empty".to_string()));
        }
        if self.host.api_key.is_some() != self.host.api_secret.is_some() {
            return Err(NextposError::Config(
                "host.api_key and host.api_secret must be set together".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for printer in &self.printers {
            if printer.name.trim().is_empty() {
                return Err(NextposError::Config("printer with empty name".to_string()));
            }
            if !seen.insert(printer.name.as_str()) {
                return Err(NextposError::Config(format!(
                    "duplicate printer name '{}'",
                    printer.name
                )));
            }
        }

        if let Some(default) = &self.agent.default_printer
            && !seen.contains(default.as_str())
        {
            return Err(NextposError::Config(format!(
                "agent.default_printer '{}' is not listed under [[printers]]",
                default
            )));
        }

        Ok(())
    }
}

/// Load configuration from a TOML file.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, NextposError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| {
        NextposError::Config(format!("cannot read {}: {}", path.display(), e))
    })?;
    Config::from_toml(&text)
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_listen_addr() -> String {
    "127.0.0.1:8182".to_string()
}
