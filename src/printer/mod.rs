//! # Printer Module
//!
//! Printing options and the settings document they are resolved from.
//!
//! ## Modules
//!
//! - [`config`]: Per-print configuration (cut, feed, copies, drawer)
//! - [`settings`]: Site settings and per-profile printer mappings

pub mod config;
pub mod settings;

pub use config::{CutMode, DrawerConfig, PrintConfig};
pub use settings::{PosSettings, PrinterMapping, ReceiptOptions};
