//! # Nextpos - POS Receipt Printing
//!
//! Nextpos prints web-POS receipts on ESC/POS thermal printers. It provides:
//!
//! - **Receipt command encoding**: cut, feed, cash drawer, and copy
//!   sequencing over raw print segments
//! - **Host integration**: rendered receipt payloads and per-profile print
//!   settings from a Frappe-style ERP host
//! - **Printer bridge**: trust handshake, printer discovery, and raw sends
//!   to network or device printers
//! - **Print agent**: a local HTTP server the POS screen calls
//!
//! ## Quick Start
//!
//! ```
//! use nextpos::{
//!     encoder::{SendOp, plan_print},
//!     payload::{PrintPayload, Segment},
//!     printer::{CutMode, PrintConfig},
//! };
//!
//! let payload = PrintPayload::from(vec![Segment::hex(&[0x1B, 0x40])]);
//! let config = PrintConfig {
//!     cut_mode: CutMode::PartialCut,
//!     print_copies: 2,
//!     ..PrintConfig::default()
//! };
//!
//! let ops = plan_print(payload, &config);
//! assert_eq!(ops.len(), 2);
//! assert!(matches!(ops[0], SendOp::Print(_)));
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`encoder`] | Cut, drawer, printer resolution, copy planning |
//! | [`protocol`] | ESC/POS command bytes and text layout |
//! | [`payload`] | Raw print segments in wire format |
//! | [`printer`] | Print configuration and POS settings |
//! | [`receipt`] | POS Invoice rendering and the sample ticket |
//! | [`bridge`] | Printer bridge capability |
//! | [`host`] | Host API and trust capabilities |
//! | [`session`] | Print request orchestration |
//! | [`transport`] | Raw TCP and device writers |
//! | [`server`] | Local HTTP print agent |
//! | [`config`] | Agent configuration file |
//! | [`error`] | Error types |

pub mod bridge;
pub mod config;
pub mod encoder;
pub mod error;
pub mod host;
pub mod payload;
pub mod printer;
pub mod protocol;
pub mod receipt;
pub mod server;
pub mod session;
pub mod transport;

// Re-exports for convenience
pub use error::NextposError;
pub use payload::{PrintPayload, Segment};
pub use printer::PrintConfig;
pub use session::PrintSession;
