//! # Printer Transport Layer
//!
//! This module provides the byte pipes the local bridge writes receipts to.
//!
//! ## Available Transports
//!
//! - TCP raw socket, for network receipt printers (port 9100)
//! - Device node or file, for USB line printers and spool files

pub mod endpoint;
pub mod stream;

pub use endpoint::Endpoint;
pub use stream::RawTransport;
