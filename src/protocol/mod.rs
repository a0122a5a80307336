//! # ESC/POS Protocol Implementation
//!
//! This module provides low-level command builders for the ESC/POS
//! protocol spoken by most thermal receipt printers (Epson TM series and
//! the many compatibles behind POS terminals).
//!
//! ## Module Structure
//!
//! - [`commands`]: Printer commands (init, align, feed, cut, drawer kick)
//! - [`text`]: Alignment and fixed-width column helpers
//! - [`hex`]: Hex text encoding used on the bridge wire format
//!
//! ## Usage Example
//!
//! ```
//! use nextpos::protocol::{commands, hex, text::Alignment};
//!
//! let mut data = Vec::new();
//! data.extend(commands::init());
//! data.extend(commands::align(Alignment::Center));
//! data.extend(b"RECEIPT\n");
//! data.extend(commands::feed_lines(5));
//! data.extend(commands::cut(commands::Cut::Full));
//!
//! assert!(hex::to_hex(&data).ends_with("1B64051D5600"));
//! ```

pub mod commands;
pub mod hex;
pub mod text;
