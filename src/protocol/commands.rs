//! # ESC/POS Protocol Commands
//!
//! This module implements the small subset of the ESC/POS command set that
//! receipt printing needs: initialization, alignment, line feeds, the cutter
//! and the cash-drawer kick.
//!
//! ## Escape Sequence Structure
//!
//! Commands follow these patterns:
//! - Single byte: `LF`
//! - Two bytes: `ESC @`
//! - Multi-byte with parameters: `ESC d n`, `GS V m`, `ESC p m t1 t2`
//!
//! Every parameter is a single byte. Callers that hold wider integers must
//! narrow them before calling in here; the builders never clamp silently.
//!
//! ## Opcode Table
//!
//! | Command | Hex | Purpose |
//! |---------|-----|---------|
//! | `ESC @` | `1B 40` | Initialize |
//! | `ESC a n` | `1B 61 n` | Align (0 left, 1 center, 2 right) |
//! | `ESC d n` | `1B 64 n` | Print and feed n lines |
//! | `GS V 0` | `1D 56 00` | Full cut |
//! | `GS V 1` | `1D 56 01` | Partial cut |
//! | `ESC p m t1 t2` | `1B 70 m t1 t2` | Drawer kick pulse |

use super::text::Alignment;

// ============================================================================
// ESCAPE SEQUENCE CONSTANTS
// ============================================================================

/// ESC (Escape) - Command prefix byte
pub const ESC: u8 = 0x1B;

/// GS (Group Separator) - Extended command prefix, used by the cutter
pub const GS: u8 = 0x1D;

/// LF (Line Feed) - Print and advance one line
pub const LF: u8 = 0x0A;

// ============================================================================
// INITIALIZATION
// ============================================================================

/// # Initialize Printer (ESC @)
///
/// Clears the print buffer and resets text modes to the power-on defaults.
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC @ |
/// | Hex     | 1B 40 |
///
/// ```
/// use nextpos::protocol::commands;
///
/// assert_eq!(commands::init(), vec![0x1B, 0x40]);
/// ```
#[inline]
pub fn init() -> Vec<u8> {
    vec![ESC, b'@']
}

/// # Select Justification (ESC a n)
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | ESC a n  |
/// | Hex     | 1B 61 n  |
///
/// Takes effect at the start of the next line.
///
/// ```
/// use nextpos::protocol::{commands, text::Alignment};
///
/// assert_eq!(commands::align(Alignment::Center), vec![0x1B, 0x61, 0x01]);
/// ```
#[inline]
pub fn align(alignment: Alignment) -> Vec<u8> {
    vec![ESC, b'a', alignment as u8]
}

// ============================================================================
// PAPER FEED
// ============================================================================

/// # Print and Feed n Lines (ESC d n)
///
/// Prints the line buffer and advances the paper by `n` lines. Used before
/// a cut so the last printed line clears the blade.
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | ESC d n  |
/// | Hex     | 1B 64 n  |
///
/// ```
/// use nextpos::protocol::commands;
///
/// assert_eq!(commands::feed_lines(5), vec![0x1B, 0x64, 0x05]);
/// ```
#[inline]
pub fn feed_lines(n: u8) -> Vec<u8> {
    vec![ESC, b'd', n]
}

// ============================================================================
// CUTTER CONTROL
// ============================================================================

/// Cut flavour for `GS V m`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cut {
    /// `m = 0`: sever the paper completely
    Full = 0,
    /// `m = 1`: leave a small hinge so the receipt does not fall
    Partial = 1,
}

/// # Cut Paper (GS V m)
///
/// | Format  | Bytes     |
/// |---------|-----------|
/// | ASCII   | GS V m    |
/// | Hex     | 1D 56 m   |
///
/// The cut happens at the current position; feed first with
/// [`feed_lines`] if the last line has not cleared the cutter.
///
/// ```
/// use nextpos::protocol::commands::{cut, Cut};
///
/// assert_eq!(cut(Cut::Full), vec![0x1D, 0x56, 0x00]);
/// assert_eq!(cut(Cut::Partial), vec![0x1D, 0x56, 0x01]);
/// ```
#[inline]
pub fn cut(kind: Cut) -> Vec<u8> {
    vec![GS, b'V', kind as u8]
}

// ============================================================================
// CASH DRAWER
// ============================================================================

/// # Generate Pulse (ESC p m t1 t2)
///
/// Energises the drawer solenoid connected to connector pin `m`.
///
/// | Format  | Bytes             |
/// |---------|-------------------|
/// | ASCII   | ESC p m t1 t2     |
/// | Hex     | 1B 70 m t1 t2     |
///
/// ## Parameters
///
/// - `pin`: 0 selects connector pin 2, 1 selects pin 5
/// - `on`: pulse ON time, in units of 2 ms
/// - `off`: pulse OFF time, in units of 2 ms
///
/// Most drawers open reliably with 50/50 (`0x32 0x32`, 100 ms each).
///
/// ```
/// use nextpos::protocol::commands;
///
/// assert_eq!(commands::drawer_kick(2, 50, 50), vec![0x1B, 0x70, 0x02, 0x32, 0x32]);
/// ```
#[inline]
pub fn drawer_kick(pin: u8, on: u8, off: u8) -> Vec<u8> {
    vec![ESC, b'p', pin, on, off]
}

// ============================================================================
// TESTS
// ============================================================================
