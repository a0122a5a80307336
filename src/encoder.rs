//! # Receipt Command Encoder
//!
//! Pure transforms from a receipt payload plus a [`PrintConfig`] to the
//! ordered list of operations a session performs against the printer
//! bridge:
//!
//! ```text
//! payload ──append_cut_command──▶ payload' ──repeat_for_copies──▶ [Print × N, Settle, Drawer]
//! ```
//!
//! Nothing here touches a device or the network. The only external input
//! is the list of printers the bridge enumerated, passed to
//! [`resolve_printer`].

use std::time::Duration;

use crate::error::NextposError;
use crate::payload::{PrintPayload, Segment};
use crate::printer::config::MAX_PRINT_COPIES;
use crate::printer::{CutMode, DrawerConfig, PrintConfig};
use crate::protocol::commands::{self, Cut};

/// Pause between the last copy and the drawer kick, so the printer has
/// finished cutting before the solenoid fires.
pub const DRAWER_SETTLE_DELAY: Duration = Duration::from_millis(500);

/// One step of a print sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOp {
    /// Send the whole payload once
    Print(PrintPayload),
    /// Wait before the next step
    Settle(Duration),
    /// Send the drawer-kick segment
    Drawer(Segment),
}

/// Outcome of [`resolve_printer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Printer to send to
    pub printer: String,
    /// Set when the configured printer was missing and `printer` is a
    /// stand-in; carries the configured name for the notice.
    pub substituted_for: Option<String>,
}

impl Resolution {
    pub fn is_substituted(&self) -> bool {
        self.substituted_for.is_some()
    }

    /// Notice text for the cashier, when a substitution happened.
    pub fn notice(&self) -> Option<String> {
        self.substituted_for.as_ref().map(|configured| {
            format!(
                "{} Printing to '{}' instead.",
                NextposError::ConfiguredPrinterMissing(configured.clone()),
                self.printer
            )
        })
    }
}

/// Append the feed-and-cut segment to `payload`.
///
/// `CutMode::None` returns the payload untouched. Otherwise exactly one
/// hex segment is appended: `1B64<n>` when `feed_lines > 0`, then
/// `1D5600` (full) or `1D5601` (partial).
pub fn append_cut_command(
    mut payload: PrintPayload,
    cut_mode: CutMode,
    feed_lines: u8,
) -> PrintPayload {
    let cut = match cut_mode {
        CutMode::None => return payload,
        CutMode::FullCut => Cut::Full,
        CutMode::PartialCut => Cut::Partial,
    };

    let mut bytes = Vec::with_capacity(6);
    if feed_lines > 0 {
        bytes.extend(commands::feed_lines(feed_lines));
    }
    bytes.extend(commands::cut(cut));

    payload.push(Segment::hex(&bytes));
    payload
}

/// Build the drawer-kick segment `1B70<pin><t1><t2>`.
///
/// ```
/// use nextpos::encoder::build_drawer_command;
///
/// assert_eq!(build_drawer_command(2, 50, 50).data, "1B70023232");
/// ```
pub fn build_drawer_command(pin: u8, pulse_on: u8, pulse_off: u8) -> Segment {
    Segment::hex(&commands::drawer_kick(pin, pulse_on, pulse_off))
}

/// Pick the printer to send to.
///
/// The configured printer is used when the bridge lists it; otherwise the
/// first listed printer stands in and the result is marked substituted.
/// With no configured printer the first listed one is used without a
/// notice.
pub fn resolve_printer(
    configured: Option<&str>,
    available: &[String],
) -> Result<Resolution, NextposError> {
    let first = available.first().ok_or(NextposError::NoPrintersFound)?;

    match configured {
        Some(name) if available.iter().any(|p| p == name) => Ok(Resolution {
            printer: name.to_string(),
            substituted_for: None,
        }),
        Some(name) => Ok(Resolution {
            printer: first.clone(),
            substituted_for: Some(name.to_string()),
        }),
        None => Ok(Resolution {
            printer: first.clone(),
            substituted_for: None,
        }),
    }
}

/// Expand a payload into the send sequence for `copies` copies.
///
/// The identical payload is sent `copies` times, at least once and at most
/// [`MAX_PRINT_COPIES`]. A drawer kick, when requested, follows once after
/// every copy and a [`DRAWER_SETTLE_DELAY`] pause.
pub fn repeat_for_copies(
    payload: &PrintPayload,
    copies: u32,
    drawer: Option<DrawerConfig>,
) -> Vec<SendOp> {
    let copies = copies.clamp(1, MAX_PRINT_COPIES) as usize;
    let mut ops = Vec::with_capacity(copies + 2);

    ops.extend(std::iter::repeat_n(SendOp::Print(payload.clone()), copies));

    if let Some(drawer) = drawer {
        ops.push(SendOp::Settle(DRAWER_SETTLE_DELAY));
        ops.push(SendOp::Drawer(build_drawer_command(
            drawer.pin,
            drawer.pulse_on,
            drawer.pulse_off,
        )));
    }

    ops
}

/// Full plan for one print: cut appended, copies repeated, drawer last.
pub fn plan_print(payload: PrintPayload, config: &PrintConfig) -> Vec<SendOp> {
    let payload = append_cut_command(payload, config.cut_mode, config.feed_before_cut);
    repeat_for_copies(&payload, config.copies(), config.drawer())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::hex::to_hex;
    use pretty_assertions::assert_eq;

    fn receipt() -> PrintPayload {
        PrintPayload::from(vec![
            Segment::command("COFFEE        2.50\n"),
            Segment::hex(&[0x0A, 0x0A]),
        ])
    }

    fn printers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_full_cut_with_feed() {
        for n in [1u8, 5, 16, 255] {
            let out = append_cut_command(receipt(), CutMode::FullCut, n);
            let tail = &out.segments().last().unwrap().data;
            assert_eq!(*tail, format!("1B64{}1D5600", to_hex(&[n])));
        }
    }

    #[test]
    fn test_full_cut_without_feed() {
        let out = append_cut_command(receipt(), CutMode::FullCut, 0);
        assert_eq!(out.len(), 3);
        assert_eq!(out.segments()[2].data, "1D5600");
    }

    #[test]
    fn test_partial_cut() {
        let out = append_cut_command(receipt(), CutMode::PartialCut, 5);
        assert_eq!(out.segments()[2].data, "1B64051D5601");
    }

    #[test]
    fn test_no_cut_leaves_payload_unchanged() {
        let original = receipt();
        let out = append_cut_command(original.clone(), CutMode::None, 5);
        assert_eq!(out, original);
    }

    #[test]
    fn test_cut_preserves_existing_segments() {
        let out = append_cut_command(receipt(), CutMode::FullCut, 5);
        assert_eq!(&out.segments()[..2], receipt().segments());
    }

    #[test]
    fn test_drawer_command() {
        assert_eq!(build_drawer_command(2, 50, 50).data, "1B70023232");
        assert_eq!(build_drawer_command(0, 0x32, 0x32).data, "1B70003232");
        assert_eq!(build_drawer_command(1, 25, 250).data, "1B700119FA");
    }

    #[test]
    fn test_resolve_configured_present() {
        let r = resolve_printer(Some("A"), &printers(&["A", "B"])).unwrap();
        assert_eq!(r.printer, "A");
        assert!(!r.is_substituted());
        assert_eq!(r.notice(), None);
    }

    #[test]
    fn test_resolve_configured_missing_substitutes_first() {
        let r = resolve_printer(Some("X"), &printers(&["A", "B"])).unwrap();
        assert_eq!(r.printer, "A");
        assert_eq!(r.substituted_for.as_deref(), Some("X"));
        assert!(r.notice().unwrap().contains("'A'"));
    }

    #[test]
    fn test_resolve_unconfigured_takes_first_silently() {
        let r = resolve_printer(None, &printers(&["B"])).unwrap();
        assert_eq!(r.printer, "B");
        assert!(!r.is_substituted());
    }

    #[test]
    fn test_resolve_empty_fails() {
        assert!(matches!(
            resolve_printer(Some("A"), &[]),
            Err(NextposError::NoPrintersFound)
        ));
    }

    #[test]
    fn test_copies_before_drawer() {
        let payload = receipt();
        let ops = repeat_for_copies(
            &payload,
            3,
            Some(DrawerConfig {
                pin: 0,
                pulse_on: 50,
                pulse_off: 50,
            }),
        );

        assert_eq!(ops.len(), 5);
        for op in &ops[..3] {
            assert_eq!(*op, SendOp::Print(payload.clone()));
        }
        assert_eq!(ops[3], SendOp::Settle(DRAWER_SETTLE_DELAY));
        assert_eq!(ops[4], SendOp::Drawer(build_drawer_command(0, 50, 50)));
    }

    #[test]
    fn test_zero_copies_sends_once() {
        let ops = repeat_for_copies(&receipt(), 0, None);
        assert_eq!(ops, vec![SendOp::Print(receipt())]);
    }

    #[test]
    fn test_copies_capped() {
        let ops = repeat_for_copies(&receipt(), u32::MAX, None);
        assert_eq!(ops.len(), MAX_PRINT_COPIES as usize);

        let config = PrintConfig {
            print_copies: 10_000,
            ..PrintConfig::default()
        };
        assert_eq!(plan_print(receipt(), &config).len(), MAX_PRINT_COPIES as usize);
    }

    #[test]
    fn test_plan_print_appends_cut_to_every_copy() {
        let config = PrintConfig {
            print_copies: 2,
            ..PrintConfig::default()
        };
        let ops = plan_print(receipt(), &config);

        assert_eq!(ops.len(), 2);
        for op in ops {
            let SendOp::Print(p) = op else {
                panic!("expected only print ops");
            };
            assert_eq!(p.segments().last().unwrap().data, "1B64051D5600");
        }
    }
}
