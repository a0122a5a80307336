//! # POS Printing Settings
//!
//! The site-wide settings document: a default printer plus optional
//! per-POS-profile printer mappings, the cut/feed/copy/drawer defaults and
//! the receipt layout switches.
//!
//! [`PosSettings::printer_for_profile`] turns the document into the
//! [`PrintConfig`] used for one print.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::config::{
    CutMode, DEFAULT_FEED_LINES, DEFAULT_PULSE, MAX_PRINT_COPIES, PrintConfig, lenient_bool,
};

/// Printer name the setup wizard fills in when none is configured.
pub const WIZARD_DEFAULT_PRINTER: &str = "Default Printer";

/// One row of the printer mapping table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrinterMapping {
    pub pos_profile: String,
    pub printer: String,
}

/// Receipt layout switches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiptOptions {
    #[serde(deserialize_with = "lenient_bool")]
    pub show_address: bool,
    #[serde(deserialize_with = "lenient_bool")]
    pub wrap_long_names: bool,
    #[serde(deserialize_with = "lenient_bool")]
    pub show_item_code: bool,
    #[serde(deserialize_with = "lenient_bool")]
    pub show_tax: bool,
    #[serde(deserialize_with = "lenient_bool")]
    pub show_cashier: bool,
    pub custom_footer: Option<String>,
}

/// The settings document. Unset fields stay `None` so the wizard and the
/// per-profile resolution can tell "not configured" from "configured".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PosSettings {
    #[serde(deserialize_with = "lenient_bool")]
    pub enable_printing: bool,
    #[serde(deserialize_with = "lenient_bool")]
    pub enable_auto_print: bool,
    pub default_printer: Option<String>,
    pub cut_mode: Option<String>,
    pub feed_before_cut: Option<u8>,
    pub print_copies: Option<u32>,
    #[serde(deserialize_with = "optional_pin")]
    pub drawer_pin: Option<u8>,
    #[serde(deserialize_with = "lenient_bool")]
    pub open_cash_drawer: bool,
    pub printer_mappings: Vec<PrinterMapping>,
    #[serde(flatten)]
    pub receipt: ReceiptOptions,
}

impl PosSettings {
    /// Settings created on first install: printing on, no printer chosen.
    pub fn initial() -> Self {
        Self {
            enable_printing: true,
            ..Default::default()
        }
    }

    /// Resolve the print configuration for `pos_profile`.
    ///
    /// A mapping row for the profile wins over the default printer. Zero
    /// or unset feed/copy counts fall back to the defaults (5 lines, 1 copy);
    /// an unset cut mode means Full Cut. Copies are capped at
    /// [`MAX_PRINT_COPIES`].
    pub fn printer_for_profile(&self, pos_profile: Option<&str>) -> PrintConfig {
        let mapped = pos_profile.and_then(|profile| {
            self.printer_mappings
                .iter()
                .find(|row| row.pos_profile == profile)
                .map(|row| row.printer.clone())
        });

        let printer = mapped
            .or_else(|| self.default_printer.clone())
            .filter(|p| !p.trim().is_empty());

        let cut_mode = match self.cut_mode.as_deref() {
            Some(label) if !label.is_empty() => CutMode::parse(label),
            _ => CutMode::FullCut,
        };

        PrintConfig {
            printer,
            cut_mode,
            feed_before_cut: self
                .feed_before_cut
                .filter(|&n| n > 0)
                .unwrap_or(DEFAULT_FEED_LINES),
            print_copies: self
                .print_copies
                .filter(|&n| n > 0)
                .unwrap_or(1)
                .min(MAX_PRINT_COPIES),
            open_cash_drawer: self.open_cash_drawer,
            drawer_pin: self.drawer_pin.unwrap_or(0),
            pulse_on: DEFAULT_PULSE.0,
            pulse_off: DEFAULT_PULSE.1,
        }
    }

    /// Fill sensible defaults for anything not yet configured and switch
    /// auto-print on. Returns the names of the fields that changed.
    pub fn apply_wizard_defaults(&mut self) -> Vec<&'static str> {
        let mut changed = Vec::new();

        if self.default_printer.as_deref().is_none_or(str::is_empty) {
            self.default_printer = Some(WIZARD_DEFAULT_PRINTER.to_string());
            changed.push("default_printer");
        }
        if self.cut_mode.as_deref().is_none_or(str::is_empty) {
            self.cut_mode = Some(CutMode::FullCut.label().to_string());
            changed.push("cut_mode");
        }
        if self.feed_before_cut.is_none_or(|n| n == 0) {
            self.feed_before_cut = Some(DEFAULT_FEED_LINES);
            changed.push("feed_before_cut");
        }
        if self.print_copies.is_none_or(|n| n == 0) {
            self.print_copies = Some(1);
            changed.push("print_copies");
        }
        if !self.enable_auto_print {
            self.enable_auto_print = true;
            changed.push("enable_auto_print");
        }

        changed
    }
}

/// Select fields arrive as text (`"1"`), older documents store numbers.
fn optional_pin<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u8>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u8::try_from(n).ok()),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}
