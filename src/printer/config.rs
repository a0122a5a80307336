//! # Print Configuration
//!
//! Per-request printing options: which printer, how to cut, how many copies
//! and whether to kick the cash drawer afterwards.
//!
//! The host returns these as loosely typed JSON (checkbox fields as `0`/`1`,
//! select fields as display labels, pins as text), so deserialization is
//! forgiving in the same places the host is:
//!
//! | Field | Accepted | Fallback |
//! |-------|----------|----------|
//! | `cut_mode` | `"Full Cut"`, `"Partial Cut"`, `"None"` | unknown text → `None`, missing → Full Cut |
//! | `feed_before_cut` | 0-255 | missing → 5, larger → error |
//! | `print_copies` | 1-99 | missing, 0 or negative → 1, larger → error |
//! | `drawer_pin` | integer or numeric text | anything else → 0 |
//! | `open_cash_drawer` | bool or 0/1 | missing → false |

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Lines fed before the cut when nothing is configured.
pub const DEFAULT_FEED_LINES: u8 = 5;

/// Default drawer pulse: 50 × 2 ms on, 50 × 2 ms off.
pub const DEFAULT_PULSE: (u8, u8) = (0x32, 0x32);

/// Most copies one print request may ask for.
pub const MAX_PRINT_COPIES: u32 = 99;

/// Cutter behaviour at the end of each copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum CutMode {
    #[serde(rename = "None")]
    None,
    #[default]
    #[serde(rename = "Full Cut")]
    FullCut,
    #[serde(rename = "Partial Cut")]
    PartialCut,
}

impl CutMode {
    /// Parse the host's select label. Anything unrecognised means no cut.
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "full cut" | "full" => CutMode::FullCut,
            "partial cut" | "partial" => CutMode::PartialCut,
            _ => CutMode::None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CutMode::None => "None",
            CutMode::FullCut => "Full Cut",
            CutMode::PartialCut => "Partial Cut",
        }
    }
}

impl<'de> Deserialize<'de> for CutMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => CutMode::default(),
            Some(Value::String(s)) => CutMode::parse(&s),
            Some(_) => CutMode::None,
        })
    }
}

/// Cash drawer kick parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawerConfig {
    /// Connector pin (`m` in `ESC p m t1 t2`)
    #[serde(default, deserialize_with = "lenient_pin")]
    pub pin: u8,
    /// Pulse ON time in 2 ms units
    #[serde(default = "default_pulse_on")]
    pub pulse_on: u8,
    /// Pulse OFF time in 2 ms units
    #[serde(default = "default_pulse_off")]
    pub pulse_off: u8,
}

impl Default for DrawerConfig {
    fn default() -> Self {
        Self {
            pin: 0,
            pulse_on: DEFAULT_PULSE.0,
            pulse_off: DEFAULT_PULSE.1,
        }
    }
}

/// Resolved printing options for one POS profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintConfig {
    /// Configured printer name; `None` means "use the bridge default"
    #[serde(default, deserialize_with = "non_empty")]
    pub printer: Option<String>,

    #[serde(default)]
    pub cut_mode: CutMode,

    #[serde(default = "default_feed", deserialize_with = "feed_or_default")]
    pub feed_before_cut: u8,

    #[serde(default = "default_copies", deserialize_with = "copies_in_range")]
    pub print_copies: u32,

    #[serde(default, deserialize_with = "lenient_bool")]
    pub open_cash_drawer: bool,

    #[serde(default, deserialize_with = "lenient_pin")]
    pub drawer_pin: u8,

    #[serde(default = "default_pulse_on", rename = "drawer_pulse_on")]
    pub pulse_on: u8,

    #[serde(default = "default_pulse_off", rename = "drawer_pulse_off")]
    pub pulse_off: u8,
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self {
            printer: None,
            cut_mode: CutMode::FullCut,
            feed_before_cut: DEFAULT_FEED_LINES,
            print_copies: 1,
            open_cash_drawer: false,
            drawer_pin: 0,
            pulse_on: DEFAULT_PULSE.0,
            pulse_off: DEFAULT_PULSE.1,
        }
    }
}

impl PrintConfig {
    /// Drawer parameters, or `None` when the drawer should stay shut.
    pub fn drawer(&self) -> Option<DrawerConfig> {
        self.open_cash_drawer.then_some(DrawerConfig {
            pin: self.drawer_pin,
            pulse_on: self.pulse_on,
            pulse_off: self.pulse_off,
        })
    }

    /// Copy count, kept within `1..=MAX_PRINT_COPIES`.
    pub fn copies(&self) -> u32 {
        self.print_copies.clamp(1, MAX_PRINT_COPIES)
    }
}

/// Parse a drawer pin from host text. Invalid input yields pin 0.
///
/// ```
/// use nextpos::printer::config::drawer_pin_or_default;
///
/// assert_eq!(drawer_pin_or_default("1"), 1);
/// assert_eq!(drawer_pin_or_default("pin two"), 0);
/// ```
pub fn drawer_pin_or_default(text: &str) -> u8 {
    text.trim().parse::<u8>().unwrap_or(0)
}

fn default_feed() -> u8 {
    DEFAULT_FEED_LINES
}

fn default_copies() -> u32 {
    1
}

fn default_pulse_on() -> u8 {
    DEFAULT_PULSE.0
}

fn default_pulse_off() -> u8 {
    DEFAULT_PULSE.1
}

fn non_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

fn feed_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    match Option::<u64>::deserialize(deserializer)? {
        None => Ok(DEFAULT_FEED_LINES),
        Some(n) => u8::try_from(n).map_err(|_| {
            serde::de::Error::custom(format!("feed_before_cut {} exceeds 255 lines", n))
        }),
    }
}

fn copies_in_range<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    match Option::<i64>::deserialize(deserializer)? {
        None => Ok(1),
        Some(n) if n < 1 => Ok(1),
        Some(n) if n <= i64::from(MAX_PRINT_COPIES) => Ok(n as u32),
        Some(n) => Err(serde::de::Error::custom(format!(
            "print_copies {} exceeds {} copies",
            n, MAX_PRINT_COPIES
        ))),
    }
}

pub(crate) fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => n.as_i64().is_some_and(|n| n != 0),
        Some(Value::String(s)) => matches!(s.trim(), "1" | "true" | "True"),
        _ => false,
    })
}

fn lenient_pin<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u8::try_from(n).ok()).unwrap_or(0),
        Some(Value::String(s)) => drawer_pin_or_default(&s),
        _ => 0,
    })
}
