//! # Print Payload
//!
//! A payload is the ordered list of segments handed to a printer bridge in
//! one `send`. The JSON shape is the one browser printer bridges accept:
//!
//! ```json
//! [{ "type": "raw", "format": "hex", "data": "1B40" },
//!  { "type": "raw", "format": "command", "data": "TOTAL  10.50\n" }]
//! ```
//!
//! Segments are opaque to the encoder; it only appends to the tail.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

use crate::error::NextposError;
use crate::protocol::hex;

/// Segment kind. Only raw segments reach ESC/POS printers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    #[default]
    Raw,
}

/// How `data` is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentFormat {
    /// Text (may contain control characters), sent as UTF-8
    #[default]
    Command,
    /// Plain text, sent as UTF-8
    Plain,
    /// Hex text, decoded before sending
    Hex,
    /// Base64, decoded before sending
    Base64,
}

/// One print-job segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    #[serde(rename = "type", default)]
    pub kind: SegmentKind,
    #[serde(default)]
    pub format: SegmentFormat,
    pub data: String,
}

impl Segment {
    /// Raw bytes carried as hex text.
    pub fn hex(bytes: &[u8]) -> Self {
        Self {
            kind: SegmentKind::Raw,
            format: SegmentFormat::Hex,
            data: hex::to_hex(bytes),
        }
    }

    /// Text carried verbatim (control characters allowed).
    pub fn command(text: impl Into<String>) -> Self {
        Self {
            kind: SegmentKind::Raw,
            format: SegmentFormat::Command,
            data: text.into(),
        }
    }

    /// Decode `data` to the bytes that go on the wire.
    pub fn to_bytes(&self) -> Result<Vec<u8>, NextposError> {
        match self.format {
            SegmentFormat::Command | SegmentFormat::Plain => Ok(self.data.as_bytes().to_vec()),
            SegmentFormat::Hex => hex::from_hex(&self.data),
            SegmentFormat::Base64 => BASE64
                .decode(self.data.trim())
                .map_err(|e| NextposError::InvalidCommand(format!("bad base64 data: {}", e))),
        }
    }
}

/// Ordered, append-only list of segments for one print.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrintPayload {
    segments: Vec<Segment>,
}

impl PrintPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a segment at the tail.
    pub fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Concatenate every segment's wire bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, NextposError> {
        let mut out = Vec::new();
        for segment in &self.segments {
            out.extend(segment.to_bytes()?);
        }
        Ok(out)
    }
}

impl From<Vec<Segment>> for PrintPayload {
    fn from(segments: Vec<Segment>) -> Self {
        Self { segments }
    }
}

impl FromIterator<Segment> for PrintPayload {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_wire_shape() {
        let json = serde_json::to_value(Segment::hex(&[0x1B, 0x40])).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "type": "raw", "format": "hex", "data": "1B40" })
        );
    }

    #[test]
    fn test_payload_is_a_json_array() {
        let payload: PrintPayload = serde_json::from_str(
            r#"[{"type":"raw","format":"command","data":"hi\n"},{"type":"raw","format":"hex","data":"1d5600"}]"#,
        )
        .unwrap();
        assert_eq!(payload.len(), 2);
        assert_eq!(payload.to_bytes().unwrap(), b"hi\n\x1D\x56\x00".to_vec());
    }

    #[test]
    fn test_base64_segment() {
        let segment = Segment {
            kind: SegmentKind::Raw,
            format: SegmentFormat::Base64,
            data: "G0A=".to_string(),
        };
        assert_eq!(segment.to_bytes().unwrap(), vec![0x1B, 0x40]);
    }

    #[test]
    fn test_missing_type_and_format_default_to_raw_command() {
        let segment: Segment = serde_json::from_str(r#"{"data":"x"}"#).unwrap();
        assert_eq!(segment, Segment::command("x"));
    }
}
