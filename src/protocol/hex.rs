//! Hexadecimal text form of raw commands.
//!
//! Printer bridges accept raw segments as hex text (`"1B40"`), which keeps
//! control bytes intact through JSON. Output is uppercase with no
//! separators.

use crate::error::NextposError;

/// Encode bytes as uppercase hex text.
///
/// ```
/// use nextpos::protocol::hex::to_hex;
///
/// assert_eq!(to_hex(&[0x1D, 0x56, 0x00]), "1D5600");
/// ```
pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode_upper(bytes)
}

/// Decode hex text (either case) back to bytes.
pub fn from_hex(text: &str) -> Result<Vec<u8>, NextposError> {
    hex::decode(text.trim())
        .map_err(|e| NextposError::InvalidCommand(format!("bad hex data: {}", e)))
}
