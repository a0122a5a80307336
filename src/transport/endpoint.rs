//! Printer endpoint addresses.
//!
//! | Form | Meaning |
//! |------|---------|
//! | `tcp://192.168.1.50:9100` | Network printer, raw socket |
//! | `tcp://192.168.1.50` | Same, default port 9100 |
//! | `file:///dev/usb/lp0` | Device node or spool file |
//! | `/dev/usb/lp0` | Same, bare path |

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::NextposError;

/// Raw printing port used by most network receipt printers.
pub const DEFAULT_RAW_PORT: u16 = 9100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// `host:port` of a raw TCP printer
    Tcp(String),
    /// Path to a device node or file
    Device(PathBuf),
}

impl Endpoint {
    pub fn parse(text: &str) -> Result<Self, NextposError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(NextposError::Config("empty printer endpoint".to_string()));
        }

        if let Some(rest) = text.strip_prefix("tcp://") {
            let authority = rest.trim_end_matches('/');
            if authority.is_empty() {
                return Err(NextposError::Config(format!("missing host in '{}'", text)));
            }
            let addr = match authority.rsplit_once(':') {
                Some((host, port)) if !host.is_empty() => {
                    port.parse::<u16>().map_err(|_| {
                        NextposError::Config(format!("invalid port in '{}'", text))
                    })?;
                    authority.to_string()
                }
                Some(_) => return Err(NextposError::Config(format!("missing host in '{}'", text))),
                None => format!("{}:{}", authority, DEFAULT_RAW_PORT),
            };
            return Ok(Endpoint::Tcp(addr));
        }

        if let Some(path) = text.strip_prefix("file://") {
            return Ok(Endpoint::Device(PathBuf::from(path)));
        }

        if text.contains("://") {
            return Err(NextposError::Config(format!(
                "unsupported endpoint scheme in '{}'",
                text
            )));
        }

        Ok(Endpoint::Device(PathBuf::from(text)))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Tcp(addr) => write!(f, "tcp://{}", addr),
            Endpoint::Device(path) => write!(f, "file://{}", path.display()),
        }
    }
}

impl Serialize for Endpoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Endpoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Endpoint::parse(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tcp_with_port() {
        assert_eq!(
            Endpoint::parse("tcp://10.0.0.7:9101").unwrap(),
            Endpoint::Tcp("10.0.0.7:9101".to_string())
        );
    }

    #[test]
    fn test_tcp_default_port() {
        assert_eq!(
            Endpoint::parse("tcp://printer.local").unwrap(),
            Endpoint::Tcp("printer.local:9100".to_string())
        );
    }

    #[test]
    fn test_bad_port() {
        assert!(Endpoint::parse("tcp://host:notaport").is_err());
        assert!(Endpoint::parse("tcp://:9100").is_err());
    }

    #[test]
    fn test_paths() {
        let expected = Endpoint::Device(PathBuf::from("/dev/usb/lp0"));
        assert_eq!(Endpoint::parse("file:///dev/usb/lp0").unwrap(), expected);
        assert_eq!(Endpoint::parse("/dev/usb/lp0").unwrap(), expected);
    }

    #[test]
    fn test_unknown_scheme() {
        assert!(Endpoint::parse("usb://0x04b8").is_err());
    }

    #[test]
    fn test_display_reparses() {
        for text in ["tcp://10.0.0.7:9100", "file:///tmp/out.bin"] {
            let endpoint = Endpoint::parse(text).unwrap();
            assert_eq!(endpoint.to_string(), text);
        }
    }
}
