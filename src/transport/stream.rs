//! # Raw Byte Transport
//!
//! Opens an [`Endpoint`] and writes raw ESC/POS bytes to it.
//!
//! ## Chunked Writes
//!
//! Large payloads (logos, long receipts) are written in chunks with a small
//! pause between them, so slow printers with small input buffers are not
//! overrun. The default chunk size is 4096 bytes with a 2 ms delay.

use std::pin::Pin;
use std::time::Duration;

use tokio::fs::OpenOptions;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

use super::endpoint::Endpoint;
use crate::error::NextposError;

/// Default chunk size for writes (bytes)
const CHUNK_SIZE: usize = 4096;

/// Delay between chunks (milliseconds)
const CHUNK_DELAY_MS: u64 = 2;

/// # Raw Printer Transport
///
/// ## Example
///
/// ```no_run
/// use nextpos::protocol::commands;
/// use nextpos::transport::{Endpoint, RawTransport};
///
/// # async fn example() -> Result<(), nextpos::NextposError> {
/// let endpoint = Endpoint::parse("tcp://192.168.1.50:9100")?;
/// let mut transport = RawTransport::open(&endpoint).await?;
/// transport.write_all(&commands::init()).await?;
/// # Ok(())
/// # }
/// ```
pub struct RawTransport {
    writer: Pin<Box<dyn AsyncWrite + Send>>,
    chunk_size: usize,
    chunk_delay: Duration,
}

impl RawTransport {
    /// Connect (TCP) or open for appending (device/file).
    pub async fn open(endpoint: &Endpoint) -> Result<Self, NextposError> {
        let writer: Pin<Box<dyn AsyncWrite + Send>> = match endpoint {
            Endpoint::Tcp(addr) => {
                let stream = TcpStream::connect(addr).await.map_err(|e| {
                    NextposError::SendFailed(format!("Failed to connect to {}: {}", addr, e))
                })?;
                stream.set_nodelay(true)?;
                Box::pin(stream)
            }
            Endpoint::Device(path) => {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .await
                    .map_err(|e| {
                        NextposError::SendFailed(format!(
                            "Failed to open {}: {}",
                            path.display(),
                            e
                        ))
                    })?;
                Box::pin(file)
            }
        };

        Ok(Self {
            writer,
            chunk_size: CHUNK_SIZE,
            chunk_delay: Duration::from_millis(CHUNK_DELAY_MS),
        })
    }

    /// Set the chunk size for large writes.
    pub fn set_chunk_size(&mut self, size: usize) {
        self.chunk_size = size.max(1);
    }

    /// Set the delay between chunks.
    pub fn set_chunk_delay(&mut self, delay: Duration) {
        self.chunk_delay = delay;
    }

    /// Write data to the printer and flush.
    ///
    /// Small writes are sent directly; large writes are chunked.
    pub async fn write_all(&mut self, data: &[u8]) -> Result<(), NextposError> {
        if data.len() <= self.chunk_size {
            self.writer
                .write_all(data)
                .await
                .map_err(|e| NextposError::SendFailed(format!("Write failed: {}", e)))?;
        } else {
            for chunk in data.chunks(self.chunk_size) {
                self.writer
                    .write_all(chunk)
                    .await
                    .map_err(|e| NextposError::SendFailed(format!("Write failed: {}", e)))?;

                if !self.chunk_delay.is_zero() {
                    tokio::time::sleep(self.chunk_delay).await;
                }
            }
        }

        self.writer
            .flush()
            .await
            .map_err(|e| NextposError::SendFailed(format!("Flush failed: {}", e)))?;

        Ok(())
    }

    /// Flush and close the write half.
    pub async fn shutdown(mut self) -> Result<(), NextposError> {
        self.writer
            .shutdown()
            .await
            .map_err(|e| NextposError::SendFailed(format!("Close failed: {}", e)))
    }
}
