//! Byte-stream and transport lifecycle traits

use std::time::Duration;

use async_trait::async_trait;

use htpump_core::{HtpError, HtpResult};

/// Byte-level access to the serial link
///
/// The heat pump conversation is strictly half duplex: one request is
/// written, then response bytes are read until the expected frames arrived.
/// Implementations deliver bytes in order; a read that produces nothing
/// within the configured timeout fails with [`HtpError::Timeout`].
#[async_trait]
pub trait ByteStream: Send + Sync {
    /// Set the per-read timeout. `None` means wait indefinitely.
    async fn set_timeout(&mut self, timeout: Option<Duration>) -> HtpResult<()>;

    /// Read available bytes into `buf`, returning the number of bytes
    /// read. `Ok(0)` signals end of stream.
    async fn read(&mut self, buf: &mut [u8]) -> HtpResult<usize>;

    /// Fill `buf` completely, failing on a premature end of stream.
    async fn read_exact(&mut self, mut buf: &mut [u8]) -> HtpResult<()> {
        while !buf.is_empty() {
            let n = self.read(buf).await?;
            if n == 0 {
                return Err(HtpError::Connection(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "stream ended before the requested bytes arrived",
                )));
            }
            buf = &mut buf[n..];
        }
        Ok(())
    }

    /// Write bytes, returning the number of bytes accepted.
    async fn write(&mut self, buf: &[u8]) -> HtpResult<usize>;

    /// Write the whole buffer.
    async fn write_all(&mut self, buf: &[u8]) -> HtpResult<()> {
        let mut written = 0;
        while written < buf.len() {
            let n = self.write(&buf[written..]).await?;
            if n == 0 {
                return Err(HtpError::Connection(std::io::Error::new(
                    std::io::ErrorKind::WriteZero,
                    "stream stopped accepting bytes",
                )));
            }
            written += n;
        }
        Ok(())
    }

    /// Flush buffered output to the device.
    async fn flush(&mut self) -> HtpResult<()>;

    /// Drop any unsent output and unread input.
    ///
    /// Used before a reconnect so stale bytes from an aborted exchange do
    /// not leak into the next session.
    async fn purge(&mut self) -> HtpResult<()> {
        Ok(())
    }
}

/// Lifecycle of a transport owning a [`ByteStream`]
#[async_trait]
pub trait Transport: ByteStream {
    /// Open the underlying device.
    async fn open(&mut self) -> HtpResult<()>;

    /// Close the underlying device and release it.
    async fn close(&mut self) -> HtpResult<()>;

    /// Whether the device is currently open.
    fn is_open(&self) -> bool;
}
