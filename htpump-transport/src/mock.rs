//! Scripted in-memory stream for tests and device simulators
//!
//! `MockStream` plays back a queue of canned device bytes and records
//! everything the driver writes. A read against an exhausted script fails
//! with [`HtpError::Timeout`], which is what a silent device looks like to
//! the engine.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;

use htpump_core::{HtpError, HtpResult};

use crate::stream::{ByteStream, Transport};

/// Scripted byte stream standing in for the serial port
#[derive(Debug, Default)]
pub struct MockStream {
    pending: VecDeque<u8>,
    written: Vec<u8>,
    open: bool,
    opens: u32,
    script_closed: bool,
}

impl MockStream {
    /// Create an open stream with an empty script.
    pub fn new() -> Self {
        Self {
            pending: VecDeque::new(),
            written: Vec::new(),
            open: true,
            opens: 1,
            script_closed: false,
        }
    }

    /// Mark the script as final: a read past its end reports end of
    /// stream instead of a timeout.
    pub fn close_script(&mut self) {
        self.script_closed = true;
    }

    /// Append raw device bytes to the script.
    pub fn push_bytes(&mut self, bytes: impl AsRef<[u8]>) {
        self.pending.extend(bytes.as_ref());
    }

    /// All bytes the driver wrote so far.
    pub fn written(&self) -> &[u8] {
        &self.written
    }

    /// Drain and return the bytes the driver wrote so far.
    pub fn take_written(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.written)
    }

    /// How often `open()` was called, including the initial state.
    pub fn open_count(&self) -> u32 {
        self.opens
    }

    /// Device bytes not yet consumed by the driver.
    pub fn unread(&self) -> usize {
        self.pending.len()
    }
}

#[async_trait]
impl ByteStream for MockStream {
    async fn set_timeout(&mut self, _timeout: Option<Duration>) -> HtpResult<()> {
        Ok(())
    }

    async fn read(&mut self, buf: &mut [u8]) -> HtpResult<usize> {
        if !self.open {
            return Err(HtpError::NotConnected);
        }
        if self.pending.is_empty() {
            if self.script_closed {
                return Ok(0);
            }
            return Err(HtpError::Timeout);
        }
        let mut n = 0;
        while n < buf.len() {
            match self.pending.pop_front() {
                Some(b) => {
                    buf[n] = b;
                    n += 1;
                }
                None => break,
            }
        }
        Ok(n)
    }

    async fn write(&mut self, buf: &[u8]) -> HtpResult<usize> {
        if !self.open {
            return Err(HtpError::NotConnected);
        }
        self.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    async fn flush(&mut self) -> HtpResult<()> {
        Ok(())
    }
}

#[async_trait]
impl Transport for MockStream {
    async fn open(&mut self) -> HtpResult<()> {
        self.open = true;
        self.opens += 1;
        Ok(())
    }

    async fn close(&mut self) -> HtpResult<()> {
        self.open = false;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
    }
}
