//! Serial port transport implementation

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_serial::{ClearBuffer, SerialPort, SerialStream};

use htpump_core::{HtpError, HtpResult};

use crate::stream::{ByteStream, Transport};

/// Default read timeout; the heat pump usually answers well within it.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default baud rate of the heat pump's service interface.
pub const DEFAULT_BAUD_RATE: u32 = 115200;

/// Wrapper for SerialStream that implements Debug
struct DebugSerialStream(SerialStream);

impl fmt::Debug for DebugSerialStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerialStream").finish()
    }
}

impl Deref for DebugSerialStream {
    type Target = SerialStream;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for DebugSerialStream {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// Serial port settings
///
/// The defaults match the heat pump's service interface: 115200 baud,
/// 8 data bits, no parity, one stop bit, software flow control on.
#[derive(Debug, Clone)]
pub struct SerialSettings {
    pub device: String,
    pub baud_rate: u32,
    pub data_bits: tokio_serial::DataBits,
    pub stop_bits: tokio_serial::StopBits,
    pub parity: tokio_serial::Parity,
    pub flow_control: tokio_serial::FlowControl,
    pub timeout: Option<Duration>,
}

impl SerialSettings {
    /// Create settings for the given device with the default parameters.
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            baud_rate: DEFAULT_BAUD_RATE,
            data_bits: tokio_serial::DataBits::Eight,
            stop_bits: tokio_serial::StopBits::One,
            parity: tokio_serial::Parity::None,
            flow_control: tokio_serial::FlowControl::Software,
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }

    /// Create settings with an explicit baud rate and read timeout.
    pub fn with_baud_and_timeout(
        device: impl Into<String>,
        baud_rate: u32,
        timeout: Duration,
    ) -> Self {
        Self {
            baud_rate,
            timeout: Some(timeout),
            ..Self::new(device)
        }
    }
}

/// Serial port transport to the heat pump
#[derive(Debug)]
pub struct SerialTransport {
    stream: Option<DebugSerialStream>,
    settings: SerialSettings,
    timeout: Option<Duration>,
}

impl SerialTransport {
    /// Create a closed transport with the given settings.
    pub fn new(settings: SerialSettings) -> Self {
        let timeout = settings.timeout;
        Self {
            stream: None,
            settings,
            timeout,
        }
    }

    /// Create a closed transport for a device with default settings.
    pub fn for_device(device: impl Into<String>) -> Self {
        Self::new(SerialSettings::new(device))
    }

    /// The settings this transport opens the port with.
    pub fn settings(&self) -> &SerialSettings {
        &self.settings
    }

    fn stream_mut(&mut self) -> HtpResult<&mut SerialStream> {
        self.stream
            .as_mut()
            .map(|s| &mut s.0)
            .ok_or(HtpError::NotConnected)
    }
}

#[async_trait]
impl Transport for SerialTransport {
    async fn open(&mut self) -> HtpResult<()> {
        if self.stream.is_some() {
            return Err(HtpError::Connection(std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                "serial connection already open",
            )));
        }

        let builder = tokio_serial::new(&self.settings.device, self.settings.baud_rate)
            .data_bits(self.settings.data_bits)
            .stop_bits(self.settings.stop_bits)
            .parity(self.settings.parity)
            .flow_control(self.settings.flow_control);

        let stream = SerialStream::open(&builder).map_err(|e| {
            HtpError::Connection(std::io::Error::other(format!(
                "failed to open serial port {}: {e}",
                self.settings.device
            )))
        })?;
        log::info!(
            "opened serial port {} ({} baud)",
            self.settings.device,
            self.settings.baud_rate
        );

        self.stream = Some(DebugSerialStream(stream));
        Ok(())
    }

    async fn close(&mut self) -> HtpResult<()> {
        if self.stream.take().is_some() {
            log::info!("closed serial port {}", self.settings.device);
            // reopening the port immediately after a close is unreliable
            // on some USB adapters, give the driver a moment
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.stream.is_some()
    }
}

#[async_trait]
impl ByteStream for SerialTransport {
    async fn set_timeout(&mut self, timeout: Option<Duration>) -> HtpResult<()> {
        self.timeout = timeout;
        Ok(())
    }

    async fn read(&mut self, buf: &mut [u8]) -> HtpResult<usize> {
        let timeout = self.timeout;
        let stream = self.stream_mut()?;
        match timeout {
            Some(t) => tokio::time::timeout(t, stream.read(buf))
                .await
                .map_err(|_| HtpError::Timeout)?
                .map_err(HtpError::Connection),
            None => stream.read(buf).await.map_err(HtpError::Connection),
        }
    }

    async fn write(&mut self, buf: &[u8]) -> HtpResult<usize> {
        let stream = self.stream_mut()?;
        stream.write(buf).await.map_err(HtpError::Connection)
    }

    async fn flush(&mut self) -> HtpResult<()> {
        let stream = self.stream_mut()?;
        stream.flush().await.map_err(HtpError::Connection)
    }

    async fn purge(&mut self) -> HtpResult<()> {
        if let Some(stream) = self.stream.as_ref() {
            stream
                .clear(ClearBuffer::All)
                .map_err(|e| HtpError::Connection(std::io::Error::other(e)))?;
        }
        Ok(())
    }
}
