//! Client builder
//!
//! Collects transport, catalog and session settings before creating an
//! [`HtClient`]:
//!
//! ```rust,no_run
//! use htpump_client::HtClientBuilder;
//!
//! # fn main() -> htpump_client::HtpResult<()> {
//! let client = HtClientBuilder::new("/dev/ttyUSB0")
//!     .baud_rate(19200)
//!     .login_retries(3)
//!     .build()?;
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use std::time::Duration;

use htpump_catalog::{load_catalog, ParameterCatalog};
use htpump_core::HtpResult;
use htpump_transport::{SerialSettings, SerialTransport, Transport, DEFAULT_BAUD_RATE, DEFAULT_TIMEOUT};

use crate::client::{HtClient, DEFAULT_LOGIN_RETRIES, DEFAULT_READ_RETRIES};
use crate::verify::VerifySettings;

/// Builder for [`HtClient`] instances
#[derive(Debug, Clone)]
pub struct HtClientBuilder {
    device: String,
    baud_rate: u32,
    timeout: Duration,
    login_retries: u32,
    read_retries: u32,
    catalog_file: Option<PathBuf>,
    catalog: Option<ParameterCatalog>,
    verify: Option<VerifySettings>,
}

impl HtClientBuilder {
    /// Start a builder for the given serial device.
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            baud_rate: DEFAULT_BAUD_RATE,
            timeout: DEFAULT_TIMEOUT,
            login_retries: DEFAULT_LOGIN_RETRIES,
            read_retries: DEFAULT_READ_RETRIES,
            catalog_file: None,
            catalog: None,
            verify: None,
        }
    }

    pub fn baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    /// Per-read timeout of the serial connection.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn login_retries(mut self, retries: u32) -> Self {
        self.login_retries = retries;
        self
    }

    pub fn read_retries(mut self, retries: u32) -> Self {
        self.read_retries = retries;
        self
    }

    /// Use a prebuilt catalog instead of the built-in definitions.
    pub fn catalog(mut self, catalog: ParameterCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Load the catalog from a site specific CSV file.
    ///
    /// A catalog set with [`catalog`](Self::catalog) takes precedence.
    pub fn catalog_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog_file = Some(path.into());
        self
    }

    pub fn verify_settings(mut self, settings: VerifySettings) -> Self {
        self.verify = Some(settings);
        self
    }

    /// Build a client over a serial transport.
    ///
    /// The connection is not opened yet.
    pub fn build(self) -> HtpResult<HtClient<SerialTransport>> {
        let settings =
            SerialSettings::with_baud_and_timeout(&self.device, self.baud_rate, self.timeout);
        let transport = SerialTransport::new(settings);
        self.build_with(transport)
    }

    /// Build a client over a caller supplied transport.
    pub fn build_with<T: Transport>(self, transport: T) -> HtpResult<HtClient<T>> {
        let catalog = match self.catalog {
            Some(catalog) => catalog,
            None => load_catalog(self.catalog_file.as_deref())?,
        };
        let mut client = HtClient::with_catalog(transport, catalog);
        client.set_login_retries(self.login_retries);
        client.set_read_retries(self.read_retries);
        if let Some(verify) = self.verify {
            client.set_verify_settings(verify);
        }
        Ok(client)
    }
}
