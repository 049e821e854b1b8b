//! htpump - driver for Heliotherm heat pump controllers
//!
//! This library talks to the service interface of Heliotherm heat pumps
//! over a serial line: login, parameter reads and writes, fault list
//! queries, clock access and time program management.
//!
//! # Architecture
//!
//! The library is organized as a workspace with multiple crates:
//!
//! - `htpump-core`: error taxonomy, typed values, fault entries and the
//!   time program model
//! - `htpump-transport`: byte stream traits, the serial transport and a
//!   scripted mock stream for tests
//! - `htpump-protocol`: request/response frame codec with checksums and
//!   the device's header quirks
//! - `htpump-catalog`: named parameter descriptors loaded from CSV
//! - `htpump-client`: the session client tying everything together
//!
//! # Usage
//!
//! ```no_run
//! use htpump::client::HtClientBuilder;
//!
//! # async fn run() -> htpump::HtpResult<()> {
//! let mut hp = HtClientBuilder::new("/dev/ttyUSB0").build()?;
//! hp.open_connection().await?;
//! hp.login(false).await?;
//! let temp = hp.get_param("Temp. Aussen").await?;
//! println!("outdoor temperature: {temp}");
//! hp.logout().await;
//! hp.close_connection().await;
//! # Ok(())
//! # }
//! ```

// Re-export core types
pub use htpump_core::{
    DataPointKind, DataType, FaultEntry, HtpError, HtpResult, TimeProgPeriod, TimeProgram, Value,
};

// Re-export client API
pub mod client {
    pub use htpump_client::*;
}

// Re-export the parameter catalog
pub mod catalog {
    pub use htpump_catalog::*;
}

// Re-export the frame codec
pub mod protocol {
    pub use htpump_protocol::*;
}

// Re-export transport types
pub mod transport {
    pub use htpump_transport::*;
}
