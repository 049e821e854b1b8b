//! Transport layer for the htpump heat pump driver
//!
//! This crate provides the byte-stream abstraction the protocol engine
//! talks to, the serial port implementation used against real hardware and
//! a scripted in-memory stream for tests and device simulators.

pub mod mock;
pub mod serial;
pub mod stream;

pub use htpump_core::{HtpError, HtpResult};
pub use mock::MockStream;
pub use serial::{SerialSettings, SerialTransport, DEFAULT_BAUD_RATE, DEFAULT_TIMEOUT};
pub use stream::{ByteStream, Transport};
