//! Core types for the htpump heat pump driver
//!
//! This crate provides the error taxonomy, typed parameter values, the
//! device's date/time wire format, fault-list entries and the time program
//! model used throughout the htpump workspace.

pub mod datetime;
pub mod error;
pub mod fault;
pub mod timeprog;
pub mod value;

pub use datetime::{format_wire_date, format_wire_time, parse_wire_date_time, parse_wire_datetime};
pub use error::{FrameErrorKind, HtpError, HtpResult};
pub use fault::FaultEntry;
pub use timeprog::{TimeProgPeriod, TimeProgram, MINUTES_PER_DAY};
pub use value::{DataPointKind, DataType, Value};
