//! Parameter catalog for heat pump controllers
//!
//! The controller addresses its data points by kind and number
//! (`SP,NR=69`), while the driver API works with stable parameter names
//! (`"HKR Soll_Raum"`). This crate owns the mapping: descriptors with
//! kind, number, access rights, data type and value limits, loaded from
//! the built-in CSV definitions or from a site specific file.

pub mod catalog;
pub mod descriptor;
pub mod loader;

pub use catalog::ParameterCatalog;
pub use descriptor::{Access, ParameterDescriptor};
pub use htpump_core::{HtpError, HtpResult};
pub use loader::{load_catalog, parse_catalog};
