//! High level client for heat pump controllers
//!
//! The client drives a session over the half duplex serial protocol:
//! connect, log in, read and write parameters, query the fault list and
//! manage time programs. The session state machine lives in
//! [`state`], the command vocabulary in [`commands`] and the answer
//! cross-checks in [`verify`].

pub mod builder;
pub mod client;
pub mod commands;
pub mod state;
pub mod verify;

pub use builder::HtClientBuilder;
pub use client::{HtClient, DEFAULT_LOGIN_RETRIES, DEFAULT_READ_RETRIES};
pub use htpump_core::{HtpError, HtpResult};
pub use state::SessionState;
pub use verify::{VerifyAction, VerifySettings};
