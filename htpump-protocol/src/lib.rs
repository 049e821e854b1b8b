//! Frame codec for the heat pump serial protocol
//!
//! One frame is a delimited, checksummed unit of wire communication:
//! a six byte header, a payload length, the ASCII command wrapped in
//! `~` and `;`, and a trailing checksum byte. This crate builds request
//! frames, parses response frames from a byte stream (tolerating the
//! device's header quirks and out-of-band debug noise) and splits the
//! decoded command into verb and fields.

pub mod checksum;
pub mod frame;
pub mod reader;

pub use checksum::{append_checksum, checksum, verify_checksum};
pub use frame::{
    encode_request, encode_response, Frame, MAX_CMD_LENGTH, REQUEST_HEADER, RESPONSE_HEADER_LEN,
};
pub use htpump_core::{FrameErrorKind, HtpError, HtpResult};
pub use reader::{read_frame, read_response};
