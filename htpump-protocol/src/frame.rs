//! Frame construction and payload parsing

use bytes::Bytes;
use once_cell::sync::Lazy;
use regex::Regex;

use htpump_core::{FrameErrorKind, HtpError, HtpResult};

use crate::checksum::{append_checksum, checksum};

/// Maximum length of a command string: 255 minus the `~` and `;` wrapper.
pub const MAX_CMD_LENGTH: usize = 253;

/// Header of every request frame sent to the device.
pub const REQUEST_HEADER: [u8; 6] = [0x02, 0xFD, 0xD0, 0xE0, 0x00, 0x00];

/// Length of a response header.
pub const RESPONSE_HEADER_LEN: usize = 6;

/// First byte of every frame; the reader scans for it to resynchronize.
pub const FRAME_START: u8 = 0x02;

/// A known response header together with its decoding quirks
///
/// The device is not consistent about its response headers. Depending on
/// the header, the payload length must be corrected before the checksum
/// computation, and two header variants carry a fixed `0x00` checksum
/// regardless of content. All variants below were observed on real
/// hardware (HP08S10W-WEB / HP10S12W-WEB).
#[derive(Debug, Clone, Copy)]
pub struct ResponseHeader {
    pub bytes: [u8; 6],
    /// Added to the payload length for the checksum computation.
    pub len_correction: i16,
    /// The device sends checksum `0x00` for this header, always.
    pub zero_checksum: bool,
}

/// The response headers the device is known to emit.
pub const RESPONSE_HEADERS: [ResponseHeader; 5] = [
    ResponseHeader {
        bytes: [0x02, 0xFD, 0xE0, 0xD0, 0x00, 0x00],
        len_correction: 0,
        zero_checksum: false,
    },
    // some fast query answers
    ResponseHeader {
        bytes: [0x02, 0xFD, 0xE0, 0xD0, 0x01, 0x00],
        len_correction: -1,
        zero_checksum: false,
    },
    // error messages (e.g. "ERR,INVALID IDX") and some fast query answers
    ResponseHeader {
        bytes: [0x02, 0xFD, 0xE0, 0xD0, 0x02, 0x00],
        len_correction: -2,
        zero_checksum: false,
    },
    // parameter answers with an ignored checksum
    ResponseHeader {
        bytes: [0x02, 0xFD, 0xE0, 0xD0, 0x04, 0x00],
        len_correction: 0,
        zero_checksum: true,
    },
    ResponseHeader {
        bytes: [0x02, 0xFD, 0xE0, 0xD0, 0x08, 0x00],
        len_correction: 0,
        zero_checksum: true,
    },
];

/// Look up the decoding quirks for a received response header.
pub fn lookup_response_header(header: &[u8]) -> Option<&'static ResponseHeader> {
    RESPONSE_HEADERS.iter().find(|h| h.bytes == header)
}

static PAYLOAD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^~([^;]*);\r\n$").expect("static pattern"));

/// One decoded frame: a verb and its comma separated fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    verb: String,
    fields: Vec<String>,
}

impl Frame {
    /// Build a frame from a verb and its fields.
    pub fn new(verb: impl Into<String>, fields: Vec<String>) -> Self {
        Self {
            verb: verb.into(),
            fields,
        }
    }

    /// Split a command string on the field separator.
    ///
    /// The first field is the verb; a command without separator is a bare
    /// verb.
    pub fn parse(command: &str) -> Self {
        let mut parts = command.split(',').map(str::to_string);
        let verb = parts.next().unwrap_or_default();
        Self {
            verb,
            fields: parts.collect(),
        }
    }

    pub fn verb(&self) -> &str {
        &self.verb
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    /// Rebuild the command string this frame was parsed from.
    pub fn command(&self) -> String {
        if self.fields.is_empty() {
            self.verb.clone()
        } else {
            let mut cmd = self.verb.clone();
            for field in &self.fields {
                cmd.push(',');
                cmd.push_str(field);
            }
            cmd
        }
    }
}

/// Encode a command into a request frame ready to be written.
pub fn encode_request(command: &str) -> HtpResult<Bytes> {
    if command.len() > MAX_CMD_LENGTH {
        return Err(HtpError::InvalidData(format!(
            "command is {} characters long, at most {MAX_CMD_LENGTH} are allowed",
            command.len()
        )));
    }
    if !command.is_ascii() {
        return Err(HtpError::InvalidData(format!(
            "command {command:?} contains non-ASCII characters"
        )));
    }
    let mut buf = Vec::with_capacity(REQUEST_HEADER.len() + command.len() + 4);
    buf.extend_from_slice(&REQUEST_HEADER);
    buf.push((command.len() + 2) as u8);
    buf.push(b'~');
    buf.extend_from_slice(command.as_bytes());
    buf.push(b';');
    append_checksum(&mut buf);
    Ok(Bytes::from(buf))
}

/// Encode a command the way the device frames its answers.
///
/// Uses the regular response header with a computed checksum. Real
/// hardware is the authority on the quirk variants; this encoder exists
/// for device simulators and tests.
pub fn encode_response(command: &str) -> Bytes {
    let mut buf = Vec::with_capacity(RESPONSE_HEADER_LEN + command.len() + 6);
    buf.extend_from_slice(&RESPONSE_HEADERS[0].bytes);
    buf.push((command.len() + 4) as u8);
    buf.push(b'~');
    buf.extend_from_slice(command.as_bytes());
    buf.extend_from_slice(b";\r\n");
    append_checksum(&mut buf);
    Bytes::from(buf)
}

/// Extract the command string from a response payload.
///
/// The payload of a response carries `~<command>;\r\n`; anything else is a
/// delimiter error.
pub fn extract_payload(payload: &[u8]) -> HtpResult<String> {
    let text = std::str::from_utf8(payload).map_err(|_| {
        HtpError::frame(
            FrameErrorKind::BadDelimiter,
            format!("payload is not ASCII: {payload:02X?}"),
        )
    })?;
    let captures = PAYLOAD_RE.captures(text).ok_or_else(|| {
        HtpError::frame(
            FrameErrorKind::BadDelimiter,
            format!("payload {text:?} is not wrapped in '~' and ';'"),
        )
    })?;
    Ok(captures[1].to_string())
}

/// Compute the expected checksum of a response per its header quirks.
pub(crate) fn response_checksum(header: &ResponseHeader, payload: &[u8]) -> u8 {
    if header.zero_checksum {
        return 0x00;
    }
    let corrected_len = (payload.len() as i16 + header.len_correction) as u8;
    let mut buf = Vec::with_capacity(RESPONSE_HEADER_LEN + 1 + payload.len());
    buf.extend_from_slice(&header.bytes);
    buf.push(corrected_len);
    buf.extend_from_slice(payload);
    checksum(&buf)
}
