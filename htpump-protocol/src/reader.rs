//! Noise tolerant reading of response frames
//!
//! The serial line occasionally carries stray bytes before a frame, and
//! a response can arrive corrupted. The reader scans for the frame start
//! byte, validates the header against the known variants and verifies the
//! checksum per the header quirks. All corruption is reported as
//! [`HtpError::Frame`] so callers can decide to retry the read.

use log::{trace, warn};

use htpump_core::{FrameErrorKind, HtpError, HtpResult};
use htpump_transport::ByteStream;

use crate::frame::{
    extract_payload, lookup_response_header, response_checksum, Frame, FRAME_START,
    RESPONSE_HEADER_LEN,
};

/// Bytes of leading noise tolerated before the frame start byte.
const MAX_NOISE_BYTES: usize = 256;

/// Upper bound on a payload read in length guessing mode.
const MAX_GUESSED_PAYLOAD: usize = 512;

/// Read one response frame and return its command string.
///
/// Leading noise up to [`MAX_NOISE_BYTES`] is skipped. A payload length of
/// zero switches to length guessing mode where bytes are consumed until
/// the `\r\n` terminator.
///
/// # Errors
///
/// [`HtpError::Frame`] covers every recoverable corruption: unknown
/// headers, checksum mismatches, malformed payloads and streams ending in
/// the middle of a frame. [`HtpError::Timeout`] and
/// [`HtpError::Connection`] pass through from the transport.
pub async fn read_response<S: ByteStream + ?Sized>(stream: &mut S) -> HtpResult<String> {
    let mut header = [0u8; RESPONSE_HEADER_LEN];
    read_header(stream, &mut header).await?;
    let descriptor = lookup_response_header(&header).ok_or_else(|| {
        HtpError::frame(
            FrameErrorKind::BadDelimiter,
            format!("unknown response header {header:02X?}"),
        )
    })?;

    let mut len_byte = [0u8; 1];
    read_all(stream, &mut len_byte).await?;
    let payload = if len_byte[0] == 0 {
        // The device rarely claims a zero length payload; fall back to
        // reading until the terminator and use the observed length.
        warn!("received response with a zero payload length, guessing the actual length");
        read_until_terminator(stream).await?
    } else {
        let mut payload = vec![0u8; len_byte[0] as usize];
        read_all(stream, &mut payload).await?;
        payload
    };

    let mut checksum_byte = [0u8; 1];
    read_all(stream, &mut checksum_byte).await?;
    let expected = response_checksum(descriptor, &payload);
    if checksum_byte[0] != expected {
        return Err(HtpError::frame(
            FrameErrorKind::BadChecksum,
            format!(
                "expected checksum {expected:#04X}, received {:#04X}",
                checksum_byte[0]
            ),
        ));
    }

    let command = extract_payload(&payload)?;
    trace!("received response {command:?}");
    Ok(command)
}

/// Read one response frame and split it into verb and fields.
pub async fn read_frame<S: ByteStream + ?Sized>(stream: &mut S) -> HtpResult<Frame> {
    Ok(Frame::parse(&read_response(stream).await?))
}

/// Scan past noise to the frame start byte and fill the header buffer.
async fn read_header<S: ByteStream + ?Sized>(
    stream: &mut S,
    header: &mut [u8; RESPONSE_HEADER_LEN],
) -> HtpResult<()> {
    let mut byte = [0u8; 1];
    let mut skipped = 0usize;
    loop {
        read_all(stream, &mut byte).await?;
        if byte[0] == FRAME_START {
            break;
        }
        skipped += 1;
        if skipped > MAX_NOISE_BYTES {
            return Err(HtpError::frame(
                FrameErrorKind::BadDelimiter,
                format!("no frame start within {MAX_NOISE_BYTES} bytes"),
            ));
        }
    }
    if skipped > 0 {
        warn!("skipped {skipped} bytes of noise before the frame start");
    }
    header[0] = FRAME_START;
    read_all(stream, &mut header[1..]).await
}

/// Consume bytes until `\r\n` and return them, terminator included.
async fn read_until_terminator<S: ByteStream + ?Sized>(stream: &mut S) -> HtpResult<Vec<u8>> {
    let mut payload = Vec::new();
    let mut byte = [0u8; 1];
    while !payload.ends_with(b"\r\n") {
        if payload.len() >= MAX_GUESSED_PAYLOAD {
            return Err(HtpError::frame(
                FrameErrorKind::BadDelimiter,
                format!("no payload terminator within {MAX_GUESSED_PAYLOAD} bytes"),
            ));
        }
        read_all(stream, &mut byte).await?;
        payload.push(byte[0]);
    }
    Ok(payload)
}

/// `read_exact` with the end of stream mapped to a truncation error.
async fn read_all<S: ByteStream + ?Sized>(stream: &mut S, buf: &mut [u8]) -> HtpResult<()> {
    match stream.read_exact(buf).await {
        Ok(()) => Ok(()),
        Err(HtpError::Connection(err)) if err.kind() == std::io::ErrorKind::UnexpectedEof => {
            Err(HtpError::frame(
                FrameErrorKind::Truncated,
                "stream ended in the middle of a frame",
            ))
        }
        Err(err) => Err(err),
    }
}
