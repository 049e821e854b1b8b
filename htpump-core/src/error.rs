use std::fmt;

use thiserror::Error;

use crate::value::{DataPointKind, DataType, Value};

/// Classification of a malformed wire frame.
///
/// Frame errors are transient by convention: the engine discards the broken
/// frame and retries the read, up to a bound, before giving up with
/// [`HtpError::NoResponse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameErrorKind {
    /// The received checksum does not match the computed one.
    BadChecksum,
    /// Start marker, response header or payload delimiters are wrong.
    BadDelimiter,
    /// The stream ended in the middle of a frame.
    Truncated,
}

impl fmt::Display for FrameErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FrameErrorKind::BadChecksum => "bad checksum",
            FrameErrorKind::BadDelimiter => "bad delimiter",
            FrameErrorKind::Truncated => "truncated",
        };
        f.write_str(s)
    }
}

/// Main error type of the htpump workspace
#[derive(Error, Debug)]
pub enum HtpError {
    #[error("connection error: {0}")]
    Connection(#[from] std::io::Error),

    #[error("read timed out")]
    Timeout,

    #[error("malformed frame ({kind}): {detail}")]
    Frame {
        kind: FrameErrorKind,
        detail: String,
    },

    #[error("no valid response after {attempts} read attempt(s)")]
    NoResponse { attempts: u32 },

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("serial connection not open")]
    NotConnected,

    #[error("not logged in")]
    NotLoggedIn,

    #[error("unknown parameter {0:?}")]
    UnknownParameter(String),

    #[error("parameter {param:?}: expected a {expected} value, got a {actual} value")]
    TypeMismatch {
        param: String,
        expected: DataType,
        actual: DataType,
    },

    #[error("parameter {param:?}: value {value} is beyond the limits [{min}, {max}]")]
    OutOfRange {
        param: String,
        value: Value,
        min: Value,
        max: Value,
    },

    #[error("parameter {param:?}: device answered {observed} instead of {requested}")]
    SetParamRejected {
        param: String,
        requested: Value,
        observed: Value,
    },

    #[error("verification failed: {0}")]
    Verification(String),

    #[error("invalid time program: {0}")]
    InvalidSchedule(String),

    #[error("parameter {param:?} is a {kind} data point; fast query supports only MP data points")]
    UnsupportedKind {
        param: String,
        kind: DataPointKind,
    },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("catalog format error: {0}")]
    CatalogFormat(String),
}

impl HtpError {
    /// Build a frame error with the given kind and detail message.
    pub fn frame(kind: FrameErrorKind, detail: impl Into<String>) -> Self {
        HtpError::Frame {
            kind,
            detail: detail.into(),
        }
    }

    /// Whether this error is a transient frame error worth a read retry.
    pub fn is_frame_error(&self) -> bool {
        matches!(self, HtpError::Frame { .. })
    }
}

/// Result type alias for htpump operations
pub type HtpResult<T> = Result<T, HtpError>;
