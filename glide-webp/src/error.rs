//! Decode failures

use std::fmt;

pub type Result<T, E = DecodeError> = std::result::Result<T, E>;

/// Why a scaled decode produced no bitmap.
///
/// Every variant is terminal for the call that produced it. A decode that succeeds without
/// producing pixels is not an error, see [`crate::decode_scaled`].
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("GetFeatures: {0}")]
    Probe(StatusCode),

    #[error("Init decoder config")]
    Init,

    #[error("WebPDecode: {0}")]
    Decode(StatusCode),

    #[error("Bitmap")]
    Bitmap(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl DecodeError {
    pub fn bitmap(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        DecodeError::Bitmap(err.into())
    }
}

/// Non-OK libwebp `VP8StatusCode`s.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StatusCode {
    OutOfMemory,
    InvalidParam,
    BitstreamError,
    UnsupportedFeature,
    Suspended,
    UserAbort,
    NotEnoughData,
    Unknown(i32),
}

impl StatusCode {
    /// Map a raw `VP8StatusCode` value. `0` is `VP8_STATUS_OK` and maps to `Ok`.
    pub fn check(raw: i32) -> Result<(), StatusCode> {
        let status = match raw {
            0 => return Ok(()),
            1 => StatusCode::OutOfMemory,
            2 => StatusCode::InvalidParam,
            3 => StatusCode::BitstreamError,
            4 => StatusCode::UnsupportedFeature,
            5 => StatusCode::Suspended,
            6 => StatusCode::UserAbort,
            7 => StatusCode::NotEnoughData,
            other => StatusCode::Unknown(other),
        };
        Err(status)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StatusCode::OutOfMemory => f.write_str("out of memory"),
            StatusCode::InvalidParam => f.write_str("invalid parameter"),
            StatusCode::BitstreamError => f.write_str("bitstream error"),
            StatusCode::UnsupportedFeature => f.write_str("unsupported feature"),
            StatusCode::Suspended => f.write_str("suspended"),
            StatusCode::UserAbort => f.write_str("user abort"),
            StatusCode::NotEnoughData => f.write_str("not enough data"),
            StatusCode::Unknown(raw) => write!(f, "unknown status {raw}"),
        }
    }
}
