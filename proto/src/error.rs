use thiserror::Error;

/// Failure to decode a wire value (path, token or state blob).
///
/// Decoding is total: any input string or byte sequence maps to either a
/// value or one of these variants. Nothing in this crate panics on
/// malformed input.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("invalid length")]
    InvalidLength,

    #[error("invalid path segment: {0:?}")]
    InvalidSegment(String),

    #[error("unsupported blob version: {0}")]
    BadVersion(u8),

    #[error("invalid format: {0}")]
    InvalidFormat(&'static str),

    #[error("bincode: {0}")]
    Bincode(#[from] bincode::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
