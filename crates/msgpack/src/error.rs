//! Error type shared by the packer and the unpacker.

use msgpack_codec_buffers::{print_octets, BufferError};
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MsgPackError>;

/// Failure of a pack or unpack call.
///
/// Every variant is an ordinary value for the caller to act on: a
/// [`MsgPackError::NotEnoughData`] from a truncated buffer, for example, can
/// be retried once more bytes have arrived.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MsgPackError {
    /// The input ended before a fixed-width field or declared payload was complete.
    #[error("not enough data")]
    NotEnoughData,
    /// Unknown or unexpected tag byte; carries the offending bytes.
    #[error("unsupported value: {}", print_octets(.0, 16))]
    UnsupportedValue(Vec<u8>),
    /// String payload is not valid UTF-8; carries the raw payload.
    #[error("string is not valid UTF-8: {}", print_octets(.0, 16))]
    NonUtf8StringValue(Vec<u8>),
    /// Length or element count does not fit a 32-bit length prefix.
    #[error("value too long: {0} exceeds the 32-bit length prefix")]
    ValueTooLong(usize),
}

impl From<BufferError> for MsgPackError {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::EndOfBuffer => MsgPackError::NotEnoughData,
            BufferError::InvalidUtf8 => MsgPackError::NonUtf8StringValue(Vec::new()),
        }
    }
}
