//! Binary buffer utilities for msgpack-codec.
//!
//! # Overview
//!
//! - [`Writer`] - Writes binary data to an auto-growing buffer
//! - [`Reader`] - Reads binary data from a byte slice with bounds checking
//! - [`ByteSource`] - Forward-only "next byte or nothing" cursor that decoders consume
//! - [`IterSource`] - Adapts any byte iterator into a [`ByteSource`]
//!
//! # Example
//!
//! ```
//! use msgpack_codec_buffers::{Reader, Writer};
//!
//! // Write some data
//! let mut writer = Writer::new();
//! writer.u8(0x01);
//! writer.u16(0x0203);
//! writer.buf(b"hello");
//! let data = writer.flush();
//!
//! // Read it back
//! let mut reader = Reader::new(&data);
//! assert_eq!(reader.u8(), Ok(0x01));
//! assert_eq!(reader.u16(), Ok(0x0203));
//! assert_eq!(reader.utf8(5), Ok("hello"));
//! assert!(reader.u8().is_err());
//! ```

mod print_octets;
mod reader;
mod source;
mod writer;

pub use print_octets::{print_octets, print_octets_default};
pub use reader::Reader;
pub use source::{ByteSource, IterSource};
pub use writer::Writer;

use thiserror::Error;

/// Error type for buffer operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// Attempted to read past the end of the buffer.
    #[error("end of buffer")]
    EndOfBuffer,
    /// Invalid UTF-8 sequence.
    #[error("invalid UTF-8 sequence")]
    InvalidUtf8,
}
