//! MessagePack value model, compact packer and tag-dispatch unpacker.
//!
//! - [`Value`] is the closed set of representable values
//! - [`MsgPackPacker`] turns a value into the smallest wire form that
//!   round-trips it exactly
//! - [`MsgPackUnpacker`] reads values back from any forward-only
//!   [`ByteSource`]
//!
//! Extension types (`fixext*`, `ext8/16/32`) are not supported: there is no
//! `Value` variant for them and their tags fail to unpack.
//!
//! ```
//! use msgpack_codec::{pack, unpack, Value};
//!
//! let value = Value::map([("a", Value::from(vec![1u8, 2]))]);
//! let bytes = pack(&value).unwrap();
//! assert_eq!(bytes, [0x81, 0xa1, b'a', 0x92, 0x01, 0x02]);
//! assert_eq!(unpack(&bytes).unwrap(), value);
//! ```

pub mod constants;
mod error;
mod json;
mod packer;
mod unpacker;
mod value;

pub use error::{MsgPackError, Result};
pub use msgpack_codec_buffers::{ByteSource, IterSource, Reader};
pub use packer::MsgPackPacker;
pub use unpacker::{MsgPackUnpacker, UnpackOptions, DEFAULT_MAX_DEPTH};
pub use value::Value;

/// Encodes a value tree.
pub fn pack(value: &Value) -> Result<Vec<u8>> {
    MsgPackPacker::new().pack(value)
}

/// Encodes anything convertible into a [`Value`].
pub fn pack_any(value: impl Into<Value>) -> Result<Vec<u8>> {
    pack(&value.into())
}

/// Decodes a buffer that holds exactly one value.
pub fn unpack(data: &[u8]) -> Result<Value> {
    MsgPackUnpacker::new().unpack_slice(data)
}

/// Decodes the next value from `source`, leaving the rest unread.
pub fn unpack_from<S: ByteSource + ?Sized>(source: &mut S) -> Result<Value> {
    MsgPackUnpacker::new().unpack(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_integers() {
        assert_eq!(pack(&Value::UInt(5)).unwrap(), [0x05]);
        assert_eq!(pack(&Value::UInt(200)).unwrap(), [0xcc, 0xc8]);
        assert_eq!(pack(&Value::Int(-1)).unwrap(), [0xff]);
        assert_eq!(pack(&Value::Int(-100)).unwrap(), [0xd0, 0x9c]);
    }

    #[test]
    fn pack_accepts_plain_rust_values() {
        assert_eq!(pack_any(5u32).unwrap(), [0x05]);
        assert_eq!(pack_any(-1i32).unwrap(), [0xff]);
        assert_eq!(pack_any("hi").unwrap(), [0xa2, b'h', b'i']);
        assert_eq!(pack_any(Some(true)).unwrap(), [0xc3]);
        assert_eq!(pack_any(()).unwrap(), [0xc0]);
    }

    #[test]
    fn str_tiering_boundary() {
        let s31 = "a".repeat(31);
        let out = pack(&Value::from(s31.as_str())).unwrap();
        assert_eq!(out.len(), 32);
        assert_eq!(out[0], 0xbf);
        assert_eq!(&out[1..], s31.as_bytes());

        let s32 = "a".repeat(32);
        let out = pack(&Value::from(s32.as_str())).unwrap();
        assert_eq!(out.len(), 34);
        assert_eq!(&out[..2], &[0xd9, 0x20]);
        assert_eq!(&out[2..], s32.as_bytes());
    }

    #[test]
    fn array_tiering_boundary() {
        let out = pack(&Value::Array(vec![Value::Nil; 15])).unwrap();
        assert_eq!(out[0], 0x9f);
        assert_eq!(out.len(), 16);

        let out = pack(&Value::Array(vec![Value::Nil; 16])).unwrap();
        assert_eq!(&out[..3], &[0xdc, 0x00, 0x10]);
        assert_eq!(out.len(), 19);
    }

    #[test]
    fn truncated_uint16() {
        assert_eq!(unpack(&[0xcd]), Err(MsgPackError::NotEnoughData));
    }

    #[test]
    fn invalid_utf8_fixstr() {
        assert_eq!(
            unpack(&[0xa1, 0xff]),
            Err(MsgPackError::NonUtf8StringValue(vec![0xff]))
        );
    }

    #[test]
    fn nested_roundtrip_keeps_types() {
        let value = Value::map([(
            "a",
            Value::Array(vec![
                Value::UInt(1),
                Value::UInt(2),
                Value::map([("b", true)]),
            ]),
        )]);
        let bytes = pack(&value).unwrap();
        let back = unpack(&bytes).unwrap();
        assert_eq!(back, value);
        let inner = back.get("a").and_then(Value::as_array).unwrap();
        assert_eq!(inner[0], Value::UInt(1));
        assert_eq!(inner[1], Value::UInt(2));
    }

    #[test]
    fn unassigned_tag_is_unsupported() {
        assert_eq!(unpack(&[0xc1]), Err(MsgPackError::UnsupportedValue(vec![0xc1])));
        assert_eq!(
            unpack(&[0xc1, 0x01, 0x02]),
            Err(MsgPackError::UnsupportedValue(vec![0xc1]))
        );
    }

    #[test]
    fn unpack_from_iterator_source() {
        let bytes = pack(&Value::from(vec!["x", "y"])).unwrap();
        let mut source = IterSource::new(bytes.into_iter().chain([0xc0]));
        assert_eq!(
            unpack_from(&mut source).unwrap(),
            Value::Array(vec![Value::from("x"), Value::from("y")])
        );
        assert_eq!(unpack_from(&mut source).unwrap(), Value::Nil);
        assert_eq!(unpack_from(&mut source), Err(MsgPackError::NotEnoughData));
    }
}
