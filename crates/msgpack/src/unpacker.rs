//! Tag-dispatch MessagePack decoder.
//!
//! Decoding reads one tag byte from a forward-only [`ByteSource`], dispatches
//! on its range and recurses for container elements. The source is never
//! rewound, so anything that yields bytes in order can drive it.

use msgpack_codec_buffers::{ByteSource, Reader};

use crate::constants::*;
use crate::error::{MsgPackError, Result};
use crate::Value;

/// Default limit on nested arrays/maps.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Upper bound on container pre-allocation taken from an untrusted count prefix.
const PREALLOC_LIMIT: usize = 4096;

/// Unpacker configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnpackOptions {
    /// How many arrays/maps may be nested inside each other. `0` rejects
    /// every container.
    pub max_depth: usize,
}

impl Default for UnpackOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl UnpackOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// MessagePack decoder.
///
/// Besides [`MsgPackUnpacker::unpack`], which decodes whatever value comes
/// next, the `read_*` methods decode one expected family and fail with
/// [`MsgPackError::UnsupportedValue`] when the tag byte says otherwise.
#[derive(Debug, Clone, Default)]
pub struct MsgPackUnpacker {
    options: UnpackOptions,
}

impl MsgPackUnpacker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: UnpackOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &UnpackOptions {
        &self.options
    }

    /// Decodes the next value, leaving `source` just past its last byte.
    pub fn unpack<S: ByteSource + ?Sized>(&mut self, source: &mut S) -> Result<Value> {
        self.read_any(source, 0)
    }

    /// Decodes a buffer holding exactly one value.
    ///
    /// Bytes left over after the value are reported as
    /// [`MsgPackError::UnsupportedValue`].
    pub fn unpack_slice(&mut self, data: &[u8]) -> Result<Value> {
        let mut reader = Reader::new(data);
        let value = self.unpack(&mut reader)?;
        if reader.size() > 0 {
            tracing::debug!(trailing = reader.size(), "trailing bytes after value");
            let rest = reader.buf(reader.size())?;
            return Err(MsgPackError::UnsupportedValue(rest.to_vec()));
        }
        Ok(value)
    }

    fn read_any<S: ByteSource + ?Sized>(&mut self, source: &mut S, depth: usize) -> Result<Value> {
        let tag = next(source)?;
        match tag {
            0x00..=POSITIVE_FIXINT_MAX => Ok(Value::UInt(u64::from(tag))),
            FIXMAP..=FIXMAP_END | MAP16 | MAP32 => {
                let count = map_len(tag, source)?;
                self.read_map_body(source, count, tag, depth)
            }
            FIXARRAY..=FIXARRAY_END | ARRAY16 | ARRAY32 => {
                let count = array_len(tag, source)?;
                self.read_array_body(source, count, tag, depth)
            }
            FIXSTR..=FIXSTR_END | STR8 | STR16 | STR32 => {
                let length = str_len(tag, source)?;
                read_utf8(source, length).map(Value::String)
            }
            NIL => Ok(Value::Nil),
            FALSE => Ok(Value::Bool(false)),
            TRUE => Ok(Value::Bool(true)),
            BIN8 | BIN16 | BIN32 => {
                let length = bin_len(tag, source)?;
                take(source, length).map(Value::Binary)
            }
            FLOAT32 => Ok(Value::Float32(f32::from_be_bytes(take_array(source)?))),
            FLOAT64 => Ok(Value::Float64(f64::from_be_bytes(take_array(source)?))),
            UINT8 => Ok(Value::UInt(u64::from(next(source)?))),
            UINT16 => Ok(Value::UInt(u64::from(u16::from_be_bytes(take_array(source)?)))),
            UINT32 => Ok(Value::UInt(u64::from(u32::from_be_bytes(take_array(source)?)))),
            UINT64 => Ok(Value::UInt(u64::from_be_bytes(take_array(source)?))),
            INT8 => Ok(Value::Int(i64::from(next(source)? as i8))),
            INT16 => Ok(Value::Int(i64::from(i16::from_be_bytes(take_array(source)?)))),
            INT32 => Ok(Value::Int(i64::from(i32::from_be_bytes(take_array(source)?)))),
            INT64 => Ok(Value::Int(i64::from_be_bytes(take_array(source)?))),
            NEGATIVE_FIXINT..=0xff => Ok(Value::Int(i64::from(tag as i8))),
            _ => Err(unsupported(tag)),
        }
    }

    fn enter(&self, tag: u8, depth: usize) -> Result<()> {
        if depth >= self.options.max_depth {
            tracing::debug!(
                tag,
                max_depth = self.options.max_depth,
                "container nesting limit reached"
            );
            return Err(MsgPackError::UnsupportedValue(vec![tag]));
        }
        Ok(())
    }

    fn read_array_body<S: ByteSource + ?Sized>(
        &mut self,
        source: &mut S,
        count: usize,
        tag: u8,
        depth: usize,
    ) -> Result<Value> {
        self.enter(tag, depth)?;
        let mut items = Vec::with_capacity(prealloc(count, 1, source));
        for _ in 0..count {
            items.push(self.read_any(source, depth + 1)?);
        }
        Ok(Value::Array(items))
    }

    fn read_map_body<S: ByteSource + ?Sized>(
        &mut self,
        source: &mut S,
        count: usize,
        tag: u8,
        depth: usize,
    ) -> Result<Value> {
        self.enter(tag, depth)?;
        let mut entries = Vec::with_capacity(prealloc(count, 2, source));
        for _ in 0..count {
            let key = self.read_any(source, depth + 1)?;
            let value = self.read_any(source, depth + 1)?;
            entries.push((key, value));
        }
        Ok(Value::Map(entries))
    }

    // --- Typed single-family reads ---

    pub fn read_nil<S: ByteSource + ?Sized>(&mut self, source: &mut S) -> Result<()> {
        expect(source, NIL)
    }

    pub fn read_bool<S: ByteSource + ?Sized>(&mut self, source: &mut S) -> Result<bool> {
        match next(source)? {
            TRUE => Ok(true),
            FALSE => Ok(false),
            tag => Err(unsupported(tag)),
        }
    }

    /// Accepts a positive fixint or `uint8`.
    pub fn read_u8<S: ByteSource + ?Sized>(&mut self, source: &mut S) -> Result<u8> {
        match next(source)? {
            tag @ 0x00..=POSITIVE_FIXINT_MAX => Ok(tag),
            UINT8 => next(source),
            tag => Err(unsupported(tag)),
        }
    }

    pub fn read_u16<S: ByteSource + ?Sized>(&mut self, source: &mut S) -> Result<u16> {
        expect(source, UINT16)?;
        take_array(source).map(u16::from_be_bytes)
    }

    pub fn read_u32<S: ByteSource + ?Sized>(&mut self, source: &mut S) -> Result<u32> {
        expect(source, UINT32)?;
        take_array(source).map(u32::from_be_bytes)
    }

    pub fn read_u64<S: ByteSource + ?Sized>(&mut self, source: &mut S) -> Result<u64> {
        expect(source, UINT64)?;
        take_array(source).map(u64::from_be_bytes)
    }

    /// Accepts a negative fixint or `int8`.
    pub fn read_i8<S: ByteSource + ?Sized>(&mut self, source: &mut S) -> Result<i8> {
        match next(source)? {
            tag @ NEGATIVE_FIXINT..=0xff => Ok(tag as i8),
            INT8 => next(source).map(|b| b as i8),
            tag => Err(unsupported(tag)),
        }
    }

    pub fn read_i16<S: ByteSource + ?Sized>(&mut self, source: &mut S) -> Result<i16> {
        expect(source, INT16)?;
        take_array(source).map(i16::from_be_bytes)
    }

    pub fn read_i32<S: ByteSource + ?Sized>(&mut self, source: &mut S) -> Result<i32> {
        expect(source, INT32)?;
        take_array(source).map(i32::from_be_bytes)
    }

    pub fn read_i64<S: ByteSource + ?Sized>(&mut self, source: &mut S) -> Result<i64> {
        expect(source, INT64)?;
        take_array(source).map(i64::from_be_bytes)
    }

    pub fn read_f32<S: ByteSource + ?Sized>(&mut self, source: &mut S) -> Result<f32> {
        expect(source, FLOAT32)?;
        take_array(source).map(f32::from_be_bytes)
    }

    pub fn read_f64<S: ByteSource + ?Sized>(&mut self, source: &mut S) -> Result<f64> {
        expect(source, FLOAT64)?;
        take_array(source).map(f64::from_be_bytes)
    }

    pub fn read_str<S: ByteSource + ?Sized>(&mut self, source: &mut S) -> Result<String> {
        let tag = next(source)?;
        let length = str_len(tag, source)?;
        read_utf8(source, length)
    }

    pub fn read_bin<S: ByteSource + ?Sized>(&mut self, source: &mut S) -> Result<Vec<u8>> {
        let tag = next(source)?;
        let length = bin_len(tag, source)?;
        take(source, length)
    }

    /// Reads an array header; the elements follow in the source.
    pub fn read_array_len<S: ByteSource + ?Sized>(&mut self, source: &mut S) -> Result<usize> {
        let tag = next(source)?;
        array_len(tag, source)
    }

    /// Reads a map header; `len` key/value pairs follow in the source.
    pub fn read_map_len<S: ByteSource + ?Sized>(&mut self, source: &mut S) -> Result<usize> {
        let tag = next(source)?;
        map_len(tag, source)
    }
}

fn unsupported(tag: u8) -> MsgPackError {
    tracing::debug!(tag, "unsupported tag byte");
    MsgPackError::UnsupportedValue(vec![tag])
}

#[inline]
fn next<S: ByteSource + ?Sized>(source: &mut S) -> Result<u8> {
    source.next_byte().ok_or(MsgPackError::NotEnoughData)
}

fn expect<S: ByteSource + ?Sized>(source: &mut S, expected: u8) -> Result<()> {
    match next(source)? {
        tag if tag == expected => Ok(()),
        tag => Err(unsupported(tag)),
    }
}

#[inline]
fn take_array<const N: usize, S: ByteSource + ?Sized>(source: &mut S) -> Result<[u8; N]> {
    let mut out = [0u8; N];
    for byte in out.iter_mut() {
        *byte = next(source)?;
    }
    Ok(out)
}

fn take<S: ByteSource + ?Sized>(source: &mut S, length: usize) -> Result<Vec<u8>> {
    source.take_bytes(length).ok_or(MsgPackError::NotEnoughData)
}

fn read_utf8<S: ByteSource + ?Sized>(source: &mut S, length: usize) -> Result<String> {
    let bytes = take(source, length)?;
    String::from_utf8(bytes).map_err(|err| MsgPackError::NonUtf8StringValue(err.into_bytes()))
}

fn len8<S: ByteSource + ?Sized>(source: &mut S) -> Result<usize> {
    next(source).map(usize::from)
}

fn len16<S: ByteSource + ?Sized>(source: &mut S) -> Result<usize> {
    take_array(source).map(|b| usize::from(u16::from_be_bytes(b)))
}

fn len32<S: ByteSource + ?Sized>(source: &mut S) -> Result<usize> {
    let len = u32::from_be_bytes(take_array(source)?);
    usize::try_from(len).map_err(|_| MsgPackError::ValueTooLong(len as usize))
}

fn str_len<S: ByteSource + ?Sized>(tag: u8, source: &mut S) -> Result<usize> {
    match tag {
        FIXSTR..=FIXSTR_END => Ok(usize::from(tag & 0x1f)),
        STR8 => len8(source),
        STR16 => len16(source),
        STR32 => len32(source),
        _ => Err(unsupported(tag)),
    }
}

fn bin_len<S: ByteSource + ?Sized>(tag: u8, source: &mut S) -> Result<usize> {
    match tag {
        BIN8 => len8(source),
        BIN16 => len16(source),
        BIN32 => len32(source),
        _ => Err(unsupported(tag)),
    }
}

fn array_len<S: ByteSource + ?Sized>(tag: u8, source: &mut S) -> Result<usize> {
    match tag {
        FIXARRAY..=FIXARRAY_END => Ok(usize::from(tag & 0x0f)),
        ARRAY16 => len16(source),
        ARRAY32 => len32(source),
        _ => Err(unsupported(tag)),
    }
}

fn map_len<S: ByteSource + ?Sized>(tag: u8, source: &mut S) -> Result<usize> {
    match tag {
        FIXMAP..=FIXMAP_END => Ok(usize::from(tag & 0x0f)),
        MAP16 => len16(source),
        MAP32 => len32(source),
        _ => Err(unsupported(tag)),
    }
}

/// Capacity for `count` items of at least `min_item_size` bytes each.
fn prealloc<S: ByteSource + ?Sized>(count: usize, min_item_size: usize, source: &S) -> usize {
    let fits = source
        .remaining_hint()
        .map_or(usize::MAX, |remaining| remaining / min_item_size);
    count.min(fits).min(PREALLOC_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use msgpack_codec_buffers::IterSource;

    fn unpack(data: &[u8]) -> Result<Value> {
        MsgPackUnpacker::new().unpack_slice(data)
    }

    #[test]
    fn fixints_keep_their_signedness() {
        assert_eq!(unpack(&[0x00]), Ok(Value::UInt(0)));
        assert_eq!(unpack(&[0x7f]), Ok(Value::UInt(127)));
        assert_eq!(unpack(&[0xe0]), Ok(Value::Int(-32)));
        assert_eq!(unpack(&[0xff]), Ok(Value::Int(-1)));
    }

    #[test]
    fn sized_ints_do_not_coerce() {
        assert_eq!(unpack(&[0xcc, 0x05]), Ok(Value::UInt(5)));
        assert_eq!(unpack(&[0xd0, 0x05]), Ok(Value::Int(5)));
        assert_eq!(unpack(&[0xd1, 0xff, 0x7f]), Ok(Value::Int(-129)));
        assert_eq!(
            unpack(&[0xcf, 0x80, 0, 0, 0, 0, 0, 0, 0]),
            Ok(Value::UInt(1 << 63))
        );
        assert_eq!(
            unpack(&[0xd3, 0x80, 0, 0, 0, 0, 0, 0, 0]),
            Ok(Value::Int(i64::MIN))
        );
    }

    #[test]
    fn reserved_and_ext_tags_are_unsupported() {
        for tag in [0xc1, 0xc7, 0xc8, 0xc9, 0xd4, 0xd5, 0xd6, 0xd7, 0xd8] {
            assert_eq!(
                unpack(&[tag, 0x00, 0x00]),
                Err(MsgPackError::UnsupportedValue(vec![tag])),
                "tag 0x{tag:02x}"
            );
        }
    }

    #[test]
    fn str_payload_must_be_utf8() {
        assert_eq!(
            unpack(&[0xa1, 0xff]),
            Err(MsgPackError::NonUtf8StringValue(vec![0xff]))
        );
        assert_eq!(
            unpack(&[0xd9, 0x02, b'o', b'k']),
            Ok(Value::String("ok".into()))
        );
    }

    #[test]
    fn truncated_fields_need_more_data() {
        assert_eq!(unpack(&[]), Err(MsgPackError::NotEnoughData));
        assert_eq!(unpack(&[0xcd]), Err(MsgPackError::NotEnoughData));
        assert_eq!(unpack(&[0xcd, 0x01]), Err(MsgPackError::NotEnoughData));
        assert_eq!(unpack(&[0xc6, 0xff, 0xff, 0xff, 0xff, 0x00]), Err(MsgPackError::NotEnoughData));
        assert_eq!(unpack(&[0x92, 0x01]), Err(MsgPackError::NotEnoughData));
        assert_eq!(unpack(&[0x81, 0xa1, b'k']), Err(MsgPackError::NotEnoughData));
    }

    #[test]
    fn huge_declared_count_does_not_preallocate() {
        let data = [0xdd, 0xff, 0xff, 0xff, 0xff, 0xc0];
        assert_eq!(unpack(&data), Err(MsgPackError::NotEnoughData));
        let mut source = IterSource::new(data);
        assert_eq!(
            MsgPackUnpacker::new().unpack(&mut source),
            Err(MsgPackError::NotEnoughData)
        );
    }

    #[test]
    fn depth_limit_rejects_deep_nesting() {
        let mut unpacker = MsgPackUnpacker::with_options(UnpackOptions::default().with_max_depth(2));
        assert_eq!(
            unpacker.unpack_slice(&[0x91, 0x91, 0xc0]),
            Ok(Value::Array(vec![Value::Array(vec![Value::Nil])]))
        );
        assert_eq!(
            unpacker.unpack_slice(&[0x91, 0x91, 0x81, 0xc0, 0xc0]),
            Err(MsgPackError::UnsupportedValue(vec![0x81]))
        );

        let mut flat = MsgPackUnpacker::with_options(UnpackOptions::default().with_max_depth(0));
        assert_eq!(flat.unpack_slice(&[0x01]), Ok(Value::UInt(1)));
        assert_eq!(
            flat.unpack_slice(&[0x90]),
            Err(MsgPackError::UnsupportedValue(vec![0x90]))
        );
    }

    #[test]
    fn default_depth_survives_adversarial_nesting() {
        let mut data = vec![0x91; 100_000];
        data.push(0xc0);
        assert_eq!(
            unpack(&data),
            Err(MsgPackError::UnsupportedValue(vec![0x91]))
        );
    }

    #[test]
    fn unpack_stops_after_one_value() {
        let data = [0x01, 0xa1, b'x', 0xc3];
        let mut reader = Reader::new(&data);
        let mut unpacker = MsgPackUnpacker::new();
        assert_eq!(unpacker.unpack(&mut reader), Ok(Value::UInt(1)));
        assert_eq!(unpacker.unpack(&mut reader), Ok(Value::String("x".into())));
        assert_eq!(unpacker.unpack(&mut reader), Ok(Value::Bool(true)));
        assert_eq!(unpacker.unpack(&mut reader), Err(MsgPackError::NotEnoughData));
    }

    #[test]
    fn unpack_slice_rejects_trailing_bytes() {
        assert_eq!(
            unpack(&[0xc0, 0xc2, 0xc3]),
            Err(MsgPackError::UnsupportedValue(vec![0xc2, 0xc3]))
        );
    }

    #[test]
    fn options_are_kept_from_construction() {
        assert_eq!(MsgPackUnpacker::new().options().max_depth, DEFAULT_MAX_DEPTH);
        let options = UnpackOptions::default().with_max_depth(3);
        let unpacker = MsgPackUnpacker::with_options(options);
        assert_eq!(unpacker.options(), &options);
    }
}
