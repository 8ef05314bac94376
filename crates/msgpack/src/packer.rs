//! Compact MessagePack encoder for [`Value`] trees.
//!
//! Every value is written in the smallest format that round-trips it
//! exactly. Lengths are checked before a header is written, so a value that
//! cannot be represented never produces a truncated prefix.

use msgpack_codec_buffers::Writer;

use crate::constants::*;
use crate::error::{MsgPackError, Result};
use crate::Value;

/// MessagePack encoder.
pub struct MsgPackPacker {
    pub writer: Writer,
}

impl Default for MsgPackPacker {
    fn default() -> Self {
        Self::new()
    }
}

impl MsgPackPacker {
    pub fn new() -> Self {
        Self {
            writer: Writer::new(),
        }
    }

    pub fn with_writer(writer: Writer) -> Self {
        Self { writer }
    }

    /// Encodes a value and returns the MessagePack bytes.
    pub fn pack(&mut self, value: &Value) -> Result<Vec<u8>> {
        self.writer.reset();
        self.write_any(value)?;
        Ok(self.writer.flush())
    }

    /// Encodes a value and appends it to `out`.
    ///
    /// `out` is left untouched when encoding fails.
    pub fn pack_into(&mut self, value: &Value, out: &mut Vec<u8>) -> Result<()> {
        let bytes = self.pack(value)?;
        out.extend_from_slice(&bytes);
        Ok(())
    }

    pub fn write_any(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Nil => {
                self.write_nil();
                Ok(())
            }
            Value::Bool(b) => {
                self.write_bool(*b);
                Ok(())
            }
            Value::Int(n) => {
                self.write_int(*n);
                Ok(())
            }
            Value::UInt(n) => {
                self.write_uint(*n);
                Ok(())
            }
            Value::Float32(f) => {
                self.write_f32(*f);
                Ok(())
            }
            Value::Float64(f) => {
                self.write_f64(*f);
                Ok(())
            }
            Value::String(s) => self.write_str(s),
            Value::Binary(b) => self.write_bin(b),
            Value::Array(items) => self.write_arr(items),
            Value::Map(entries) => self.write_map(entries),
        }
    }

    pub fn write_nil(&mut self) {
        self.writer.u8(NIL);
    }

    pub fn write_bool(&mut self, b: bool) {
        self.writer.u8(if b { TRUE } else { FALSE });
    }

    /// Writes a signed integer in the narrowest fitting format.
    ///
    /// Only `-32..=-1` uses the one-byte negative fixint; non-negative values
    /// still take an `int*` tag so they decode back as [`Value::Int`].
    pub fn write_int(&mut self, n: i64) {
        if let Ok(v) = i8::try_from(n) {
            self.write_i8(v);
        } else if let Ok(v) = i16::try_from(n) {
            self.write_i16(v);
        } else if let Ok(v) = i32::try_from(n) {
            self.write_i32(v);
        } else {
            self.write_i64(n);
        }
    }

    /// Writes an unsigned integer in the narrowest fitting format.
    pub fn write_uint(&mut self, n: u64) {
        if let Ok(v) = u8::try_from(n) {
            self.write_u8(v);
        } else if let Ok(v) = u16::try_from(n) {
            self.write_u16(v);
        } else if let Ok(v) = u32::try_from(n) {
            self.write_u32(v);
        } else {
            self.write_u64(n);
        }
    }

    /// Negative fixint for `-32..=-1`, `int8` otherwise.
    pub fn write_i8(&mut self, n: i8) {
        if (-32..0).contains(&n) {
            self.writer.u8(n as u8);
        } else {
            self.writer.u8u8(INT8, n as u8);
        }
    }

    pub fn write_i16(&mut self, n: i16) {
        self.writer.u8u16(INT16, n as u16);
    }

    pub fn write_i32(&mut self, n: i32) {
        self.writer.u8u32(INT32, n as u32);
    }

    pub fn write_i64(&mut self, n: i64) {
        self.writer.u8u64(INT64, n as u64);
    }

    /// Positive fixint up to `0x7f`, `uint8` otherwise.
    pub fn write_u8(&mut self, n: u8) {
        if n <= POSITIVE_FIXINT_MAX {
            self.writer.u8(n);
        } else {
            self.writer.u8u8(UINT8, n);
        }
    }

    pub fn write_u16(&mut self, n: u16) {
        self.writer.u8u16(UINT16, n);
    }

    pub fn write_u32(&mut self, n: u32) {
        self.writer.u8u32(UINT32, n);
    }

    pub fn write_u64(&mut self, n: u64) {
        self.writer.u8u64(UINT64, n);
    }

    pub fn write_f32(&mut self, f: f32) {
        self.writer.u8f32(FLOAT32, f);
    }

    pub fn write_f64(&mut self, f: f64) {
        self.writer.u8f64(FLOAT64, f);
    }

    pub fn write_str(&mut self, s: &str) -> Result<()> {
        self.write_str_hdr(s.len())?;
        self.writer.buf(s.as_bytes());
        Ok(())
    }

    /// Writes raw bytes as a string after checking they are valid UTF-8.
    pub fn write_str_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let s = std::str::from_utf8(bytes)
            .map_err(|_| MsgPackError::NonUtf8StringValue(bytes.to_vec()))?;
        self.write_str(s)
    }

    pub fn write_str_hdr(&mut self, length: usize) -> Result<()> {
        let len = length_prefix(length)?;
        if length <= FIXSTR_MAX_LEN {
            self.writer.u8(FIXSTR | len as u8);
        } else if let Ok(len) = u8::try_from(len) {
            self.writer.u8u8(STR8, len);
        } else if let Ok(len) = u16::try_from(len) {
            self.writer.u8u16(STR16, len);
        } else {
            self.writer.u8u32(STR32, len);
        }
        Ok(())
    }

    /// Writes a byte blob; there is no fixed-size form, `bin8` is the smallest.
    pub fn write_bin(&mut self, buf: &[u8]) -> Result<()> {
        self.write_bin_hdr(buf.len())?;
        self.writer.buf(buf);
        Ok(())
    }

    pub fn write_bin_hdr(&mut self, length: usize) -> Result<()> {
        let len = length_prefix(length)?;
        if let Ok(len) = u8::try_from(len) {
            self.writer.u8u8(BIN8, len);
        } else if let Ok(len) = u16::try_from(len) {
            self.writer.u8u16(BIN16, len);
        } else {
            self.writer.u8u32(BIN32, len);
        }
        Ok(())
    }

    pub fn write_arr(&mut self, items: &[Value]) -> Result<()> {
        self.write_arr_hdr(items.len())?;
        for item in items {
            self.write_any(item)?;
        }
        Ok(())
    }

    pub fn write_arr_hdr(&mut self, length: usize) -> Result<()> {
        self.write_container_hdr(length, FIXARRAY, ARRAY16, ARRAY32)
    }

    /// Writes each entry as its key immediately followed by its value.
    pub fn write_map(&mut self, entries: &[(Value, Value)]) -> Result<()> {
        self.write_map_hdr(entries.len())?;
        for (key, value) in entries {
            self.write_any(key)?;
            self.write_any(value)?;
        }
        Ok(())
    }

    pub fn write_map_hdr(&mut self, length: usize) -> Result<()> {
        self.write_container_hdr(length, FIXMAP, MAP16, MAP32)
    }

    fn write_container_hdr(&mut self, length: usize, fix: u8, tag16: u8, tag32: u8) -> Result<()> {
        let len = length_prefix(length)?;
        if length <= FIX_CONTAINER_MAX_LEN {
            self.writer.u8(fix | len as u8);
        } else if let Ok(len) = u16::try_from(len) {
            self.writer.u8u16(tag16, len);
        } else {
            self.writer.u8u32(tag32, len);
        }
        Ok(())
    }
}

fn length_prefix(length: usize) -> Result<u32> {
    u32::try_from(length).map_err(|_| {
        tracing::debug!(length, "length does not fit a 32-bit prefix");
        MsgPackError::ValueTooLong(length)
    })
}
