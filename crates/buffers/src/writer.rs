//! Auto-growing binary buffer writer.

/// A binary buffer writer that appends to an internal, auto-growing buffer.
///
/// Bytes between `x0` and `x` form the current window; [`Writer::flush`]
/// hands that window out and starts a new one at the current position.
/// All multi-byte values are written big-endian.
///
/// # Example
///
/// ```
/// use msgpack_codec_buffers::Writer;
///
/// let mut writer = Writer::new();
/// writer.u8u16(0xcd, 0x0102);
/// assert_eq!(writer.flush(), vec![0xcd, 0x01, 0x02]);
/// ```
#[derive(Debug, Clone)]
pub struct Writer {
    /// The underlying buffer.
    pub uint8: Vec<u8>,
    /// Start of the current window.
    pub x0: usize,
    /// Current write position.
    pub x: usize,
    alloc_size: usize,
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer {
    /// Creates a new writer with the default allocation size.
    pub fn new() -> Self {
        Self::with_alloc_size(1024)
    }

    /// Creates a new writer with a custom allocation size.
    pub fn with_alloc_size(alloc_size: usize) -> Self {
        Self {
            uint8: vec![0; alloc_size],
            x0: 0,
            x: 0,
            alloc_size,
        }
    }

    /// Makes sure at least `capacity` more bytes fit after the cursor.
    pub fn ensure_capacity(&mut self, capacity: usize) {
        let required = self.x + capacity;
        if required > self.uint8.len() {
            let grown = (self.uint8.len() * 2).max(required).max(self.alloc_size);
            self.uint8.resize(grown, 0);
        }
    }

    /// Drops everything written so far.
    pub fn reset(&mut self) {
        self.x0 = 0;
        self.x = 0;
    }

    /// Returns the bytes written since the last flush or reset.
    pub fn flush(&mut self) -> Vec<u8> {
        let out = self.uint8[self.x0..self.x].to_vec();
        self.x0 = self.x;
        out
    }

    #[inline]
    fn put<const N: usize>(&mut self, bytes: [u8; N]) {
        self.ensure_capacity(N);
        self.uint8[self.x..self.x + N].copy_from_slice(&bytes);
        self.x += N;
    }

    /// Writes an unsigned 8-bit integer.
    #[inline]
    pub fn u8(&mut self, val: u8) {
        self.put([val]);
    }

    /// Writes a signed 8-bit integer.
    #[inline]
    pub fn i8(&mut self, val: i8) {
        self.put(val.to_be_bytes());
    }

    /// Writes a big-endian unsigned 16-bit integer.
    #[inline]
    pub fn u16(&mut self, val: u16) {
        self.put(val.to_be_bytes());
    }

    /// Writes a big-endian signed 16-bit integer.
    #[inline]
    pub fn i16(&mut self, val: i16) {
        self.put(val.to_be_bytes());
    }

    /// Writes a big-endian unsigned 32-bit integer.
    #[inline]
    pub fn u32(&mut self, val: u32) {
        self.put(val.to_be_bytes());
    }

    /// Writes a big-endian signed 32-bit integer.
    #[inline]
    pub fn i32(&mut self, val: i32) {
        self.put(val.to_be_bytes());
    }

    /// Writes a big-endian unsigned 64-bit integer.
    #[inline]
    pub fn u64(&mut self, val: u64) {
        self.put(val.to_be_bytes());
    }

    /// Writes a big-endian signed 64-bit integer.
    #[inline]
    pub fn i64(&mut self, val: i64) {
        self.put(val.to_be_bytes());
    }

    /// Writes a big-endian IEEE 754 single.
    #[inline]
    pub fn f32(&mut self, val: f32) {
        self.put(val.to_be_bytes());
    }

    /// Writes a big-endian IEEE 754 double.
    #[inline]
    pub fn f64(&mut self, val: f64) {
        self.put(val.to_be_bytes());
    }

    /// Writes a tag byte followed by an 8-bit payload.
    #[inline]
    pub fn u8u8(&mut self, tag: u8, val: u8) {
        self.put([tag, val]);
    }

    /// Writes a tag byte followed by a big-endian 16-bit payload.
    #[inline]
    pub fn u8u16(&mut self, tag: u8, val: u16) {
        self.ensure_capacity(3);
        self.u8(tag);
        self.u16(val);
    }

    /// Writes a tag byte followed by a big-endian 32-bit payload.
    #[inline]
    pub fn u8u32(&mut self, tag: u8, val: u32) {
        self.ensure_capacity(5);
        self.u8(tag);
        self.u32(val);
    }

    /// Writes a tag byte followed by a big-endian 64-bit payload.
    #[inline]
    pub fn u8u64(&mut self, tag: u8, val: u64) {
        self.ensure_capacity(9);
        self.u8(tag);
        self.u64(val);
    }

    /// Writes a tag byte followed by a big-endian single.
    #[inline]
    pub fn u8f32(&mut self, tag: u8, val: f32) {
        self.ensure_capacity(5);
        self.u8(tag);
        self.f32(val);
    }

    /// Writes a tag byte followed by a big-endian double.
    #[inline]
    pub fn u8f64(&mut self, tag: u8, val: f64) {
        self.ensure_capacity(9);
        self.u8(tag);
        self.f64(val);
    }

    /// Copies raw bytes into the buffer.
    pub fn buf(&mut self, data: &[u8]) {
        let length = data.len();
        self.ensure_capacity(length);
        self.uint8[self.x..self.x + length].copy_from_slice(data);
        self.x += length;
    }
}
