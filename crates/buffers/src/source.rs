//! Forward-only byte cursors consumed by decoders.

use crate::Reader;

/// Upper bound on speculative allocation when the remaining length is unknown.
const PREALLOC_LIMIT: usize = 64 * 1024;

/// A forward-only byte cursor: "take next byte, or report none remaining".
///
/// Decoders only ever move forward, so anything that yields bytes in order
/// (a slice, an iterator over a file or socket buffer) can drive them.
/// [`ByteSource::take_bytes`] has a byte-at-a-time default and may be
/// overridden when the source can copy a run at once.
pub trait ByteSource {
    /// Takes the next byte, or `None` when the source is exhausted.
    fn next_byte(&mut self) -> Option<u8>;

    /// Takes exactly `n` bytes, or `None` when fewer than `n` remain.
    fn take_bytes(&mut self, n: usize) -> Option<Vec<u8>> {
        let hint = self.remaining_hint().unwrap_or(PREALLOC_LIMIT);
        let mut out = Vec::with_capacity(n.min(hint).min(PREALLOC_LIMIT));
        for _ in 0..n {
            out.push(self.next_byte()?);
        }
        Some(out)
    }

    /// Number of bytes left, when the source knows it.
    fn remaining_hint(&self) -> Option<usize> {
        None
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn next_byte(&mut self) -> Option<u8> {
        (**self).next_byte()
    }

    fn take_bytes(&mut self, n: usize) -> Option<Vec<u8>> {
        (**self).take_bytes(n)
    }

    fn remaining_hint(&self) -> Option<usize> {
        (**self).remaining_hint()
    }
}

impl ByteSource for Reader<'_> {
    fn next_byte(&mut self) -> Option<u8> {
        self.u8().ok()
    }

    fn take_bytes(&mut self, n: usize) -> Option<Vec<u8>> {
        self.buf(n).ok().map(<[u8]>::to_vec)
    }

    fn remaining_hint(&self) -> Option<usize> {
        Some(self.size())
    }
}

/// Adapts any `Iterator<Item = u8>` into a [`ByteSource`].
///
/// ```
/// use msgpack_codec_buffers::{ByteSource, IterSource};
///
/// let mut source = IterSource::new([0xcd, 0x01, 0x02]);
/// assert_eq!(source.next_byte(), Some(0xcd));
/// assert_eq!(source.take_bytes(2), Some(vec![0x01, 0x02]));
/// assert_eq!(source.next_byte(), None);
/// ```
#[derive(Debug, Clone)]
pub struct IterSource<I> {
    iter: I,
}

impl<I: Iterator<Item = u8>> IterSource<I> {
    pub fn new(iter: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            iter: iter.into_iter(),
        }
    }

    /// Returns the wrapped iterator, positioned after the last byte taken.
    pub fn into_inner(self) -> I {
        self.iter
    }
}

impl<I: Iterator<Item = u8>> ByteSource for IterSource<I> {
    fn next_byte(&mut self) -> Option<u8> {
        self.iter.next()
    }

    fn remaining_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}
