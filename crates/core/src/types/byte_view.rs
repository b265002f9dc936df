//! Immutable snapshot of a cached value

use bytes::Bytes;
use std::fmt;

/// An immutable view over a cached byte sequence.
///
/// Cloning a `ByteView` is cheap: clones share one immutable buffer. The only
/// way to get owned, mutable bytes back out is [`ByteView::byte_slice`], which
/// copies, so nothing a caller does can reach cache-internal storage.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct ByteView {
    bytes: Bytes,
}

impl ByteView {
    /// Wrap an owned buffer. The caller gives up the buffer, so it is already
    /// isolated from anything else.
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Bytes::from(bytes),
        }
    }

    /// Clone `data` into a fresh buffer and wrap it
    #[must_use]
    pub fn copy_from_slice(data: &[u8]) -> Self {
        Self {
            bytes: Bytes::copy_from_slice(data),
        }
    }

    /// Length of the value in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// A fresh copy of the bytes. Mutating it never affects the cache.
    #[must_use]
    pub fn byte_slice(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }

    /// Borrowed, read-only access without copying
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Display for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.bytes))
    }
}

impl fmt::Debug for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteView")
            .field("len", &self.bytes.len())
            .field("value", &String::from_utf8_lossy(&self.bytes))
            .finish()
    }
}

impl AsRef<[u8]> for ByteView {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl From<Vec<u8>> for ByteView {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<String> for ByteView {
    fn from(value: String) -> Self {
        Self::new(value.into_bytes())
    }
}

impl From<&str> for ByteView {
    fn from(value: &str) -> Self {
        Self::copy_from_slice(value.as_bytes())
    }
}
