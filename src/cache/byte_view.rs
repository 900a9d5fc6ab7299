//! Byte View Module
//!
//! Immutable view over a cached value.

use std::fmt;

// == Byte View ==
/// An immutable sequence of bytes held by the cache.
///
/// There is no mutable access to the inner buffer and `Clone` copies it, so a
/// value handed to a caller can never alias the copy kept by the eviction engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ByteView {
    bytes: Vec<u8>,
}

impl ByteView {
    // == Constructor ==
    /// Creates a view that takes ownership of `bytes`.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    // == Length ==
    /// Number of bytes; this is what the value is charged against the memory budget.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Borrows the bytes read-only.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns an owned copy of the bytes.
    pub fn to_vec(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    /// Consumes the view and returns its buffer.
    pub fn into_vec(self) -> Vec<u8> {
        self.bytes
    }
}

impl fmt::Display for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.bytes))
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

impl From<&[u8]> for ByteView {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes.to_vec())
    }
}

impl From<&str> for ByteView {
    fn from(s: &str) -> Self {
        Self::new(s.as_bytes().to_vec())
    }
}
