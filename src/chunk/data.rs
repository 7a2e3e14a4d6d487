//! The Chunk type - one unit of data yielded by a source.

use bytes::Bytes;
use std::fmt;

/// One unit of data produced by a [`Source`](crate::Source) per pull.
///
/// Byte chunks and text chunks share this type: text is carried as its UTF-8
/// encoding, so the pump never needs to know which kind of stream it is
/// draining.
///
/// # Example
///
/// ```
/// use pumprs::Chunk;
/// use bytes::Bytes;
///
/// let chunk = Chunk::new(Bytes::from_static(b"hello world"));
/// assert_eq!(chunk.len(), 11);
///
/// let text = Chunk::from("héllo");
/// assert_eq!(text.len(), 6);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chunk {
    /// The chunk bytes.
    pub data: Bytes,
}

impl Chunk {
    /// Creates a new chunk with the given data.
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }

    /// Creates a chunk from text, encoded as UTF-8.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            data: Bytes::from(text.into()),
        }
    }

    /// Returns the length of the chunk data.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the chunk has no data.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns a reference to the chunk data.
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Consumes the chunk and returns the underlying data.
    pub fn into_data(self) -> Bytes {
        self.data
    }
}

impl From<Bytes> for Chunk {
    fn from(data: Bytes) -> Self {
        Self::new(data)
    }
}

impl From<Vec<u8>> for Chunk {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl From<&'static [u8]> for Chunk {
    fn from(data: &'static [u8]) -> Self {
        Self::new(Bytes::from_static(data))
    }
}

impl From<String> for Chunk {
    fn from(text: String) -> Self {
        Self::text(text)
    }
}

impl From<&'static str> for Chunk {
    fn from(text: &'static str) -> Self {
        Self::new(Bytes::from_static(text.as_bytes()))
    }
}

impl AsRef<[u8]> for Chunk {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Chunk({} bytes)", self.len())
    }
}
