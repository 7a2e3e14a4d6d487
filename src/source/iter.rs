//! Source over an iterator of already-available chunks.

use super::{Pull, Source};
use crate::chunk::Chunk;

/// A source whose chunks are all available up front.
///
/// Every pull resolves synchronously, so a pump drains it into as few
/// writes as the buffer capacity allows.
///
/// # Example
///
/// ```
/// use pumprs::{IterSource, Source};
///
/// let source = IterSource::new(vec!["hello", " ", "world"]).with_expected_length(11);
/// assert_eq!(source.expected_length(), Some(11));
/// ```
#[derive(Debug)]
pub struct IterSource<I> {
    iter: I,
    expected_length: Option<u64>,
    finished: bool,
}

impl<I> IterSource<I> {
    /// Creates a source over the given chunks.
    pub fn new<T>(iter: T) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        Self {
            iter: iter.into_iter(),
            expected_length: None,
            finished: false,
        }
    }

    /// Declares the total number of bytes the iterator yields.
    pub fn with_expected_length(mut self, len: u64) -> Self {
        self.expected_length = Some(len);
        self
    }
}

impl<I> Source for IterSource<I>
where
    I: Iterator,
    I::Item: Into<Chunk>,
{
    fn pull(&mut self) -> Pull<'_> {
        if self.finished {
            return Pull::closed();
        }
        match self.iter.next() {
            Some(chunk) => Pull::chunk(chunk),
            None => {
                self.finished = true;
                Pull::closed()
            }
        }
    }

    fn expected_length(&self) -> Option<u64> {
        self.expected_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain<S: Source>(source: &mut S) -> Vec<u8> {
        let mut out = Vec::new();
        loop {
            match source.pull() {
                Pull::Ready(Ok(Some(chunk))) => out.extend_from_slice(&chunk.data),
                Pull::Ready(Ok(None)) => return out,
                Pull::Ready(Err(e)) => panic!("unexpected error: {}", e),
                Pull::Pending(_) => panic!("iter source never suspends"),
            }
        }
    }

    #[test]
    fn test_yields_all_chunks() {
        let mut source = IterSource::new(vec![vec![1u8, 2], vec![3u8]]);
        assert_eq!(drain(&mut source), vec![1, 2, 3]);
        assert!(matches!(source.pull(), Pull::Ready(Ok(None))));
    }

    #[test]
    fn test_text_chunks() {
        let mut source = IterSource::new(["ab", "cd"]);
        assert_eq!(drain(&mut source), b"abcd".to_vec());
        assert!(source.expected_length().is_none());
    }
}
