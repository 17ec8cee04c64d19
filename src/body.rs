//! Bounded body reading.
//!
//! # Design
//! A body source must signal "no more data" as a distinct outcome
//! (`BodyError::Exhausted`) rather than an `Ok(0)` read, because the
//! dispatcher's exhaustion probe relies on telling the two apart: a source
//! that keeps succeeding past its declared `Content-Length` has a bug the
//! double exists to catch.

use thiserror::Error;

/// Failure modes of a [`BodyReader::read`] call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BodyError {
    /// The source has no data left. This is the expected outcome of the
    /// dispatcher's exhaustion probe, not a fault in itself.
    #[error("body source exhausted")]
    Exhausted,

    /// The source failed to produce data it should have had.
    #[error("body read failed: {0}")]
    Read(String),
}

/// Incremental reader for a request body, bounded by the request's declared
/// `Content-Length`.
pub trait BodyReader {
    /// Copy up to `buf.len()` bytes into the front of `buf`, returning how
    /// many were written. Once the source is out of data every subsequent
    /// call returns `Err(BodyError::Exhausted)`.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, BodyError>;
}

/// A body source over an owned byte buffer.
///
/// Yields `min(buf.len(), remaining)` bytes per call and reports
/// `Exhausted` once the buffer is spent. Pairs with a `Content-Length`
/// header equal to the buffer's length for a well-behaved request.
#[derive(Debug, Clone)]
pub struct InMemoryBody {
    data: Vec<u8>,
    pos: usize,
}

impl InMemoryBody {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            pos: 0,
        }
    }
}

impl BodyReader for InMemoryBody {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, BodyError> {
        let remaining = &self.data[self.pos..];
        if remaining.is_empty() {
            return Err(BodyError::Exhausted);
        }
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.pos += n;
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_everything_in_one_call_when_buffer_is_large_enough() {
        let mut body = InMemoryBody::new(b"hello".to_vec());
        let mut buf = [0u8; 8];
        assert_eq!(body.read(&mut buf).unwrap(), 5);
        assert_eq!(&buf[..5], b"hello");
    }

    #[test]
    fn reads_in_chunks_bounded_by_buffer_size() {
        let mut body = InMemoryBody::new(b"abcdef".to_vec());
        let mut buf = [0u8; 4];
        assert_eq!(body.read(&mut buf).unwrap(), 4);
        assert_eq!(&buf, b"abcd");
        assert_eq!(body.read(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], b"ef");
    }

    #[test]
    fn reports_exhausted_after_all_data_is_read() {
        let mut body = InMemoryBody::new(b"x".to_vec());
        let mut buf = [0u8; 1];
        assert_eq!(body.read(&mut buf).unwrap(), 1);
        assert_eq!(body.read(&mut buf), Err(BodyError::Exhausted));
        // Exhaustion is terminal.
        assert_eq!(body.read(&mut buf), Err(BodyError::Exhausted));
    }

    #[test]
    fn empty_body_is_exhausted_from_the_start() {
        let mut body = InMemoryBody::new(Vec::new());
        let mut buf = [0u8; 1];
        assert_eq!(body.read(&mut buf), Err(BodyError::Exhausted));
    }
}
