//! Object-store read capability
//!
//! The scanning and materialization stages never touch a filesystem; they go
//! through [`RangeRead`], a minimal injected read interface over a stored
//! object. Production code uses the HTTP transport in
//! [`network`](crate::io::network); tests and doc examples use
//! [`MemoryObject`].

use crate::error::Result;
use bytes::Bytes;

/// Read-only, range-addressable access to one stored object
///
/// Implementations must clamp reads past the end of the object rather than
/// fail: a read that starts at or beyond end-of-file returns an empty
/// buffer, and a read whose end extends past end-of-file returns the bytes
/// that exist. Callers rely on a short or empty read to detect end-of-file.
pub trait RangeRead {
    /// Read the half-open byte interval `[start, end)` of the object
    fn read_range(&self, start: u64, end: u64) -> Result<Bytes>;

    /// Total size of the object in bytes
    fn size(&self) -> Result<u64>;
}

/// In-memory object implementing [`RangeRead`]
///
/// Used by unit and property tests, and wherever an in-process byte buffer
/// should be driven through the same code paths as a remote object.
///
/// # Example
///
/// ```
/// use fastaslice::{MemoryObject, RangeRead};
///
/// # fn main() -> fastaslice::Result<()> {
/// let object = MemoryObject::new(b">seq01\nACGT\n".to_vec());
/// assert_eq!(object.size()?, 12);
/// assert_eq!(&object.read_range(7, 11)?[..], b"ACGT");
/// // Reads past end-of-file are clamped
/// assert!(object.read_range(12, 64)?.is_empty());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MemoryObject {
    data: Bytes,
}

impl MemoryObject {
    /// Create an in-memory object from a byte buffer
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }
}

impl RangeRead for MemoryObject {
    fn read_range(&self, start: u64, end: u64) -> Result<Bytes> {
        let len = self.data.len() as u64;
        let start = start.min(len);
        let end = end.min(len).max(start);
        Ok(self.data.slice(start as usize..end as usize))
    }

    fn size(&self) -> Result<u64> {
        Ok(self.data.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_range_exact() {
        let object = MemoryObject::new(b"0123456789".to_vec());
        assert_eq!(&object.read_range(0, 10).unwrap()[..], b"0123456789");
        assert_eq!(&object.read_range(3, 7).unwrap()[..], b"3456");
    }

    #[test]
    fn test_read_range_clamped_at_eof() {
        let object = MemoryObject::new(b"0123456789".to_vec());
        assert_eq!(&object.read_range(8, 100).unwrap()[..], b"89");
        assert!(object.read_range(10, 20).unwrap().is_empty());
        assert!(object.read_range(50, 60).unwrap().is_empty());
    }

    #[test]
    fn test_read_range_empty_interval() {
        let object = MemoryObject::new(b"0123456789".to_vec());
        assert!(object.read_range(4, 4).unwrap().is_empty());
    }

    #[test]
    fn test_size() {
        let object = MemoryObject::new(Vec::new());
        assert_eq!(object.size().unwrap(), 0);
    }
}
