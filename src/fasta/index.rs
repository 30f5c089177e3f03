//! Boundary index: merge, persistence, and the preprocessing driver
//!
//! # Merge contract
//!
//! Per-window boundary lists are concatenated in file order. Windows are
//! non-overlapping and contiguous, so window order implies offset order and
//! no merge logic beyond concatenation is needed. Supplying windows out of
//! order violates that precondition; the merge does not re-sort.
//!
//! # Persisted artifact
//!
//! The index serializes as a flat array of unsigned 32-bit little-endian
//! integers, `(header_start, sequence_start)` pairs in order, length
//! `2 * record_count`. This layout is the stable binary contract between
//! the preprocessing phase and the partitioning phase; offsets that do not
//! fit 32 bits are refused rather than wrapped.

use crate::error::{FastaSliceError, Result};
use crate::fasta::scan::scan_window;
use crate::io::RangeRead;
use crate::types::RecordBoundary;
use rayon::prelude::*;

/// Ordered index of every record boundary in the source object
///
/// Immutable once built. Constructed by [`SequenceIndex::from_windows`] from
/// per-window scan results, by [`SequenceIndex::from_bytes`] from a persisted
/// artifact, or by the [`build_index`] convenience driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceIndex {
    boundaries: Vec<RecordBoundary>,
}

impl SequenceIndex {
    /// Merge per-window boundary lists, supplied in file order, into one
    /// flat index
    pub fn from_windows(windows: Vec<Vec<RecordBoundary>>) -> Self {
        Self {
            boundaries: windows.into_iter().flatten().collect(),
        }
    }

    /// Number of records in the index
    pub fn record_count(&self) -> usize {
        self.boundaries.len()
    }

    /// Check if the index holds no records
    ///
    /// An empty index is not an error; partition planning degrades to plain
    /// byte ranges over it.
    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }

    /// The ordered boundaries
    pub fn boundaries(&self) -> &[RecordBoundary] {
        &self.boundaries
    }

    /// The record governing `offset`: the last record whose header starts
    /// at or before it
    ///
    /// Returns `None` when the index is empty or `offset` precedes the first
    /// header. Implemented as an explicit "largest index whose `header_start`
    /// is at most the target" search so that an offset equal to a header
    /// start resolves to that record, not its predecessor.
    pub fn governing_record(&self, offset: u64) -> Option<RecordBoundary> {
        let mut lo = 0usize;
        let mut hi = self.boundaries.len();

        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if self.boundaries[mid].header_start <= offset {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }

        if lo == 0 {
            None
        } else {
            Some(self.boundaries[lo - 1])
        }
    }

    /// Serialize to the flat u32 little-endian pair layout
    ///
    /// # Errors
    ///
    /// Returns an error if any offset exceeds `u32::MAX`; the 32-bit layout
    /// is a stable wire contract and is never silently widened or wrapped.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.boundaries.len() * 8);

        for boundary in &self.boundaries {
            let header = u32::try_from(boundary.header_start).map_err(|_| {
                FastaSliceError::InvalidRange(format!(
                    "offset {} exceeds the 32-bit index layout",
                    boundary.header_start
                ))
            })?;
            let sequence = u32::try_from(boundary.sequence_start).map_err(|_| {
                FastaSliceError::InvalidRange(format!(
                    "offset {} exceeds the 32-bit index layout",
                    boundary.sequence_start
                ))
            })?;

            out.extend_from_slice(&header.to_le_bytes());
            out.extend_from_slice(&sequence.to_le_bytes());
        }

        Ok(out)
    }

    /// Deserialize from the flat u32 little-endian pair layout
    ///
    /// # Errors
    ///
    /// Returns an error if the byte length is not a whole number of
    /// boundary pairs.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() % 8 != 0 {
            return Err(FastaSliceError::MalformedInput {
                msg: format!(
                    "index artifact length {} is not a whole number of boundary pairs",
                    bytes.len()
                ),
            });
        }

        let boundaries = bytes
            .chunks_exact(8)
            .map(|pair| {
                RecordBoundary::new(
                    u32::from_le_bytes([pair[0], pair[1], pair[2], pair[3]]) as u64,
                    u32::from_le_bytes([pair[4], pair[5], pair[6], pair[7]]) as u64,
                )
            })
            .collect();

        Ok(Self { boundaries })
    }
}

/// Scan the whole object and build its boundary index
///
/// Convenience driver for callers that do not bring their own window
/// dispatch: splits `[0, size)` into contiguous windows of `window_size`
/// bytes, scans them in parallel, and merges the results in window order.
/// Window size is caller policy; larger windows mean fewer supplementary
/// reads, smaller windows mean more parallelism.
///
/// # Example
///
/// ```
/// use fastaslice::{build_index, MemoryObject};
///
/// # fn main() -> fastaslice::Result<()> {
/// let object = MemoryObject::new(b">seq01\nACGT\n>seq02\nGGGG\n".to_vec());
/// let index = build_index(&object, 8)?;
/// assert_eq!(index.record_count(), 2);
/// # Ok(())
/// # }
/// ```
pub fn build_index<S: RangeRead + Sync>(source: &S, window_size: u64) -> Result<SequenceIndex> {
    if window_size == 0 {
        return Err(FastaSliceError::InvalidRange(
            "window size must be at least 1 byte".to_string(),
        ));
    }

    let size = source.size()?;
    let starts: Vec<u64> = (0..size.div_ceil(window_size))
        .map(|i| i * window_size)
        .collect();

    // Indexed parallel map, so results come back in window order for the
    // merge regardless of scan completion order
    let windows = starts
        .par_iter()
        .map(|&start| {
            let end = (start + window_size).min(size);
            let data = source.read_range(start, end)?;
            scan_window(source, &data, start)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(SequenceIndex::from_windows(windows))
}
