//! Partition planning over a built boundary index
//!
//! # Algorithm
//!
//! The object is first cut into `n` equal candidate ranges of
//! `ceil(object_size / n)` bytes. Each candidate boundary is then aligned to
//! the record layout using the governing-record lookup on the index:
//!
//! - A range start inside a header line snaps back to the header's first
//!   byte, so the partition owns the whole header and needs no
//!   reconstruction.
//! - A range start inside payload bytes stays put; the plan records how many
//!   payload bytes of the governing record earlier partitions already cover,
//!   plus the header's byte interval for re-synthesis at materialization.
//! - A range end inside a header line is trimmed back to the header's first
//!   byte, deferring the whole header to the next partition.
//!
//! A partition boundary therefore lands either exactly on a header start or
//! strictly inside payload, never inside a header line: header lines are
//! indivisible and must appear intact exactly once, in the partition that
//! owns the rest of their sequence. Consecutive candidates share their grid
//! boundary and both lookups resolve it identically, so the plans cover
//! `[0, object_size)` with no gap and no overlap for any `n`.

use crate::error::{FastaSliceError, Result};
use crate::fasta::index::SequenceIndex;
use crate::types::PartitionPlan;

/// Plan `partitions` record-aligned byte ranges covering the whole object
///
/// Pure computation over the index; no I/O. Always returns exactly
/// `partitions` plans covering `[0, object_size)` in order, though trailing
/// plans may be empty when the partition count exceeds what the object size
/// supports. Over an empty index every candidate range is returned
/// unmodified and materialization degenerates to a plain byte copy.
///
/// # Errors
///
/// Returns an error when `partitions` is zero.
///
/// # Example
///
/// ```
/// use fastaslice::{plan_partitions, RecordBoundary, SequenceIndex};
///
/// # fn main() -> fastaslice::Result<()> {
/// let index = SequenceIndex::from_windows(vec![vec![
///     RecordBoundary::new(0, 7),
///     RecordBoundary::new(12, 19),
/// ]]);
///
/// let plans = plan_partitions(&index, 24, 2)?;
/// assert_eq!((plans[0].range_start, plans[0].range_end), (0, 12));
/// assert_eq!((plans[1].range_start, plans[1].range_end), (12, 24));
/// # Ok(())
/// # }
/// ```
pub fn plan_partitions(
    index: &SequenceIndex,
    object_size: u64,
    partitions: usize,
) -> Result<Vec<PartitionPlan>> {
    if partitions == 0 {
        return Err(FastaSliceError::InvalidRange(
            "partition count must be at least 1".to_string(),
        ));
    }

    let candidate_size = object_size.div_ceil(partitions as u64);
    let mut plans = Vec::with_capacity(partitions);

    for i in 0..partitions as u64 {
        let r0 = (i * candidate_size).min(object_size);
        let r1 = ((i + 1) * candidate_size).min(object_size);

        let (range_start, in_sequence_offset, header_range) = match index.governing_record(r0) {
            // Start falls inside the governing record's header line: snap
            // back so this partition begins with the full header
            Some(rec) if r0 < rec.sequence_start => (rec.header_start, 0, None),
            // Start falls inside payload: keep it, and carry the header
            // interval for re-synthesis
            Some(rec) => (
                r0,
                r0 - rec.sequence_start,
                Some((rec.header_start, rec.sequence_start)),
            ),
            // No record starts at or before r0: headerless bytes pass
            // through unmodified
            None => (r0, 0, None),
        };

        let range_end = match index.governing_record(r1) {
            // End falls inside a header line: trim it off, the next
            // partition's start snap picks the header up whole
            Some(rec) if r1 < rec.sequence_start => rec.header_start,
            _ => r1,
        };

        plans.push(PartitionPlan {
            range_start,
            range_end,
            in_sequence_offset,
            header_range,
        });
    }

    Ok(plans)
}
