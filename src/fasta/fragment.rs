//! Fragment materialization: turning one plan into valid output bytes
//!
//! A partition that begins mid-sequence is not legal FASTA on its own. The
//! materializer re-attaches the record's header line in front of the payload
//! bytes, with a ` offset=<n>` token appended to the header recording how
//! many payload bytes of the record earlier partitions already cover.
//! Downstream consumers use the token to reassemble or skip, and no
//! legitimate header is expected to carry it.

use crate::error::Result;
use crate::io::RangeRead;
use crate::types::PartitionPlan;

/// Materialize one planned partition into a self-describing fragment
///
/// Issues a range read for the plan's byte range. When the plan carries a
/// `header_range`, the header line is fetched, its trailing newline is
/// stripped, the ` offset=<n>` provenance token and a newline are appended,
/// and the payload bytes follow. Plans without a header materialize as a
/// plain byte copy.
///
/// Transport failures surface immediately; retry policy belongs to the
/// [`RangeRead`] implementation, not here.
///
/// # Example
///
/// ```
/// use fastaslice::{materialize, MemoryObject, PartitionPlan};
///
/// # fn main() -> fastaslice::Result<()> {
/// let object = MemoryObject::new(b">seq01\nACGT\n>seq02\nGGGG\n".to_vec());
/// let plan = PartitionPlan {
///     range_start: 8,
///     range_end: 12,
///     in_sequence_offset: 1,
///     header_range: Some((0, 7)),
/// };
/// assert_eq!(materialize(&object, &plan)?, b">seq01 offset=1\nCGT\n");
/// # Ok(())
/// # }
/// ```
pub fn materialize<S: RangeRead>(source: &S, plan: &PartitionPlan) -> Result<Vec<u8>> {
    let payload = source.read_range(plan.range_start, plan.range_end)?;

    let (header_start, header_end) = match plan.header_range {
        // Already begins with its own header, or is a headerless byte run
        None => return Ok(payload.to_vec()),
        Some(range) => range,
    };

    let header = source.read_range(header_start, header_end)?;
    let header_line = header.strip_suffix(b"\n").unwrap_or(&header);

    let annotation = format!(" offset={}", plan.in_sequence_offset);
    let mut fragment =
        Vec::with_capacity(header_line.len() + annotation.len() + 1 + payload.len());
    fragment.extend_from_slice(header_line);
    fragment.extend_from_slice(annotation.as_bytes());
    fragment.push(b'\n');
    fragment.extend_from_slice(&payload);

    Ok(fragment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemoryObject;

    const SAMPLE: &[u8] = b">seq01\nACGT\n>seq02\nGGGG\n";

    #[test]
    fn test_plain_copy_without_header() {
        let object = MemoryObject::new(SAMPLE.to_vec());
        let plan = PartitionPlan {
            range_start: 0,
            range_end: 12,
            in_sequence_offset: 0,
            header_range: None,
        };

        assert_eq!(materialize(&object, &plan).unwrap(), b">seq01\nACGT\n");
    }

    #[test]
    fn test_header_resynthesis_with_offset_token() {
        let object = MemoryObject::new(SAMPLE.to_vec());
        let plan = PartitionPlan {
            range_start: 9,
            range_end: 12,
            in_sequence_offset: 2,
            header_range: Some((0, 7)),
        };

        let fragment = materialize(&object, &plan).unwrap();
        assert_eq!(fragment, b">seq01 offset=2\nGT\n");

        // First line is a header carrying the annotation
        let first_line = fragment.split(|&b| b == b'\n').next().unwrap();
        assert!(first_line.starts_with(b">"));
        assert!(first_line.ends_with(b" offset=2"));
    }

    #[test]
    fn test_empty_range_with_header_yields_bare_header() {
        let object = MemoryObject::new(SAMPLE.to_vec());
        let plan = PartitionPlan {
            range_start: 24,
            range_end: 24,
            in_sequence_offset: 5,
            header_range: Some((12, 19)),
        };

        assert_eq!(materialize(&object, &plan).unwrap(), b">seq02 offset=5\n");
    }

    #[test]
    fn test_empty_plan_without_header() {
        let object = MemoryObject::new(SAMPLE.to_vec());
        let plan = PartitionPlan {
            range_start: 24,
            range_end: 24,
            in_sequence_offset: 0,
            header_range: None,
        };

        assert!(materialize(&object, &plan).unwrap().is_empty());
    }
}
