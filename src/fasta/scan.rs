//! Boundary scanning over one byte window of the source object
//!
//! # Algorithm
//!
//! A window is an arbitrary byte slice of the source file starting at a
//! known global offset. [`scan_window`] locates every header line inside it:
//! a `>` sigil followed by at least one non-newline byte, greedily consumed
//! through the line's terminating newline. Each hit becomes a
//! [`RecordBoundary`] in global offsets.
//!
//! Windows are cut without regard to record layout, so the last header in a
//! window may be truncated at the window's edge. Such a match is provisional:
//! it is discarded and re-resolved by reading forward from the sigil through
//! the injected [`RangeRead`] source until the newline is found. This keeps
//! every window's output fully resolved no matter where the window was cut,
//! at the cost of at most one supplementary read per window.
//!
//! A bare sigil followed immediately by a newline (or by end-of-file) has no
//! identifier and is not a record boundary.

use crate::error::{FastaSliceError, Result};
use crate::io::RangeRead;
use crate::types::RecordBoundary;

/// Read granularity of the supplementary boundary resolution
pub const RESOLVE_CHUNK_SIZE: u64 = 64 * 1024;

/// Upper bound on a header line's length
///
/// The supplementary read scans forward until it finds a newline; input with
/// a longer headerless run is treated as malformed rather than read without
/// bound.
pub const MAX_HEADER_LINE: u64 = 1024 * 1024;

/// Scan one window of the source for record boundaries
///
/// `data` covers `[window_offset, window_offset + data.len())` of the source
/// object. Returned boundaries are in global offsets, ordered by
/// `header_start`. `source` is only consulted when the window's final header
/// is truncated at the window edge.
///
/// # Example
///
/// ```
/// use fastaslice::{scan_window, MemoryObject, RecordBoundary};
///
/// # fn main() -> fastaslice::Result<()> {
/// let object = MemoryObject::new(b">seq01\nACGT\n>seq02\nGGGG\n".to_vec());
/// let boundaries = scan_window(&object, b">seq01\nACGT\n>seq02\nGGGG\n", 0)?;
/// assert_eq!(
///     boundaries,
///     vec![RecordBoundary::new(0, 7), RecordBoundary::new(12, 19)]
/// );
/// # Ok(())
/// # }
/// ```
pub fn scan_window<S: RangeRead>(
    source: &S,
    data: &[u8],
    window_offset: u64,
) -> Result<Vec<RecordBoundary>> {
    let mut boundaries = Vec::new();
    let mut pos = 0usize;

    while let Some(rel) = find_byte(b'>', &data[pos..]) {
        let start = pos + rel;
        let header_start = window_offset + start as u64;

        if start + 1 == data.len() {
            // The sigil is the window's final byte; whether it begins a
            // record depends on bytes in the next window
            if let Some(boundary) = resolve_truncated(source, header_start)? {
                boundaries.push(boundary);
            }
            break;
        }

        if data[start + 1] == b'\n' {
            // Bare sigil with no identifier, not a record
            pos = start + 1;
            continue;
        }

        match find_byte(b'\n', &data[start + 1..]) {
            Some(nl) => {
                let end = start + 1 + nl + 1;
                boundaries.push(RecordBoundary::new(header_start, window_offset + end as u64));
                pos = end;
            }
            None => {
                // Header line runs past the window edge
                if let Some(boundary) = resolve_truncated(source, header_start)? {
                    boundaries.push(boundary);
                }
                break;
            }
        }
    }

    Ok(boundaries)
}

fn find_byte(needle: u8, haystack: &[u8]) -> Option<usize> {
    haystack.iter().position(|&b| b == needle)
}

/// Re-read a header line truncated at a window edge, scanning forward from
/// the sigil until its newline
///
/// Returns `None` when the resolved line turns out to be a bare sigil. When
/// the file ends before any newline, the header is the file's final line and
/// the payload offset resolves to end-of-file.
fn resolve_truncated<S: RangeRead>(source: &S, header_start: u64) -> Result<Option<RecordBoundary>> {
    let mut line_len = 0u64;
    let mut pos = header_start;

    loop {
        let chunk = source.read_range(pos, pos + RESOLVE_CHUNK_SIZE)?;

        if chunk.is_empty() {
            // End of file before any newline
            if line_len <= 1 {
                return Ok(None);
            }
            return Ok(Some(RecordBoundary::new(header_start, header_start + line_len)));
        }

        if let Some(nl) = find_byte(b'\n', &chunk) {
            line_len += nl as u64;
            if line_len <= 1 {
                return Ok(None);
            }
            return Ok(Some(RecordBoundary::new(
                header_start,
                header_start + line_len + 1,
            )));
        }

        line_len += chunk.len() as u64;
        if line_len > MAX_HEADER_LINE {
            return Err(FastaSliceError::MalformedInput {
                msg: format!(
                    "no newline within {} bytes of header at offset {}",
                    MAX_HEADER_LINE, header_start
                ),
            });
        }
        pos += chunk.len() as u64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemoryObject;

    fn scan_all(data: &[u8]) -> Vec<RecordBoundary> {
        let object = MemoryObject::new(data.to_vec());
        scan_window(&object, data, 0).unwrap()
    }

    fn scan_split(data: &[u8], cut: usize) -> Vec<RecordBoundary> {
        let object = MemoryObject::new(data.to_vec());
        let mut boundaries = scan_window(&object, &data[..cut], 0).unwrap();
        boundaries.extend(scan_window(&object, &data[cut..], cut as u64).unwrap());
        boundaries
    }

    #[test]
    fn test_two_records_one_window() {
        let boundaries = scan_all(b">seq01\nACGT\n>seq02\nGGGG\n");
        assert_eq!(
            boundaries,
            vec![RecordBoundary::new(0, 7), RecordBoundary::new(12, 19)]
        );
    }

    #[test]
    fn test_no_records() {
        assert!(scan_all(b"ACGT\nGGGG\n").is_empty());
        assert!(scan_all(b"").is_empty());
    }

    #[test]
    fn test_truncated_header_resolved_through_source() {
        let data = b">seq01\nACGT\n>seq02\nGGGG\n";
        let object = MemoryObject::new(data.to_vec());

        // The window ends in the middle of the first header line
        let boundaries = scan_window(&object, &data[..3], 0).unwrap();
        assert_eq!(boundaries, vec![RecordBoundary::new(0, 7)]);
    }

    #[test]
    fn test_split_at_every_byte_recovers_same_index() {
        let data = b">seq01\nACGT\n>seq02 assembly v2\nGGGG\nTTTT\n";
        let expected = scan_all(data);
        assert_eq!(expected.len(), 2);

        for cut in 0..=data.len() {
            assert_eq!(scan_split(data, cut), expected, "cut at byte {}", cut);
        }
    }

    #[test]
    fn test_sigil_as_final_window_byte() {
        let data = b">seq01\nAC\n>seq02\nGG\n";
        let object = MemoryObject::new(data.to_vec());

        // Window ends right after the second record's sigil
        let mut boundaries = scan_window(&object, &data[..11], 0).unwrap();
        boundaries.extend(scan_window(&object, &data[11..], 11).unwrap());

        assert_eq!(boundaries, scan_all(data));
        assert_eq!(
            boundaries,
            vec![RecordBoundary::new(0, 7), RecordBoundary::new(10, 17)]
        );
    }

    #[test]
    fn test_header_without_newline_at_eof() {
        // The final header is the file's last line; payload start resolves
        // to end-of-file
        let boundaries = scan_all(b">seq01\nACGT\n>last");
        assert_eq!(
            boundaries,
            vec![RecordBoundary::new(0, 7), RecordBoundary::new(12, 17)]
        );
    }

    #[test]
    fn test_bare_sigil_is_not_a_record() {
        assert_eq!(scan_all(b">\n>ok\nAC\n"), vec![RecordBoundary::new(2, 6)]);
        // Bare sigil at end-of-file
        assert_eq!(scan_all(b">ok\nAC\n>"), vec![RecordBoundary::new(0, 4)]);
    }

    #[test]
    fn test_bare_sigil_split_at_window_edge() {
        let data = b">a\nCC\n>\nGG\n";
        let expected = scan_all(data);
        assert_eq!(expected, vec![RecordBoundary::new(0, 3)]);

        // Cut right after the bare sigil: the provisional match resolves to
        // an empty header and is discarded, same as the unsplit scan
        assert_eq!(scan_split(data, 7), expected);
    }

    #[test]
    fn test_unterminated_header_exceeding_ceiling() {
        let mut data = vec![b'>'];
        data.extend(std::iter::repeat(b'A').take(2 * 1024 * 1024));
        let object = MemoryObject::new(data.clone());

        let result = scan_window(&object, &data[..16], 0);
        assert!(matches!(
            result,
            Err(FastaSliceError::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_nonzero_window_offset() {
        let data = b">seq01\nACGT\n>seq02\nGGGG\n";
        let object = MemoryObject::new(data.to_vec());

        let boundaries = scan_window(&object, &data[12..], 12).unwrap();
        assert_eq!(boundaries, vec![RecordBoundary::new(12, 19)]);
    }

    // Property-based tests
    use proptest::prelude::*;

    fn fasta_text() -> impl Strategy<Value = Vec<u8>> {
        prop::collection::vec(("[A-Za-z0-9_]{1,12}", "[ACGTN]{0,40}"), 1..8).prop_map(|records| {
            let mut text = Vec::new();
            for (id, seq) in records {
                text.extend_from_slice(b">");
                text.extend_from_slice(id.as_bytes());
                text.push(b'\n');
                for line in seq.as_bytes().chunks(10) {
                    text.extend_from_slice(line);
                    text.push(b'\n');
                }
            }
            text
        })
    }

    proptest! {
        /// Scanning contiguous windows of any size yields the same index as
        /// scanning the whole file as one window
        #[test]
        fn test_window_placement_invariance(
            data in fasta_text(),
            window_size in 1usize..64,
        ) {
            let object = MemoryObject::new(data.clone());
            let expected = scan_window(&object, &data, 0).unwrap();

            let mut boundaries = Vec::new();
            let mut offset = 0usize;
            while offset < data.len() {
                let end = (offset + window_size).min(data.len());
                boundaries.extend(
                    scan_window(&object, &data[offset..end], offset as u64).unwrap(),
                );
                offset = end;
            }

            prop_assert_eq!(boundaries, expected);
        }

        /// Every boundary points at a sigil, and payload starts right after
        /// the header line's newline
        #[test]
        fn test_boundaries_are_well_formed(data in fasta_text()) {
            let object = MemoryObject::new(data.clone());
            let boundaries = scan_window(&object, &data, 0).unwrap();

            for b in &boundaries {
                prop_assert!(b.header_start < b.sequence_start);
                prop_assert_eq!(data[b.header_start as usize], b'>');
                prop_assert_eq!(data[b.sequence_start as usize - 1], b'\n');
            }
        }
    }
}
