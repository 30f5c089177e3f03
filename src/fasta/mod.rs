//! FASTA boundary indexing and record-aligned partitioning
//!
//! The four pipeline stages live here, one per module:
//!
//! - [`scan_window`] finds record boundaries in one byte window, resolving
//!   headers cut at the window edge
//! - [`SequenceIndex`] merges per-window results, persists to the 32-bit
//!   wire layout, and answers governing-record lookups
//! - [`plan_partitions`] aligns a candidate partition grid to record
//!   boundaries
//! - [`materialize`] fetches one planned range and stitches it into a valid
//!   fragment

mod fragment;
mod index;
mod partition;
mod scan;

pub use fragment::materialize;
pub use index::{build_index, SequenceIndex};
pub use partition::plan_partitions;
pub use scan::{scan_window, MAX_HEADER_LINE, RESOLVE_CHUNK_SIZE};
