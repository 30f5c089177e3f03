//! fastaslice: record-aligned partitioning of range-readable FASTA objects
//!
//! # Overview
//!
//! fastaslice splits a large FASTA file stored as an opaque, range-readable
//! byte blob into N roughly equal partitions that are each valid,
//! self-describing FASTA fragments. It first builds a compact index of
//! record boundaries by scanning byte windows of the object, then plans byte
//! ranges aligned to those boundaries, so parallel workers can fetch their
//! partitions independently without ever scanning the file from the start
//! to find a safe cut point.
//!
//! The pipeline runs in four stages, each independently parallelizable
//! where it matters:
//!
//! 1. [`scan_window`] finds record boundaries inside one byte window,
//!    resolving headers cut at the window edge with a supplementary read
//!    (one scan per window, no shared state).
//! 2. [`SequenceIndex::from_windows`] merges per-window boundary lists, in
//!    window order, into one immutable index.
//! 3. [`plan_partitions`] maps a requested partition count to byte ranges
//!    aligned to record boundaries, with reconstruction metadata for ranges
//!    that begin mid-sequence (pure computation, no I/O).
//! 4. [`materialize`] fetches one planned range and stitches it into a
//!    self-describing fragment, re-synthesizing the record header when the
//!    partition starts mid-sequence (one call per partition).
//!
//! All reads go through the [`RangeRead`] capability, so the same pipeline
//! runs against an HTTP object store ([`HttpObject`], `network` feature) or
//! an in-memory buffer ([`MemoryObject`]).
//!
//! ## Quick Start
//!
//! ```
//! use fastaslice::{build_index, materialize, plan_partitions, MemoryObject, RangeRead};
//!
//! # fn main() -> fastaslice::Result<()> {
//! let object = MemoryObject::new(b">seq01\nACGT\n>seq02\nGGGG\n".to_vec());
//!
//! // Preprocessing pass: windowed scan, merged into one index
//! let index = build_index(&object, 8)?;
//! assert_eq!(index.record_count(), 2);
//!
//! // Plan two record-aligned partitions and fetch them independently
//! let plans = plan_partitions(&index, object.size()?, 2)?;
//! for plan in &plans {
//!     let fragment = materialize(&object, plan)?;
//!     assert!(fragment.starts_with(b">"));
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`fasta`]: boundary scanning, index merge/persistence, partition
//!   planning, fragment materialization
//! - [`io`]: the [`RangeRead`] capability and its in-memory and HTTP
//!   implementations
//! - [`types`]: [`RecordBoundary`] and [`PartitionPlan`] data types
//! - [`error`]: error taxonomy and the crate [`Result`] alias

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod fasta;
pub mod io;
pub mod types;

// Re-export commonly used types
pub use error::{FastaSliceError, Result};
pub use fasta::{build_index, materialize, plan_partitions, scan_window, SequenceIndex};
pub use io::{MemoryObject, RangeRead};
pub use types::{PartitionPlan, RecordBoundary};

#[cfg(feature = "network")]
pub use io::HttpObject;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
