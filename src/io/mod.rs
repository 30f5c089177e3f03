//! I/O module: object-store access
//!
//! Everything the pipeline reads goes through the [`RangeRead`] capability,
//! so the core stages stay independent of where the object actually lives.

mod store;

pub use store::{MemoryObject, RangeRead};

#[cfg(feature = "network")]
pub mod network;
#[cfg(feature = "network")]
pub use network::HttpObject;
