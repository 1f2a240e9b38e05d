//! Multi-source search index synchronization.
//!
//! The crate moves records from N source indices into one destination index
//! through a three-stage pipeline: fetch every source in parallel via
//! cursor-based pagination, concatenate the per-source sequences in
//! configuration order, and publish the flat sequence as size-bounded
//! batches awaited for durability. See [`pipeline::MergePipeline`].

pub mod client;
pub mod destination;
pub mod error;
mod macros;
pub mod pipeline;
pub mod source;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod types;
