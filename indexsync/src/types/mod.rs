//! Core data types moved by the synchronization pipeline.

mod record;

pub use record::Record;
