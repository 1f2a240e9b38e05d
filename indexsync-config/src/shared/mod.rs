//! Shared configuration types for the index synchronizer.

mod base;
mod batch;
mod connection;
mod destination;
mod merger;

pub use base::ValidationError;
pub use batch::BatchConfig;
pub use connection::SearchConnectionConfig;
pub use destination::DestinationConfig;
pub use merger::{MergeConfig, MergerConfig};
