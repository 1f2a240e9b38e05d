//! Configuration loading and shared configuration types for the index
//! synchronizer.
//!
//! Configuration is assembled from a base file, an environment-specific
//! overlay, and `APP_`-prefixed environment variables, in that order of
//! precedence.

mod environment;
mod load;
pub mod shared;

pub use environment::Environment;
pub use load::{Config, LoadConfigError, load_config};
