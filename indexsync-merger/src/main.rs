//! Search index merger binary.
//!
//! One-shot process that reads every configured source index, concatenates
//! the results in configuration order, and writes them into the destination
//! index in bounded batches. Logs the total of merged records and exits zero
//! on success; any error terminates the process with a non-zero status.

use indexsync_config::shared::MergerConfig;
use indexsync_telemetry::tracing::init_tracing;
use tracing::error;

use crate::config::load_merger_config;
use crate::core::start_merger;
use crate::error::{MergerError, MergerResult};

mod config;
mod core;
mod error;

/// Entry point for the merger process.
///
/// Loads configuration, initializes tracing, starts the async runtime, and
/// runs the merge pipeline once.
fn main() -> MergerResult<()> {
    // Configuration is loaded before tracing so that a misconfigured process
    // still reports the failure on stderr.
    let merger_config = load_merger_config()?;

    let _log_flusher = init_tracing().map_err(MergerError::Config)?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async_main(merger_config))?;

    Ok(())
}

/// Main async entry point that runs the merge pipeline and reports errors.
async fn async_main(merger_config: MergerConfig) -> MergerResult<()> {
    if let Err(err) = start_merger(merger_config).await {
        error!("{err}");
        return Err(err);
    }

    Ok(())
}
