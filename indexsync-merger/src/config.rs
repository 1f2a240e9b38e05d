use indexsync_config::load_config;
use indexsync_config::shared::MergerConfig;

use crate::error::{MergerError, MergerResult};

/// Loads and validates the merger configuration.
///
/// Uses the standard configuration loading mechanism from
/// [`indexsync_config`] and validates the resulting [`MergerConfig`] before
/// returning it.
pub fn load_merger_config() -> MergerResult<MergerConfig> {
    let config = load_config::<MergerConfig>().map_err(MergerError::config)?;
    config.validate().map_err(MergerError::config)?;

    Ok(config)
}
