use serde::{Deserialize, Serialize};

use crate::shared::ValidationError;

/// Batch sizing configuration for destination writes.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BatchConfig {
    /// Maximum number of records submitted in a single destination write.
    #[serde(default = "default_batch_max_size")]
    pub max_size: usize,
}

impl BatchConfig {
    /// Default maximum batch size, matching the destination API's per-request
    /// limit.
    pub const DEFAULT_MAX_SIZE: usize = 1000;

    /// Validates batch configuration settings.
    ///
    /// Ensures `max_size` is non-zero.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_size == 0 {
            return Err(ValidationError::BatchMaxSizeZero);
        }

        Ok(())
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_size: default_batch_max_size(),
        }
    }
}

fn default_batch_max_size() -> usize {
    BatchConfig::DEFAULT_MAX_SIZE
}
