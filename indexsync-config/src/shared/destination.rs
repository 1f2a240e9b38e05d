use serde::{Deserialize, Serialize};

use crate::shared::ValidationError;

/// Destination selection for the merge pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DestinationConfig {
    /// In-memory destination. Records are fetched and aggregated but never
    /// leave the process; useful for dry runs and local development.
    Memory,
    /// A named index on the configured search service.
    Index {
        /// Name of the destination index.
        name: String,
    },
}

impl DestinationConfig {
    /// Validates the destination settings.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            DestinationConfig::Memory => Ok(()),
            DestinationConfig::Index { name } => {
                if name.is_empty() {
                    return Err(ValidationError::DestinationIndexEmpty);
                }

                Ok(())
            }
        }
    }
}
