use serde::Deserialize;

use crate::Config;
use crate::shared::{BatchConfig, DestinationConfig, SearchConnectionConfig, ValidationError};

/// Merge settings: which indices to read and how to batch the writes.
#[derive(Debug, Clone, Deserialize)]
pub struct MergeConfig {
    /// Source index names, in the order their records are concatenated into
    /// the destination-bound sequence.
    pub source_indexes: Vec<String>,
    /// Batch sizing for destination writes.
    #[serde(default)]
    pub batch: BatchConfig,
}

impl MergeConfig {
    /// Validates merge settings.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.source_indexes.is_empty() {
            return Err(ValidationError::SourceIndexesEmpty);
        }

        if self.source_indexes.iter().any(|name| name.is_empty()) {
            return Err(ValidationError::SourceIndexNameEmpty);
        }

        self.batch.validate()
    }
}

/// Top-level configuration for the merger process.
#[derive(Debug, Clone, Deserialize)]
pub struct MergerConfig {
    /// Search service connection settings.
    pub connection: SearchConnectionConfig,
    /// Merge settings.
    pub merge: MergeConfig,
    /// Destination selection.
    pub destination: DestinationConfig,
}

impl MergerConfig {
    /// Validates the full merger configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.connection.validate()?;
        self.merge.validate()?;
        self.destination.validate()?;

        Ok(())
    }
}

impl Config for MergerConfig {
    const LIST_PARSE_KEYS: &'static [&'static str] = &["merge.source_indexes"];
}
