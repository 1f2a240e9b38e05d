use thiserror::Error;

/// Errors returned when validating loaded configuration values.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Batch size cannot be zero.
    #[error("`batch.max_size` cannot be zero")]
    BatchMaxSizeZero,
    /// The search application id is required.
    #[error("`connection.app_id` cannot be empty")]
    AppIdEmpty,
    /// The search API key is required.
    #[error("`connection.api_key` cannot be empty")]
    ApiKeyEmpty,
    /// Per-request timeout cannot be zero.
    #[error("`connection.timeout_secs` cannot be zero")]
    TimeoutZero,
    /// At least one source index must be configured.
    #[error("`merge.source_indexes` cannot be empty")]
    SourceIndexesEmpty,
    /// A configured source index name is empty.
    #[error("`merge.source_indexes` cannot contain empty names")]
    SourceIndexNameEmpty,
    /// The destination index name is required.
    #[error("`destination.name` cannot be empty")]
    DestinationIndexEmpty,
}
