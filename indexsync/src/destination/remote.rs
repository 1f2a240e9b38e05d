use tracing::debug;

use crate::client::SearchClient;
use crate::destination::Destination;
use crate::error::SyncResult;
use crate::types::Record;

/// A destination index hosted on the remote search service.
///
/// Each batch write is submitted through the service's batch endpoint and
/// then polled until the corresponding indexing task is published, so a
/// resolved write is durable.
#[derive(Debug, Clone)]
pub struct RemoteDestinationIndex {
    client: SearchClient,
    index: String,
}

impl RemoteDestinationIndex {
    /// Creates a handle to the named index.
    pub fn new(client: SearchClient, index: impl Into<String>) -> Self {
        Self {
            client,
            index: index.into(),
        }
    }
}

impl Destination for RemoteDestinationIndex {
    fn name(&self) -> &str {
        &self.index
    }

    async fn write_batch(&self, records: Vec<Record>) -> SyncResult<()> {
        let task_id = self.client.save_objects(&self.index, &records).await?;
        self.client.wait_task(&self.index, task_id).await?;

        debug!(index = %self.index, records = records.len(), "batch published");

        Ok(())
    }
}
