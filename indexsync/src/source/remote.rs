use crate::client::SearchClient;
use crate::error::SyncResult;
use crate::source::{BrowsePage, SourceIndex};

/// A source index hosted on the remote search service.
#[derive(Debug, Clone)]
pub struct RemoteSourceIndex {
    client: SearchClient,
    index: String,
}

impl RemoteSourceIndex {
    /// Creates a handle to the named index.
    pub fn new(client: SearchClient, index: impl Into<String>) -> Self {
        Self {
            client,
            index: index.into(),
        }
    }
}

impl SourceIndex for RemoteSourceIndex {
    fn name(&self) -> &str {
        &self.index
    }

    async fn browse_page(&self, cursor: Option<String>) -> SyncResult<BrowsePage> {
        self.client.browse(&self.index, cursor).await
    }
}
