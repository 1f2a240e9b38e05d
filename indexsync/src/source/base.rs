use std::future::Future;

use crate::error::SyncResult;
use crate::types::Record;

/// One page of records returned by a source index browse.
#[derive(Debug, Clone)]
pub struct BrowsePage {
    /// Records in this page, in source return order.
    pub records: Vec<Record>,
    /// Continuation cursor for the next page. Absent when the source is
    /// exhausted.
    pub cursor: Option<String>,
}

/// Trait for collections the synchronizer reads records from.
///
/// [`SourceIndex`] implementations expose the complete contents of a named
/// collection through cursor-based pagination. The synchronizer only ever
/// reads from sources; it never writes back.
///
/// Implementations must preserve the source's return order within a page and
/// across consecutive pages, since the pipeline guarantees that per-source
/// record order survives aggregation.
pub trait SourceIndex {
    /// Returns the name of the source index.
    fn name(&self) -> &str;

    /// Fetches one page of records.
    ///
    /// Pass [`None`] to start browsing from the beginning, and the cursor
    /// returned by the previous page to continue. A page with no cursor is
    /// the last one.
    fn browse_page(
        &self,
        cursor: Option<String>,
    ) -> impl Future<Output = SyncResult<BrowsePage>> + Send;
}
