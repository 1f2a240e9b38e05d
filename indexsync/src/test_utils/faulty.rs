use std::sync::Arc;

use crate::bail;
use crate::destination::Destination;
use crate::error::{ErrorKind, SyncResult};
use crate::source::{BrowsePage, SourceIndex, memory::MemorySource};
use crate::types::Record;

/// Destination wrapper that rejects any batch containing a poisoned object
/// id.
///
/// Other batches pass through to the wrapped destination untouched. Because
/// the failure is tied to batch contents rather than call order, partial
/// publish failures stay deterministic even though batches are written
/// concurrently.
#[derive(Debug, Clone)]
pub struct FaultyDestination<D> {
    wrapped: D,
    poisoned_object_id: Arc<str>,
}

impl<D> FaultyDestination<D> {
    /// Wraps a destination, poisoning the given object id.
    pub fn new(wrapped: D, poisoned_object_id: &str) -> Self {
        Self {
            wrapped,
            poisoned_object_id: Arc::from(poisoned_object_id),
        }
    }
}

impl<D> Destination for FaultyDestination<D>
where
    D: Destination + Send + Sync,
{
    fn name(&self) -> &str {
        "faulty"
    }

    async fn write_batch(&self, records: Vec<Record>) -> SyncResult<()> {
        if records
            .iter()
            .any(|record| record.object_id() == &*self.poisoned_object_id)
        {
            bail!(
                ErrorKind::RequestFailed,
                "Batch write rejected",
                format!("batch contains poisoned object `{}`", self.poisoned_object_id)
            );
        }

        self.wrapped.write_batch(records).await
    }
}

/// Source that fails partway through pagination.
///
/// Serves records like a [`MemorySource`] until the configured page number
/// is requested, then errors. Used to verify that a source failing
/// mid-pagination aborts the run without contributing partial results.
#[derive(Debug, Clone)]
pub struct FaultySource {
    inner: MemorySource,
    page_size: usize,
    fail_at_page: usize,
}

impl FaultySource {
    /// Creates a source of `records` split into `page_size` pages that fails
    /// when the zero-based `fail_at_page` is requested.
    pub fn new(
        name: &str,
        records: Vec<Record>,
        page_size: usize,
        fail_at_page: usize,
    ) -> Self {
        let page_size = page_size.max(1);
        Self {
            inner: MemorySource::new(name, records).with_page_size(page_size),
            page_size,
            fail_at_page,
        }
    }
}

impl SourceIndex for FaultySource {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn browse_page(&self, cursor: Option<String>) -> SyncResult<BrowsePage> {
        let page = match &cursor {
            Some(cursor) => cursor.parse::<usize>().unwrap_or(0) / self.page_size,
            None => 0,
        };

        if page == self.fail_at_page {
            bail!(
                ErrorKind::ConnectionFailed,
                "Source browse failed",
                format!("injected failure on page {page} of `{}`", self.name())
            );
        }

        self.inner.browse_page(cursor).await
    }
}
