use std::sync::Arc;

use crate::error::{ErrorKind, SyncResult};
use crate::source::{BrowsePage, SourceIndex};
use crate::sync_error;
use crate::types::Record;

/// Default number of records served per page.
const DEFAULT_PAGE_SIZE: usize = 1000;

#[derive(Debug)]
struct Inner {
    name: String,
    records: Vec<Record>,
}

/// In-memory source index for testing and development purposes.
///
/// [`MemorySource`] serves a preloaded record set through the same cursor
/// protocol as a remote index, which makes pagination behavior observable in
/// tests. Cursors are plain record offsets.
#[derive(Debug, Clone)]
pub struct MemorySource {
    inner: Arc<Inner>,
    page_size: usize,
}

impl MemorySource {
    /// Creates a source serving the given records under the given name.
    pub fn new(name: impl Into<String>, records: Vec<Record>) -> Self {
        Self {
            inner: Arc::new(Inner {
                name: name.into(),
                records,
            }),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Overrides the page size, clamped to at least one record per page.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }
}

impl SourceIndex for MemorySource {
    fn name(&self) -> &str {
        &self.inner.name
    }

    async fn browse_page(&self, cursor: Option<String>) -> SyncResult<BrowsePage> {
        let offset = match &cursor {
            Some(cursor) => cursor.parse::<usize>().map_err(|_| {
                sync_error!(ErrorKind::InvalidData, "Invalid browse cursor", cursor)
            })?,
            None => 0,
        };

        let len = self.inner.records.len();
        let start = offset.min(len);
        let end = (start + self.page_size).min(len);

        let records = self.inner.records[start..end].to_vec();
        let cursor = (end < len).then(|| end.to_string());

        Ok(BrowsePage { records, cursor })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::records::docs_records;

    #[tokio::test]
    async fn empty_source_returns_one_final_empty_page() {
        let source = MemorySource::new("empty", vec![]);

        let page = source.browse_page(None).await.unwrap();
        assert!(page.records.is_empty());
        assert!(page.cursor.is_none());
    }

    #[tokio::test]
    async fn pagination_preserves_record_order() {
        let records = docs_records("docs", 25);
        let source = MemorySource::new("docs", records.clone()).with_page_size(10);

        let mut collected = Vec::new();
        let mut cursor = None;
        let mut pages = 0;
        loop {
            let page = source.browse_page(cursor.take()).await.unwrap();
            collected.extend(page.records);
            pages += 1;
            match page.cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        assert_eq!(pages, 3);
        assert_eq!(collected, records);
    }

    #[tokio::test]
    async fn malformed_cursor_is_rejected() {
        let source = MemorySource::new("docs", docs_records("docs", 5));

        let err = source
            .browse_page(Some("not-an-offset".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }
}
