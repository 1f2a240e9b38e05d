use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use crate::destination::Destination;
use crate::error::SyncResult;
use crate::types::Record;

#[derive(Debug)]
struct Inner {
    objects: HashMap<String, Record>,
    writes: Vec<Vec<String>>,
}

/// In-memory destination for testing and development purposes.
///
/// [`MemoryDestination`] upserts records by object id, mirroring the remote
/// destination's last-write-wins semantics, and additionally records the
/// ordered object ids of every batch write so tests can assert batch count,
/// batch sizes, and order preservation. All data is lost when the process
/// terminates.
///
/// It is also selectable as a real destination via configuration, which
/// turns a run into a dry run: sources are fetched and aggregated but
/// nothing leaves the process.
#[derive(Debug, Clone)]
pub struct MemoryDestination {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryDestination {
    /// Creates a new empty memory destination.
    pub fn new() -> Self {
        let inner = Inner {
            objects: HashMap::new(),
            writes: Vec::new(),
        };

        Self {
            inner: Arc::new(Mutex::new(inner)),
        }
    }

    /// Returns a copy of all stored records, keyed by object id.
    pub async fn objects(&self) -> HashMap<String, Record> {
        let inner = self.inner.lock().await;
        inner.objects.clone()
    }

    /// Returns the number of distinct records stored.
    pub async fn object_count(&self) -> usize {
        let inner = self.inner.lock().await;
        inner.objects.len()
    }

    /// Returns the ordered object ids of every batch write, in completion
    /// order.
    pub async fn writes(&self) -> Vec<Vec<String>> {
        let inner = self.inner.lock().await;
        inner.writes.clone()
    }

    /// Returns the size of every batch write, in completion order.
    pub async fn batch_sizes(&self) -> Vec<usize> {
        let inner = self.inner.lock().await;
        inner.writes.iter().map(|write| write.len()).collect()
    }

    /// Clears all stored records and recorded writes.
    pub async fn clear(&self) {
        let mut inner = self.inner.lock().await;
        inner.objects.clear();
        inner.writes.clear();
    }
}

impl Default for MemoryDestination {
    fn default() -> Self {
        Self::new()
    }
}

impl Destination for MemoryDestination {
    fn name(&self) -> &str {
        "memory"
    }

    async fn write_batch(&self, records: Vec<Record>) -> SyncResult<()> {
        let mut inner = self.inner.lock().await;

        info!("writing a batch of {} records", records.len());

        inner
            .writes
            .push(records.iter().map(|r| r.object_id().to_string()).collect());
        for record in records {
            inner.objects.insert(record.object_id().to_string(), record);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::records::docs_record;

    #[tokio::test]
    async fn records_are_upserted_by_object_id() {
        let destination = MemoryDestination::new();

        let first = docs_record("docs", 1).with_field("revision", 1);
        let second = docs_record("docs", 1).with_field("revision", 2);

        destination.write_batch(vec![first]).await.unwrap();
        destination.write_batch(vec![second.clone()]).await.unwrap();

        assert_eq!(destination.object_count().await, 1);
        let objects = destination.objects().await;
        assert_eq!(objects.get("docs-00001"), Some(&second));
    }

    #[tokio::test]
    async fn batch_writes_are_recorded_in_order_of_contents() {
        let destination = MemoryDestination::new();

        destination
            .write_batch(vec![docs_record("a", 0), docs_record("a", 1)])
            .await
            .unwrap();
        destination.write_batch(vec![docs_record("b", 0)]).await.unwrap();

        assert_eq!(destination.batch_sizes().await, vec![2, 1]);
        assert_eq!(
            destination.writes().await[0],
            vec!["a-00000".to_string(), "a-00001".to_string()]
        );
    }
}
