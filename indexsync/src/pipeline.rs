//! The fetch → aggregate → publish merge pipeline.

use indexsync_config::shared::BatchConfig;
use tokio::task::JoinSet;
use tracing::{error, info};

use crate::destination::Destination;
use crate::error::{ErrorKind, SyncResult};
use crate::source::SourceIndex;
use crate::sync_error;
use crate::types::Record;

/// Summary of one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeReport {
    /// Number of source indices fetched.
    pub sources: usize,
    /// Records fetched across all sources.
    pub fetched: u64,
    /// Batches submitted to the destination.
    pub batches: u64,
    /// Records durably published. Equals `fetched` when the run succeeds.
    pub published: u64,
}

/// Merges the contents of N source indices into one destination index.
///
/// A run is a single linear pass: fetch every source in parallel, flatten
/// the per-source sequences in configuration order, then publish the flat
/// sequence as size-bounded batches. There is no resumption state; a failed
/// run is restarted from scratch.
///
/// Source and destination handles are injected at construction, so tests can
/// substitute in-memory implementations for the remote ones.
#[derive(Debug)]
pub struct MergePipeline<S, D> {
    sources: Vec<S>,
    destination: D,
    batch: BatchConfig,
}

impl<S, D> MergePipeline<S, D>
where
    S: SourceIndex + Clone + Send + Sync + 'static,
    D: Destination + Clone + Send + Sync + 'static,
{
    /// Creates a pipeline over the given sources and destination.
    ///
    /// Sources are fetched in parallel but aggregated in the order given
    /// here. `batch` is expected to have passed configuration validation.
    pub fn new(sources: Vec<S>, destination: D, batch: BatchConfig) -> Self {
        Self {
            sources,
            destination,
            batch,
        }
    }

    /// Runs the pipeline once and returns the run summary.
    ///
    /// The first unrecoverable error at any stage fails the whole run.
    /// Fetch errors surface before any destination write happens; publish
    /// errors leave already-published batches committed.
    pub async fn run(self) -> SyncResult<MergeReport> {
        let sources = self.sources.len();

        info!(sources, "fetching source indices");
        let per_source = self.fetch_all().await?;

        let fetched: u64 = per_source.iter().map(|records| records.len() as u64).sum();
        let records = aggregate(per_source);
        info!(records = records.len(), "aggregated source records");

        let batches = records.len().div_ceil(self.batch.max_size.max(1)) as u64;
        let published = self.publish(records).await?;

        Ok(MergeReport {
            sources,
            fetched,
            batches,
            published,
        })
    }

    /// Fetches every source concurrently, returning per-source record
    /// sequences in configuration order.
    async fn fetch_all(&self) -> SyncResult<Vec<Vec<Record>>> {
        let mut join_set = JoinSet::new();
        for (position, source) in self.sources.iter().enumerate() {
            let source = source.clone();
            join_set.spawn(async move { (position, fetch_source(source).await) });
        }

        // Results are slotted by configuration position so that completion
        // order cannot reorder the aggregation. Returning early on the first
        // error drops the join set, which aborts the remaining fetches.
        let mut per_source: Vec<Option<Vec<Record>>> = Vec::new();
        per_source.resize_with(self.sources.len(), || None);

        while let Some(joined) = join_set.join_next().await {
            let (position, fetched) = joined.map_err(|_| {
                sync_error!(ErrorKind::Unknown, "Failed to join source fetch task")
            })?;
            per_source[position] = Some(fetched?);
        }

        Ok(per_source
            .into_iter()
            .map(|records| records.expect("every spawned fetch reports its position"))
            .collect())
    }

    /// Publishes the aggregated sequence as concurrent batch writes and
    /// returns the number of durably published records.
    async fn publish(&self, records: Vec<Record>) -> SyncResult<u64> {
        let batches = into_batches(records, self.batch.max_size);
        let total_batches = batches.len();

        info!(
            batches = total_batches,
            max_size = self.batch.max_size,
            destination = self.destination.name(),
            "publishing batches"
        );

        let mut join_set = JoinSet::new();
        for (position, batch) in batches.into_iter().enumerate() {
            let destination = self.destination.clone();
            join_set.spawn(async move {
                let size = batch.len() as u64;
                info!("saving batch {} of {}", position + 1, total_batches);

                let result = destination.write_batch(batch).await;
                if result.is_ok() {
                    info!("batch {} of {} saved", position + 1, total_batches);
                }

                (position, size, result)
            });
        }

        let mut published = 0u64;
        while let Some(joined) = join_set.join_next().await {
            let (position, size, result) = joined.map_err(|_| {
                sync_error!(ErrorKind::Unknown, "Failed to join batch write task")
            })?;

            if let Err(err) = result {
                error!(
                    batch = position + 1,
                    total = total_batches,
                    "batch write failed, aborting remaining batches"
                );
                return Err(err);
            }

            published += size;
        }

        Ok(published)
    }
}

/// Fetches the complete contents of one source by following its browse
/// cursor until exhaustion.
async fn fetch_source<S>(source: S) -> SyncResult<Vec<Record>>
where
    S: SourceIndex,
{
    let mut records = Vec::new();
    let mut cursor = None;

    loop {
        let page = source.browse_page(cursor.take()).await?;
        records.extend(page.records);

        match page.cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    info!(
        source = source.name(),
        records = records.len(),
        "fetched source index"
    );

    Ok(records)
}

/// Concatenates per-source sequences in configuration order.
///
/// Duplicate object ids across sources are kept as separate entries; the
/// destination's upsert semantics decide the winner by write order.
fn aggregate(per_source: Vec<Vec<Record>>) -> Vec<Record> {
    per_source.into_iter().flatten().collect()
}

/// Partitions records into contiguous, order-preserving chunks of at most
/// `max_size` records.
fn into_batches(records: Vec<Record>, max_size: usize) -> Vec<Vec<Record>> {
    // A zero size would drop every record; treat it as one record per batch.
    let max_size = max_size.max(1);

    let mut batches = Vec::with_capacity(records.len().div_ceil(max_size));
    let mut records = records.into_iter();

    loop {
        let batch: Vec<Record> = records.by_ref().take(max_size).collect();
        if batch.is_empty() {
            break;
        }
        batches.push(batch);
    }

    batches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::records::docs_records;

    #[test]
    fn partitioning_issues_ceil_l_over_b_batches() {
        let batches = into_batches(docs_records("docs", 4000), 1000);
        assert_eq!(batches.len(), 4);
        assert!(batches.iter().all(|batch| batch.len() == 1000));

        let batches = into_batches(docs_records("docs", 250), 100);
        assert_eq!(
            batches.iter().map(Vec::len).collect::<Vec<_>>(),
            vec![100, 100, 50]
        );
    }

    #[test]
    fn a_sequence_below_the_limit_fits_in_one_batch() {
        let batches = into_batches(docs_records("docs", 999), 1000);
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 999);
    }

    #[test]
    fn no_records_means_no_batches() {
        assert!(into_batches(vec![], 1000).is_empty());
    }

    #[test]
    fn batch_sizes_sum_to_the_input_length() {
        let batches = into_batches(docs_records("docs", 2741), 500);
        let total: usize = batches.iter().map(Vec::len).sum();
        assert_eq!(total, 2741);
        assert!(batches.iter().all(|batch| batch.len() <= 500));
    }

    #[test]
    fn concatenating_batches_reproduces_the_input_exactly() {
        let records = docs_records("docs", 2345);
        let batches = into_batches(records.clone(), 1000);

        let round_tripped: Vec<_> = batches.into_iter().flatten().collect();
        assert_eq!(round_tripped, records);
    }

    #[test]
    fn aggregation_keeps_configuration_order_and_duplicates() {
        let first = docs_records("a", 3);
        let second = docs_records("a", 2);

        let aggregated = aggregate(vec![first.clone(), vec![], second.clone()]);
        assert_eq!(aggregated.len(), 5);
        assert_eq!(aggregated[..3], first[..]);
        assert_eq!(aggregated[3..], second[..]);
    }
}
