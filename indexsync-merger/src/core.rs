//! Pipeline assembly and dispatch for the merger process.

use indexsync::client::SearchClient;
use indexsync::destination::Destination;
use indexsync::destination::memory::MemoryDestination;
use indexsync::destination::remote::RemoteDestinationIndex;
use indexsync::pipeline::MergePipeline;
use indexsync::source::SourceIndex;
use indexsync::source::remote::RemoteSourceIndex;
use indexsync_config::shared::{BatchConfig, DestinationConfig, MergerConfig};
use tracing::info;

use crate::error::MergerResult;

/// Builds the pipeline from configuration and runs it to completion.
///
/// Source handles are created for every configured index on the shared
/// search client; the destination is dispatched statically on its
/// configuration variant.
pub async fn start_merger(config: MergerConfig) -> MergerResult<()> {
    let client = SearchClient::new(&config.connection)?;

    let sources: Vec<RemoteSourceIndex> = config
        .merge
        .source_indexes
        .iter()
        .map(|index| RemoteSourceIndex::new(client.clone(), index.clone()))
        .collect();

    match &config.destination {
        DestinationConfig::Memory => {
            info!("using in-memory destination, records will not leave the process");
            let destination = MemoryDestination::new();

            run_pipeline(sources, destination, config.merge.batch.clone()).await
        }
        DestinationConfig::Index { name } => {
            let destination = RemoteDestinationIndex::new(client.clone(), name.clone());

            run_pipeline(sources, destination, config.merge.batch.clone()).await
        }
    }
}

/// Runs one pipeline pass and logs the resulting report.
async fn run_pipeline<S, D>(sources: Vec<S>, destination: D, batch: BatchConfig) -> MergerResult<()>
where
    S: SourceIndex + Clone + Send + Sync + 'static,
    D: Destination + Clone + Send + Sync + 'static,
{
    let pipeline = MergePipeline::new(sources, destination, batch);
    let report = pipeline.run().await?;

    info!(
        sources = report.sources,
        batches = report.batches,
        "index merge complete, {} records merged",
        report.published
    );

    Ok(())
}
