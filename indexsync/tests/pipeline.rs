use indexsync::destination::memory::MemoryDestination;
use indexsync::error::ErrorKind;
use indexsync::pipeline::MergePipeline;
use indexsync::source::memory::MemorySource;
use indexsync::test_utils::faulty::{FaultyDestination, FaultySource};
use indexsync::test_utils::records::docs_records;
use indexsync::types::Record;
use indexsync_config::shared::BatchConfig;
use indexsync_telemetry::tracing::init_test_tracing;

fn batch(max_size: usize) -> BatchConfig {
    BatchConfig { max_size }
}

fn object_ids(records: &[Record]) -> Vec<String> {
    records
        .iter()
        .map(|record| record.object_id().to_string())
        .collect()
}

#[tokio::test(flavor = "multi_thread")]
async fn aggregated_length_is_the_sum_of_source_counts() {
    init_test_tracing();

    let sources = vec![
        MemorySource::new("rover", docs_records("rover", 2)).with_page_size(1),
        MemorySource::new("studio", docs_records("studio", 3)).with_page_size(2),
        MemorySource::new("federation", docs_records("federation", 0)),
    ];
    let destination = MemoryDestination::new();

    let report = MergePipeline::new(sources, destination.clone(), batch(1000))
        .run()
        .await
        .unwrap();

    assert_eq!(report.sources, 3);
    assert_eq!(report.fetched, 5);
    assert_eq!(report.published, 5);
    assert_eq!(destination.object_count().await, 5);
}

#[tokio::test(flavor = "multi_thread")]
async fn aggregation_follows_configuration_order_not_completion_order() {
    init_test_tracing();

    // Small pages force multiple browse round trips per source, so source
    // fetches genuinely interleave before the aggregation joins them.
    let rover = docs_records("rover", 7);
    let studio = docs_records("studio", 4);
    let sources = vec![
        MemorySource::new("rover", rover.clone()).with_page_size(2),
        MemorySource::new("studio", studio.clone()).with_page_size(3),
    ];
    let destination = MemoryDestination::new();

    MergePipeline::new(sources, destination.clone(), batch(1000))
        .run()
        .await
        .unwrap();

    let writes = destination.writes().await;
    assert_eq!(writes.len(), 1);

    let mut expected = object_ids(&rover);
    expected.extend(object_ids(&studio));
    assert_eq!(writes[0], expected);
}

#[tokio::test(flavor = "multi_thread")]
async fn publisher_partitions_into_bounded_ordered_batches() {
    init_test_tracing();

    let records = docs_records("docs", 250);
    let sources = vec![MemorySource::new("docs", records.clone()).with_page_size(40)];
    let destination = MemoryDestination::new();

    let report = MergePipeline::new(sources, destination.clone(), batch(100))
        .run()
        .await
        .unwrap();

    assert_eq!(report.batches, 3);
    assert_eq!(report.published, 250);

    let mut writes = destination.writes().await;
    assert_eq!(writes.len(), 3);
    assert!(writes.iter().all(|write| write.len() <= 100));
    assert_eq!(writes.iter().map(Vec::len).sum::<usize>(), 250);

    // Batches complete in arbitrary order; reassembling them by their first
    // object id must reproduce the aggregated sequence exactly.
    writes.sort_by(|a, b| a[0].cmp(&b[0]));
    let round_tripped: Vec<String> = writes.into_iter().flatten().collect();
    assert_eq!(round_tripped, object_ids(&records));
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_sources_contribute_zero_records_without_error() {
    init_test_tracing();

    let sources = vec![
        MemorySource::new("rover", docs_records("rover", 5)),
        MemorySource::new("studio", vec![]),
        MemorySource::new("federation", docs_records("federation", 7)),
    ];
    let destination = MemoryDestination::new();

    let report = MergePipeline::new(sources, destination.clone(), batch(1000))
        .run()
        .await
        .unwrap();

    assert_eq!(report.fetched, 12);
    assert_eq!(report.published, 12);
    assert_eq!(destination.object_count().await, 12);
}

#[tokio::test(flavor = "multi_thread")]
async fn three_source_merge_fills_four_exact_batches() {
    init_test_tracing();

    let sources = vec![
        MemorySource::new("rover", docs_records("rover", 1500)).with_page_size(400),
        MemorySource::new("studio", docs_records("studio", 0)),
        MemorySource::new("federation", docs_records("federation", 2500)).with_page_size(700),
    ];
    let destination = MemoryDestination::new();

    let report = MergePipeline::new(sources, destination.clone(), batch(1000))
        .run()
        .await
        .unwrap();

    assert_eq!(report.fetched, 4000);
    assert_eq!(report.batches, 4);
    assert_eq!(report.published, 4000);

    let sizes = destination.batch_sizes().await;
    assert_eq!(sizes.len(), 4);
    assert!(sizes.iter().all(|&size| size == 1000));
    assert_eq!(destination.object_count().await, 4000);
}

#[tokio::test(flavor = "multi_thread")]
async fn a_sequence_just_under_the_limit_is_published_as_one_batch() {
    init_test_tracing();

    let sources = vec![MemorySource::new("docs", docs_records("docs", 999))];
    let destination = MemoryDestination::new();

    let report = MergePipeline::new(sources, destination.clone(), batch(1000))
        .run()
        .await
        .unwrap();

    assert_eq!(report.batches, 1);
    assert_eq!(report.published, 999);
    assert_eq!(destination.batch_sizes().await, vec![999]);
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_batch_write_never_overcounts() {
    init_test_tracing();

    let sources = vec![MemorySource::new("docs", docs_records("docs", 3000)).with_page_size(500)];
    let memory = MemoryDestination::new();
    // Poisoning an id in the middle batch fails exactly one of the three
    // concurrent writes.
    let destination = FaultyDestination::new(memory.clone(), "docs-01500");

    let err = MergePipeline::new(sources, destination, batch(1000))
        .run()
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RequestFailed);

    // The rejected batch must not be visible at the destination, and only
    // complete batches may be.
    let objects = memory.objects().await;
    for index in 1000..2000 {
        assert!(!objects.contains_key(&format!("docs-{index:05}")));
    }
    assert!(objects.len() <= 2000);
    assert!(memory.batch_sizes().await.iter().all(|&size| size == 1000));
}

#[tokio::test(flavor = "multi_thread")]
async fn fetch_failure_aborts_the_run_before_any_write() {
    init_test_tracing();

    // The first source never reaches its failure page; the second fails on
    // its second page, mid-pagination.
    let sources = vec![
        FaultySource::new("rover", docs_records("rover", 40), 10, usize::MAX),
        FaultySource::new("studio", docs_records("studio", 40), 10, 1),
    ];
    let destination = MemoryDestination::new();

    let err = MergePipeline::new(sources, destination.clone(), batch(1000))
        .run()
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConnectionFailed);

    assert!(destination.writes().await.is_empty());
    assert_eq!(destination.object_count().await, 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn duplicate_ids_across_sources_are_kept_and_upserted_in_write_order() {
    init_test_tracing();

    let first = Record::new("shared-00000").with_field("origin", "rover");
    let second = Record::new("shared-00000").with_field("origin", "studio");
    let sources = vec![
        MemorySource::new("rover", vec![first]),
        MemorySource::new("studio", vec![second.clone()]),
    ];
    let destination = MemoryDestination::new();

    let report = MergePipeline::new(sources, destination.clone(), batch(1000))
        .run()
        .await
        .unwrap();

    // Both entries flow through the pipeline; the destination keeps the one
    // written later within the single batch.
    assert_eq!(report.fetched, 2);
    assert_eq!(report.published, 2);
    assert_eq!(destination.object_count().await, 1);
    assert_eq!(
        destination.objects().await.get("shared-00000"),
        Some(&second)
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn an_empty_run_publishes_nothing() {
    init_test_tracing();

    let sources = vec![
        MemorySource::new("rover", vec![]),
        MemorySource::new("studio", vec![]),
    ];
    let destination = MemoryDestination::new();

    let report = MergePipeline::new(sources, destination.clone(), batch(1000))
        .run()
        .await
        .unwrap();

    assert_eq!(report.fetched, 0);
    assert_eq!(report.batches, 0);
    assert_eq!(report.published, 0);
    assert!(destination.writes().await.is_empty());
}
