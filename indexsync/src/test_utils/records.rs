use crate::types::Record;

/// Builds one deterministic documentation-style record.
///
/// The object id has the form `{prefix}-{index:05}`, so ids sort in
/// construction order and tests can reason about which batch a record lands
/// in.
pub fn docs_record(prefix: &str, index: usize) -> Record {
    Record::new(format!("{prefix}-{index:05}"))
        .with_field("title", format!("{prefix} page {index}"))
        .with_field("url", format!("https://docs.example.com/{prefix}/{index}"))
}

/// Builds `count` deterministic records sharing a prefix.
pub fn docs_records(prefix: &str, count: usize) -> Vec<Record> {
    (0..count).map(|index| docs_record(prefix, index)).collect()
}
