use std::future::Future;

use crate::error::SyncResult;
use crate::types::Record;

/// Trait for collections that receive the aggregated records.
///
/// [`Destination`] implementations upsert records keyed by their object id;
/// a record written twice overwrites its previous version. The synchronizer
/// only ever writes to destinations; there is no read-before-write
/// reconciliation.
///
/// Batches do not overlap in identifiers under normal operation, so
/// implementations may be written to concurrently by independent batch
/// writes.
pub trait Destination {
    /// Returns the name of the destination.
    fn name(&self) -> &str;

    /// Writes one batch of records to the destination.
    ///
    /// The returned future resolves only once the batch is durable at the
    /// destination. Callers are responsible for keeping batches within the
    /// destination's per-request size limit.
    fn write_batch(&self, records: Vec<Record>) -> impl Future<Output = SyncResult<()>> + Send;
}
