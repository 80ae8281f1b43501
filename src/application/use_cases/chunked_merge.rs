use std::sync::Arc;

use tracing::debug;

use super::scheduler::Progress;
use crate::domain::record::{Record, RecordStore};

/// Concatenate per-source batches into a new store, `chunk_size` records
/// at a time with a yield in between. Ids run 1..=N in merge order.
pub async fn merge_batches(
    batches: Vec<Vec<Record>>,
    chunk_size: usize,
    progress: &dyn Progress,
) -> RecordStore {
    let total: usize = batches.iter().map(Vec::len).sum();
    let chunk_size = chunk_size.max(1);
    let mut merged: Vec<Arc<Record>> = Vec::with_capacity(total);
    let mut pending = batches.into_iter().flatten();

    progress.begin(total);

    loop {
        let chunk: Vec<Record> = pending.by_ref().take(chunk_size).collect();
        if chunk.is_empty() {
            break;
        }

        for record in chunk {
            let id = merged.len() as u64 + 1;
            merged.push(Arc::new(record.with_id(id)));
        }
        progress.chunk_done(merged.len(), total);

        tokio::task::yield_now().await;
    }

    debug!(records = merged.len(), chunk_size, "Merge finished");
    RecordStore::new(merged)
}
