//! Accepting save batches onto the write queue

use searchgate_core::error::Result;
use searchgate_core::SaveBatch;
use searchgate_write_queue::WriteQueue;
use tracing::debug;

/// Validate a parsed batch and hand it to the write queue
///
/// Waits while the queue is full. Returns once the batch is queued; the
/// documents are written later by the drain worker.
pub async fn accept_batch(batch: SaveBatch, queue: &WriteQueue) -> Result<usize> {
    batch.validate()?;

    let items = batch.len();
    if items == 0 {
        debug!("Ignoring empty save batch");
        return Ok(0);
    }

    queue.enqueue(batch).await?;
    Ok(items)
}
