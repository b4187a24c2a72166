//! Bounded FIFO of save batches between HTTP handlers and the drain worker

use searchgate_core::error::{Error, Result};
use searchgate_core::SaveBatch;
use tokio::sync::mpsc;
use tracing::debug;

/// Producer side of the write queue
///
/// Cheap to clone; every HTTP handler holds one. When the queue is full,
/// [`enqueue`](Self::enqueue) waits for the drain worker to make room.
#[derive(Debug, Clone)]
pub struct WriteQueue {
    tx: mpsc::Sender<SaveBatch>,
}

/// Consumer side of the write queue, owned by the single drain worker
#[derive(Debug)]
pub struct WriteQueueReceiver {
    rx: mpsc::Receiver<SaveBatch>,
}

/// Create a write queue holding at most `capacity` pending batches
pub fn create_write_queue(capacity: usize) -> Result<(WriteQueue, WriteQueueReceiver)> {
    if capacity == 0 {
        return Err(Error::config(
            "write queue capacity must be greater than 0".to_string(),
        ));
    }

    let (tx, rx) = mpsc::channel(capacity);
    Ok((WriteQueue { tx }, WriteQueueReceiver { rx }))
}

impl WriteQueue {
    /// Append a batch at the tail, waiting while the queue is full
    ///
    /// Fails only once the drain worker has stopped.
    pub async fn enqueue(&self, batch: SaveBatch) -> Result<()> {
        let items = batch.len();
        self.tx
            .send(batch)
            .await
            .map_err(|_| Error::queue("write queue is closed; the drain worker has stopped"))?;
        debug!("Enqueued batch of {items} items ({} pending)", self.len());
        Ok(())
    }

    /// Number of batches waiting to be drained
    pub fn len(&self) -> usize {
        self.tx.max_capacity() - self.tx.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of pending batches
    pub fn capacity(&self) -> usize {
        self.tx.max_capacity()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl WriteQueueReceiver {
    /// Remove the batch at the head, waiting while the queue is empty
    ///
    /// Returns `None` once every producer has been dropped and the queue is drained.
    pub async fn dequeue(&mut self) -> Option<SaveBatch> {
        self.rx.recv().await
    }

    /// Stop accepting batches and return everything still pending
    pub(crate) fn close_and_drain(&mut self) -> Vec<SaveBatch> {
        self.rx.close();
        let mut pending = Vec::new();
        while let Ok(batch) = self.rx.try_recv() {
            pending.push(batch);
        }
        pending
    }
}
