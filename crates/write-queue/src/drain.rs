//! The single consumer of the write queue

use crate::persist::persist;
use crate::queue::WriteQueueReceiver;
use searchgate_core::SaveBatch;
use searchgate_engine::EngineClientAccessor;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

/// Counters reported when the drain worker stops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainStats {
    pub batches: u64,
    pub persisted: u64,
    pub failed: u64,
    /// Items still pending when the worker was stopped
    pub abandoned: u64,
}

/// Why a batch stopped being processed
enum BatchOutcome {
    Completed,
    Interrupted { remaining: u64 },
}

/// Drains save batches into the engine one item at a time
///
/// Batches are taken in queue order and their items written in submission
/// order. After every persist attempt, successful or not, the worker sleeps
/// for `pacing` before touching the next item. Failures are logged and never
/// stop the worker.
pub struct DrainWorker {
    receiver: WriteQueueReceiver,
    accessor: Arc<EngineClientAccessor>,
    pacing: Duration,
    stats: DrainStats,
}

impl DrainWorker {
    pub fn new(
        receiver: WriteQueueReceiver,
        accessor: Arc<EngineClientAccessor>,
        pacing: Duration,
    ) -> Self {
        Self {
            receiver,
            accessor,
            pacing,
            stats: DrainStats::default(),
        }
    }

    /// Run until `shutdown` flips to true (or its sender is dropped) or every
    /// queue producer is gone
    ///
    /// A persist attempt already in flight is allowed to finish. Batches still
    /// queued at that point are discarded and counted as abandoned.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> DrainStats {
        info!(
            "Drain worker started (pacing {}ms)",
            self.pacing.as_millis()
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            let batch = tokio::select! {
                biased;
                _ = shutdown.changed() => break,
                batch = self.receiver.dequeue() => match batch {
                    Some(batch) => batch,
                    None => {
                        info!("Write queue closed, drain worker exiting");
                        break;
                    }
                },
            };

            match self.drain_batch(batch, &mut shutdown).await {
                BatchOutcome::Completed => {}
                BatchOutcome::Interrupted { remaining } => {
                    self.stats.abandoned += remaining;
                    break;
                }
            }
        }

        self.stop()
    }

    async fn drain_batch(
        &mut self,
        batch: SaveBatch,
        shutdown: &mut watch::Receiver<bool>,
    ) -> BatchOutcome {
        let total = batch.len();
        self.stats.batches += 1;
        debug!("Draining batch of {total} items");

        for (position, request) in batch.into_iter().enumerate() {
            match persist(&self.accessor, &request).await {
                Ok(indexed) => {
                    self.stats.persisted += 1;
                    debug!(
                        index = %request.index,
                        id = %indexed.id,
                        result = indexed.result.as_deref().unwrap_or("unknown"),
                        "Persisted document"
                    );
                }
                Err(e) => {
                    self.stats.failed += 1;
                    error!(index = %e.index, id = %e.id, "{e}");
                }
            }

            tokio::select! {
                biased;
                _ = shutdown.changed() => {
                    return BatchOutcome::Interrupted {
                        remaining: (total - position - 1) as u64,
                    };
                }
                _ = sleep(self.pacing) => {}
            }
        }

        BatchOutcome::Completed
    }

    fn stop(mut self) -> DrainStats {
        let pending = self.receiver.close_and_drain();
        self.stats.abandoned += pending.iter().map(|b| b.len() as u64).sum::<u64>();

        if self.stats.abandoned > 0 {
            warn!(
                "Drain worker stopping with {} unpersisted items discarded",
                self.stats.abandoned
            );
        }
        info!(
            "Drain worker stopped: {} batches, {} persisted, {} failed",
            self.stats.batches, self.stats.persisted, self.stats.failed
        );
        self.stats
    }
}
