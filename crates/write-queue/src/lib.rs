#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

//! Asynchronous write path of the gateway
//!
//! HTTP handlers push [`SaveBatch`](searchgate_core::SaveBatch)es into a
//! bounded [`WriteQueue`]; a single [`DrainWorker`] pulls them out and
//! persists each item into the engine at a fixed pace.

pub mod drain;
pub mod persist;
pub mod queue;

pub use drain::{DrainStats, DrainWorker};
pub use persist::{persist, PersistError};
pub use queue::{create_write_queue, WriteQueue, WriteQueueReceiver};

use searchgate_core::config::QueueConfig;
use searchgate_engine::EngineClientAccessor;
use std::sync::Arc;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;

/// Start the drain worker as a background task
///
/// # Arguments
/// * `receiver` - Consumer side of the write queue
/// * `accessor` - Shared engine client accessor
/// * `config` - Queue configuration (pacing interval)
/// * `shutdown_rx` - Oneshot receiver for the shutdown signal
///
/// # Graceful Shutdown
/// When the shutdown signal arrives (or its sender is dropped), the worker:
/// 1. Lets the persist attempt in flight finish
/// 2. Stops before the next item
/// 3. Discards whatever is still queued and reports it in [`DrainStats::abandoned`]
pub fn spawn_drain_worker(
    receiver: WriteQueueReceiver,
    accessor: Arc<EngineClientAccessor>,
    config: &QueueConfig,
    shutdown_rx: oneshot::Receiver<()>,
) -> JoinHandle<DrainStats> {
    let worker = DrainWorker::new(receiver, accessor, config.pacing());

    // Use a watch channel so the flag can be observed at several await points
    let (shutdown_flag_tx, shutdown_flag_rx) = watch::channel(false);

    // Ends with the worker too, dropping `shutdown_rx`
    tokio::spawn(async move {
        tokio::select! {
            _ = shutdown_rx => {
                let _ = shutdown_flag_tx.send(true);
            }
            _ = shutdown_flag_tx.closed() => {}
        }
    });

    tokio::spawn(worker.run(shutdown_flag_rx))
}
