//! Job feeder and the shared work queue.
//!
//! The feeder pushes every ID of a [`ScanRange`] into a bounded channel and
//! drops the sender when done, which is the only termination signal workers
//! get. Capacity equals the worker count so feeding blocks while the pool is
//! saturated.

use idsweep_core::ScanRange;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

/// Multi-consumer end of the job channel.
///
/// Each ID is handed to exactly one caller of [`JobQueue::next`].
#[derive(Debug, Clone)]
pub struct JobQueue {
    receiver: Arc<Mutex<mpsc::Receiver<u64>>>,
}

impl JobQueue {
    /// Next job, or `None` once the feeder is done and the queue is drained.
    pub async fn next(&self) -> Option<u64> {
        self.receiver.lock().await.recv().await
    }
}

/// Spawn the feeder for `range` with a queue of `capacity` slots.
///
/// # Panics
/// Panics if `capacity` is zero.
pub fn spawn_feeder(range: ScanRange, capacity: usize) -> (JobQueue, JoinHandle<u64>) {
    let (sender, receiver) = mpsc::channel(capacity);

    let handle = tokio::spawn(async move {
        let mut fed = 0;
        for id in range.ids() {
            if sender.send(id).await.is_err() {
                tracing::warn!("Job queue closed early at ID {}", id);
                break;
            }
            fed += 1;
        }
        tracing::debug!("Feeder finished after {} jobs", fed);
        fed
    });

    let queue = JobQueue {
        receiver: Arc::new(Mutex::new(receiver)),
    };
    (queue, handle)
}
