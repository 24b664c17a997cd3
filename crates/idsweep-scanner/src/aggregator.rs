//! Shared result aggregation.
//!
//! Workers append matches and bump counters concurrently. The counters are
//! plain atomics so the hot path never touches the match lock.

use idsweep_core::MatchRecord;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;

/// Thread-safe collection of matches and run counters.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    matches: Mutex<Vec<MatchRecord>>,
    requests_issued: AtomicU64,
    matches_found: AtomicU64,
}

impl ResultAggregator {
    /// Create an empty aggregator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one completed request and return the new global total.
    pub fn record_request(&self) -> u64 {
        self.requests_issued.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Append a confirmed match.
    pub async fn record_match(&self, record: MatchRecord) {
        self.matches.lock().await.push(record);
        self.matches_found.fetch_add(1, Ordering::Relaxed);
    }

    /// Total requests completed so far.
    #[must_use]
    pub fn requests_issued(&self) -> u64 {
        self.requests_issued.load(Ordering::Relaxed)
    }

    /// Total matches confirmed so far.
    #[must_use]
    pub fn matches_found(&self) -> u64 {
        self.matches_found.load(Ordering::Relaxed)
    }

    /// Copy of every match recorded so far, in discovery order.
    pub async fn snapshot(&self) -> Vec<MatchRecord> {
        self.matches.lock().await.clone()
    }

    /// Take the matches out once no worker can append any more.
    pub fn into_matches(self) -> Vec<MatchRecord> {
        self.matches.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_counters_start_at_zero() {
        let aggregator = ResultAggregator::new();
        assert_eq!(aggregator.requests_issued(), 0);
        assert_eq!(aggregator.matches_found(), 0);
        assert!(aggregator.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_record_request_returns_running_total() {
        let aggregator = ResultAggregator::new();
        assert_eq!(aggregator.record_request(), 1);
        assert_eq!(aggregator.record_request(), 2);
        assert_eq!(aggregator.requests_issued(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_appends_lose_nothing() {
        const WORKERS: u64 = 64;
        const PER_WORKER: u64 = 200;

        let aggregator = Arc::new(ResultAggregator::new());
        let mut handles = Vec::new();
        for worker in 0..WORKERS {
            let aggregator = aggregator.clone();
            handles.push(tokio::spawn(async move {
                for i in 0..PER_WORKER {
                    let id = worker * PER_WORKER + i;
                    aggregator.record_request();
                    aggregator
                        .record_match(MatchRecord::new(id, format!("https://x/{id}"), "t"))
                        .await;
                }
            }));
        }
        for handle in handles {
            handle.await.expect("appender task");
        }

        let aggregator = Arc::try_unwrap(aggregator).expect("sole owner");
        assert_eq!(aggregator.requests_issued(), WORKERS * PER_WORKER);
        assert_eq!(aggregator.matches_found(), WORKERS * PER_WORKER);

        let ids: HashSet<u64> = aggregator.into_matches().iter().map(|m| m.id).collect();
        let expected: HashSet<u64> = (0..WORKERS * PER_WORKER).collect();
        assert_eq!(ids, expected);
    }
}
