//! Sweep orchestrator.
//!
//! This module provides the `ScanOrchestrator` which feeds an ID range to a
//! fixed pool of workers, throttles them through one shared
//! [`RateController`], and gathers matches into a [`ResultAggregator`].

use crate::aggregator::ResultAggregator;
use crate::feeder::{spawn_feeder, JobQueue};
use crate::probe::{ProbeOutcome, Prober};
use crate::rate::RateController;
use crate::report::ScanReport;
use idsweep_core::{AppConfig, MatchRecord, ScanRange, TargetConfig};
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio::time::Instant;

/// State every worker shares for the lifetime of one sweep.
struct WorkerContext {
    prober: Arc<dyn Prober>,
    rate: Arc<RateController>,
    aggregator: Arc<ResultAggregator>,
    target: TargetConfig,
    progress_interval: u64,
}

impl WorkerContext {
    /// Apply the side effects of one completed probe.
    async fn handle_outcome(&self, id: u64, outcome: ProbeOutcome) {
        let total = self.aggregator.record_request();
        if total % self.progress_interval == 0 {
            tracing::info!("Progress: {} requests processed - current ID: {}", total, id);
        }

        let signal = outcome.rate_signal();
        match outcome {
            ProbeOutcome::Success {
                matched: true,
                title,
            } => {
                let title = title.unwrap_or_else(|| self.target.untitled_placeholder.clone());
                let record = MatchRecord::new(id, self.target.match_url(id), title);
                tracing::info!(
                    "Match found! ID: {} - URL: {} - Title: {}",
                    record.id,
                    record.url,
                    record.title
                );
                self.aggregator.record_match(record).await;
            }
            ProbeOutcome::Success { matched: false, .. } => {}
            ProbeOutcome::TransientFailure => {
                tracing::debug!("Transient failure for ID {}", id);
            }
            ProbeOutcome::NonOkStatus(status) => {
                tracing::debug!("ID {} returned HTTP {}", id, status);
            }
        }

        if let Some(success) = signal {
            self.rate.report_outcome(success).await;
        }
    }
}

/// Runs sweeps over ID ranges with a fixed-size worker pool.
pub struct ScanOrchestrator {
    /// Probe implementation shared by all workers
    prober: Arc<dyn Prober>,
    /// Shared adaptive delay
    rate: Arc<RateController>,
    /// URL templates and title placeholder
    target: TargetConfig,
    /// Number of concurrent workers
    workers: usize,
    /// Requests between progress lines
    progress_interval: u64,
}

impl ScanOrchestrator {
    /// Create a new orchestrator from the loaded configuration.
    #[must_use]
    pub fn new(prober: Arc<dyn Prober>, config: &AppConfig) -> Self {
        Self {
            prober,
            rate: Arc::new(RateController::new(config.rate)),
            target: config.target.clone(),
            workers: config.scanning.workers.max(1),
            progress_interval: config.scanning.progress_interval.max(1),
        }
    }

    /// Set the number of concurrent workers.
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Use an existing rate controller, e.g. to carry the delay across sweeps.
    #[must_use]
    pub fn with_rate_controller(mut self, rate: Arc<RateController>) -> Self {
        self.rate = rate;
        self
    }

    /// Sweep every ID in `range` and return once all workers have finished.
    ///
    /// Individual probe failures never abort the sweep; they only feed the
    /// rate controller.
    pub async fn run(&self, range: ScanRange) -> ScanReport {
        let started = Instant::now();
        tracing::info!(
            "Starting sweep of IDs {} ({} IDs) with {} workers",
            range,
            range.len(),
            self.workers
        );

        let aggregator = Arc::new(ResultAggregator::new());
        let context = Arc::new(WorkerContext {
            prober: self.prober.clone(),
            rate: self.rate.clone(),
            aggregator: aggregator.clone(),
            target: self.target.clone(),
            progress_interval: self.progress_interval,
        });

        let (queue, feeder) = spawn_feeder(range, self.workers);

        let mut pool = JoinSet::new();
        for worker_id in 0..self.workers {
            pool.spawn(run_worker(worker_id, queue.clone(), context.clone()));
        }
        drop(queue);
        drop(context);

        while let Some(joined) = pool.join_next().await {
            match joined {
                Ok(processed) => tracing::debug!("Worker finished after {} probes", processed),
                Err(e) => tracing::error!("Worker task failed: {}", e),
            }
        }

        if let Err(e) = feeder.await {
            tracing::error!("Feeder task failed: {}", e);
        }

        let requests_issued = aggregator.requests_issued();
        let matches_found = aggregator.matches_found();
        let matches = match Arc::try_unwrap(aggregator) {
            Ok(aggregator) => aggregator.into_matches(),
            Err(shared) => shared.snapshot().await,
        };

        let report = ScanReport {
            elapsed: started.elapsed(),
            requests_issued,
            matches_found,
            final_delay: self.rate.current_delay().await,
            matches,
        };

        tracing::info!(
            "Sweep finished: {} matches, {} requests, {:.2}s",
            report.matches_found,
            report.requests_issued,
            report.elapsed.as_secs_f64()
        );
        report
    }
}

/// Pull jobs until the queue is closed and drained.
///
/// The delay is read and slept on before every probe, so spacing reacts to
/// failures reported by any worker.
async fn run_worker(worker_id: usize, queue: JobQueue, context: Arc<WorkerContext>) -> u64 {
    let mut processed = 0;

    while let Some(id) = queue.next().await {
        tokio::time::sleep(context.rate.current_delay().await).await;

        let outcome = match context.prober.probe(id).await {
            Ok(outcome) => outcome,
            Err(e) if e.is_job_local() => {
                tracing::debug!(worker_id, "Dropping ID {}: {}", id, e);
                continue;
            }
            Err(e) => {
                tracing::warn!(worker_id, "Dropping ID {}: {}", id, e);
                continue;
            }
        };

        context.handle_outcome(id, outcome).await;
        processed += 1;
    }

    processed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, ScanError};
    use async_trait::async_trait;
    use idsweep_core::RateConfig;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicU64, Ordering};
    use tokio::sync::Mutex;

    fn hit(title: &str) -> ProbeOutcome {
        ProbeOutcome::Success {
            matched: true,
            title: Some(title.to_string()),
        }
    }

    fn miss() -> ProbeOutcome {
        ProbeOutcome::Success {
            matched: false,
            title: None,
        }
    }

    /// Prober answering from a closure and recording every probed ID.
    struct ScriptedProber<F> {
        script: F,
        probed: Mutex<Vec<u64>>,
    }

    impl<F> ScriptedProber<F>
    where
        F: Fn(u64) -> Result<ProbeOutcome> + Send + Sync,
    {
        fn new(script: F) -> Arc<Self> {
            Arc::new(Self {
                script,
                probed: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl<F> Prober for ScriptedProber<F>
    where
        F: Fn(u64) -> Result<ProbeOutcome> + Send + Sync,
    {
        async fn probe(&self, id: u64) -> Result<ProbeOutcome> {
            self.probed.lock().await.push(id);
            (self.script)(id)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_id_processed_exactly_once() {
        let prober = ScriptedProber::new(|_| Ok(miss()));
        let orchestrator =
            ScanOrchestrator::new(prober.clone(), &AppConfig::default()).with_workers(7);

        let report = orchestrator.run(ScanRange::new(1, 1000)).await;

        let probed = prober.probed.lock().await.clone();
        assert_eq!(probed.len(), 1000);
        let unique: HashSet<u64> = probed.into_iter().collect();
        assert_eq!(unique, (1..=1000).collect());
        assert_eq!(report.requests_issued, 1000);
        assert_eq!(report.matches_found, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_range_does_no_work() {
        let prober = ScriptedProber::new(|_| Ok(hit("never")));
        let orchestrator = ScanOrchestrator::new(prober.clone(), &AppConfig::default());

        let report = orchestrator.run(ScanRange::new(1, 0)).await;

        assert!(prober.probed.lock().await.is_empty());
        assert_eq!(report.requests_issued, 0);
        assert_eq!(report.matches_found, 0);
        assert!(report.matches.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_match_among_hundred() {
        let prober = ScriptedProber::new(|id| {
            Ok(if id == 42 { hit("Cool Video") } else { miss() })
        });
        let orchestrator =
            ScanOrchestrator::new(prober, &AppConfig::default()).with_workers(5);

        let report = orchestrator.run(ScanRange::new(1, 100)).await;

        assert_eq!(report.requests_issued, 100);
        assert_eq!(report.matches_found, 1);
        assert_eq!(report.matches.len(), 1);
        assert_eq!(report.matches[0].id, 42);
        assert_eq!(report.matches[0].url, "https://vimeo.com/42");
        assert_eq!(report.matches[0].title, "Cool Video");
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_failures_drive_delay_to_ceiling() {
        let config = AppConfig::default();
        let rate = Arc::new(RateController::new(config.rate));
        let observed = Arc::new(Mutex::new(Vec::new()));

        struct FailingProber {
            rate: Arc<RateController>,
            observed: Arc<Mutex<Vec<u64>>>,
        }

        #[async_trait]
        impl Prober for FailingProber {
            async fn probe(&self, _id: u64) -> Result<ProbeOutcome> {
                let mut observed = self.observed.lock().await;
                observed.push(self.rate.current_delay_ms().await);
                Ok(ProbeOutcome::NonOkStatus(500))
            }
        }

        let orchestrator = ScanOrchestrator::new(
            Arc::new(FailingProber {
                rate: rate.clone(),
                observed: observed.clone(),
            }),
            &config,
        )
        .with_workers(5)
        .with_rate_controller(rate);

        let report = orchestrator.run(ScanRange::new(1, 100)).await;

        assert_eq!(report.matches_found, 0);
        assert_eq!(report.requests_issued, 100);
        assert_eq!(report.final_delay.as_millis(), 5000);

        let observed = observed.lock().await;
        assert_eq!(observed.len(), 100);
        assert!(observed.windows(2).all(|pair| pair[0] <= pair[1]));
        assert!(observed.iter().all(|delay| (100..=5000).contains(delay)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_misses_leave_delay_untouched() {
        let config = AppConfig {
            rate: RateConfig {
                initial_delay_ms: 400,
                ..RateConfig::default()
            },
            ..AppConfig::default()
        };
        let prober = ScriptedProber::new(|_| Ok(miss()));
        let orchestrator = ScanOrchestrator::new(prober, &config).with_workers(3);

        let report = orchestrator.run(ScanRange::new(1, 30)).await;

        assert_eq!(report.requests_issued, 30);
        assert_eq!(report.final_delay.as_millis(), 400);
    }

    #[tokio::test(start_paused = true)]
    async fn test_matches_recover_delay_after_failures() {
        // Odd IDs fail, even IDs match; the last outcomes decide the delay
        // but it must stay within bounds throughout.
        let prober = ScriptedProber::new(|id| {
            Ok(if id % 2 == 0 {
                hit("even")
            } else {
                ProbeOutcome::TransientFailure
            })
        });
        let orchestrator =
            ScanOrchestrator::new(prober, &AppConfig::default()).with_workers(4);

        let report = orchestrator.run(ScanRange::new(1, 40)).await;

        assert_eq!(report.requests_issued, 40);
        assert_eq!(report.matches_found, 20);
        let millis = report.final_delay.as_millis();
        assert!((100..=5000).contains(&millis));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_jobs_touch_no_counters() {
        // Body-read failures are dropped silently: neither counted as a
        // request nor reported to the rate controller.
        let prober = ScriptedProber::new(|id| {
            if id % 10 == 0 {
                Err(ScanError::BodyRead {
                    id,
                    reason: "connection reset".to_string(),
                })
            } else {
                Ok(miss())
            }
        });
        let orchestrator =
            ScanOrchestrator::new(prober.clone(), &AppConfig::default()).with_workers(4);

        let report = orchestrator.run(ScanRange::new(1, 50)).await;

        assert_eq!(prober.probed.lock().await.len(), 50);
        assert_eq!(report.requests_issued, 45);
        assert_eq!(report.final_delay.as_millis(), 100);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_matches_are_all_kept() {
        let config = AppConfig {
            rate: RateConfig {
                initial_delay_ms: 0,
                min_delay_ms: 0,
                max_delay_ms: 0,
            },
            ..AppConfig::default()
        };
        let prober = ScriptedProber::new(|_| Ok(hit("instant")));
        let orchestrator = ScanOrchestrator::new(prober, &config).with_workers(64);

        let report = orchestrator.run(ScanRange::new(1, 10_000)).await;

        assert_eq!(report.requests_issued, 10_000);
        assert_eq!(report.matches_found, 10_000);
        assert_eq!(report.matches.len(), 10_000);
        let ids: HashSet<u64> = report.matches.iter().map(|m| m.id).collect();
        assert_eq!(ids, (1..=10_000).collect());
    }

    #[tokio::test(start_paused = true)]
    async fn test_panicking_worker_does_not_abort_sweep() {
        let prober = ScriptedProber::new(|id| {
            assert!(id != 13, "probe blew up");
            Ok(miss())
        });
        let orchestrator =
            ScanOrchestrator::new(prober, &AppConfig::default()).with_workers(4);

        let report = orchestrator.run(ScanRange::new(1, 50)).await;

        assert_eq!(report.requests_issued, 49);
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_counter_shared_across_workers() {
        let counter = Arc::new(AtomicU64::new(0));
        let seen = counter.clone();
        let prober = ScriptedProber::new(move |_| {
            seen.fetch_add(1, Ordering::Relaxed);
            Ok(miss())
        });
        let config = AppConfig {
            scanning: idsweep_core::ScanningConfig {
                progress_interval: 7,
                ..idsweep_core::ScanningConfig::default()
            },
            ..AppConfig::default()
        };
        let orchestrator = ScanOrchestrator::new(prober, &config).with_workers(3);

        let report = orchestrator.run(ScanRange::new(10, 29)).await;

        assert_eq!(counter.load(Ordering::Relaxed), 20);
        assert_eq!(report.requests_issued, 20);
    }
}
