use crate::classifier::Classifier;
use crate::config::ScanConfig;
use crate::error::Result;
use crate::probe::{CdnPredicate, Prober, ResultCallback};
use crate::result::{ProbeOutcome, ScanReport, ScanSummary, Target};
use crate::shutdown::ShutdownListener;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanProgress {
    pub completed: usize,
    pub total: usize,
}

impl ScanProgress {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.completed as f64 * 100.0 / self.total as f64
    }
}

pub type ProgressCallback = Arc<dyn Fn(ScanProgress) + Send + Sync>;

/// Fans hosts × paths out over a fixed pool of worker tasks.
///
/// Workers claim targets from a shared queue, so every target is probed exactly
/// once. Completions are funnelled through a channel to a single aggregator,
/// which owns the outcome list and the completion count.
pub struct Scanner {
    config: ScanConfig,
    prober: Prober,
    progress_callback: Option<ProgressCallback>,
    completion_callback: Option<ProgressCallback>,
    shutdown: ShutdownListener,
}

impl Scanner {
    pub fn new(config: ScanConfig) -> Result<Self> {
        config.validate()?;
        let prober = Prober::new(config.timeout, config.delay)?;

        Ok(Self {
            config,
            prober,
            progress_callback: None,
            completion_callback: None,
            shutdown: ShutdownListener::never(),
        })
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.prober = self.prober.with_classifier(classifier);
        self
    }

    pub fn with_cdn_predicate(mut self, predicate: CdnPredicate) -> Self {
        self.prober = self.prober.with_cdn_predicate(predicate);
        self
    }

    pub fn with_result_callback(mut self, callback: ResultCallback) -> Self {
        self.prober = self.prober.with_result_callback(callback);
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Called after every single completion, unlike the interval-based progress callback.
    pub fn with_completion_callback(mut self, callback: ProgressCallback) -> Self {
        self.completion_callback = Some(callback);
        self
    }

    pub fn with_shutdown(mut self, shutdown: ShutdownListener) -> Self {
        self.shutdown = shutdown;
        self
    }

    pub async fn run(&self) -> Result<ScanReport> {
        let start = Instant::now();
        let targets = self.config.targets()?;
        let total = targets.len();
        let workers = self.config.workers.min(total).max(1);

        info!("Starting scan of {} targets with {} workers", total, workers);

        let queue: Arc<Mutex<VecDeque<Target>>> = Arc::new(Mutex::new(targets.into()));
        let (tx, mut rx) = mpsc::unbounded_channel::<Option<ProbeOutcome>>();

        let mut worker_handles = Vec::with_capacity(workers);
        for worker_id in 0..workers {
            let queue = queue.clone();
            let tx = tx.clone();
            let prober = self.prober.clone();
            let mut shutdown = self.shutdown.clone();

            let handle = tokio::spawn(async move {
                debug!("Worker {} started", worker_id);

                loop {
                    if shutdown.is_triggered() {
                        break;
                    }

                    let next = queue.lock().await.pop_front();
                    let Some(target) = next else {
                        break;
                    };

                    tokio::select! {
                        biased;
                        _ = shutdown.cancelled() => {
                            debug!("Worker {} abandoning {}", worker_id, target);
                            break;
                        }
                        outcome = prober.probe(&target) => {
                            if tx.send(outcome).is_err() {
                                break;
                            }
                        }
                    }
                }

                debug!("Worker {} finished", worker_id);
            });

            worker_handles.push(handle);
        }
        // the aggregator loop ends once every worker has dropped its sender
        drop(tx);

        let mut outcomes = Vec::new();
        let mut completed = 0usize;
        let interval = self.config.progress_interval;

        while let Some(outcome) = rx.recv().await {
            completed += 1;
            if let Some(outcome) = outcome {
                outcomes.push(outcome);
            }
            if let Some(ref callback) = self.completion_callback {
                callback(ScanProgress { completed, total });
            }

            if interval > 0 && completed % interval == 0 {
                let progress = ScanProgress { completed, total };
                info!(
                    "Progress: {}/{} ({:.1}%)",
                    completed,
                    total,
                    progress.percent()
                );
                if let Some(ref callback) = self.progress_callback {
                    callback(progress);
                }
            }
        }

        for result in futures::future::join_all(worker_handles).await {
            result?;
        }

        let cancelled = completed < total && self.shutdown.is_triggered();
        let summary = ScanSummary::from_outcomes(
            &outcomes,
            total,
            completed,
            start.elapsed(),
            cancelled,
        );

        info!(
            "Scan {} after {:.2}s: {}/{} targets, {} APIs",
            if cancelled { "cancelled" } else { "complete" },
            summary.elapsed.as_secs_f64(),
            completed,
            total,
            summary.apis_found
        );

        Ok(ScanReport { outcomes, summary })
    }
}
