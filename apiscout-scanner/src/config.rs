use crate::error::{Result, ScanError};
use crate::result::Target;
use std::time::Duration;

pub const DEFAULT_WORKERS: usize = 5;
pub const DEFAULT_DELAY_SECS: f64 = 1.0;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_PROGRESS_INTERVAL: usize = 10;

/// Everything a scan needs, fixed before the first probe is dispatched.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub workers: usize,
    pub delay: Duration,
    pub timeout: Duration,
    pub hosts: Vec<String>,
    pub paths: Vec<String>,
    /// Emit a progress notification every this many completions.
    pub progress_interval: usize,
}

impl ScanConfig {
    pub fn new(hosts: Vec<String>, paths: Vec<String>) -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            delay: Duration::from_secs_f64(DEFAULT_DELAY_SECS),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            hosts,
            paths,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(ScanError::InvalidConfig(
                "worker count must be at least 1".to_string(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(ScanError::InvalidConfig(
                "request timeout must be positive".to_string(),
            ));
        }
        if self.hosts.is_empty() {
            return Err(ScanError::InvalidConfig("no hosts to scan".to_string()));
        }
        if self.paths.is_empty() {
            return Err(ScanError::InvalidConfig("no paths to scan".to_string()));
        }
        Ok(())
    }

    /// Cross product of hosts and paths.
    pub fn targets(&self) -> Result<Vec<Target>> {
        let mut targets = Vec::with_capacity(self.target_count());
        for host in &self.hosts {
            for path in &self.paths {
                targets.push(Target::new(host.clone(), path.clone())?);
            }
        }
        Ok(targets)
    }

    pub fn target_count(&self) -> usize {
        self.hosts.len() * self.paths.len()
    }
}

/// Converts a user-supplied delay in seconds, rejecting negative and non-finite values.
pub fn delay_from_secs(secs: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(secs)
        .map_err(|_| ScanError::InvalidConfig(format!("invalid delay: {}", secs)))
}
