//! Memory usage sampling.
//!
//! [`MemorySampler`] reads a [`MemoryProbe`] on a fixed interval (30 seconds by
//! default) and logs a warning whenever usage is above the configured ratio
//! of the limit. It is passive: it mutates nothing and stops as soon as its
//! cancellation token fires.
//!
//! ```rust,ignore
//! let cancel = CancellationToken::new();
//! let sampler = MemorySampler::new(SystemMemoryProbe, cancel.child_token());
//! let handle = tokio::spawn(sampler.run());
//! // on teardown
//! cancel.cancel();
//! ```

use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Default sampling interval in seconds.
pub const DEFAULT_INTERVAL_SECS: u64 = 30;

/// Default usage ratio above which a warning is logged.
pub const DEFAULT_WARN_RATIO: f64 = 0.9;

/// A single reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemorySample {
    pub used_bytes: u64,
    pub limit_bytes: u64,
}

impl MemorySample {
    /// Fraction of the limit in use, or `None` when the limit is unknown.
    pub fn usage_ratio(&self) -> Option<f64> {
        if self.limit_bytes == 0 {
            return None;
        }
        Some(self.used_bytes as f64 / self.limit_bytes as f64)
    }
}

/// Source of memory readings.
pub trait MemoryProbe: Send {
    /// Current reading, or `None` when the platform cannot report one.
    fn sample(&mut self) -> Option<MemorySample>;
}

/// Reads system memory from `/proc/meminfo` on Linux.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemMemoryProbe;

impl MemoryProbe for SystemMemoryProbe {
    fn sample(&mut self) -> Option<MemorySample> {
        #[cfg(target_os = "linux")]
        {
            let content = std::fs::read_to_string("/proc/meminfo").ok()?;
            parse_meminfo(&content)
        }
        #[cfg(not(target_os = "linux"))]
        {
            None
        }
    }
}

/// Parse `MemTotal` and `MemAvailable` (kB) into a sample.
pub fn parse_meminfo(content: &str) -> Option<MemorySample> {
    let field = |name: &str| -> Option<u64> {
        content
            .lines()
            .find_map(|line| line.strip_prefix(name))
            .and_then(|rest| rest.split_whitespace().next())
            .and_then(|kb| kb.parse::<u64>().ok())
            .map(|kb| kb.saturating_mul(1024))
    };
    let total = field("MemTotal:")?;
    let available = field("MemAvailable:")?;
    Some(MemorySample {
        used_bytes: total.saturating_sub(available),
        limit_bytes: total,
    })
}

/// Periodic passive memory sampler.
pub struct MemorySampler<P: MemoryProbe> {
    probe: P,
    cancel: CancellationToken,
    interval: Duration,
    warn_ratio: f64,
}

impl<P: MemoryProbe> MemorySampler<P> {
    /// Create a sampler that runs until `cancel` is cancelled.
    pub fn new(probe: P, cancel: CancellationToken) -> Self {
        Self {
            probe,
            cancel,
            interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
            warn_ratio: DEFAULT_WARN_RATIO,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_warn_ratio(mut self, ratio: f64) -> Self {
        self.warn_ratio = ratio;
        self
    }

    /// Take one reading and log it. Returns true when the warning threshold was exceeded.
    pub fn check(&mut self) -> bool {
        let Some(sample) = self.probe.sample() else {
            debug!("memory usage unavailable");
            return false;
        };
        let Some(ratio) = sample.usage_ratio() else {
            return false;
        };

        if ratio > self.warn_ratio {
            warn!(
                used_mb = sample.used_bytes / (1024 * 1024),
                limit_mb = sample.limit_bytes / (1024 * 1024),
                usage_pct = ratio * 100.0,
                "high memory usage"
            );
            true
        } else {
            debug!(usage_pct = ratio * 100.0, "memory usage sampled");
            false
        }
    }

    /// Sample until cancelled. Returns the number of warnings logged.
    pub async fn run(mut self) -> usize {
        let mut warnings = 0;
        info!(interval_secs = self.interval.as_secs(), "memory sampler started");

        let mut ticker = tokio::time::interval(self.interval);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    info!("memory sampler stopped");
                    break;
                }
                _ = ticker.tick() => {
                    if self.check() {
                        warnings += 1;
                    }
                }
            }
        }

        warnings
    }
}
