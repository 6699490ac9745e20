use hdrhistogram::Histogram;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::PipelineError;
use crate::ipc::message_buffer::{ChannelId, ChannelStats};

// ============================================================================
// PIPELINE METRICS - sampler timing and per-channel drop accounting
// ============================================================================

#[derive(Clone)]
pub struct PipelineMetrics {
    sample_hist: Arc<Mutex<Histogram<u64>>>,
    jitter_hist: Arc<Mutex<Histogram<u64>>>,
    last_period_ns: Arc<AtomicU64>,
    sensor_failures: Arc<AtomicU64>,
    substituted: Arc<AtomicU64>,
    reports: Arc<AtomicU64>,
    channels: Arc<Mutex<Vec<ChannelStats>>>,
}

impl PipelineMetrics {
    pub fn new() -> Result<Self, PipelineError> {
        Ok(Self {
            sample_hist: Arc::new(Mutex::new(Histogram::new(3)?)),
            jitter_hist: Arc::new(Mutex::new(Histogram::new(3)?)),
            last_period_ns: Arc::new(AtomicU64::new(0)),
            sensor_failures: Arc::new(AtomicU64::new(0)),
            substituted: Arc::new(AtomicU64::new(0)),
            reports: Arc::new(AtomicU64::new(0)),
            channels: Arc::new(Mutex::new(Vec::new())),
        })
    }

    pub fn track_channels(&self, stats: &[ChannelStats]) {
        self.channels.lock().extend(stats.iter().cloned());
    }

    /// Time spent reading, converting and publishing one sample.
    pub fn record_sample(&self, duration: Duration) {
        self.sample_hist.lock().record(duration.as_nanos() as u64).ok();
    }

    /// Record the wake-to-wake period; jitter is its change from the last one.
    pub fn record_period(&self, period: Duration) {
        let now = period.as_nanos() as u64;
        let last = self.last_period_ns.swap(now, Ordering::Relaxed);
        if last > 0 {
            self.jitter_hist.lock().record(now.abs_diff(last)).ok();
        }
    }

    pub fn record_sensor_failure(&self, substituted: bool) {
        self.sensor_failures.fetch_add(1, Ordering::Relaxed);
        if substituted {
            self.substituted.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_report(&self) {
        self.reports.fetch_add(1, Ordering::Relaxed);
    }

    pub fn report(&self) -> MetricsReport {
        let sample = self.sample_hist.lock();
        let jitter = self.jitter_hist.lock();

        MetricsReport {
            samples: sample.len(),
            sample_p50: Duration::from_nanos(sample.value_at_quantile(0.5)),
            sample_p99: Duration::from_nanos(sample.value_at_quantile(0.99)),
            jitter_p50: Duration::from_nanos(jitter.value_at_quantile(0.5)),
            jitter_p99: Duration::from_nanos(jitter.value_at_quantile(0.99)),
            sensor_failures: self.sensor_failures.load(Ordering::Relaxed),
            substituted_readings: self.substituted.load(Ordering::Relaxed),
            reports: self.reports.load(Ordering::Relaxed),
            channels: self
                .channels
                .lock()
                .iter()
                .map(|s| ChannelCounts {
                    id: s.id(),
                    accepted: s.accepted(),
                    dropped: s.dropped(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelCounts {
    pub id: ChannelId,
    pub accepted: u64,
    pub dropped: u64,
}

#[derive(Debug, Clone)]
pub struct MetricsReport {
    pub samples: u64,
    pub sample_p50: Duration,
    pub sample_p99: Duration,
    pub jitter_p50: Duration,
    pub jitter_p99: Duration,
    pub sensor_failures: u64,
    pub substituted_readings: u64,
    pub reports: u64,
    pub channels: Vec<ChannelCounts>,
}

impl MetricsReport {
    pub fn total_dropped(&self) -> u64 {
        self.channels.iter().map(|c| c.dropped).sum()
    }

    pub fn channel(&self, id: ChannelId) -> Option<ChannelCounts> {
        self.channels.iter().find(|c| c.id == id).copied()
    }
}
