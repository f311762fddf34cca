use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

#[derive(Debug, Default)]
struct InnerMetrics {
    rows_extracted: AtomicU64,
    points_written: AtomicU64,
    unknown_fields: AtomicU64,
    dropped_fields: AtomicU64,
    failed_cycles: AtomicU64,
    restarts: AtomicU64,
}

/// Process-wide sync counters. Cheap to clone; clones share state.
#[derive(Debug, Clone)]
pub struct Metrics {
    inner: Arc<InnerMetrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub rows_extracted: u64,
    pub points_written: u64,
    pub unknown_fields: u64,
    pub dropped_fields: u64,
    pub failed_cycles: u64,
    pub restarts: u64,
}

impl Metrics {
    pub fn new() -> Self {
        Metrics {
            inner: Arc::new(InnerMetrics::default()),
        }
    }

    pub fn increment_rows(&self, count: u64) {
        self.inner.rows_extracted.fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_points(&self, count: u64) {
        self.inner.points_written.fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_unknown_fields(&self, count: u64) {
        self.inner.unknown_fields.fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_dropped_fields(&self, count: u64) {
        self.inner.dropped_fields.fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_failed_cycles(&self, count: u64) {
        self.inner.failed_cycles.fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_restarts(&self, count: u64) {
        self.inner.restarts.fetch_add(count, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            rows_extracted: self.inner.rows_extracted.load(Ordering::Relaxed),
            points_written: self.inner.points_written.load(Ordering::Relaxed),
            unknown_fields: self.inner.unknown_fields.load(Ordering::Relaxed),
            dropped_fields: self.inner.dropped_fields.load(Ordering::Relaxed),
            failed_cycles: self.inner.failed_cycles.load(Ordering::Relaxed),
            restarts: self.inner.restarts.load(Ordering::Relaxed),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
