//! Request metrics, exposed as JSON on `GET /metrics`.

use lg_03_dispatcher::DispatchError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Gateway metrics
#[derive(Default)]
pub struct GatewayMetrics {
    // Request counters
    pub requests_total: AtomicU64,
    pub requests_success: AtomicU64,
    pub requests_error: AtomicU64,

    // Write request counters
    pub write_requests_total: AtomicU64,

    // Failure breakdown
    pub unauthorized: AtomicU64,
    pub misconfigured: AtomicU64,
    pub rejected: AtomicU64,
    pub not_found: AtomicU64,
    pub version_conflicts: AtomicU64,
    pub rate_limited: AtomicU64,
    pub store_failures: AtomicU64,
    pub timeouts: AtomicU64,
    pub internal: AtomicU64,

    // Latency tracking (sum and count; no histogram)
    pub total_latency_ms: AtomicU64,
    pub request_count_for_latency: AtomicU64,
}

impl GatewayMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a request
    pub fn record_request(&self, success: bool, is_write: bool, latency_ms: u64) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);

        if success {
            self.requests_success.fetch_add(1, Ordering::Relaxed);
        } else {
            self.requests_error.fetch_add(1, Ordering::Relaxed);
        }

        if is_write {
            self.write_requests_total.fetch_add(1, Ordering::Relaxed);
        }

        self.total_latency_ms
            .fetch_add(latency_ms, Ordering::Relaxed);
        self.request_count_for_latency
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Bump the counter matching a failure kind.
    pub fn record_failure(&self, err: &DispatchError) {
        let counter = match err {
            DispatchError::Unauthorized => &self.unauthorized,
            DispatchError::ServerMisconfigured(_) => &self.misconfigured,
            DispatchError::MissingPayload(_)
            | DispatchError::InvalidAction(_)
            | DispatchError::InvalidPayload(_) => &self.rejected,
            DispatchError::NotFound(_) => &self.not_found,
            DispatchError::VersionConflict { .. } => &self.version_conflicts,
            DispatchError::RateLimited { .. } => &self.rate_limited,
            DispatchError::StoreUnavailable(_) => &self.store_failures,
            DispatchError::Internal(_) => &self.internal,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_timeout(&self) {
        self.timeouts.fetch_add(1, Ordering::Relaxed);
    }

    /// Get average latency in ms
    pub fn average_latency_ms(&self) -> f64 {
        let total = self.total_latency_ms.load(Ordering::Relaxed);
        let count = self.request_count_for_latency.load(Ordering::Relaxed);
        if count == 0 {
            0.0
        } else {
            total as f64 / count as f64
        }
    }

    /// Export metrics as JSON
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "requests": {
                "total": self.requests_total.load(Ordering::Relaxed),
                "success": self.requests_success.load(Ordering::Relaxed),
                "error": self.requests_error.load(Ordering::Relaxed),
                "writes": self.write_requests_total.load(Ordering::Relaxed),
            },
            "failures": {
                "unauthorized": self.unauthorized.load(Ordering::Relaxed),
                "misconfigured": self.misconfigured.load(Ordering::Relaxed),
                "rejected": self.rejected.load(Ordering::Relaxed),
                "not_found": self.not_found.load(Ordering::Relaxed),
                "version_conflicts": self.version_conflicts.load(Ordering::Relaxed),
                "rate_limited": self.rate_limited.load(Ordering::Relaxed),
                "store_failures": self.store_failures.load(Ordering::Relaxed),
                "timeouts": self.timeouts.load(Ordering::Relaxed),
                "internal": self.internal.load(Ordering::Relaxed),
            },
            "latency": {
                "average_ms": self.average_latency_ms(),
            }
        })
    }
}

/// Request timing helper
pub struct RequestTimer {
    start: Instant,
    metrics: Arc<GatewayMetrics>,
    is_write: bool,
}

impl RequestTimer {
    pub fn new(metrics: Arc<GatewayMetrics>, is_write: bool) -> Self {
        Self {
            start: Instant::now(),
            metrics,
            is_write,
        }
    }

    pub fn finish(self, success: bool) {
        let latency_ms = self.start.elapsed().as_millis() as u64;
        self.metrics
            .record_request(success, self.is_write, latency_ms);
    }
}
