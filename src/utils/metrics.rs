//! Observability and Metrics
//!
//! Counters for route registration and query dispatch.
//!
//! Each [`QueryRouter`](crate::protocol::QueryRouter) owns one `Metrics`
//! instance. Counters are atomics, so a router shared across threads after
//! startup records without locking.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, info};

/// Metrics collector for one router
#[derive(Debug)]
pub struct Metrics {
    /// Routes added, directly or through a service descriptor
    pub routes_registered: AtomicU64,
    /// Queries handed to a route
    pub queries_total: AtomicU64,
    /// Queries that returned a response
    pub queries_succeeded: AtomicU64,
    /// Queries that returned an error
    pub queries_failed: AtomicU64,
    /// Total request payload bytes
    pub request_bytes: AtomicU64,
    /// Total response payload bytes
    pub response_bytes: AtomicU64,
    /// Start time for uptime calculation
    start_time: Instant,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            routes_registered: AtomicU64::new(0),
            queries_total: AtomicU64::new(0),
            queries_succeeded: AtomicU64::new(0),
            queries_failed: AtomicU64::new(0),
            request_bytes: AtomicU64::new(0),
            response_bytes: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record a new route
    pub fn route_registered(&self) {
        self.routes_registered.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an incoming query
    pub fn query_received(&self, byte_count: u64) {
        self.queries_total.fetch_add(1, Ordering::Relaxed);
        self.request_bytes.fetch_add(byte_count, Ordering::Relaxed);
    }

    /// Record a successful query
    pub fn query_succeeded(&self, byte_count: u64) {
        self.queries_succeeded.fetch_add(1, Ordering::Relaxed);
        self.response_bytes.fetch_add(byte_count, Ordering::Relaxed);
    }

    /// Record a failed query
    pub fn query_failed(&self) {
        self.queries_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            routes_registered: self.routes_registered.load(Ordering::Relaxed),
            queries_total: self.queries_total.load(Ordering::Relaxed),
            queries_succeeded: self.queries_succeeded.load(Ordering::Relaxed),
            queries_failed: self.queries_failed.load(Ordering::Relaxed),
            request_bytes: self.request_bytes.load(Ordering::Relaxed),
            response_bytes: self.response_bytes.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// Log current metrics
    pub fn log_metrics(&self) {
        let snapshot = self.snapshot();
        info!(
            routes_registered = snapshot.routes_registered,
            queries_total = snapshot.queries_total,
            queries_succeeded = snapshot.queries_succeeded,
            queries_failed = snapshot.queries_failed,
            request_bytes = snapshot.request_bytes,
            response_bytes = snapshot.response_bytes,
            uptime_seconds = snapshot.uptime_seconds,
            "Router metrics snapshot"
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub routes_registered: u64,
    pub queries_total: u64,
    pub queries_succeeded: u64,
    pub queries_failed: u64,
    pub request_bytes: u64,
    pub response_bytes: u64,
    pub uptime_seconds: u64,
}

/// Timer for measuring operation duration
pub struct Timer {
    start: Instant,
    operation: &'static str,
}

impl Timer {
    /// Start timing an operation
    pub fn start(operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            operation,
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        debug!(
            operation = self.operation,
            duration_us = duration.as_micros() as u64,
            "Operation completed"
        );
    }
}
