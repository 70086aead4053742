//! Logger metrics
//!
//! Counters for monitoring the logging frontend: records written, records
//! filtered out by level, and records lost to sink errors.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logger observability
///
/// # Example
///
/// ```
/// use gcp_log_handler::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_failed();
/// metrics.record_logged();
///
/// assert_eq!(metrics.failed_count(), 1);
/// assert_eq!(metrics.total_logged(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Records handed to the handler and written
    total_logged: AtomicU64,

    /// Records below the handler's minimum level
    filtered_count: AtomicU64,

    /// Records the handler failed to write
    failed_count: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            total_logged: AtomicU64::new(0),
            filtered_count: AtomicU64::new(0),
            failed_count: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn total_logged(&self) -> u64 {
        self.total_logged.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn filtered_count(&self) -> u64 {
        self.filtered_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn failed_count(&self) -> u64 {
        self.failed_count.load(Ordering::Relaxed)
    }

    /// Record a written entry, returning the previous count
    #[inline]
    pub fn record_logged(&self) -> u64 {
        self.total_logged.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.filtered_count.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_failed(&self) -> u64 {
        self.failed_count.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.total_logged(), 0);
        assert_eq!(metrics.filtered_count(), 0);
        assert_eq!(metrics.failed_count(), 0);
    }

    #[test]
    fn test_metrics_record_failed() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.record_failed(), 0); // Returns previous value
        assert_eq!(metrics.failed_count(), 1);
        metrics.record_failed();
        assert_eq!(metrics.failed_count(), 2);
    }
}
