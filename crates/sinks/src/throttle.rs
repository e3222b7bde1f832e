//! Throttled error reporting
//!
//! Log emission failures must never crash or spam the emitting
//! application. Under a sustained failure (disk full, permissions) this
//! reports at most once per interval through `tracing`, carrying the count
//! of suppressed occurrences since the last report.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Default minimum interval between reports
pub const DEFAULT_REPORT_INTERVAL: Duration = Duration::from_secs(10);

/// Throttled reporter for hot-path failures
///
/// Thread-safe: atomic counters plus a mutex around the last-report time.
pub struct ErrorThrottle {
    min_interval: Duration,
    last_report: Mutex<Option<Instant>>,
    suppressed: AtomicU64,
    total: AtomicU64,
}

impl ErrorThrottle {
    /// Create a throttle with the given minimum report interval
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_report: Mutex::new(None),
            suppressed: AtomicU64::new(0),
            total: AtomicU64::new(0),
        }
    }

    /// Record a failure, reporting it if the interval has elapsed
    ///
    /// Returns true if the failure was reported, false if suppressed.
    pub fn report(&self, what: &str, error: &dyn std::fmt::Display) -> bool {
        self.suppressed.fetch_add(1, Ordering::Relaxed);
        self.total.fetch_add(1, Ordering::Relaxed);

        let due = {
            let mut last = self.last_report.lock();
            let now = Instant::now();
            match *last {
                Some(at) if now.duration_since(at) < self.min_interval => false,
                _ => {
                    *last = Some(now);
                    true
                }
            }
        };

        if due {
            let pending = self.suppressed.swap(0, Ordering::Relaxed);
            let total = self.total.load(Ordering::Relaxed);
            if pending > 1 {
                tracing::error!(
                    what = %what,
                    error = %error,
                    suppressed = pending - 1,
                    total,
                    "sink failure (throttled)"
                );
            } else {
                tracing::error!(what = %what, error = %error, total, "sink failure");
            }
        }
        due
    }

    /// Failures recorded but not yet reported
    pub fn pending(&self) -> u64 {
        self.suppressed.load(Ordering::Relaxed)
    }

    /// Total failures ever recorded
    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }
}

impl Default for ErrorThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_REPORT_INTERVAL)
    }
}
