//! Interception statistics
//!
//! Provides `InterceptStats` for tracking how requests were answered, with
//! relaxed atomic counters safe to share across concurrent resolutions.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Counters for every resolution outcome and background refresh
#[derive(Debug)]
pub struct InterceptStats {
    /// Answered from a fresh stored entry
    pub fresh_hits: AtomicU64,
    /// Answered from a preload response
    pub preload_serves: AtomicU64,
    /// Answered from the network
    pub network_serves: AtomicU64,
    /// Network failed, answered from a stale entry
    pub stale_fallbacks: AtomicU64,
    /// Network failed, answered with the offline fallback document
    pub offline_fallbacks: AtomicU64,
    /// Network failed with nothing stored, answered with the synthetic error
    pub synthetic_errors: AtomicU64,
    /// Background refreshes spawned
    pub refreshes_started: AtomicU64,
    /// Background refreshes that failed
    pub refreshes_failed: AtomicU64,
    /// Responses refused by the storability guard
    pub rejected_puts: AtomicU64,
    /// Creation time
    pub created_at: Instant,
}

impl Default for InterceptStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time copy of [`InterceptStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InterceptStatsSnapshot {
    pub fresh_hits: u64,
    pub preload_serves: u64,
    pub network_serves: u64,
    pub stale_fallbacks: u64,
    pub offline_fallbacks: u64,
    pub synthetic_errors: u64,
    pub refreshes_started: u64,
    pub refreshes_failed: u64,
    pub rejected_puts: u64,
}

impl InterceptStatsSnapshot {
    /// Total resolutions counted
    #[must_use]
    pub fn resolutions(&self) -> u64 {
        self.fresh_hits
            + self.preload_serves
            + self.network_serves
            + self.stale_fallbacks
            + self.offline_fallbacks
            + self.synthetic_errors
    }
}

impl InterceptStats {
    #[must_use]
    pub fn new() -> Self {
        Self {
            fresh_hits: AtomicU64::new(0),
            preload_serves: AtomicU64::new(0),
            network_serves: AtomicU64::new(0),
            stale_fallbacks: AtomicU64::new(0),
            offline_fallbacks: AtomicU64::new(0),
            synthetic_errors: AtomicU64::new(0),
            refreshes_started: AtomicU64::new(0),
            refreshes_failed: AtomicU64::new(0),
            rejected_puts: AtomicU64::new(0),
            created_at: Instant::now(),
        }
    }

    pub(crate) fn record(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Share of resolutions answered from a fresh stored entry, as a percentage
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let snapshot = self.snapshot();
        let total = snapshot.resolutions();
        if total == 0 {
            return 0.0;
        }

        // Precision loss acceptable for a percentage
        #[allow(clippy::cast_precision_loss)]
        let rate = snapshot.fresh_hits as f64 / total as f64 * 100.0;
        rate
    }

    /// Get statistics snapshot
    #[must_use]
    pub fn snapshot(&self) -> InterceptStatsSnapshot {
        InterceptStatsSnapshot {
            fresh_hits: self.fresh_hits.load(Ordering::Relaxed),
            preload_serves: self.preload_serves.load(Ordering::Relaxed),
            network_serves: self.network_serves.load(Ordering::Relaxed),
            stale_fallbacks: self.stale_fallbacks.load(Ordering::Relaxed),
            offline_fallbacks: self.offline_fallbacks.load(Ordering::Relaxed),
            synthetic_errors: self.synthetic_errors.load(Ordering::Relaxed),
            refreshes_started: self.refreshes_started.load(Ordering::Relaxed),
            refreshes_failed: self.refreshes_failed.load(Ordering::Relaxed),
            rejected_puts: self.rejected_puts.load(Ordering::Relaxed),
        }
    }

    /// Time since the stats were created
    #[must_use]
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }
}
