//! Watcher statistics with atomic counters.
//!
//! [`WatcherStats`] is shared between the [`RecursiveWatcher`] handle and
//! its dispatch task. All counters use relaxed ordering; the numbers are for
//! display and diagnostics only.
//!
//! [`RecursiveWatcher`]: crate::RecursiveWatcher

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Atomic counters describing what the dispatch loop has done.
#[derive(Debug, Default)]
pub struct WatcherStats {
    /// Events delivered to the consumer.
    forwarded: AtomicU64,
    /// Events rejected by the installed filter.
    filtered: AtomicU64,
    /// Events dropped because the event channel was full.
    dropped_events: AtomicU64,
    /// Errors dropped because the error channel was full.
    dropped_errors: AtomicU64,
    /// Paths registered with the backend.
    registered: AtomicU64,
}

impl WatcherStats {
    /// Creates a new [`WatcherStats`] with all counters at zero.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn increment_forwarded(&self) {
        self.forwarded.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn increment_filtered(&self) {
        self.filtered.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn increment_dropped_events(&self) {
        self.dropped_events.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn increment_dropped_errors(&self) {
        self.dropped_errors.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_registered(&self, count: u64) {
        self.registered.fetch_add(count, Ordering::Relaxed);
    }

    /// Returns a point-in-time snapshot of all counters.
    ///
    /// # Examples
    ///
    /// ```
    /// use dw_watcher::WatcherStats;
    ///
    /// let stats = WatcherStats::new();
    /// let snapshot = stats.snapshot();
    /// assert_eq!(snapshot.forwarded, 0);
    /// assert_eq!(snapshot.dropped(), 0);
    /// ```
    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            forwarded: self.forwarded.load(Ordering::Relaxed),
            filtered: self.filtered.load(Ordering::Relaxed),
            dropped_events: self.dropped_events.load(Ordering::Relaxed),
            dropped_errors: self.dropped_errors.load(Ordering::Relaxed),
            registered: self.registered.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time copy of [`WatcherStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Events delivered to the consumer.
    pub forwarded: u64,
    /// Events rejected by the installed filter.
    pub filtered: u64,
    /// Events dropped because the event channel was full.
    pub dropped_events: u64,
    /// Errors dropped because the error channel was full.
    pub dropped_errors: u64,
    /// Paths registered with the backend.
    pub registered: u64,
}

impl StatsSnapshot {
    /// Total number of events and errors lost to a full channel.
    #[inline]
    #[must_use]
    pub const fn dropped(&self) -> u64 {
        self.dropped_events + self.dropped_errors
    }
}
