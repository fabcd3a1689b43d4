//! External request accounting.
//!
//! A [`CallTally`] counts the logical calls made while collecting one day and
//! travels back with the day's events. A [`RequestLedger`] is shared across
//! the whole run and accumulates tallies plus the raw HTTP attempts the
//! transport makes (retries included).

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Kind of external call made by a collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    /// The scraped day page (`/wiki/January_1`).
    DayPage,
    /// A page source lookup made while resolving coordinates.
    PageSource,
    /// The onthisday feed endpoint.
    Feed,
}

/// Logical external calls made for a single day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallTally {
    day_pages: u32,
    page_sources: u32,
    feeds: u32,
}

impl CallTally {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one call of the given kind.
    pub fn record(&mut self, kind: CallKind) {
        self.record_many(kind, 1);
    }

    /// Counts `count` calls of the given kind.
    pub fn record_many(&mut self, kind: CallKind, count: u32) {
        let slot = match kind {
            CallKind::DayPage => &mut self.day_pages,
            CallKind::PageSource => &mut self.page_sources,
            CallKind::Feed => &mut self.feeds,
        };
        *slot = slot.saturating_add(count);
    }

    #[must_use]
    pub fn count(&self, kind: CallKind) -> u32 {
        match kind {
            CallKind::DayPage => self.day_pages,
            CallKind::PageSource => self.page_sources,
            CallKind::Feed => self.feeds,
        }
    }

    /// Adds another tally's counts to this one.
    pub fn merge(&mut self, other: &CallTally) {
        self.day_pages = self.day_pages.saturating_add(other.day_pages);
        self.page_sources = self.page_sources.saturating_add(other.page_sources);
        self.feeds = self.feeds.saturating_add(other.feeds);
    }

    /// Total calls of every kind.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.day_pages
            .saturating_add(self.page_sources)
            .saturating_add(self.feeds)
    }
}

impl fmt::Display for CallTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} calls ({} day page, {} page source, {} feed)",
            self.total(),
            self.day_pages,
            self.page_sources,
            self.feeds
        )
    }
}

/// Run-wide request totals, shared between the transport and the orchestrator.
///
/// `RequestLedger` is `Send + Sync`; wrap it in `Arc` to share it.
#[derive(Debug, Default)]
pub struct RequestLedger {
    days: AtomicU64,
    logical_calls: AtomicU64,
    http_attempts: AtomicU64,
}

/// Point-in-time copy of a [`RequestLedger`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerSnapshot {
    pub days: u64,
    pub logical_calls: u64,
    pub http_attempts: u64,
}

impl RequestLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a finished day's tally.
    pub fn record_day(&self, tally: &CallTally) {
        self.days.fetch_add(1, Ordering::Relaxed);
        self.logical_calls
            .fetch_add(u64::from(tally.total()), Ordering::Relaxed);
    }

    /// Counts one HTTP request actually sent, retries included.
    pub fn record_attempt(&self) {
        self.http_attempts.fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            days: self.days.load(Ordering::Relaxed),
            logical_calls: self.logical_calls.load(Ordering::Relaxed),
            http_attempts: self.http_attempts.load(Ordering::Relaxed),
        }
    }
}
