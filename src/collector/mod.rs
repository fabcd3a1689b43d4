//! Per-day event collection.
//!
//! Two interchangeable strategies implement [`DayEventCollector`]:
//!
//! - [`HtmlCollector`] scrapes the day page, then resolves each linked page's
//!   coordinates through a separate page-source lookup.
//! - [`FeedCollector`] reads the onthisday feed, which already carries
//!   coordinates per linked page.
//!
//! Both return the same [`DayEvents`] shape: the day's events plus the
//! external calls made to produce them.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use onthisday_core::collector::{DayEventCollector, FeedCollector};
//! use onthisday_core::config::CollectorConfig;
//! use onthisday_core::transport::{HttpTransport, TransportConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = Arc::new(HttpTransport::new(TransportConfig::default())?);
//! let collector = FeedCollector::new(transport, &CollectorConfig::default());
//! let day = collector.collect_date(7, 4).await?;
//! println!("{} events, {}", day.events.len(), day.calls);
//! # Ok(())
//! # }
//! ```

mod error;
mod feed;
mod html;

pub use error::CollectError;
pub use feed::FeedCollector;
pub use html::HtmlCollector;

use async_trait::async_trait;

use crate::accounting::CallTally;
use crate::calendar::CalendarDay;
use crate::event::Event;

/// Events collected for one day and the external calls spent on them.
#[derive(Debug, Clone, PartialEq)]
pub struct DayEvents {
    pub day: CalendarDay,
    /// Entry order, then link order within an entry.
    pub events: Vec<Event>,
    pub calls: CallTally,
}

/// A strategy that turns one calendar day into located events.
///
/// # Object Safety
///
/// Uses `async_trait` so the CLI can pick a strategy at runtime as
/// `Box<dyn DayEventCollector>`.
#[async_trait]
pub trait DayEventCollector: Send + Sync {
    /// Short strategy name for logs.
    fn name(&self) -> &'static str;

    /// Collects a validated day.
    async fn collect(&self, day: CalendarDay) -> Result<DayEvents, CollectError>;

    /// Validates a numeric `(month, day)` and collects it.
    ///
    /// # Errors
    ///
    /// Returns [`CollectError::InvalidInput`] before any request when the date
    /// is out of range, otherwise whatever [`collect`](Self::collect) returns.
    async fn collect_date(&self, month: u8, day: u8) -> Result<DayEvents, CollectError> {
        let day = CalendarDay::new(month, day)?;
        self.collect(day).await
    }
}
