//! On-this-day geo events library
//!
//! Collects the historical events Wikipedia lists for each calendar day and
//! keeps only those that can be tied to a place, producing records with a
//! year, an HTML description and decimal coordinates.
//!
//! # Architecture
//!
//! - [`calendar`] - Month table and validated `(month, day)` requests
//! - [`extract`] - Events section isolation and entry parsing
//! - [`resolver`] - Page title to coordinates via the page source
//! - [`collector`] - HTML and feed strategies behind one trait
//! - [`transport`] - HTTP with timeouts, retries and per-host spacing
//! - [`accounting`] - Per-day and run-wide external call counts
//! - [`store`] - Month files on disk

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod accounting;
pub mod calendar;
pub mod collector;
pub mod config;
pub mod event;
pub mod extract;
pub mod resolver;
pub mod store;
pub mod transport;
pub mod user_agent;

mod utils;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use accounting::{CallKind, CallTally, LedgerSnapshot, RequestLedger};
pub use calendar::{CalendarDay, MONTHS_WITH_DAYS, Month};
pub use collector::{CollectError, DayEventCollector, DayEvents, FeedCollector, HtmlCollector};
pub use config::CollectorConfig;
pub use event::{Coordinates, Event};
pub use extract::{EntryError, LinkPolicy};
pub use resolver::{CoordinateResolver, ResolveError};
pub use store::StoreError;
pub use transport::{FetchResponse, HttpTransport, Transport, TransportConfig, TransportError};
