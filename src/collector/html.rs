//! HTML strategy: scrape the day page, then resolve each linked page.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::{StreamExt, TryStreamExt, stream};
use scraper::Html;
use tracing::{debug, info, instrument, warn};

use crate::accounting::{CallKind, CallTally};
use crate::calendar::CalendarDay;
use crate::config::CollectorConfig;
use crate::event::Event;
use crate::extract::{LinkPolicy, ParsedEntry, parse_entry, select_event_entries};
use crate::resolver::CoordinateResolver;
use crate::transport::Transport;

use super::{CollectError, DayEventCollector, DayEvents};

/// Collects events by scraping `/wiki/{Month}_{day}`.
///
/// Calls per day: one for the page plus one per link candidate. Lookups may
/// overlap up to `resolve_concurrency`, but results are consumed in candidate
/// order so the output matches a sequential run.
#[derive(Clone)]
pub struct HtmlCollector {
    transport: Arc<dyn Transport>,
    resolver: CoordinateResolver,
    page_base_url: String,
    link_policy: LinkPolicy,
    resolve_concurrency: usize,
}

impl std::fmt::Debug for HtmlCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HtmlCollector")
            .field("page_base_url", &self.page_base_url)
            .field("resolver", &self.resolver)
            .field("link_policy", &self.link_policy)
            .field("resolve_concurrency", &self.resolve_concurrency)
            .finish_non_exhaustive()
    }
}

impl HtmlCollector {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, config: &CollectorConfig) -> Self {
        Self {
            resolver: CoordinateResolver::with_base_url(
                Arc::clone(&transport),
                config.rest_base_url.clone(),
            ),
            transport,
            page_base_url: config.page_base_url.trim_end_matches('/').to_string(),
            link_policy: config.link_policy,
            resolve_concurrency: config.resolve_concurrency.max(1),
        }
    }

    /// URL of the day page, e.g. `.../wiki/January_1`.
    #[must_use]
    pub fn day_page_url(&self, day: CalendarDay) -> String {
        format!("{}/wiki/{}", self.page_base_url, day.page_title())
    }
}

/// Parses the day page and its event entries. Malformed entries are dropped
/// with a warning. Kept synchronous because the parsed document is not `Send`.
fn parse_day_page(body: &str, policy: LinkPolicy) -> Vec<ParsedEntry> {
    let document = Html::parse_document(body);
    select_event_entries(&document)
        .iter()
        .filter_map(|entry| match parse_entry(entry, policy) {
            Ok(parsed) => Some(parsed),
            Err(error) => {
                warn!(error = %error, "skipping malformed entry");
                None
            }
        })
        .collect()
}

#[async_trait]
impl DayEventCollector for HtmlCollector {
    fn name(&self) -> &'static str {
        "html"
    }

    #[instrument(skip(self), fields(day = %day))]
    async fn collect(&self, day: CalendarDay) -> Result<DayEvents, CollectError> {
        let url = self.day_page_url(day);
        let response = self.transport.get(&url).await?;
        let mut calls = CallTally::new();
        calls.record(CallKind::DayPage);

        if !response.is_success() {
            return Err(CollectError::unexpected_status(&url, response.status));
        }

        let entries = parse_day_page(&response.body, self.link_policy);
        let candidates: Vec<(&ParsedEntry, &str)> = entries
            .iter()
            .flat_map(|entry| entry.links.iter().map(move |link| (entry, link.as_str())))
            .collect();
        debug!(
            entries = entries.len(),
            candidates = candidates.len(),
            "day page parsed"
        );

        let lookups: Vec<_> = candidates
            .iter()
            .map(|(_, title)| self.resolver.resolve(title))
            .collect();
        let resolved: Vec<_> = stream::iter(lookups)
            .buffered(self.resolve_concurrency)
            .try_collect()
            .await?;
        calls.record_many(
            CallKind::PageSource,
            u32::try_from(candidates.len()).unwrap_or(u32::MAX),
        );

        let events: Vec<Event> = candidates
            .iter()
            .zip(resolved)
            .filter_map(|((entry, _), coordinates)| {
                coordinates.map(|c| Event::new(day, entry.year, entry.description.clone(), c))
            })
            .collect();

        info!(events = events.len(), %calls, "day collected");
        Ok(DayEvents { day, events, calls })
    }
}
