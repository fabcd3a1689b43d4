//! Feed strategy: one call to the Wikimedia onthisday events endpoint.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::accounting::{CallKind, CallTally};
use crate::calendar::CalendarDay;
use crate::config::CollectorConfig;
use crate::event::{Coordinates, Event};
use crate::transport::Transport;

use super::{CollectError, DayEventCollector, DayEvents};

const FEED_PATH: &str = "/feed/v1/wikipedia/en/onthisday/events";

#[derive(Debug, Deserialize)]
struct FeedResponse {
    #[serde(default)]
    events: Vec<FeedEvent>,
}

#[derive(Debug, Deserialize)]
struct FeedEvent {
    text: String,
    year: i32,
    #[serde(default)]
    pages: Vec<FeedPage>,
}

#[derive(Debug, Deserialize)]
struct FeedPage {
    coordinates: Option<FeedCoordinates>,
}

#[derive(Debug, Deserialize)]
struct FeedCoordinates {
    lat: f64,
    lon: f64,
}

/// Collects events from the onthisday feed.
///
/// Every linked page with coordinates yields one event carrying the feed
/// event's plain-text description.
#[derive(Clone)]
pub struct FeedCollector {
    transport: Arc<dyn Transport>,
    feed_base_url: String,
}

impl std::fmt::Debug for FeedCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedCollector")
            .field("feed_base_url", &self.feed_base_url)
            .finish_non_exhaustive()
    }
}

impl FeedCollector {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, config: &CollectorConfig) -> Self {
        Self {
            transport,
            feed_base_url: config.feed_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Feed URL for `day`, with zero-padded month and day.
    #[must_use]
    pub fn feed_url(&self, day: CalendarDay) -> String {
        format!(
            "{}{FEED_PATH}/{:02}/{:02}",
            self.feed_base_url,
            day.month().number(),
            day.day()
        )
    }
}

#[async_trait]
impl DayEventCollector for FeedCollector {
    fn name(&self) -> &'static str {
        "feed"
    }

    #[instrument(skip(self), fields(day = %day))]
    async fn collect(&self, day: CalendarDay) -> Result<DayEvents, CollectError> {
        let url = self.feed_url(day);
        let response = self.transport.get(&url).await?;
        let mut calls = CallTally::new();
        calls.record(CallKind::Feed);

        if !response.is_success() {
            return Err(CollectError::unexpected_status(&url, response.status));
        }

        let feed: FeedResponse = serde_json::from_str(&response.body)
            .map_err(|source| CollectError::MalformedFeed { url, source })?;
        debug!(feed_events = feed.events.len(), "feed decoded");

        let events: Vec<Event> = feed
            .events
            .into_iter()
            .flat_map(|event| {
                let FeedEvent { text, year, pages } = event;
                pages
                    .into_iter()
                    .filter_map(|page| page.coordinates)
                    .map(move |position| {
                        Event::new(
                            day,
                            year,
                            text.clone(),
                            Coordinates::new(position.lat, position.lon),
                        )
                    })
            })
            .collect();

        info!(events = events.len(), %calls, "day collected");
        Ok(DayEvents { day, events, calls })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::test_support::socket_guard::start_mock_server_or_skip;
    use crate::transport::{HttpTransport, TransportConfig};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, ResponseTemplate};

    fn collector(base_url: &str) -> FeedCollector {
        let transport = HttpTransport::new(TransportConfig {
            retry_base_delay: Duration::from_millis(5),
            min_request_interval: Duration::ZERO,
            ..TransportConfig::default()
        })
        .unwrap();
        FeedCollector::new(Arc::new(transport), &CollectorConfig::with_base_url(base_url))
    }

    #[test]
    fn test_feed_url_is_zero_padded() {
        let collector = collector("https://api.wikimedia.org");
        let day = CalendarDay::new(7, 4).unwrap();
        assert_eq!(
            collector.feed_url(day),
            "https://api.wikimedia.org/feed/v1/wikipedia/en/onthisday/events/07/04"
        );
    }

    #[tokio::test]
    async fn test_collect_emits_one_event_per_located_page() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        let body = serde_json::json!({
            "events": [
                {
                    "text": "The United States Declaration of Independence is adopted.",
                    "year": 1776,
                    "pages": [
                        { "title": "Philadelphia", "coordinates": { "lat": 39.952_583, "lon": -75.165_222 } },
                        { "title": "Thomas_Jefferson" },
                        { "title": "Independence_Hall", "coordinates": { "lat": 39.948_9, "lon": -75.15 } }
                    ]
                },
                { "text": "No places here.", "year": -45, "pages": [] }
            ]
        });
        Mock::given(method("GET"))
            .and(path("/feed/v1/wikipedia/en/onthisday/events/07/04"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&server)
            .await;

        let day = collector(&server.uri()).collect_date(7, 4).await.unwrap();
        assert_eq!(day.calls.total(), 1);
        assert_eq!(day.calls.count(CallKind::Feed), 1);
        assert_eq!(day.events.len(), 2);
        assert_eq!(day.events[0].latitude, 39.9526);
        assert_eq!(day.events[0].longitude, -75.1652);
        assert_eq!(day.events[0].year, 1776);
        assert_eq!(day.events[0].month, "July");
        assert_eq!(day.events[0].day, 4);
        assert_eq!(day.events[1].latitude, 39.9489);
    }

    #[tokio::test]
    async fn test_collect_rejects_malformed_feed() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"events\": 42}"))
            .mount(&server)
            .await;

        let error = collector(&server.uri()).collect_date(1, 1).await.unwrap_err();
        assert!(matches!(error, CollectError::MalformedFeed { .. }), "got {error:?}");
    }

    #[tokio::test]
    async fn test_collect_surfaces_non_success_status() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let error = collector(&server.uri()).collect_date(2, 29).await.unwrap_err();
        assert!(matches!(
            error,
            CollectError::UnexpectedStatus { status: 404, .. }
        ));
    }

    #[tokio::test]
    async fn test_invalid_date_makes_no_request() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let collector = collector(&server.uri());
        for (month, day) in [(13, 1), (1, 0), (2, 30), (0, 5)] {
            let error = collector.collect_date(month, day).await.unwrap_err();
            assert!(matches!(error, CollectError::InvalidInput { .. }));
        }
    }
}
