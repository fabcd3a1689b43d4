//! Library-side configuration for the collectors.

use serde::{Deserialize, Serialize};

use crate::extract::LinkPolicy;
use crate::resolver::DEFAULT_REST_BASE_URL;

/// Default origin of the scraped day pages.
pub const DEFAULT_PAGE_BASE_URL: &str = "https://en.wikipedia.org";

/// Default origin of the onthisday feed.
pub const DEFAULT_FEED_BASE_URL: &str = "https://api.wikimedia.org";

/// Upper bound accepted for [`CollectorConfig::resolve_concurrency`].
pub const MAX_RESOLVE_CONCURRENCY: usize = 16;

/// Where the collectors fetch from and how the HTML strategy treats links.
///
/// Base URLs are origins without a trailing slash; tests point all three at a
/// mock server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectorConfig {
    pub page_base_url: String,
    pub rest_base_url: String,
    pub feed_base_url: String,
    pub link_policy: LinkPolicy,
    /// In-flight page-source lookups per day. Output order does not depend on it.
    pub resolve_concurrency: usize,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            page_base_url: DEFAULT_PAGE_BASE_URL.to_string(),
            rest_base_url: DEFAULT_REST_BASE_URL.to_string(),
            feed_base_url: DEFAULT_FEED_BASE_URL.to_string(),
            link_policy: LinkPolicy::default(),
            resolve_concurrency: 1,
        }
    }
}

impl CollectorConfig {
    /// Points every endpoint at one origin.
    #[must_use]
    pub fn with_base_url(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            page_base_url: base_url.clone(),
            rest_base_url: base_url.clone(),
            feed_base_url: base_url,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_link_policy(mut self, link_policy: LinkPolicy) -> Self {
        self.link_policy = link_policy;
        self
    }

    /// Sets the lookup concurrency, clamped to `1..=MAX_RESOLVE_CONCURRENCY`.
    #[must_use]
    pub fn with_resolve_concurrency(mut self, concurrency: usize) -> Self {
        self.resolve_concurrency = concurrency.clamp(1, MAX_RESOLVE_CONCURRENCY);
        self
    }
}
