//! Page-source lookups against the MediaWiki REST API.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::event::Coordinates;
use crate::transport::Transport;

use super::ResolveError;
use super::coordinates::parse_coord_template;

/// Default origin of the page-source endpoint.
pub const DEFAULT_REST_BASE_URL: &str = "https://en.wikipedia.org";

const PAGE_SOURCE_PATH: &str = "/w/rest.php/v1/page/";

/// The part of a REST page object we read.
#[derive(Debug, Deserialize)]
struct PageSource {
    source: String,
}

/// Resolves page titles to coordinates, one fetch per call.
///
/// Results are not cached; resolving the same title twice issues two requests
/// and returns the same answer for unchanged remote content.
#[derive(Clone)]
pub struct CoordinateResolver {
    transport: Arc<dyn Transport>,
    rest_base_url: String,
}

impl std::fmt::Debug for CoordinateResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoordinateResolver")
            .field("rest_base_url", &self.rest_base_url)
            .finish_non_exhaustive()
    }
}

impl CoordinateResolver {
    /// Creates a resolver against the English Wikipedia REST API.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_base_url(transport, DEFAULT_REST_BASE_URL)
    }

    /// Creates a resolver against a custom origin (used by tests).
    #[must_use]
    pub fn with_base_url(transport: Arc<dyn Transport>, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            rest_base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// URL of the page-source endpoint for `title`.
    #[must_use]
    pub fn page_source_url(&self, title: &str) -> String {
        format!(
            "{}{PAGE_SOURCE_PATH}{}",
            self.rest_base_url,
            title.replace('/', "%2F")
        )
    }

    /// Fetches `title`'s wikitext and extracts its `coord` template.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] on transport failure or a status other than
    /// 2xx and 404. A missing page, an unreadable body or a page without a
    /// template all resolve to `Ok(None)`.
    #[instrument(skip(self))]
    pub async fn resolve(&self, title: &str) -> Result<Option<Coordinates>, ResolveError> {
        let response = self.transport.get(&self.page_source_url(title)).await?;

        if response.is_not_found() {
            debug!("page not found");
            return Ok(None);
        }
        if !response.is_success() {
            return Err(ResolveError::unexpected_status(title, response.status));
        }

        let page: PageSource = match serde_json::from_str(&response.body) {
            Ok(page) => page,
            Err(error) => {
                warn!(error = %error, "page source body is not a page object");
                return Ok(None);
            }
        };

        let coordinates = parse_coord_template(&page.source);
        debug!(found = coordinates.is_some(), "page source scanned");
        Ok(coordinates)
    }
}
