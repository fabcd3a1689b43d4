//! HTTP transport consumed by the collectors and the coordinate resolver.
//!
//! The core only needs `GET url -> (status, body)`. [`Transport`] is that
//! seam; [`HttpTransport`] implements it with reqwest and owns everything
//! below the core's concern: the User-Agent header, connect/read timeouts,
//! retrying transient failures and per-host request spacing.
//!
//! # Defaults
//!
//! - Connect timeout: 10 seconds
//! - Read timeout: 30 seconds
//! - Attempts: 3 (exponential backoff from 500 ms)
//! - Minimum spacing per host: 100 ms

mod client;
mod error;
pub mod rate_limiter;
mod retry;

pub use client::HttpTransport;
pub use error::TransportError;
pub use rate_limiter::RateLimiter;
pub use retry::{
    DEFAULT_MAX_ATTEMPTS, FailureType, RetryDecision, RetryPolicy, classify_error,
    classify_status,
};

use std::time::Duration;

use async_trait::async_trait;

use crate::user_agent;

const CONNECT_TIMEOUT_SECS: u64 = 10;
const READ_TIMEOUT_SECS: u64 = 30;

/// Default minimum spacing between two requests to the same host.
pub const DEFAULT_MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(100);

/// Final response of a fetch: status plus decoded body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }
}

/// Issues GET requests for the collectors.
///
/// Any status code is a successful fetch at this level; only failures to get a
/// response at all are errors.
///
/// # Object Safety
///
/// Uses `async_trait` so collectors can hold an `Arc<dyn Transport>`.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetches `url` and returns the final response.
    async fn get(&self, url: &str) -> Result<FetchResponse, TransportError>;
}

/// Settings for [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Full User-Agent header value.
    pub user_agent: String,
    pub connect_timeout: Duration,
    /// Whole-request timeout, body included.
    pub read_timeout: Duration,
    /// Attempts per fetch, initial request included (minimum 1).
    pub max_attempts: u32,
    pub retry_base_delay: Duration,
    /// Zero disables spacing.
    pub min_request_interval: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            user_agent: user_agent::default_user_agent(),
            connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
            read_timeout: Duration::from_secs(READ_TIMEOUT_SECS),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_base_delay: retry::DEFAULT_BASE_DELAY,
            min_request_interval: DEFAULT_MIN_REQUEST_INTERVAL,
        }
    }
}
