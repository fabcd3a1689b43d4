//! reqwest-backed [`Transport`] used in production.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use tracing::{debug, instrument, warn};

use crate::accounting::RequestLedger;

use super::rate_limiter::RateLimiter;
use super::retry::{FailureType, RetryDecision, RetryPolicy, classify_error, classify_status};
use super::{FetchResponse, Transport, TransportConfig, TransportError};

/// HTTP transport with timeouts, retries and per-host spacing.
///
/// Create it once per run and share it; the underlying client pools
/// connections.
///
/// # Example
///
/// ```no_run
/// use onthisday_core::transport::{HttpTransport, Transport, TransportConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let transport = HttpTransport::new(TransportConfig::default())?;
/// let response = transport.get("https://en.wikipedia.org/wiki/January_1").await?;
/// println!("HTTP {} ({} bytes)", response.status, response.body.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    retry: RetryPolicy,
    limiter: Arc<RateLimiter>,
    ledger: Option<Arc<RequestLedger>>,
}

impl HttpTransport {
    /// Builds the client from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::ClientBuild`] when the user agent is not a valid
    /// header value or the client cannot be constructed.
    #[instrument(skip_all, fields(user_agent = %config.user_agent))]
    pub fn new(config: TransportConfig) -> Result<Self, TransportError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/json;q=0.9,*/*;q=0.8"),
        );

        let user_agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|e| TransportError::client_build(format!("invalid user agent: {e}")))?;

        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.read_timeout)
            .user_agent(user_agent)
            .default_headers(headers)
            .gzip(true)
            .build()
            .map_err(|e| TransportError::client_build(e.to_string()))?;

        let retry = RetryPolicy::with_max_attempts(config.max_attempts)
            .with_base_delay(config.retry_base_delay);

        Ok(Self {
            client,
            retry,
            limiter: Arc::new(RateLimiter::new(config.min_request_interval)),
            ledger: None,
        })
    }

    /// Counts every HTTP attempt (retries included) into `ledger`.
    #[must_use]
    pub fn with_ledger(mut self, ledger: Arc<RequestLedger>) -> Self {
        self.ledger = Some(ledger);
        self
    }

    async fn send_once(&self, url: &str) -> Result<FetchResponse, TransportError> {
        self.limiter.acquire(url).await;
        if let Some(ledger) = &self.ledger {
            ledger.record_attempt();
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(url, e))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::from_reqwest(url, e))?;

        Ok(FetchResponse { status, body })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self), fields(url = %url))]
    async fn get(&self, url: &str) -> Result<FetchResponse, TransportError> {
        let mut attempt = 1;
        loop {
            let outcome = self.send_once(url).await;
            let failure = match &outcome {
                Ok(response) => classify_status(response.status),
                Err(error) => Some(classify_error(error)),
            };

            let Some(failure) = failure else {
                debug!(attempt, "fetch complete");
                return outcome;
            };
            if failure == FailureType::Permanent {
                return outcome;
            }

            match self.retry.should_retry(failure, attempt) {
                RetryDecision::Retry {
                    delay,
                    attempt: next,
                } => {
                    warn!(
                        attempt,
                        failure = ?failure,
                        delay_ms = delay.as_millis(),
                        "transient fetch failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt = next;
                }
                RetryDecision::DoNotRetry { reason } => {
                    debug!(attempt, %reason, "giving up on fetch");
                    return outcome;
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::test_support::socket_guard::start_mock_server_or_skip;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, ResponseTemplate};

    fn fast_config() -> TransportConfig {
        TransportConfig {
            user_agent: "onthisday-test/0.1 (tests@example.org)".to_string(),
            retry_base_delay: Duration::from_millis(5),
            min_request_interval: Duration::ZERO,
            ..TransportConfig::default()
        }
    }

    #[tokio::test]
    async fn test_get_sends_configured_user_agent() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .and(path("/wiki/May_1"))
            .and(header("user-agent", "onthisday-test/0.1 (tests@example.org)"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpTransport::new(fast_config()).unwrap();
        let response = transport
            .get(&format!("{}/wiki/May_1", server.uri()))
            .await
            .unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body, "<html></html>");
    }

    #[tokio::test]
    async fn test_get_returns_404_without_retrying() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let ledger = Arc::new(RequestLedger::new());
        let transport = HttpTransport::new(fast_config())
            .unwrap()
            .with_ledger(Arc::clone(&ledger));
        let response = transport
            .get(&format!("{}/missing", server.uri()))
            .await
            .unwrap();
        assert_eq!(response.status, 404);
        assert_eq!(ledger.snapshot().http_attempts, 1);
    }

    #[tokio::test]
    async fn test_get_retries_server_errors_then_succeeds() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let ledger = Arc::new(RequestLedger::new());
        let transport = HttpTransport::new(fast_config())
            .unwrap()
            .with_ledger(Arc::clone(&ledger));
        let response = transport
            .get(&format!("{}/flaky", server.uri()))
            .await
            .unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body, "ok");
        assert_eq!(ledger.snapshot().http_attempts, 3);
    }

    #[tokio::test]
    async fn test_get_returns_last_status_when_retries_exhausted() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .and(path("/down"))
            .respond_with(ResponseTemplate::new(502))
            .expect(3)
            .mount(&server)
            .await;

        let transport = HttpTransport::new(fast_config()).unwrap();
        let response = transport
            .get(&format!("{}/down", server.uri()))
            .await
            .unwrap();
        assert_eq!(response.status, 502);
    }

    #[tokio::test]
    async fn test_get_times_out_as_transport_error() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let config = TransportConfig {
            read_timeout: Duration::from_millis(100),
            max_attempts: 1,
            ..fast_config()
        };
        let transport = HttpTransport::new(config).unwrap();
        let error = transport
            .get(&format!("{}/slow", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(error, TransportError::Timeout { .. }), "got {error:?}");
    }

    #[test]
    fn test_invalid_user_agent_fails_construction() {
        let config = TransportConfig {
            user_agent: "bad\nagent".to_string(),
            ..TransportConfig::default()
        };
        let error = HttpTransport::new(config).unwrap_err();
        assert!(matches!(error, TransportError::ClientBuild { .. }));
    }
}
