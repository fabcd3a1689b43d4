//! Error types for the transport layer.

use thiserror::Error;

/// Errors raised while talking to a remote HTTP surface.
///
/// Every variant is transient from the core's point of view: the transport
/// already retried where it made sense, so callers decide whether to skip or
/// retry the whole day.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network-level failure (DNS, connection refused, TLS, reset body).
    #[error("network error fetching {url}: {source}")]
    Network {
        /// The URL being fetched.
        url: String,
        /// The underlying client error.
        #[source]
        source: reqwest::Error,
    },

    /// The request exceeded the configured connect or read timeout.
    #[error("timeout fetching {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// The HTTP client could not be built from the supplied configuration.
    #[error("HTTP client construction failed: {reason}")]
    ClientBuild {
        /// Why construction failed.
        reason: String,
    },
}

impl TransportError {
    /// Maps a client error to `Timeout` or `Network`, keeping the URL.
    pub fn from_reqwest(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout { url: url.into() }
        } else {
            Self::Network {
                url: url.into(),
                source,
            }
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates a client construction error.
    pub fn client_build(reason: impl Into<String>) -> Self {
        Self::ClientBuild {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_display_contains_url() {
        let error = TransportError::timeout("https://en.wikipedia.org/wiki/May_5");
        let msg = error.to_string();
        assert!(msg.contains("timeout"), "Expected 'timeout' in: {msg}");
        assert!(msg.contains("May_5"), "Expected URL in: {msg}");
    }

    #[test]
    fn test_client_build_message_carries_reason() {
        let error = TransportError::client_build("invalid header value");
        assert!(error.to_string().contains("invalid header value"));
    }
}
