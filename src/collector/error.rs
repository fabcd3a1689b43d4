//! Error types for day collection.

use thiserror::Error;

use crate::resolver::ResolveError;
use crate::transport::TransportError;

/// Failure to collect one calendar day.
///
/// Malformed entries are not errors here; they are skipped with a warning.
#[derive(Debug, Error)]
pub enum CollectError {
    /// Month or day out of range. Raised before any request is made.
    #[error("invalid date {month}/{day}: {reason}")]
    InvalidInput {
        month: String,
        day: u8,
        reason: String,
    },

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The day page or feed answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    UnexpectedStatus { url: String, status: u16 },

    /// The feed body did not decode into the expected shape.
    #[error("feed response from {url} is malformed: {source}")]
    MalformedFeed {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// A linked page could not be resolved.
    #[error("coordinate lookup failed: {0}")]
    Resolve(#[from] ResolveError),
}

impl CollectError {
    #[must_use]
    pub fn invalid_input(month: u8, day: u8, reason: &str) -> Self {
        Self::InvalidInput {
            month: month.to_string(),
            day,
            reason: reason.to_string(),
        }
    }

    #[must_use]
    pub fn unexpected_status(url: &str, status: u16) -> Self {
        Self::UnexpectedStatus {
            url: url.to_string(),
            status,
        }
    }

    /// True for failures that retrying the day later might fix.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Resolve(_) | Self::UnexpectedStatus { .. }
        )
    }
}
