//! Error types for coordinate resolution.

use thiserror::Error;

use crate::transport::TransportError;

/// Failure to resolve a page that is not simply absent.
///
/// A missing page or a page without a `coord` template is `Ok(None)`, never
/// one of these.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The page-source endpoint answered with a status other than 2xx or 404.
    #[error("page source for '{title}' returned HTTP {status}")]
    UnexpectedStatus { title: String, status: u16 },

    /// No response could be obtained.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl ResolveError {
    #[must_use]
    pub fn unexpected_status(title: &str, status: u16) -> Self {
        Self::UnexpectedStatus {
            title: title.to_string(),
            status,
        }
    }
}
