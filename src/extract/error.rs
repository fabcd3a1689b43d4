//! Errors raised while parsing a single events-section entry.

use thiserror::Error;

/// Longest entry excerpt kept in an error message.
const EXCERPT_CHARS: usize = 80;

/// A list item that looked like an event but could not be parsed.
///
/// These never fail a day; the collector logs them and moves on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    /// No ` – ` separator between year and description.
    #[error("entry has no year separator: '{excerpt}'")]
    MissingSeparator {
        /// Leading text of the entry.
        excerpt: String,
    },

    /// Text before the separator is not `<digits>` or `<digits> BC`.
    #[error("entry year '{token}' is not a number")]
    InvalidYear { token: String },
}

impl EntryError {
    #[must_use]
    pub fn missing_separator(text: &str) -> Self {
        Self::MissingSeparator {
            excerpt: text.trim().chars().take(EXCERPT_CHARS).collect(),
        }
    }

    #[must_use]
    pub fn invalid_year(token: &str) -> Self {
        Self::InvalidYear {
            token: token.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_separator_truncates_excerpt() {
        let long = "x".repeat(500);
        let EntryError::MissingSeparator { excerpt } = EntryError::missing_separator(&long) else {
            panic!("wrong variant");
        };
        assert_eq!(excerpt.len(), EXCERPT_CHARS);
    }

    #[test]
    fn test_invalid_year_message() {
        let error = EntryError::invalid_year("c. 1500");
        assert_eq!(error.to_string(), "entry year 'c. 1500' is not a number");
    }
}
