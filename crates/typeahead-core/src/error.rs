//! Error types for the typeahead widget.

use std::time::Duration;
use thiserror::Error;

/// Failure of a single call to the remote search provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Connection-level failure (DNS, refused, reset).
    #[error("Network error: {0}")]
    Network(String),

    /// The transport gave up waiting for a response.
    #[error("Request timed out after {duration:?}")]
    Timeout { duration: Duration },

    /// Provider answered with a non-success status.
    #[error("HTTP status {0}")]
    HttpStatus(u16),

    /// Response body was not the JSON the provider promised.
    #[error("Decode error: {0}")]
    Decode(String),
}

/// Pipeline errors - escalated to the session's error sink.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Every attempt for a term failed.
    #[error("Search for '{term}' failed after {attempts} attempts: {last}")]
    RetriesExhausted {
        term: String,
        attempts: u32,
        #[source]
        last: ProviderError,
    },

    /// The request was superseded or its session closed.
    #[error("Search cancelled")]
    Cancelled,
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform has no config directory for `config.toml`.
    #[error("No config directory for typeahead")]
    NoConfigDir,

    /// `config.toml` exists but could not be read.
    #[error("Cannot read config: {0}")]
    Io(String),

    /// `config.toml` is not valid TOML for [`crate::WidgetConfig`].
    #[error("Malformed config.toml: {0}")]
    Parse(String),

    /// A value parsed but is out of range.
    #[error("Invalid config: {0}")]
    Invalid(String),
}
