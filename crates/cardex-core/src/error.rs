//! Error types and handling for cardex-core operations.
//!
//! This module provides a comprehensive error type that covers all possible
//! failures in the catalog engine. Errors are categorized for easier handling
//! and include context about recoverability for retry logic.
//!
//! Note the split between errors and warnings: per-unit data-quality issues
//! discovered during a load pass (duplicate slugs, empty content, malformed
//! markup) are never errors. They travel as [`crate::LoadWarning`] values
//! attached to the build result. Only conditions that prevent producing a
//! catalog at all surface here.

use thiserror::Error;

/// The main error type for cardex-core operations.
///
/// All public functions in cardex-core return `Result<T, Error>` for
/// consistent error handling. The error type includes automatic conversion
/// from common standard library errors and provides additional metadata for
/// error handling logic.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed.
    ///
    /// Covers file system operations like enumerating topic directories,
    /// reading content files, and writing the persisted index cache. The
    /// underlying `std::io::Error` is preserved to maintain detailed error
    /// information.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing operation failed.
    ///
    /// Occurs when the HTML parser itself cannot be constructed (for example
    /// an invalid selector) — never for malformed content, which degrades to
    /// a [`crate::WarningKind::MalformedMarkup`] warning instead.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration is invalid or inaccessible.
    ///
    /// Occurs when configuration files are malformed, contain invalid
    /// values, or cannot be accessed due to permissions or path issues.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource was not found.
    ///
    /// Used for lookups of content ids that don't exist in the active
    /// catalog. Query-time "missing" is an expected outcome; callers must
    /// handle it explicitly rather than treating it as exceptional.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The catalog has no ready snapshot to serve reads from.
    ///
    /// Returned when a query is attempted before the first successful load
    /// pass has completed.
    #[error("Catalog not ready: {0}")]
    NotReady(String),

    /// Catalog build failed fatally.
    ///
    /// The only fatal load-time condition: the module source provider
    /// returned no entries when at least one was expected. This signals a
    /// configuration or wiring error upstream; any previously active
    /// snapshot remains in place.
    #[error("Catalog build failed: {0}")]
    CatalogBuild(String),

    /// A refresh is already in flight.
    ///
    /// Only one rebuild runs at a time; a second caller is rejected rather
    /// than queued. Retrying after the in-flight refresh completes will
    /// succeed.
    #[error("Refresh already in progress")]
    RefreshInFlight,

    /// Serialization or deserialization failed.
    ///
    /// Occurs when converting between data formats (JSON, TOML) fails due
    /// to incompatible formats or corruption, typically while reading or
    /// writing the persisted index cache.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl Error {
    /// Check if the error might be recoverable through retry logic.
    ///
    /// Returns `true` for errors that are typically temporary and might
    /// succeed if the operation is retried after a delay. A rejected
    /// concurrent refresh is the canonical recoverable case.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::RefreshInFlight => true,
            Self::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::Interrupted
            ),
            _ => false,
        }
    }

    /// Get the error category as a string identifier.
    ///
    /// Returns a static string that categorizes the error type for logging
    /// and error handling logic.
    #[must_use]
    pub fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Parse(_) => "parse",
            Self::Config(_) => "config",
            Self::NotFound(_) => "not_found",
            Self::NotReady(_) => "not_ready",
            Self::CatalogBuild(_) => "catalog_build",
            Self::RefreshInFlight => "refresh_in_flight",
            Self::Serialization(_) => "serialization",
        }
    }
}

/// Result alias used throughout cardex-core.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_in_flight_is_recoverable() {
        assert!(Error::RefreshInFlight.is_recoverable());
        assert!(!Error::CatalogBuild("no sources".into()).is_recoverable());
        assert!(!Error::NotFound("x".into()).is_recoverable());
    }

    #[test]
    fn categories_are_stable() {
        assert_eq!(Error::Parse("bad".into()).category(), "parse");
        assert_eq!(Error::CatalogBuild("empty".into()).category(), "catalog_build");
        assert_eq!(Error::RefreshInFlight.category(), "refresh_in_flight");
    }

    #[test]
    fn serde_json_errors_map_to_serialization() {
        let err = serde_json::from_str::<serde_json::Value>("{not json")
            .map(|_| ())
            .map_err(Error::from);
        match err {
            Err(Error::Serialization(_)) => {},
            other => panic!("expected serialization error, got {other:?}"),
        }
    }
}
