//! Error types for scrape operations.
//!
//! [`ScrapeError`] covers every way a scrape request can terminate early.
//! Each variant belongs to one [`ErrorKind`], which outer layers (the HTTP
//! server, the CLI) use to pick a status code or exit message without
//! inspecting error strings.
//!
//! # Example
//!
//! ```rust
//! use pagechunk_core::{ErrorKind, ScrapeError};
//!
//! let err = ScrapeError::NoContent;
//! assert_eq!(err.kind(), ErrorKind::Extraction);
//! ```

use thiserror::Error;

/// Coarse classification of a [`ScrapeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or missing URL.
    Validation,
    /// The site's robots directives disallow the request.
    RobotsBlocked,
    /// Timeout, network failure, or navigation failure while fetching.
    Fetch,
    /// Neither the readability pass nor the body fallback produced content.
    Extraction,
    /// Anything unexpected.
    Internal,
}

/// Main error type for the scrape pipeline.
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// No URL was supplied at all.
    #[error("Missing url query parameter. Usage: /?url=https://example.com")]
    MissingUrl,

    /// The URL could not be parsed as an absolute URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Crawling the URL is disallowed by the site's robots.txt.
    #[error("Blocked by robots.txt")]
    RobotsBlocked,

    /// HTTP request errors from reqwest.
    ///
    /// Wraps DNS failures, connection issues, TLS errors and body decoding
    /// errors raised while fetching the page.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The fetch (static or rendered) exceeded its deadline.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Rendering engine failures: launch, navigation, or DOM capture.
    #[error("Render failed: {0}")]
    Render(String),

    /// No content could be extracted, even from the raw document body.
    #[error("Could not extract content")]
    NoContent,

    /// Cache I/O failures that could not be degraded.
    #[error("Cache error: {0}")]
    Cache(#[from] std::io::Error),

    /// Result (de)serialization failures.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ScrapeError {
    /// Returns the classification used for status mapping.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScrapeError::MissingUrl | ScrapeError::InvalidUrl(_) => ErrorKind::Validation,
            ScrapeError::RobotsBlocked => ErrorKind::RobotsBlocked,
            ScrapeError::Http(_) | ScrapeError::Timeout { .. } | ScrapeError::Render(_) => ErrorKind::Fetch,
            ScrapeError::NoContent => ErrorKind::Extraction,
            ScrapeError::Cache(_) | ScrapeError::Serialization(_) => ErrorKind::Internal,
        }
    }
}

/// A cache write that did not persist.
///
/// Never fatal: the pipeline logs it and still returns the computed result.
#[derive(Error, Debug)]
pub enum CacheWriteFailure {
    #[error("failed to create cache directory: {0}")]
    CreateDir(std::io::Error),

    #[error("failed to encode cache entry: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to write cache entry: {0}")]
    Write(std::io::Error),
}

/// Result type alias for ScrapeError.
pub type Result<T> = std::result::Result<T, ScrapeError>;
