//! Error types for review-scrape
//!
//! This module defines the error hierarchy for the crate. Nothing in the
//! pagination core surfaces these to the caller directly: the controller folds
//! them into a `ScrapeStatus`. They are the currency of the collaborators
//! (config loading, HTTP session, extraction, URL parsing).

use thiserror::Error;

/// The main error type for review-scrape
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Scrape Target Errors
    // ============================================================================
    #[error("Invalid input url for scraping: {message}")]
    InvalidScrapeUrl { message: String },

    // ============================================================================
    // Extraction Errors
    // ============================================================================
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    #[error("Unprocessable review: {message}")]
    UnprocessableReview { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create an invalid scrape URL error
    pub fn invalid_scrape_url(message: impl Into<String>) -> Self {
        Self::InvalidScrapeUrl {
            message: message.into(),
        }
    }

    /// Create a selector error
    pub fn selector(selector: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.into(),
        }
    }

    /// Create an unprocessable review error
    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::UnprocessableReview {
            message: message.into(),
        }
    }
}

/// Gateway-style statuses that say nothing about the page content.
///
/// 403, 429 and 503 are deliberately absent: those usually carry a challenge
/// page and are left to the block detector.
pub(crate) fn is_transient_status(status: u16) -> bool {
    matches!(status, 500 | 502 | 504 | 520 | 521 | 522 | 523 | 524)
}

/// Result type alias for review-scrape
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::invalid_scrape_url("Invalid hostname");
        assert_eq!(
            err.to_string(),
            "Invalid input url for scraping: Invalid hostname"
        );

        let err = Error::http_status(404, "Not found");
        assert_eq!(err.to_string(), "HTTP 404: Not found");
    }

    #[test]
    fn test_transient_status() {
        assert!(is_transient_status(500));
        assert!(is_transient_status(502));
        assert!(is_transient_status(524));

        // challenge-carrying statuses belong to the detector
        assert!(!is_transient_status(403));
        assert!(!is_transient_status(429));
        assert!(!is_transient_status(503));
        assert!(!is_transient_status(200));
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Configuration error: inner"));
    }
}
