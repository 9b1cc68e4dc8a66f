//! Error types for setting up the scrapegate service.
//!
//! Per-fetch outcomes live in [`crate::fetch::FetchError`]; this module only
//! covers failures that stop the fetcher from being built at all.

use thiserror::Error;

/// Main error type for scrapegate setup operations.
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP client construction errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for scrapegate operations.
pub type Result<T> = std::result::Result<T, ScrapeError>;
