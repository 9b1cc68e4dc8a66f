//! Terminal outcomes of a failed fetch.

use std::time::Duration;
use thiserror::Error;

/// Why a fetch produced no text.
///
/// Every variant is terminal and its `Display` output is the message shown
/// to the end user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The input was not an absolute http(s) URL
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The rolling fetch quota is exhausted; no request was sent
    #[error("Rate limit exceeded. Try again later.")]
    RateLimited { retry_after: Duration },

    /// Connection, DNS, timeout, non-2xx status or body read failure
    #[error("Error accessing URL: {detail}")]
    Http { detail: String },

    /// The page body tripped the crawl-permission heuristic
    #[error("Scraping not permitted by website.")]
    PermissionDenied,
}

/// Coarse category of a [`FetchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchErrorKind {
    InvalidUrl,
    RateLimited,
    Http,
    PermissionDenied,
}

impl FetchError {
    /// The category of this error.
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::InvalidUrl { .. } => FetchErrorKind::InvalidUrl,
            FetchError::RateLimited { .. } => FetchErrorKind::RateLimited,
            FetchError::Http { .. } => FetchErrorKind::Http,
            FetchError::PermissionDenied => FetchErrorKind::PermissionDenied,
        }
    }

    pub(crate) fn from_reqwest(error: reqwest::Error, timeout: Duration) -> Self {
        let detail = if error.is_timeout() {
            format!("request timed out after {:?}: {}", timeout, error)
        } else {
            error.to_string()
        };
        FetchError::Http { detail }
    }
}
