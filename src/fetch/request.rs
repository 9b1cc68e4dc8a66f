//! Validated fetch requests.

use std::time::Duration;
use url::Url;

use super::error::FetchError;

/// An absolute http(s) URL paired with the deadline for fetching it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    url: Url,
    timeout: Duration,
}

impl FetchRequest {
    /// Parse and validate `raw` as an absolute http or https URL.
    pub fn new(raw: &str, timeout: Duration) -> Result<Self, FetchError> {
        let invalid = |reason: String| FetchError::InvalidUrl {
            url: raw.to_string(),
            reason,
        };

        let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;

        match url.scheme() {
            "http" | "https" => {}
            other => return Err(invalid(format!("unsupported scheme '{}'", other))),
        }
        if url.host_str().map_or(true, str::is_empty) {
            return Err(invalid("missing host".to_string()));
        }

        Ok(Self { url, timeout })
    }

    /// The validated URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Deadline for the HTTP exchange.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(10);

    #[test]
    fn test_accepts_http_and_https() {
        let http = FetchRequest::new("http://example.com/a?b=c", TIMEOUT).unwrap();
        assert_eq!(http.url().as_str(), "http://example.com/a?b=c");
        assert_eq!(http.timeout(), TIMEOUT);

        assert!(FetchRequest::new("https://example.com", TIMEOUT).is_ok());
    }

    #[test]
    fn test_surrounding_whitespace_ignored() {
        let request = FetchRequest::new("  https://example.com/  ", TIMEOUT).unwrap();
        assert_eq!(request.url().host_str(), Some("example.com"));
    }

    #[test]
    fn test_relative_url_rejected() {
        let err = FetchRequest::new("example.com/page", TIMEOUT).unwrap_err();
        match err {
            FetchError::InvalidUrl { url, .. } => assert_eq!(url, "example.com/page"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_non_http_scheme_rejected() {
        let err = FetchRequest::new("ftp://example.com/file", TIMEOUT).unwrap_err();
        assert!(err.to_string().contains("unsupported scheme 'ftp'"));

        assert!(FetchRequest::new("file:///etc/passwd", TIMEOUT).is_err());
        assert!(FetchRequest::new("mailto:someone@example.com", TIMEOUT).is_err());
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(FetchRequest::new("", TIMEOUT).is_err());
    }
}
