//! Policy-aware page fetcher.

use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::error::FetchError;
use super::extract::extract_text;
use super::policy::is_disallowed;
use super::request::FetchRequest;
use crate::config::{FetchConfig, ScrapeConfig};
use crate::error::Result;
use crate::ratelimit::{Admission, RateGate};

/// Normalized page text, or the reason there is none.
pub type FetchResult = std::result::Result<String, FetchError>;

/// Retrieves page text under the shared [`RateGate`].
///
/// A fetch runs through: URL validation, gate admission, one HTTP GET,
/// the permission heuristic, and text extraction. Any step may end the
/// fetch with a [`FetchError`]; nothing is retried.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    gate: Arc<RateGate>,
    default_timeout: Duration,
}

impl Fetcher {
    /// Create a fetcher that paces requests through `gate`.
    pub fn new(config: &FetchConfig, gate: Arc<RateGate>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            gate,
            default_timeout: config.timeout(),
        })
    }

    /// Create a fetcher with its own gate built from `config`.
    pub fn from_config(config: &ScrapeConfig) -> Result<Self> {
        let gate = Arc::new(RateGate::new(&config.gate));
        Self::new(&config.fetch, gate)
    }

    /// Fetch `url` and return its visible text.
    pub async fn fetch(&self, url: &str, timeout: Duration) -> FetchResult {
        let request = FetchRequest::new(url, timeout)
            .inspect_err(|e| debug!(url = %url, error = %e, "Rejected malformed URL"))?;
        self.fetch_request(&request).await
    }

    /// Fetch a pre-validated request.
    #[instrument(
        skip(self, request),
        fields(
            url = %request.url(),
            fetch_id = %Uuid::new_v4(),
            timeout_ms = request.timeout().as_millis() as u64
        )
    )]
    pub async fn fetch_request(&self, request: &FetchRequest) -> FetchResult {
        match self.gate.acquire().await {
            Admission::Permit(_) => {
                debug!(remaining = self.gate.remaining(), "Fetch admitted");
            }
            Admission::Rejected(rejected) => {
                warn!(
                    retry_after_ms = rejected.retry_after().as_millis() as u64,
                    "Fetch rejected by rate gate"
                );
                return Err(FetchError::RateLimited {
                    retry_after: rejected.retry_after(),
                });
            }
        }

        let body = self
            .download(request)
            .await
            .inspect_err(|e| warn!(error = %e, "Fetch failed"))?;

        if is_disallowed(&body) {
            info!("Page refused by permission heuristic");
            return Err(FetchError::PermissionDenied);
        }

        let text = extract_text(&body);
        debug!(
            body_bytes = body.len(),
            text_chars = text.chars().count(),
            "Extracted page text"
        );
        Ok(text)
    }

    async fn download(&self, request: &FetchRequest) -> FetchResult {
        let timeout = request.timeout();
        let to_error = |e: reqwest::Error| FetchError::from_reqwest(e, timeout);

        let response = self
            .client
            .get(request.url().clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(to_error)?;

        let status = response.status();
        debug!(status = %status, "Received response");

        // Any non-2xx is a failure, including 3xx that were not followed
        if !status.is_success() {
            return Err(FetchError::Http {
                detail: format!("HTTP status {} for url ({})", status, request.url()),
            });
        }

        response.text().await.map_err(to_error)
    }

    /// The gate shared by this fetcher.
    pub fn gate(&self) -> &Arc<RateGate> {
        &self.gate
    }

    /// Timeout used when the caller has no deadline of its own.
    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GateConfig;

    fn test_fetcher(max_calls: usize) -> Fetcher {
        let gate = Arc::new(RateGate::new(&GateConfig {
            min_spacing_ms: 0,
            max_calls_per_window: max_calls,
            window_secs: 60,
        }));
        Fetcher::new(&FetchConfig::default(), gate).unwrap()
    }

    #[tokio::test]
    async fn test_invalid_url_consumes_no_quota() {
        let fetcher = test_fetcher(1);

        let err = fetcher
            .fetch("not a url", Duration::from_secs(1))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::InvalidUrl { .. }));
        assert_eq!(fetcher.gate().remaining(), 1);
    }

    #[tokio::test]
    async fn test_connection_refused_is_http_error() {
        let fetcher = test_fetcher(5);

        // Port 9 (discard) on loopback is closed in test environments
        let err = fetcher
            .fetch("http://127.0.0.1:9/", Duration::from_secs(2))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Http { .. }));
        assert!(err.to_string().starts_with("Error accessing URL: "));
    }

    #[test]
    fn test_from_config_uses_fetch_timeout() {
        let fetcher = Fetcher::from_config(&ScrapeConfig::default()).unwrap();
        assert_eq!(fetcher.default_timeout(), Duration::from_secs(10));
        assert_eq!(fetcher.gate().remaining(), 10);
    }
}
