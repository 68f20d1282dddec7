use std::time::Duration;

use jobscout_core::error::AppError;
use jobscout_core::traits::Fetcher;
use reqwest::Client;

/// Per-page request timeout used by the search pipeline.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// The guest job search serves a reduced page to unknown agents.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                                  (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// HTTP fetcher using reqwest.
///
/// Downloads raw result pages with a browser User-Agent and a fixed
/// timeout. Timeouts, connection failures and non-success statuses map to
/// the page-recoverable [`AppError`] variants; a request the client cannot
/// even build is reported as a configuration error.
#[derive(Clone)]
pub struct ReqwestFetcher {
    client: Client,
    timeout_secs: u64,
}

impl ReqwestFetcher {
    pub fn new() -> Result<Self, AppError> {
        Self::with_timeout(DEFAULT_FETCH_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            timeout_secs: timeout.as_secs(),
        })
    }
}

impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                AppError::Timeout(self.timeout_secs)
            } else if e.is_connect() {
                AppError::NetworkError(format!("Connection failed: {e}"))
            } else if e.is_builder() {
                AppError::ConfigError(format!("Invalid request for {url}: {e}"))
            } else {
                AppError::HttpError(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::HttpError(format!(
                "HTTP {} for {}",
                status.as_u16(),
                url
            )));
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                AppError::Timeout(self.timeout_secs)
            } else {
                AppError::HttpError(format!("Failed to read response body: {e}"))
            }
        })?;

        tracing::debug!(bytes = body.len(), "Fetched page");
        Ok(body)
    }
}
