//! HTTP client with rate limiting for the odds API

use crate::core::identifier::RaceId;
use crate::models::{Envelope, OddsSnapshot};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Mutex;

/// Default odds API endpoint
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";

/// Shown when the API reports failure without a message
const DEFAULT_FAILURE_MESSAGE: &str = "オッズ情報の取得に失敗しました";

/// Scraper and client errors
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Failed to parse HTML: {0}")]
    ParseError(String),

    #[error("Odds API error: {0}")]
    ApiError(String),

    #[error("No odds found for race {0}")]
    NoOddsFound(String),

    #[error("Failed to fetch {url} after {attempts} attempts")]
    RetriesExhausted { url: String, attempts: u32 },
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Odds API base URL
    pub base_url: String,
    /// Delay between requests in milliseconds
    pub delay_ms: u64,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Max retry attempts
    pub max_retries: u32,
    /// User agent string
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            delay_ms: 1000,
            timeout_secs: 30,
            max_retries: 3,
            user_agent: concat!("keiba-odds/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Odds API client with rate limiting
pub struct OddsClient {
    client: reqwest::Client,
    config: ClientConfig,
    last_request: Arc<Mutex<Option<Instant>>>,
}

impl OddsClient {
    /// Create a new client with the given configuration
    pub fn new(config: ClientConfig) -> Result<Self, ScraperError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            client,
            config,
            last_request: Arc::new(Mutex::new(None)),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Wait for rate limit
    async fn wait_for_rate_limit(&self) {
        let mut last = self.last_request.lock().await;
        let delay = Duration::from_millis(self.config.delay_ms);

        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < delay {
                tokio::time::sleep(delay - elapsed).await;
            }
        }

        *last = Some(Instant::now());
    }

    /// Build URL for the odds endpoint
    fn build_url(&self, race_id: &RaceId) -> String {
        format!(
            "{}/api/odds?race_id={}",
            self.config.base_url.trim_end_matches('/'),
            race_id
        )
    }

    /// Fetch an envelope with rate limiting and retry
    ///
    /// Any response whose body is an envelope is returned as-is, even with an
    /// error status; only transport failures and unreadable bodies are retried.
    async fn fetch_envelope(&self, url: &str) -> Result<Envelope<OddsSnapshot>, ScraperError> {
        for attempt in 0..self.config.max_retries {
            self.wait_for_rate_limit().await;

            match self.client.get(url).send().await {
                Ok(response) => {
                    let status = response.status();
                    match response.json::<Envelope<OddsSnapshot>>().await {
                        Ok(envelope) => return Ok(envelope),
                        Err(e) => {
                            tracing::warn!(
                                "Unreadable response with status {} (attempt {}/{}): {}",
                                status,
                                attempt + 1,
                                self.config.max_retries,
                                e
                            );
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        "Request failed (attempt {}/{}): {}",
                        attempt + 1,
                        self.config.max_retries,
                        e
                    );
                }
            }

            if attempt + 1 < self.config.max_retries {
                let backoff = Duration::from_millis(self.config.delay_ms * (attempt as u64 + 1));
                tokio::time::sleep(backoff).await;
            }
        }

        Err(ScraperError::RetriesExhausted {
            url: url.to_string(),
            attempts: self.config.max_retries,
        })
    }

    /// Fetch the odds snapshot for a race
    pub async fn fetch_snapshot(&self, race_id: &RaceId) -> Result<OddsSnapshot, ScraperError> {
        let url = self.build_url(race_id);
        tracing::info!("Fetching odds: {}", url);

        let envelope = self.fetch_envelope(&url).await?;
        let snapshot = unwrap_envelope(envelope, race_id)?;

        tracing::info!(
            "Fetched {} win, {} place, {} quinella odds",
            snapshot.tansho.len(),
            snapshot.fukusho.len(),
            snapshot.umaren.len()
        );
        Ok(snapshot)
    }
}

/// Validate the envelope and take out its payload
pub fn unwrap_envelope(
    envelope: Envelope<OddsSnapshot>,
    race_id: &RaceId,
) -> Result<OddsSnapshot, ScraperError> {
    if !envelope.success {
        return Err(ScraperError::ApiError(
            envelope
                .error
                .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string()),
        ));
    }
    envelope
        .data
        .ok_or_else(|| ScraperError::NoOddsFound(race_id.to_string()))
}
