//! Resilient HTTP fetcher for storefront listing pages
//!
//! Every GET goes out with a browser identity drawn from an immutable pool,
//! is attempted a bounded number of times, backs off exponentially after
//! network failures and pauses for a politeness delay once a page arrives.
//! Exhausting all attempts yields "no result" rather than a fault.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::{Client, ClientBuilder};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::infrastructure::config::{FetchConfig, defaults};

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGES: [&str; 3] = ["en-US,en;q=0.9", "en-IN,en;q=0.9,hi;q=0.8", "en-GB,en;q=0.8"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    #[error("HTTP request to {url} failed: {message}")]
    Network { url: String, message: String },

    #[error("HTTP error {status}: {url}")]
    Status { url: String, status: u16 },

    #[error("Gave up on {url} after {attempts} attempts: {last}")]
    Exhausted { url: String, attempts: u32, last: String },

    #[error("Failed to create HTTP client: {0}")]
    Client(String),
}

impl FetchError {
    /// Timeouts and connection failures; only these back off before the next attempt
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Network { .. })
    }
}

/// One set of browser identity headers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityHeaders {
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
}

impl IdentityHeaders {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            accept: ACCEPT_HTML.to_string(),
            accept_language: ACCEPT_LANGUAGES[0].to_string(),
        }
    }
}

/// Immutable, never-empty pool of identities shared across requests
#[derive(Debug, Clone)]
pub struct IdentityPool {
    identities: Arc<[IdentityHeaders]>,
}

impl IdentityPool {
    /// Build a pool from user agent strings, pairing each with an
    /// `Accept-Language` variant. Blank entries are skipped; an empty input
    /// falls back to the built-in identities.
    pub fn from_user_agents<S: AsRef<str>>(user_agents: &[S]) -> Self {
        let mut identities: Vec<IdentityHeaders> = user_agents
            .iter()
            .map(|ua| ua.as_ref().trim())
            .filter(|ua| !ua.is_empty())
            .enumerate()
            .map(|(i, ua)| IdentityHeaders {
                accept_language: ACCEPT_LANGUAGES[i % ACCEPT_LANGUAGES.len()].to_string(),
                ..IdentityHeaders::new(ua)
            })
            .collect();

        if identities.is_empty() {
            warn!("Empty identity pool configured, using built-in user agents");
            identities = defaults::USER_AGENTS.iter().map(|ua| IdentityHeaders::new(*ua)).collect();
        }

        Self {
            identities: identities.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }

    /// Pseudo-random pick; reduces bot-blocking, not a security measure
    pub fn pick(&self) -> &IdentityHeaders {
        &self.identities[fastrand::usize(..self.identities.len())]
    }
}

impl Default for IdentityPool {
    fn default() -> Self {
        Self::from_user_agents(&defaults::USER_AGENTS)
    }
}

/// Retry, backoff and politeness settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPolicy {
    pub max_attempts: u32,
    pub timeout: Duration,
    pub backoff_base: Duration,
    pub politeness_min: Duration,
    pub politeness_max: Duration,
}

impl FetchPolicy {
    pub fn from_config(config: &FetchConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            timeout: config.timeout(),
            backoff_base: Duration::from_secs(config.backoff_base_seconds),
            politeness_min: Duration::from_millis(config.politeness_min_ms),
            politeness_max: Duration::from_millis(config.politeness_max_ms),
        }
    }

    /// Delay after a network failure on attempt `attempt_index` (0-based):
    /// `base * 2^attempt_index`
    pub fn backoff(&self, attempt_index: u32) -> Duration {
        let factor = 2_u32.saturating_pow(attempt_index);
        self.backoff_base.saturating_mul(factor)
    }

    /// Uniform draw from the politeness window
    pub fn politeness_delay(&self) -> Duration {
        let min = u64::try_from(self.politeness_min.as_millis()).unwrap_or(u64::MAX);
        let max = u64::try_from(self.politeness_max.as_millis()).unwrap_or(u64::MAX);
        if max <= min {
            return self.politeness_min;
        }
        Duration::from_millis(fastrand::u64(min..=max))
    }
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self::from_config(&FetchConfig::default())
    }
}

/// Raw upstream response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// A single HTTP GET, no retries
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(
        &self,
        url: &str,
        identity: &IdentityHeaders,
        timeout: Duration,
    ) -> Result<TransportResponse, FetchError>;
}

/// [`Transport`] backed by `reqwest`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, FetchError> {
        let client = ClientBuilder::new()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(
        &self,
        url: &str,
        identity: &IdentityHeaders,
        timeout: Duration,
    ) -> Result<TransportResponse, FetchError> {
        let network_error = |e: reqwest::Error| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                    timeout,
                }
            } else {
                FetchError::Network {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            }
        };

        let response = self
            .client
            .get(url)
            .header(USER_AGENT, &identity.user_agent)
            .header(ACCEPT, &identity.accept)
            .header(ACCEPT_LANGUAGE, &identity.accept_language)
            .timeout(timeout)
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status().as_u16();
        if status != 200 {
            return Ok(TransportResponse {
                status,
                body: String::new(),
            });
        }

        let body = response.text().await.map_err(network_error)?;
        Ok(TransportResponse { status, body })
    }
}

/// HTTP GET with identity rotation, bounded retries and politeness delay
#[derive(Clone)]
pub struct ResilientFetcher {
    transport: Arc<dyn Transport>,
    identities: IdentityPool,
    policy: FetchPolicy,
}

impl ResilientFetcher {
    pub fn new(transport: Arc<dyn Transport>, identities: IdentityPool, policy: FetchPolicy) -> Self {
        Self {
            transport,
            identities,
            policy,
        }
    }

    /// Production fetcher over `reqwest`
    pub fn from_config(config: &FetchConfig) -> Result<Self, FetchError> {
        Ok(Self::new(
            Arc::new(ReqwestTransport::new()?),
            IdentityPool::from_user_agents(&config.user_agents),
            FetchPolicy::from_config(config),
        ))
    }

    /// Fetch `url`, returning `None` once every attempt has failed
    pub async fn fetch(&self, url: &str) -> Option<String> {
        match self.try_fetch(url).await {
            Ok(body) => Some(body),
            Err(e) => {
                warn!("⚠️ No data from upstream: {}", e);
                None
            }
        }
    }

    /// Fetch `url`; only a `200` response counts as success
    pub async fn try_fetch(&self, url: &str) -> Result<String, FetchError> {
        let max_attempts = self.policy.max_attempts;
        let mut last_error = None;

        for attempt in 0..max_attempts {
            let identity = self.identities.pick();
            info!("🌐 HTTP GET (attempt {}/{}): {}", attempt + 1, max_attempts, url);

            match self.transport.get(url, identity, self.policy.timeout).await {
                Ok(response) if response.status == 200 => {
                    let delay = self.policy.politeness_delay();
                    debug!("Fetched {} ({} bytes), pausing {:?}", url, response.body.len(), delay);
                    sleep(delay).await;
                    return Ok(response.body);
                }
                Ok(response) => {
                    warn!("❌ HTTP error {} on attempt {}: {}", response.status, attempt + 1, url);
                    last_error = Some(FetchError::Status {
                        url: url.to_string(),
                        status: response.status,
                    });
                }
                Err(e) if e.is_network() => {
                    let backoff = self.policy.backoff(attempt);
                    warn!("⚠️ Network error on attempt {}: {} (retrying in {:?})", attempt + 1, e, backoff);
                    last_error = Some(e);
                    sleep(backoff).await;
                }
                Err(e) => {
                    warn!("❌ Request failed on attempt {}: {}", attempt + 1, e);
                    last_error = Some(e);
                }
            }
        }

        Err(FetchError::Exhausted {
            url: url.to_string(),
            attempts: max_attempts,
            last: last_error.map_or_else(|| "no attempts made".to_string(), |e| e.to_string()),
        })
    }
}
