//! Shared HTTP layer for platform adapters: throttled requests with
//! bounded retry on transient upstream errors.
//!
//! The retry taxonomy matters: 429 and 5xx are transient-infrastructure
//! signals and are retried (fixed cooldown for 429, linearly increasing
//! backoff for 5xx); every other non-2xx status indicates a request-shape
//! problem that retrying cannot fix and fails immediately.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};

use ideapulse_core::AppConfig;

use crate::error::ChannelError;

/// Pacing and retry knobs shared by every platform adapter.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Additional attempts after the first failure for 429/5xx.
    pub max_retries: u32,
    /// Fixed sleep before retrying after an HTTP 429.
    pub rate_limit_cooldown: Duration,
    /// Linear backoff step for 5xx: the n-th retry sleeps `n × step`.
    pub backoff_step: Duration,
    /// Fixed delay inserted between successive API calls within one crawl,
    /// to avoid tripping platform rate limits proactively.
    pub inter_request_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            rate_limit_cooldown: Duration::from_secs(5),
            backoff_step: Duration::from_secs(2),
            inter_request_delay: Duration::from_millis(800),
        }
    }
}

impl RetryPolicy {
    /// Builds the policy from application configuration.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            rate_limit_cooldown: Duration::from_secs(config.rate_limit_cooldown_secs),
            backoff_step: Duration::from_secs(config.retry_backoff_step_secs),
            inter_request_delay: Duration::from_millis(config.inter_request_delay_ms),
        }
    }

    /// Zero-delay variant for tests: same retry bounds, no sleeping.
    #[must_use]
    pub fn immediate() -> Self {
        Self {
            max_retries: 3,
            rate_limit_cooldown: Duration::ZERO,
            backoff_step: Duration::ZERO,
            inter_request_delay: Duration::ZERO,
        }
    }
}

/// Per-crawl execution counters, owned by the adapter invocation.
///
/// Every network attempt counts as an API call, retries included; the
/// `rate_limited` flag is sticky for the lifetime of the crawl.
#[derive(Debug, Default)]
pub struct CallTracker {
    pub api_calls: u32,
    pub rate_limited: bool,
}

/// HTTP client for one upstream aggregation API.
///
/// Wraps `reqwest` with bearer-token auth, inter-request throttling, and
/// the shared retry behavior. Use [`ChannelClient::new`] with a mock
/// server URL in tests.
pub struct ChannelClient {
    http: Client,
    base_url: String,
    policy: RetryPolicy,
}

impl ChannelClient {
    /// Creates a client for the given API base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        policy: RetryPolicy,
    ) -> Result<Self, ChannelError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("ideapulse/0.1 (idea-validation)")
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            policy,
        })
    }

    /// Creates a client from application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, ChannelError> {
        Self::new(
            &config.tikhub_base_url,
            config.request_timeout_secs,
            RetryPolicy::from_config(config),
        )
    }

    /// Sends a GET request and parses the body as JSON, with throttling and
    /// bounded retry.
    ///
    /// The inter-request delay is inserted before every call after the
    /// first within one crawl (tracked through `tracker`). On 429 the call
    /// sleeps the fixed cooldown and retries; on 5xx it retries with a
    /// linearly increasing backoff; both are bounded by
    /// `policy.max_retries`. Every attempt increments `tracker.api_calls`.
    ///
    /// # Errors
    ///
    /// - [`ChannelError::RateLimited`] — 429 after all retries exhausted.
    /// - [`ChannelError::UpstreamServer`] — 5xx after all retries exhausted.
    /// - [`ChannelError::UnexpectedStatus`] — any other non-2xx (not retried).
    /// - [`ChannelError::Http`] — network or TLS failure (not retried).
    /// - [`ChannelError::Deserialize`] — body is not valid JSON.
    pub async fn get_json(
        &self,
        path: &str,
        params: &[(&str, String)],
        token: &str,
        tracker: &mut CallTracker,
    ) -> Result<serde_json::Value, ChannelError> {
        let url = self.build_url(path, params)?;

        if tracker.api_calls > 0 && !self.policy.inter_request_delay.is_zero() {
            tokio::time::sleep(self.policy.inter_request_delay).await;
        }

        let mut attempt = 0u32;
        loop {
            tracker.api_calls += 1;
            let response = self.http.get(url.clone()).bearer_auth(token).send().await?;
            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                tracker.rate_limited = true;
                if attempt >= self.policy.max_retries {
                    return Err(ChannelError::RateLimited {
                        url: url.to_string(),
                        attempts: attempt + 1,
                    });
                }
                attempt += 1;
                tracing::warn!(
                    attempt,
                    max_retries = self.policy.max_retries,
                    url = %url,
                    "rate limited — retrying after cooldown"
                );
                tokio::time::sleep(self.policy.rate_limit_cooldown).await;
                continue;
            }

            if status.is_server_error() {
                if attempt >= self.policy.max_retries {
                    return Err(ChannelError::UpstreamServer {
                        status: status.as_u16(),
                        url: url.to_string(),
                        attempts: attempt + 1,
                    });
                }
                attempt += 1;
                let delay = self.policy.backoff_step.saturating_mul(attempt);
                tracing::warn!(
                    attempt,
                    max_retries = self.policy.max_retries,
                    status = status.as_u16(),
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    url = %url,
                    "upstream server error — retrying after backoff"
                );
                tokio::time::sleep(delay).await;
                continue;
            }

            if !status.is_success() {
                return Err(ChannelError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: url.to_string(),
                });
            }

            let body = response.text().await?;
            return serde_json::from_str(&body).map_err(|e| ChannelError::Deserialize {
                context: url.to_string(),
                source: e,
            });
        }
    }

    /// Builds the full request URL with percent-encoded query parameters.
    fn build_url(&self, path: &str, params: &[(&str, String)]) -> Result<Url, ChannelError> {
        let raw = format!("{}{path}", self.base_url);
        let mut url = Url::parse(&raw).map_err(|e| ChannelError::InvalidUrl {
            url: raw,
            reason: e.to_string(),
        })?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
