/// Application configuration for the acquisition engine, read from
/// environment variables by [`crate::config::load_app_config`].
///
/// Pacing and retry knobs apply per channel; the defaults mirror the
/// upstream rate-limit guidance (800 ms between calls, 5 s cooldown on
/// 429, linear 2 s backoff steps on 5xx, 3 retries).
#[derive(Clone)]
pub struct AppConfig {
    /// Base URL of the `TikHub` aggregation API.
    pub tikhub_base_url: String,
    /// Default bearer token; callers may override per request.
    pub tikhub_token: Option<String>,
    pub log_level: String,
    pub request_timeout_secs: u64,
    /// Fixed delay between successive API calls to the same platform.
    pub inter_request_delay_ms: u64,
    /// Fixed sleep before retrying after an HTTP 429.
    pub rate_limit_cooldown_secs: u64,
    /// Linear backoff step for 5xx retries (`attempt × step`).
    pub retry_backoff_step_secs: u64,
    /// Additional attempts after the first failure for transient errors.
    pub max_retries: u32,
    /// Deadline for a single channel's crawl inside the fan-out.
    pub channel_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("tikhub_base_url", &self.tikhub_base_url)
            .field(
                "tikhub_token",
                &self.tikhub_token.as_ref().map(|_| "[redacted]"),
            )
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("inter_request_delay_ms", &self.inter_request_delay_ms)
            .field("rate_limit_cooldown_secs", &self.rate_limit_cooldown_secs)
            .field("retry_backoff_step_secs", &self.retry_backoff_step_secs)
            .field("max_retries", &self.max_retries)
            .field("channel_timeout_secs", &self.channel_timeout_secs)
            .finish()
    }
}
