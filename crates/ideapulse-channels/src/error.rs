use thiserror::Error;

/// Errors produced while talking to an upstream platform API.
///
/// These never cross the `crawl()` boundary — adapters fold them into the
/// returned [`ideapulse_core::ChannelCrawlResult`]'s `error` field.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP 429 persisted through every retry.
    #[error("rate limited by {url} after {attempts} attempts")]
    RateLimited { url: String, attempts: u32 },

    /// HTTP 5xx persisted through every retry.
    #[error("upstream server error {status} from {url} after {attempts} attempts")]
    UpstreamServer {
        status: u16,
        url: String,
        attempts: u32,
    },

    /// Any other non-2xx status. Not retried: a request-shape problem that
    /// retrying cannot fix.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body is not valid JSON.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The configured base URL or request path is malformed.
    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}
