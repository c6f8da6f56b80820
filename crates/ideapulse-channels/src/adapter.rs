//! The channel adapter contract.

use async_trait::async_trait;

use ideapulse_core::{Channel, ChannelCrawlResult, CrawlRequest};

/// One external platform's search + comment crawler, normalized to the
/// unified model.
///
/// Adapters are stateless service values registered once at startup and
/// reused across requests; the only adapter-held state is a default auth
/// token, which callers may override per request.
///
/// `crawl` never fails at the type level: every failure mode — missing
/// credentials, rate limiting, upstream errors, unimplemented platforms —
/// is communicated through the result's `success`/`error` fields so the
/// orchestrator can always assemble a complete multi-channel result.
#[async_trait]
pub trait ChannelAdapter: Send + Sync {
    /// Stable channel identifier; registry key and `platform` tag.
    fn channel(&self) -> Channel;

    /// True iff the adapter holds a usable default credential. When false
    /// and the request carries no token either, `crawl` returns a failed
    /// empty result without any network I/O.
    fn is_configured(&self) -> bool;

    /// Runs the two-phase crawl (search, then serial comment fetches).
    async fn crawl(&self, request: &CrawlRequest) -> ChannelCrawlResult;
}

/// Picks the effective bearer token: a non-empty request token wins over
/// the adapter default.
pub(crate) fn resolve_token<'a>(
    request_token: &'a str,
    default_token: Option<&'a str>,
) -> Option<&'a str> {
    if request_token.is_empty() {
        default_token.filter(|t| !t.is_empty())
    } else {
        Some(request_token)
    }
}
