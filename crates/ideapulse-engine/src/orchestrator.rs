//! Concurrent multi-channel fan-out with partial-failure semantics.
//!
//! Each requested channel crawls as an independent tokio task; a panic or
//! a blown per-channel deadline in one task becomes a failed
//! `ChannelCrawlResult` for that channel without disturbing its siblings.
//! The batch as a whole succeeds when at least one channel succeeds.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;

use ideapulse_core::{
    AppConfig, Channel, ChannelConfig, ChannelCrawlResult, ChannelStats, CrawlRequest,
    FailedChannel, MultiChannelRequest, MultiChannelResult,
};

use crate::combine::combine_stats;
use crate::registry::ChannelRegistry;

use ideapulse_channels::ChannelError;

pub struct MultiChannelOrchestrator {
    registry: Arc<ChannelRegistry>,
    /// Deadline for a single channel's crawl. Bounds the fan-in join so one
    /// stalled upstream cannot delay the whole batch indefinitely.
    channel_timeout: Duration,
}

impl MultiChannelOrchestrator {
    #[must_use]
    pub fn new(registry: Arc<ChannelRegistry>, channel_timeout: Duration) -> Self {
        Self {
            registry,
            channel_timeout,
        }
    }

    /// Builds the registry and orchestrator from application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Http`] if an adapter HTTP client cannot be
    /// built.
    pub fn from_config(config: &AppConfig) -> Result<Self, ChannelError> {
        Ok(Self::new(
            Arc::new(ChannelRegistry::from_config(config)?),
            Duration::from_secs(config.channel_timeout_secs),
        ))
    }

    /// Read-only access to the adapter catalog.
    #[must_use]
    pub fn registry(&self) -> &ChannelRegistry {
        &self.registry
    }

    /// Single-channel convenience wrapper. An unknown channel returns an
    /// error result immediately, without any adapter call.
    pub async fn crawl_channel(
        &self,
        channel: Channel,
        keyword: &str,
        tags: Vec<String>,
        config: ChannelConfig,
    ) -> ChannelCrawlResult {
        let Some(adapter) = self.registry.adapter(channel) else {
            return ChannelCrawlResult::failure(channel, format!("unknown channel: {channel}"));
        };
        let request = CrawlRequest {
            keyword: keyword.to_owned(),
            tags,
            config,
        };
        run_with_deadline(adapter, request, channel, self.channel_timeout).await
    }

    /// The concurrency core: one independent task per requested channel,
    /// joined in request order, partitioned into succeeded/failed, with
    /// stats combined over the successful channels only.
    pub async fn crawl_multiple_channels(&self, request: MultiChannelRequest) -> MultiChannelResult {
        let handles: Vec<_> = request
            .channels
            .iter()
            .map(|(channel, config)| {
                let channel = *channel;
                let registry = Arc::clone(&self.registry);
                let crawl_request = CrawlRequest {
                    keyword: request.keyword.clone(),
                    tags: request.tags.clone(),
                    config: config.clone(),
                };
                let timeout = self.channel_timeout;
                tokio::spawn(async move {
                    let Some(adapter) = registry.adapter(channel) else {
                        return ChannelCrawlResult::failure(
                            channel,
                            format!("unknown channel: {channel}"),
                        );
                    };
                    run_with_deadline(adapter, crawl_request, channel, timeout).await
                })
            })
            .collect();

        // join_all preserves request order; a panicked task is folded into
        // a failed result for that channel alone.
        let results: Vec<ChannelCrawlResult> = join_all(handles)
            .await
            .into_iter()
            .zip(&request.channels)
            .map(|(joined, (channel, _))| match joined {
                Ok(result) => result,
                Err(err) => {
                    tracing::error!(channel = %channel, error = %err, "channel task panicked");
                    ChannelCrawlResult::failure(*channel, format!("channel task failed: {err}"))
                }
            })
            .collect();

        let mut succeeded_channels = Vec::new();
        let mut failed_channels = Vec::new();
        let mut successful_stats: Vec<ChannelStats> = Vec::new();

        for result in &results {
            if result.success {
                succeeded_channels.push(result.channel);
                successful_stats.push(result.stats.clone());
            } else {
                failed_channels.push(FailedChannel {
                    channel: result.channel,
                    error: result
                        .error
                        .clone()
                        .unwrap_or_else(|| "unknown error".to_owned()),
                });
            }
        }

        if !failed_channels.is_empty() {
            tracing::warn!(
                failed = failed_channels.len(),
                total = results.len(),
                "some channels failed during multi-channel crawl"
            );
        }

        MultiChannelResult {
            success: !succeeded_channels.is_empty(),
            combined_stats: combine_stats(&successful_stats),
            results,
            succeeded_channels,
            failed_channels,
        }
    }
}

/// Runs one adapter crawl under the per-channel deadline. A timeout is a
/// per-channel failure, not a batch failure.
async fn run_with_deadline(
    adapter: Arc<dyn ideapulse_channels::ChannelAdapter>,
    request: CrawlRequest,
    channel: Channel,
    deadline: Duration,
) -> ChannelCrawlResult {
    match tokio::time::timeout(deadline, adapter.crawl(&request)).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(channel = %channel, timeout_secs = deadline.as_secs(), "channel crawl timed out");
            ChannelCrawlResult::failure(
                channel,
                format!("channel timed out after {}s", deadline.as_secs()),
            )
        }
    }
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;
