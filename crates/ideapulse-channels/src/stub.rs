//! Stub adapters for channels that are not yet implemented.
//!
//! Stubs are registered like real adapters and fail through the same
//! structured-result path, so the orchestrator's fan-out needs no
//! channel-count-dependent branches as platforms are added.

use async_trait::async_trait;

use ideapulse_core::{Channel, ChannelCrawlResult, CrawlRequest};

use crate::adapter::ChannelAdapter;

pub struct StubAdapter {
    channel: Channel,
}

impl StubAdapter {
    #[must_use]
    pub fn new(channel: Channel) -> Self {
        Self { channel }
    }

    fn message(&self) -> String {
        format!(
            "{} channel is not yet implemented",
            self.channel.display_name()
        )
    }
}

#[async_trait]
impl ChannelAdapter for StubAdapter {
    fn channel(&self) -> Channel {
        self.channel
    }

    fn is_configured(&self) -> bool {
        false
    }

    async fn crawl(&self, _request: &CrawlRequest) -> ChannelCrawlResult {
        ChannelCrawlResult::failure(self.channel, self.message())
    }
}
