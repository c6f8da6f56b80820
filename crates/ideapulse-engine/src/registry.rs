//! Catalog of available channel adapters.
//!
//! Built once at process start and passed by reference to the
//! orchestrator — an explicitly constructed value rather than a hidden
//! global, read-only after construction so it needs no locking.

use std::collections::HashMap;
use std::sync::Arc;

use ideapulse_channels::{
    ChannelAdapter, ChannelClient, ChannelError, DouyinAdapter, StubAdapter, XiaohongshuAdapter,
};
use ideapulse_core::{AppConfig, Channel};

/// Capability-discovery entry for one channel.
#[derive(Debug, Clone)]
pub struct ChannelInfo {
    pub channel: Channel,
    pub name: &'static str,
    pub configured: bool,
}

pub struct ChannelRegistry {
    adapters: HashMap<Channel, Arc<dyn ChannelAdapter>>,
}

impl ChannelRegistry {
    /// Builds the full catalog from application configuration: live
    /// Xiaohongshu and Douyin adapters plus the Weibo/Bilibili stubs.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Http`] if an HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, ChannelError> {
        let token = config.tikhub_token.clone();
        let adapters: Vec<Arc<dyn ChannelAdapter>> = vec![
            Arc::new(XiaohongshuAdapter::new(
                ChannelClient::from_config(config)?,
                token.clone(),
            )),
            Arc::new(DouyinAdapter::new(
                ChannelClient::from_config(config)?,
                token,
            )),
            Arc::new(StubAdapter::new(Channel::Weibo)),
            Arc::new(StubAdapter::new(Channel::Bilibili)),
        ];
        Ok(Self::with_adapters(adapters))
    }

    /// Builds a registry from an explicit adapter set. Used by tests and
    /// by callers wiring custom adapters.
    #[must_use]
    pub fn with_adapters(adapters: impl IntoIterator<Item = Arc<dyn ChannelAdapter>>) -> Self {
        Self {
            adapters: adapters
                .into_iter()
                .map(|adapter| (adapter.channel(), adapter))
                .collect(),
        }
    }

    /// Looks up the adapter for a channel.
    #[must_use]
    pub fn adapter(&self, channel: Channel) -> Option<Arc<dyn ChannelAdapter>> {
        self.adapters.get(&channel).map(Arc::clone)
    }

    /// Enumerates registered channels in canonical order, with their
    /// configuration state, for UI capability discovery.
    #[must_use]
    pub fn available(&self) -> Vec<ChannelInfo> {
        Channel::ALL
            .into_iter()
            .filter_map(|channel| {
                self.adapters.get(&channel).map(|adapter| ChannelInfo {
                    channel,
                    name: channel.display_name(),
                    configured: adapter.is_configured(),
                })
            })
            .collect()
    }
}
