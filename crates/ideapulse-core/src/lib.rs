pub mod app_config;
pub mod config;
pub mod model;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env, ConfigError};
pub use model::{
    Channel, ChannelConfig, ChannelCrawlResult, ChannelStats, ContentKind, ContentTypeCount,
    CrawlMetadata, CrawlMode, CrawlRequest, FailedChannel, MultiChannelRequest, MultiChannelResult,
    UnifiedComment, UnifiedPost,
};
