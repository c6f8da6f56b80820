//! Platform-agnostic data model shared by every channel adapter.
//!
//! All adapters normalize their platform's API shapes into [`UnifiedPost`],
//! [`UnifiedComment`], and [`ChannelStats`]; the orchestrator combines those
//! into a [`MultiChannelResult`]. Everything here is serde-serializable —
//! the validation pipeline consumes one JSON result per run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A supported social platform.
///
/// The lowercase string id doubles as the registry key and as the `platform`
/// tag stamped onto every produced post and comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Xiaohongshu,
    Douyin,
    Weibo,
    Bilibili,
}

impl Channel {
    /// All known channels, implemented or not. Stubs are first-class
    /// registry entries so the fan-out never special-cases channel count.
    pub const ALL: [Channel; 4] = [
        Channel::Xiaohongshu,
        Channel::Douyin,
        Channel::Weibo,
        Channel::Bilibili,
    ];

    /// Stable lowercase identifier.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Channel::Xiaohongshu => "xiaohongshu",
            Channel::Douyin => "douyin",
            Channel::Weibo => "weibo",
            Channel::Bilibili => "bilibili",
        }
    }

    /// Human-readable display name for capability discovery.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Channel::Xiaohongshu => "Xiaohongshu",
            Channel::Douyin => "Douyin",
            Channel::Weibo => "Weibo",
            Channel::Bilibili => "Bilibili",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl std::str::FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "xiaohongshu" => Ok(Channel::Xiaohongshu),
            "douyin" => Ok(Channel::Douyin),
            "weibo" => Ok(Channel::Weibo),
            "bilibili" => Ok(Channel::Bilibili),
            other => Err(format!("unknown channel: {other}")),
        }
    }
}

/// Kind of content a crawled item carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Text,
    Image,
    Video,
    Mixed,
}

impl ContentKind {
    /// Lowercase label used in the content-type histogram.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ContentKind::Text => "text",
            ContentKind::Image => "image",
            ContentKind::Video => "video",
            ContentKind::Mixed => "mixed",
        }
    }
}

/// One crawled item (note, video, article) in the unified schema.
///
/// `post_id` is unique within a single crawl result for a given platform;
/// adapters deduplicate across pages. `raw` holds the opaque upstream
/// payload for debugging only — downstream logic never reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnifiedPost {
    pub post_id: String,
    pub platform: Channel,
    pub title: String,
    pub content: String,
    pub content_kind: ContentKind,
    pub author: String,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
    pub collects: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<serde_json::Value>,
}

/// One crawled reply tied to a post.
///
/// `post_id` is best-effort: some platforms cannot reliably attribute a
/// comment to its post when paginating (see the Xiaohongshu adapter's
/// documented first-post approximation).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnifiedComment {
    pub comment_id: String,
    pub platform: Channel,
    pub post_id: String,
    pub content: String,
    pub author: String,
    pub likes: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Count of posts of one content kind, for the top-5 histogram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentTypeCount {
    pub name: String,
    pub value: u64,
}

/// Aggregate over a single channel's posts.
///
/// `weekly_trend` always holds exactly 7 buckets, Monday-first, regardless
/// of input ordering. `content_types` holds at most the top 5 kinds by
/// volume, descending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelStats {
    pub total_posts: u64,
    pub avg_likes: f64,
    pub avg_comments: f64,
    pub avg_shares: f64,
    pub avg_collects: f64,
    pub total_engagement: f64,
    pub weekly_trend: [u64; 7],
    pub content_types: Vec<ContentTypeCount>,
}

impl Default for ChannelStats {
    fn default() -> Self {
        Self {
            total_posts: 0,
            avg_likes: 0.0,
            avg_comments: 0.0,
            avg_shares: 0.0,
            avg_collects: 0.0,
            total_engagement: 0.0,
            weekly_trend: [0; 7],
            content_types: Vec::new(),
        }
    }
}

/// Execution metadata for one adapter invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrawlMetadata {
    /// Wall-clock duration of the whole crawl.
    pub duration_ms: u64,
    /// Upstream API calls performed, retries included.
    pub api_calls: u32,
    /// Whether any 429 was seen during the crawl.
    pub rate_limited: bool,
}

/// Output of one adapter invocation. Constructed once per `crawl()` call
/// and immutable after return; no shared mutable state survives across
/// calls except the adapter's configured auth token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelCrawlResult {
    pub success: bool,
    pub channel: Channel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub posts: Vec<UnifiedPost>,
    pub comments: Vec<UnifiedComment>,
    pub stats: ChannelStats,
    pub metadata: CrawlMetadata,
}

impl ChannelCrawlResult {
    /// Structurally valid empty failure: no posts, zeroed stats, an error
    /// message. Every adapter failure mode funnels through this shape so
    /// the orchestrator never needs to null-check.
    #[must_use]
    pub fn failure(channel: Channel, error: impl Into<String>) -> Self {
        Self {
            success: false,
            channel,
            error: Some(error.into()),
            posts: Vec::new(),
            comments: Vec::new(),
            stats: ChannelStats::default(),
            metadata: CrawlMetadata::default(),
        }
    }

    /// Same as [`ChannelCrawlResult::failure`] but preserving the execution
    /// metadata gathered before the crawl failed (API calls made, whether a
    /// rate limit was hit).
    #[must_use]
    pub fn failure_with_metadata(
        channel: Channel,
        error: impl Into<String>,
        metadata: CrawlMetadata,
    ) -> Self {
        Self {
            metadata,
            ..Self::failure(channel, error)
        }
    }
}

/// A channel that failed within a multi-channel run, with its error text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedChannel {
    pub channel: Channel,
    pub error: String,
}

/// Output of the orchestrator: the partial-failure contract the rest of
/// the system depends on. `success` is true iff at least one channel
/// succeeded; a validation run proceeds with whatever channels succeeded
/// rather than failing atomically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiChannelResult {
    pub success: bool,
    /// Per-channel results, in request order.
    pub results: Vec<ChannelCrawlResult>,
    /// Stats combined across successful channels only.
    pub combined_stats: ChannelStats,
    pub succeeded_channels: Vec<Channel>,
    pub failed_channels: Vec<FailedChannel>,
}

/// Crawl depth knob: quick trades sample size for latency and API cost,
/// deep requests a second search page and more comments per post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrawlMode {
    #[default]
    Quick,
    Deep,
}

impl CrawlMode {
    /// Default number of top posts whose comments are fetched.
    #[must_use]
    pub fn default_max_posts(self) -> usize {
        match self {
            CrawlMode::Quick => 5,
            CrawlMode::Deep => 10,
        }
    }

    /// Default number of comments fetched per post.
    #[must_use]
    pub fn default_max_comments(self) -> usize {
        match self {
            CrawlMode::Quick => 4,
            CrawlMode::Deep => 5,
        }
    }
}

/// Per-channel crawl configuration supplied by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Bearer token for the upstream API. Overrides the adapter's default
    /// token when non-empty.
    #[serde(default)]
    pub auth_token: String,
    #[serde(default)]
    pub mode: CrawlMode,
    /// Override for the number of posts whose comments are fetched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_posts: Option<usize>,
    /// Override for the number of comments fetched per post.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_comments_per_post: Option<usize>,
}

impl ChannelConfig {
    /// Effective comment-phase post budget (override or mode default).
    #[must_use]
    pub fn max_posts(&self) -> usize {
        self.max_posts.unwrap_or_else(|| self.mode.default_max_posts())
    }

    /// Effective per-post comment budget (override or mode default).
    #[must_use]
    pub fn max_comments_per_post(&self) -> usize {
        self.max_comments_per_post
            .unwrap_or_else(|| self.mode.default_max_comments())
    }
}

/// Input to a single adapter invocation.
#[derive(Debug, Clone)]
pub struct CrawlRequest {
    pub keyword: String,
    pub tags: Vec<String>,
    pub config: ChannelConfig,
}

/// Input to the orchestrator's fan-out.
#[derive(Debug, Clone)]
pub struct MultiChannelRequest {
    pub keyword: String,
    pub tags: Vec<String>,
    /// One entry per channel to crawl, each with its own config.
    pub channels: Vec<(Channel, ChannelConfig)>,
}
