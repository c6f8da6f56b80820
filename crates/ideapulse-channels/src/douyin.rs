//! Douyin adapter: video search + video comments via the aggregation API.
//!
//! Unlike Xiaohongshu, the comment endpoint is keyed by `aweme_id`, so
//! comment-to-post attribution is exact.

use std::collections::HashSet;
use std::time::Instant;

use async_trait::async_trait;
use serde_json::Value;

use ideapulse_core::{
    Channel, ChannelCrawlResult, ContentKind, CrawlMetadata, CrawlMode, CrawlRequest,
    UnifiedComment, UnifiedPost,
};

use crate::adapter::{resolve_token, ChannelAdapter};
use crate::client::{CallTracker, ChannelClient};
use crate::error::ChannelError;
use crate::parse::{array_field, bool_field, envelope, str_field, timestamp_field, u64_field};
use crate::stats::compute_stats;

const SEARCH_PATH: &str = "/api/v1/douyin/web/fetch_video_search_result";
const COMMENTS_PATH: &str = "/api/v1/douyin/web/fetch_video_comments";

/// Videos requested per search page.
const SEARCH_PAGE_SIZE: usize = 10;

/// Title is the description truncated to this many characters.
const TITLE_CHARS: usize = 40;

pub struct DouyinAdapter {
    client: ChannelClient,
    default_token: Option<String>,
}

impl DouyinAdapter {
    #[must_use]
    pub fn new(client: ChannelClient, default_token: Option<String>) -> Self {
        Self {
            client,
            default_token,
        }
    }

    async fn search_page(
        &self,
        keyword: &str,
        offset: u64,
        token: &str,
        tracker: &mut CallTracker,
    ) -> Result<Value, ChannelError> {
        self.client
            .get_json(
                SEARCH_PATH,
                &[
                    ("keyword", keyword.to_owned()),
                    ("offset", offset.to_string()),
                    ("count", SEARCH_PAGE_SIZE.to_string()),
                    ("sort_type", "0".to_owned()),
                ],
                token,
                tracker,
            )
            .await
    }

    fn collect_posts(body: &Value, seen: &mut HashSet<String>, posts: &mut Vec<UnifiedPost>) {
        for raw in array_field(envelope(body), "aweme_list") {
            let aweme = raw.get("aweme_info").filter(|a| a.is_object()).unwrap_or(raw);
            let post_id = str_field(aweme, &["aweme_id", "id"]);
            if post_id.is_empty() || !seen.insert(post_id.clone()) {
                continue;
            }
            let stats = aweme.get("statistics").cloned().unwrap_or(Value::Null);
            let desc = str_field(aweme, &["desc"]);
            let views = u64_field(&stats, &["play_count"]);
            posts.push(UnifiedPost {
                post_id,
                platform: Channel::Douyin,
                title: desc.chars().take(TITLE_CHARS).collect(),
                content: desc,
                content_kind: ContentKind::Video,
                author: aweme
                    .get("author")
                    .map(|a| str_field(a, &["nickname", "name"]))
                    .unwrap_or_default(),
                likes: u64_field(&stats, &["digg_count"]),
                comments: u64_field(&stats, &["comment_count"]),
                shares: u64_field(&stats, &["share_count"]),
                collects: u64_field(&stats, &["collect_count"]),
                views: (views > 0).then_some(views),
                created_at: timestamp_field(aweme, &["create_time"]),
                raw: Some(raw.clone()),
            });
        }
    }

    fn parse_comment(raw: &Value, post_id: &str) -> Option<UnifiedComment> {
        let comment_id = str_field(raw, &["cid", "comment_id", "id"]);
        if comment_id.is_empty() {
            return None;
        }
        let ip_location = str_field(raw, &["ip_label", "ip_location"]);
        Some(UnifiedComment {
            comment_id,
            platform: Channel::Douyin,
            post_id: post_id.to_owned(),
            content: str_field(raw, &["text", "content"]),
            author: raw
                .get("user")
                .map(|u| str_field(u, &["nickname", "name"]))
                .unwrap_or_default(),
            likes: u64_field(raw, &["digg_count", "like_count"]),
            ip_location: (!ip_location.is_empty()).then_some(ip_location),
            created_at: timestamp_field(raw, &["create_time"]),
        })
    }

    async fn crawl_inner(
        &self,
        request: &CrawlRequest,
        token: &str,
        tracker: &mut CallTracker,
    ) -> Result<(Vec<UnifiedPost>, Vec<UnifiedComment>), ChannelError> {
        let mut posts = Vec::new();
        let mut seen = HashSet::new();

        let body = self
            .search_page(&request.keyword, 0, token, tracker)
            .await?;
        Self::collect_posts(&body, &mut seen, &mut posts);

        if request.config.mode == CrawlMode::Deep && bool_field(envelope(&body), "has_more") {
            // The search endpoint paginates by cursor offset.
            let next_offset = u64_field(envelope(&body), &["cursor", "offset"]);
            let body = self
                .search_page(&request.keyword, next_offset, token, tracker)
                .await?;
            Self::collect_posts(&body, &mut seen, &mut posts);
        }

        let mut comments = Vec::new();
        let per_post = request.config.max_comments_per_post();

        for post in posts.iter().take(request.config.max_posts()) {
            let fetched = self
                .client
                .get_json(
                    COMMENTS_PATH,
                    &[
                        ("aweme_id", post.post_id.clone()),
                        ("cursor", "0".to_owned()),
                        ("count", per_post.to_string()),
                    ],
                    token,
                    tracker,
                )
                .await;
            match fetched {
                Ok(body) => {
                    comments.extend(
                        array_field(envelope(&body), "comments")
                            .iter()
                            .take(per_post)
                            .filter_map(|c| Self::parse_comment(c, &post.post_id)),
                    );
                }
                Err(err) => {
                    tracing::warn!(
                        aweme_id = %post.post_id,
                        error = %err,
                        "douyin comment fetch failed — skipping video"
                    );
                }
            }
        }

        Ok((posts, comments))
    }
}

#[async_trait]
impl ChannelAdapter for DouyinAdapter {
    fn channel(&self) -> Channel {
        Channel::Douyin
    }

    fn is_configured(&self) -> bool {
        self.default_token.as_deref().is_some_and(|t| !t.is_empty())
    }

    async fn crawl(&self, request: &CrawlRequest) -> ChannelCrawlResult {
        let started = Instant::now();
        let channel = self.channel();

        let Some(token) = resolve_token(&request.config.auth_token, self.default_token.as_deref())
        else {
            return ChannelCrawlResult::failure(
                channel,
                "douyin adapter is not configured: missing auth token",
            );
        };
        let token = token.to_owned();

        let mut tracker = CallTracker::default();
        let outcome = self.crawl_inner(request, &token, &mut tracker).await;
        let metadata = CrawlMetadata {
            duration_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            api_calls: tracker.api_calls,
            rate_limited: tracker.rate_limited,
        };

        match outcome {
            Ok((posts, comments)) => {
                tracing::info!(
                    channel = %channel,
                    posts = posts.len(),
                    comments = comments.len(),
                    api_calls = metadata.api_calls,
                    "douyin crawl complete"
                );
                ChannelCrawlResult {
                    success: true,
                    channel,
                    error: None,
                    stats: compute_stats(&posts),
                    posts,
                    comments,
                    metadata,
                }
            }
            Err(err) => {
                tracing::warn!(channel = %channel, error = %err, "douyin crawl failed");
                ChannelCrawlResult::failure_with_metadata(channel, err.to_string(), metadata)
            }
        }
    }
}

#[cfg(test)]
#[path = "douyin_test.rs"]
mod tests;
