//! Xiaohongshu (RED) adapter: note search + note comments via the
//! aggregation API.
//!
//! Comment-to-post attribution is a documented approximation: the comment
//! endpoint does not return the originating note id, so every fetched
//! comment is ascribed to the first note of the batch. This is deliberate —
//! do not invent an attribution the upstream API does not provide.

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

const SEARCH_PATH: &str = "/api/v1/xiaohongshu/web/search_notes";
const COMMENTS_PATH: &str = "/api/v1/xiaohongshu/web/get_note_comments";

pub struct XiaohongshuAdapter {
    client: ChannelClient,
    default_token: Option<String>,
}

impl XiaohongshuAdapter {
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
        page: u32,
        token: &str,
        tracker: &mut CallTracker,
    ) -> Result<Value, ChannelError> {
        self.client
            .get_json(
                SEARCH_PATH,
                &[
                    ("keyword", keyword.to_owned()),
                    ("page", page.to_string()),
                    ("sort", "general".to_owned()),
                    ("noteType", "_0".to_owned()),
                ],
                token,
                tracker,
            )
            .await
    }

    /// Appends the page's notes to `posts`, skipping entries without an id
    /// and ids already seen (post ids are unique within one crawl result).
    fn collect_posts(body: &Value, seen: &mut HashSet<String>, posts: &mut Vec<UnifiedPost>) {
        for item in array_field(envelope(body), "items") {
            // Newer envelope versions wrap the note; older ones inline it.
            let note = item.get("note").filter(|n| n.is_object()).unwrap_or(item);
            let post_id = str_field(note, &["id", "note_id"]);
            if post_id.is_empty() || !seen.insert(post_id.clone()) {
                continue;
            }
            posts.push(UnifiedPost {
                post_id,
                platform: Channel::Xiaohongshu,
                title: str_field(note, &["title", "display_title"]),
                content: str_field(note, &["desc", "content"]),
                content_kind: note_kind(note),
                author: note
                    .get("user")
                    .map(|u| str_field(u, &["nickname", "name"]))
                    .unwrap_or_default(),
                likes: u64_field(note, &["liked_count", "likes"]),
                comments: u64_field(note, &["comments_count", "comment_count"]),
                shares: u64_field(note, &["shared_count", "share_count"]),
                collects: u64_field(note, &["collected_count", "collect_count"]),
                views: None,
                created_at: timestamp_field(note, &["time", "publish_time", "create_time"]),
                raw: Some(item.clone()),
            });
        }
    }

    fn parse_comment(raw: &Value, post_id: &str) -> Option<UnifiedComment> {
        let comment_id = str_field(raw, &["id", "comment_id"]);
        if comment_id.is_empty() {
            return None;
        }
        let ip_location = str_field(raw, &["ip_location"]);
        Some(UnifiedComment {
            comment_id,
            platform: Channel::Xiaohongshu,
            post_id: post_id.to_owned(),
            content: str_field(raw, &["content", "text"]),
            author: raw
                .get("user")
                .map(|u| str_field(u, &["nickname", "name"]))
                .unwrap_or_default(),
            likes: u64_field(raw, &["like_count", "liked_count"]),
            ip_location: (!ip_location.is_empty()).then_some(ip_location),
            created_at: timestamp_field(raw, &["create_time", "time"]),
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
            .search_page(&request.keyword, 1, token, tracker)
            .await?;
        Self::collect_posts(&body, &mut seen, &mut posts);

        // Deep mode trades extra API calls for a broader sample: one more
        // page, only when the platform says more results exist.
        if request.config.mode == CrawlMode::Deep && bool_field(envelope(&body), "has_more") {
            let body = self
                .search_page(&request.keyword, 2, token, tracker)
                .await?;
            Self::collect_posts(&body, &mut seen, &mut posts);
        }

        let mut comments = Vec::new();
        // First-post attribution: the comments endpoint cannot tell us
        // which note a comment belongs to.
        let attributed_to = posts.first().map(|p| p.post_id.clone()).unwrap_or_default();
        let per_post = request.config.max_comments_per_post();

        for post in posts.iter().take(request.config.max_posts()) {
            let fetched = self
                .client
                .get_json(
                    COMMENTS_PATH,
                    &[("note_id", post.post_id.clone())],
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
                            .filter_map(|c| Self::parse_comment(c, &attributed_to)),
                    );
                }
                Err(err) => {
                    // A single failed comment fetch does not sink the crawl;
                    // the posts collected so far are still usable signal.
                    tracing::warn!(
                        note_id = %post.post_id,
                        error = %err,
                        "xiaohongshu comment fetch failed — skipping note"
                    );
                }
            }
        }

        Ok((posts, comments))
    }
}

/// Infers the content kind from the note's media hints.
fn note_kind(note: &Value) -> ContentKind {
    if note.get("video").is_some_and(Value::is_object) {
        ContentKind::Video
    } else if !array_field(note, "images_list").is_empty()
        || u64_field(note, &["image_count"]) > 0
        || note.get("cover").is_some_and(Value::is_object)
    {
        ContentKind::Mixed
    } else {
        ContentKind::Text
    }
}

#[async_trait]
impl ChannelAdapter for XiaohongshuAdapter {
    fn channel(&self) -> Channel {
        Channel::Xiaohongshu
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
                "xiaohongshu adapter is not configured: missing auth token",
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
                    "xiaohongshu crawl complete"
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
                tracing::warn!(channel = %channel, error = %err, "xiaohongshu crawl failed");
                ChannelCrawlResult::failure_with_metadata(channel, err.to_string(), metadata)
            }
        }
    }
}

#[cfg(test)]
#[path = "xiaohongshu_test.rs"]
mod tests;
