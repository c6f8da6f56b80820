//! Per-channel statistics over normalized posts.

use chrono::{Datelike, Utc};

use ideapulse_core::{ChannelStats, ContentTypeCount, UnifiedPost};

/// How many content kinds the histogram keeps, by volume.
const HISTOGRAM_TOP_N: usize = 5;

/// Weighted engagement for one post. Comments and saves are weighted above
/// raw likes as stronger intent signals.
#[allow(clippy::cast_precision_loss)]
fn engagement(post: &UnifiedPost) -> f64 {
    post.likes as f64
        + post.comments as f64 * 2.0
        + post.shares as f64 * 1.5
        + post.collects as f64 * 1.5
}

/// Computes aggregate statistics over one channel's posts.
///
/// The weekly trend buckets posts by the weekday of `created_at`
/// (Monday-first, always 7 buckets); posts without a timestamp count
/// toward today. The content-type histogram keeps the top 5 kinds by
/// volume, descending.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn compute_stats(posts: &[UnifiedPost]) -> ChannelStats {
    if posts.is_empty() {
        return ChannelStats::default();
    }

    let n = posts.len() as f64;
    let mut likes = 0u64;
    let mut comments = 0u64;
    let mut shares = 0u64;
    let mut collects = 0u64;
    let mut total_engagement = 0.0f64;
    let mut weekly_trend = [0u64; 7];
    // text / image / video / mixed
    let mut kind_counts = [0u64; 4];

    for post in posts {
        likes += post.likes;
        comments += post.comments;
        shares += post.shares;
        collects += post.collects;
        total_engagement += engagement(post);

        let day = post
            .created_at
            .unwrap_or_else(Utc::now)
            .weekday()
            .num_days_from_monday() as usize;
        weekly_trend[day] += 1;

        kind_counts[post.content_kind as usize] += 1;
    }

    let labels = ["text", "image", "video", "mixed"];
    let mut content_types: Vec<ContentTypeCount> = labels
        .iter()
        .zip(kind_counts)
        .filter(|(_, count)| *count > 0)
        .map(|(name, value)| ContentTypeCount {
            name: (*name).to_owned(),
            value,
        })
        .collect();
    content_types.sort_by(|a, b| b.value.cmp(&a.value));
    content_types.truncate(HISTOGRAM_TOP_N);

    ChannelStats {
        total_posts: posts.len() as u64,
        avg_likes: likes as f64 / n,
        avg_comments: comments as f64 / n,
        avg_shares: shares as f64 / n,
        avg_collects: collects as f64 / n,
        total_engagement,
        weekly_trend,
        content_types,
    }
}

#[cfg(test)]
#[path = "stats_test.rs"]
mod tests;
