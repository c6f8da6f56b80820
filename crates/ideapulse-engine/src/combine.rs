//! Cross-channel statistics combination.

use ideapulse_core::{ChannelStats, ContentTypeCount};

/// How many content kinds the combined histogram keeps.
const HISTOGRAM_TOP_N: usize = 5;

/// Combines per-channel statistics into one aggregate.
///
/// Post counts and weekly-trend buckets sum; the per-post average metrics
/// are arithmetic-meaned across channels rather than weighted by post
/// count — a documented simplification, acceptable because channel counts
/// are small (1–4). Content-type histograms merge by name, summing
/// counts, re-sorted descending and capped to the top 5.
///
/// An empty input yields fully zeroed stats (7 zero trend buckets, empty
/// histogram); a single input is returned unchanged.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn combine_stats(stats: &[ChannelStats]) -> ChannelStats {
    if stats.is_empty() {
        return ChannelStats::default();
    }

    let n = stats.len() as f64;
    let mut combined = ChannelStats::default();
    let mut histogram: Vec<ContentTypeCount> = Vec::new();

    for s in stats {
        combined.total_posts += s.total_posts;
        combined.avg_likes += s.avg_likes;
        combined.avg_comments += s.avg_comments;
        combined.avg_shares += s.avg_shares;
        combined.avg_collects += s.avg_collects;
        combined.total_engagement += s.total_engagement;
        for (bucket, count) in combined.weekly_trend.iter_mut().zip(s.weekly_trend) {
            *bucket += count;
        }
        for entry in &s.content_types {
            match histogram.iter_mut().find(|e| e.name == entry.name) {
                Some(existing) => existing.value += entry.value,
                None => histogram.push(entry.clone()),
            }
        }
    }

    combined.avg_likes /= n;
    combined.avg_comments /= n;
    combined.avg_shares /= n;
    combined.avg_collects /= n;

    // Stable sort: ties keep first-seen order, which preserves the
    // single-input identity exactly.
    histogram.sort_by(|a, b| b.value.cmp(&a.value));
    histogram.truncate(HISTOGRAM_TOP_N);
    combined.content_types = histogram;

    combined
}
