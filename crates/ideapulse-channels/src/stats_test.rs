use chrono::{DateTime, Datelike, TimeZone, Utc};

use ideapulse_core::{Channel, ContentKind, UnifiedPost};

use super::*;

fn post(
    id: &str,
    kind: ContentKind,
    metrics: (u64, u64, u64, u64),
    created_at: Option<DateTime<Utc>>,
) -> UnifiedPost {
    let (likes, comments, shares, collects) = metrics;
    UnifiedPost {
        post_id: id.to_owned(),
        platform: Channel::Xiaohongshu,
        title: String::new(),
        content: String::new(),
        content_kind: kind,
        author: String::new(),
        likes,
        comments,
        shares,
        collects,
        views: None,
        created_at,
        raw: None,
    }
}

#[test]
fn empty_input_yields_zeroed_stats() {
    let stats = compute_stats(&[]);
    assert_eq!(stats.total_posts, 0);
    assert_eq!(stats.weekly_trend, [0; 7]);
    assert!(stats.content_types.is_empty());
    assert!((stats.total_engagement - 0.0).abs() < f64::EPSILON);
}

#[test]
fn averages_and_engagement_weighting() {
    let posts = vec![
        post("a", ContentKind::Text, (10, 4, 2, 2), None),
        post("b", ContentKind::Text, (20, 0, 0, 0), None),
    ];
    let stats = compute_stats(&posts);

    assert_eq!(stats.total_posts, 2);
    assert!((stats.avg_likes - 15.0).abs() < f64::EPSILON);
    assert!((stats.avg_comments - 2.0).abs() < f64::EPSILON);
    assert!((stats.avg_shares - 1.0).abs() < f64::EPSILON);
    assert!((stats.avg_collects - 1.0).abs() < f64::EPSILON);
    // a: 10 + 4×2 + 2×1.5 + 2×1.5 = 24; b: 20 → 44 total
    assert!((stats.total_engagement - 44.0).abs() < f64::EPSILON);
}

#[test]
fn weekly_trend_is_monday_first_with_seven_buckets() {
    // 2024-01-01 is a Monday, 2024-01-07 a Sunday.
    let monday = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    let sunday = Utc.with_ymd_and_hms(2024, 1, 7, 12, 0, 0).unwrap();
    let posts = vec![
        post("a", ContentKind::Text, (0, 0, 0, 0), Some(monday)),
        post("b", ContentKind::Text, (0, 0, 0, 0), Some(monday)),
        post("c", ContentKind::Text, (0, 0, 0, 0), Some(sunday)),
    ];
    let stats = compute_stats(&posts);

    assert_eq!(stats.weekly_trend.len(), 7);
    assert_eq!(stats.weekly_trend[0], 2, "Monday bucket comes first");
    assert_eq!(stats.weekly_trend[6], 1, "Sunday bucket comes last");
    assert_eq!(stats.weekly_trend[1..6], [0, 0, 0, 0, 0]);
}

#[test]
fn missing_timestamp_counts_toward_today() {
    let posts = vec![post("a", ContentKind::Text, (0, 0, 0, 0), None)];
    let stats = compute_stats(&posts);
    let today = Utc::now().weekday().num_days_from_monday() as usize;
    assert_eq!(stats.weekly_trend[today], 1);
    assert_eq!(stats.weekly_trend.iter().sum::<u64>(), 1);
}

#[test]
fn content_type_histogram_is_descending() {
    let posts = vec![
        post("a", ContentKind::Video, (0, 0, 0, 0), None),
        post("b", ContentKind::Video, (0, 0, 0, 0), None),
        post("c", ContentKind::Image, (0, 0, 0, 0), None),
    ];
    let stats = compute_stats(&posts);

    assert_eq!(stats.content_types.len(), 2);
    assert_eq!(stats.content_types[0].name, "video");
    assert_eq!(stats.content_types[0].value, 2);
    assert_eq!(stats.content_types[1].name, "image");
    assert_eq!(stats.content_types[1].value, 1);
}

#[test]
fn histogram_omits_absent_kinds() {
    let posts = vec![post("a", ContentKind::Mixed, (0, 0, 0, 0), None)];
    let stats = compute_stats(&posts);
    assert_eq!(stats.content_types.len(), 1);
    assert_eq!(stats.content_types[0].name, "mixed");
}
