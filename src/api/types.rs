use chrono::{DateTime, Utc};

/// Lightweight video record produced by list-style endpoints (popular chart,
/// search detail batch, related batch).
///
/// All wire-shape differences between endpoints are resolved before one of
/// these exists: `id` is always the plain string id. View code never sees the
/// search endpoint's nested id object.
#[derive(Debug, Clone, PartialEq)]
pub struct Video {
    pub id: String,
    pub title: String,
    pub channel_title: String,
    pub channel_id: String,
    pub thumbnail_url: String,
    pub published_at: Option<DateTime<Utc>>,
    pub view_count: i64,
    /// ISO-8601 period (`PT5M9S`), absent on search snippets that skipped the
    /// detail batch. Formatting happens at render time.
    pub duration: Option<String>,
}

/// Full video record from a single-id detail fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoDetail {
    pub id: String,
    pub title: String,
    pub description: String,
    pub channel_title: String,
    pub channel_id: String,
    pub thumbnail_url: String,
    pub published_at: Option<DateTime<Utc>>,
    pub view_count: i64,
    pub like_count: i64,
    pub comment_count: i64,
    pub duration: Option<String>,
}

impl VideoDetail {
    /// The public watch-page URL for this video.
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.id)
    }
}

/// Channel metadata fetched by the id extracted from a `VideoDetail`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSummary {
    pub id: String,
    pub title: String,
    pub thumbnail_url: String,
    pub subscriber_count: i64,
}

/// A top-level comment from a video's comment threads, most-relevant-first.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub author: String,
    pub author_avatar_url: String,
    pub text: String,
    pub like_count: i64,
    pub published_at: Option<DateTime<Utc>>,
}
