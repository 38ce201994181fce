//! Wire shapes for the video platform's JSON responses.
//!
//! Every endpoint wraps its payload in an `items` array; a missing array
//! means zero results, not an error. The search endpoint nests the video id
//! inside an object (`{"id": {"videoId": ...}}`) while the videos endpoint
//! returns a plain string — both shapes are accepted here and normalized so
//! nothing downstream has to branch on them.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::types::{ChannelSummary, Comment, Video, VideoDetail};

/// Generic `items` envelope shared by every endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct ItemsEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

/// Error body the platform attaches to non-2xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: String,
}

// ============================================================================
// Video Items
// ============================================================================

/// A video id in either of the two shapes the platform emits.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum WireId {
    Plain(String),
    Nested {
        #[serde(rename = "videoId")]
        video_id: Option<String>,
    },
}

impl WireId {
    pub(crate) fn video_id(&self) -> Option<&str> {
        match self {
            WireId::Plain(id) if !id.is_empty() => Some(id),
            WireId::Plain(_) => None,
            WireId::Nested { video_id } => video_id.as_deref().filter(|id| !id.is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireVideo {
    pub id: Option<WireId>,
    pub snippet: Option<WireSnippet>,
    #[serde(rename = "contentDetails")]
    pub content_details: Option<WireContentDetails>,
    pub statistics: Option<WireVideoStatistics>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireSnippet {
    pub title: Option<String>,
    pub description: Option<String>,
    pub channel_id: Option<String>,
    pub channel_title: Option<String>,
    pub published_at: Option<String>,
    pub thumbnails: Option<WireThumbnails>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireThumbnails {
    pub medium: Option<WireThumbnail>,
    pub default: Option<WireThumbnail>,
    pub high: Option<WireThumbnail>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireThumbnail {
    pub url: String,
}

impl WireThumbnails {
    /// Preferred thumbnail, falling back through the sizes the API provides.
    fn best_url(&self) -> Option<&str> {
        self.medium
            .as_ref()
            .or(self.high.as_ref())
            .or(self.default.as_ref())
            .map(|t| t.url.as_str())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireContentDetails {
    pub duration: Option<String>,
}

/// Statistics arrive as decimal strings, not numbers.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireVideoStatistics {
    pub view_count: Option<String>,
    pub like_count: Option<String>,
    pub comment_count: Option<String>,
}

fn parse_count(raw: Option<&str>) -> i64 {
    raw.and_then(|s| s.parse().ok()).unwrap_or(0)
}

fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

impl WireVideo {
    /// Normalize into a [`Video`], or `None` when the item lacks the id or
    /// snippet data the views require. Skipped items are counted by callers.
    pub(crate) fn into_video(self) -> Option<Video> {
        let id = self.id.as_ref().and_then(WireId::video_id)?.to_string();
        let snippet = self.snippet?;
        let thumbnail_url = snippet
            .thumbnails
            .as_ref()
            .and_then(WireThumbnails::best_url)?
            .to_string();
        let stats = self.statistics;

        Some(Video {
            id,
            title: snippet.title.unwrap_or_else(|| "No Title Available".to_string()),
            channel_title: snippet
                .channel_title
                .unwrap_or_else(|| "Unknown Channel".to_string()),
            channel_id: snippet.channel_id.unwrap_or_default(),
            thumbnail_url,
            published_at: parse_timestamp(snippet.published_at.as_deref()),
            view_count: parse_count(stats.as_ref().and_then(|s| s.view_count.as_deref())),
            duration: self.content_details.and_then(|c| c.duration),
        })
    }

    /// Normalize into a [`VideoDetail`]; same skip rules as [`into_video`].
    ///
    /// [`into_video`]: WireVideo::into_video
    pub(crate) fn into_detail(self) -> Option<VideoDetail> {
        let id = self.id.as_ref().and_then(WireId::video_id)?.to_string();
        let snippet = self.snippet?;
        let thumbnail_url = snippet
            .thumbnails
            .as_ref()
            .and_then(WireThumbnails::best_url)
            .unwrap_or_default()
            .to_string();
        let stats = self.statistics;

        Some(VideoDetail {
            id,
            title: snippet.title.unwrap_or_else(|| "No Title Available".to_string()),
            description: snippet.description.unwrap_or_default(),
            channel_title: snippet
                .channel_title
                .unwrap_or_else(|| "Unknown Channel".to_string()),
            channel_id: snippet.channel_id.unwrap_or_default(),
            thumbnail_url,
            published_at: parse_timestamp(snippet.published_at.as_deref()),
            view_count: parse_count(stats.as_ref().and_then(|s| s.view_count.as_deref())),
            like_count: parse_count(stats.as_ref().and_then(|s| s.like_count.as_deref())),
            comment_count: parse_count(stats.as_ref().and_then(|s| s.comment_count.as_deref())),
            duration: self.content_details.and_then(|c| c.duration),
        })
    }
}

/// Normalize a batch of wire videos, logging how many were skipped.
pub(crate) fn normalize_videos(items: Vec<WireVideo>) -> Vec<Video> {
    let total = items.len();
    let videos: Vec<Video> = items.into_iter().filter_map(WireVideo::into_video).collect();
    let skipped = total - videos.len();
    if skipped > 0 {
        tracing::warn!(skipped = skipped, "Video items missing id or snippet skipped");
    }
    videos
}

// ============================================================================
// Channel Items
// ============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct WireChannel {
    pub id: Option<String>,
    pub snippet: Option<WireChannelSnippet>,
    pub statistics: Option<WireChannelStatistics>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireChannelSnippet {
    pub title: Option<String>,
    pub thumbnails: Option<WireThumbnails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireChannelStatistics {
    pub subscriber_count: Option<String>,
}

impl WireChannel {
    pub(crate) fn into_channel(self) -> Option<ChannelSummary> {
        let id = self.id.filter(|id| !id.is_empty())?;
        let snippet = self.snippet?;
        Some(ChannelSummary {
            id,
            title: snippet.title.unwrap_or_else(|| "Unknown Channel".to_string()),
            thumbnail_url: snippet
                .thumbnails
                .as_ref()
                .and_then(WireThumbnails::best_url)
                .unwrap_or_default()
                .to_string(),
            subscriber_count: parse_count(
                self.statistics
                    .as_ref()
                    .and_then(|s| s.subscriber_count.as_deref()),
            ),
        })
    }
}

// ============================================================================
// Comment Threads
// ============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct WireCommentThread {
    pub snippet: Option<WireCommentThreadSnippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireCommentThreadSnippet {
    pub top_level_comment: Option<WireTopLevelComment>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireTopLevelComment {
    pub snippet: Option<WireCommentSnippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireCommentSnippet {
    pub author_display_name: Option<String>,
    pub author_profile_image_url: Option<String>,
    pub text_display: Option<String>,
    pub like_count: Option<i64>,
    pub published_at: Option<String>,
}

impl WireCommentThread {
    pub(crate) fn into_comment(self) -> Option<Comment> {
        let snippet = self.snippet?.top_level_comment?.snippet?;
        Some(Comment {
            author: snippet
                .author_display_name
                .unwrap_or_else(|| "Unknown".to_string()),
            author_avatar_url: snippet.author_profile_image_url.unwrap_or_default(),
            text: snippet.text_display.unwrap_or_default(),
            like_count: snippet.like_count.unwrap_or(0).max(0),
            published_at: parse_timestamp(snippet.published_at.as_deref()),
        })
    }
}

// ============================================================================
// Search Items
// ============================================================================

/// Raw search result: only the nested id is consumed — full details come from
/// the batched videos call that follows every search.
#[derive(Debug, Deserialize)]
pub(crate) struct WireSearchItem {
    pub id: Option<WireId>,
}

/// Extract candidate video ids from search results, dropping playlist and
/// channel hits (which carry no `videoId`).
pub(crate) fn extract_video_ids(items: &[WireSearchItem]) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| item.id.as_ref().and_then(WireId::video_id))
        .map(str::to_string)
        .collect()
}
