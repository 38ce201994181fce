use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::types::{ChannelSummary, Comment, Video, VideoDetail};
use super::wire::{
    extract_video_ids, normalize_videos, ErrorEnvelope, ItemsEnvelope, WireChannel,
    WireCommentThread, WireSearchItem, WireVideo,
};

const DEFAULT_BASE_URL: &str = "https://youtube.googleapis.com/youtube/v3";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Errors from the video platform client.
///
/// The single-video detail fetch is the one operation whose caller needs to
/// tell failure modes apart to render the right screen, so 403/400/404 there
/// are refined into dedicated variants with user-presentable messages. List
/// operations surface the generic variants and let views collapse them.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Blank or malformed input rejected before any request is made.
    #[error("{0}")]
    InvalidArgument(&'static str),
    /// HTTP 403 on a video fetch: daily quota exhausted or key rejected.
    #[error("API quota exceeded or access denied. Please check your API key.")]
    QuotaExceeded,
    /// HTTP 404 on a video fetch.
    #[error("Video not found. It may have been removed or is private.")]
    NotFound,
    /// HTTP 400 on a video fetch.
    #[error("Invalid video ID. Please try a different video.")]
    InvalidVideoId,
    /// Network-level error (DNS, connection, TLS, body decode).
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// Request exceeded the 20-second timeout.
    #[error("Request timed out")]
    Timeout,
    /// Any other non-2xx response.
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
}

/// Client for the video platform's REST API.
///
/// Holds a shared `reqwest::Client`, the API credential, and the region used
/// for popular-chart requests. The base URL is overridable so tests can point
/// at a wiremock server.
#[derive(Clone)]
pub struct VideoApiClient {
    http: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    region: String,
}

impl VideoApiClient {
    pub fn new(http: reqwest::Client, api_key: SecretString, region: impl Into<String>) -> Self {
        Self {
            http,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            region: region.into(),
        }
    }

    /// Override the API base URL (tests only use this with a local mock).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Fetch the popular chart, optionally filtered to one category.
    ///
    /// Category `0` means the global chart: the category filter is omitted
    /// from the request entirely, never sent as a literal zero.
    pub async fn popular_videos(
        &self,
        category_id: u32,
        max_results: u32,
    ) -> Result<Vec<Video>, ApiError> {
        let max = max_results.to_string();
        let category = category_id.to_string();
        let mut query: Vec<(&str, &str)> = vec![
            ("part", "snippet,contentDetails,statistics"),
            ("chart", "mostPopular"),
            ("maxResults", &max),
            ("regionCode", &self.region),
        ];
        if category_id != 0 {
            query.push(("videoCategoryId", &category));
        }

        tracing::debug!(category_id = category_id, max_results = max_results, "Fetching popular videos");
        let envelope: ItemsEnvelope<WireVideo> = self.get_json("videos", &query).await?;
        Ok(normalize_videos(envelope.items))
    }

    /// Fetch full details for a single video.
    ///
    /// Returns `Ok(None)` when the request succeeds but yields no usable
    /// video (empty `items`, or an item with no snippet) — "gone" is not an
    /// error. Transport and HTTP failures are refined so the player view can
    /// explain quota exhaustion, removal/privacy and malformed ids distinctly.
    pub async fn video_detail(&self, video_id: &str) -> Result<Option<VideoDetail>, ApiError> {
        let video_id = video_id.trim();
        if video_id.is_empty() {
            return Err(ApiError::InvalidArgument("Invalid video ID provided"));
        }

        tracing::debug!(video_id = %video_id, "Fetching video details");
        let query = [
            ("part", "snippet,contentDetails,statistics"),
            ("id", video_id),
        ];
        let envelope: ItemsEnvelope<WireVideo> = self
            .get_json("videos", &query)
            .await
            .map_err(refine_video_error)?;

        let Some(item) = envelope.items.into_iter().next() else {
            tracing::warn!(video_id = %video_id, "No video found for id");
            return Ok(None);
        };
        match item.into_detail() {
            Some(detail) => Ok(Some(detail)),
            None => {
                tracing::warn!(video_id = %video_id, "Video missing snippet data");
                Ok(None)
            }
        }
    }

    /// Fetch channel metadata, best-effort.
    ///
    /// Channel info only enriches the player view, so every failure collapses
    /// to `None` after a warning — this operation never raises.
    pub async fn channel_detail(&self, channel_id: &str) -> Option<ChannelSummary> {
        if channel_id.trim().is_empty() {
            return None;
        }

        let query = [("part", "snippet,statistics"), ("id", channel_id)];
        let result: Result<ItemsEnvelope<WireChannel>, ApiError> =
            self.get_json("channels", &query).await;
        match result {
            Ok(envelope) => envelope
                .items
                .into_iter()
                .next()
                .and_then(WireChannel::into_channel),
            Err(e) => {
                tracing::warn!(channel_id = %channel_id, error = %e, "Failed to fetch channel details");
                None
            }
        }
    }

    /// Fetch a video's comment threads, most-relevant-first.
    ///
    /// 403 and 404 mean comments are disabled or the video is gone; both are
    /// legitimately empty, not failures.
    pub async fn video_comments(
        &self,
        video_id: &str,
        max_results: u32,
    ) -> Result<Vec<Comment>, ApiError> {
        let max = max_results.to_string();
        let query = [
            ("part", "snippet"),
            ("videoId", video_id),
            ("maxResults", max.as_str()),
            ("order", "relevance"),
        ];
        let result: Result<ItemsEnvelope<WireCommentThread>, ApiError> =
            self.get_json("commentThreads", &query).await;
        match result {
            Ok(envelope) => Ok(envelope
                .items
                .into_iter()
                .filter_map(WireCommentThread::into_comment)
                .collect()),
            Err(ApiError::HttpStatus(403)) | Err(ApiError::HttpStatus(404)) => {
                tracing::debug!(video_id = %video_id, "Comments disabled or unavailable");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Fetch videos related to the one currently playing.
    ///
    /// Two phases: a related-to search yields candidate ids (the search
    /// endpoint carries no statistics or duration), then one batched videos
    /// call fetches full details. A failed or empty search phase, and a failed
    /// detail phase, fall back to the global popular chart; only a failed
    /// fallback propagates an error.
    pub async fn related_videos(
        &self,
        video_id: &str,
        max_results: u32,
    ) -> Result<Vec<Video>, ApiError> {
        let video_id = video_id.trim();
        if video_id.is_empty() {
            tracing::warn!("No video id provided for related videos");
            return Ok(Vec::new());
        }

        let max = max_results.to_string();
        let query = [
            ("part", "snippet"),
            ("relatedToVideoId", video_id),
            ("type", "video"),
            ("maxResults", max.as_str()),
        ];
        let search: Result<ItemsEnvelope<WireSearchItem>, ApiError> =
            self.get_json("search", &query).await;

        let ids = match search {
            Ok(envelope) => extract_video_ids(&envelope.items),
            Err(e) => {
                tracing::warn!(video_id = %video_id, error = %e, "Related search failed, falling back to popular");
                return self.popular_chart_fallback(max_results).await;
            }
        };
        if ids.is_empty() {
            tracing::debug!(video_id = %video_id, "No related videos found, falling back to popular");
            return self.popular_chart_fallback(max_results).await;
        }

        match self.videos_by_ids(&ids).await {
            Ok(videos) => Ok(videos),
            Err(e) => {
                tracing::warn!(video_id = %video_id, error = %e, "Related detail fetch failed, falling back to popular");
                self.popular_chart_fallback(max_results).await
            }
        }
    }

    /// Search videos by text.
    ///
    /// A blank query is answered locally with an empty list — no request is
    /// issued. Otherwise the fixed two-call sequence runs: id search, then a
    /// batched detail fetch for view counts and durations. Failures propagate;
    /// search never falls back to the popular chart.
    pub async fn search_videos(
        &self,
        query: &str,
        max_results: u32,
    ) -> Result<Vec<Video>, ApiError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        tracing::debug!(query = %query, "Searching videos");
        let max = max_results.to_string();
        let params = [
            ("part", "snippet"),
            ("q", query),
            ("type", "video"),
            ("maxResults", max.as_str()),
        ];
        let envelope: ItemsEnvelope<WireSearchItem> = self.get_json("search", &params).await?;

        let ids = extract_video_ids(&envelope.items);
        if ids.is_empty() {
            tracing::debug!(query = %query, "No video ids in search results");
            return Ok(Vec::new());
        }
        self.videos_by_ids(&ids).await
    }

    // ========================================================================
    // Internal Helpers
    // ========================================================================

    /// Batched detail fetch for a list of ids (phase two of search/related).
    async fn videos_by_ids(&self, ids: &[String]) -> Result<Vec<Video>, ApiError> {
        let joined = ids.join(",");
        let query = [
            ("part", "snippet,contentDetails,statistics"),
            ("id", joined.as_str()),
        ];
        let envelope: ItemsEnvelope<WireVideo> = self.get_json("videos", &query).await?;
        Ok(normalize_videos(envelope.items))
    }

    async fn popular_chart_fallback(&self, max_results: u32) -> Result<Vec<Video>, ApiError> {
        self.popular_videos(0, max_results).await
    }

    /// Issue a GET and decode the JSON body.
    ///
    /// On a non-2xx response, the platform's error envelope is logged for
    /// diagnosis and the status is returned as `ApiError::HttpStatus`; callers
    /// refine it where the distinction matters.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let request = self
            .http
            .get(&url)
            .query(query)
            .query(&[("key", self.api_key.expose_secret())]);

        let response = tokio::time::timeout(REQUEST_TIMEOUT, request.send())
            .await
            .map_err(|_| ApiError::Timeout)?
            .map_err(ApiError::Network)?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .ok()
                .and_then(|body| serde_json::from_str::<ErrorEnvelope>(&body).ok())
                .map(|e| e.error.message)
                .unwrap_or_default();
            tracing::warn!(endpoint = %endpoint, status = status.as_u16(), message = %message, "API request failed");
            return Err(ApiError::HttpStatus(status.as_u16()));
        }

        Ok(response.json::<T>().await.map_err(ApiError::Network)?)
    }
}

/// Refine status codes from the single-video endpoint into the messages the
/// player view presents.
fn refine_video_error(err: ApiError) -> ApiError {
    match err {
        ApiError::HttpStatus(403) => ApiError::QuotaExceeded,
        ApiError::HttpStatus(404) => ApiError::NotFound,
        ApiError::HttpStatus(400) => ApiError::InvalidVideoId,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_client() -> VideoApiClient {
        VideoApiClient::new(
            reqwest::Client::new(),
            SecretString::from("test-key"),
            "US",
        )
        // Unroutable address: any request that escapes validation fails fast
        .with_base_url("http://127.0.0.1:1")
    }

    #[tokio::test]
    async fn test_blank_video_id_rejected_before_request() {
        let client = offline_client();
        let err = client.video_detail("").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument(_)));

        let err = client.video_detail("   ").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_blank_search_query_short_circuits() {
        let client = offline_client();
        assert!(client.search_videos("", 10).await.unwrap().is_empty());
        assert!(client.search_videos("   ", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_related_id_returns_empty() {
        let client = offline_client();
        assert!(client.related_videos("", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_channel_id_returns_none() {
        let client = offline_client();
        assert!(client.channel_detail("").await.is_none());
    }

    #[test]
    fn test_refined_video_errors() {
        assert!(matches!(
            refine_video_error(ApiError::HttpStatus(403)),
            ApiError::QuotaExceeded
        ));
        assert!(matches!(
            refine_video_error(ApiError::HttpStatus(404)),
            ApiError::NotFound
        ));
        assert!(matches!(
            refine_video_error(ApiError::HttpStatus(400)),
            ApiError::InvalidVideoId
        ));
        assert!(matches!(
            refine_video_error(ApiError::HttpStatus(500)),
            ApiError::HttpStatus(500)
        ));
    }

    #[test]
    fn test_quota_and_not_found_messages_differ() {
        let quota = ApiError::QuotaExceeded.to_string();
        let gone = ApiError::NotFound.to_string();
        assert_ne!(quota, gone);
        assert!(quota.contains("quota"));
        assert!(gone.contains("removed") || gone.contains("private"));
    }
}
