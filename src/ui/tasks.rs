//! Background fetch task spawning.
//!
//! Every spawn helper captures the current generation counter, clones the
//! API client, and reports back through the `AppEvent` channel. Panics in
//! the fetch future are caught and surfaced as `TaskPanicked` so the event
//! loop never loses a task silently.

use crate::app::{App, AppEvent, FeedSource, MAX_RECOMMENDATIONS};
use crate::api::{Video, VideoApiClient};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use tokio::sync::mpsc;

/// Run a fetch future, converting a panic into an error string.
async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                "unknown panic".to_string()
            }
        })
}

/// Spawn the grid fetch for the app's current feed source.
///
/// History is assembled locally by the input handler and never reaches this
/// function. Bumps the feed generation; a stale response from a previous
/// source is dropped by the event handler.
pub(super) fn spawn_feed_load(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    let generation = app.begin_feed_load();
    let client = app.client.clone();
    let source = app.feed_source.clone();
    let page_size = app.feed_page_size;
    let tx = event_tx.clone();

    tracing::debug!(?source, generation, "spawning feed load");

    app.feed_handle = Some(tokio::spawn(async move {
        let fetch = async {
            match &source {
                FeedSource::Category(id) => client.popular_videos(*id, page_size).await,
                FeedSource::Search(query) => client.search_videos(query, page_size).await,
                FeedSource::History => unreachable!("history is assembled locally"),
            }
        };
        match catch_task_panic(fetch).await {
            Ok(result) => {
                let _ = tx.send(AppEvent::FeedLoaded { generation, result }).await;
            }
            Err(error) => {
                let _ = tx
                    .send(AppEvent::TaskPanicked {
                        task: "feed_load",
                        error,
                    })
                    .await;
            }
        }
    }));
}

/// Spawn the core video detail fetch for the player view.
///
/// Channel and comments are spawned afterwards by the event handler, once
/// the detail has arrived, sharing this load's generation.
pub(super) fn spawn_player_load(
    app: &mut App,
    video_id: String,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    let generation = app.begin_player_load(video_id.clone());
    let client = app.client.clone();
    let tx = event_tx.clone();

    tracing::debug!(video_id = %video_id, generation, "spawning player load");

    app.player_handle = Some(tokio::spawn(async move {
        let fetch = client.video_detail(&video_id);
        match catch_task_panic(fetch).await {
            Ok(result) => {
                let _ = tx
                    .send(AppEvent::VideoLoaded {
                        generation,
                        video_id,
                        result,
                    })
                    .await;
            }
            Err(error) => {
                let _ = tx
                    .send(AppEvent::TaskPanicked {
                        task: "video_detail",
                        error,
                    })
                    .await;
            }
        }
    }));
}

/// Spawn the channel summary and comments fetches in parallel.
///
/// Called by the event handler after the video detail lands. Both carry the
/// player generation of that detail; neither failure is terminal for the
/// player view.
pub(super) fn spawn_player_extras(
    client: &VideoApiClient,
    generation: u64,
    channel_id: String,
    video_id: String,
    comment_page_size: u32,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    let channel_client = client.clone();
    let channel_tx = event_tx.clone();
    tokio::spawn(async move {
        let channel =
            match catch_task_panic(channel_client.channel_detail(&channel_id)).await {
                Ok(channel) => channel,
                Err(error) => {
                    tracing::warn!(error = %error, "channel fetch task panicked");
                    None
                }
            };
        let _ = channel_tx
            .send(AppEvent::ChannelLoaded {
                generation,
                channel,
            })
            .await;
    });

    let comments_client = client.clone();
    let comments_tx = event_tx.clone();
    tokio::spawn(async move {
        match catch_task_panic(comments_client.video_comments(&video_id, comment_page_size)).await
        {
            Ok(result) => {
                let _ = comments_tx
                    .send(AppEvent::CommentsLoaded { generation, result })
                    .await;
            }
            Err(error) => {
                let _ = comments_tx
                    .send(AppEvent::TaskPanicked {
                        task: "comments",
                        error,
                    })
                    .await;
            }
        }
    });
}

/// Spawn the up-next rail fetch for `video_id`.
///
/// Selection policy: a usable video id drives a related lookup (which itself
/// falls back to the popular chart); without one the rail falls straight to
/// the popular chart, category-filtered when a category is active. The
/// current video is filtered out here so the rail never suggests what is
/// already playing.
pub(super) fn spawn_recommend_load(
    app: &mut App,
    video_id: String,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    let generation = app.begin_recommend_load();
    let client = app.client.clone();
    let page_size = app.feed_page_size;
    let category = match app.feed_source {
        FeedSource::Category(id) => id,
        _ => 0,
    };
    let tx = event_tx.clone();

    tokio::spawn(async move {
        let fetch = async {
            if video_id.trim().is_empty() {
                client.popular_videos(category, page_size).await
            } else {
                client.related_videos(&video_id, page_size).await
            }
        };
        match catch_task_panic(fetch).await {
            Ok(result) => {
                let result = result.map(|videos| prepare_recommendations(videos, &video_id));
                let _ = tx
                    .send(AppEvent::RecommendLoaded { generation, result })
                    .await;
            }
            Err(error) => {
                let _ = tx
                    .send(AppEvent::TaskPanicked {
                        task: "recommendations",
                        error,
                    })
                    .await;
            }
        }
    });
}

/// Drop the currently playing video from an up-next candidate list and cap
/// it at the rail length.
fn prepare_recommendations(mut videos: Vec<Video>, current_id: &str) -> Vec<Video> {
    videos.retain(|v| v.id != current_id);
    videos.truncate(MAX_RECOMMENDATIONS);
    videos
}
