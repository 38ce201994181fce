//! Application event handling.
//!
//! Processes background task completion events: feed loads, video detail,
//! channel and comment fetches, recommendations, and persistence failures.
//! Every fetch event carries the generation captured at spawn time; events
//! whose generation no longer matches the live counter are dropped.

use crate::api::{ApiError, ChannelSummary, Comment, Video, VideoDetail};
use crate::app::{App, AppEvent, CommentsState, FeedState, PlayerData, PlayerState, RecommendState};
use crate::storage::WatchHistoryEntry;
use chrono::Utc;
use tokio::sync::mpsc;

use super::tasks::spawn_player_extras;

/// Handle application events from background tasks.
pub(super) async fn handle_app_event(
    app: &mut App,
    event: AppEvent,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    match event {
        AppEvent::FeedLoaded { generation, result } => {
            handle_feed_loaded(app, generation, result);
        }
        AppEvent::VideoLoaded {
            generation,
            video_id,
            result,
        } => {
            handle_video_loaded(app, generation, video_id, result, event_tx).await;
        }
        AppEvent::ChannelLoaded {
            generation,
            channel,
        } => {
            handle_channel_loaded(app, generation, channel);
        }
        AppEvent::CommentsLoaded { generation, result } => {
            handle_comments_loaded(app, generation, result);
        }
        AppEvent::RecommendLoaded { generation, result } => {
            handle_recommend_loaded(app, generation, result);
        }
        AppEvent::StateSaveFailed { error } => {
            tracing::warn!(error = %error, "state persistence failed");
            app.set_status("Warning: could not save state");
        }
        AppEvent::TaskPanicked { task, error } => {
            tracing::error!(task, error = %error, "background task panicked");
            app.set_status(format!("Internal error in {task}"));
        }
    }
}

fn handle_feed_loaded(app: &mut App, generation: u64, result: Result<Vec<Video>, ApiError>) {
    if generation != app.feed_generation {
        tracing::debug!(
            generation,
            current = app.feed_generation,
            "dropping stale feed result"
        );
        return;
    }

    app.feed = match result {
        Ok(videos) if videos.is_empty() => FeedState::Empty,
        Ok(videos) => FeedState::Loaded { videos },
        Err(e) => FeedState::Failed {
            message: e.to_string(),
        },
    };
    app.selected_video = 0;
}

/// Video detail arrived. On success the player becomes Ready, the watch is
/// recorded in history, and the channel/comment fetches start. History write
/// failure degrades to a status warning; the player still opens.
async fn handle_video_loaded(
    app: &mut App,
    generation: u64,
    video_id: String,
    result: Result<Option<VideoDetail>, ApiError>,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    if generation != app.player_generation {
        tracing::debug!(
            video_id = %video_id,
            generation,
            current = app.player_generation,
            "dropping stale video detail"
        );
        return;
    }

    let detail = match result {
        Ok(Some(detail)) => detail,
        Ok(None) => {
            app.player = PlayerState::Failed {
                video_id,
                message: ApiError::NotFound.to_string(),
            };
            return;
        }
        Err(e) => {
            app.player = PlayerState::Failed {
                video_id,
                message: e.to_string(),
            };
            return;
        }
    };

    let entry = WatchHistoryEntry {
        video_id: detail.id.clone(),
        title: detail.title.clone(),
        thumbnail_url: detail.thumbnail_url.clone(),
        channel_title: detail.channel_title.clone(),
        channel_id: detail.channel_id.clone(),
        watched_at: Utc::now(),
    };
    if let Err(e) = app.store.add_to_history(&app.db, entry).await {
        tracing::warn!(error = %e, video_id = %detail.id, "failed to record watch history");
        app.set_status("Warning: could not save watch history");
    }

    spawn_player_extras(
        &app.client,
        generation,
        detail.channel_id.clone(),
        detail.id.clone(),
        app.comment_page_size,
        event_tx,
    );

    app.player = PlayerState::Ready(Box::new(PlayerData::new(detail)));
}

fn handle_channel_loaded(app: &mut App, generation: u64, channel: Option<ChannelSummary>) {
    if generation != app.player_generation {
        return;
    }
    if let Some(data) = app.player_data_mut() {
        data.channel_failed = channel.is_none();
        data.channel = channel;
    }
}

fn handle_comments_loaded(
    app: &mut App,
    generation: u64,
    result: Result<Vec<Comment>, ApiError>,
) {
    if generation != app.player_generation {
        return;
    }
    if let Some(data) = app.player_data_mut() {
        data.comments = match result {
            Ok(comments) => CommentsState::Loaded(comments),
            Err(e) => {
                tracing::warn!(error = %e, "comments fetch failed");
                CommentsState::Unavailable
            }
        };
    }
}

fn handle_recommend_loaded(app: &mut App, generation: u64, result: Result<Vec<Video>, ApiError>) {
    if generation != app.recommend_generation {
        return;
    }
    app.recommend = match result {
        Ok(videos) => RecommendState::Loaded(videos),
        Err(e) => {
            tracing::warn!(error = %e, "recommendations fetch failed");
            RecommendState::Failed
        }
    };
    app.recommend_selected = 0;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::VideoApiClient;
    use crate::storage::Database;
    use crate::store::StateStore;
    use secrecy::SecretString;

    async fn test_app() -> App {
        let db = Database::open(":memory:").await.unwrap();
        let store = StateStore::load(&db).await.unwrap();
        let client = VideoApiClient::new(
            reqwest::Client::new(),
            SecretString::from("test-key"),
            "US",
        )
        // Spawned extras must never reach the real API from the test suite.
        .with_base_url("http://127.0.0.1:1");
        App::new(db, store, client, &crate::config::Config::default())
    }

    fn video(id: &str) -> Video {
        Video {
            id: id.to_string(),
            title: format!("Video {id}"),
            channel_title: "Channel".to_string(),
            channel_id: "c1".to_string(),
            thumbnail_url: String::new(),
            published_at: None,
            view_count: 0,
            duration: None,
        }
    }

    fn detail(id: &str) -> VideoDetail {
        VideoDetail {
            id: id.to_string(),
            title: format!("Video {id}"),
            channel_title: "Channel".to_string(),
            channel_id: "c1".to_string(),
            thumbnail_url: String::new(),
            published_at: None,
            view_count: 100,
            duration: Some("PT1M".to_string()),
            description: String::new(),
            like_count: 1,
            comment_count: 1,
        }
    }

    #[tokio::test]
    async fn test_stale_feed_result_dropped() {
        let mut app = test_app().await;
        let stale = app.begin_feed_load();
        let current = app.begin_feed_load();

        handle_feed_loaded(&mut app, stale, Ok(vec![video("old")]));
        assert!(matches!(app.feed, FeedState::Loading));

        handle_feed_loaded(&mut app, current, Ok(vec![video("new")]));
        assert_eq!(app.feed.videos()[0].id, "new");
    }

    #[tokio::test]
    async fn test_empty_feed_maps_to_empty_state() {
        let mut app = test_app().await;
        let generation = app.begin_feed_load();
        handle_feed_loaded(&mut app, generation, Ok(vec![]));
        assert!(matches!(app.feed, FeedState::Empty));
    }

    #[tokio::test]
    async fn test_feed_error_maps_to_failed_state() {
        let mut app = test_app().await;
        let generation = app.begin_feed_load();
        handle_feed_loaded(&mut app, generation, Err(ApiError::QuotaExceeded));
        match &app.feed {
            FeedState::Failed { message } => {
                assert!(message.contains("quota"));
            }
            _ => panic!("expected Failed state"),
        }
    }

    #[tokio::test]
    async fn test_video_loaded_records_history_and_opens_player() {
        let mut app = test_app().await;
        let (tx, _rx) = mpsc::channel(8);
        let generation = app.begin_player_load("v1".to_string());

        handle_video_loaded(&mut app, generation, "v1".to_string(), Ok(Some(detail("v1"))), &tx)
            .await;

        assert!(app.player_data().is_some());
        assert_eq!(app.store.watch_history()[0].video_id, "v1");
    }

    #[tokio::test]
    async fn test_missing_video_fails_player() {
        let mut app = test_app().await;
        let (tx, _rx) = mpsc::channel(8);
        let generation = app.begin_player_load("gone".to_string());

        handle_video_loaded(&mut app, generation, "gone".to_string(), Ok(None), &tx).await;

        match &app.player {
            PlayerState::Failed { message, .. } => assert!(message.contains("not found")),
            _ => panic!("expected Failed player state"),
        }
        assert!(app.store.watch_history().is_empty());
    }

    #[tokio::test]
    async fn test_channel_failure_degrades_not_fails() {
        let mut app = test_app().await;
        let (tx, _rx) = mpsc::channel(8);
        let generation = app.begin_player_load("v1".to_string());
        handle_video_loaded(&mut app, generation, "v1".to_string(), Ok(Some(detail("v1"))), &tx)
            .await;

        handle_channel_loaded(&mut app, generation, None);

        let data = app.player_data().unwrap();
        assert!(data.channel.is_none());
        assert!(data.channel_failed);
    }

    #[tokio::test]
    async fn test_stale_recommend_result_dropped() {
        let mut app = test_app().await;
        let generation = app.begin_recommend_load();
        handle_recommend_loaded(&mut app, generation, Ok(vec![video("a"), video("b")]));
        assert_eq!(app.recommend.videos().len(), 2);

        // Stale generation leaves state untouched.
        handle_recommend_loaded(&mut app, generation.wrapping_sub(1), Ok(vec![video("z")]));
        assert_eq!(app.recommend.videos().len(), 2);
    }
}
