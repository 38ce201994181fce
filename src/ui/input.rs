//! Input handling for the TUI.
//!
//! This module processes keyboard input and dispatches to the appropriate
//! handler based on current view and mode.

use crate::api::Video;
use crate::app::{App, AppEvent, FeedSource, FeedState, Focus, PlayerState, View, CATEGORIES};
use crate::storage::Subscription;
use crate::util::MAX_SEARCH_QUERY_LENGTH;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::tasks::{spawn_feed_load, spawn_player_load, spawn_recommend_load};
use super::Action;

/// Main input dispatch function.
///
/// Routes input to the appropriate handler based on current mode and view.
pub(super) async fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    // Search mode captures all keys when active
    if app.search_mode {
        return Ok(handle_search_input(app, code, event_tx));
    }

    match app.view {
        View::Feed => handle_feed_input(app, code, modifiers, event_tx).await,
        View::Player => handle_player_input(app, code, modifiers, event_tx).await,
    }
}

// ============================================================================
// Search Mode
// ============================================================================

/// Handle input while the search prompt is open.
///
/// Esc cancels without touching the current grid. Enter with a non-blank
/// query stores it and spawns the search; a blank query just closes the
/// prompt, no request is made.
fn handle_search_input(app: &mut App, code: KeyCode, event_tx: &mpsc::Sender<AppEvent>) -> Action {
    match code {
        KeyCode::Esc => {
            app.search_mode = false;
            app.search_input.clear();
        }
        KeyCode::Enter => {
            app.search_mode = false;
            let query = app.search_input.trim().to_string();
            app.search_input.clear();
            if query.is_empty() {
                // Submitting an empty query clears an active search and
                // reverts to the selected category's chart.
                if matches!(app.feed_source, FeedSource::Search(_)) {
                    app.store.set_search_query("");
                    let category = CATEGORIES[app.selected_category];
                    app.feed_source = FeedSource::Category(category.id);
                    app.view = View::Feed;
                    app.focus = Focus::Videos;
                    spawn_feed_load(app, event_tx);
                }
                return Action::Continue;
            }
            app.store.set_search_query(query.clone());
            app.feed_source = FeedSource::Search(query);
            app.view = View::Feed;
            app.focus = Focus::Videos;
            spawn_feed_load(app, event_tx);
        }
        KeyCode::Backspace => {
            app.search_input.pop();
        }
        KeyCode::Char(c) => {
            if app.search_input.chars().count() < MAX_SEARCH_QUERY_LENGTH {
                app.search_input.push(c);
            }
        }
        _ => {}
    }
    Action::Continue
}

// ============================================================================
// Feed View
// ============================================================================

async fn handle_feed_input(
    app: &mut App,
    code: KeyCode,
    _modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    match code {
        KeyCode::Char('q') => {
            app.abort_tasks();
            return Ok(Action::Quit);
        }
        KeyCode::Char('/') => {
            app.search_mode = true;
            app.search_input = app.store.search_query().to_string();
        }
        KeyCode::Tab => {
            app.focus = match app.focus {
                Focus::Sidebar => Focus::Videos,
                Focus::Videos => Focus::Sidebar,
            };
        }
        KeyCode::Char('j') | KeyCode::Down => match app.focus {
            Focus::Sidebar => app.move_category_selection(1),
            Focus::Videos => app.move_video_selection(1),
        },
        KeyCode::Char('k') | KeyCode::Up => match app.focus {
            Focus::Sidebar => app.move_category_selection(-1),
            Focus::Videos => app.move_video_selection(-1),
        },
        KeyCode::Enter => match app.focus {
            Focus::Sidebar => {
                let category = CATEGORIES[app.selected_category];
                app.feed_source = FeedSource::Category(category.id);
                app.focus = Focus::Videos;
                spawn_feed_load(app, event_tx);
            }
            Focus::Videos => {
                if let Some(video) = app.current_video() {
                    let id = video.id.clone();
                    open_player(app, id, event_tx);
                }
            }
        },
        KeyCode::Char('t') => {
            toggle_theme(app).await;
        }
        KeyCode::Char('h') => {
            show_history(app);
        }
        KeyCode::Char('r') => {
            if matches!(app.feed, FeedState::Failed { .. }) {
                match app.feed_source {
                    FeedSource::History => show_history(app),
                    _ => spawn_feed_load(app, event_tx),
                }
            }
        }
        KeyCode::Char('s') => {
            if let Some(video) = app.current_video() {
                let subscription = Subscription {
                    channel_id: video.channel_id.clone(),
                    title: video.channel_title.clone(),
                    thumbnail_url: String::new(),
                };
                toggle_subscription(app, subscription).await;
            }
        }
        _ => {}
    }
    Ok(Action::Continue)
}

// ============================================================================
// Player View
// ============================================================================

async fn handle_player_input(
    app: &mut App,
    code: KeyCode,
    _modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => {
            // Back to the grid; orphan any in-flight player fetches.
            app.player_generation += 1;
            if let Some(handle) = app.player_handle.take() {
                handle.abort();
            }
            app.player = PlayerState::Idle;
            app.view = View::Feed;
            app.needs_redraw = true;
        }
        KeyCode::Char('/') => {
            app.search_mode = true;
            app.search_input = app.store.search_query().to_string();
        }
        KeyCode::Char('j') | KeyCode::Down => app.move_recommend_selection(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_recommend_selection(-1),
        KeyCode::Enter => {
            if let Some(video) = app.current_recommendation() {
                let id = video.id.clone();
                open_player(app, id, event_tx);
            }
        }
        KeyCode::Char('l') => {
            if let Some(data) = app.player_data_mut() {
                data.toggle_like();
                app.needs_redraw = true;
            }
        }
        KeyCode::Char('d') => {
            if let Some(data) = app.player_data_mut() {
                data.toggle_dislike();
                app.needs_redraw = true;
            }
        }
        KeyCode::Char('v') => {
            if let Some(data) = app.player_data_mut() {
                data.saved = !data.saved;
                let saved = data.saved;
                app.set_status(if saved { "Saved" } else { "Removed from saved" });
            }
        }
        KeyCode::Char('s') => {
            let subscription = app.player_data().map(|data| Subscription {
                channel_id: data.detail.channel_id.clone(),
                title: data
                    .channel
                    .as_ref()
                    .map(|c| c.title.clone())
                    .unwrap_or_else(|| data.detail.channel_title.clone()),
                thumbnail_url: data
                    .channel
                    .as_ref()
                    .map(|c| c.thumbnail_url.clone())
                    .unwrap_or_default(),
            });
            if let Some(subscription) = subscription {
                toggle_subscription(app, subscription).await;
            }
        }
        KeyCode::Char('o') => {
            if let Some(data) = app.player_data() {
                let url = data.detail.watch_url();
                if let Err(e) = open::that_detached(&url) {
                    tracing::warn!(error = %e, url = %url, "failed to open browser");
                    app.set_status("Could not open browser");
                } else {
                    app.set_status("Opened in browser");
                }
            }
        }
        KeyCode::Char('t') => {
            toggle_theme(app).await;
        }
        KeyCode::Char('r') => {
            if let PlayerState::Failed { video_id, .. } = &app.player {
                let id = video_id.clone();
                open_player(app, id, event_tx);
            }
        }
        KeyCode::PageDown | KeyCode::Char('J') => {
            if let Some(data) = app.player_data_mut() {
                data.scroll = data.scroll.saturating_add(5);
                app.needs_redraw = true;
            }
        }
        KeyCode::PageUp | KeyCode::Char('K') => {
            if let Some(data) = app.player_data_mut() {
                data.scroll = data.scroll.saturating_sub(5);
                app.needs_redraw = true;
            }
        }
        _ => {}
    }
    Ok(Action::Continue)
}

// ============================================================================
// Shared Helpers
// ============================================================================

/// Open the player on `video_id`: detail first, up-next in parallel.
fn open_player(app: &mut App, video_id: String, event_tx: &mpsc::Sender<AppEvent>) {
    app.view = View::Player;
    spawn_player_load(app, video_id.clone(), event_tx);
    spawn_recommend_load(app, video_id, event_tx);
}

/// Flip dark mode, persist it, and swap the palette.
async fn toggle_theme(app: &mut App) {
    match app.store.toggle_dark_mode(&app.db).await {
        Ok(dark) => {
            let variant = crate::theme::ThemeVariant::from_dark_mode(dark);
            app.set_theme(variant);
            app.set_status(format!("{} theme", variant.name()));
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to persist theme toggle");
            app.set_status("Warning: could not save theme");
        }
    }
}

/// Toggle a channel subscription and report the result in the status bar.
async fn toggle_subscription(app: &mut App, subscription: Subscription) {
    let title = subscription.title.clone();
    match app.store.toggle_subscription(&app.db, subscription).await {
        Ok(true) => app.set_status(format!("Subscribed to {title}")),
        Ok(false) => app.set_status(format!("Unsubscribed from {title}")),
        Err(e) => {
            tracing::warn!(error = %e, "failed to persist subscription toggle");
            app.set_status("Warning: could not save subscription");
        }
    }
}

/// Replace the grid with the locally persisted watch history.
///
/// No network fetch is involved; the generation still bumps so a slow feed
/// response from before the switch cannot overwrite the history view.
fn show_history(app: &mut App) {
    app.feed_source = FeedSource::History;
    app.begin_feed_load();
    let videos: Vec<Video> = app
        .store
        .watch_history()
        .iter()
        .map(|entry| Video {
            id: entry.video_id.clone(),
            title: entry.title.clone(),
            channel_title: entry.channel_title.clone(),
            channel_id: entry.channel_id.clone(),
            thumbnail_url: entry.thumbnail_url.clone(),
            published_at: Some(entry.watched_at),
            view_count: 0,
            duration: None,
        })
        .collect();
    app.feed = if videos.is_empty() {
        FeedState::Empty
    } else {
        FeedState::Loaded { videos }
    };
    app.focus = Focus::Videos;
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
        // Key handlers spawn fetches; keep them off the real API.
        .with_base_url("http://127.0.0.1:1");
        App::new(db, store, client, &crate::config::Config::default())
    }

    #[tokio::test]
    async fn test_search_input_length_cap() {
        let mut app = test_app().await;
        let (tx, _rx) = mpsc::channel(8);
        app.search_mode = true;
        for _ in 0..(MAX_SEARCH_QUERY_LENGTH + 10) {
            handle_search_input(&mut app, KeyCode::Char('a'), &tx);
        }
        assert_eq!(app.search_input.chars().count(), MAX_SEARCH_QUERY_LENGTH);
    }

    #[tokio::test]
    async fn test_search_esc_cancels() {
        let mut app = test_app().await;
        let (tx, _rx) = mpsc::channel(8);
        app.search_mode = true;
        handle_search_input(&mut app, KeyCode::Char('x'), &tx);
        handle_search_input(&mut app, KeyCode::Esc, &tx);
        assert!(!app.search_mode);
        assert!(app.search_input.is_empty());
        // Stored query untouched by a cancelled search.
        assert_eq!(app.store.search_query(), "");
    }

    #[tokio::test]
    async fn test_blank_search_submits_nothing() {
        let mut app = test_app().await;
        let (tx, _rx) = mpsc::channel(8);
        app.search_mode = true;
        handle_search_input(&mut app, KeyCode::Char(' '), &tx);
        let before = app.feed_generation;
        handle_search_input(&mut app, KeyCode::Enter, &tx);
        assert!(!app.search_mode);
        assert_eq!(app.feed_generation, before, "no fetch spawned");
        assert!(matches!(app.feed_source, FeedSource::Category(0)));
    }

    #[tokio::test]
    async fn test_clearing_search_reverts_to_category() {
        let mut app = test_app().await;
        let (tx, _rx) = mpsc::channel(8);
        app.store.set_search_query("rust");
        app.feed_source = FeedSource::Search("rust".to_string());
        app.selected_category = 1; // Gaming
        app.search_mode = true;

        let before = app.feed_generation;
        handle_search_input(&mut app, KeyCode::Enter, &tx);

        assert!(matches!(app.feed_source, FeedSource::Category(20)));
        assert_eq!(app.store.search_query(), "");
        assert!(app.feed_generation > before, "category fetch spawned");
    }

    #[tokio::test]
    async fn test_history_view_assembled_locally() {
        let mut app = test_app().await;
        let entry = crate::storage::WatchHistoryEntry {
            video_id: "v1".to_string(),
            title: "Watched".to_string(),
            thumbnail_url: String::new(),
            channel_title: "C".to_string(),
            channel_id: "c1".to_string(),
            watched_at: chrono::Utc::now(),
        };
        let db = Database::open(":memory:").await.unwrap();
        app.store.add_to_history(&db, entry).await.unwrap();

        show_history(&mut app);
        assert!(matches!(app.feed_source, FeedSource::History));
        assert_eq!(app.feed.videos().len(), 1);
        assert_eq!(app.feed.videos()[0].id, "v1");
    }

    #[tokio::test]
    async fn test_empty_history_shows_empty_state() {
        let mut app = test_app().await;
        show_history(&mut app);
        assert!(matches!(app.feed, FeedState::Empty));
    }
}
