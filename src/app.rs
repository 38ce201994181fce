use crate::api::{ApiError, ChannelSummary, Comment, Video, VideoApiClient, VideoDetail};
use crate::config::Config;
use crate::storage::Database;
use crate::store::StateStore;
use crate::theme::{ColorPalette, ThemeVariant};
use std::borrow::Cow;
use tokio::time::Instant;

/// Maximum number of videos shown in the up-next recommendation rail.
pub const MAX_RECOMMENDATIONS: usize = 12;

/// How long a status message stays visible before expiring.
pub const STATUS_TTL_SECS: u64 = 4;

// ============================================================================
// Categories
// ============================================================================

/// A browsable video category in the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub name: &'static str,
    /// Platform category ID. Zero means the unfiltered popular chart.
    pub id: u32,
}

/// Fixed category list shown in the sidebar, in display order.
pub const CATEGORIES: &[Category] = &[
    Category { name: "Home", id: 0 },
    Category { name: "Gaming", id: 20 },
    Category { name: "Automobiles", id: 2 },
    Category { name: "Sport", id: 17 },
    Category { name: "Entertainment", id: 24 },
    Category { name: "Tech", id: 28 },
    Category { name: "Music", id: 10 },
    Category { name: "Blogs", id: 22 },
    Category { name: "News", id: 25 },
];

// ============================================================================
// View and Focus Enums
// ============================================================================

/// Current view mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Feed,   // Sidebar + video grid
    Player, // Full-screen video detail with up-next rail
}

/// Which panel has focus in Feed view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Sidebar,
    Videos,
}

// ============================================================================
// Feed State
// ============================================================================

/// What the video grid is currently showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    /// Popular chart, optionally filtered to a category (0 = unfiltered).
    Category(u32),
    /// Results of a text search.
    Search(String),
    /// Locally persisted watch history.
    History,
}

/// Loading lifecycle of the video grid.
///
/// Every fetch moves through Loading and ends in exactly one of the
/// other three states. History is assembled locally and goes straight
/// to Loaded or Empty.
pub enum FeedState {
    Loading,
    Failed { message: String },
    Empty,
    Loaded { videos: Vec<Video> },
}

impl FeedState {
    /// Videos currently displayable, empty for non-Loaded states.
    pub fn videos(&self) -> &[Video] {
        match self {
            FeedState::Loaded { videos } => videos,
            _ => &[],
        }
    }
}

// ============================================================================
// Player State
// ============================================================================

/// Comments pane lifecycle inside the player.
pub enum CommentsState {
    Loading,
    Unavailable,
    Loaded(Vec<Comment>),
}

/// Everything the player view renders once the core detail has arrived.
///
/// Channel and comments load after the detail and may be absent; their
/// absence degrades the view without failing it.
pub struct PlayerData {
    pub detail: VideoDetail,
    pub channel: Option<ChannelSummary>,
    pub channel_failed: bool,
    pub comments: CommentsState,
    /// Local-only reaction toggles, reset on every video open.
    pub liked: bool,
    pub disliked: bool,
    pub saved: bool,
    pub scroll: usize,
}

impl PlayerData {
    pub fn new(detail: VideoDetail) -> Self {
        Self {
            detail,
            channel: None,
            channel_failed: false,
            comments: CommentsState::Loading,
            liked: false,
            disliked: false,
            saved: false,
            scroll: 0,
        }
    }

    /// Toggle like; mutually exclusive with dislike.
    pub fn toggle_like(&mut self) {
        self.liked = !self.liked;
        if self.liked {
            self.disliked = false;
        }
    }

    /// Toggle dislike; mutually exclusive with like.
    pub fn toggle_dislike(&mut self) {
        self.disliked = !self.disliked;
        if self.disliked {
            self.liked = false;
        }
    }
}

/// Player view lifecycle.
pub enum PlayerState {
    Idle,
    Loading { video_id: String },
    Failed { video_id: String, message: String },
    Ready(Box<PlayerData>),
}

// ============================================================================
// Recommendation State
// ============================================================================

/// Up-next rail lifecycle.
pub enum RecommendState {
    Loading,
    Failed,
    Loaded(Vec<Video>),
}

impl RecommendState {
    pub fn videos(&self) -> &[Video] {
        match self {
            RecommendState::Loaded(videos) => videos,
            _ => &[],
        }
    }
}

// ============================================================================
// Events
// ============================================================================

/// Events from background tasks.
///
/// Every fetch event carries the generation counter captured when its task
/// was spawned. Handlers drop events whose generation no longer matches the
/// current counter, so a stale response can never overwrite a newer request.
pub enum AppEvent {
    /// Video grid fetch finished (popular chart or search).
    FeedLoaded {
        generation: u64,
        result: Result<Vec<Video>, ApiError>,
    },
    /// Core video detail fetch finished.
    VideoLoaded {
        generation: u64,
        video_id: String,
        result: Result<Option<VideoDetail>, ApiError>,
    },
    /// Channel summary fetch finished. None means lookup failed or the
    /// channel is missing; the player degrades rather than erroring.
    ChannelLoaded {
        generation: u64,
        channel: Option<ChannelSummary>,
    },
    /// Comment thread fetch finished.
    CommentsLoaded {
        generation: u64,
        result: Result<Vec<Comment>, ApiError>,
    },
    /// Up-next rail fetch finished.
    RecommendLoaded {
        generation: u64,
        result: Result<Vec<Video>, ApiError>,
    },
    /// A persisted-state write failed. The in-memory store already holds the
    /// new value; this only surfaces the durability problem.
    StateSaveFailed { error: String },
    /// A background task panicked.
    TaskPanicked { task: &'static str, error: String },
}

// ============================================================================
// Application State
// ============================================================================

/// Central application state
pub struct App {
    pub db: Database,
    pub store: StateStore,
    pub client: VideoApiClient,

    /// Videos requested per grid fetch, from config.
    pub feed_page_size: u32,
    /// Comments requested per video, from config.
    pub comment_page_size: u32,

    // Theme
    pub theme_variant: ThemeVariant,
    pub palette: ColorPalette,

    // UI state
    pub view: View,
    pub focus: Focus,
    pub selected_category: usize,
    pub feed_source: FeedSource,
    pub feed: FeedState,
    pub selected_video: usize,
    pub player: PlayerState,
    pub recommend: RecommendState,
    pub recommend_selected: usize,

    // Search input
    pub search_mode: bool,
    pub search_input: String,

    // Status message with expiry — Cow avoids allocation for static literals
    pub status_message: Option<(Cow<'static, str>, Instant)>,

    /// Dirty flag to skip unnecessary frame renders
    pub needs_redraw: bool,

    /// Current frame of the loading spinner animation (0-9).
    pub spinner_frame: usize,

    /// Generation counter for feed loads.
    ///
    /// Incremented each time a grid fetch is spawned. FeedLoaded events with
    /// a mismatched generation are dropped, so switching category mid-fetch
    /// cannot paint the old category's videos.
    pub feed_generation: u64,

    /// Generation counter for player loads (detail, channel, comments).
    ///
    /// All three player fetches for one video share the generation captured
    /// when the video was opened. Opening another video bumps it, orphaning
    /// every in-flight response for the previous one.
    pub player_generation: u64,

    /// Generation counter for the up-next rail.
    pub recommend_generation: u64,

    /// Handle to the current feed load task for cancellation.
    pub feed_handle: Option<tokio::task::JoinHandle<()>>,

    /// Handle to the current video detail task for cancellation.
    pub player_handle: Option<tokio::task::JoinHandle<()>>,
}

impl App {
    pub fn new(db: Database, store: StateStore, client: VideoApiClient, config: &Config) -> Self {
        let theme_variant = ThemeVariant::from_dark_mode(store.dark_mode());
        let palette = theme_variant.palette();
        Self {
            db,
            store,
            client,
            feed_page_size: config.feed_page_size,
            comment_page_size: config.comment_page_size,
            theme_variant,
            palette,
            view: View::Feed,
            focus: Focus::Videos,
            selected_category: 0,
            feed_source: FeedSource::Category(0),
            feed: FeedState::Loading,
            selected_video: 0,
            player: PlayerState::Idle,
            recommend: RecommendState::Loading,
            recommend_selected: 0,
            search_mode: false,
            search_input: String::new(),
            status_message: None,
            needs_redraw: true,
            spinner_frame: 0,
            feed_generation: 0,
            player_generation: 0,
            recommend_generation: 0,
            feed_handle: None,
            player_handle: None,
        }
    }

    // ------------------------------------------------------------------
    // Theme
    // ------------------------------------------------------------------

    /// Switch to a different theme variant at runtime.
    pub fn set_theme(&mut self, variant: ThemeVariant) {
        self.theme_variant = variant;
        self.palette = variant.palette();
        self.needs_redraw = true;
    }

    // ------------------------------------------------------------------
    // Status messages
    // ------------------------------------------------------------------

    /// Set a status message with the standard expiry.
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
        self.needs_redraw = true;
    }

    /// Drop the status message once it has aged out. Called from the tick
    /// handler; returns true if the message was cleared.
    pub fn expire_status(&mut self) -> bool {
        if let Some((_, set_at)) = &self.status_message {
            if set_at.elapsed().as_secs() >= STATUS_TTL_SECS {
                self.status_message = None;
                self.needs_redraw = true;
                return true;
            }
        }
        false
    }

    // ------------------------------------------------------------------
    // Generations
    // ------------------------------------------------------------------

    /// Start a new feed load: bump the generation and abort any in-flight
    /// fetch so its response cannot land.
    pub fn begin_feed_load(&mut self) -> u64 {
        self.feed_generation += 1;
        if let Some(handle) = self.feed_handle.take() {
            handle.abort();
        }
        self.feed = FeedState::Loading;
        self.selected_video = 0;
        self.needs_redraw = true;
        self.feed_generation
    }

    /// Start a new player load for `video_id`. The returned generation is
    /// shared by the detail, channel, and comments tasks.
    pub fn begin_player_load(&mut self, video_id: String) -> u64 {
        self.player_generation += 1;
        if let Some(handle) = self.player_handle.take() {
            handle.abort();
        }
        self.player = PlayerState::Loading { video_id };
        self.needs_redraw = true;
        self.player_generation
    }

    /// Start a new up-next load.
    pub fn begin_recommend_load(&mut self) -> u64 {
        self.recommend_generation += 1;
        self.recommend = RecommendState::Loading;
        self.recommend_selected = 0;
        self.needs_redraw = true;
        self.recommend_generation
    }

    // ------------------------------------------------------------------
    // Selection helpers
    // ------------------------------------------------------------------

    /// Move the grid selection by `delta`, clamped to the loaded list.
    pub fn move_video_selection(&mut self, delta: isize) {
        let len = self.feed.videos().len();
        if len == 0 {
            return;
        }
        let new = clamp_index(self.selected_video, delta, len);
        if new != self.selected_video {
            self.selected_video = new;
            self.needs_redraw = true;
        }
    }

    /// Move the up-next selection by `delta`, clamped to the rail.
    pub fn move_recommend_selection(&mut self, delta: isize) {
        let len = self.recommend.videos().len();
        if len == 0 {
            return;
        }
        let new = clamp_index(self.recommend_selected, delta, len);
        if new != self.recommend_selected {
            self.recommend_selected = new;
            self.needs_redraw = true;
        }
    }

    /// Move the sidebar category selection by `delta`.
    pub fn move_category_selection(&mut self, delta: isize) {
        let new = clamp_index(self.selected_category, delta, CATEGORIES.len());
        if new != self.selected_category {
            self.selected_category = new;
            self.needs_redraw = true;
        }
    }

    /// Currently highlighted video in the grid, if any.
    pub fn current_video(&self) -> Option<&Video> {
        self.feed.videos().get(self.selected_video)
    }

    /// Currently highlighted video in the up-next rail, if any.
    pub fn current_recommendation(&self) -> Option<&Video> {
        self.recommend.videos().get(self.recommend_selected)
    }

    /// The video currently open in the player, if ready.
    pub fn player_data(&self) -> Option<&PlayerData> {
        match &self.player {
            PlayerState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn player_data_mut(&mut self) -> Option<&mut PlayerData> {
        match &mut self.player {
            PlayerState::Ready(data) => Some(data),
            _ => None,
        }
    }

    /// Abort all in-flight background tasks (quit path).
    pub fn abort_tasks(&mut self) {
        if let Some(handle) = self.feed_handle.take() {
            handle.abort();
        }
        if let Some(handle) = self.player_handle.take() {
            handle.abort();
        }
    }
}

fn clamp_index(current: usize, delta: isize, len: usize) -> usize {
    debug_assert!(len > 0);
    let moved = current as isize + delta;
    moved.clamp(0, len as isize - 1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Video;

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

    #[test]
    fn test_categories_table() {
        assert_eq!(CATEGORIES.len(), 9);
        assert_eq!(CATEGORIES[0], Category { name: "Home", id: 0 });
        let gaming = CATEGORIES.iter().find(|c| c.name == "Gaming").unwrap();
        assert_eq!(gaming.id, 20);
        let music = CATEGORIES.iter().find(|c| c.name == "Music").unwrap();
        assert_eq!(music.id, 10);
    }

    #[test]
    fn test_feed_state_videos() {
        assert!(FeedState::Loading.videos().is_empty());
        assert!(FeedState::Empty.videos().is_empty());
        let loaded = FeedState::Loaded {
            videos: vec![video("a"), video("b")],
        };
        assert_eq!(loaded.videos().len(), 2);
    }

    #[test]
    fn test_clamp_index() {
        assert_eq!(clamp_index(0, -1, 5), 0);
        assert_eq!(clamp_index(4, 1, 5), 4);
        assert_eq!(clamp_index(2, 1, 5), 3);
        assert_eq!(clamp_index(2, -2, 5), 0);
    }

    #[test]
    fn test_like_dislike_mutually_exclusive() {
        let detail = crate::api::VideoDetail {
            id: "v1".to_string(),
            title: "T".to_string(),
            channel_title: "C".to_string(),
            channel_id: "c1".to_string(),
            thumbnail_url: String::new(),
            published_at: None,
            view_count: 0,
            duration: None,
            description: String::new(),
            like_count: 0,
            comment_count: 0,
        };
        let mut data = PlayerData::new(detail);
        data.toggle_like();
        assert!(data.liked && !data.disliked);
        data.toggle_dislike();
        assert!(!data.liked && data.disliked);
        data.toggle_dislike();
        assert!(!data.liked && !data.disliked);
    }

    async fn test_app() -> App {
        let db = crate::storage::Database::open(":memory:").await.unwrap();
        let store = StateStore::load(&db).await.unwrap();
        let client = VideoApiClient::new(
            reqwest::Client::new(),
            secrecy::SecretString::from("test-key"),
            "US",
        )
        .with_base_url("http://127.0.0.1:1");
        App::new(db, store, client, &Config::default())
    }

    #[tokio::test]
    async fn test_generation_bump_on_loads() {
        let mut app = test_app().await;
        assert_eq!(app.begin_feed_load(), 1);
        assert_eq!(app.begin_feed_load(), 2);
        assert!(matches!(app.feed, FeedState::Loading));
        assert_eq!(app.begin_player_load("v1".to_string()), 1);
        assert_eq!(app.begin_recommend_load(), 1);
        // A bump orphans the previous generation.
        let stale = app.player_generation;
        assert_eq!(app.begin_player_load("v2".to_string()), stale + 1);
    }

    #[tokio::test]
    async fn test_theme_follows_store_dark_mode() {
        let app = test_app().await;
        // Fresh store defaults to light mode; the variant must agree.
        assert_eq!(
            app.theme_variant,
            ThemeVariant::from_dark_mode(app.store.dark_mode())
        );
    }
}
