//! Cross-view application state with durable persistence.
//!
//! The store is the single source of truth for theme preference, the active
//! search query, subscribed channels and watch history. Each slice is loaded
//! from the database once at startup and written back (JSON-encoded) after
//! every mutation. Views read through the store; nothing else writes to the
//! `app_state` table.
use anyhow::Result;
use chrono::Utc;

use crate::storage::{Database, Subscription, WatchHistoryEntry};

/// Watch history keeps the 50 most recent videos, most-recent-first.
pub const HISTORY_CAP: usize = 50;

const KEY_DARK_MODE: &str = "dark_mode";
const KEY_SUBSCRIPTIONS: &str = "subscriptions";
const KEY_WATCH_HISTORY: &str = "watch_history";

// ============================================================================
// StateStore
// ============================================================================

/// In-memory image of the persisted state slices plus the transient search
/// query. Mutations persist their slice before returning, so a crash never
/// loses an acknowledged change.
pub struct StateStore {
    dark_mode: bool,
    search_query: String,
    subscriptions: Vec<Subscription>,
    watch_history: Vec<WatchHistoryEntry>,
}

impl StateStore {
    /// Load every slice from the database, defaulting each independently when
    /// absent or malformed. A corrupt slice is logged and reset rather than
    /// failing startup.
    pub async fn load(db: &Database) -> Result<Self> {
        Self::load_with_defaults(db, false).await
    }

    /// Like [`load`], but with the dark-mode default supplied by the caller
    /// (the config file's `theme` setting). A persisted preference always
    /// wins over the default.
    ///
    /// [`load`]: StateStore::load
    pub async fn load_with_defaults(db: &Database, default_dark: bool) -> Result<Self> {
        let dark_mode = load_slice(db, KEY_DARK_MODE).await?.unwrap_or(default_dark);
        let subscriptions = load_slice(db, KEY_SUBSCRIPTIONS).await?.unwrap_or_default();
        let watch_history: Vec<WatchHistoryEntry> =
            load_slice(db, KEY_WATCH_HISTORY).await?.unwrap_or_default();

        Ok(Self {
            dark_mode,
            search_query: String::new(),
            subscriptions,
            watch_history,
        })
    }

    // ========================================================================
    // Theme
    // ========================================================================

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    /// Flip the dark-mode flag, persist it, and return the new value so the
    /// presentation layer can swap palettes.
    pub async fn toggle_dark_mode(&mut self, db: &Database) -> Result<bool> {
        self.dark_mode = !self.dark_mode;
        persist_slice(db, KEY_DARK_MODE, &self.dark_mode).await?;
        Ok(self.dark_mode)
    }

    // ========================================================================
    // Search Query
    // ========================================================================

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Replace the active search query. In-memory only; the query was never a
    /// persisted slice.
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    // ========================================================================
    // Watch History
    // ========================================================================

    pub fn watch_history(&self) -> &[WatchHistoryEntry] {
        &self.watch_history
    }

    /// Record a watched video: any existing entry with the same video id is
    /// removed, the new entry is prepended with a fresh timestamp, and the
    /// list is truncated to [`HISTORY_CAP`]. Re-watching a video therefore
    /// always moves it to the front.
    pub async fn add_to_history(
        &mut self,
        db: &Database,
        mut entry: WatchHistoryEntry,
    ) -> Result<()> {
        entry.watched_at = Utc::now();
        self.watch_history.retain(|e| e.video_id != entry.video_id);
        self.watch_history.insert(0, entry);
        self.watch_history.truncate(HISTORY_CAP);
        persist_slice(db, KEY_WATCH_HISTORY, &self.watch_history).await?;
        Ok(())
    }

    // ========================================================================
    // Subscriptions
    // ========================================================================

    pub fn subscriptions(&self) -> &[Subscription] {
        &self.subscriptions
    }

    /// Pure membership query, no side effect.
    pub fn is_subscribed(&self, channel_id: &str) -> bool {
        self.subscriptions.iter().any(|s| s.channel_id == channel_id)
    }

    /// Toggle a subscription: present removes it, absent appends it.
    /// Returns `true` when the channel is subscribed after the call.
    pub async fn toggle_subscription(
        &mut self,
        db: &Database,
        subscription: Subscription,
    ) -> Result<bool> {
        let subscribed = if self.is_subscribed(&subscription.channel_id) {
            self.subscriptions
                .retain(|s| s.channel_id != subscription.channel_id);
            false
        } else {
            self.subscriptions.push(subscription);
            true
        };
        persist_slice(db, KEY_SUBSCRIPTIONS, &self.subscriptions).await?;
        Ok(subscribed)
    }
}

// ============================================================================
// Persistence Helpers
// ============================================================================

/// Read and decode one slice. Malformed JSON degrades to `None` (the caller's
/// default) after a warning — stale state is never worth refusing to start.
async fn load_slice<T: serde::de::DeserializeOwned>(
    db: &Database,
    key: &str,
) -> Result<Option<T>> {
    let Some(raw) = db.get_state(key).await? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "Malformed persisted state, using default");
            Ok(None)
        }
    }
}

async fn persist_slice<T: serde::Serialize>(db: &Database, key: &str, value: &T) -> Result<()> {
    let encoded = serde_json::to_string(value)?;
    db.set_state(key, &encoded).await
}

// ============================================================================
// Tests
// ============================================================================
