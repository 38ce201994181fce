//! Terminal client for browsing a video platform: popular feeds by category,
//! search, video details with comments, recommendations, and locally
//! persisted subscriptions and watch history.

pub mod api;
pub mod app;
pub mod config;
pub mod storage;
pub mod store;
pub mod theme;
pub mod ui;
pub mod util;
