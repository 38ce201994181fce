//! Terminal User Interface module.
//!
//! This module provides the TUI for the video browser, including:
//! - Main event loop (`run`)
//! - Input handling for feed, player, and search modes
//! - Rendering for the sidebar, video grid, player, and up-next rail
//! - Background task event processing
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background task event processing
//! - `tasks` - Background fetch task spawning
//! - `render` - View rendering dispatch
//! - `sidebar` - Category/subscription sidebar widget
//! - `feed` - Video grid widget
//! - `player` - Video detail and comments widget
//! - `recommend` - Up-next rail widget
//! - `status` - Status bar widget

mod events;
mod feed;
mod input;
mod loop_runner;
mod player;
mod recommend;
mod render;
mod sidebar;
mod status;
mod tasks;

// Re-export the public API
pub use loop_runner::{run, Action};
