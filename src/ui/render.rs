//! Render functions for the TUI.
//!
//! This module handles all rendering logic, dispatching to the appropriate
//! view based on application state.

use crate::app::{App, View};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    widgets::Paragraph,
    Frame,
};

use super::{feed, player, recommend, sidebar, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 60;
pub(super) const MIN_HEIGHT: u16 = 10;

/// Sidebar width in the feed view.
const SIDEBAR_WIDTH: u16 = 26;

/// Up-next rail width in the player view.
const RAIL_WIDTH: u16 = 36;

/// Main render dispatch function.
///
/// Routes to the appropriate view renderer based on current application
/// state. Handles terminal size validation before rendering.
pub(super) fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();

    // Guard against zero-width/height to prevent panics
    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    match app.view {
        View::Feed => render_feed_view(f, app),
        View::Player => render_player_view(f, app),
    }
}

/// Feed view: sidebar on the left, video grid on the right, status bar below.
fn render_feed_view(f: &mut Frame, app: &mut App) {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(f.area());

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(1)])
        .split(vertical[0]);

    sidebar::render(f, app, horizontal[0]);
    feed::render(f, app, horizontal[1]);
    status::render(f, app, vertical[1]);
}

/// Player view: video detail on the left, up-next rail on the right.
fn render_player_view(f: &mut Frame, app: &mut App) {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(f.area());

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(RAIL_WIDTH)])
        .split(vertical[0]);

    player::render(f, app, horizontal[0]);
    recommend::render(f, app, horizontal[1]);
    status::render(f, app, vertical[1]);
}
