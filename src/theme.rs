//! Theme system for the TUI.
//!
//! Provides semantic color roles that map to ratatui `Style` values. The
//! `ThemeVariant` enum selects between Dark and Light palettes; the variant
//! follows the store's persisted dark-mode flag.

use ratatui::style::{Color, Modifier, Style};

// ============================================================================
// Theme Variant
// ============================================================================

/// Available theme variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeVariant {
    Dark,
    Light,
}

impl ThemeVariant {
    /// Variant for a persisted dark-mode flag.
    pub fn from_dark_mode(dark: bool) -> Self {
        if dark {
            Self::Dark
        } else {
            Self::Light
        }
    }

    /// Parse a variant name from the config file (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    /// Build the `ColorPalette` for this variant.
    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    /// Human-readable name for status display.
    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

// ============================================================================
// Color Palette — semantic roles to Style
// ============================================================================

/// A complete color palette mapping every semantic UI role to a `Style`.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Sidebar --
    pub sidebar_category: Style,
    pub sidebar_active: Style,
    pub sidebar_selected: Style,
    pub sidebar_section: Style,
    pub sidebar_muted: Style,

    // -- Video grid / up-next list --
    pub video_title: Style,
    pub video_selected: Style,
    pub video_channel: Style,
    pub video_stats: Style,
    pub video_duration: Style,

    // -- Player --
    pub player_title: Style,
    pub player_metadata: Style,
    pub player_description: Style,
    pub player_action_active: Style,
    pub player_subscribed: Style,
    pub player_error: Style,
    pub player_degraded: Style,

    // -- Comments --
    pub comment_author: Style,
    pub comment_body: Style,
    pub comment_meta: Style,

    // -- Chrome --
    pub status_bar: Style,
    pub panel_border: Style,
    pub panel_border_focused: Style,
    pub search_input: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            sidebar_category: Style::default(),
            sidebar_active: Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
            sidebar_selected: Style::default().bg(Color::DarkGray).fg(Color::White),
            sidebar_section: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            sidebar_muted: Style::default().fg(Color::DarkGray),

            video_title: Style::default().add_modifier(Modifier::BOLD),
            video_selected: Style::default().bg(Color::DarkGray).fg(Color::White),
            video_channel: Style::default().fg(Color::Cyan),
            video_stats: Style::default().fg(Color::DarkGray),
            video_duration: Style::default().fg(Color::Yellow),

            player_title: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            player_metadata: Style::default().fg(Color::DarkGray),
            player_description: Style::default(),
            player_action_active: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            player_subscribed: Style::default().fg(Color::Red),
            player_error: Style::default().fg(Color::Red),
            player_degraded: Style::default().fg(Color::Yellow),

            comment_author: Style::default().add_modifier(Modifier::BOLD),
            comment_body: Style::default(),
            comment_meta: Style::default().fg(Color::DarkGray),

            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            panel_border: Style::default(),
            panel_border_focused: Style::default().fg(Color::Cyan),
            search_input: Style::default().fg(Color::White),
        }
    }

    fn light() -> Self {
        Self {
            sidebar_category: Style::default().fg(Color::Black),
            sidebar_active: Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
            sidebar_selected: Style::default().bg(Color::Blue).fg(Color::White),
            sidebar_section: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            sidebar_muted: Style::default().fg(Color::DarkGray),

            video_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            video_selected: Style::default().bg(Color::Blue).fg(Color::White),
            video_channel: Style::default().fg(Color::Blue),
            video_stats: Style::default().fg(Color::DarkGray),
            video_duration: Style::default().fg(Color::Magenta),

            player_title: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            player_metadata: Style::default().fg(Color::DarkGray),
            player_description: Style::default().fg(Color::Black),
            player_action_active: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            player_subscribed: Style::default().fg(Color::Red),
            player_error: Style::default().fg(Color::Red),
            player_degraded: Style::default().fg(Color::Magenta),

            comment_author: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            comment_body: Style::default().fg(Color::Black),
            comment_meta: Style::default().fg(Color::DarkGray),

            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            panel_border: Style::default().fg(Color::DarkGray),
            panel_border_focused: Style::default().fg(Color::Blue),
            search_input: Style::default().fg(Color::Black),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_dark_mode() {
        assert_eq!(ThemeVariant::from_dark_mode(true), ThemeVariant::Dark);
        assert_eq!(ThemeVariant::from_dark_mode(false), ThemeVariant::Light);
    }

    #[test]
    fn test_from_str_name() {
        assert_eq!(ThemeVariant::from_str_name("dark"), Some(ThemeVariant::Dark));
        assert_eq!(ThemeVariant::from_str_name("LIGHT"), Some(ThemeVariant::Light));
        assert_eq!(ThemeVariant::from_str_name("solarized"), None);
    }

    #[test]
    fn test_palettes_differ() {
        let dark = ThemeVariant::Dark.palette();
        let light = ThemeVariant::Light.palette();
        assert_ne!(
            format!("{:?}", dark.status_bar),
            format!("{:?}", light.status_bar)
        );
    }
}
