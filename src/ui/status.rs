use crate::app::{App, View};
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text: Cow<'_, str> = if app.search_mode {
        Cow::Owned(format!("Search: {}█  (ENTER submit, ESC cancel)", app.search_input))
    } else if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(msg.as_ref())
    } else {
        match app.view {
            View::Feed => Cow::Borrowed(
                "[j/k]move [Enter]open [Tab]panel [/]search [h]istory [s]ubscribe [t]heme [q]uit",
            ),
            View::Player => Cow::Borrowed(
                "[j/k]up-next [Enter]play [l/d]rate [s]ubscribe [o]pen [J/K]scroll [q]back",
            ),
        }
    };

    let style = if app.search_mode {
        app.palette.search_input
    } else {
        app.palette.status_bar
    };
    f.render_widget(Paragraph::new(text).style(style), area);
}
