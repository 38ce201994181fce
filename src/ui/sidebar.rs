use crate::app::{App, FeedSource, Focus, CATEGORIES};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Render the sidebar: categories, history shortcut, subscriptions.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let is_focused = app.focus == Focus::Sidebar;
    let palette = &app.palette;

    let active_category = match app.feed_source {
        FeedSource::Category(id) => Some(id),
        _ => None,
    };

    let mut items: Vec<ListItem> = Vec::with_capacity(CATEGORIES.len() + 6);

    for (i, category) in CATEGORIES.iter().enumerate() {
        let marker = if active_category == Some(category.id) {
            "● "
        } else {
            "  "
        };
        let style = if is_focused && i == app.selected_category {
            palette.sidebar_selected
        } else if active_category == Some(category.id) {
            palette.sidebar_active
        } else {
            palette.sidebar_category
        };
        items.push(ListItem::new(Line::from(vec![
            Span::styled(marker, palette.sidebar_active),
            Span::styled(category.name, style),
        ])));
    }

    items.push(ListItem::new(""));
    items.push(ListItem::new(Span::styled(
        format!("History ({}) [h]", app.store.watch_history().len()),
        if matches!(app.feed_source, FeedSource::History) {
            palette.sidebar_active
        } else {
            palette.sidebar_category
        },
    )));

    items.push(ListItem::new(""));
    items.push(ListItem::new(Span::styled(
        "Subscriptions",
        palette.sidebar_section,
    )));
    if app.store.subscriptions().is_empty() {
        items.push(ListItem::new(Span::styled(
            "No subscriptions yet",
            palette.sidebar_muted,
        )));
    } else {
        for sub in app.store.subscriptions() {
            items.push(ListItem::new(Span::styled(
                crate::util::truncate_to_width(&sub.title, area.width.saturating_sub(4) as usize),
                palette.sidebar_category,
            )));
        }
    }

    let border_style = if is_focused {
        palette.panel_border_focused
    } else {
        palette.panel_border
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title("Browse"),
    );

    f.render_widget(list, area);
}
