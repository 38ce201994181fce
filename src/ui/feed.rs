use crate::app::{App, FeedSource, FeedState, Focus};
use crate::util::{format_count, format_duration, format_relative_time, sanitize_text};
use ratatui::{
    layout::Rect,
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

/// Frames for the loading spinner animation.
const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Render the video grid panel.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let is_focused = app.focus == Focus::Videos;
    let palette = &app.palette;

    let title = match &app.feed_source {
        FeedSource::Category(id) => {
            let name = crate::app::CATEGORIES
                .iter()
                .find(|c| c.id == *id)
                .map(|c| c.name)
                .unwrap_or("Videos");
            format!(" {name} ")
        }
        FeedSource::Search(query) => format!(" Search: {query} "),
        FeedSource::History => " Watch History ".to_string(),
    };

    let border_style = if is_focused {
        palette.panel_border_focused
    } else {
        palette.panel_border
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title);

    match &app.feed {
        FeedState::Loading => {
            let spinner = SPINNER[app.spinner_frame % SPINNER.len()];
            let msg = Paragraph::new(format!("{spinner} Loading..."))
                .style(palette.video_stats)
                .block(block);
            f.render_widget(msg, area);
        }
        FeedState::Failed { message } => {
            let text = Text::from(vec![
                Line::from(Span::styled(message.clone(), palette.player_error)),
                Line::from(""),
                Line::from(Span::styled("[r] retry", palette.video_stats)),
            ]);
            f.render_widget(Paragraph::new(text).block(block), area);
        }
        FeedState::Empty => {
            let msg = match app.feed_source {
                FeedSource::History => "No videos watched yet",
                FeedSource::Search(_) => "No results found",
                FeedSource::Category(_) => "No videos available",
            };
            f.render_widget(
                Paragraph::new(msg).style(palette.video_stats).block(block),
                area,
            );
        }
        FeedState::Loaded { videos } => {
            let items: Vec<ListItem> = videos
                .iter()
                .enumerate()
                .map(|(i, video)| {
                    let selected = is_focused && i == app.selected_video;
                    let title_style = if selected {
                        palette.video_selected
                    } else {
                        palette.video_title
                    };

                    let mut meta = vec![Span::styled(
                        sanitize_text(&video.channel_title).into_owned(),
                        palette.video_channel,
                    )];
                    if !matches!(app.feed_source, FeedSource::History) {
                        meta.push(Span::styled(
                            format!(" • {} views", format_count(video.view_count)),
                            palette.video_stats,
                        ));
                    }
                    meta.push(Span::styled(
                        format!(" • {}", format_relative_time(video.published_at)),
                        palette.video_stats,
                    ));
                    let duration = format_duration(video.duration.as_deref());
                    if !duration.is_empty() {
                        meta.push(Span::styled(
                            format!(" [{duration}]"),
                            palette.video_duration,
                        ));
                    }

                    ListItem::new(Text::from(vec![
                        Line::from(Span::styled(
                            sanitize_text(&video.title).into_owned(),
                            title_style,
                        )),
                        Line::from(meta),
                    ]))
                })
                .collect();

            f.render_widget(List::new(items).block(block), area);
        }
    }
}
