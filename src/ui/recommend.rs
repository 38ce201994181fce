use crate::app::{App, RecommendState};
use crate::util::{format_count, format_relative_time, sanitize_text, truncate_to_width};
use ratatui::{
    layout::Rect,
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

/// Render the up-next recommendation rail.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let palette = &app.palette;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.panel_border)
        .title(" Up Next ");

    match &app.recommend {
        RecommendState::Loading => {
            f.render_widget(
                Paragraph::new("Loading...")
                    .style(palette.video_stats)
                    .block(block),
                area,
            );
        }
        RecommendState::Failed => {
            f.render_widget(
                Paragraph::new("Recommendations unavailable")
                    .style(palette.video_stats)
                    .block(block),
                area,
            );
        }
        RecommendState::Loaded(videos) => {
            let width = area.width.saturating_sub(3) as usize;
            let items: Vec<ListItem> = videos
                .iter()
                .enumerate()
                .map(|(i, video)| {
                    let title_style = if i == app.recommend_selected {
                        palette.video_selected
                    } else {
                        palette.video_title
                    };
                    let title = sanitize_text(&video.title);
                    ListItem::new(Text::from(vec![
                        Line::from(Span::styled(
                            truncate_to_width(&title, width).into_owned(),
                            title_style,
                        )),
                        Line::from(Span::styled(
                            format!(
                                "{} • {} views • {}",
                                truncate_to_width(&video.channel_title, width / 2),
                                format_count(video.view_count),
                                format_relative_time(video.published_at)
                            ),
                            palette.video_stats,
                        )),
                    ]))
                })
                .collect();
            f.render_widget(List::new(items).block(block), area);
        }
    }
}
