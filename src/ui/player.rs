use crate::app::{App, CommentsState, PlayerState};
use crate::util::{format_count, format_duration, format_relative_time, sanitize_text};
use ratatui::{
    layout::Rect,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Render the video detail pane: title, channel, stats, actions,
/// description, and the comment thread.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let palette = &app.palette;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.panel_border_focused)
        .title(" Now Playing ");

    match &app.player {
        PlayerState::Idle => {
            f.render_widget(Paragraph::new("").block(block), area);
        }
        PlayerState::Loading { video_id } => {
            let msg = Paragraph::new(format!("Loading {video_id}..."))
                .style(palette.player_metadata)
                .block(block);
            f.render_widget(msg, area);
        }
        PlayerState::Failed { message, .. } => {
            let text = Text::from(vec![
                Line::from(Span::styled(message.clone(), palette.player_error)),
                Line::from(""),
                Line::from(Span::styled("[r] retry  [q] back", palette.player_metadata)),
            ]);
            f.render_widget(Paragraph::new(text).block(block), area);
        }
        PlayerState::Ready(data) => {
            let mut lines: Vec<Line> = Vec::new();
            let detail = &data.detail;

            lines.push(Line::from(Span::styled(
                sanitize_text(&detail.title).into_owned(),
                palette.player_title,
            )));

            // Channel line: degraded copy when the lookup failed.
            let mut channel_spans = vec![Span::styled(
                sanitize_text(&detail.channel_title).into_owned(),
                palette.video_channel,
            )];
            match (&data.channel, data.channel_failed) {
                (Some(channel), _) => {
                    channel_spans.push(Span::styled(
                        format!(
                            " • {} subscribers",
                            format_count(channel.subscriber_count)
                        ),
                        palette.player_metadata,
                    ));
                }
                (None, true) => {
                    channel_spans.push(Span::styled(
                        " • channel unavailable",
                        palette.player_degraded,
                    ));
                }
                (None, false) => {}
            }
            if app.store.is_subscribed(&detail.channel_id) {
                channel_spans.push(Span::styled(" ✓ Subscribed", palette.player_subscribed));
            }
            lines.push(Line::from(channel_spans));

            let duration = format_duration(detail.duration.as_deref());
            let mut stats = format!(
                "{} views • {} likes • {}",
                format_count(detail.view_count),
                format_count(detail.like_count),
                format_relative_time(detail.published_at),
            );
            if !duration.is_empty() {
                stats.push_str(&format!(" • {duration}"));
            }
            lines.push(Line::from(Span::styled(stats, palette.player_metadata)));

            // Action row reflects the local toggles.
            let mut actions = Vec::new();
            actions.push(Span::styled(
                if data.liked { "[l] Liked " } else { "[l] Like " },
                if data.liked {
                    palette.player_action_active
                } else {
                    palette.player_metadata
                },
            ));
            actions.push(Span::styled(
                if data.disliked {
                    "[d] Disliked "
                } else {
                    "[d] Dislike "
                },
                if data.disliked {
                    palette.player_action_active
                } else {
                    palette.player_metadata
                },
            ));
            actions.push(Span::styled(
                if data.saved { "[v] Saved " } else { "[v] Save " },
                if data.saved {
                    palette.player_action_active
                } else {
                    palette.player_metadata
                },
            ));
            actions.push(Span::styled("[s] Subscribe ", palette.player_metadata));
            actions.push(Span::styled("[o] Open in browser", palette.player_metadata));
            lines.push(Line::from(actions));
            lines.push(Line::from(""));

            if !detail.description.is_empty() {
                for raw in detail.description.lines() {
                    lines.push(Line::from(Span::styled(
                        sanitize_text(raw).into_owned(),
                        palette.player_description,
                    )));
                }
                lines.push(Line::from(""));
            }

            // Comments
            match &data.comments {
                CommentsState::Loading => {
                    lines.push(Line::from(Span::styled(
                        "Loading comments...",
                        palette.comment_meta,
                    )));
                }
                CommentsState::Unavailable => {
                    lines.push(Line::from(Span::styled(
                        "Comments unavailable",
                        palette.comment_meta,
                    )));
                }
                CommentsState::Loaded(comments) if comments.is_empty() => {
                    lines.push(Line::from(Span::styled(
                        "No comments",
                        palette.comment_meta,
                    )));
                }
                CommentsState::Loaded(comments) => {
                    lines.push(Line::from(Span::styled(
                        format!("{} Comments", format_count(detail.comment_count)),
                        palette.player_title,
                    )));
                    lines.push(Line::from(""));
                    for comment in comments {
                        lines.push(Line::from(vec![
                            Span::styled(
                                sanitize_text(&comment.author).into_owned(),
                                palette.comment_author,
                            ),
                            Span::styled(
                                format!(
                                    " • {} • {} likes",
                                    format_relative_time(comment.published_at),
                                    format_count(comment.like_count)
                                ),
                                palette.comment_meta,
                            ),
                        ]));
                        for raw in comment.text.lines() {
                            lines.push(Line::from(Span::styled(
                                sanitize_text(raw).into_owned(),
                                palette.comment_body,
                            )));
                        }
                        lines.push(Line::from(""));
                    }
                }
            }

            let paragraph = Paragraph::new(Text::from(lines))
                .block(block)
                .wrap(Wrap { trim: false })
                .scroll((data.scroll.min(u16::MAX as usize) as u16, 0));
            f.render_widget(paragraph, area);
        }
    }
}
