//! Pure rendering of the app state. Given the same [`App`], `ui` always draws
//! the same frame; no state is mutated here.

use crate::core::app::{App, SUGGESTIONS};
use crate::core::message::MessageStatus;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

const PENDING_INDICATOR: &str = "▍ ▍ ▍";

pub fn ui(f: &mut Frame, app: &App) {
    let background = Block::default().style(Style::default().bg(app.theme.background_color));
    f.render_widget(background, f.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(f.area());

    let lines = if app.showing_greeting() {
        build_greeting_lines(app)
    } else {
        build_display_lines(app)
    };

    // Account for the title row; clamp the offset so scrolling past the end
    // is impossible regardless of what the event handlers stored.
    let available_height = chunks[0].height.saturating_sub(1);
    let max_offset = (lines.len() as u16).saturating_sub(available_height);
    let scroll_offset = if app.showing_greeting() {
        0
    } else {
        app.scroll_offset.min(max_offset)
    };

    let mut title_spans = vec![Span::styled("Glimmer", app.theme.title_style)];
    if let Some(ref notice) = app.notice {
        title_spans.push(Span::raw("  "));
        title_spans.push(Span::styled(notice.as_str(), app.theme.notice_style));
    }

    let messages = Paragraph::new(lines)
        .block(Block::default().title(Line::from(title_spans)))
        .wrap(Wrap { trim: false })
        .scroll((scroll_offset, 0));
    f.render_widget(messages, chunks[0]);

    let input_title = if app.confirm_clear {
        "Delete all messages? (y/n)"
    } else {
        "Type your message (Enter to send, Ctrl+C to quit)"
    };

    let input = Paragraph::new(Span::styled(app.input.as_str(), app.theme.input_text_style))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.theme.input_border_style)
                .title(Span::styled(input_title, app.theme.input_title_style)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(input, chunks[1]);

    if !app.confirm_clear {
        f.set_cursor_position((
            chunks[1].x + 1 + app.input.width() as u16,
            chunks[1].y + 1,
        ));
    }
}

/// One styled line set per message, separated by blank spacer lines.
pub fn build_display_lines(app: &App) -> Vec<Line<'_>> {
    let theme = &app.theme;
    let mut lines = Vec::new();

    for msg in app.session.transcript().iter() {
        if msg.sender.is_user() {
            lines.push(Line::from(vec![
                Span::styled("You: ", theme.user_prefix_style),
                Span::styled(msg.text.as_str(), theme.user_text_style),
            ]));
        } else if msg.status == MessageStatus::Pending && msg.text.is_empty() {
            lines.push(Line::from(Span::styled(
                PENDING_INDICATOR,
                theme.pending_indicator_style,
            )));
        } else {
            let text_style = match msg.status {
                MessageStatus::Error => theme.error_text_style,
                _ => theme.assistant_text_style,
            };
            for content_line in msg.text.lines() {
                lines.push(Line::from(Span::styled(content_line, text_style)));
            }
        }
        lines.push(Line::from(""));
    }

    lines
}

/// The header shown until the first message lands, with the numbered
/// suggestion prompts.
fn build_greeting_lines(app: &App) -> Vec<Line<'_>> {
    let theme = &app.theme;
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled("Hello, there", theme.greeting_title_style)),
        Line::from(Span::styled(
            "How can I help you today?",
            theme.greeting_text_style,
        )),
        Line::from(""),
    ];

    for (i, suggestion) in SUGGESTIONS.iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(format!("  Alt+{}  ", i + 1), theme.suggestion_key_style),
            Span::styled(*suggestion, theme.suggestion_text_style),
        ]));
    }

    lines
}
