//! Agent chat view.

use super::{inner_height, inner_width, render_input, status_indicator};
use crate::projection::{chat_bubbles, wrap_text, Align, Bubble};
use crate::state::App;
use crate::theme::{sender_color, SynthBruteTheme};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);
    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(16)])
        .split(rows[1]);

    let view = &app.chat;
    let mut lines = conversation_lines(&chat_bubbles(view), &app.theme, inner_width(rows[0]));
    if view.submission.phase().is_pending() {
        lines.push(Line::from(Span::styled(
            "ATLAS is thinking...",
            Style::default()
                .fg(app.theme.text_dim)
                .add_modifier(Modifier::ITALIC),
        )));
    }
    let top = view.scroll.top_line(lines.len(), inner_height(rows[0]));
    let conversation = Paragraph::new(lines).scroll((top, 0)).block(
        Block::default()
            .title("Ask an Agent")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(conversation, rows[0]);

    render_input(f, app, bottom[0], "Question (Enter)", &view.submission);
    status_indicator(app, &view.submission).render(f, bottom[1]);
}

/// Bubbles as pre-wrapped lines. User bubbles hug the right edge, bot
/// bubbles the left, each capped at three quarters of the width.
pub fn conversation_lines(bubbles: &[Bubble], theme: &SynthBruteTheme, width: usize) -> Vec<Line<'static>> {
    let bubble_width = (width * 3 / 4).max(1);
    let mut lines = Vec::new();
    if bubbles.is_empty() {
        lines.push(Line::from(Span::styled(
            "Ask the agents anything.",
            Style::default().fg(theme.text_dim),
        )));
        return lines;
    }
    for (index, bubble) in bubbles.iter().enumerate() {
        if index > 0 {
            lines.push(Line::default());
        }
        let alignment = match bubble.align {
            Align::Left => Alignment::Left,
            Align::Right => Alignment::Right,
        };
        let color = if bubble.is_error {
            theme.error
        } else {
            sender_color(bubble.sender, theme)
        };
        lines.push(
            Line::from(Span::styled(
                bubble.label.clone(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))
            .alignment(alignment),
        );
        let body = Style::default().fg(if bubble.is_error { theme.error } else { theme.text });
        lines.extend(
            wrap_text(&bubble.text, bubble_width)
                .into_iter()
                .map(|l| Line::from(Span::styled(l, body)).alignment(alignment)),
        );
    }
    lines
}
