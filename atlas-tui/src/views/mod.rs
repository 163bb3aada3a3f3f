//! View rendering dispatch.

pub mod analysis;
pub mod chat;
pub mod config;

use crate::nav::View;
use crate::state::{App, ServerHealth, SubmissionState};
use crate::theme::{health_color, notification_color, phase_color};
use crate::widgets::StatusIndicator;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub fn render_view(f: &mut Frame<'_>, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.size());

    f.render_widget(
        Block::default().style(Style::default().bg(app.theme.bg)),
        f.size(),
    );
    render_header(f, app, layout[0]);

    match app.active_view {
        View::Analysis => analysis::render(f, app, layout[1]),
        View::AgentChat => chat::render(f, app, layout[1]),
        View::ConfigViewer => config::render(f, app, layout[1]),
    }

    render_footer(f, app, layout[2]);

    if let Some(modal) = &app.modal {
        let area = centered_rect(60, 60, f.size());
        f.render_widget(Clear, area);
        let widget = Paragraph::new(modal.message.clone())
            .block(
                Block::default()
                    .title(modal.title.as_str())
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(app.theme.border_focus)),
            )
            .style(
                Style::default()
                    .fg(app.theme.text)
                    .bg(app.theme.bg_secondary),
            )
            .wrap(Wrap { trim: false });
        f.render_widget(widget, area);
    }
}

fn render_header(f: &mut Frame<'_>, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        "ATLAS ",
        Style::default()
            .fg(app.theme.primary)
            .add_modifier(Modifier::BOLD),
    )];
    for view in View::all() {
        let style = if *view == app.active_view {
            Style::default()
                .fg(app.theme.secondary)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.primary_dim)
        };
        spans.push(Span::styled(format!(" {} ", view.title()), style));
    }
    spans.push(Span::raw(" | "));
    spans.push(Span::styled(
        format!("Model: {}", app.analysis.model),
        Style::default().fg(app.theme.tertiary),
    ));
    spans.push(Span::raw(" | "));
    let server = match &app.server {
        ServerHealth::Unknown => "Server: Unknown".to_string(),
        ServerHealth::Online(_) => "Server: Online".to_string(),
        ServerHealth::Offline(_) => "Server: Offline".to_string(),
    };
    spans.push(Span::styled(
        server,
        Style::default().fg(health_color(&app.server, &app.theme)),
    ));

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(header, area);
}

fn render_footer(f: &mut Frame<'_>, app: &App, area: Rect) {
    let help = match app.active_view {
        View::Analysis => "Enter submit • F2 mode • F3 model • Tab view • F1 help • Ctrl+C quit",
        View::AgentChat => "Enter send • Up/Down scroll • End latest • Tab view • F1 help • Ctrl+C quit",
        View::ConfigViewer => "F5 check server • Tab view • F1 help • Ctrl+C quit",
    };
    let (text, style) = match app.notifications.last() {
        Some(note) => (
            format!("{}: {}", note.level.label(), note.message),
            Style::default().fg(notification_color(note.level, &app.theme)),
        ),
        None => (help.to_string(), Style::default().fg(app.theme.text_dim)),
    };
    let footer = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL))
        .style(style);
    f.render_widget(footer, area);
}

/// Single-line input box. Shows the tail of the text when it overflows and
/// places the terminal cursor after it unless a modal is open.
pub(crate) fn render_input(
    f: &mut Frame<'_>,
    app: &App,
    area: Rect,
    title: &str,
    submission: &SubmissionState,
) {
    let inner_width = area.width.saturating_sub(2) as usize;
    let chars: Vec<char> = submission.input.chars().collect();
    let visible_len = chars.len().min(inner_width.saturating_sub(1));
    let visible: String = chars[chars.len() - visible_len..].iter().collect();

    let border = if submission.phase().is_pending() {
        app.theme.border
    } else {
        app.theme.border_focus
    };
    let widget = Paragraph::new(visible).style(Style::default().fg(app.theme.text)).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    f.render_widget(widget, area);

    if app.modal.is_none() && area.width > 2 && area.height > 2 {
        f.set_cursor(area.x + 1 + visible_len as u16, area.y + 1);
    }
}

pub(crate) fn status_indicator<'a>(app: &App, submission: &SubmissionState) -> StatusIndicator<'a> {
    let phase = submission.phase();
    StatusIndicator {
        title: "Status",
        status: phase.label().to_string(),
        style: Style::default().fg(phase_color(phase, &app.theme)),
        spinner: phase.is_pending().then_some(app.spinner_frame),
    }
}

/// Rows available inside a bordered block.
pub(crate) fn inner_height(area: Rect) -> u16 {
    area.height.saturating_sub(2)
}

pub(crate) fn inner_width(area: Rect) -> usize {
    area.width.saturating_sub(2).max(1) as usize
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
