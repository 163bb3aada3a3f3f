//! Analysis / debate form view.

use super::{inner_height, inner_width, render_input, status_indicator};
use crate::projection::{report_panel, wrap_text, Block as TextBlock, ReportPanel, ReportSection};
use crate::state::{App, FormMode};
use crate::theme::{role_color, SynthBruteTheme};
use crate::widgets::{FilterBar, FilterOption};
use atlas_core::ModelKey;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    let options = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(35),
            Constraint::Percentage(45),
            Constraint::Percentage(20),
        ])
        .split(rows[0]);
    render_options(f, app, options[0], options[1]);
    status_indicator(app, &app.analysis.submission).render(f, options[2]);

    let view = &app.analysis;
    let title = format!("Topic for {} (Enter)", view.mode.operation().label());
    render_input(f, app, rows[1], &title, &view.submission);

    let panel = report_panel(view);
    let lines = report_lines(&panel, &app.theme, inner_width(rows[2]));
    let top = view.scroll.top_line(lines.len(), inner_height(rows[2]));
    let title = match &panel {
        ReportPanel::Report { operation, .. } => format!("{} Report", operation.label()),
        ReportPanel::Error(_) => "Error".to_string(),
        _ => "Report".to_string(),
    };
    let border = match &panel {
        ReportPanel::Error(_) => app.theme.error,
        _ => app.theme.border,
    };
    let report = Paragraph::new(lines).scroll((top, 0)).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    f.render_widget(report, rows[2]);
}

fn render_options(f: &mut Frame<'_>, app: &App, mode_area: Rect, model_area: Rect) {
    let active = Style::default()
        .fg(app.theme.secondary)
        .add_modifier(Modifier::BOLD);
    let inactive = Style::default().fg(app.theme.text_dim);

    let modes: Vec<FilterOption> = [FormMode::Analyze, FormMode::Debate]
        .iter()
        .map(|mode| FilterOption::new(mode.operation().label(), *mode == app.analysis.mode))
        .collect();
    FilterBar {
        title: "Mode [F2]",
        filters: &modes,
        active_style: active,
        inactive_style: inactive,
    }
    .render(f, mode_area);

    let models: Vec<FilterOption> = ModelKey::all()
        .iter()
        .map(|model| FilterOption::new(model.as_str(), *model == app.analysis.model))
        .collect();
    FilterBar {
        title: "Model [F3]",
        filters: &models,
        active_style: active,
        inactive_style: inactive,
    }
    .render(f, model_area);
}

/// Lines for the result area, pre-wrapped to `width` so scrolling can count
/// them exactly.
pub fn report_lines(panel: &ReportPanel, theme: &SynthBruteTheme, width: usize) -> Vec<Line<'static>> {
    let dim = Style::default().fg(theme.text_dim);
    match panel {
        ReportPanel::Empty => vec![Line::from(Span::styled(
            "Enter a topic and press Enter to start.",
            dim,
        ))],
        ReportPanel::Pending { operation } => vec![Line::from(Span::styled(
            format!("{} in progress...", operation.label()),
            Style::default().fg(theme.tertiary),
        ))],
        ReportPanel::Error(error) => {
            let style = Style::default().fg(theme.error);
            let mut lines = vec![Line::from(Span::styled(
                format!("Request failed ({})", error.kind),
                style.add_modifier(Modifier::BOLD),
            ))];
            lines.extend(
                wrap_text(&error.message, width)
                    .into_iter()
                    .map(|l| Line::from(Span::styled(l, style))),
            );
            lines
        }
        ReportPanel::Report { sections, .. } => {
            let mut lines = Vec::new();
            for (index, section) in sections.iter().enumerate() {
                if index > 0 {
                    lines.push(Line::default());
                }
                section_lines(section, theme, width, &mut lines);
            }
            lines
        }
    }
}

fn section_lines(
    section: &ReportSection,
    theme: &SynthBruteTheme,
    width: usize,
    lines: &mut Vec<Line<'static>>,
) {
    let title_color = section
        .role
        .as_ref()
        .map(|role| role_color(role, theme))
        .unwrap_or(theme.primary);
    lines.push(Line::from(Span::styled(
        section.title.to_uppercase(),
        Style::default()
            .fg(title_color)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    )));
    for block in &section.blocks {
        let style = match block {
            TextBlock::Heading(_) => Style::default()
                .fg(theme.secondary)
                .add_modifier(Modifier::BOLD),
            TextBlock::Paragraph(_) => Style::default().fg(theme.text),
        };
        lines.extend(
            wrap_text(block.text(), width)
                .into_iter()
                .map(|l| Line::from(Span::styled(l, style))),
        );
    }
}
