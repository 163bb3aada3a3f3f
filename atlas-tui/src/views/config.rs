//! Configuration viewer.

use crate::state::{App, ServerHealth};
use crate::theme::health_color;
use crate::widgets::DetailPanel;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(4)])
        .split(area);

    DetailPanel {
        title: "Config",
        fields: &app.config_view.fields,
        label_style: Style::default().fg(app.theme.primary),
        value_style: Style::default().fg(app.theme.text),
    }
    .render(f, chunks[0]);

    let text = match &app.server {
        ServerHealth::Unknown => "Not checked yet. Press F5.".to_string(),
        ServerHealth::Online(message) => format!("Online: {}", message),
        ServerHealth::Offline(reason) => format!("Offline: {}", reason),
    };
    let server = Paragraph::new(text)
        .style(Style::default().fg(health_color(&app.server, &app.theme)))
        .block(Block::default().title("Server").borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    f.render_widget(server, chunks[1]);
}
