//! Detail panel widget for showing field/value pairs.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub struct DetailPanel<'a> {
    pub title: &'a str,
    pub fields: &'a [(&'static str, String)],
    pub label_style: Style,
    pub value_style: Style,
}

impl<'a> DetailPanel<'a> {
    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let width = self
            .fields
            .iter()
            .map(|(label, _)| label.len())
            .max()
            .unwrap_or(0);
        let lines: Vec<Line> = self
            .fields
            .iter()
            .map(|(label, value)| {
                Line::from(vec![
                    Span::styled(format!("{:<width$}  ", label, width = width), self.label_style),
                    Span::styled(value.clone(), self.value_style),
                ])
            })
            .collect();

        let widget = Paragraph::new(Text::from(lines))
            .block(Block::default().title(self.title).borders(Borders::ALL))
            .wrap(Wrap { trim: true });

        f.render_widget(widget, area);
    }
}
