//! Option bar widget: a row of labelled choices with one active.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOption {
    pub label: String,
    pub active: bool,
}

impl FilterOption {
    pub fn new(label: impl Into<String>, active: bool) -> Self {
        Self {
            label: label.into(),
            active,
        }
    }
}

pub struct FilterBar<'a> {
    pub title: &'a str,
    pub filters: &'a [FilterOption],
    pub active_style: Style,
    pub inactive_style: Style,
}

impl<'a> FilterBar<'a> {
    pub fn line(&self) -> Line<'static> {
        let spans: Vec<Span> = self
            .filters
            .iter()
            .map(|filter| {
                let (text, style) = if filter.active {
                    (format!("[{}]", filter.label), self.active_style)
                } else {
                    (format!(" {} ", filter.label), self.inactive_style)
                };
                Span::styled(text, style)
            })
            .collect();
        Line::from(spans)
    }

    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let paragraph = Paragraph::new(self.line())
            .block(Block::default().title(self.title).borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }
}
