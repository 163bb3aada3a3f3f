//! Status indicator widget.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// Single-line phase readout with an optional spinner.
pub struct StatusIndicator<'a> {
    pub title: &'a str,
    pub status: String,
    pub style: Style,
    /// Spinner frame while work is outstanding.
    pub spinner: Option<usize>,
}

impl<'a> StatusIndicator<'a> {
    pub fn line(&self) -> Line<'static> {
        let mut spans = Vec::with_capacity(2);
        if let Some(frame) = self.spinner {
            spans.push(Span::styled(
                format!("{} ", SPINNER[frame % SPINNER.len()]),
                self.style.add_modifier(Modifier::BOLD),
            ));
        }
        spans.push(Span::styled(self.status.clone(), self.style));
        Line::from(spans)
    }

    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let paragraph = Paragraph::new(self.line())
            .block(Block::default().title(self.title).borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_cycles() {
        let indicator = StatusIndicator {
            title: "Status",
            status: "Working".to_string(),
            style: Style::default(),
            spinner: Some(5),
        };
        let line = indicator.line();
        assert_eq!(line.spans[0].content, "/ ");
        assert_eq!(line.spans[1].content, "Working");
    }
}
