//! Pure projection from view state to displayable structure.
//!
//! Nothing here touches the terminal; views turn these values into ratatui
//! widgets. Calling any function twice on the same state yields equal output.

use crate::state::{AnalysisViewState, ChatViewState};
use atlas_core::{ErrorInfo, Message, OperationKind, Phase, Response, RoleId, Sender};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

// ============================================================================
// TEXT BLOCKS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading(String),
    Paragraph(String),
}

impl Block {
    pub fn text(&self) -> &str {
        match self {
            Block::Heading(text) | Block::Paragraph(text) => text,
        }
    }
}

/// A line opening with a numeral and a period, e.g. `2. Key Actors`.
pub fn is_heading(line: &str) -> bool {
    let line = line.trim_start();
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    digits > 0 && line[digits..].starts_with('.')
}

/// Split a report body into heading and paragraph blocks. Empty lines are
/// dropped.
pub fn text_blocks(text: &str) -> Vec<Block> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            if is_heading(line) {
                Block::Heading(line.to_string())
            } else {
                Block::Paragraph(line.to_string())
            }
        })
        .collect()
}

// ============================================================================
// REPORTS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSection {
    pub title: String,
    /// Set for per-persona transcript sections.
    pub role: Option<RoleId>,
    pub blocks: Vec<Block>,
}

impl ReportSection {
    fn new(title: impl Into<String>, role: Option<RoleId>, body: &str) -> Self {
        Self {
            title: title.into(),
            role,
            blocks: text_blocks(body),
        }
    }
}

/// Layout for a response, chosen by the operation that produced it.
pub fn report_sections(response: &Response) -> Vec<ReportSection> {
    match response {
        Response::AnalysisReport { body } => vec![ReportSection::new("OSINT Report", None, body)],
        Response::DebateReport {
            synthesis,
            transcript,
            audit,
        } => {
            let mut sections = Vec::with_capacity(transcript.len() + 2);
            sections.push(ReportSection::new("Final Synthesis", None, synthesis));
            sections.extend(transcript.iter().map(|entry| {
                ReportSection::new(
                    entry.role.display_name(),
                    Some(entry.role.clone()),
                    &entry.text,
                )
            }));
            sections.push(ReportSection::new("Bias Audit", None, audit));
            sections
        }
        Response::AgentReply { text, role } => {
            let title = role
                .as_ref()
                .map(RoleId::display_name)
                .unwrap_or_else(|| "Agent Reply".to_string());
            vec![ReportSection::new(title, role.clone(), text)]
        }
    }
}

/// What the form view's result area shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportPanel {
    Empty,
    Pending {
        operation: OperationKind,
    },
    Report {
        operation: OperationKind,
        sections: Vec<ReportSection>,
    },
    Error(ErrorInfo),
}

pub fn report_panel(view: &AnalysisViewState) -> ReportPanel {
    let submission = &view.submission;
    match submission.phase() {
        Phase::Idle => ReportPanel::Empty,
        Phase::Pending => ReportPanel::Pending {
            operation: submission
                .pending_operation()
                .unwrap_or_else(|| view.mode.operation()),
        },
        Phase::Succeeded => match submission.last_result() {
            Some(response) => ReportPanel::Report {
                operation: response.operation(),
                sections: report_sections(response),
            },
            None => ReportPanel::Empty,
        },
        Phase::Failed => match submission.last_error() {
            Some(error) => ReportPanel::Error(error.clone()),
            None => ReportPanel::Empty,
        },
    }
}

// ============================================================================
// CHAT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bubble {
    pub align: Align,
    pub sender: Sender,
    pub label: String,
    pub text: String,
    pub is_error: bool,
}

impl Bubble {
    fn from_message(message: &Message) -> Self {
        let (align, label) = match message.sender {
            Sender::User => (Align::Right, "You".to_string()),
            Sender::Bot => (
                Align::Left,
                message
                    .role
                    .as_ref()
                    .map(RoleId::display_name)
                    .unwrap_or_else(|| "ATLAS".to_string()),
            ),
        };
        Self {
            align,
            sender: message.sender,
            label,
            text: message.text.clone(),
            is_error: message.is_error(),
        }
    }
}

/// One bubble per message, in conversation order.
pub fn chat_bubbles(view: &ChatViewState) -> Vec<Bubble> {
    view.conversation
        .messages()
        .iter()
        .map(Bubble::from_message)
        .collect()
}

// ============================================================================
// WRAPPING
// ============================================================================

/// Greedy word wrap to `width` terminal columns, measured by display width.
/// Words wider than a line are split. Explicit line breaks are kept; the
/// result is never empty.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    for raw in text.lines() {
        let mut current = String::new();
        let mut current_width = 0;
        for word in raw.split_whitespace() {
            let word_width = word.width();
            let needed = if current_width == 0 {
                word_width
            } else {
                current_width + 1 + word_width
            };
            if needed <= width {
                if current_width > 0 {
                    current.push(' ');
                    current_width += 1;
                }
                current.push_str(word);
                current_width += word_width;
                continue;
            }
            if current_width > 0 {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            for c in word.chars() {
                let char_width = c.width().unwrap_or(0);
                if current_width > 0 && current_width + char_width > width {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                current.push(c);
                current_width += char_width;
            }
        }
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TuiConfig;
    use crate::state::{App, FormMode};
    use atlas_core::ModelKey;
    use atlas_test_utils::{analysis_report, debate_report};

    #[test]
    fn test_heading_then_paragraph() {
        assert_eq!(
            text_blocks("1. Heading\nBody text"),
            vec![
                Block::Heading("1. Heading".to_string()),
                Block::Paragraph("Body text".to_string()),
            ]
        );
    }

    #[test]
    fn test_heading_detection() {
        assert!(is_heading("12. Outlook"));
        assert!(is_heading("  3."));
        assert!(!is_heading("1 Heading"));
        assert!(!is_heading("Section 1. Intro"));
        assert!(!is_heading(". dot"));
        assert!(!is_heading(""));
    }

    #[test]
    fn test_empty_lines_dropped() {
        let blocks = text_blocks("\n\nFirst\n   \n\nSecond\n");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1].text(), "Second");
    }

    #[test]
    fn test_analysis_layout_single_section() {
        let sections = report_sections(&analysis_report("1. Summary\nQuiet week."));
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "OSINT Report");
        assert_eq!(sections[0].blocks.len(), 2);
    }

    #[test]
    fn test_debate_layout_order() {
        let sections = report_sections(&debate_report());
        let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Final Synthesis", "Tech Optimist", "Ai Ethicist", "Bias Audit"]
        );
        assert_eq!(
            sections[1].role.as_ref().map(RoleId::as_str),
            Some("tech_optimist")
        );
    }

    #[test]
    fn test_report_panel_tracks_phase() {
        let view = AnalysisViewState::new(ModelKey::Llama3);
        assert_eq!(report_panel(&view), ReportPanel::Empty);
    }

    #[test]
    fn test_pending_panel_names_request_in_flight() {
        let mut app = App::new(
            TuiConfig::from_toml(
                r#"
api_base_url = "http://localhost:5000"
default_model = "llama3"
tunnel_bypass = false
tick_rate_ms = 200
persistence_path = "tmp/state.json"
log_path = "tmp/atlas.log"

[theme]
name = "synthbrute"
"#,
            )
            .unwrap(),
        );
        app.insert_char('x');
        app.submit().unwrap();
        app.toggle_mode();
        assert_eq!(app.analysis.mode, FormMode::Debate);
        assert_eq!(
            report_panel(&app.analysis),
            ReportPanel::Pending {
                operation: OperationKind::Analyze
            }
        );
    }

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("aaa bbb ccc", 7), vec!["aaa bbb", "ccc"]);
        assert_eq!(wrap_text("abcdefgh", 3), vec!["abc", "def", "gh"]);
        assert_eq!(wrap_text("one\n\ntwo", 10), vec!["one", "", "two"]);
        assert_eq!(wrap_text("", 10), vec![""]);
    }

    #[test]
    fn test_wrap_measures_display_width() {
        let lines = wrap_text("日本語テキスト", 6);
        assert_eq!(lines, vec!["日本語", "テキス", "ト"]);
        for line in wrap_text("東京 and 大阪 are cities", 8) {
            assert!(line.width() <= 8, "{:?} overflows", line);
        }
    }
}
