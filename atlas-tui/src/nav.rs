//! Navigation and view switching utilities.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum View {
    /// Analysis/debate form with a single-slot report.
    Analysis,
    /// Agent chat with an append-only conversation.
    AgentChat,
    ConfigViewer,
}

impl View {
    pub fn title(&self) -> &'static str {
        match self {
            View::Analysis => "Analysis",
            View::AgentChat => "Ask an Agent",
            View::ConfigViewer => "Config",
        }
    }

    pub fn all() -> &'static [View] {
        &[View::Analysis, View::AgentChat, View::ConfigViewer]
    }

    pub fn index(&self) -> usize {
        Self::all()
            .iter()
            .position(|v| v == self)
            .unwrap_or(0)
    }

    pub fn from_index(index: usize) -> Option<View> {
        Self::all().get(index).copied()
    }

    pub fn next(&self) -> View {
        let idx = self.index();
        let all = Self::all();
        let next = (idx + 1) % all.len();
        all[next]
    }

    pub fn previous(&self) -> View {
        let idx = self.index();
        let all = Self::all();
        let prev = if idx == 0 { all.len() - 1 } else { idx - 1 };
        all[prev]
    }

    /// Whether the view accepts text input and submissions.
    pub fn is_interactive(&self) -> bool {
        !matches!(self, View::ConfigViewer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_and_previous_wrap() {
        assert_eq!(View::ConfigViewer.next(), View::Analysis);
        assert_eq!(View::Analysis.previous(), View::ConfigViewer);
        for view in View::all() {
            assert_eq!(view.next().previous(), *view);
            assert_eq!(View::from_index(view.index()), Some(*view));
        }
    }
}
