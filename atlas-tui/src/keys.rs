//! Keybinding definitions for the TUI.
//!
//! Plain characters always go to the input field, so every command lives on
//! a function key, a navigation key or a Ctrl chord.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    NextView,
    PrevView,
    Insert(char),
    Backspace,
    ClearInput,
    Submit,
    ToggleMode,
    CycleModel,
    CheckHealth,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    FollowLatest,
    OpenHelp,
    Cancel,
}

pub fn map_key(event: KeyEvent) -> Option<Action> {
    let KeyEvent {
        code,
        modifiers,
        kind,
        ..
    } = event;

    if kind == KeyEventKind::Release {
        return None;
    }

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') | KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('u') => Some(Action::ClearInput),
            KeyCode::Char('r') => Some(Action::CheckHealth),
            _ => None,
        };
    }

    match code {
        KeyCode::Enter => Some(Action::Submit),
        KeyCode::Esc => Some(Action::Cancel),
        KeyCode::Tab => Some(Action::NextView),
        KeyCode::BackTab => Some(Action::PrevView),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Up => Some(Action::ScrollUp),
        KeyCode::Down => Some(Action::ScrollDown),
        KeyCode::PageUp => Some(Action::PageUp),
        KeyCode::PageDown => Some(Action::PageDown),
        KeyCode::End => Some(Action::FollowLatest),
        KeyCode::F(1) => Some(Action::OpenHelp),
        KeyCode::F(2) => Some(Action::ToggleMode),
        KeyCode::F(3) => Some(Action::CycleModel),
        KeyCode::F(5) => Some(Action::CheckHealth),
        KeyCode::Char(c) if !c.is_control() => Some(Action::Insert(c)),
        _ => None,
    }
}

/// Help text shown in the key binding modal.
pub const HELP_TEXT: &str = "\
F1           this help
Enter        submit the current input
Tab/S-Tab    switch view
F2           toggle Analyze / Debate
F3           cycle model
F5, Ctrl+R   check server status
Up/Down      scroll one line
PgUp/PgDn    scroll one page
End          jump to latest
Ctrl+U       clear input
Esc          close / dismiss
Ctrl+C       quit";
