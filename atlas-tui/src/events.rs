//! Event types for the TUI event loop.

use crate::dispatch::Settlement;
use atlas_core::{ErrorInfo, ServerStatus};
use crossterm::event::KeyEvent;

#[derive(Debug, Clone)]
pub enum TuiEvent {
    Input(KeyEvent),
    Resize { width: u16, height: u16 },
    /// The outstanding request resolved.
    Settled(Box<Settlement>),
    /// A reachability check finished.
    Health(Result<ServerStatus, ErrorInfo>),
}
