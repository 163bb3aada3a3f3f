//! Application state and the per-view submission state machine.

use crate::config::TuiConfig;
use crate::dispatch::{Dispatch, Settlement, Ticket};
use crate::nav::View;
use crate::notifications::{Notification, NotificationLevel};
use crate::persistence::PersistedState;
use crate::theme::SynthBruteTheme;
use atlas_core::{
    Conversation, EntityId, ErrorInfo, Message, ModelKey, OperationKind, Phase, Request, Response,
    ServerStatus,
};
use serde::{Deserialize, Serialize};

const MAX_NOTIFICATIONS: usize = 32;

// ============================================================================
// SUBMISSION STATE MACHINE
// ============================================================================

/// Input, phase and last outcome of one view.
///
/// `phase == Pending` exactly while a request id is in flight, and the last
/// result and last error share one slot so they can never coexist.
#[derive(Debug, Clone, Default)]
pub struct SubmissionState {
    pub input: String,
    phase: Phase,
    outcome: Option<Result<Response, ErrorInfo>>,
    in_flight: Option<(EntityId, OperationKind)>,
}

impl SubmissionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn last_result(&self) -> Option<&Response> {
        self.outcome.as_ref().and_then(|o| o.as_ref().ok())
    }

    pub fn last_error(&self) -> Option<&ErrorInfo> {
        self.outcome.as_ref().and_then(|o| o.as_ref().err())
    }

    pub fn in_flight(&self) -> Option<EntityId> {
        self.in_flight.map(|(request_id, _)| request_id)
    }

    /// Operation of the outstanding request, independent of later mode changes.
    pub fn pending_operation(&self) -> Option<OperationKind> {
        self.in_flight.map(|(_, operation)| operation)
    }

    /// Trimmed input if a submission would be accepted right now.
    pub fn submittable_text(&self) -> Option<String> {
        if self.phase.is_pending() {
            return None;
        }
        let text = self.input.trim();
        if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        }
    }

    fn begin(&mut self, request: &Request) {
        self.outcome = None;
        self.phase = Phase::Pending;
        self.in_flight = Some((request.request_id(), request.target()));
    }

    /// Record the outcome for `request_id`. Returns false for anything other
    /// than the request currently in flight.
    fn settle(&mut self, request_id: EntityId, outcome: Result<Response, ErrorInfo>) -> bool {
        if self.in_flight() != Some(request_id) {
            return false;
        }
        self.in_flight = None;
        self.phase = if outcome.is_ok() {
            Phase::Succeeded
        } else {
            Phase::Failed
        };
        self.outcome = Some(outcome);
        true
    }
}

// ============================================================================
// SCROLLING
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollAnchor {
    /// Offset counts down from the first line (reports).
    #[default]
    Top,
    /// Offset counts up from the last line (chat).
    Bottom,
}

/// Scroll position expressed relative to an anchor, so the renderer can
/// resolve it without writing back into state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrollState {
    anchor: ScrollAnchor,
    offset: u16,
    reveals: u64,
}

impl ScrollState {
    pub fn anchored(anchor: ScrollAnchor) -> Self {
        Self {
            anchor,
            offset: 0,
            reveals: 0,
        }
    }

    pub fn line_up(&mut self, lines: u16) {
        match self.anchor {
            ScrollAnchor::Top => self.offset = self.offset.saturating_sub(lines),
            ScrollAnchor::Bottom => self.offset = self.offset.saturating_add(lines),
        }
    }

    pub fn line_down(&mut self, lines: u16) {
        match self.anchor {
            ScrollAnchor::Top => self.offset = self.offset.saturating_add(lines),
            ScrollAnchor::Bottom => self.offset = self.offset.saturating_sub(lines),
        }
    }

    /// Bring the newest content into view.
    pub fn reveal_latest(&mut self) {
        self.offset = 0;
        self.reveals += 1;
    }

    /// How many times the view was asked to reveal its latest content.
    pub fn reveals(&self) -> u64 {
        self.reveals
    }

    /// First visible line for `content` lines shown in `viewport` rows.
    pub fn top_line(&self, content: usize, viewport: u16) -> u16 {
        let max = content.saturating_sub(viewport as usize).min(u16::MAX as usize) as u16;
        match self.anchor {
            ScrollAnchor::Top => self.offset.min(max),
            ScrollAnchor::Bottom => max.saturating_sub(self.offset),
        }
    }
}

// ============================================================================
// VIEW STATE DEFINITIONS
// ============================================================================

/// Operation the analysis form targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FormMode {
    #[default]
    Analyze,
    Debate,
}

impl FormMode {
    pub fn operation(&self) -> OperationKind {
        match self {
            FormMode::Analyze => OperationKind::Analyze,
            FormMode::Debate => OperationKind::Debate,
        }
    }

    pub fn toggle(&self) -> FormMode {
        match self {
            FormMode::Analyze => FormMode::Debate,
            FormMode::Debate => FormMode::Analyze,
        }
    }
}

/// Analysis/debate form. Each completed submission replaces the report.
#[derive(Debug, Clone)]
pub struct AnalysisViewState {
    pub submission: SubmissionState,
    pub mode: FormMode,
    pub model: ModelKey,
    pub scroll: ScrollState,
}

impl AnalysisViewState {
    pub fn new(model: ModelKey) -> Self {
        Self {
            submission: SubmissionState::new(),
            mode: FormMode::default(),
            model,
            scroll: ScrollState::anchored(ScrollAnchor::Top),
        }
    }

    pub fn build_request(&self, topic: String) -> Request {
        Request::for_operation(self.mode.operation(), topic, self.model)
    }
}

/// Agent chat. The conversation only grows.
#[derive(Debug, Clone)]
pub struct ChatViewState {
    pub submission: SubmissionState,
    pub conversation: Conversation,
    pub scroll: ScrollState,
}

impl ChatViewState {
    pub fn new() -> Self {
        Self {
            submission: SubmissionState::new(),
            conversation: Conversation::new(),
            scroll: ScrollState::anchored(ScrollAnchor::Bottom),
        }
    }
}

impl Default for ChatViewState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct ConfigViewState {
    pub fields: Vec<(&'static str, String)>,
}

impl ConfigViewState {
    pub fn from_config(config: &TuiConfig) -> Self {
        let timeout = config
            .request_timeout_ms
            .map(|ms| format!("{} ms", ms))
            .unwrap_or_else(|| "none".to_string());
        Self {
            fields: vec![
                ("API base URL", config.base_url().to_string()),
                ("Request timeout", timeout),
                ("Default model", config.model().to_string()),
                ("Tunnel bypass", config.tunnel_bypass.to_string()),
                ("Tick rate", format!("{} ms", config.tick_rate_ms)),
                ("State file", config.persistence_path.display().to_string()),
                ("Log file", config.log_path.display().to_string()),
                ("Theme", config.theme.name.clone()),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ServerHealth {
    #[default]
    Unknown,
    Online(String),
    Offline(String),
}

#[derive(Debug, Clone)]
pub struct Modal {
    pub title: String,
    pub message: String,
}

// ============================================================================
// APP
// ============================================================================

/// The single state container. The renderer only reads it; every mutation
/// goes through the methods below.
#[derive(Debug, Clone)]
pub struct App {
    pub config: TuiConfig,
    pub theme: SynthBruteTheme,
    pub active_view: View,

    pub analysis: AnalysisViewState,
    pub chat: ChatViewState,
    pub config_view: ConfigViewState,

    pub notifications: Vec<Notification>,
    pub modal: Option<Modal>,
    pub server: ServerHealth,
    pub spinner_frame: usize,
}

impl App {
    pub fn new(config: TuiConfig) -> Self {
        let model = config.model();
        let config_view = ConfigViewState::from_config(&config);
        Self {
            config,
            theme: SynthBruteTheme::synthbrute(),
            active_view: View::Analysis,
            analysis: AnalysisViewState::new(model),
            chat: ChatViewState::new(),
            config_view,
            notifications: Vec::new(),
            modal: None,
            server: ServerHealth::Unknown,
            spinner_frame: 0,
        }
    }

    pub fn restore(&mut self, state: &PersistedState) {
        self.active_view = state.active_view;
        self.analysis.mode = state.mode;
        self.analysis.model = state.model;
    }

    pub fn snapshot(&self) -> PersistedState {
        PersistedState {
            active_view: self.active_view,
            mode: self.analysis.mode,
            model: self.analysis.model,
        }
    }

    /// Whether any view has a request outstanding.
    pub fn is_pending(&self) -> bool {
        self.analysis.submission.phase().is_pending() || self.chat.submission.phase().is_pending()
    }

    pub fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        self.notifications.push(Notification::new(level, message));
        if self.notifications.len() > MAX_NOTIFICATIONS {
            self.notifications.remove(0);
        }
    }

    pub fn tick(&mut self) {
        if self.is_pending() {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }
    }

    // ------------------------------------------------------------------------
    // Submission lifecycle
    // ------------------------------------------------------------------------

    /// Submit the active view's input.
    ///
    /// Returns the request to send, or `None` when the input is blank, the
    /// view takes no input, or a request is already outstanding. Everything
    /// observable (phase, cleared outcome, optimistic chat message) happens
    /// before this returns.
    pub fn submit(&mut self) -> Option<Dispatch> {
        if self.is_pending() {
            tracing::debug!(view = ?self.active_view, "Submission dropped: request already pending");
            return None;
        }
        if !self.active_view.is_interactive() {
            return None;
        }
        let dispatch = match self.active_view {
            View::Analysis => self.submit_analysis(),
            View::AgentChat => self.submit_chat(),
            View::ConfigViewer => None,
        }?;
        tracing::info!(
            request_id = %dispatch.ticket.request_id,
            operation = %dispatch.request.target(),
            view = ?dispatch.ticket.view,
            "Submission accepted"
        );
        Some(dispatch)
    }

    fn submit_analysis(&mut self) -> Option<Dispatch> {
        let view = &mut self.analysis;
        let topic = view.submission.submittable_text()?;
        let request = view.build_request(topic);
        view.submission.begin(&request);
        view.scroll.reveal_latest();
        Some(Dispatch {
            ticket: Ticket {
                request_id: request.request_id(),
                view: View::Analysis,
            },
            request,
        })
    }

    fn submit_chat(&mut self) -> Option<Dispatch> {
        let view = &mut self.chat;
        let question = view.submission.submittable_text()?;
        let request = Request::ask(question.clone());
        view.submission.begin(&request);
        view.submission.input.clear();
        view.conversation.append(Message::user(question));
        view.scroll.reveal_latest();
        Some(Dispatch {
            ticket: Ticket {
                request_id: request.request_id(),
                view: View::AgentChat,
            },
            request,
        })
    }

    /// Apply a settled request. Returns false if the ticket is not the one
    /// in flight for its view.
    pub fn settle(&mut self, settlement: Settlement) -> bool {
        let Settlement { ticket, outcome } = settlement;
        match &outcome {
            Ok(_) => tracing::info!(request_id = %ticket.request_id, "Request settled"),
            Err(err) => tracing::info!(
                request_id = %ticket.request_id,
                kind = %err.kind,
                error = %err,
                "Request settled with error"
            ),
        }
        match ticket.view {
            View::Analysis => {
                let view = &mut self.analysis;
                if !view.submission.settle(ticket.request_id, outcome) {
                    return self.ignore_stale(ticket);
                }
                view.scroll.reveal_latest();
            }
            View::AgentChat => {
                let message = match &outcome {
                    Ok(response) => Message::from_response(response),
                    Err(err) => Message::from_error(err),
                };
                let view = &mut self.chat;
                if !view.submission.settle(ticket.request_id, outcome) {
                    return self.ignore_stale(ticket);
                }
                view.conversation.append(message);
                view.scroll.reveal_latest();
            }
            View::ConfigViewer => return self.ignore_stale(ticket),
        }
        true
    }

    fn ignore_stale(&self, ticket: Ticket) -> bool {
        tracing::warn!(request_id = %ticket.request_id, view = ?ticket.view, "Ignoring settlement for unknown request");
        false
    }

    // ------------------------------------------------------------------------
    // Input editing
    // ------------------------------------------------------------------------

    fn active_submission_mut(&mut self) -> Option<&mut SubmissionState> {
        if !self.active_view.is_interactive() {
            return None;
        }
        match self.active_view {
            View::Analysis => Some(&mut self.analysis.submission),
            View::AgentChat => Some(&mut self.chat.submission),
            View::ConfigViewer => None,
        }
    }

    pub fn active_submission(&self) -> Option<&SubmissionState> {
        if !self.active_view.is_interactive() {
            return None;
        }
        match self.active_view {
            View::Analysis => Some(&self.analysis.submission),
            View::AgentChat => Some(&self.chat.submission),
            View::ConfigViewer => None,
        }
    }

    pub fn insert_char(&mut self, c: char) {
        if let Some(submission) = self.active_submission_mut() {
            submission.input.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(submission) = self.active_submission_mut() {
            submission.input.pop();
        }
    }

    pub fn clear_input(&mut self) {
        if let Some(submission) = self.active_submission_mut() {
            submission.input.clear();
        }
    }

    // ------------------------------------------------------------------------
    // Options, scrolling, chrome
    // ------------------------------------------------------------------------

    pub fn toggle_mode(&mut self) {
        if self.active_view == View::Analysis {
            self.analysis.mode = self.analysis.mode.toggle();
        }
    }

    pub fn cycle_model(&mut self) {
        if self.active_view == View::Analysis {
            self.analysis.model = self.analysis.model.next();
        }
    }

    fn active_scroll_mut(&mut self) -> Option<&mut ScrollState> {
        match self.active_view {
            View::Analysis => Some(&mut self.analysis.scroll),
            View::AgentChat => Some(&mut self.chat.scroll),
            View::ConfigViewer => None,
        }
    }

    pub fn scroll_up(&mut self, lines: u16) {
        if let Some(scroll) = self.active_scroll_mut() {
            scroll.line_up(lines);
        }
    }

    pub fn scroll_down(&mut self, lines: u16) {
        if let Some(scroll) = self.active_scroll_mut() {
            scroll.line_down(lines);
        }
    }

    pub fn follow_latest(&mut self) {
        if let Some(scroll) = self.active_scroll_mut() {
            scroll.reveal_latest();
        }
    }

    pub fn set_health(&mut self, status: Result<ServerStatus, ErrorInfo>) {
        match status {
            Ok(status) if status.is_ok() => {
                tracing::info!(message = %status.message, "Server reachable");
                self.notify(NotificationLevel::Success, "ATLAS server online");
                self.server = ServerHealth::Online(status.message);
            }
            Ok(status) => {
                tracing::warn!(status = %status.status, "Server reported unexpected status");
                self.server = ServerHealth::Offline(status.message.clone());
                self.notify(
                    NotificationLevel::Warning,
                    format!("Server status '{}': {}", status.status, status.message),
                );
            }
            Err(err) => {
                tracing::warn!(kind = %err.kind, error = %err, "Server unreachable");
                self.server = ServerHealth::Offline(err.message.clone());
                self.notify(NotificationLevel::Warning, format!("Server unreachable: {}", err));
            }
        }
    }

    pub fn open_help(&mut self) {
        self.modal = Some(Modal {
            title: "Keybindings".to_string(),
            message: crate::keys::HELP_TEXT.to_string(),
        });
    }

    /// Close the modal if one is open, otherwise clear notifications.
    pub fn dismiss(&mut self) {
        if self.modal.take().is_none() {
            self.notifications.clear();
        }
    }
}
