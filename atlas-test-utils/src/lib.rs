//! ATLAS Test Utilities
//!
//! Shared test infrastructure for the ATLAS workspace:
//! - A scripted mock transport that records every request
//! - Response and error fixtures matching the backend's bodies
//! - Proptest generators for inputs, models and report text

pub use atlas_core::{
    ErrorInfo, ErrorKind, ModelKey, OperationKind, Request, Response, RoleId, ServerStatus,
    Transcript, Transport, GENERIC_ERROR_MESSAGE,
};

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

// ============================================================================
// MOCK TRANSPORT
// ============================================================================

/// Transport double that replays scripted outcomes in order.
///
/// When the script runs dry it echoes an operation-appropriate success so
/// property tests can submit any number of times.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Debug, Default)]
struct MockState {
    script: VecDeque<Result<Response, ErrorInfo>>,
    requests: Vec<Request>,
    status: Option<Result<ServerStatus, ErrorInfo>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an outcome for the next `send`.
    pub fn push(&self, outcome: Result<Response, ErrorInfo>) -> &Self {
        self.lock().script.push_back(outcome);
        self
    }

    pub fn respond_with(self, response: Response) -> Self {
        self.push(Ok(response));
        self
    }

    pub fn fail_with(self, error: ErrorInfo) -> Self {
        self.push(Err(error));
        self
    }

    pub fn with_status(self, status: Result<ServerStatus, ErrorInfo>) -> Self {
        self.lock().status = Some(status);
        self
    }

    /// Number of `send` calls made so far.
    pub fn calls(&self) -> usize {
        self.lock().requests.len()
    }

    pub fn requests(&self) -> Vec<Request> {
        self.lock().requests.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: Request) -> Result<Response, ErrorInfo> {
        let mut state = self.lock();
        let target = request.target();
        let echo = request.primary_text().unwrap_or_default().to_string();
        state.requests.push(request);
        state
            .script
            .pop_front()
            .unwrap_or_else(|| Ok(echo_response(target, &echo)))
    }

    async fn status(&self) -> Result<ServerStatus, ErrorInfo> {
        self.lock().status.clone().unwrap_or_else(|| Ok(welcome_status()))
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub fn analysis_report(body: impl Into<String>) -> Response {
    Response::AnalysisReport { body: body.into() }
}

/// Two-debater report shaped like the backend's `run_debate` output.
pub fn debate_report() -> Response {
    let transcript: Transcript = vec![
        (
            RoleId::new("tech_optimist"),
            "1. Opening\nAutomation expands what people can do.".to_string(),
        ),
        (
            RoleId::new("ai_ethicist"),
            "1. Opening\nUnchecked automation concentrates power.".to_string(),
        ),
    ]
    .into_iter()
    .collect();
    Response::DebateReport {
        synthesis: "1. Summary\nBoth sides agree oversight matters.".to_string(),
        transcript,
        audit: "No significant bias detected.".to_string(),
    }
}

pub fn agent_reply(text: impl Into<String>, role: Option<&str>) -> Response {
    Response::AgentReply {
        text: text.into(),
        role: role.map(RoleId::new),
    }
}

pub fn welcome_status() -> ServerStatus {
    ServerStatus {
        status: "success".to_string(),
        message: "Welcome to the ATLAS API Server!".to_string(),
    }
}

/// Raw JSON body the backend sends for a successful `analyze_topic`.
pub fn analyze_topic_json(report: &str) -> String {
    serde_json::json!({ "status": "success", "osint_report": report }).to_string()
}

/// Raw JSON error body as produced by the backend's error handlers.
pub fn error_json(message: &str) -> String {
    serde_json::json!({ "status": "error", "message": message }).to_string()
}

fn echo_response(target: OperationKind, text: &str) -> Response {
    match target {
        OperationKind::Analyze => analysis_report(format!("1. Topic\n{}", text)),
        OperationKind::Debate => debate_report(),
        OperationKind::Ask => agent_reply(format!("You asked: {}", text), Some("moderator")),
    }
}

// ============================================================================
// GENERATORS
// ============================================================================

pub mod generators {
    use super::*;
    use proptest::prelude::*;

    /// Input text with at least one visible character.
    pub fn arb_input_text() -> impl Strategy<Value = String> {
        "[ ]{0,3}[A-Za-z0-9?][A-Za-z0-9 ?,.]{0,40}"
    }

    /// Whitespace-only input, including the empty string.
    pub fn arb_blank_text() -> impl Strategy<Value = String> {
        "[ \t\n]{0,8}"
    }

    pub fn arb_model() -> impl Strategy<Value = ModelKey> {
        prop::sample::select(ModelKey::all().to_vec())
    }

    pub fn arb_form_operation() -> impl Strategy<Value = OperationKind> {
        prop::sample::select(vec![OperationKind::Analyze, OperationKind::Debate])
    }

    pub fn arb_error() -> impl Strategy<Value = ErrorInfo> {
        prop_oneof![
            "[a-z ]{1,20}".prop_map(|m| ErrorInfo::network(m)),
            (400u16..600, "[a-z ]{0,20}").prop_map(|(s, m)| ErrorInfo::http(s, m)),
            "[a-z ]{1,20}".prop_map(|m| ErrorInfo::decode(m)),
        ]
    }

    /// Success or failure outcome for a chat request.
    pub fn arb_chat_outcome() -> impl Strategy<Value = Result<Response, ErrorInfo>> {
        prop_oneof![
            ("[A-Za-z ]{1,30}", prop::option::of("[a-z_]{1,12}"))
                .prop_map(|(text, role)| Ok(agent_reply(text, role.as_deref()))),
            arb_error().prop_map(Err),
        ]
    }

    /// Multi-line report text mixing numbered headings, prose and blanks.
    pub fn arb_report_text() -> impl Strategy<Value = String> {
        prop::collection::vec(
            prop_oneof![
                (1u8..20, "[A-Za-z ]{1,20}").prop_map(|(n, t)| format!("{}. {}", n, t)),
                "[A-Za-z][A-Za-z ,]{0,30}",
                Just(String::new()),
            ],
            0..12,
        )
        .prop_map(|lines| lines.join("\n"))
    }
}
