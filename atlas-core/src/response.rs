//! Backend response bodies and the normalized [`Response`] they decode into.

use crate::operation::OperationKind;
use crate::role::RoleId;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ============================================================================
// WIRE BODIES
// ============================================================================

/// `POST /analyze_topic` success body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeTopicBody {
    pub osint_report: String,
}

/// `POST /run_debate` success body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunDebateBody {
    pub final_synthesis: String,
    pub debate_transcript: Transcript,
    pub audit_report: String,
}

/// `POST /ask_agent` success body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskAgentBody {
    pub response: String,
    #[serde(default)]
    pub chosen_role: Option<RoleId>,
}

/// Error body returned with a non-2xx status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// The message if the body carried a non-blank one.
    pub fn usable_message(&self) -> Option<&str> {
        self.message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }
}

/// `GET /` welcome body, used as a reachability check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerStatus {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

impl ServerStatus {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("success")
    }
}

// ============================================================================
// TRANSCRIPT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub role: RoleId,
    pub text: String,
}

/// Debate statements keyed by role, in the order the server sent them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Transcript(Vec<TranscriptEntry>);

impl Transcript {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Insert or replace the statement for `role`, keeping first-seen order.
    pub fn insert(&mut self, role: RoleId, text: impl Into<String>) {
        let text = text.into();
        if let Some(existing) = self.0.iter_mut().find(|e| e.role == role) {
            existing.text = text;
        } else {
            self.0.push(TranscriptEntry { role, text });
        }
    }

    pub fn get(&self, role: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.role.as_str() == role)
            .map(|e| e.text.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &TranscriptEntry> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(RoleId, String)> for Transcript {
    fn from_iter<I: IntoIterator<Item = (RoleId, String)>>(iter: I) -> Self {
        let mut transcript = Transcript::new();
        for (role, text) in iter {
            transcript.insert(role, text);
        }
        transcript
    }
}

impl Serialize for Transcript {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for entry in &self.0 {
            map.serialize_entry(&entry.role, &entry.text)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Transcript {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TranscriptVisitor;

        impl<'de> Visitor<'de> for TranscriptVisitor {
            type Value = Transcript;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of role ids to statements")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut transcript = Transcript::new();
                while let Some((role, text)) = access.next_entry::<RoleId, String>()? {
                    transcript.insert(role, text);
                }
                Ok(transcript)
            }
        }

        deserializer.deserialize_map(TranscriptVisitor)
    }
}

// ============================================================================
// NORMALIZED RESPONSE
// ============================================================================

/// Successful result of a submission, polymorphic over the operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    AnalysisReport {
        body: String,
    },
    DebateReport {
        synthesis: String,
        transcript: Transcript,
        audit: String,
    },
    AgentReply {
        text: String,
        role: Option<RoleId>,
    },
}

impl Response {
    /// Decode a success body for `operation`.
    pub fn decode(operation: OperationKind, body: &str) -> Result<Self, serde_json::Error> {
        let response = match operation {
            OperationKind::Analyze => serde_json::from_str::<AnalyzeTopicBody>(body)?.into(),
            OperationKind::Debate => serde_json::from_str::<RunDebateBody>(body)?.into(),
            OperationKind::Ask => serde_json::from_str::<AskAgentBody>(body)?.into(),
        };
        Ok(response)
    }

    pub fn operation(&self) -> OperationKind {
        match self {
            Response::AnalysisReport { .. } => OperationKind::Analyze,
            Response::DebateReport { .. } => OperationKind::Debate,
            Response::AgentReply { .. } => OperationKind::Ask,
        }
    }

    /// The text a chat bubble shows for this response.
    pub fn primary_text(&self) -> &str {
        match self {
            Response::AnalysisReport { body } => body,
            Response::DebateReport { synthesis, .. } => synthesis,
            Response::AgentReply { text, .. } => text,
        }
    }

    pub fn role(&self) -> Option<&RoleId> {
        match self {
            Response::AgentReply { role, .. } => role.as_ref(),
            _ => None,
        }
    }
}

impl From<AnalyzeTopicBody> for Response {
    fn from(body: AnalyzeTopicBody) -> Self {
        Response::AnalysisReport {
            body: body.osint_report,
        }
    }
}

impl From<RunDebateBody> for Response {
    fn from(body: RunDebateBody) -> Self {
        Response::DebateReport {
            synthesis: body.final_synthesis,
            transcript: body.debate_transcript,
            audit: body.audit_report,
        }
    }
}

impl From<AskAgentBody> for Response {
    fn from(body: AskAgentBody) -> Self {
        Response::AgentReply {
            text: body.response,
            role: body.chosen_role,
        }
    }
}
