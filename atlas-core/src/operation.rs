//! Backend operations and the hosted models they can run on.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which backend capability a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// Single-analyst OSINT report.
    Analyze,
    /// Multi-persona debate with bias audit and synthesis.
    Debate,
    /// Free-form question routed to an agent persona.
    Ask,
}

impl OperationKind {
    /// Endpoint path relative to the backend base URL.
    pub fn path(&self) -> &'static str {
        match self {
            OperationKind::Analyze => "/analyze_topic",
            OperationKind::Debate => "/run_debate",
            OperationKind::Ask => "/ask_agent",
        }
    }

    /// Name of the payload field that carries the user's text.
    pub fn primary_field(&self) -> &'static str {
        match self {
            OperationKind::Analyze | OperationKind::Debate => "topic",
            OperationKind::Ask => "question",
        }
    }

    /// Whether the backend accepts a `model` field for this operation.
    pub fn accepts_model(&self) -> bool {
        !matches!(self, OperationKind::Ask)
    }

    pub fn label(&self) -> &'static str {
        match self {
            OperationKind::Analyze => "Analyze",
            OperationKind::Debate => "Debate",
            OperationKind::Ask => "Ask",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Model keys accepted by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKey {
    #[default]
    Llama3,
    Mistral,
    Gemma,
    Phi3,
}

impl ModelKey {
    pub fn all() -> &'static [ModelKey] {
        &[
            ModelKey::Llama3,
            ModelKey::Mistral,
            ModelKey::Gemma,
            ModelKey::Phi3,
        ]
    }

    /// Key sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKey::Llama3 => "llama3",
            ModelKey::Mistral => "mistral",
            ModelKey::Gemma => "gemma",
            ModelKey::Phi3 => "phi3",
        }
    }

    pub fn next(&self) -> ModelKey {
        let all = Self::all();
        let idx = all.iter().position(|m| m == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }
}

impl fmt::Display for ModelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|m| m.as_str() == key)
            .ok_or_else(|| format!("Model '{}' not supported.", s.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_paths() {
        assert_eq!(OperationKind::Analyze.path(), "/analyze_topic");
        assert_eq!(OperationKind::Debate.path(), "/run_debate");
        assert_eq!(OperationKind::Ask.path(), "/ask_agent");
    }

    #[test]
    fn test_only_ask_omits_model() {
        assert!(OperationKind::Analyze.accepts_model());
        assert!(OperationKind::Debate.accepts_model());
        assert!(!OperationKind::Ask.accepts_model());
    }

    #[test]
    fn test_model_cycle_wraps() {
        let mut model = ModelKey::default();
        for _ in 0..ModelKey::all().len() {
            model = model.next();
        }
        assert_eq!(model, ModelKey::Llama3);
    }

    #[test]
    fn test_model_from_str() {
        assert_eq!(" Gemma ".parse::<ModelKey>(), Ok(ModelKey::Gemma));
        let err = "gpt4".parse::<ModelKey>().unwrap_err();
        assert!(err.contains("gpt4"));
    }

    #[test]
    fn test_model_serde_matches_wire_key() {
        for model in ModelKey::all() {
            let json = serde_json::to_string(model).unwrap();
            assert_eq!(json, format!("\"{}\"", model.as_str()));
        }
    }
}
