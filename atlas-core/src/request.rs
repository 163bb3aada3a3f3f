//! Outbound request construction.

use crate::error::ValidationError;
use crate::operation::{ModelKey, OperationKind};
use crate::{new_entity_id, EntityId};
use std::collections::BTreeMap;

/// A single submission to the backend.
///
/// Built fresh for every submit and never mutated afterwards; fields are
/// private so the payload cannot change once a request exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    request_id: EntityId,
    target: OperationKind,
    payload: BTreeMap<String, String>,
}

impl Request {
    /// Build a request from raw payload fields.
    pub fn new(target: OperationKind, payload: BTreeMap<String, String>) -> Self {
        Self {
            request_id: new_entity_id(),
            target,
            payload,
        }
    }

    /// Build the request for `target` carrying the user's text. The model is
    /// only attached for operations that accept one.
    pub fn for_operation(target: OperationKind, text: impl Into<String>, model: ModelKey) -> Self {
        let mut payload = BTreeMap::new();
        payload.insert(target.primary_field().to_string(), text.into());
        if target.accepts_model() {
            payload.insert("model".to_string(), model.as_str().to_string());
        }
        Self::new(target, payload)
    }

    pub fn analyze(topic: impl Into<String>, model: ModelKey) -> Self {
        Self::for_operation(OperationKind::Analyze, topic, model)
    }

    pub fn debate(topic: impl Into<String>, model: ModelKey) -> Self {
        Self::for_operation(OperationKind::Debate, topic, model)
    }

    pub fn ask(question: impl Into<String>) -> Self {
        Self::for_operation(OperationKind::Ask, question, ModelKey::default())
    }

    pub fn request_id(&self) -> EntityId {
        self.request_id
    }

    pub fn target(&self) -> OperationKind {
        self.target
    }

    pub fn payload(&self) -> &BTreeMap<String, String> {
        &self.payload
    }

    /// The user's text: `topic` or `question` depending on the target.
    pub fn primary_text(&self) -> Option<&str> {
        self.payload
            .get(self.target.primary_field())
            .map(String::as_str)
    }

    /// Check that the primary text field is present and not blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let field = self.target.primary_field();
        match self.payload.get(field) {
            None => Err(ValidationError::RequiredFieldMissing {
                field: field.to_string(),
            }),
            Some(text) if text.trim().is_empty() => Err(ValidationError::BlankField {
                field: field.to_string(),
            }),
            Some(_) => Ok(()),
        }
    }

    /// JSON body sent to the backend.
    pub fn body(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.payload
                .iter()
                .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
                .collect(),
        )
    }
}
