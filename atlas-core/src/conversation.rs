//! Chat messages and the append-only conversation log.

use crate::error::ErrorInfo;
use crate::response::Response;
use crate::role::RoleId;
use crate::{new_entity_id, EntityId, Timestamp};
use chrono::Utc;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// One chat entry. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: EntityId,
    pub text: String,
    pub sender: Sender,
    pub role: Option<RoleId>,
    pub created_at: Timestamp,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text.into(), None)
    }

    pub fn bot(text: impl Into<String>, role: Option<RoleId>) -> Self {
        Self::new(Sender::Bot, text.into(), role)
    }

    /// Bot message carrying a response.
    pub fn from_response(response: &Response) -> Self {
        Self::bot(response.primary_text(), response.role().cloned())
    }

    /// Bot message reporting a failure, tagged with the `error` role.
    pub fn from_error(error: &ErrorInfo) -> Self {
        Self::bot(error.message.clone(), Some(RoleId::error()))
    }

    fn new(sender: Sender, text: String, role: Option<RoleId>) -> Self {
        Self {
            id: new_entity_id(),
            text,
            sender,
            role,
            created_at: Utc::now(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.role.as_ref().is_some_and(RoleId::is_error)
    }
}

/// Ordered chat log. Entries can only be appended; insertion order is
/// display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: Message) -> &Message {
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_preserves_order() {
        let mut conversation = Conversation::new();
        conversation.append(Message::user("first"));
        conversation.append(Message::bot("second", None));
        conversation.append(Message::user("third"));
        let texts: Vec<_> = conversation.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
        assert_eq!(conversation.last().map(|m| m.sender), Some(Sender::User));
    }

    #[test]
    fn test_error_message_has_error_role() {
        let msg = Message::from_error(&ErrorInfo::network("connection refused"));
        assert_eq!(msg.sender, Sender::Bot);
        assert!(msg.is_error());
        assert_eq!(msg.text, "connection refused");
    }

    #[test]
    fn test_response_message_carries_role() {
        let response = Response::AgentReply {
            text: "Consider both sides.".to_string(),
            role: Some(RoleId::new("moderator")),
        };
        let msg = Message::from_response(&response);
        assert_eq!(msg.role, Some(RoleId::new("moderator")));
        assert!(!msg.is_error());
    }
}
