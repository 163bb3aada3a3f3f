//! ATLAS Core - Client Data Types
//!
//! Pure data structures shared by the terminal client and its test utilities.
//! The only behavior here is construction, validation and wire decoding; the
//! view-state machine and all I/O live in `atlas-tui`.

use chrono::{DateTime, Utc};
use uuid::Uuid;

mod conversation;
mod error;
mod operation;
mod phase;
mod request;
mod response;
mod role;
mod transport;

pub use conversation::{Conversation, Message, Sender};
pub use error::{ErrorInfo, ErrorKind, ValidationError, GENERIC_ERROR_MESSAGE};
pub use operation::{ModelKey, OperationKind};
pub use phase::Phase;
pub use request::Request;
pub use response::{
    AnalyzeTopicBody, AskAgentBody, ErrorBody, Response, RunDebateBody, ServerStatus, Transcript,
    TranscriptEntry,
};
pub use role::RoleId;
pub use transport::Transport;

/// Entity identifier using UUIDv7 so ids sort by creation time.
pub type EntityId = Uuid;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Generate a new UUIDv7 EntityId (timestamp-sortable).
pub fn new_entity_id() -> EntityId {
    Uuid::now_v7()
}
