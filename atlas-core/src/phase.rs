//! Submission lifecycle phase.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stage of a view's most recent submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed,
}

impl Phase {
    pub fn is_pending(&self) -> bool {
        matches!(self, Phase::Pending)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Phase::Idle => "Idle",
            Phase::Pending => "Working",
            Phase::Succeeded => "Done",
            Phase::Failed => "Failed",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
