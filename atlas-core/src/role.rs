//! Persona identifiers attached to debate and agent output.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of the persona that authored a piece of output.
///
/// Ids are snake_case on the wire (`tech_optimist`); [`RoleId::display_name`]
/// renders them for humans.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(String);

impl RoleId {
    /// Reserved role carried by chat messages that report a failure.
    pub const ERROR: &'static str = "error";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn error() -> Self {
        Self(Self::ERROR.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_error(&self) -> bool {
        self.0 == Self::ERROR
    }

    /// `tech_optimist` -> `Tech Optimist`.
    pub fn display_name(&self) -> String {
        self.0
            .split(['_', ' '])
            .filter(|word| !word.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => {
                        first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                    }
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoleId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RoleId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_title_cases_words() {
        assert_eq!(RoleId::new("tech_optimist").display_name(), "Tech Optimist");
        assert_eq!(RoleId::new("AI_ETHICIST").display_name(), "Ai Ethicist");
        assert_eq!(RoleId::new("moderator").display_name(), "Moderator");
        assert_eq!(RoleId::new("__").display_name(), "");
    }

    #[test]
    fn test_error_role() {
        assert!(RoleId::error().is_error());
        assert!(!RoleId::new("osint_analyst").is_error());
    }

    #[test]
    fn test_serde_transparent() {
        let role: RoleId = serde_json::from_str("\"bias_auditor\"").unwrap();
        assert_eq!(role.as_str(), "bias_auditor");
        assert_eq!(serde_json::to_string(&role).unwrap(), "\"bias_auditor\"");
    }
}
