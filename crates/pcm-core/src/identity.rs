//! # Case and Defendant Identifiers
//!
//! Newtype wrappers for the identifiers that flow through matching. A
//! defendant has its own id within a case, and a master defendant id that
//! links the same person across cases once a match has been accepted.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PcmError;

/// Identifier of a prosecution case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProsecutionCaseId(pub Uuid);

/// Identifier of a defendant within one prosecution case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DefendantId(pub Uuid);

/// Identifier shared by every defendant record that refers to the same person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MasterDefendantId(pub Uuid);

impl ProsecutionCaseId {
    /// Generate a new random case identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse from the hyphenated UUID form.
    pub fn parse(s: &str) -> Result<Self, PcmError> {
        parse_uuid(s, "prosecution case id").map(Self)
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl DefendantId {
    /// Generate a new random defendant identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse from the hyphenated UUID form.
    pub fn parse(s: &str) -> Result<Self, PcmError> {
        parse_uuid(s, "defendant id").map(Self)
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl MasterDefendantId {
    /// Generate a new random master defendant identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ProsecutionCaseId {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for DefendantId {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for MasterDefendantId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ProsecutionCaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for DefendantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for MasterDefendantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn parse_uuid(s: &str, what: &str) -> Result<Uuid, PcmError> {
    Uuid::parse_str(s.trim())
        .map_err(|e| PcmError::SchemaValidation(format!("invalid {what} {s:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_distinct() {
        assert_ne!(DefendantId::new(), DefendantId::new());
    }

    #[test]
    fn test_display_is_bare_uuid() {
        let uuid = Uuid::new_v4();
        assert_eq!(DefendantId(uuid).to_string(), uuid.to_string());
        assert_eq!(ProsecutionCaseId(uuid).to_string(), uuid.to_string());
    }

    #[test]
    fn test_parse_roundtrip() {
        let id = ProsecutionCaseId::new();
        let parsed = ProsecutionCaseId::parse(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = DefendantId::parse("not-a-uuid").unwrap_err();
        assert!(err.to_string().contains("defendant id"));
    }

    #[test]
    fn test_serde_is_transparent() {
        let uuid = Uuid::new_v4();
        let json = serde_json::to_string(&MasterDefendantId(uuid)).unwrap();
        assert_eq!(json, format!("\"{uuid}\""));
    }
}
