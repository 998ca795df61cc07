//! # Resolution Outcomes
//!
//! What a matching attempt concluded for one defendant. Created once the
//! caller accepts a hit or exhausts every tier; never mutated afterwards.

use pcm_core::{DefendantId, MasterDefendantId, ProsecutionCaseId, Timestamp};
use serde::{Deserialize, Serialize};

use crate::aggregator::MatchConfidence;

/// A defendant linked to a person already known from earlier cases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedDefendant {
    pub prosecution_case_id: ProsecutionCaseId,
    pub defendant_id: DefendantId,
    pub master_defendant_id: MasterDefendantId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub court_proceedings_initiated: Option<Timestamp>,
    pub confidence: MatchConfidence,
}

/// A defendant for whom no tier produced a hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnmatchedDefendant {
    pub prosecution_case_id: ProsecutionCaseId,
    pub defendant_id: DefendantId,
}

/// Outcome of one matching attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DefendantResolution {
    Matched(MatchedDefendant),
    Unmatched(UnmatchedDefendant),
}

impl DefendantResolution {
    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched(_))
    }

    pub fn defendant_id(&self) -> DefendantId {
        match self {
            Self::Matched(m) => m.defendant_id,
            Self::Unmatched(u) => u.defendant_id,
        }
    }
}
