//! # Match Aggregation
//!
//! Collects accepted search hits per defendant into two buckets: defendants
//! matched on an exact tier (full) and on a partial tier (partial).
//! [`MatchAggregator`] is the builder; [`MatchDefendantSearchResult`] is the
//! immutable result handed to notification logic.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use pcm_core::{
    Address, Defendant, DefendantId, MasterDefendantId, ProsecutionCase, ProsecutionCaseId,
    Timestamp,
};
use serde::{Deserialize, Serialize};

use crate::tier::TierKind;

/// How strongly a defendant was matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchConfidence {
    Full,
    Partial,
}

impl From<TierKind> for MatchConfidence {
    fn from(kind: TierKind) -> Self {
        match kind {
            TierKind::Exact => Self::Full,
            TierKind::Partial => Self::Partial,
        }
    }
}

/// A defendant on a candidate case returned by a search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedCaseDefendant {
    pub defendant_id: DefendantId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master_defendant_id: Option<MasterDefendantId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub court_proceedings_initiated: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pnc_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cro_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

impl MatchedCaseDefendant {
    pub fn from_defendant(defendant: &Defendant) -> Self {
        Self {
            defendant_id: defendant.id,
            master_defendant_id: defendant.master_defendant_id,
            court_proceedings_initiated: defendant.court_proceedings_initiated,
            first_name: defendant.first_name().map(String::from),
            middle_name: defendant.middle_name().map(String::from),
            last_name: defendant.last_name().map(String::from),
            date_of_birth: defendant.date_of_birth(),
            pnc_id: defendant.pnc_id.clone(),
            cro_number: defendant.cro_number.clone(),
            address: defendant.address().cloned(),
        }
    }

    /// The master defendant id, or the defendant's own id when none has
    /// been assigned yet.
    pub fn effective_master_id(&self) -> MasterDefendantId {
        self.master_defendant_id
            .unwrap_or(MasterDefendantId(*self.defendant_id.as_uuid()))
    }
}

/// A candidate case and the defendants on it that satisfied the criteria.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedCase {
    pub prosecution_case_id: ProsecutionCaseId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_reference: Option<String>,
    #[serde(default)]
    pub defendants: Vec<MatchedCaseDefendant>,
}

impl MatchedCase {
    /// Summarise a case, keeping only the given defendants.
    pub fn from_case<'a>(
        case: &ProsecutionCase,
        defendants: impl IntoIterator<Item = &'a Defendant>,
    ) -> Self {
        Self {
            prosecution_case_id: case.id,
            case_reference: case.case_reference().map(String::from),
            defendants: defendants
                .into_iter()
                .map(MatchedCaseDefendant::from_defendant)
                .collect(),
        }
    }
}

/// Builder for a [`MatchDefendantSearchResult`].
#[derive(Debug, Clone, Default)]
pub struct MatchAggregator {
    fully_matched: BTreeMap<DefendantId, Vec<MatchedCase>>,
    partially_matched: BTreeMap<DefendantId, Vec<MatchedCase>>,
}

impl MatchAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append cases to a defendant's bucket for the given confidence.
    ///
    /// Repeated calls accumulate in call order. An empty batch leaves the
    /// buckets untouched.
    pub fn record(
        &mut self,
        defendant_id: DefendantId,
        cases: impl IntoIterator<Item = MatchedCase>,
        confidence: MatchConfidence,
    ) -> &mut Self {
        let mut cases = cases.into_iter().peekable();
        if cases.peek().is_none() {
            return self;
        }
        let bucket = match confidence {
            MatchConfidence::Full => &mut self.fully_matched,
            MatchConfidence::Partial => &mut self.partially_matched,
        };
        bucket.entry(defendant_id).or_default().extend(cases);
        self
    }

    pub fn build(self) -> MatchDefendantSearchResult {
        MatchDefendantSearchResult {
            fully_matched: self.fully_matched,
            partially_matched: self.partially_matched,
        }
    }
}

/// Matched cases per defendant, split by confidence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDefendantSearchResult {
    fully_matched: BTreeMap<DefendantId, Vec<MatchedCase>>,
    partially_matched: BTreeMap<DefendantId, Vec<MatchedCase>>,
}

impl MatchDefendantSearchResult {
    pub fn builder() -> MatchAggregator {
        MatchAggregator::new()
    }

    pub fn fully_matched(&self) -> &BTreeMap<DefendantId, Vec<MatchedCase>> {
        &self.fully_matched
    }

    pub fn partially_matched(&self) -> &BTreeMap<DefendantId, Vec<MatchedCase>> {
        &self.partially_matched
    }

    /// Cases recorded for a defendant under one confidence.
    pub fn cases_for(&self, defendant_id: &DefendantId, confidence: MatchConfidence) -> &[MatchedCase] {
        let bucket = match confidence {
            MatchConfidence::Full => &self.fully_matched,
            MatchConfidence::Partial => &self.partially_matched,
        };
        bucket.get(defendant_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The strongest confidence recorded for a defendant.
    pub fn confidence_of(&self, defendant_id: &DefendantId) -> Option<MatchConfidence> {
        if self.fully_matched.contains_key(defendant_id) {
            Some(MatchConfidence::Full)
        } else if self.partially_matched.contains_key(defendant_id) {
            Some(MatchConfidence::Partial)
        } else {
            None
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fully_matched.is_empty() && self.partially_matched.is_empty()
    }
}
