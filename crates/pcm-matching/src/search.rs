//! # Case Search Seam
//!
//! [`CaseSearch`] is the boundary to the external case-record index: it takes
//! one criteria set and returns candidate cases. [`InMemoryCaseSearch`]
//! evaluates criteria against a fixed list of cases, for fixtures, the CLI,
//! and tests.

use pcm_core::{format_iso_date, Defendant, ProsecutionCase};
use thiserror::Error;

use crate::aggregator::MatchedCase;
use crate::criteria::CriteriaSet;
use crate::snapshot::CriteriaField;

/// Failure of the search collaborator.
#[derive(Error, Debug)]
pub enum SearchError {
    /// The search service could not be reached or refused the request.
    #[error("case search unavailable: {0}")]
    Unavailable(String),

    /// The service rejected the criteria.
    #[error("case search rejected criteria: {0}")]
    Rejected(String),
}

/// Executes criteria sets against a case-record store.
pub trait CaseSearch {
    fn search(&self, criteria: &CriteriaSet) -> Result<Vec<MatchedCase>, SearchError>;
}

impl<T: CaseSearch + ?Sized> CaseSearch for &T {
    fn search(&self, criteria: &CriteriaSet) -> Result<Vec<MatchedCase>, SearchError> {
        (**self).search(criteria)
    }
}

/// Case search over cases held in memory.
///
/// A defendant matches when every identity field in the criteria equals the
/// defendant's value and its `proceedings_concluded` flag equals the
/// criteria's. Names and address lines compare case-insensitively; PNC and
/// CRO numbers compare verbatim. Only matching defendants are reported, and
/// at most `page_size` cases are returned. A criteria set without identity
/// fields is rejected rather than matching every defendant.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCaseSearch {
    cases: Vec<ProsecutionCase>,
}

impl InMemoryCaseSearch {
    pub fn new(cases: Vec<ProsecutionCase>) -> Self {
        Self { cases }
    }
}

impl CaseSearch for InMemoryCaseSearch {
    fn search(&self, criteria: &CriteriaSet) -> Result<Vec<MatchedCase>, SearchError> {
        if criteria.fields().is_empty() {
            return Err(SearchError::Rejected(format!(
                "{} tier {} carries no identity fields",
                criteria.kind(),
                criteria.tier_number()
            )));
        }
        let limit = usize::try_from(criteria.page_size()).unwrap_or(usize::MAX);
        let hits = self
            .cases
            .iter()
            .filter_map(|case| {
                let matching: Vec<&Defendant> = case
                    .defendants
                    .iter()
                    .filter(|d| defendant_matches(d, criteria))
                    .collect();
                (!matching.is_empty()).then(|| MatchedCase::from_case(case, matching))
            })
            .take(limit)
            .collect();
        Ok(hits)
    }
}

fn defendant_matches(defendant: &Defendant, criteria: &CriteriaSet) -> bool {
    if defendant.proceedings_concluded != criteria.proceedings_concluded() {
        return false;
    }
    criteria.fields().iter().all(|(field, wanted)| {
        let actual: Option<String> = match field {
            CriteriaField::PncId => defendant.pnc_id.clone(),
            CriteriaField::CroNumber => defendant.cro_number.clone(),
            CriteriaField::LastName => defendant.last_name().map(String::from),
            CriteriaField::FirstName => defendant.first_name().map(String::from),
            CriteriaField::DateOfBirth => defendant.date_of_birth().map(|d| format_iso_date(&d)),
            CriteriaField::AddressLine1 => defendant.address().map(|a| a.address1.clone()),
        };
        let Some(actual) = actual else {
            return false;
        };
        match field {
            CriteriaField::PncId | CriteriaField::CroNumber | CriteriaField::DateOfBirth => {
                actual.trim() == wanted.trim()
            }
            CriteriaField::LastName | CriteriaField::FirstName | CriteriaField::AddressLine1 => {
                actual.trim().to_lowercase() == wanted.trim().to_lowercase()
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FixedClock, MatchingConfig};
    use crate::sequencer::CriteriaSequencer;
    use crate::snapshot::IdentitySnapshot;
    use crate::tier::TierKind;
    use chrono::NaiveDate;
    use pcm_core::{CaseIdentifier, DefendantId, PersonDetails, ProsecutionCaseId};

    fn person(pnc: &str, last: &str) -> Defendant {
        let mut d = Defendant::new(DefendantId::new());
        d.pnc_id = Some(pnc.into());
        d.person_details = Some(PersonDetails {
            last_name: Some(last.into()),
            ..PersonDetails::default()
        });
        d
    }

    fn case(urn: &str, defendants: Vec<Defendant>) -> ProsecutionCase {
        ProsecutionCase {
            id: ProsecutionCaseId::new(),
            prosecution_case_identifier: CaseIdentifier {
                case_urn: Some(urn.into()),
                prosecution_authority_reference: None,
            },
            defendants,
        }
    }

    fn first_exact(snapshot: IdentitySnapshot, config: MatchingConfig) -> CriteriaSet {
        let clock = FixedClock(NaiveDate::from_ymd_opt(2026, 10, 17).unwrap());
        CriteriaSequencer::with_clock(snapshot, config, clock)
            .next_exact_criteria()
            .unwrap()
    }

    #[test]
    fn test_matches_on_all_fields() {
        let store = InMemoryCaseSearch::new(vec![
            case("URN1", vec![person("AB12/345678CD", "SMITH"), person("ZZ99/999999ZZ", "Smith")]),
            case("URN2", vec![person("AB12/345678CD", "Jones")]),
        ]);
        let snap = IdentitySnapshot::default()
            .with_pnc_id("AB12345678CD")
            .with_last_name("smith");
        let hits = store.search(&first_exact(snap, MatchingConfig::default())).unwrap();

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].case_reference.as_deref(), Some("URN1"));
        assert_eq!(hits[0].defendants.len(), 1);
    }

    #[test]
    fn test_concluded_proceedings_excluded() {
        let mut d = person("AB12/345678CD", "Smith");
        d.proceedings_concluded = true;
        let store = InMemoryCaseSearch::new(vec![case("URN1", vec![d])]);
        let snap = IdentitySnapshot::default()
            .with_pnc_id("AB12345678CD")
            .with_last_name("Smith");
        assert!(store.search(&first_exact(snap, MatchingConfig::default())).unwrap().is_empty());
    }

    #[test]
    fn test_page_size_limits_results() {
        let cases = (0..4)
            .map(|i| case(&format!("URN{i}"), vec![person("AB12/345678CD", "Smith")]))
            .collect();
        let store = InMemoryCaseSearch::new(cases);
        let snap = IdentitySnapshot::default()
            .with_pnc_id("AB12345678CD")
            .with_last_name("Smith");
        let config = MatchingConfig {
            page_size: 3,
            ..MatchingConfig::default()
        };
        assert_eq!(store.search(&first_exact(snap, config)).unwrap().len(), 3);
    }

    #[test]
    fn test_criteria_without_identity_fields_rejected() {
        let store = InMemoryCaseSearch::new(vec![case("URN1", vec![person("AB12/345678CD", "Smith")])]);
        let empty = CriteriaSet::new(
            TierKind::Partial,
            1,
            1,
            Vec::new(),
            &MatchingConfig::default(),
            "2026-10-17".into(),
        );
        let err = store.search(&empty).unwrap_err();
        assert!(matches!(err, SearchError::Rejected(_)));
    }

    #[test]
    fn test_missing_defendant_field_never_matches() {
        let d = Defendant::new(DefendantId::new());
        let store = InMemoryCaseSearch::new(vec![case("URN1", vec![d])]);
        let snap = IdentitySnapshot::default()
            .with_pnc_id("AB12345678CD")
            .with_last_name("Smith");
        assert!(store.search(&first_exact(snap, MatchingConfig::default())).unwrap().is_empty());
    }
}
