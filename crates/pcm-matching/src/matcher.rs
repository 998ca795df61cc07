//! # Defendant Matcher
//!
//! Drives one sequencer per defendant against a [`CaseSearch`]: exact tiers
//! first, then partial tiers, stopping at the first criteria set that returns
//! any case other than the defendant's own. Search errors propagate; retries
//! belong to the caller.

use pcm_core::{Defendant, ProsecutionCase, ProsecutionCaseId};

use crate::aggregator::{MatchAggregator, MatchConfidence, MatchedCase};
use crate::config::{Clock, MatchingConfig, SystemClock};
use crate::criteria::CriteriaSet;
use crate::outcome::{DefendantResolution, MatchedDefendant, UnmatchedDefendant};
use crate::search::{CaseSearch, SearchError};
use crate::sequencer::CriteriaSequencer;
use crate::snapshot::IdentitySnapshot;

/// Result of running the tiers for one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchAttempt {
    /// `None` when no tier produced a hit.
    pub confidence: Option<MatchConfidence>,
    pub cases: Vec<MatchedCase>,
    /// The criteria set that produced the hit.
    pub accepted: Option<CriteriaSet>,
    /// Number of criteria sets handed to the search.
    pub criteria_executed: usize,
}

impl MatchAttempt {
    fn unmatched(criteria_executed: usize) -> Self {
        Self {
            confidence: None,
            cases: Vec::new(),
            accepted: None,
            criteria_executed,
        }
    }
}

/// Runs matching attempts against a case search.
#[derive(Debug, Clone)]
pub struct DefendantMatcher<S, C = SystemClock> {
    search: S,
    config: MatchingConfig,
    clock: C,
}

impl<S: CaseSearch> DefendantMatcher<S, SystemClock> {
    pub fn new(search: S, config: MatchingConfig) -> Self {
        Self::with_clock(search, config, SystemClock)
    }
}

impl<S: CaseSearch, C: Clock + Clone> DefendantMatcher<S, C> {
    pub fn with_clock(search: S, config: MatchingConfig, clock: C) -> Self {
        Self {
            search,
            config,
            clock,
        }
    }

    /// Run exact then partial tiers for a snapshot. Hits on `own_case` are
    /// ignored.
    pub fn attempt(
        &self,
        snapshot: IdentitySnapshot,
        own_case: Option<ProsecutionCaseId>,
    ) -> Result<MatchAttempt, SearchError> {
        let mut sequencer =
            CriteriaSequencer::with_clock(snapshot, self.config.clone(), self.clock.clone());
        let mut executed = 0;

        for criteria in sequencer.exact_criteria() {
            executed += 1;
            let cases = self.run(&criteria, own_case)?;
            if !cases.is_empty() {
                return Ok(accept(MatchConfidence::Full, cases, criteria, executed));
            }
        }

        for criteria in sequencer.partial_criteria() {
            executed += 1;
            let cases = self.run(&criteria, own_case)?;
            if !cases.is_empty() {
                return Ok(accept(MatchConfidence::Partial, cases, criteria, executed));
            }
        }

        if executed == 0 {
            tracing::warn!(
                own_case = ?own_case,
                "no searchable identity: zero criteria sets generated"
            );
        } else {
            tracing::info!(criteria_executed = executed, "no matching defendant found");
        }
        Ok(MatchAttempt::unmatched(executed))
    }

    /// Match one defendant of a case, record any hit into `aggregator`, and
    /// return the resolution.
    pub fn resolve(
        &self,
        prosecution_case: &ProsecutionCase,
        defendant: &Defendant,
        aggregator: &mut MatchAggregator,
    ) -> Result<DefendantResolution, SearchError> {
        let snapshot = IdentitySnapshot::from_defendant(defendant);
        let attempt = self.attempt(snapshot, Some(prosecution_case.id))?;

        let Some(confidence) = attempt.confidence else {
            return Ok(DefendantResolution::Unmatched(UnmatchedDefendant {
                prosecution_case_id: prosecution_case.id,
                defendant_id: defendant.id,
            }));
        };

        let Some(first) = attempt.cases.first().and_then(|c| c.defendants.first()) else {
            return Ok(DefendantResolution::Unmatched(UnmatchedDefendant {
                prosecution_case_id: prosecution_case.id,
                defendant_id: defendant.id,
            }));
        };
        let matched = MatchedDefendant {
            prosecution_case_id: prosecution_case.id,
            defendant_id: defendant.id,
            master_defendant_id: first.effective_master_id(),
            court_proceedings_initiated: first.court_proceedings_initiated,
            confidence,
        };

        aggregator.record(defendant.id, attempt.cases, confidence);
        Ok(DefendantResolution::Matched(matched))
    }

    /// Resolve every defendant of a case, returning the resolutions and the
    /// aggregated matches.
    pub fn resolve_case(
        &self,
        prosecution_case: &ProsecutionCase,
    ) -> Result<(Vec<DefendantResolution>, crate::MatchDefendantSearchResult), SearchError> {
        let mut aggregator = MatchAggregator::new();
        let resolutions = prosecution_case
            .defendants
            .iter()
            .map(|d| self.resolve(prosecution_case, d, &mut aggregator))
            .collect::<Result<Vec<_>, _>>()?;
        Ok((resolutions, aggregator.build()))
    }

    fn run(
        &self,
        criteria: &CriteriaSet,
        own_case: Option<ProsecutionCaseId>,
    ) -> Result<Vec<MatchedCase>, SearchError> {
        let mut cases = self.search.search(criteria)?;
        if let Some(own) = own_case {
            cases.retain(|c| c.prosecution_case_id != own);
        }
        cases.retain(|c| !c.defendants.is_empty());
        Ok(cases)
    }
}

fn accept(
    confidence: MatchConfidence,
    cases: Vec<MatchedCase>,
    criteria: CriteriaSet,
    executed: usize,
) -> MatchAttempt {
    tracing::info!(
        confidence = ?confidence,
        tier = criteria.tier_number(),
        sub_step = criteria.sub_step(),
        cases = cases.len(),
        "defendant matched"
    );
    MatchAttempt {
        confidence: Some(confidence),
        cases,
        accepted: Some(criteria),
        criteria_executed: executed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FixedClock;
    use chrono::NaiveDate;
    use std::cell::RefCell;

    struct Recording {
        calls: RefCell<Vec<CriteriaSet>>,
        fail: bool,
    }

    impl CaseSearch for Recording {
        fn search(&self, criteria: &CriteriaSet) -> Result<Vec<MatchedCase>, SearchError> {
            self.calls.borrow_mut().push(criteria.clone());
            if self.fail {
                return Err(SearchError::Unavailable("index offline".into()));
            }
            Ok(Vec::new())
        }
    }

    fn clock() -> FixedClock {
        FixedClock(NaiveDate::from_ymd_opt(2026, 10, 17).unwrap())
    }

    #[test]
    fn test_runs_every_tier_when_nothing_matches() {
        let search = Recording {
            calls: RefCell::new(Vec::new()),
            fail: false,
        };
        let matcher = DefendantMatcher::with_clock(&search, MatchingConfig::default(), clock());
        let snap = IdentitySnapshot::default()
            .with_pnc_id("AB12345678CD")
            .with_last_name("Smith");
        let attempt = matcher.attempt(snap, None).unwrap();

        assert_eq!(attempt.confidence, None);
        // Exact PNC (2 sub-steps) + partial PNC (2 sub-steps).
        assert_eq!(attempt.criteria_executed, 4);
        assert_eq!(search.calls.borrow().len(), 4);
    }

    #[test]
    fn test_empty_snapshot_executes_nothing() {
        let search = Recording {
            calls: RefCell::new(Vec::new()),
            fail: false,
        };
        let matcher = DefendantMatcher::with_clock(&search, MatchingConfig::default(), clock());
        let attempt = matcher.attempt(IdentitySnapshot::default(), None).unwrap();
        assert_eq!(attempt.criteria_executed, 0);
        assert!(search.calls.borrow().is_empty());
    }

    #[test]
    fn test_search_error_propagates() {
        let search = Recording {
            calls: RefCell::new(Vec::new()),
            fail: true,
        };
        let matcher = DefendantMatcher::with_clock(&search, MatchingConfig::default(), clock());
        let snap = IdentitySnapshot::default().with_cro_number("123456/08X");
        let err = matcher.attempt(snap, None).unwrap_err();
        assert!(matches!(err, SearchError::Unavailable(_)));
        assert_eq!(search.calls.borrow().len(), 1);
    }
}
