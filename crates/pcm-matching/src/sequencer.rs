//! # Criteria Sequencer
//!
//! A finite-state cursor over the exact and partial tier tables. Each pull
//! yields the next criteria set for one tier and sub-step:
//!
//! ```text
//!            ┌────────────── tier satisfied? ──── no ──▶ skip (next tier, sub-step 1)
//!            │                    │
//!  cursor ───┤                   yes
//!            │                    ▼
//!            │      emit(tier, sub-step) ──▶ sub-step < total ? sub-step+1 : next tier
//!            │
//!            └──── past last tier ──▶ exhausted
//! ```
//!
//! The cursor is settled eagerly: after construction and after every step
//! it rests on a tier the snapshot satisfies, or past the end. So
//! `has_more_*` is true exactly when the next call will produce a set, and a
//! snapshot with no usable fields reports no steps at all before any call.
//!
//! A lazily settled cursor would only discover trailing unsatisfiable tiers
//! on the call after the last set, returning nothing there and only then
//! reporting no more steps. Here that discovery happens as part of the call
//! that returns the last set. For a PNC-and-surname snapshot,
//! `has_more_exact_steps()` is already false after the second exact set; a
//! third call still returns `None`. Loops driven by `has_more_*` or by
//! `next_*` returning `None` see the same sequence of sets either way.
//!
//! ## PNC Sub-Steps
//!
//! A tier flagged `has_format_variants` whose PNC id is in either canonical
//! layout runs two sub-steps: first the id converted to the other layout,
//! then the id as recorded. An unrecognised PNC id gives a single sub-step
//! with the raw value.
//!
//! ## Lifetime
//!
//! One sequencer per matching attempt. The sequence cannot be restarted;
//! build a new sequencer from the same snapshot to run it again.

use std::iter::FusedIterator;

use pcm_core::{pnc, PncFormat};
use serde::Serialize;

use crate::config::{Clock, MatchingConfig, SystemClock};
use crate::criteria::CriteriaSet;
use crate::snapshot::{CriteriaField, IdentitySnapshot};
use crate::tier::{CriteriaTier, TierKind};

/// Position of one tier cursor. Tier index and sub-steps are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierPosition {
    pub tier_index: usize,
    pub sub_step: u8,
    pub total_sub_steps: u8,
}

/// Progress of a sequencer through both tier tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SequencerState {
    pub exact: TierPosition,
    pub partial: TierPosition,
}

#[derive(Debug, Clone)]
struct TierCursor {
    tiers: &'static [CriteriaTier],
    /// 0-based; `tiers.len()` once exhausted.
    index: usize,
    sub_step: u8,
    total_sub_steps: u8,
}

impl TierCursor {
    fn new(kind: TierKind) -> Self {
        Self {
            tiers: kind.tiers(),
            index: 0,
            sub_step: 1,
            total_sub_steps: 1,
        }
    }

    fn current(&self) -> Option<&'static CriteriaTier> {
        self.tiers.get(self.index)
    }

    fn is_exhausted(&self) -> bool {
        self.index >= self.tiers.len()
    }

    fn advance_tier(&mut self) {
        self.index += 1;
        self.sub_step = 1;
        self.total_sub_steps = 1;
    }

    /// Move past unsatisfiable tiers and size the sub-steps of the tier the
    /// cursor lands on.
    fn settle(&mut self, snapshot: &IdentitySnapshot) {
        while let Some(tier) = self.current() {
            let missing = tier.missing_fields(snapshot);
            if missing.is_empty() {
                if self.sub_step == 1 {
                    self.total_sub_steps = sub_step_count(tier, snapshot);
                }
                return;
            }
            tracing::debug!(
                kind = %tier.kind,
                tier = self.index + 1,
                missing = ?missing,
                "criteria tier skipped"
            );
            self.advance_tier();
        }
    }

    /// Take the current (tier, sub-step) and move the cursor on.
    fn step(&mut self, snapshot: &IdentitySnapshot) -> Option<(&'static CriteriaTier, usize, u8)> {
        self.settle(snapshot);
        let tier = self.current()?;
        let taken = (tier, self.index + 1, self.sub_step);
        if self.sub_step < self.total_sub_steps {
            self.sub_step += 1;
        } else {
            self.advance_tier();
        }
        self.settle(snapshot);
        Some(taken)
    }

    fn position(&self) -> TierPosition {
        TierPosition {
            tier_index: self.index + 1,
            sub_step: self.sub_step,
            total_sub_steps: self.total_sub_steps,
        }
    }
}

fn sub_step_count(tier: &CriteriaTier, snapshot: &IdentitySnapshot) -> u8 {
    let ambiguous = tier.has_format_variants
        && snapshot
            .value(CriteriaField::PncId)
            .map(|id| PncFormat::classify(id).has_alternate())
            .unwrap_or(false);
    if ambiguous {
        2
    } else {
        1
    }
}

/// Generates exact-tier and partial-tier criteria for one identity snapshot.
#[derive(Debug, Clone)]
pub struct CriteriaSequencer<C = SystemClock> {
    snapshot: IdentitySnapshot,
    config: MatchingConfig,
    clock: C,
    exact: TierCursor,
    partial: TierCursor,
}

impl CriteriaSequencer<SystemClock> {
    /// A sequencer with the default configuration and the system clock.
    pub fn new(snapshot: IdentitySnapshot) -> Self {
        Self::with_clock(snapshot, MatchingConfig::default(), SystemClock)
    }
}

impl<C: Clock> CriteriaSequencer<C> {
    /// A sequencer with an explicit configuration and clock.
    pub fn with_clock(snapshot: IdentitySnapshot, config: MatchingConfig, clock: C) -> Self {
        let mut exact = TierCursor::new(TierKind::Exact);
        let mut partial = TierCursor::new(TierKind::Partial);
        exact.settle(&snapshot);
        partial.settle(&snapshot);
        Self {
            snapshot,
            config,
            clock,
            exact,
            partial,
        }
    }

    pub fn snapshot(&self) -> &IdentitySnapshot {
        &self.snapshot
    }

    /// Whether another exact criteria set remains.
    pub fn has_more_exact_steps(&self) -> bool {
        !self.exact.is_exhausted()
    }

    /// Whether another partial criteria set remains.
    pub fn has_more_partial_steps(&self) -> bool {
        !self.partial.is_exhausted()
    }

    /// The next exact criteria set, or `None` once exact tiers are exhausted.
    pub fn next_exact_criteria(&mut self) -> Option<CriteriaSet> {
        let (tier, number, sub_step) = self.exact.step(&self.snapshot)?;
        Some(self.compose(tier, number, sub_step))
    }

    /// The next partial criteria set, or `None` once partial tiers are exhausted.
    pub fn next_partial_criteria(&mut self) -> Option<CriteriaSet> {
        let (tier, number, sub_step) = self.partial.step(&self.snapshot)?;
        Some(self.compose(tier, number, sub_step))
    }

    /// Drain the remaining exact criteria lazily.
    pub fn exact_criteria(&mut self) -> CriteriaIter<'_, C> {
        CriteriaIter {
            sequencer: self,
            kind: TierKind::Exact,
        }
    }

    /// Drain the remaining partial criteria lazily.
    pub fn partial_criteria(&mut self) -> CriteriaIter<'_, C> {
        CriteriaIter {
            sequencer: self,
            kind: TierKind::Partial,
        }
    }

    /// Current cursor positions.
    pub fn state(&self) -> SequencerState {
        SequencerState {
            exact: self.exact.position(),
            partial: self.partial.position(),
        }
    }

    fn compose(&self, tier: &CriteriaTier, tier_number: usize, sub_step: u8) -> CriteriaSet {
        let fields: Vec<(CriteriaField, String)> = tier
            .required_fields()
            .filter_map(|field| {
                self.field_value(tier, field, sub_step)
                    .map(|value| (field, value))
            })
            .collect();

        // Recomputed on every set, not frozen at the start of the attempt.
        let validity_date = self.config.format_date(self.clock.today());

        tracing::debug!(
            kind = %tier.kind,
            tier = tier_number,
            sub_step,
            fields = fields.len(),
            "criteria set generated"
        );

        CriteriaSet::new(
            tier.kind,
            tier_number,
            sub_step,
            fields,
            &self.config,
            validity_date,
        )
    }

    fn field_value(&self, tier: &CriteriaTier, field: CriteriaField, sub_step: u8) -> Option<String> {
        let raw = self.snapshot.value(field)?;
        if field == CriteriaField::PncId && tier.has_format_variants && sub_step == 1 {
            if let Some(alternate) = pnc::alternate_form(raw) {
                return Some(alternate);
            }
        }
        Some(raw.to_string())
    }
}

/// Lazy view over one tier kind of a sequencer.
#[derive(Debug)]
pub struct CriteriaIter<'a, C> {
    sequencer: &'a mut CriteriaSequencer<C>,
    kind: TierKind,
}

impl<C: Clock> Iterator for CriteriaIter<'_, C> {
    type Item = CriteriaSet;

    fn next(&mut self) -> Option<CriteriaSet> {
        match self.kind {
            TierKind::Exact => self.sequencer.next_exact_criteria(),
            TierKind::Partial => self.sequencer.next_partial_criteria(),
        }
    }
}

impl<C: Clock> FusedIterator for CriteriaIter<'_, C> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FixedClock;
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn sequencer(snapshot: IdentitySnapshot) -> CriteriaSequencer<FixedClock> {
        CriteriaSequencer::with_clock(snapshot, MatchingConfig::default(), FixedClock(today()))
    }

    fn full_snapshot() -> IdentitySnapshot {
        IdentitySnapshot::default()
            .with_pnc_id("AB12345678CD")
            .with_cro_number("123456/08X")
            .with_last_name("Smith")
            .with_first_name("Jane")
            .with_date_of_birth("1980-01-09")
            .with_address_line1("1 High Street")
    }

    fn keys(set: &CriteriaSet) -> Vec<CriteriaField> {
        set.fields().iter().map(|(f, _)| *f).collect()
    }

    #[test]
    fn test_exact_tier_order_with_all_fields() {
        let mut seq = sequencer(full_snapshot());
        let sets: Vec<CriteriaSet> = seq.exact_criteria().collect();

        assert_eq!(sets.len(), 4);
        assert_eq!(keys(&sets[0]), vec![CriteriaField::LastName, CriteriaField::PncId]);
        assert_eq!(keys(&sets[1]), vec![CriteriaField::LastName, CriteriaField::PncId]);
        assert_eq!(keys(&sets[2]), vec![CriteriaField::LastName, CriteriaField::CroNumber]);
        assert_eq!(
            keys(&sets[3]),
            vec![
                CriteriaField::LastName,
                CriteriaField::FirstName,
                CriteriaField::DateOfBirth,
                CriteriaField::AddressLine1,
            ]
        );
        assert!(!seq.has_more_exact_steps());
    }

    #[test]
    fn test_partial_tier_order_with_all_fields() {
        let mut seq = sequencer(full_snapshot());
        let sets: Vec<CriteriaSet> = seq.partial_criteria().collect();
        let tiers: Vec<(usize, u8)> = sets.iter().map(|s| (s.tier_number(), s.sub_step())).collect();
        assert_eq!(tiers, vec![(1, 1), (1, 2), (2, 1), (3, 1), (4, 1), (5, 1)]);
        assert_eq!(keys(&sets[0]), vec![CriteriaField::PncId]);
        assert_eq!(
            keys(&sets[3]),
            vec![CriteriaField::DateOfBirth, CriteriaField::AddressLine1, CriteriaField::LastName]
        );
        assert_eq!(keys(&sets[4]), vec![CriteriaField::DateOfBirth, CriteriaField::LastName]);
        assert_eq!(keys(&sets[5]), vec![CriteriaField::DateOfBirth, CriteriaField::AddressLine1]);
    }

    #[test]
    fn test_exact_and_partial_are_independent() {
        let mut seq = sequencer(full_snapshot());
        assert!(seq.next_exact_criteria().is_some());
        let first_partial = seq.next_partial_criteria().unwrap();
        assert_eq!(first_partial.tier_number(), 1);
        assert_eq!(seq.state().exact.sub_step, 2);
    }

    #[test]
    fn test_spi_pnc_tries_cjs_then_original() {
        let mut seq = sequencer(full_snapshot());
        let first = seq.next_exact_criteria().unwrap();
        let second = seq.next_exact_criteria().unwrap();
        assert_eq!(first.get(CriteriaField::PncId), Some("AB12/345678CD"));
        assert_eq!(second.get(CriteriaField::PncId), Some("AB12345678CD"));
        assert_eq!((first.sub_step(), second.sub_step()), (1, 2));
    }

    #[test]
    fn test_cjs_pnc_tries_spi_then_original() {
        let snap = IdentitySnapshot::default()
            .with_pnc_id("AB12/345678CD")
            .with_last_name("Smith");
        let mut seq = sequencer(snap);
        let first = seq.next_exact_criteria().unwrap();
        let second = seq.next_exact_criteria().unwrap();
        assert_eq!(first.get(CriteriaField::PncId), Some("AB12345678CD"));
        assert_eq!(second.get(CriteriaField::PncId), Some("AB12/345678CD"));
        assert!(!seq.has_more_exact_steps());
    }

    #[test]
    fn test_unrecognised_pnc_single_sub_step() {
        let snap = IdentitySnapshot::default()
            .with_pnc_id("12345")
            .with_last_name("Smith");
        let mut seq = sequencer(snap);
        let only = seq.next_exact_criteria().unwrap();
        assert_eq!(only.get(CriteriaField::PncId), Some("12345"));
        assert_eq!(only.sub_step(), 1);
        assert!(!seq.has_more_exact_steps());
        assert!(seq.next_exact_criteria().is_none());
    }

    #[test]
    fn test_missing_last_name_skips_every_exact_tier() {
        let snap = full_snapshot();
        let snap = IdentitySnapshot {
            last_name: None,
            ..snap
        };
        let seq = sequencer(snap);
        assert!(!seq.has_more_exact_steps());
        assert!(seq.has_more_partial_steps());
    }

    #[test]
    fn test_skipped_tier_makes_next_tier_reachable() {
        let snap = IdentitySnapshot::default()
            .with_cro_number("123456/08X")
            .with_last_name("Smith");
        let mut seq = sequencer(snap);
        let first = seq.next_exact_criteria().unwrap();
        assert_eq!(first.tier_number(), 2);
        assert_eq!(first.get(CriteriaField::CroNumber), Some("123456/08X"));
    }

    #[test]
    fn test_empty_snapshot_has_no_steps() {
        let mut seq = sequencer(IdentitySnapshot::default());
        assert!(!seq.has_more_exact_steps());
        assert!(!seq.has_more_partial_steps());
        assert!(seq.next_exact_criteria().is_none());
        assert!(seq.next_partial_criteria().is_none());
    }

    #[test]
    fn test_defaults_on_every_set() {
        let mut seq = sequencer(full_snapshot());
        let mut sets: Vec<CriteriaSet> = seq.exact_criteria().collect();
        sets.extend(seq.partial_criteria());
        assert_eq!(sets.len(), 10);
        for set in &sets {
            assert_eq!(set.page_size(), 25);
            assert!(!set.proceedings_concluded());
            assert!(set.crown_or_magistrates());
            assert_eq!(set.court_order_validity_date(), "2026-10-17");
        }
    }

    #[test]
    fn test_validity_date_follows_clock_per_call() {
        #[derive(Debug)]
        struct Ticking(std::cell::Cell<u32>);
        impl Clock for Ticking {
            fn today(&self) -> NaiveDate {
                let day = self.0.get();
                self.0.set(day + 1);
                NaiveDate::from_ymd_opt(2026, 10, day).unwrap()
            }
        }

        let mut seq = CriteriaSequencer::with_clock(
            full_snapshot(),
            MatchingConfig::default(),
            Ticking(std::cell::Cell::new(17)),
        );
        let a = seq.next_exact_criteria().unwrap();
        let b = seq.next_exact_criteria().unwrap();
        assert_eq!(a.court_order_validity_date(), "2026-10-17");
        assert_eq!(b.court_order_validity_date(), "2026-10-18");
    }

    #[test]
    fn test_state_tracks_sub_steps() {
        let mut seq = sequencer(full_snapshot());
        assert_eq!(
            seq.state().exact,
            TierPosition {
                tier_index: 1,
                sub_step: 1,
                total_sub_steps: 2
            }
        );
        seq.next_exact_criteria();
        assert_eq!(seq.state().exact.sub_step, 2);
        seq.next_exact_criteria();
        assert_eq!(
            seq.state().exact,
            TierPosition {
                tier_index: 2,
                sub_step: 1,
                total_sub_steps: 1
            }
        );
    }

    #[test]
    fn test_config_values_flow_into_sets() {
        let config = MatchingConfig {
            page_size: 5,
            proceedings_concluded: true,
            crown_or_magistrates: false,
            date_format: "%d/%m/%Y".to_string(),
        };
        let mut seq = CriteriaSequencer::with_clock(full_snapshot(), config, FixedClock(today()));
        let set = seq.next_partial_criteria().unwrap();
        assert_eq!(set.page_size(), 5);
        assert!(set.proceedings_concluded());
        assert!(!set.crown_or_magistrates());
        assert_eq!(set.court_order_validity_date(), "17/10/2026");
    }
}
