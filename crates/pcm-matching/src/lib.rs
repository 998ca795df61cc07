//! # pcm-matching: Progressive Defendant Identity Matching
//!
//! Locates the same real-world person among previously recorded prosecution
//! cases, given partial identity data from an incoming defendant record.
//!
//! ## Components
//!
//! - **Sequencer** (`sequencer.rs`): turns an [`IdentitySnapshot`] into an
//!   ordered, finite, non-restartable sequence of [`CriteriaSet`]s. Exact
//!   tiers first, then partial tiers. Tiers whose required fields are absent
//!   are skipped. The PNC-only tiers try both canonical PNC layouts.
//!
//! - **Aggregator** (`aggregator.rs`): folds accepted search hits into a
//!   [`MatchDefendantSearchResult`] with separate full and partial buckets.
//!
//! - **Payload** (`payload.rs`): flattens one defendant's match into the
//!   notification document handed to event publishing.
//!
//! - **Search seam** (`search.rs`, `matcher.rs`): the [`CaseSearch`] trait
//!   for the external case index, an in-memory implementation, and
//!   [`DefendantMatcher`], which drives the tiers against a search and stops
//!   at the first tier that returns hits.
//!
//! ## Tier Order
//!
//! ```text
//! EXACT   (always + lastName)      PARTIAL
//! 1  pncId                         1  pncId
//! 2  croNumber                     2  croNumber
//! 3  firstName dateOfBirth         3  dateOfBirth addressLine1 lastName
//!    addressLine1                  4  dateOfBirth lastName
//!                                  5  dateOfBirth addressLine1
//! ```
//!
//! ## Crate Policy
//!
//! - Sequencer and aggregator perform no I/O and never return errors.
//! - One sequencer per matching attempt; sequencers are not shared.

pub mod aggregator;
pub mod config;
pub mod criteria;
pub mod matcher;
pub mod outcome;
pub mod payload;
pub mod search;
pub mod sequencer;
pub mod snapshot;
pub mod tier;

pub use aggregator::{
    MatchAggregator, MatchConfidence, MatchDefendantSearchResult, MatchedCase,
    MatchedCaseDefendant,
};
pub use config::{Clock, ConfigError, FixedClock, MatchingConfig, SystemClock};
pub use criteria::CriteriaSet;
pub use matcher::{DefendantMatcher, MatchAttempt};
pub use outcome::{DefendantResolution, MatchedDefendant, UnmatchedDefendant};
pub use payload::{
    to_notification_payload, DefendantMatchNotification, MatchedDefendantEntry, NotificationAddress,
};
pub use search::{CaseSearch, InMemoryCaseSearch, SearchError};
pub use sequencer::{CriteriaIter, CriteriaSequencer, SequencerState, TierPosition};
pub use snapshot::{CriteriaField, IdentitySnapshot};
pub use tier::{CriteriaTier, TierKind, EXACT_TIERS, PARTIAL_TIERS};
