//! # Criteria Subcommand
//!
//! Prints every criteria set the sequencer generates for one defendant
//! record, one JSON object per line.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, ValueEnum};
use pcm_core::Defendant;
use pcm_matching::{CriteriaSequencer, CriteriaSet, IdentitySnapshot, MatchingConfig, SystemClock};

/// Which tier tables to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindFilter {
    Exact,
    Partial,
    All,
}

/// Arguments for the `pcm criteria` subcommand.
#[derive(Args, Debug)]
pub struct CriteriaArgs {
    /// Defendant record (JSON).
    #[arg(long, value_name = "FILE")]
    pub defendant: PathBuf,

    /// Tier tables to print.
    #[arg(long, value_enum, default_value_t = KindFilter::All)]
    pub kind: KindFilter,
}

/// Execute the criteria subcommand.
///
/// Returns exit code: 0 when at least one criteria set was generated, 1 when
/// the record has no searchable identity.
pub fn run_criteria(args: &CriteriaArgs, config: &MatchingConfig) -> Result<u8> {
    let defendant: Defendant = crate::read_json(&args.defendant, "defendant record")?;
    let sets = generate(&defendant, args.kind, config);

    if sets.is_empty() {
        tracing::warn!(defendant_id = %defendant.id, "no searchable identity: zero criteria sets");
        return Ok(1);
    }
    for set in &sets {
        println!("{}", serde_json::to_string(set)?);
    }
    tracing::info!(count = sets.len(), "criteria sets generated");
    Ok(0)
}

/// Every criteria set for a defendant, exact tiers before partial.
pub fn generate(defendant: &Defendant, kind: KindFilter, config: &MatchingConfig) -> Vec<CriteriaSet> {
    let snapshot = IdentitySnapshot::from_defendant(defendant);
    let mut sequencer = CriteriaSequencer::with_clock(snapshot, config.clone(), SystemClock);
    let mut sets = Vec::new();
    if matches!(kind, KindFilter::Exact | KindFilter::All) {
        sets.extend(sequencer.exact_criteria());
    }
    if matches!(kind, KindFilter::Partial | KindFilter::All) {
        sets.extend(sequencer.partial_criteria());
    }
    sets
}
