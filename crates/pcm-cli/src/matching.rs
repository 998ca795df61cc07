//! # Match Subcommand
//!
//! Runs tiered matching for the defendants of one case against a fixture
//! file of previously recorded cases, printing each resolution and, for
//! matched defendants, the notification document.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use pcm_core::{DefendantId, ProsecutionCase};
use pcm_matching::{DefendantMatcher, InMemoryCaseSearch, MatchAggregator, MatchingConfig};

/// Arguments for the `pcm match` subcommand.
#[derive(Args, Debug)]
pub struct MatchArgs {
    /// Incoming prosecution case (JSON).
    #[arg(long = "case", value_name = "FILE")]
    pub case: PathBuf,

    /// Previously recorded cases to search (JSON array).
    #[arg(long, value_name = "FILE")]
    pub cases: PathBuf,

    /// Match only this defendant of the incoming case.
    #[arg(long)]
    pub defendant_id: Option<String>,
}

/// Execute the match subcommand.
///
/// Returns exit code: 0 if any defendant matched, 1 otherwise.
pub fn run_match(args: &MatchArgs, config: &MatchingConfig) -> Result<u8> {
    let incoming: ProsecutionCase = crate::read_json(&args.case, "prosecution case")?;
    let recorded: Vec<ProsecutionCase> = crate::read_json(&args.cases, "case fixtures")?;
    tracing::info!(case_id = %incoming.id, recorded = recorded.len(), "loaded cases");

    let defendants = match &args.defendant_id {
        Some(raw) => {
            let id = DefendantId::parse(raw)?;
            match incoming.defendant(&id) {
                Some(d) => vec![d.clone()],
                None => bail!("defendant {id} is not on case {}", incoming.id),
            }
        }
        None => incoming.defendants.clone(),
    };

    let matcher = DefendantMatcher::new(InMemoryCaseSearch::new(recorded), config.clone());
    let mut aggregator = MatchAggregator::new();
    let mut resolutions = Vec::with_capacity(defendants.len());
    for defendant in &defendants {
        resolutions.push(matcher.resolve(&incoming, defendant, &mut aggregator)?);
    }
    let result = aggregator.build();

    let mut any_matched = false;
    for (defendant, resolution) in defendants.iter().zip(&resolutions) {
        println!("{}", serde_json::to_string(resolution)?);
        if let Some(notification) = result.notification_for(defendant, &incoming) {
            any_matched = true;
            println!("{}", serde_json::to_string_pretty(&notification)?);
        }
    }

    Ok(if any_matched { 0 } else { 1 })
}
