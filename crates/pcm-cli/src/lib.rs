//! # pcm-cli: Prosecution Case Matching CLI
//!
//! ## Subcommands
//!
//! - `criteria`: print the criteria sets a defendant record would generate
//! - `match`: run tiered matching for a case against a fixture file of cases
//!
//! Handlers delegate to `pcm-matching`; no matching logic lives here.

pub mod criteria;
pub mod matching;

use std::path::Path;

use anyhow::{Context, Result};
use pcm_matching::MatchingConfig;
use serde::de::DeserializeOwned;

/// Load the matching configuration from a YAML file, or the defaults when
/// no file is given.
pub fn load_config(path: Option<&Path>) -> Result<MatchingConfig> {
    let Some(path) = path else {
        return Ok(MatchingConfig::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config = parse_config(&raw).with_context(|| format!("invalid config {}", path.display()))?;
    tracing::debug!(path = %path.display(), page_size = config.page_size, "loaded matching config");
    Ok(config)
}

/// Parse and validate a YAML matching configuration.
pub fn parse_config(yaml: &str) -> Result<MatchingConfig> {
    let config: MatchingConfig = if yaml.trim().is_empty() {
        MatchingConfig::default()
    } else {
        serde_yaml::from_str(yaml).context("failed to parse YAML")?
    };
    config.validate()?;
    Ok(config)
}

/// Read and deserialize a JSON file.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {what} {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {what} {}", path.display()))
}
