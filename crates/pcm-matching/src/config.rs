//! # Matching Configuration
//!
//! The fixed query parameters merged into every criteria set, and the clock
//! that supplies the court-order validity date. Both are owned by the
//! sequencer rather than held in module-level statics.

use std::fmt::Write as _;

use chrono::format::{Item, StrftimeItems};
use chrono::{Local, NaiveDate};
use pcm_core::ISO_DATE_FORMAT;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of results requested per search.
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// Errors in a matching configuration.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Page size must be at least 1.
    #[error("page_size must be greater than zero")]
    ZeroPageSize,

    /// Date format is empty or contains an unknown specifier.
    #[error("invalid date_format {0:?}")]
    InvalidDateFormat(String),
}

/// Query parameters applied to every criteria set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatchingConfig {
    /// Maximum number of candidate cases per search.
    pub page_size: u32,
    /// Whether to search cases whose proceedings have concluded.
    pub proceedings_concluded: bool,
    /// Whether to search both Crown and magistrates' court records.
    pub crown_or_magistrates: bool,
    /// `strftime` pattern for `courtOrderValidityDate`.
    pub date_format: String,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            proceedings_concluded: false,
            crown_or_magistrates: true,
            date_format: ISO_DATE_FORMAT.to_string(),
        }
    }
}

impl MatchingConfig {
    /// Check the configuration for values that would produce unusable criteria.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        let bad_format = self.date_format.trim().is_empty()
            || StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error));
        if bad_format {
            return Err(ConfigError::InvalidDateFormat(self.date_format.clone()));
        }
        Ok(())
    }

    /// Render a date with the configured format, falling back to
    /// `yyyy-MM-dd` if the pattern cannot be rendered.
    pub fn format_date(&self, date: NaiveDate) -> String {
        let mut out = String::new();
        if write!(out, "{}", date.format(&self.date_format)).is_err() {
            return pcm_core::format_iso_date(&date);
        }
        out
    }
}

/// Source of the current calendar date.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// The local system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock pinned to one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
