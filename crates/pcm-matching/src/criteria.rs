//! # Criteria Sets
//!
//! One step of the sequencer: identity fields in composition order plus the
//! four fixed query parameters. A criteria set is built fresh for every step
//! and is never mutated after it is returned.
//!
//! Serialized as a single flat object:
//!
//! ```json
//! {"lastName":"Smith","pncId":"AB12/345678CD","pageSize":25,
//!  "proceedingsConcluded":false,"courtOrderValidityDate":"2026-10-17",
//!  "crownOrMagistrates":true}
//! ```

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::config::MatchingConfig;
use crate::snapshot::CriteriaField;
use crate::tier::TierKind;

pub const PAGE_SIZE_KEY: &str = "pageSize";
pub const PROCEEDINGS_CONCLUDED_KEY: &str = "proceedingsConcluded";
pub const COURT_ORDER_VALIDITY_DATE_KEY: &str = "courtOrderValidityDate";
pub const CROWN_OR_MAGISTRATES_KEY: &str = "crownOrMagistrates";

/// Search criteria produced by one sequencer step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CriteriaSet {
    kind: TierKind,
    tier_number: usize,
    sub_step: u8,
    fields: Vec<(CriteriaField, String)>,
    page_size: u32,
    proceedings_concluded: bool,
    court_order_validity_date: String,
    crown_or_magistrates: bool,
}

impl CriteriaSet {
    pub(crate) fn new(
        kind: TierKind,
        tier_number: usize,
        sub_step: u8,
        fields: Vec<(CriteriaField, String)>,
        config: &MatchingConfig,
        court_order_validity_date: String,
    ) -> Self {
        Self {
            kind,
            tier_number,
            sub_step,
            fields,
            page_size: config.page_size,
            proceedings_concluded: config.proceedings_concluded,
            court_order_validity_date,
            crown_or_magistrates: config.crown_or_magistrates,
        }
    }

    /// Kind of the tier that produced this set.
    pub fn kind(&self) -> TierKind {
        self.kind
    }

    /// 1-based position of the producing tier within its kind.
    pub fn tier_number(&self) -> usize {
        self.tier_number
    }

    /// 1-based sub-step within the tier.
    pub fn sub_step(&self) -> u8 {
        self.sub_step
    }

    /// Identity fields in composition order.
    pub fn fields(&self) -> &[(CriteriaField, String)] {
        &self.fields
    }

    /// Value of one identity field, if present in this set.
    pub fn get(&self, field: CriteriaField) -> Option<&str> {
        self.fields
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v.as_str())
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn proceedings_concluded(&self) -> bool {
        self.proceedings_concluded
    }

    pub fn court_order_validity_date(&self) -> &str {
        &self.court_order_validity_date
    }

    pub fn crown_or_magistrates(&self) -> bool {
        self.crown_or_magistrates
    }

    /// All parameters as ordered string pairs, for query-string searches.
    pub fn to_query_params(&self) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = self
            .fields
            .iter()
            .map(|(f, v)| (f.key().to_string(), v.clone()))
            .collect();
        params.push((PAGE_SIZE_KEY.to_string(), self.page_size.to_string()));
        params.push((
            PROCEEDINGS_CONCLUDED_KEY.to_string(),
            self.proceedings_concluded.to_string(),
        ));
        params.push((
            COURT_ORDER_VALIDITY_DATE_KEY.to_string(),
            self.court_order_validity_date.clone(),
        ));
        params.push((
            CROWN_OR_MAGISTRATES_KEY.to_string(),
            self.crown_or_magistrates.to_string(),
        ));
        params
    }
}

impl Serialize for CriteriaSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 4))?;
        for (field, value) in &self.fields {
            map.serialize_entry(field.key(), value)?;
        }
        map.serialize_entry(PAGE_SIZE_KEY, &self.page_size)?;
        map.serialize_entry(PROCEEDINGS_CONCLUDED_KEY, &self.proceedings_concluded)?;
        map.serialize_entry(COURT_ORDER_VALIDITY_DATE_KEY, &self.court_order_validity_date)?;
        map.serialize_entry(CROWN_OR_MAGISTRATES_KEY, &self.crown_or_magistrates)?;
        map.end()
    }
}
