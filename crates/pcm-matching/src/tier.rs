//! # Criteria Tiers
//!
//! Static, ordered rules describing which identity fields each search step
//! requires. Exact tiers carry a very low false-positive risk and always
//! require the last name; partial tiers are looser and are only consulted
//! once every exact tier is exhausted.

use serde::{Deserialize, Serialize};

use crate::snapshot::{CriteriaField, IdentitySnapshot};

/// Confidence class of a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TierKind {
    Exact,
    Partial,
}

impl std::fmt::Display for TierKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact => f.write_str("EXACT"),
            Self::Partial => f.write_str("PARTIAL"),
        }
    }
}

/// One search rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CriteriaTier {
    pub kind: TierKind,
    /// Fields the tier declares, in composition order.
    pub fields: &'static [CriteriaField],
    /// Last name is required and composed ahead of `fields`.
    pub requires_last_name: bool,
    /// The tier searches by PNC id alone and tries both canonical layouts.
    pub has_format_variants: bool,
}

/// Exact tiers, in order.
pub static EXACT_TIERS: [CriteriaTier; 3] = [
    CriteriaTier {
        kind: TierKind::Exact,
        fields: &[CriteriaField::PncId],
        requires_last_name: true,
        has_format_variants: true,
    },
    CriteriaTier {
        kind: TierKind::Exact,
        fields: &[CriteriaField::CroNumber],
        requires_last_name: true,
        has_format_variants: false,
    },
    CriteriaTier {
        kind: TierKind::Exact,
        fields: &[
            CriteriaField::FirstName,
            CriteriaField::DateOfBirth,
            CriteriaField::AddressLine1,
        ],
        requires_last_name: true,
        has_format_variants: false,
    },
];

/// Partial tiers, in order.
pub static PARTIAL_TIERS: [CriteriaTier; 5] = [
    CriteriaTier {
        kind: TierKind::Partial,
        fields: &[CriteriaField::PncId],
        requires_last_name: false,
        has_format_variants: true,
    },
    CriteriaTier {
        kind: TierKind::Partial,
        fields: &[CriteriaField::CroNumber],
        requires_last_name: false,
        has_format_variants: false,
    },
    CriteriaTier {
        kind: TierKind::Partial,
        fields: &[
            CriteriaField::DateOfBirth,
            CriteriaField::AddressLine1,
            CriteriaField::LastName,
        ],
        requires_last_name: false,
        has_format_variants: false,
    },
    CriteriaTier {
        kind: TierKind::Partial,
        fields: &[CriteriaField::DateOfBirth, CriteriaField::LastName],
        requires_last_name: false,
        has_format_variants: false,
    },
    CriteriaTier {
        kind: TierKind::Partial,
        fields: &[CriteriaField::DateOfBirth, CriteriaField::AddressLine1],
        requires_last_name: false,
        has_format_variants: false,
    },
];

impl TierKind {
    /// The ordered tiers of this kind.
    pub fn tiers(&self) -> &'static [CriteriaTier] {
        match self {
            Self::Exact => &EXACT_TIERS,
            Self::Partial => &PARTIAL_TIERS,
        }
    }
}

impl CriteriaTier {
    /// Every field the tier needs, in composition order.
    pub fn required_fields(&self) -> impl Iterator<Item = CriteriaField> + '_ {
        let last_name = self.requires_last_name.then_some(CriteriaField::LastName);
        last_name.into_iter().chain(self.fields.iter().copied())
    }

    /// Required fields that are absent or blank on the snapshot.
    pub fn missing_fields(&self, snapshot: &IdentitySnapshot) -> Vec<CriteriaField> {
        self.required_fields()
            .filter(|f| !snapshot.has(*f))
            .collect()
    }
}
