//! # Identity Snapshot
//!
//! The identity attributes of one incoming defendant, captured once per
//! matching attempt. Blank values are treated exactly like absent ones.

use pcm_core::{format_iso_date, Defendant};
use serde::{Deserialize, Serialize};

/// A searchable identity attribute. The serialized name is the criteria key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CriteriaField {
    PncId,
    CroNumber,
    LastName,
    FirstName,
    DateOfBirth,
    AddressLine1,
}

impl CriteriaField {
    /// The key used for this field in criteria sets.
    pub fn key(&self) -> &'static str {
        match self {
            Self::PncId => "pncId",
            Self::CroNumber => "croNumber",
            Self::LastName => "lastName",
            Self::FirstName => "firstName",
            Self::DateOfBirth => "dateOfBirth",
            Self::AddressLine1 => "addressLine1",
        }
    }
}

impl std::fmt::Display for CriteriaField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Read-only identity input to a [`CriteriaSequencer`](crate::CriteriaSequencer).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentitySnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pnc_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cro_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// ISO date (`yyyy-MM-dd`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line1: Option<String>,
}

impl IdentitySnapshot {
    /// Capture the identity attributes of a defendant record.
    pub fn from_defendant(defendant: &Defendant) -> Self {
        Self {
            pnc_id: defendant.pnc_id.clone(),
            cro_number: defendant.cro_number.clone(),
            last_name: defendant.last_name().map(String::from),
            first_name: defendant.first_name().map(String::from),
            date_of_birth: defendant.date_of_birth().map(|d| format_iso_date(&d)),
            address_line1: defendant.address().map(|a| a.address1.clone()),
        }
    }

    /// The value of a field, or `None` if absent or blank.
    pub fn value(&self, field: CriteriaField) -> Option<&str> {
        let raw = match field {
            CriteriaField::PncId => &self.pnc_id,
            CriteriaField::CroNumber => &self.cro_number,
            CriteriaField::LastName => &self.last_name,
            CriteriaField::FirstName => &self.first_name,
            CriteriaField::DateOfBirth => &self.date_of_birth,
            CriteriaField::AddressLine1 => &self.address_line1,
        };
        raw.as_deref().filter(|v| !v.trim().is_empty())
    }

    /// Whether the field has a usable value.
    pub fn has(&self, field: CriteriaField) -> bool {
        self.value(field).is_some()
    }

    pub fn with_pnc_id(mut self, v: impl Into<String>) -> Self {
        self.pnc_id = Some(v.into());
        self
    }

    pub fn with_cro_number(mut self, v: impl Into<String>) -> Self {
        self.cro_number = Some(v.into());
        self
    }

    pub fn with_last_name(mut self, v: impl Into<String>) -> Self {
        self.last_name = Some(v.into());
        self
    }

    pub fn with_first_name(mut self, v: impl Into<String>) -> Self {
        self.first_name = Some(v.into());
        self
    }

    pub fn with_date_of_birth(mut self, v: impl Into<String>) -> Self {
        self.date_of_birth = Some(v.into());
        self
    }

    pub fn with_address_line1(mut self, v: impl Into<String>) -> Self {
        self.address_line1 = Some(v.into());
        self
    }
}
