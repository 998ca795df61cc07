//! # Prosecution Case Records
//!
//! The subset of a prosecution case that defendant matching reads: the case
//! reference and, per defendant, the identity fields used to build search
//! criteria and notification documents.
//!
//! All records use camelCase on the wire and omit absent optional fields.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::identity::{DefendantId, MasterDefendantId, ProsecutionCaseId};
use crate::temporal::Timestamp;

/// References that identify a case to the prosecuting authority and court.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseIdentifier {
    /// Unique reference number assigned by the police/CPS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_urn: Option<String>,
    /// Reference used by non-police prosecuting authorities.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prosecution_authority_reference: Option<String>,
}

impl CaseIdentifier {
    /// The case URN if present, else the prosecuting-authority reference.
    pub fn reference(&self) -> Option<&str> {
        non_blank(self.case_urn.as_deref())
            .or_else(|| non_blank(self.prosecution_authority_reference.as_deref()))
    }
}

/// A postal address. Only `address1` is mandatory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub address1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address3: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address4: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address5: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
}

/// Personal details of an individual defendant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

/// A defendant on a prosecution case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Defendant {
    pub id: DefendantId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master_defendant_id: Option<MasterDefendantId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub court_proceedings_initiated: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person_details: Option<PersonDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pnc_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cro_number: Option<String>,
    /// Whether all proceedings against this defendant have concluded.
    #[serde(default)]
    pub proceedings_concluded: bool,
}

impl Defendant {
    /// A defendant with only an id; every other field absent.
    pub fn new(id: DefendantId) -> Self {
        Self {
            id,
            master_defendant_id: None,
            court_proceedings_initiated: None,
            person_details: None,
            pnc_id: None,
            cro_number: None,
            proceedings_concluded: false,
        }
    }

    pub fn first_name(&self) -> Option<&str> {
        self.person_details.as_ref()?.first_name.as_deref()
    }

    pub fn middle_name(&self) -> Option<&str> {
        self.person_details.as_ref()?.middle_name.as_deref()
    }

    pub fn last_name(&self) -> Option<&str> {
        self.person_details.as_ref()?.last_name.as_deref()
    }

    pub fn date_of_birth(&self) -> Option<NaiveDate> {
        self.person_details.as_ref()?.date_of_birth
    }

    pub fn address(&self) -> Option<&Address> {
        self.person_details.as_ref()?.address.as_ref()
    }
}

/// A prosecution case and its defendants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProsecutionCase {
    pub id: ProsecutionCaseId,
    #[serde(default)]
    pub prosecution_case_identifier: CaseIdentifier,
    #[serde(default)]
    pub defendants: Vec<Defendant>,
}

impl ProsecutionCase {
    /// The case URN if present, else the prosecuting-authority reference.
    pub fn case_reference(&self) -> Option<&str> {
        self.prosecution_case_identifier.reference()
    }

    /// Look up a defendant on this case.
    pub fn defendant(&self, id: &DefendantId) -> Option<&Defendant> {
        self.defendants.iter().find(|d| &d.id == id)
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|v| !v.trim().is_empty())
}
