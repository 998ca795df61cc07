//! # Notification Payload
//!
//! Flattens one defendant's match into the document published to downstream
//! listeners. Absent optional values never appear as keys: no `null`, no
//! empty strings, no empty address object.

use pcm_core::{
    format_iso_date, Address, Defendant, DefendantId, MasterDefendantId, PcmError,
    ProsecutionCase, ProsecutionCaseId, Timestamp,
};
use serde::Serialize;

use crate::aggregator::{MatchDefendantSearchResult, MatchedCase, MatchedCaseDefendant};

/// Postal address with only the lines that are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationAddress {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address3: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address4: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address5: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
}

impl NotificationAddress {
    /// `None` when no line of the address carries a value.
    fn from_address(address: &Address) -> Option<Self> {
        let out = Self {
            address1: present(Some(address.address1.as_str())),
            address2: present(address.address2.as_deref()),
            address3: present(address.address3.as_deref()),
            address4: present(address.address4.as_deref()),
            address5: present(address.address5.as_deref()),
            postcode: present(address.postcode.as_deref()),
        };
        (out != Self::default()).then_some(out)
    }
}

/// A defendant on a sibling case, tagged with that case's identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedDefendantEntry {
    pub prosecution_case_id: ProsecutionCaseId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_reference: Option<String>,
    pub defendant_id: DefendantId,
    pub master_defendant_id: MasterDefendantId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub court_proceedings_initiated: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pnc_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cro_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<NotificationAddress>,
}

impl MatchedDefendantEntry {
    fn new(case: &MatchedCase, d: &MatchedCaseDefendant) -> Self {
        Self {
            prosecution_case_id: case.prosecution_case_id,
            case_reference: present(case.case_reference.as_deref()),
            defendant_id: d.defendant_id,
            master_defendant_id: d.effective_master_id(),
            court_proceedings_initiated: d.court_proceedings_initiated,
            first_name: present(d.first_name.as_deref()),
            middle_name: present(d.middle_name.as_deref()),
            last_name: present(d.last_name.as_deref()),
            date_of_birth: d.date_of_birth.as_ref().map(format_iso_date),
            pnc_id: present(d.pnc_id.as_deref()),
            cro_number: present(d.cro_number.as_deref()),
            address: d.address.as_ref().and_then(NotificationAddress::from_address),
        }
    }
}

/// The document announcing that a defendant matched earlier cases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DefendantMatchNotification {
    pub defendant_id: DefendantId,
    pub master_defendant_id: MasterDefendantId,
    pub prosecution_case_id: ProsecutionCaseId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub court_proceedings_initiated: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pnc_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cro_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<NotificationAddress>,
    pub matched_case_count: usize,
    pub matched_defendants: Vec<MatchedDefendantEntry>,
}

impl DefendantMatchNotification {
    pub fn to_json(&self) -> Result<serde_json::Value, PcmError> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Build the notification document for one defendant and its matched cases.
///
/// `matched_cases` are the sibling cases accepted for this defendant; every
/// defendant on each of them is listed.
pub fn to_notification_payload(
    defendant: &Defendant,
    prosecution_case: &ProsecutionCase,
    matched_cases: &[MatchedCase],
) -> DefendantMatchNotification {
    let matched_defendants = matched_cases
        .iter()
        .flat_map(|case| {
            case.defendants
                .iter()
                .map(move |d| MatchedDefendantEntry::new(case, d))
        })
        .collect();

    DefendantMatchNotification {
        defendant_id: defendant.id,
        master_defendant_id: defendant
            .master_defendant_id
            .unwrap_or(MasterDefendantId(*defendant.id.as_uuid())),
        prosecution_case_id: prosecution_case.id,
        case_reference: prosecution_case.case_reference().map(String::from),
        court_proceedings_initiated: defendant.court_proceedings_initiated,
        first_name: present(defendant.first_name()),
        middle_name: present(defendant.middle_name()),
        last_name: present(defendant.last_name()),
        date_of_birth: defendant.date_of_birth().as_ref().map(format_iso_date),
        pnc_id: present(defendant.pnc_id.as_deref()),
        cro_number: present(defendant.cro_number.as_deref()),
        address: defendant.address().and_then(NotificationAddress::from_address),
        matched_case_count: matched_cases.len(),
        matched_defendants,
    }
}

impl MatchDefendantSearchResult {
    /// Notification for a defendant using its strongest recorded matches,
    /// or `None` if the defendant was not matched.
    pub fn notification_for(
        &self,
        defendant: &Defendant,
        prosecution_case: &ProsecutionCase,
    ) -> Option<DefendantMatchNotification> {
        let confidence = self.confidence_of(&defendant.id)?;
        let cases = self.cases_for(&defendant.id, confidence);
        Some(to_notification_payload(defendant, prosecution_case, cases))
    }
}

fn present(value: Option<&str>) -> Option<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(String::from)
}
