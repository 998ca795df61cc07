//! # Matcher Flows
//!
//! Tier-by-tier matching against an in-memory case store, from defendant
//! record through to the notification document.

use chrono::NaiveDate;
use pcm_core::{
    Address, CaseIdentifier, Defendant, DefendantId, MasterDefendantId, PersonDetails,
    ProsecutionCase, ProsecutionCaseId, Timestamp,
};
use pcm_matching::{
    DefendantMatcher, DefendantResolution, FixedClock, InMemoryCaseSearch, MatchAggregator,
    MatchConfidence, MatchingConfig,
};

fn clock() -> FixedClock {
    FixedClock(NaiveDate::from_ymd_opt(2026, 10, 17).unwrap())
}

struct Person<'a> {
    first: &'a str,
    last: &'a str,
    dob: Option<(i32, u32, u32)>,
    address1: Option<&'a str>,
    pnc: Option<&'a str>,
    cro: Option<&'a str>,
}

fn defendant(p: Person<'_>) -> Defendant {
    let mut d = Defendant::new(DefendantId::new());
    d.pnc_id = p.pnc.map(String::from);
    d.cro_number = p.cro.map(String::from);
    d.person_details = Some(PersonDetails {
        first_name: Some(p.first.into()),
        middle_name: None,
        last_name: Some(p.last.into()),
        date_of_birth: p.dob.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
        address: p.address1.map(|a| Address {
            address1: a.into(),
            ..Address::default()
        }),
    });
    d
}

fn case(urn: &str, defendants: Vec<Defendant>) -> ProsecutionCase {
    ProsecutionCase {
        id: ProsecutionCaseId::new(),
        prosecution_case_identifier: CaseIdentifier {
            case_urn: Some(urn.into()),
            prosecution_authority_reference: None,
        },
        defendants,
    }
}

fn matcher(store: InMemoryCaseSearch) -> DefendantMatcher<InMemoryCaseSearch, FixedClock> {
    DefendantMatcher::with_clock(store, MatchingConfig::default(), clock())
}

#[test]
fn test_pnc_stored_in_other_layout_is_full_match() {
    let master = MasterDefendantId::new();
    let mut earlier = defendant(Person {
        first: "Jane",
        last: "Smith",
        dob: Some((1980, 1, 9)),
        address1: None,
        pnc: Some("AB12/345678CD"),
        cro: None,
    });
    earlier.master_defendant_id = Some(master);
    earlier.court_proceedings_initiated = Timestamp::parse("2025-06-01T10:00:00Z").ok();
    let earlier_case = case("URN-EARLIER", vec![earlier]);

    let incoming = defendant(Person {
        first: "Jane",
        last: "Smith",
        dob: Some((1980, 1, 9)),
        address1: None,
        pnc: Some("AB12345678CD"),
        cro: None,
    });
    let incoming_case = case("URN-NEW", vec![incoming.clone()]);

    let m = matcher(InMemoryCaseSearch::new(vec![earlier_case.clone(), incoming_case.clone()]));
    let mut agg = MatchAggregator::new();
    let resolution = m.resolve(&incoming_case, &incoming, &mut agg).unwrap();

    let DefendantResolution::Matched(matched) = resolution else {
        panic!("expected a match");
    };
    assert_eq!(matched.confidence, MatchConfidence::Full);
    assert_eq!(matched.master_defendant_id, master);
    assert_eq!(
        matched.court_proceedings_initiated.map(|t| t.to_string()).as_deref(),
        Some("2025-06-01T10:00:00Z")
    );

    let result = agg.build();
    let cases = result.cases_for(&incoming.id, MatchConfidence::Full);
    assert_eq!(cases.len(), 1);
    assert_eq!(cases[0].prosecution_case_id, earlier_case.id);

    let payload = result.notification_for(&incoming, &incoming_case).unwrap();
    assert_eq!(payload.case_reference.as_deref(), Some("URN-NEW"));
    assert_eq!(payload.matched_case_count, 1);
    assert_eq!(payload.matched_defendants[0].case_reference.as_deref(), Some("URN-EARLIER"));
    assert_eq!(payload.matched_defendants[0].master_defendant_id, master);
}

#[test]
fn test_different_surname_falls_back_to_partial_match() {
    let earlier = defendant(Person {
        first: "Jane",
        last: "Brown",
        dob: Some((1980, 1, 9)),
        address1: Some("1 High Street"),
        pnc: None,
        cro: None,
    });
    let earlier_case = case("URN-EARLIER", vec![earlier]);

    let incoming = defendant(Person {
        first: "Jane",
        last: "Smith",
        dob: Some((1980, 1, 9)),
        address1: Some("1 HIGH STREET"),
        pnc: None,
        cro: None,
    });
    let incoming_case = case("URN-NEW", vec![incoming.clone()]);

    let m = matcher(InMemoryCaseSearch::new(vec![earlier_case]));
    let attempt = m
        .attempt(
            pcm_matching::IdentitySnapshot::from_defendant(&incoming),
            Some(incoming_case.id),
        )
        .unwrap();

    assert_eq!(attempt.confidence, Some(MatchConfidence::Partial));
    let accepted = attempt.accepted.unwrap();
    // dob + address, after dob+address+last and dob+last failed on surname.
    assert_eq!(accepted.tier_number(), 5);
    // exact tier 3, partial tiers 3, 4, 5.
    assert_eq!(attempt.criteria_executed, 4);
}

#[test]
fn test_own_case_is_never_a_match() {
    let incoming = defendant(Person {
        first: "Jane",
        last: "Smith",
        dob: Some((1980, 1, 9)),
        address1: Some("1 High Street"),
        pnc: Some("AB12345678CD"),
        cro: Some("123456/08X"),
    });
    let incoming_case = case("URN-NEW", vec![incoming.clone()]);

    let m = matcher(InMemoryCaseSearch::new(vec![incoming_case.clone()]));
    let (resolutions, result) = m.resolve_case(&incoming_case).unwrap();

    assert_eq!(resolutions.len(), 1);
    assert!(!resolutions[0].is_matched());
    assert_eq!(resolutions[0].defendant_id(), incoming.id);
    assert!(result.is_empty());
}

#[test]
fn test_resolve_case_mixes_outcomes() {
    let known = defendant(Person {
        first: "Bob",
        last: "Jones",
        dob: None,
        address1: None,
        pnc: None,
        cro: Some("99/123Z"),
    });
    let earlier_case = case("URN-EARLIER", vec![known]);

    let bob = defendant(Person {
        first: "Bob",
        last: "Jones",
        dob: None,
        address1: None,
        pnc: None,
        cro: Some("99/123Z"),
    });
    let stranger = defendant(Person {
        first: "Amy",
        last: "Clark",
        dob: Some((1990, 2, 3)),
        address1: None,
        pnc: None,
        cro: None,
    });
    let incoming_case = case("URN-NEW", vec![bob.clone(), stranger.clone()]);

    let m = matcher(InMemoryCaseSearch::new(vec![earlier_case, incoming_case.clone()]));
    let (resolutions, result) = m.resolve_case(&incoming_case).unwrap();

    assert!(resolutions[0].is_matched());
    assert!(!resolutions[1].is_matched());
    assert_eq!(result.confidence_of(&bob.id), Some(MatchConfidence::Full));
    assert_eq!(result.confidence_of(&stranger.id), None);

    let json = result
        .notification_for(&bob, &incoming_case)
        .unwrap()
        .to_json()
        .unwrap();
    assert_eq!(json["croNumber"], "99/123Z");
    assert!(json.get("dateOfBirth").is_none());
    assert!(json.get("pncId").is_none());
}
