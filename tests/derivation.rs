use std::collections::BTreeMap;

use pretty_assertions::assert_eq;

use cardid::core::line::RawLine;
use cardid::pipeline::ZoneCrop;
use cardid::{derive_card, ConfidenceLevel, DeriveRequest, Field, FieldSource, KnowledgeBase};

fn kb() -> KnowledgeBase {
    KnowledgeBase::builtin().with_max_year(2026)
}

fn front_request(lines: &[(&str, f64)]) -> DeriveRequest {
    DeriveRequest {
        lines: lines
            .iter()
            .map(|(text, conf)| RawLine::new(*text, Some(*conf)))
            .collect(),
        ..DeriveRequest::default()
    }
}

fn zone(name: &str, lines: &[&str]) -> (String, ZoneCrop) {
    (
        name.to_string(),
        ZoneCrop {
            lines: lines.iter().map(|text| RawLine::new(*text, None)).collect(),
        },
    )
}

/// A player name that never appears as a line is never invented, even when
/// the rest of the identity is present and verified.
#[test]
fn never_hallucinates_a_player() {
    let request = front_request(&[("NEW YORK METS", 0.95), ("1985 TOPPS", 0.95)]);
    let record = derive_card(&request, &kb());

    assert_eq!(record.player, "");
    assert!(record.needs_user_confirmation);
    assert_eq!(record.team, "New York Mets");
    assert_eq!(record.year, "1985");
    assert_eq!(record.set_name, "Topps");
    assert!(record
        .source_evidence
        .iter()
        .any(|line| line == "Player not detected in OCR text"));
}

#[test]
fn exact_known_lines_fully_verify() {
    let request = front_request(&[
        ("RON DARLING", 0.95),
        ("NEW YORK METS", 0.90),
        ("1985 TOPPS", 0.85),
    ]);
    let record = derive_card(&request, &kb());

    assert_eq!(record.player, "Ron Darling");
    assert_eq!(record.team, "New York Mets");
    assert_eq!(record.year, "1985");
    assert_eq!(record.set_name, "Topps");
    assert_eq!(record.set_brand, "Topps");
    assert_eq!(record.brand, "Topps");
    assert_eq!(record.is_text_verified.get(&Field::Player), Some(&true));
    assert_eq!(
        record.confidence.get(&Field::Player),
        Some(&ConfidenceLevel::High)
    );
    assert_eq!(
        record.confidence.get(&Field::SetName),
        Some(&ConfidenceLevel::Medium)
    );
    assert!(!record.needs_user_confirmation);
}

#[test]
fn year_threshold_boundary_is_exact() {
    let at_threshold = derive_card(&front_request(&[("1985", 0.85)]), &kb());
    assert_eq!(at_threshold.year, "1985");
    assert_eq!(at_threshold.is_text_verified.get(&Field::Year), Some(&true));

    let under_threshold = derive_card(&front_request(&[("1985", 0.84)]), &kb());
    assert_eq!(under_threshold.year, "");
    assert_eq!(
        under_threshold.manual_suggestions.get(&Field::Year),
        Some(&"1985".to_string())
    );
    assert_eq!(
        under_threshold.confidence.get(&Field::Year),
        Some(&ConfidenceLevel::Low)
    );
}

/// Two qualifying card numbers mean the field is declined, not chosen
/// arbitrarily.
#[test]
fn ambiguous_card_numbers_are_declined() {
    let request = front_request(&[("1985 TOPPS", 0.9), ("12", 0.9), ("45", 0.9)]);
    let record = derive_card(&request, &kb());

    assert_eq!(record.card_number, "");
    assert!(record.needs_user_confirmation);
    assert_eq!(
        record.manual_suggestions.get(&Field::CardNumber),
        Some(&"12".to_string())
    );
}

#[test]
fn slab_label_overrides_full_card_identity() {
    let mut request = front_request(&[
        ("JOHN SMITHSON", 0.9),
        ("CLEVELAND GUARDIANS", 0.9),
        ("1987 TOPPS", 0.9),
    ]);
    request.zone_crops = BTreeMap::from([zone(
        "slabLabel",
        &["PSA 10", "DARLING, RON", "NEW YORK METS", "1985 TOPPS"],
    )]);
    let record = derive_card(&request, &kb());

    assert_eq!(record.player, "Ron Darling");
    assert_eq!(record.team, "New York Mets");
    assert_eq!(record.year, "1985");
    assert_eq!(record.sources.get(&Field::Player), Some(&FieldSource::Ocr));
    assert_eq!(
        record.confidence.get(&Field::Player),
        Some(&ConfidenceLevel::High)
    );
    assert_eq!(record.is_text_verified.get(&Field::Player), Some(&true));
    // The label also supplies the grade when the card face had none.
    assert_eq!(record.grade, "PSA 10");
    assert_eq!(record.grading_authority, "PSA");
    assert_eq!(record.grade_value, "10");
    assert!(!record.needs_user_confirmation);
    assert!(record
        .source_evidence
        .iter()
        .any(|line| line == "Player \"Ron Darling\" read from slab label"));
}

#[test]
fn slab_without_authority_keyword_changes_nothing() {
    let mut request = front_request(&[("RON DARLING", 0.95)]);
    request.zone_crops =
        BTreeMap::from([zone("slabLabel", &["MANTLE, MICKEY", "1985 TOPPS"])]);
    let record = derive_card(&request, &kb());
    assert_eq!(record.player, "Ron Darling");
}

#[test]
fn zone_crops_only_fill_suggestions() {
    let request = DeriveRequest {
        zone_crops: BTreeMap::from([
            zone("bottomCenter", &["MICKEY MANTLE"]),
            zone("topBanner", &["NEW YORK YANKEES"]),
        ]),
        ..DeriveRequest::default()
    };
    let record = derive_card(&request, &kb());

    assert_eq!(record.player, "");
    assert_eq!(record.team, "");
    assert_eq!(
        record.manual_suggestions.get(&Field::Player),
        Some(&"Mickey Mantle".to_string())
    );
    assert_eq!(
        record.manual_suggestions.get(&Field::Team),
        Some(&"New York Yankees".to_string())
    );
    assert_eq!(record.is_text_verified.get(&Field::Player), Some(&false));
    assert!(record.needs_user_confirmation);
}

/// Identical inputs produce byte-identical output; the derivation has no
/// hidden state.
#[test]
fn derivation_is_idempotent() {
    let mut request = front_request(&[
        ("RON DARLING", 0.95),
        ("NEW YORK METS", 0.90),
        ("1985 TOPPS", 0.85),
        ("#12", 0.9),
    ]);
    request.back_lines = vec![RawLine::new("PITCHER", Some(0.7))];
    request.zone_crops = BTreeMap::from([zone("slabLabel", &["PSA 9", "DARLING, RON"])]);

    let first = serde_json::to_string(&derive_card(&request, &kb())).unwrap();
    let second = serde_json::to_string(&derive_card(&request, &kb())).unwrap();
    assert_eq!(first, second);
}

#[test]
fn confirmation_tracks_required_fields_exactly() {
    let cases: Vec<DeriveRequest> = vec![
        DeriveRequest::default(),
        front_request(&[("RON DARLING", 0.95)]),
        front_request(&[("RON DARLING", 0.95), ("NEW YORK METS", 0.9)]),
        front_request(&[
            ("RON DARLING", 0.95),
            ("NEW YORK METS", 0.9),
            ("1985 TOPPS", 0.9),
        ]),
        front_request(&[("SGC 96", 0.9), ("1985 TOPPS", 0.9)]),
    ];
    for request in cases {
        let record = derive_card(&request, &kb());
        let any_required_empty = record.player.is_empty()
            || record.team.is_empty()
            || record.year.is_empty()
            || record.set_name.is_empty();
        assert_eq!(record.needs_user_confirmation, any_required_empty);
    }
}

#[test]
fn grade_and_score_never_coexist() {
    let graded = derive_card(&front_request(&[("PSA 10", 0.9)]), &kb());
    assert_eq!(graded.grade, "PSA 10");
    assert_eq!(graded.score_rating, "");

    let scored = derive_card(&front_request(&[("SCORE 9 RATING", 0.9)]), &kb());
    assert_eq!(scored.score_rating, "9");
    assert_eq!(scored.grade, "");
}

#[test]
fn evidence_has_one_entry_per_populated_field() {
    let request = front_request(&[
        ("RON DARLING", 0.95),
        ("NEW YORK METS", 0.90),
        ("1985 TOPPS", 0.85),
        ("#12", 0.9),
        ("PSA 10", 0.9),
    ]);
    let record = derive_card(&request, &kb());
    // player, team, year, set, card number, grade: one line each, no
    // not-detected entries.
    assert_eq!(record.source_evidence.len(), 6);
    assert!(!record
        .source_evidence
        .iter()
        .any(|line| line.contains("not detected")));
}
