use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::knowledge::KnowledgeBase;
use crate::core::line::{build_lines, OcrLine, RawLine};
use crate::core::model::{
    ConfidenceLevel, DerivedCardRecord, Field, FieldCandidate, FieldSource, REQUIRED_FIELDS,
};
use crate::evidence;
use crate::overlay::{self, zones, IdentityDiff};
use crate::resolve::grade::{GradeFinding, GradeKind};
use crate::resolve::{back, card_number, grade, player, set_brand, team, year, Resolution};

/// One derivation request: full-card front OCR, optional back OCR, optional
/// named zone crops, and passthrough hints. Every member defaults when the
/// payload omits it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeriveRequest {
    pub lines: Vec<RawLine>,
    pub back_lines: Vec<RawLine>,
    pub zone_crops: BTreeMap<String, ZoneCrop>,
    pub hints: Hints,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ZoneCrop {
    pub lines: Vec<RawLine>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Hints {
    pub sport: Option<String>,
}

/// Fail-closed entry for callers holding a raw JSON payload: a structurally
/// malformed request returns the all-empty record flagged for confirmation
/// rather than an error.
pub fn derive_from_json(payload: &str, kb: &KnowledgeBase) -> DerivedCardRecord {
    match serde_json::from_str::<DeriveRequest>(payload) {
        Ok(request) => derive_card(&request, kb),
        Err(error) => {
            warn!(%error, "malformed derivation payload; failing closed");
            derive_card(&DeriveRequest::default(), kb)
        }
    }
}

/// One request in, one record out. The pass is a pure, synchronous function
/// of its inputs; identical requests produce byte-identical records.
pub fn derive_card(request: &DeriveRequest, kb: &KnowledgeBase) -> DerivedCardRecord {
    let front = build_lines(&request.lines);
    let back = build_lines(&request.back_lines);
    let zone_lines: BTreeMap<String, Vec<OcrLine>> = request
        .zone_crops
        .iter()
        .map(|(name, crop)| (name.clone(), build_lines(&crop.lines)))
        .collect();
    debug!(
        front = front.len(),
        back = back.len(),
        zones = zone_lines.len(),
        "deriving card identity"
    );

    let mut record = DerivedCardRecord::default();
    let mut evidence_by_field: BTreeMap<Field, String> = BTreeMap::new();

    for resolver in [
        player::resolve as fn(&[OcrLine], &KnowledgeBase) -> Resolution,
        team::resolve,
        year::resolve,
        card_number::resolve,
    ] {
        let (verified, fallback) = two_sided(&front, &back, kb, resolver);
        apply_identity(&mut record, &mut evidence_by_field, verified, fallback);
    }
    apply_set(&mut record, &mut evidence_by_field, &front, &back, kb);
    apply_grade(&mut record, &mut evidence_by_field, &front, &back, kb);

    for stage in overlay::stages() {
        if let Some(diff) = stage.derive(&zone_lines, kb) {
            apply_diff(&mut record, &mut evidence_by_field, diff);
        }
    }

    for suggestion in zones::build(&zone_lines, kb) {
        if record.canonical(suggestion.field).is_empty() {
            record
                .manual_suggestions
                .entry(suggestion.field)
                .or_insert(suggestion.value);
            record
                .confidence
                .entry(suggestion.field)
                .or_insert(ConfidenceLevel::Low);
            record.is_text_verified.entry(suggestion.field).or_insert(false);
        }
    }

    record.card_back_details = back::details(&back, kb);

    if let Some(sport) = request.hints.sport.as_deref().filter(|s| !s.is_empty()) {
        record.sport = sport.to_string();
        record.sources.insert(Field::Sport, FieldSource::Infer);
    }

    record.source_evidence = evidence_by_field.into_values().collect();
    for field in REQUIRED_FIELDS {
        if record.canonical(field).is_empty() {
            record.source_evidence.push(evidence::not_detected(field));
        }
    }
    record.needs_user_confirmation = evidence::needs_confirmation(&record);
    record
}

/// Run a resolver over the front lines, then the back lines when the front
/// produced no verified candidate. The first fallback found anywhere stays
/// available as a manual suggestion.
fn two_sided(
    front: &[OcrLine],
    back: &[OcrLine],
    kb: &KnowledgeBase,
    resolver: fn(&[OcrLine], &KnowledgeBase) -> Resolution,
) -> (Option<(FieldCandidate, FieldSource)>, Option<FieldCandidate>) {
    let front_res = resolver(front, kb);
    if let Some(verified) = front_res.verified {
        return (Some((verified, FieldSource::Front)), front_res.fallback);
    }
    let back_res = resolver(back, kb);
    let fallback = front_res.fallback.or(back_res.fallback);
    match back_res.verified {
        Some(verified) => (Some((verified, FieldSource::Back)), fallback),
        None => (None, fallback),
    }
}

fn apply_identity(
    record: &mut DerivedCardRecord,
    evidence_by_field: &mut BTreeMap<Field, String>,
    verified: Option<(FieldCandidate, FieldSource)>,
    fallback: Option<FieldCandidate>,
) {
    if let Some((candidate, source)) = verified {
        let field = candidate.field;
        *record.canonical_mut(field) = candidate.matched_value.clone();
        record.confidence.insert(field, ConfidenceLevel::High);
        record.is_text_verified.insert(field, true);
        record.sources.insert(field, source);
        evidence_by_field.insert(
            field,
            evidence::found(
                field,
                &candidate.matched_value,
                candidate.derived_via,
                source,
                candidate.source_line.index,
            ),
        );
    } else if let Some(candidate) = fallback {
        let field = candidate.field;
        record.manual_suggestions.insert(field, candidate.matched_value);
        record.confidence.insert(field, ConfidenceLevel::Low);
        record.is_text_verified.insert(field, false);
    }
}

/// Brand text is rarely misread in a meaningful way, so the set has no
/// confidence gate, but a substring match never reports "high".
fn apply_set(
    record: &mut DerivedCardRecord,
    evidence_by_field: &mut BTreeMap<Field, String>,
    front: &[OcrLine],
    back: &[OcrLine],
    kb: &KnowledgeBase,
) {
    let (candidate, source) = match set_brand::resolve(front, kb) {
        Some(candidate) => (candidate, FieldSource::Front),
        None => match set_brand::resolve(back, kb) {
            Some(candidate) => (candidate, FieldSource::Back),
            None => return,
        },
    };
    record.set_name = candidate.matched_value.clone();
    record.set_brand = candidate.matched_value.clone();
    record.brand = candidate.matched_value.clone();
    record.confidence.insert(Field::SetName, ConfidenceLevel::Medium);
    record.is_text_verified.insert(Field::SetName, true);
    record.sources.insert(Field::SetName, source);
    evidence_by_field.insert(
        Field::SetName,
        evidence::found(
            Field::SetName,
            &candidate.matched_value,
            candidate.derived_via,
            source,
            candidate.source_line.index,
        ),
    );
}

fn apply_grade(
    record: &mut DerivedCardRecord,
    evidence_by_field: &mut BTreeMap<Field, String>,
    front: &[OcrLine],
    back: &[OcrLine],
    kb: &KnowledgeBase,
) {
    let front_res = grade::resolve(front, kb);
    let (verified, source, fallback) = if front_res.verified.is_some() {
        (front_res.verified, FieldSource::Front, front_res.fallback)
    } else {
        let back_res = grade::resolve(back, kb);
        let fallback = front_res.fallback.or(back_res.fallback);
        match back_res.verified {
            Some(found) => (Some(found), FieldSource::Back, fallback),
            None => (None, FieldSource::Front, fallback),
        }
    };

    if let Some(found) = verified {
        let field = write_grade(record, &found, source);
        evidence_by_field.insert(
            field,
            evidence::found(
                field,
                record.canonical(field),
                found.derived_via,
                source,
                found.source_line.index,
            ),
        );
    } else if let Some(found) = fallback {
        let field = match found.kind {
            GradeKind::Authority => Field::Grade,
            GradeKind::Score => Field::ScoreRating,
        };
        record.manual_suggestions.insert(field, found.display());
        record.confidence.insert(field, ConfidenceLevel::Low);
        record.is_text_verified.insert(field, false);
    }
}

fn write_grade(
    record: &mut DerivedCardRecord,
    found: &GradeFinding,
    source: FieldSource,
) -> Field {
    let field = match found.kind {
        GradeKind::Authority => {
            record.grade = found.display();
            record.grading_authority = found.authority.clone();
            record.grade_value = found.value.clone();
            Field::Grade
        }
        GradeKind::Score => {
            record.score_rating = found.value.clone();
            Field::ScoreRating
        }
    };
    record.confidence.insert(field, ConfidenceLevel::High);
    record.is_text_verified.insert(field, true);
    record.sources.insert(field, source);
    field
}

/// Apply an override stage's diff: slab-derived fields replace the
/// full-card values outright, verified at "high" with source "ocr".
fn apply_diff(
    record: &mut DerivedCardRecord,
    evidence_by_field: &mut BTreeMap<Field, String>,
    diff: IdentityDiff,
) {
    let mut applied_any = false;
    let fields = [
        (Field::Player, diff.player),
        (Field::Team, diff.team),
        (Field::Year, diff.year),
        (Field::SetName, diff.set_name),
        (Field::CardNumber, diff.card_number),
    ];
    for (field, value) in fields {
        let Some(diff_value) = value else {
            continue;
        };
        *record.canonical_mut(field) = diff_value.value.clone();
        if field == Field::SetName {
            record.set_brand = diff_value.value.clone();
            record.brand = diff_value.value.clone();
        }
        record.confidence.insert(field, ConfidenceLevel::High);
        record.is_text_verified.insert(field, true);
        record.sources.insert(field, FieldSource::Ocr);
        record.manual_suggestions.remove(&field);
        evidence_by_field.insert(field, evidence::from_slab(field, &diff_value.value));
        applied_any = true;
    }

    // The label is where the grade is printed; fill the slot when the
    // full-card pass left it open, never replace it.
    if record.grade.is_empty() && record.score_rating.is_empty() {
        if let Some(found) = diff.grade_if_empty {
            let field = write_grade(record, &found, FieldSource::Ocr);
            evidence_by_field.insert(field, evidence::from_slab(field, record.canonical(field)));
            applied_any = true;
        }
    }

    if applied_any {
        record.notes = "Identity derived from graded slab label".to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kb() -> KnowledgeBase {
        KnowledgeBase::builtin().with_max_year(2026)
    }

    fn request(front: &[(&str, Option<f64>)]) -> DeriveRequest {
        DeriveRequest {
            lines: front
                .iter()
                .map(|(text, conf)| RawLine::new(*text, *conf))
                .collect(),
            ..DeriveRequest::default()
        }
    }

    #[test]
    fn verified_fields_land_in_canonical_slots() {
        let request = request(&[
            ("RON DARLING", Some(0.95)),
            ("NEW YORK METS", Some(0.90)),
            ("1985 TOPPS", Some(0.85)),
        ]);
        let record = derive_card(&request, &kb());
        assert_eq!(record.player, "Ron Darling");
        assert_eq!(record.team, "New York Mets");
        assert_eq!(record.year, "1985");
        assert_eq!(record.set_name, "Topps");
        assert_eq!(record.brand, "Topps");
        assert!(!record.needs_user_confirmation);
    }

    #[test]
    fn back_lines_fill_fields_the_front_missed() {
        let mut request = request(&[("RON DARLING", Some(0.95))]);
        request.back_lines = vec![RawLine::new("NEW YORK METS", Some(0.9))];
        let record = derive_card(&request, &kb());
        assert_eq!(record.team, "New York Mets");
        assert_eq!(record.sources.get(&Field::Team), Some(&FieldSource::Back));
        let details = record.card_back_details.unwrap();
        assert_eq!(details.team, "New York Mets");
    }

    #[test]
    fn malformed_payload_fails_closed() {
        let record = derive_from_json("{\"zoneCrops\": 17}", &kb());
        assert_eq!(record.player, "");
        assert!(record.needs_user_confirmation);
        assert_eq!(record.source_evidence.len(), REQUIRED_FIELDS.len());
    }

    #[test]
    fn sport_hint_passes_through_without_derivation() {
        let mut request = request(&[]);
        request.hints.sport = Some("baseball".to_string());
        let record = derive_card(&request, &kb());
        assert_eq!(record.sport, "baseball");
        assert_eq!(record.sources.get(&Field::Sport), Some(&FieldSource::Infer));
        assert!(record.needs_user_confirmation);
    }

    #[test]
    fn empty_input_yields_empty_unconfirmed_record() {
        let record = derive_card(&DeriveRequest::default(), &kb());
        assert!(record.needs_user_confirmation);
        assert!(record.missing_required().len() == REQUIRED_FIELDS.len());
        assert!(record.manual_suggestions.is_empty());
    }
}
