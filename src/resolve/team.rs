use crate::core::confidence::{meets_threshold, thresholds};
use crate::core::knowledge::KnowledgeBase;
use crate::core::line::OcrLine;
use crate::core::model::{DerivedVia, Field, FieldCandidate};
use crate::resolve::Resolution;

pub fn resolve(lines: &[OcrLine], kb: &KnowledgeBase) -> Resolution {
    Resolution {
        verified: lines.iter().find_map(|line| {
            if !meets_threshold(line.confidence, thresholds::TEAM) {
                return None;
            }
            exact_match(line, kb)
        }),
        fallback: lines.iter().find_map(|line| exact_match(line, kb)),
    }
}

/// First exact team match regardless of confidence, for the zone builder.
pub(crate) fn suggest_value(lines: &[OcrLine], kb: &KnowledgeBase) -> Option<String> {
    lines
        .iter()
        .find_map(|line| kb.canonical_team(&line.normalized))
        .map(str::to_string)
}

fn exact_match(line: &OcrLine, kb: &KnowledgeBase) -> Option<FieldCandidate> {
    kb.canonical_team(&line.normalized).map(|team| FieldCandidate {
        field: Field::Team,
        matched_value: team.to_string(),
        source_line: line.clone(),
        derived_via: DerivedVia::ExactKnownMatch,
    })
}
