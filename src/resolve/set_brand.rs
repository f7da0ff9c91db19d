use crate::core::knowledge::KnowledgeBase;
use crate::core::line::OcrLine;
use crate::core::model::{DerivedVia, Field, FieldCandidate};

pub fn resolve(lines: &[OcrLine], kb: &KnowledgeBase) -> Option<FieldCandidate> {
    lines.iter().find_map(|line| {
        kb.find_brand(&line.normalized).map(|brand| FieldCandidate {
            field: Field::SetName,
            matched_value: brand.to_string(),
            source_line: line.clone(),
            derived_via: DerivedVia::ExactKnownMatch,
        })
    })
}

/// Zone-builder variant, value only.
pub(crate) fn suggest_value(lines: &[OcrLine], kb: &KnowledgeBase) -> Option<String> {
    lines
        .iter()
        .find_map(|line| kb.find_brand(&line.normalized))
        .map(str::to_string)
}
