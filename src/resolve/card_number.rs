use crate::core::confidence::{meets_threshold, thresholds};
use crate::core::knowledge::KnowledgeBase;
use crate::core::line::OcrLine;
use crate::core::model::{DerivedVia, Field, FieldCandidate};
use crate::resolve::grammar;
use crate::resolve::Resolution;

pub fn resolve(lines: &[OcrLine], kb: &KnowledgeBase) -> Resolution {
    let matches = qualifying_matches(lines, kb);
    let verified = match matches.as_slice() {
        [only] if meets_threshold(only.source_line.confidence, thresholds::CARD_NUMBER) => {
            Some(only.clone())
        }
        _ => None,
    };
    Resolution {
        verified,
        fallback: matches.into_iter().next(),
    }
}

fn qualifying_matches(lines: &[OcrLine], kb: &KnowledgeBase) -> Vec<FieldCandidate> {
    lines
        .iter()
        .filter_map(|line| {
            if let Some(caps) = grammar::CARD_NUMBER_PREFIXED.captures(&line.normalized) {
                return Some(candidate(caps[1].to_string(), line));
            }
            if grammar::CARD_NUMBER_PLAIN.is_match(&line.normalized)
                && has_nearby_context(line, lines, kb)
            {
                return Some(candidate(line.normalized.clone(), line));
            }
            None
        })
        .collect()
}

/// A bare number is only a card number when a different line within two scan
/// positions carries a year pattern or a known brand.
fn has_nearby_context(line: &OcrLine, lines: &[OcrLine], kb: &KnowledgeBase) -> bool {
    lines.iter().any(|other| {
        other.index != line.index
            && other.index.abs_diff(line.index) <= 2
            && (grammar::YEAR_ANYWHERE.is_match(&other.normalized)
                || kb.find_brand(&other.normalized).is_some())
    })
}

fn candidate(value: String, line: &OcrLine) -> FieldCandidate {
    FieldCandidate {
        field: Field::CardNumber,
        matched_value: value,
        source_line: line.clone(),
        derived_via: DerivedVia::RegexShape,
    }
}
