use crate::core::confidence::{meets_threshold, thresholds};
use crate::core::knowledge::KnowledgeBase;
use crate::core::line::OcrLine;
use crate::core::model::{DerivedVia, Field, FieldCandidate};
use crate::resolve::grammar;
use crate::resolve::Resolution;

pub fn resolve(lines: &[OcrLine], kb: &KnowledgeBase) -> Resolution {
    Resolution {
        verified: lines.iter().find_map(|line| verified_candidate(line, kb)),
        fallback: lines.iter().find_map(fallback_candidate),
    }
}

fn verified_candidate(line: &OcrLine, kb: &KnowledgeBase) -> Option<FieldCandidate> {
    if !meets_threshold(line.confidence, thresholds::YEAR) {
        return None;
    }
    if grammar::YEAR_EXACT.is_match(&line.normalized) {
        let year: i32 = line.normalized.parse().ok()?;
        return kb
            .year_in_range(year)
            .then(|| candidate(line.normalized.clone(), line, DerivedVia::RegexShape));
    }
    set_header_year(line, kb)
}

/// Set-header lines carry the year and the brand together; accept the year
/// when the remainder names a known brand.
fn set_header_year(line: &OcrLine, kb: &KnowledgeBase) -> Option<FieldCandidate> {
    let caps = grammar::SET_HEADER.captures(&line.normalized)?;
    let year: i32 = caps[1].parse().ok()?;
    if !kb.year_in_range(year) || kb.find_brand(&line.normalized).is_none() {
        return None;
    }
    Some(candidate(
        caps[1].to_string(),
        line,
        DerivedVia::HeaderHeuristic,
    ))
}

fn fallback_candidate(line: &OcrLine) -> Option<FieldCandidate> {
    grammar::YEAR_ANYWHERE
        .find(&line.normalized)
        .map(|found| candidate(found.as_str().to_string(), line, DerivedVia::RegexShape))
}

fn candidate(value: String, line: &OcrLine, via: DerivedVia) -> FieldCandidate {
    FieldCandidate {
        field: Field::Year,
        matched_value: value,
        source_line: line.clone(),
        derived_via: via,
    }
}
