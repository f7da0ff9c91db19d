use crate::core::confidence::{meets_threshold, thresholds};
use crate::core::knowledge::KnowledgeBase;
use crate::core::line::OcrLine;
use crate::core::model::{DerivedVia, Field, FieldCandidate};
use crate::resolve::grammar;
use crate::resolve::{title_case, uppercase_ratio, word_count, Resolution};

pub fn resolve(lines: &[OcrLine], kb: &KnowledgeBase) -> Resolution {
    Resolution {
        verified: lines.iter().find_map(|line| verified_candidate(line, kb)),
        fallback: lines.iter().find_map(|line| fallback_candidate(line, kb)),
    }
}

/// Best unverified guess for the zone suggestion builder: same shapes, no
/// confidence gate.
pub(crate) fn suggest_value(lines: &[OcrLine], kb: &KnowledgeBase) -> Option<String> {
    lines.iter().find_map(|line| {
        if let Some(name) = allowlist_match(line, kb) {
            return Some(name.to_string());
        }
        if is_name_banner(&line.normalized, kb) {
            return Some(title_case(&line.normalized));
        }
        fallback_candidate(line, kb).map(|candidate| candidate.matched_value)
    })
}

fn verified_candidate(line: &OcrLine, kb: &KnowledgeBase) -> Option<FieldCandidate> {
    if !meets_threshold(line.confidence, thresholds::PLAYER) {
        return None;
    }
    if let Some(name) = allowlist_match(line, kb) {
        return Some(candidate(name.to_string(), line, DerivedVia::ExactKnownMatch));
    }
    if is_name_banner(&line.normalized, kb) {
        return Some(candidate(
            title_case(&line.normalized),
            line,
            DerivedVia::HeaderHeuristic,
        ));
    }
    None
}

/// Lower bar, surfaced only as a manual suggestion.
fn fallback_candidate(line: &OcrLine, kb: &KnowledgeBase) -> Option<FieldCandidate> {
    let text = &line.normalized;
    ((2..=3).contains(&word_count(text))
        && uppercase_ratio(text) > 0.7
        && names_nothing_else(text, kb))
    .then(|| candidate(title_case(text), line, DerivedVia::HeaderHeuristic))
}

fn allowlist_match(line: &OcrLine, kb: &KnowledgeBase) -> Option<&'static str> {
    if !grammar::NAME_CHARACTERS.is_match(&line.normalized) {
        return None;
    }
    kb.canonical_player(&line.normalized)
}

/// Header shape: short, 2-3 words, no digits/commas/colons, almost all caps.
fn is_name_banner(text: &str, kb: &KnowledgeBase) -> bool {
    text.chars().count() <= 26
        && !text
            .chars()
            .any(|c| c.is_ascii_digit() || c == ',' || c == ':')
        && (2..=3).contains(&word_count(text))
        && uppercase_ratio(text) >= 0.85
        && names_nothing_else(text, kb)
}

/// A name-shaped line the knowledge base recognizes as a team, brand,
/// authority, or position title is not a player.
fn names_nothing_else(text: &str, kb: &KnowledgeBase) -> bool {
    kb.canonical_team(text).is_none()
        && kb.find_brand(text).is_none()
        && kb.find_authority(text).is_none()
        && kb.find_position(text).is_none()
}

fn candidate(value: String, line: &OcrLine, via: DerivedVia) -> FieldCandidate {
    FieldCandidate {
        field: Field::Player,
        matched_value: value,
        source_line: line.clone(),
        derived_via: via,
    }
}
