use std::collections::BTreeMap;

use tracing::debug;

use crate::core::confidence::{meets_threshold, thresholds};
use crate::core::knowledge::KnowledgeBase;
use crate::core::line::OcrLine;
use crate::core::model::{DerivedVia, FieldCandidate};
use crate::overlay::{DiffValue, IdentityDiff, OverrideStage};
use crate::resolve::{card_number, grade, set_brand, team, title_case, uppercase_ratio, year};

/// Zone name the request layer uses for the graded-slab label crop.
pub const SLAB_ZONE: &str = "slabLabel";

pub struct SlabOverride;

impl OverrideStage for SlabOverride {
    fn name(&self) -> &'static str {
        "slab label"
    }

    fn derive(
        &self,
        zones: &BTreeMap<String, Vec<OcrLine>>,
        kb: &KnowledgeBase,
    ) -> Option<IdentityDiff> {
        let crop = zones.get(SLAB_ZONE)?;
        if !crop
            .iter()
            .any(|line| kb.find_authority(&line.normalized).is_some())
        {
            debug!("slab crop present but no grading authority keyword; skipping override");
            return None;
        }

        let boosted: Vec<OcrLine> = crop
            .iter()
            .map(|line| line.with_confidence_floor(thresholds::SLAB_FLOOR))
            .collect();

        let diff = IdentityDiff {
            player: slab_player(&boosted, kb),
            team: team::resolve(&boosted, kb).verified.map(diff_value),
            year: year::resolve(&boosted, kb).verified.map(diff_value),
            set_name: set_brand::resolve(&boosted, kb).map(diff_value),
            card_number: card_number::resolve(&boosted, kb).verified.map(diff_value),
            grade_if_empty: grade::resolve(&boosted, kb).verified,
        };
        debug!(
            player = diff.player.is_some(),
            team = diff.team.is_some(),
            year = diff.year.is_some(),
            set = diff.set_name.is_some(),
            number = diff.card_number.is_some(),
            "slab override triggered"
        );
        Some(diff)
    }
}

/// Slab name lines: 1-3 tokens, no digits, at least half the letters
/// uppercase, nothing the label prints that is not a name. "Last, First"
/// ordering is normalized to "First Last".
fn slab_player(lines: &[OcrLine], kb: &KnowledgeBase) -> Option<DiffValue> {
    lines.iter().find_map(|line| {
        if !meets_threshold(line.confidence, thresholds::PLAYER) {
            return None;
        }
        let text = &line.normalized;
        let tokens: Vec<&str> = text.split_whitespace().collect();
        if tokens.is_empty() || tokens.len() > 3 {
            return None;
        }
        if text.chars().any(|c| c.is_ascii_digit()) || uppercase_ratio(text) < 0.5 {
            return None;
        }
        if tokens
            .iter()
            .any(|token| kb.is_slab_noise(token.trim_matches(|c: char| !c.is_alphanumeric())))
        {
            return None;
        }
        if kb.canonical_team(text).is_some() || kb.find_brand(text).is_some() {
            return None;
        }
        Some(DiffValue {
            value: title_case(&normalize_name_order(text)),
            line: line.clone(),
            derived_via: DerivedVia::SlabHeuristic,
        })
    })
}

/// "DARLING, RON" → "RON DARLING". Lines without a comma pass through.
fn normalize_name_order(text: &str) -> String {
    match text.split_once(',') {
        Some((last, first)) if !first.trim().is_empty() => {
            format!("{} {}", first.trim(), last.trim())
        }
        _ => text.to_string(),
    }
}

fn diff_value(candidate: FieldCandidate) -> DiffValue {
    DiffValue {
        value: candidate.matched_value,
        line: candidate.source_line,
        derived_via: candidate.derived_via,
    }
}
