use crate::core::confidence::{meets_threshold, thresholds};
use crate::core::knowledge::KnowledgeBase;
use crate::core::line::OcrLine;
use crate::core::model::DerivedVia;
use crate::resolve::grammar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeKind {
    /// Authority-issued grade ("PSA 10").
    Authority,
    /// Printed score rating ("Score 9" with a rating cue).
    Score,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GradeFinding {
    pub kind: GradeKind,
    /// Empty for score ratings.
    pub authority: String,
    pub value: String,
    pub source_line: OcrLine,
    pub paired_line: Option<OcrLine>,
    pub derived_via: DerivedVia,
}

impl GradeFinding {
    /// Display form used for the grade slot and for suggestions.
    pub fn display(&self) -> String {
        match self.kind {
            GradeKind::Authority => format!("{} {}", self.authority, self.value),
            GradeKind::Score => format!("Score {}", self.value),
        }
    }

    /// Pairs gate on the weaker line's confidence.
    fn confidence(&self) -> Option<f64> {
        match (&self.paired_line, self.source_line.confidence) {
            (Some(pair), Some(own)) => pair.confidence.map(|other| own.min(other)),
            (Some(_), None) => None,
            (None, own) => own,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GradeResolution {
    pub verified: Option<GradeFinding>,
    pub fallback: Option<GradeFinding>,
}

pub fn resolve(lines: &[OcrLine], kb: &KnowledgeBase) -> GradeResolution {
    let finding = same_line_finding(lines, kb).or_else(|| paired_finding(lines, kb));
    match finding {
        Some(found) if meets_threshold(found.confidence(), thresholds::GRADE) => GradeResolution {
            verified: Some(found),
            fallback: None,
        },
        Some(found) => GradeResolution {
            verified: None,
            fallback: Some(found),
        },
        None => GradeResolution::default(),
    }
}

fn same_line_finding(lines: &[OcrLine], kb: &KnowledgeBase) -> Option<GradeFinding> {
    lines.iter().find_map(|line| {
        if let Some(caps) = grammar::GRADE_SAME_LINE.captures(&line.normalized) {
            return Some(GradeFinding {
                kind: GradeKind::Authority,
                authority: caps[1].to_uppercase(),
                value: caps[2].to_string(),
                source_line: line.clone(),
                paired_line: None,
                derived_via: DerivedVia::RegexShape,
            });
        }
        let caps = grammar::SCORE_SAME_LINE.captures(&line.normalized)?;
        kb.has_score_cue(&line.normalized).then(|| GradeFinding {
            kind: GradeKind::Score,
            authority: String::new(),
            value: caps[1].to_string(),
            source_line: line.clone(),
            paired_line: None,
            derived_via: DerivedVia::RegexShape,
        })
    })
}

fn paired_finding(lines: &[OcrLine], kb: &KnowledgeBase) -> Option<GradeFinding> {
    lines.iter().find_map(|line| {
        let authority = kb.find_authority(&line.normalized);
        if authority.is_none() && !has_score_word(&line.normalized) {
            return None;
        }
        let number = lines.iter().find(|other| {
            other.index != line.index
                && other.index.abs_diff(line.index) <= 1
                && grammar::bare_number_value(&other.normalized).is_some()
        })?;
        if let Some(authority) = authority {
            return Some(GradeFinding {
                kind: GradeKind::Authority,
                authority: authority.to_string(),
                value: number.normalized.clone(),
                source_line: line.clone(),
                paired_line: Some(number.clone()),
                derived_via: DerivedVia::PairedKeywordNumber,
            });
        }
        // Score keyword: the rating cue may sit on either line of the pair.
        let combined = format!("{} {}", line.normalized, number.normalized);
        kb.has_score_cue(&combined).then(|| GradeFinding {
            kind: GradeKind::Score,
            authority: String::new(),
            value: number.normalized.clone(),
            source_line: line.clone(),
            paired_line: Some(number.clone()),
            derived_via: DerivedVia::PairedKeywordNumber,
        })
    })
}

fn has_score_word(text: &str) -> bool {
    text.to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .any(|word| word == "score")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::line::{build_lines, RawLine};
    use pretty_assertions::assert_eq;

    fn kb() -> KnowledgeBase {
        KnowledgeBase::builtin().with_max_year(2026)
    }

    fn lines(entries: &[(&str, Option<f64>)]) -> Vec<OcrLine> {
        let raw: Vec<RawLine> = entries
            .iter()
            .map(|(text, conf)| RawLine::new(*text, *conf))
            .collect();
        build_lines(&raw)
    }

    #[test]
    fn same_line_grade_verifies() {
        let lines = lines(&[("PSA 10", Some(0.9))]);
        let verified = resolve(&lines, &kb()).verified.unwrap();
        assert_eq!(verified.kind, GradeKind::Authority);
        assert_eq!(verified.authority, "PSA");
        assert_eq!(verified.value, "10");
        assert_eq!(verified.display(), "PSA 10");
    }

    #[test]
    fn decimal_grades_survive() {
        let lines = lines(&[("BGS - 9.5", Some(0.9))]);
        assert_eq!(resolve(&lines, &kb()).verified.unwrap().value, "9.5");
    }

    #[test]
    fn score_needs_a_rating_cue() {
        let without_cue = lines(&[("SCORE 9", Some(0.9))]);
        let resolution = resolve(&without_cue, &kb());
        assert!(resolution.verified.is_none());
        assert!(resolution.fallback.is_none());

        let with_cue = lines(&[("SCORE 9 RATING", Some(0.9))]);
        let verified = resolve(&with_cue, &kb()).verified.unwrap();
        assert_eq!(verified.kind, GradeKind::Score);
        assert_eq!(verified.value, "9");
    }

    #[test]
    fn paired_authority_and_number() {
        let lines = lines(&[("PSA", Some(0.9)), ("10", Some(0.9))]);
        let verified = resolve(&lines, &kb()).verified.unwrap();
        assert_eq!(verified.derived_via, DerivedVia::PairedKeywordNumber);
        assert_eq!(verified.display(), "PSA 10");
    }

    #[test]
    fn paired_score_checks_cues_across_both_lines() {
        let no_cue = lines(&[("SCORE", Some(0.9)), ("90", Some(0.9))]);
        assert!(resolve(&no_cue, &kb()).verified.is_none());

        let cue_on_keyword_line = lines(&[("SCORE RATING", Some(0.9)), ("90", Some(0.9))]);
        let verified = resolve(&cue_on_keyword_line, &kb()).verified.unwrap();
        assert_eq!(verified.kind, GradeKind::Score);
        assert_eq!(verified.value, "90");
    }

    #[test]
    fn paired_number_is_bounded_at_two_hundred() {
        let lines = lines(&[("PSA", Some(0.9)), ("1985", Some(0.9))]);
        let resolution = resolve(&lines, &kb());
        assert!(resolution.verified.is_none());
        assert!(resolution.fallback.is_none());
    }

    #[test]
    fn weak_pair_member_downgrades_to_suggestion() {
        let lines = lines(&[("PSA", Some(0.9)), ("10", Some(0.5))]);
        let resolution = resolve(&lines, &kb());
        assert!(resolution.verified.is_none());
        assert_eq!(resolution.fallback.unwrap().display(), "PSA 10");
    }

    #[test]
    fn same_line_low_confidence_is_suggestion_only() {
        let lines = lines(&[("SGC 96", Some(0.6))]);
        let resolution = resolve(&lines, &kb());
        assert!(resolution.verified.is_none());
        assert_eq!(resolution.fallback.unwrap().display(), "SGC 96");
    }
}
