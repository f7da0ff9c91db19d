use crate::core::knowledge::KnowledgeBase;
use crate::core::line::OcrLine;
use crate::core::model::CardBackDetails;

pub fn details(back_lines: &[OcrLine], kb: &KnowledgeBase) -> Option<CardBackDetails> {
    if back_lines.is_empty() {
        return None;
    }
    let team = back_lines
        .iter()
        .find_map(|line| kb.canonical_team(&line.normalized))
        .unwrap_or_default()
        .to_string();
    let position = back_lines
        .iter()
        .find_map(|line| kb.find_position(&line.normalized))
        .unwrap_or_default()
        .to_string();
    Some(CardBackDetails {
        team,
        position,
        lines: back_lines.iter().map(|line| line.normalized.clone()).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::line::{build_lines, RawLine};
    use pretty_assertions::assert_eq;

    #[test]
    fn picks_team_and_position_from_back_text() {
        let kb = KnowledgeBase::builtin().with_max_year(2026);
        let lines = build_lines(&[
            RawLine::new("NEW YORK METS", Some(0.7)),
            RawLine::new("PITCHER", Some(0.7)),
            RawLine::new("COMPLETE MAJOR LEAGUE STATS", Some(0.6)),
        ]);
        let details = details(&lines, &kb).unwrap();
        assert_eq!(details.team, "New York Mets");
        assert_eq!(details.position, "Pitcher");
        assert_eq!(details.lines.len(), 3);
    }

    #[test]
    fn empty_back_yields_none() {
        let kb = KnowledgeBase::builtin().with_max_year(2026);
        assert!(details(&[], &kb).is_none());
    }
}
