use std::collections::BTreeMap;

use tracing::debug;

use crate::core::knowledge::KnowledgeBase;
use crate::core::line::OcrLine;
use crate::core::model::Field;
use crate::resolve::{player, set_brand, team};

/// Zones consulted for suggestions, highest priority first.
pub const ZONE_PRIORITY: [&str; 3] = ["bottomCenter", "bottomLeft", "topBanner"];

#[derive(Debug, Clone, PartialEq)]
pub struct ZoneSuggestion {
    pub field: Field,
    pub value: String,
    /// Which zone supplied the value, kept for provenance.
    pub zone: &'static str,
}

type Extractor = fn(&[OcrLine], &KnowledgeBase) -> Option<String>;

/// For each of player/team/set, take the first zone in priority order that
/// yields a candidate.
pub fn build(zones: &BTreeMap<String, Vec<OcrLine>>, kb: &KnowledgeBase) -> Vec<ZoneSuggestion> {
    let extractors: [(Field, Extractor); 3] = [
        (Field::Player, player::suggest_value),
        (Field::Team, team::suggest_value),
        (Field::SetName, set_brand::suggest_value),
    ];

    let mut suggestions = Vec::new();
    for (field, extract) in extractors {
        for zone in ZONE_PRIORITY {
            let Some(lines) = zones.get(zone) else {
                continue;
            };
            if let Some(value) = extract(lines, kb) {
                debug!(?field, zone, %value, "zone suggestion");
                suggestions.push(ZoneSuggestion { field, value, zone });
                break;
            }
        }
    }
    suggestions
}
