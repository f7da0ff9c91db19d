use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::line::OcrLine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Player,
    Team,
    Sport,
    Year,
    SetName,
    CardNumber,
    Grade,
    ScoreRating,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Field::Player => "Player",
            Field::Team => "Team",
            Field::Sport => "Sport",
            Field::Year => "Year",
            Field::SetName => "Set",
            Field::CardNumber => "Card number",
            Field::Grade => "Grade",
            Field::ScoreRating => "Score rating",
        }
    }
}

/// The four identity fields that must be present before a record is
/// considered confirmed.
pub const REQUIRED_FIELDS: [Field; 4] = [Field::Player, Field::Team, Field::Year, Field::SetName];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldSource {
    Front,
    Back,
    Ocr,
    Infer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DerivedVia {
    ExactKnownMatch,
    HeaderHeuristic,
    SlabHeuristic,
    RegexShape,
    PairedKeywordNumber,
}

/// A single resolver proposal. Ephemeral; produced and consumed within one
/// derivation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldCandidate {
    pub field: Field,
    pub matched_value: String,
    pub source_line: OcrLine,
    pub derived_via: DerivedVia,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardBackDetails {
    pub team: String,
    pub position: String,
    pub lines: Vec<String>,
}

/// The derivation output. Field names are stable across versions; unknown
/// values stay empty rather than guessed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedCardRecord {
    pub player: String,
    pub team: String,
    pub sport: String,
    pub year: String,
    pub set_name: String,
    pub set_brand: String,
    pub card_number: String,
    pub brand: String,
    pub grade: String,
    pub grading_authority: String,
    pub grade_value: String,
    pub score_rating: String,
    pub notes: String,
    pub confidence: BTreeMap<Field, ConfidenceLevel>,
    pub sources: BTreeMap<Field, FieldSource>,
    pub is_text_verified: BTreeMap<Field, bool>,
    pub source_evidence: Vec<String>,
    pub needs_user_confirmation: bool,
    pub manual_suggestions: BTreeMap<Field, String>,
    pub card_back_details: Option<CardBackDetails>,
}

impl DerivedCardRecord {
    pub fn canonical(&self, field: Field) -> &str {
        match field {
            Field::Player => &self.player,
            Field::Team => &self.team,
            Field::Sport => &self.sport,
            Field::Year => &self.year,
            Field::SetName => &self.set_name,
            Field::CardNumber => &self.card_number,
            Field::Grade => &self.grade,
            Field::ScoreRating => &self.score_rating,
        }
    }

    pub fn canonical_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Player => &mut self.player,
            Field::Team => &mut self.team,
            Field::Sport => &mut self.sport,
            Field::Year => &mut self.year,
            Field::SetName => &mut self.set_name,
            Field::CardNumber => &mut self.card_number,
            Field::Grade => &mut self.grade,
            Field::ScoreRating => &mut self.score_rating,
        }
    }

    pub fn missing_required(&self) -> Vec<Field> {
        REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|field| self.canonical(*field).is_empty())
            .collect()
    }
}
