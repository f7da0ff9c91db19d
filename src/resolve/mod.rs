pub mod back;
pub mod card_number;
pub mod grade;
pub mod grammar;
pub mod player;
pub mod set_brand;
pub mod team;
pub mod year;

use crate::core::model::FieldCandidate;

/// Two-tier resolver output: a verified candidate that may enter the
/// canonical record, and a fallback shown to a human as a manual suggestion,
/// never auto-applied as truth.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub verified: Option<FieldCandidate>,
    pub fallback: Option<FieldCandidate>,
}

impl Resolution {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Uppercase letters over all letters; 0 when the text has no letters.
pub(crate) fn uppercase_ratio(text: &str) -> f64 {
    let mut letters = 0usize;
    let mut upper = 0usize;
    for c in text.chars() {
        if c.is_alphabetic() {
            letters += 1;
            if c.is_uppercase() {
                upper += 1;
            }
        }
    }
    if letters == 0 {
        0.0
    } else {
        upper as f64 / letters as f64
    }
}

pub(crate) fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Title-case a name: first letter of each word (and of each hyphen- or
/// apostrophe-separated part) uppercased, the rest lowered.
pub(crate) fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut start_of_part = true;
    for c in text.chars() {
        if c.is_whitespace() || c == '-' || c == '\'' || c == '.' {
            out.push(c);
            start_of_part = true;
        } else if start_of_part {
            out.extend(c.to_uppercase());
            start_of_part = false;
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}
