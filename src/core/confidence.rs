/// Per-field verification thresholds. A candidate at or above its field's
/// threshold (and passing that field's shape check) is verified; anything
/// under it is at best a manual suggestion.
pub mod thresholds {
    pub const PLAYER: f64 = 0.85;
    pub const TEAM: f64 = 0.85;
    pub const YEAR: f64 = 0.85;
    pub const CARD_NUMBER: f64 = 0.85;
    pub const GRADE: f64 = 0.85;

    /// Floor applied to slab-label lines that carry no confidence of their
    /// own.
    pub const SLAB_FLOOR: f64 = 0.97;
}

/// Missing confidence fails the gate; it is never an error.
pub fn meets_threshold(confidence: Option<f64>, threshold: f64) -> bool {
    confidence.map(|value| value >= threshold).unwrap_or(false)
}
