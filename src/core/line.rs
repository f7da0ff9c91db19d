use serde::{Deserialize, Serialize};

/// One entry as delivered by the external OCR service. Either member may be
/// missing or null in the wire payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawLine {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

impl RawLine {
    pub fn new(text: impl Into<String>, confidence: Option<f64>) -> Self {
        Self {
            text: Some(text.into()),
            confidence,
        }
    }
}

/// An OCR line after normalization. Immutable once built; `index` is the
/// entry's position in its source scan, assigned before empty-line filtering
/// so index distance reflects real scan distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrLine {
    pub text: String,
    pub normalized: String,
    pub confidence: Option<f64>,
    pub index: usize,
}

impl OcrLine {
    /// The floor only fills in when the line carries no confidence of its
    /// own.
    pub fn with_confidence_floor(&self, floor: f64) -> OcrLine {
        OcrLine {
            confidence: Some(self.confidence.unwrap_or(floor)),
            ..self.clone()
        }
    }
}

/// Collapse whitespace runs and trim. Case, punctuation, and digits pass
/// through untouched.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn build_lines(raw: &[RawLine]) -> Vec<OcrLine> {
    lines_from_raw(raw)
        .filter(|line| !line.normalized.is_empty())
        .collect()
}

/// Diagnostic variant that skips empty-line filtering. Used to inspect what
/// the OCR service actually returned, never for production derivation.
pub fn build_lines_diagnostic(raw: &[RawLine]) -> Vec<OcrLine> {
    lines_from_raw(raw).collect()
}

fn lines_from_raw(raw: &[RawLine]) -> impl Iterator<Item = OcrLine> + '_ {
    raw.iter().enumerate().map(|(index, entry)| {
        let text = entry.text.clone().unwrap_or_default();
        OcrLine {
            normalized: normalize_text(&text),
            text,
            confidence: entry.confidence,
            index,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn normalizes_whitespace_only() {
        let raw = vec![RawLine::new("  RON   DARLING \t", Some(0.95))];
        let lines = build_lines(&raw);
        assert_eq!(lines[0].normalized, "RON DARLING");
        assert_eq!(lines[0].text, "  RON   DARLING \t");
        assert_eq!(lines[0].confidence, Some(0.95));
    }

    #[test]
    fn drops_empty_entries_but_keeps_scan_indices() {
        let raw = vec![
            RawLine::new("FIRST", Some(0.9)),
            RawLine::new("   ", None),
            RawLine {
                text: None,
                confidence: Some(0.5),
            },
            RawLine::new("LAST", Some(0.9)),
        ];
        let lines = build_lines(&raw);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].index, 0);
        assert_eq!(lines[1].index, 3);
    }

    #[test]
    fn diagnostic_mode_keeps_everything() {
        let raw = vec![RawLine::new("", None), RawLine::new("TEXT", Some(0.8))];
        let lines = build_lines_diagnostic(&raw);
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn confidence_floor_only_fills_missing() {
        let raw = vec![RawLine::new("PSA 10", None), RawLine::new("MINT", Some(0.4))];
        let lines = build_lines(&raw);
        assert_eq!(lines[0].with_confidence_floor(0.97).confidence, Some(0.97));
        assert_eq!(lines[1].with_confidence_floor(0.97).confidence, Some(0.4));
    }
}
