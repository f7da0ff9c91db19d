use crate::core::model::{DerivedCardRecord, DerivedVia, Field, FieldSource};

/// One display line for a field populated from the full-card scan.
pub fn found(field: Field, value: &str, via: DerivedVia, source: FieldSource, index: usize) -> String {
    format!(
        "{} \"{}\" {} ({} line {})",
        field.label(),
        value,
        via_phrase(via),
        source_phrase(source),
        index + 1
    )
}

/// One display line for a field taken from the slab label override.
pub fn from_slab(field: Field, value: &str) -> String {
    format!("{} \"{}\" read from slab label", field.label(), value)
}

/// Standard line for a required field the scan could not resolve.
pub fn not_detected(field: Field) -> String {
    format!("{} not detected in OCR text", field.label())
}

/// A record needs user confirmation whenever any required identity field is
/// empty.
pub fn needs_confirmation(record: &DerivedCardRecord) -> bool {
    !record.missing_required().is_empty()
}

fn via_phrase(via: DerivedVia) -> &'static str {
    match via {
        DerivedVia::ExactKnownMatch => "matched a known name",
        DerivedVia::HeaderHeuristic => "read from a header line",
        DerivedVia::SlabHeuristic => "read from slab label text",
        DerivedVia::RegexShape => "matched its printed shape",
        DerivedVia::PairedKeywordNumber => "paired with a nearby keyword",
    }
}

fn source_phrase(source: FieldSource) -> &'static str {
    match source {
        FieldSource::Front => "front",
        FieldSource::Back => "back",
        FieldSource::Ocr => "ocr",
        FieldSource::Infer => "inferred",
    }
}
