pub mod slab;
pub mod zones;

use std::collections::BTreeMap;

use crate::core::knowledge::KnowledgeBase;
use crate::core::line::OcrLine;
use crate::core::model::DerivedVia;
use crate::resolve::grade::GradeFinding;

#[derive(Debug, Clone, PartialEq)]
pub struct DiffValue {
    pub value: String,
    pub line: OcrLine,
    pub derived_via: DerivedVia,
}

/// Per-field values that replace the full-card derivation, plus a grade that
/// fills only an empty slot. Stages return a diff rather than mutating the
/// record, keeping their ordering explicit in the pipeline.
#[derive(Debug, Clone, Default)]
pub struct IdentityDiff {
    pub player: Option<DiffValue>,
    pub team: Option<DiffValue>,
    pub year: Option<DiffValue>,
    pub set_name: Option<DiffValue>,
    pub card_number: Option<DiffValue>,
    pub grade_if_empty: Option<GradeFinding>,
}

pub trait OverrideStage {
    fn name(&self) -> &'static str;

    /// `None` when the stage's trigger condition is not met.
    fn derive(
        &self,
        zones: &BTreeMap<String, Vec<OcrLine>>,
        kb: &KnowledgeBase,
    ) -> Option<IdentityDiff>;
}

/// Override stages in application order.
pub fn stages() -> Vec<Box<dyn OverrideStage>> {
    vec![Box::new(slab::SlabOverride)]
}
