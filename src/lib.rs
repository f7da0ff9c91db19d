pub mod core;
pub mod evidence;
pub mod overlay;
pub mod pipeline;
pub mod resolve;

pub use crate::core::knowledge::KnowledgeBase;
pub use crate::core::model::{
    CardBackDetails, ConfidenceLevel, DerivedCardRecord, Field, FieldSource,
};
pub use crate::pipeline::{derive_card, derive_from_json, DeriveRequest, Hints, ZoneCrop};
