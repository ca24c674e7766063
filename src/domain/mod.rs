//! Domain models for timeline documents
//!
//! Contains the validation and normalization rules without any I/O concerns.

mod document;
mod id;
mod normalize;
mod validate;

pub use document::{
    TimelineDocument, TimelineItem, TimelineLane, TimelineRange, TimelineView, Timestamp, ViewMode,
};
pub use id::{generate_item_id, GENERATED_PREFIX};
pub use normalize::{add_days, normalize};
pub use validate::{validate, ValidationError, ValidationResult};
