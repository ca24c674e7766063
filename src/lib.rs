//! timeline-doc - validation, normalization and layout of timeline documents
//!
//! A timeline document is JSON describing a Gantt-style schedule: a view
//! (day/hour mode and a date range), lanes, and items placed on lanes.
//! Processing is two-phase: [`validate`] reports every problem at once, and
//! [`normalize`] completes a valid document (derived end dates, items ordered
//! by start). [`layout::project`] then maps the result onto axis geometry.

pub mod domain;
pub mod layout;
pub mod storage;
pub mod cli;

pub use domain::{
    normalize, validate, TimelineDocument, TimelineItem, TimelineLane, TimelineRange,
    TimelineView, Timestamp, ValidationError, ValidationResult, ViewMode,
};
