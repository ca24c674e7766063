//! # Layout
//!
//! Maps a normalized document to axis geometry for renderers:
//!
//! - [`project`] places every item as an offset/width percentage of the view
//!   range and buckets items per lane.
//! - [`axis_ticks`] builds at most [`MAX_TICKS`] labelled ticks across the range.
//!
//! Pixel and DOM concerns belong to the renderer; this module only produces
//! numbers and labels.

mod axis;
mod geometry;

pub use axis::{axis_ticks, format_label, tick_step, AxisTick, MAX_TICKS};
pub use geometry::{
    place_item, project, status_slug, ItemGeometry, LaneLayout, LayoutError, TimelineLayout,
};
