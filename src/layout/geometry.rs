//! Item geometry on the time axis
//!
//! Projects every item of a normalized document onto a 0-100% axis spanning
//! the view range and groups the results into per-lane buckets.

use chrono::{DateTime, FixedOffset, TimeDelta};
use serde::Serialize;
use thiserror::Error;

use super::axis::{axis_ticks, format_label, AxisTick};
use crate::domain::{add_days, TimelineDocument, TimelineItem, ViewMode};

/// Minimum bar width as a fraction of the range
const MIN_WIDTH_FRACTION: f64 = 0.01;

#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    #[error("Cannot lay out a timeline without a valid view range")]
    MissingRange,
}

/// Position and presentation data for one item
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemGeometry {
    pub id: String,
    pub lane_id: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub effective_start: DateTime<FixedOffset>,
    pub effective_end: DateTime<FixedOffset>,
    pub offset_pct: f64,
    pub width_pct: f64,
    pub status_class: String,
}

impl ItemGeometry {
    /// "start → end" in the mode's label format
    pub fn range_label(&self, mode: &ViewMode) -> String {
        format!(
            "{} → {}",
            format_label(mode, self.effective_start),
            format_label(mode, self.effective_end)
        )
    }

    /// Multi-line hover text: label, span, status and optional description
    pub fn tooltip(&self) -> String {
        let mut text = format!(
            "{}\n{} → {}\nStatus: {}",
            self.label,
            self.effective_start.format("%Y-%m-%d %H:%M"),
            self.effective_end.format("%Y-%m-%d %H:%M"),
            self.status.as_deref().unwrap_or("default"),
        );
        if let Some(description) = &self.description {
            text.push('\n');
            text.push_str(description);
        }
        text
    }
}

/// One lane and its items, ordered by effective start
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaneLayout {
    pub id: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub items: Vec<ItemGeometry>,
}

/// Everything a renderer needs to draw a timeline
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineLayout {
    pub mode: ViewMode,
    pub range_start: DateTime<FixedOffset>,
    pub range_end: DateTime<FixedOffset>,
    pub span_millis: i64,
    pub ticks: Vec<AxisTick>,
    pub lanes: Vec<LaneLayout>,
}

/// Turns a status into a CSS-safe token
///
/// Lowercased, whitespace runs collapsed to one hyphen; blank or absent
/// statuses become `default`.
pub fn status_slug(status: Option<&str>) -> String {
    let slug = status
        .unwrap_or_default()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");

    if slug.is_empty() {
        "default".to_string()
    } else {
        slug
    }
}

/// Projects one item onto the axis
pub fn place_item(
    item: &TimelineItem,
    range_start: DateTime<FixedOffset>,
    span_millis: i64,
) -> ItemGeometry {
    let span = span_millis.max(1) as f64;
    let start = item.start_instant().unwrap_or(range_start);
    let end = item
        .end_instant()
        .or_else(|| item.duration_days.and_then(|days| add_days(start, days)))
        .filter(|end| *end > start)
        .unwrap_or_else(|| {
            start
                .checked_add_signed(TimeDelta::hours(1))
                .unwrap_or(start)
        });

    let offset = ((start - range_start).num_milliseconds() as f64 / span).clamp(0.0, 1.0) * 100.0;
    let width = ((end - start).num_milliseconds() as f64 / span).clamp(MIN_WIDTH_FRACTION, 1.0) * 100.0;
    let slug = status_slug(item.status.as_deref());

    ItemGeometry {
        id: item.id.clone(),
        lane_id: item.lane_id.clone(),
        label: item.display_label().to_string(),
        status: item.status.clone(),
        description: item.description.clone(),
        effective_start: start,
        effective_end: end,
        offset_pct: offset,
        // Shrink the bar rather than move it so it never runs off the axis
        width_pct: width.min(100.0 - offset),
        status_class: format!("status-{}", slug),
    }
}

/// Lays out a normalized document
pub fn project(document: &TimelineDocument) -> Result<TimelineLayout, LayoutError> {
    let (range_start, range_end) = document.range_instants().ok_or(LayoutError::MissingRange)?;
    let mode = match document.mode() {
        Some(ViewMode::Hour) => ViewMode::Hour,
        _ => ViewMode::Day,
    };
    let span_millis = (range_end - range_start).num_milliseconds().max(1);

    let mut lanes: Vec<LaneLayout> = document
        .lanes
        .iter()
        .map(|lane| LaneLayout {
            id: lane.id.clone(),
            label: lane.display_label().to_string(),
            color: lane.color.clone(),
            items: Vec::new(),
        })
        .collect();

    for item in document.items() {
        let lane_key = item.lane_id.to_lowercase();
        match lanes.iter_mut().find(|lane| lane.id.to_lowercase() == lane_key) {
            Some(lane) => lane.items.push(place_item(item, range_start, span_millis)),
            None => tracing::warn!(item = %item.id, lane = %item.lane_id, "dropping item on unknown lane"),
        }
    }

    for lane in &mut lanes {
        lane.items.sort_by_key(|item| item.effective_start);
    }

    Ok(TimelineLayout {
        ticks: axis_ticks(&mode, range_start, range_end),
        mode,
        range_start,
        range_end,
        span_millis,
        lanes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{normalize, TimelineLane, TimelineRange, TimelineView};

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {} but got {}",
            expected,
            actual
        );
    }

    fn document(items: Vec<TimelineItem>) -> TimelineDocument {
        TimelineDocument::new(
            TimelineView::new(
                ViewMode::Day,
                TimelineRange::new(at("2024-01-01T00:00:00Z"), at("2024-01-11T00:00:00Z")),
            ),
            vec![
                TimelineLane::new("eng", "Engineering").with_color("#336699"),
                TimelineLane::new("qa", ""),
            ],
            items,
        )
    }

    #[test]
    fn duration_item_is_projected() {
        let doc = normalize(&document(vec![TimelineItem::new("a", "eng")
            .with_start(at("2024-01-02T00:00:00Z"))
            .with_duration_days(3.0)]));

        let layout = project(&doc).unwrap();
        let item = &layout.lanes[0].items[0];
        approx(item.offset_pct, 10.0);
        approx(item.width_pct, 30.0);
        assert_eq!(item.effective_end, at("2024-01-05T00:00:00Z"));
    }

    #[test]
    fn item_spanning_range_fills_axis() {
        let item = TimelineItem::new("a", "eng")
            .with_start(at("2024-01-01T00:00:00Z"))
            .with_end(at("2024-01-11T00:00:00Z"));
        let geometry = place_item(&item, at("2024-01-01T00:00:00Z"), 10 * 86_400_000);

        approx(geometry.offset_pct, 0.0);
        approx(geometry.offset_pct + geometry.width_pct, 100.0);
    }

    #[test]
    fn item_at_range_end_clamps() {
        let item = TimelineItem::new("a", "eng")
            .with_start(at("2024-01-11T00:00:00Z"))
            .with_end(at("2024-01-12T00:00:00Z"));
        let geometry = place_item(&item, at("2024-01-01T00:00:00Z"), 10 * 86_400_000);

        approx(geometry.offset_pct, 100.0);
        assert!(geometry.width_pct >= 0.0);
        approx(geometry.width_pct, 0.0);
    }

    #[test]
    fn item_before_range_starts_at_zero() {
        let item = TimelineItem::new("a", "eng")
            .with_start(at("2023-12-30T00:00:00Z"))
            .with_end(at("2024-01-02T00:00:00Z"));
        let geometry = place_item(&item, at("2024-01-01T00:00:00Z"), 10 * 86_400_000);

        approx(geometry.offset_pct, 0.0);
        approx(geometry.width_pct, 30.0);
    }

    #[test]
    fn tiny_items_get_minimum_width() {
        let item = TimelineItem::new("a", "eng")
            .with_start(at("2024-01-02T00:00:00Z"))
            .with_end(at("2024-01-02T00:01:00Z"));
        let geometry = place_item(&item, at("2024-01-01T00:00:00Z"), 10 * 86_400_000);

        approx(geometry.width_pct, 1.0);
    }

    #[test]
    fn missing_start_defaults_to_range_start() {
        let item = TimelineItem::new("a", "eng")
            .with_end(at("2024-01-03T00:00:00Z"))
            .with_duration_days(1.0);
        let geometry = place_item(&item, at("2024-01-01T00:00:00Z"), 10 * 86_400_000);

        assert_eq!(geometry.effective_start, at("2024-01-01T00:00:00Z"));
        approx(geometry.width_pct, 20.0);
    }

    #[test]
    fn start_only_item_defaults_to_one_hour() {
        let item = TimelineItem::new("a", "eng").with_start(at("2024-01-02T00:00:00Z"));
        let geometry = place_item(&item, at("2024-01-01T00:00:00Z"), 86_400_000);

        assert_eq!(geometry.effective_end, at("2024-01-02T01:00:00Z"));
    }

    #[test]
    fn unnormalized_duration_is_applied() {
        let item = TimelineItem::new("a", "eng")
            .with_start(at("2024-01-02T00:00:00Z"))
            .with_duration_days(0.5);
        let geometry = place_item(&item, at("2024-01-01T00:00:00Z"), 86_400_000);

        assert_eq!(geometry.effective_end, at("2024-01-02T12:00:00Z"));
    }

    #[test]
    fn status_slugs() {
        assert_eq!(status_slug(None), "default");
        assert_eq!(status_slug(Some("")), "default");
        assert_eq!(status_slug(Some("   ")), "default");
        assert_eq!(status_slug(Some("Done")), "done");
        assert_eq!(status_slug(Some("In  \t Progress")), "in-progress");
        assert_eq!(status_slug(Some(" At Risk ")), "at-risk");
    }

    #[test]
    fn items_are_bucketed_by_lane_and_sorted() {
        let doc = document(vec![
            TimelineItem::new("late", "eng").with_start(at("2024-01-05T00:00:00Z")),
            TimelineItem::new("test", "QA").with_start(at("2024-01-03T00:00:00Z")),
            TimelineItem::new("early", "eng").with_start(at("2024-01-02T00:00:00Z")),
            TimelineItem::new("stray", "ops").with_start(at("2024-01-02T00:00:00Z")),
        ]);

        let layout = project(&doc).unwrap();
        let eng: Vec<_> = layout.lanes[0].items.iter().map(|i| i.id.as_str()).collect();
        let qa: Vec<_> = layout.lanes[1].items.iter().map(|i| i.id.as_str()).collect();

        assert_eq!(eng, vec!["early", "late"]);
        assert_eq!(qa, vec!["test"]);
        assert_eq!(layout.lanes[1].label, "qa");
        assert_eq!(layout.lanes[0].color.as_deref(), Some("#336699"));
    }

    #[test]
    fn layout_carries_axis_ticks() {
        let layout = project(&document(vec![])).unwrap();
        assert_eq!(layout.ticks.len(), 11);
        assert_eq!(layout.span_millis, 10 * 86_400_000);
        assert_eq!(layout.mode, ViewMode::Day);
    }

    fn assert_on_axis(geometry: &ItemGeometry) {
        assert!(geometry.offset_pct.is_finite() && geometry.width_pct.is_finite());
        assert!((0.0..=100.0).contains(&geometry.offset_pct));
        assert!(geometry.width_pct >= 0.0);
        assert!(geometry.offset_pct + geometry.width_pct <= 100.0 + 1e-9);
    }

    #[test]
    fn zero_and_negative_spans_stay_on_axis() {
        let start = at("2024-01-01T00:00:00Z");
        let items = [
            TimelineItem::new("at", "eng").with_start(start),
            TimelineItem::new("after", "eng").with_start(at("2024-01-03T00:00:00Z")),
            TimelineItem::new("before", "eng")
                .with_start(at("2023-12-30T00:00:00Z"))
                .with_end(at("2023-12-31T00:00:00Z")),
        ];

        for span in [0, -86_400_000] {
            for item in &items {
                assert_on_axis(&place_item(item, start, span));
            }
        }

        let collapsed = place_item(&items[0], start, 0);
        approx(collapsed.offset_pct, 0.0);
        approx(collapsed.width_pct, 100.0);
    }

    #[test]
    fn collapsed_range_projects_finite_geometry() {
        let instant = at("2024-01-01T00:00:00Z");
        let mut doc = document(vec![
            TimelineItem::new("a", "eng").with_start(instant),
            TimelineItem::new("b", "qa")
                .with_start(at("2024-01-02T00:00:00Z"))
                .with_duration_days(1.0),
        ]);
        doc.view = Some(TimelineView::new(
            ViewMode::Day,
            TimelineRange::new(instant, instant),
        ));

        let layout = project(&doc).unwrap();
        assert_eq!(layout.span_millis, 1);
        for item in layout.lanes.iter().flat_map(|lane| &lane.items) {
            assert_on_axis(item);
        }
        assert!(!layout.ticks.is_empty());
    }

    #[test]
    fn missing_range_is_an_error() {
        let mut doc = document(vec![]);
        doc.view.as_mut().unwrap().range = None;
        assert_eq!(project(&doc), Err(LayoutError::MissingRange));
    }

    #[test]
    fn labels_and_tooltips() {
        let item = TimelineItem::new("a", "eng")
            .with_label("Build")
            .with_status("In Progress")
            .with_description("Ship the thing")
            .with_start(at("2024-01-02T09:00:00Z"))
            .with_end(at("2024-01-04T17:30:00Z"));
        let geometry = place_item(&item, at("2024-01-01T00:00:00Z"), 10 * 86_400_000);

        assert_eq!(geometry.status_class, "status-in-progress");
        assert_eq!(geometry.range_label(&ViewMode::Day), "Jan 2 → Jan 4");
        assert_eq!(geometry.range_label(&ViewMode::Hour), "09:00 → 17:30");
        assert_eq!(
            geometry.tooltip(),
            "Build\n2024-01-02 09:00 → 2024-01-04 17:30\nStatus: In Progress\nShip the thing"
        );
    }
}
