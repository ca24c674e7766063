//! Timeline document normalization
//!
//! Completes a validated document: derives missing end dates from
//! `start + durationDays` and orders items by their effective start.
//! The input is never modified; a new document is returned.

use chrono::{DateTime, FixedOffset, TimeDelta};

use super::document::{TimelineDocument, TimelineItem};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Adds a real-valued number of days, rounded to the nearest millisecond
///
/// Returns `None` when the result is not representable.
pub fn add_days(start: DateTime<FixedOffset>, days: f64) -> Option<DateTime<FixedOffset>> {
    if !days.is_finite() {
        return None;
    }
    let millis = (days * MILLIS_PER_DAY).round();
    if millis.abs() >= i64::MAX as f64 {
        return None;
    }
    let delta = TimeDelta::try_milliseconds(millis as i64)?;
    start.checked_add_signed(delta)
}

/// Normalizes a document that has already passed validation
///
/// Lanes and view are passed through unchanged.
pub fn normalize(document: &TimelineDocument) -> TimelineDocument {
    let mut items: Vec<TimelineItem> = document.items().iter().map(derive_end).collect();

    // `sort_by_key` is stable: ties keep their input order
    items.sort_by_key(sort_key);

    tracing::debug!(items = items.len(), "normalized timeline document");

    document.with_items(items)
}

fn derive_end(item: &TimelineItem) -> TimelineItem {
    let (Some(start), None, Some(days)) = (item.start_instant(), &item.end, item.duration_days) else {
        return item.clone();
    };

    match add_days(start, days) {
        // A zero-length span would fail validation as end <= start, so the
        // item stays start-only
        Some(end) if end > start => item.clone().with_end(end),
        _ => {
            tracing::debug!(item = %item.id, days, "no end derived from durationDays");
            item.clone()
        }
    }
}

/// Effective start; items with no time information sort last
fn sort_key(item: &TimelineItem) -> (bool, Option<DateTime<FixedOffset>>) {
    let key = item.start_instant().or_else(|| item.end_instant());
    if key.is_none() {
        tracing::warn!(item = %item.id, "item has no usable start or end; sorting it last");
    }
    (key.is_none(), key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::{TimelineLane, TimelineRange, TimelineView, ViewMode};

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn document(items: Vec<TimelineItem>) -> TimelineDocument {
        TimelineDocument::new(
            TimelineView::new(
                ViewMode::Day,
                TimelineRange::new(at("2024-01-01T00:00:00Z"), at("2024-01-11T00:00:00Z")),
            ),
            vec![TimelineLane::new("eng", "Engineering")],
            items,
        )
    }

    fn ids(doc: &TimelineDocument) -> Vec<&str> {
        doc.items().iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn computes_end_from_whole_days() {
        let doc = document(vec![TimelineItem::new("a", "eng")
            .with_start(at("2024-01-02T00:00:00Z"))
            .with_duration_days(3.0)]);

        let normalized = normalize(&doc);
        assert_eq!(
            normalized.items()[0].end_instant(),
            Some(at("2024-01-05T00:00:00Z"))
        );
    }

    #[test]
    fn computes_end_from_fractional_days() {
        let start = at("2024-01-02T06:00:00+02:00");
        let doc = document(vec![TimelineItem::new("a", "eng")
            .with_start(start)
            .with_duration_days(0.5)]);

        let normalized = normalize(&doc);
        let item = &normalized.items()[0];
        assert_eq!(item.end_instant(), Some(start + TimeDelta::hours(12)));
        assert_eq!(item.end_instant().unwrap().offset(), start.offset());
    }

    #[test]
    fn explicit_end_is_kept() {
        let doc = document(vec![TimelineItem::new("a", "eng")
            .with_start(at("2024-01-02T00:00:00Z"))
            .with_end(at("2024-01-03T00:00:00Z"))
            .with_duration_days(5.0)]);

        assert_eq!(
            normalize(&doc).items()[0].end_instant(),
            Some(at("2024-01-03T00:00:00Z"))
        );
    }

    #[test]
    fn zero_duration_leaves_item_start_only() {
        let doc = document(vec![TimelineItem::new("a", "eng")
            .with_start(at("2024-01-02T00:00:00Z"))
            .with_duration_days(0.0)]);

        assert!(normalize(&doc).items()[0].end.is_none());
    }

    #[test]
    fn orders_by_effective_start() {
        let doc = document(vec![
            TimelineItem::new("day2", "eng").with_start(at("2024-01-02T00:00:00Z")),
            TimelineItem::new("end-only", "eng")
                .with_end(at("2024-01-01T12:00:00Z"))
                .with_duration_days(0.25),
            TimelineItem::new("day1", "eng").with_start(at("2024-01-01T00:00:00Z")),
        ]);

        assert_eq!(ids(&normalize(&doc)), vec!["day1", "end-only", "day2"]);
    }

    #[test]
    fn ties_keep_input_order() {
        let start = at("2024-01-03T00:00:00Z");
        let doc = document(vec![
            TimelineItem::new("b", "eng").with_start(start),
            TimelineItem::new("a", "eng").with_start(start),
            TimelineItem::new("c", "eng").with_start(start),
        ]);

        assert_eq!(ids(&normalize(&doc)), vec!["b", "a", "c"]);
    }

    #[test]
    fn items_without_time_sort_last() {
        let doc = document(vec![
            TimelineItem::new("none", "eng"),
            TimelineItem::new("late", "eng").with_start(at("2030-01-01T00:00:00Z")),
        ]);

        assert_eq!(ids(&normalize(&doc)), vec!["late", "none"]);
    }

    #[test]
    fn input_is_not_mutated() {
        let doc = document(vec![
            TimelineItem::new("b", "eng")
                .with_start(at("2024-01-05T00:00:00Z"))
                .with_duration_days(1.0),
            TimelineItem::new("a", "eng").with_start(at("2024-01-02T00:00:00Z")),
        ]);
        let before = doc.clone();

        let normalized = normalize(&doc);
        assert_eq!(doc, before);
        assert_ne!(normalized, doc);
        assert_eq!(normalized.lanes, doc.lanes);
        assert_eq!(normalized.view, doc.view);
    }

    #[test]
    fn add_days_rejects_unrepresentable_results() {
        assert_eq!(add_days(at("2024-01-01T00:00:00Z"), 1e300), None);
        assert_eq!(add_days(at("2024-01-01T00:00:00Z"), f64::NAN), None);
    }
}
