//! Axis tick generation
//!
//! Ticks start at the range start and advance by a fixed step. The step
//! begins at one hour (hour mode) or one day (day mode) and is doubled until
//! no more than [`MAX_TICKS`] ticks fit in the range. Doubling keeps every
//! tick aligned to the range start.

use chrono::{DateTime, FixedOffset, TimeDelta};
use serde::Serialize;

use crate::domain::ViewMode;

/// Upper bound on the number of ticks on one axis
pub const MAX_TICKS: usize = 12;

const MILLIS_PER_HOUR: i64 = 3_600_000;
const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;

/// A labelled position on the time axis
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisTick {
    pub at: DateTime<FixedOffset>,
    pub offset_pct: f64,
    pub label: String,
}

/// chrono format for axis labels in the given mode
pub fn label_format(mode: &ViewMode) -> &'static str {
    if mode.is_hour() {
        "%H:%M"
    } else {
        "%b %-d"
    }
}

/// Formats an instant the way axis and item labels show it
pub fn format_label(mode: &ViewMode, at: DateTime<FixedOffset>) -> String {
    at.format(label_format(mode)).to_string()
}

fn base_step(mode: &ViewMode) -> i64 {
    if mode.is_hour() {
        MILLIS_PER_HOUR
    } else {
        MILLIS_PER_DAY
    }
}

/// Ticks emitted for a span, counting both ends
fn tick_count(span_millis: i64, step_millis: i64) -> usize {
    (span_millis.max(0) / step_millis) as usize + 1
}

/// Step between ticks, in milliseconds
pub fn tick_step(mode: &ViewMode, span_millis: i64) -> i64 {
    let mut step = base_step(mode);
    while tick_count(span_millis, step) > MAX_TICKS {
        match step.checked_mul(2) {
            Some(doubled) => step = doubled,
            None => break,
        }
    }
    step
}

/// Builds the ticks from `start` to `end` inclusive
pub fn axis_ticks(
    mode: &ViewMode,
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
) -> Vec<AxisTick> {
    let span = (end - start).num_milliseconds();
    let step = tick_step(mode, span);
    let count = tick_count(span, step);
    let denominator = span.max(1) as f64;

    let mut ticks = Vec::with_capacity(count);
    for index in 0..count {
        let Some(at) = TimeDelta::try_milliseconds(step.saturating_mul(index as i64))
            .and_then(|delta| start.checked_add_signed(delta))
        else {
            break;
        };

        let elapsed = (at - start).num_milliseconds() as f64;
        ticks.push(AxisTick {
            at,
            offset_pct: (elapsed / denominator).clamp(0.0, 1.0) * 100.0,
            label: format_label(mode, at),
        });
    }

    tracing::debug!(mode = %mode, step_millis = step, ticks = ticks.len(), "built axis ticks");
    ticks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn ten_day_range_uses_daily_ticks() {
        let ticks = axis_ticks(
            &ViewMode::Day,
            at("2024-01-01T00:00:00Z"),
            at("2024-01-11T00:00:00Z"),
        );

        assert_eq!(ticks.len(), 11);
        assert_eq!(ticks[0].label, "Jan 1");
        assert_eq!(ticks[10].label, "Jan 11");
        assert!((ticks[1].offset_pct - 10.0).abs() < 1e-9);
        assert!((ticks[10].offset_pct - 100.0).abs() < 1e-9);
    }

    #[test]
    fn long_range_doubles_step() {
        let start = at("2024-01-01T00:00:00Z");
        let ticks = axis_ticks(&ViewMode::Day, start, at("2024-01-31T00:00:00Z"));

        // 30 days: 1d -> 31 ticks, 2d -> 16, 4d -> 8
        assert_eq!(ticks.len(), 8);
        assert_eq!(ticks[1].at, start + TimeDelta::days(4));
        assert_eq!(tick_step(&ViewMode::Day, 30 * MILLIS_PER_DAY), 4 * MILLIS_PER_DAY);
    }

    #[test]
    fn twelve_step_span_is_doubled_to_stay_within_limit() {
        // Twelve hours would emit 13 ticks at a one-hour step
        let ticks = axis_ticks(
            &ViewMode::Hour,
            at("2024-01-01T00:00:00Z"),
            at("2024-01-01T12:00:00Z"),
        );
        assert_eq!(ticks.len(), 7);
        assert!(ticks.len() <= MAX_TICKS);
    }

    #[test]
    fn hour_labels_show_hour_and_minute() {
        let ticks = axis_ticks(
            &ViewMode::Hour,
            at("2024-01-01T08:30:00+01:00"),
            at("2024-01-01T11:30:00+01:00"),
        );
        let labels: Vec<_> = ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["08:30", "09:30", "10:30", "11:30"]);
    }

    #[test]
    fn partial_trailing_step_is_not_emitted() {
        let ticks = axis_ticks(
            &ViewMode::Hour,
            at("2024-01-01T00:00:00Z"),
            at("2024-01-01T02:30:00Z"),
        );
        assert_eq!(ticks.len(), 3);
        assert_eq!(ticks.last().unwrap().label, "02:00");
    }

    #[test]
    fn inverted_range_yields_single_tick() {
        let ticks = axis_ticks(
            &ViewMode::Day,
            at("2024-01-05T00:00:00Z"),
            at("2024-01-01T00:00:00Z"),
        );
        assert_eq!(ticks.len(), 1);
        assert_eq!(ticks[0].offset_pct, 0.0);
    }

    #[test]
    fn unsupported_mode_lays_out_in_days() {
        let mode = ViewMode::from("week");
        assert_eq!(label_format(&mode), "%b %-d");
        assert_eq!(tick_step(&mode, MILLIS_PER_DAY), MILLIS_PER_DAY);
    }
}
