//! Timeline document validation
//!
//! [`validate`] collects every problem in a document instead of stopping at
//! the first one, so a single corrected re-submission can reveal whatever is
//! left. Problems are reported in category order: view, then lanes, then
//! items. Later checks rely on earlier ones (item lane references are
//! checked against the lane ids accepted above them).

use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;

use super::document::{TimelineDocument, TimelineItem, TimelineLane, TimelineView, ViewMode};

/// Aggregated validation failure, one message per line
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{}", .0.join("\n"))]
pub struct ValidationError(pub Vec<String>);

/// Outcome of validating a document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// Turns the error list into a single failure for fail-fast callers
    pub fn ensure_valid(&self) -> Result<(), ValidationError> {
        if self.is_valid {
            Ok(())
        } else {
            Err(ValidationError(self.errors.clone()))
        }
    }
}

/// Validates a parsed document; `None` means the text could not be parsed
pub fn validate(document: Option<&TimelineDocument>) -> ValidationResult {
    let Some(document) = document else {
        tracing::debug!("validation short-circuited: no document");
        return ValidationResult::from_errors(vec![
            "Document is null or could not be parsed.".to_string(),
        ]);
    };

    let mut errors = Vec::new();

    check_view(document.view.as_ref(), &mut errors);
    let lane_ids = check_lanes(&document.lanes, &mut errors);

    match &document.items {
        None => errors.push("items must be provided (can be empty array).".to_string()),
        Some(items) => {
            for (index, item) in items.iter().enumerate() {
                check_item(index, item, &lane_ids, &mut errors);
            }
        }
    }

    tracing::debug!(
        lanes = document.lanes.len(),
        items = document.items().len(),
        errors = errors.len(),
        "validated timeline document"
    );

    ValidationResult::from_errors(errors)
}

fn check_view(view: Option<&TimelineView>, errors: &mut Vec<String>) {
    let Some(view) = view else {
        errors.push("view section is required.".to_string());
        return;
    };

    let allowed = ViewMode::SUPPORTED.join(", ");
    match &view.mode {
        Some(mode) if mode.is_supported() => {}
        Some(mode) => errors.push(format!(
            "view.mode must be one of [{}], got '{}'.",
            allowed, mode
        )),
        None => errors.push(format!("view.mode must be one of [{}].", allowed)),
    }

    let (start, end) = match &view.range {
        Some(range) => (range.start.as_ref(), range.end.as_ref()),
        None => (None, None),
    };

    match (start, end) {
        (Some(start), Some(end)) => match (start.instant(), end.instant()) {
            (Some(start), Some(end)) if end <= start => {
                errors.push("view.range.end must be after view.range.start.".to_string())
            }
            (Some(_), Some(_)) => {}
            _ => errors.push("view.range must contain valid ISO-8601 date strings.".to_string()),
        },
        _ => errors.push(
            "view.range.start and view.range.end are required ISO-8601 date strings.".to_string(),
        ),
    }
}

/// Checks lanes and returns the lowercased ids items may reference
fn check_lanes(lanes: &[TimelineLane], errors: &mut Vec<String>) -> HashSet<String> {
    if lanes.is_empty() {
        errors.push("lanes must include at least one entry.".to_string());
    }

    let mut lane_ids = HashSet::new();
    for (index, lane) in lanes.iter().enumerate() {
        if lane.id.trim().is_empty() {
            errors.push(format!("lanes[{}].id cannot be empty.", index));
            continue;
        }

        if !lane_ids.insert(lane.id.to_lowercase()) {
            errors.push(format!("Duplicate lane id detected: {}", lane.id));
        }

        if lane.label.trim().is_empty() {
            errors.push(format!("Lane '{}' is missing a label.", lane.id));
        }
    }

    lane_ids
}

fn check_item(index: usize, item: &TimelineItem, lane_ids: &HashSet<String>, errors: &mut Vec<String>) {
    let name = if item.id.trim().is_empty() {
        format!("items[{}]", index)
    } else {
        item.id.clone()
    };

    if item.lane_id.trim().is_empty() {
        errors.push(format!("Item '{}' must specify a laneId.", name));
    } else if !lane_ids.contains(&item.lane_id.to_lowercase()) {
        errors.push(format!(
            "Item '{}' references unknown lane '{}'.",
            name, item.lane_id
        ));
    }

    if item.start.as_ref().is_some_and(|start| !start.is_valid()) {
        errors.push(format!("Item '{}' has an invalid start date.", name));
    }
    if item.end.as_ref().is_some_and(|end| !end.is_valid()) {
        errors.push(format!("Item '{}' has an invalid end date.", name));
    }
    if item
        .duration_days
        .is_some_and(|days| !days.is_finite() || days < 0.0)
    {
        errors.push(format!(
            "Item '{}' has an invalid durationDays value; it must be a non-negative number.",
            name
        ));
    }

    match (&item.start, &item.end) {
        (None, None) => errors.push(format!(
            "Item '{}' needs start/end or start + durationDays.",
            name
        )),
        (Some(_), Some(_)) => {
            if let (Some(start), Some(end)) = (item.start_instant(), item.end_instant()) {
                if end <= start {
                    errors.push(format!("Item '{}' must have end after start.", name));
                }
            }
        }
        (None, Some(_)) if item.duration_days.is_none() => {
            errors.push(format!("Item '{}' is missing start date.", name))
        }
        _ => {}
    }
}
