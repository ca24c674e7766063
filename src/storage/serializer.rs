//! JSON (de)serialization of timeline documents
//!
//! Keys are camelCase and absent optional fields are omitted on output.
//! Text that is not a JSON object parses to `None`, which the validator
//! reports as an unparseable document.

use serde_json::Value;
use thiserror::Error;

use crate::domain::{generate_item_id, normalize, validate, TimelineDocument, ValidationError};

#[derive(Debug, Error)]
pub enum SerializerError {
    #[error("Timeline document must be a JSON object")]
    NotAnObject,

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parses document text; `None` if it is blank, malformed or not an object
pub fn deserialize(json: &str) -> Option<TimelineDocument> {
    if json.trim().is_empty() {
        return None;
    }

    let value: Value = match serde_json::from_str(json) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(error = %e, "timeline document is not valid JSON");
            return None;
        }
    };

    if !value.is_object() {
        tracing::debug!("timeline document is not a JSON object");
        return None;
    }

    match serde_json::from_value::<TimelineDocument>(value) {
        Ok(document) => Some(assign_missing_ids(document)),
        Err(e) => {
            tracing::debug!(error = %e, "timeline document has the wrong shape");
            None
        }
    }
}

fn assign_missing_ids(mut document: TimelineDocument) -> TimelineDocument {
    if let Some(items) = document.items.as_mut() {
        for (position, item) in items.iter_mut().enumerate() {
            if item.id.trim().is_empty() {
                item.id = generate_item_id(&item.lane_id, &item.label, position);
            }
        }
    }
    document
}

/// Writes a document as indented JSON
pub fn serialize(document: &TimelineDocument) -> Result<String, SerializerError> {
    Ok(serde_json::to_string_pretty(document)?)
}

/// Parses, validates and normalizes in one step
///
/// All validation messages are returned together, joined by newlines.
pub fn load_and_validate(json: &str) -> Result<TimelineDocument, ValidationError> {
    let document = deserialize(json);
    let result = validate(document.as_ref());
    result.ensure_valid()?;

    match document {
        Some(document) => Ok(normalize(&document)),
        None => Err(ValidationError(result.errors)),
    }
}

/// Re-indents arbitrary JSON text with two spaces, keeping key order
pub fn format_json(json: &str) -> Result<String, SerializerError> {
    let value: Value = serde_json::from_str(json)?;
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Sets `view.mode`, creating the view section when missing
pub fn set_mode(json: &str, mode: &str) -> Result<String, SerializerError> {
    let mut value: Value = serde_json::from_str(json)?;
    let root = value.as_object_mut().ok_or(SerializerError::NotAnObject)?;

    let view = root
        .entry("view")
        .or_insert_with(|| Value::Object(Default::default()));
    if !view.is_object() {
        *view = Value::Object(Default::default());
    }
    if let Some(view) = view.as_object_mut() {
        view.insert("mode".to_string(), Value::String(mode.to_string()));
    }

    Ok(serde_json::to_string_pretty(&value)?)
}
