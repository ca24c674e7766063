//! Document commands (validate, normalize, layout)

use anyhow::{Context, Result};

use super::output::Output;
use super::render::render_chart;
use crate::domain::{validate as validate_document, ValidationError};
use crate::layout::{project, TimelineLayout};
use crate::storage::serializer::{self, load_and_validate};
use crate::storage::{DocumentFile, RenderConfig};

/// Parses, validates, normalizes and projects document text
pub(crate) fn build_layout(text: &str) -> Result<TimelineLayout, ValidationError> {
    let document = load_and_validate(text)?;
    project(&document).map_err(|e| ValidationError(vec![e.to_string()]))
}

/// Reports every validation problem; fails when there is at least one
pub fn validate(output: &Output, source: &DocumentFile) -> Result<()> {
    let text = source.read()?;
    output.verbose_ctx(
        "validate",
        &format!("Read {} bytes from {}", text.len(), source.display_name()),
    );

    let document = serializer::deserialize(&text);
    let result = validate_document(document.as_ref());
    output.verbose_ctx("validate", &format!("Found {} problem(s)", result.errors.len()));

    if output.is_json() {
        output.data(&result);
    } else if result.is_valid {
        output.success(&format!("{} is valid", source.display_name()));
    } else {
        println!(
            "{} has {} problem(s):",
            source.display_name(),
            result.errors.len()
        );
        for error in &result.errors {
            println!("  - {}", error);
        }
    }

    if !result.is_valid {
        anyhow::bail!("Validation failed with {} error(s)", result.errors.len());
    }

    Ok(())
}

/// Prints or writes back the normalized document
pub fn normalize(output: &Output, source: &DocumentFile, write: bool) -> Result<()> {
    let text = source.read()?;
    let document = load_and_validate(&text)
        .with_context(|| format!("{} failed validation", source.display_name()))?;
    output.verbose_ctx(
        "normalize",
        &format!("Normalized {} item(s)", document.items().len()),
    );

    let json = serializer::serialize(&document)?;

    if write {
        source.write(&json)?;
        output.success(&format!("Normalized {}", source.display_name()));
    } else {
        println!("{}", json);
    }

    Ok(())
}

/// Prints the axis geometry as a chart (text) or data (JSON)
pub fn layout(output: &Output, source: &DocumentFile, render: &RenderConfig) -> Result<()> {
    let text = source.read()?;
    let layout = build_layout(&text)
        .with_context(|| format!("{} failed validation", source.display_name()))?;
    output.verbose_ctx(
        "layout",
        &format!(
            "Projected {} lane(s) with {} tick(s)",
            layout.lanes.len(),
            layout.ticks.len()
        ),
    );

    if output.is_json() {
        output.data(&layout);
    } else {
        println!("{}", render_chart(&layout, render));
    }

    Ok(())
}
