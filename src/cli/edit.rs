//! Editing commands (fmt, set-mode, sample)

use anyhow::{Context, Result};

use super::output::Output;
use crate::storage::serializer::{format_json, set_mode as set_view_mode};
use crate::storage::DocumentFile;

/// Bundled example schedule
pub const SAMPLE_DOCUMENT: &str = include_str!("../../data/default-schedule.json");

/// View mode accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ModeArg {
    Day,
    Hour,
}

impl ModeArg {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModeArg::Day => "day",
            ModeArg::Hour => "hour",
        }
    }
}

fn emit(output: &Output, source: &DocumentFile, text: &str, write: bool, action: &str) -> Result<()> {
    if write {
        source.write(text)?;
        output.success(&format!("{} {}", action, source.display_name()));
    } else {
        println!("{}", text);
    }
    Ok(())
}

/// Re-indents the document without validating it
pub fn fmt(output: &Output, source: &DocumentFile, write: bool) -> Result<()> {
    let text = source.read()?;
    let formatted = format_json(&text)
        .with_context(|| format!("Cannot format {}", source.display_name()))?;
    output.verbose_ctx("fmt", &format!("Formatted {} bytes", formatted.len()));
    emit(output, source, &formatted, write, "Formatted")
}

/// Switches `view.mode`
pub fn set_mode(output: &Output, source: &DocumentFile, mode: ModeArg, write: bool) -> Result<()> {
    let text = source.read()?;
    let updated = set_view_mode(&text, mode.as_str())
        .with_context(|| format!("Unable to switch mode of {}", source.display_name()))?;
    output.verbose_ctx("set-mode", &format!("Set view.mode to {}", mode.as_str()));
    emit(output, source, &updated, write, &format!("Set mode to {} in", mode.as_str()))
}

/// Prints the bundled sample, or writes it to `target`
pub fn sample(output: &Output, target: Option<&DocumentFile>) -> Result<()> {
    match target {
        Some(file) if !file.is_stdin() => {
            file.write(SAMPLE_DOCUMENT)?;
            output.success(&format!("Wrote sample timeline to {}", file.display_name()));
        }
        _ => print!("{}", SAMPLE_DOCUMENT),
    }
    Ok(())
}
