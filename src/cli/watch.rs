//! `timeline watch`: live re-validation of a document on disk
//!
//! Edits are debounced; every batch re-reads the file, so only the most
//! recent contents are ever rendered. While the document is invalid the
//! errors are shown together with the last valid chart.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{Context, Result};
use notify::RecursiveMode;
use notify_debouncer_mini::new_debouncer;

use super::check::build_layout;
use super::output::Output;
use super::render::render_chart;
use crate::layout::TimelineLayout;
use crate::storage::{Config, DocumentFile};

/// Renders the current contents of `source`, remembering the last valid layout
fn refresh(
    output: &Output,
    source: &DocumentFile,
    config: &Config,
    last_valid: &mut Option<TimelineLayout>,
) {
    let text = match source.read() {
        Ok(text) => text,
        Err(e) => {
            output.error(&format!("{:#}", e));
            return;
        }
    };

    match build_layout(&text) {
        Ok(layout) => {
            if output.is_json() {
                output.data(&serde_json::json!({
                    "isValid": true,
                    "errors": [],
                    "layout": layout,
                }));
            } else {
                println!("{}", render_chart(&layout, &config.project.render));
                println!();
            }
            *last_valid = Some(layout);
        }
        Err(err) => {
            if output.is_json() {
                output.data(&serde_json::json!({
                    "isValid": false,
                    "errors": err.0,
                    "layout": last_valid,
                }));
                return;
            }

            println!("Validation failed ({} error(s)):", err.0.len());
            for message in &err.0 {
                println!("  - {}", message);
            }
            if let Some(layout) = last_valid {
                println!("Showing last valid timeline:");
                println!("{}", render_chart(layout, &config.project.render));
            }
            println!();
        }
    }
}

fn is_target(event_path: &Path, target: &Path) -> bool {
    event_path == target
        || event_path
            .canonicalize()
            .map(|path| path == target)
            .unwrap_or(false)
}

/// Watches a document file until interrupted
pub fn run(output: &Output, source: &DocumentFile, config: &Config) -> Result<()> {
    if source.is_stdin() {
        anyhow::bail!("watch needs a file path, not stdin");
    }

    let target: PathBuf = source
        .path()
        .canonicalize()
        .with_context(|| format!("Failed to resolve {}", source.display_name()))?;
    let dir = target
        .parent()
        .ok_or_else(|| anyhow::anyhow!("{} has no parent directory", target.display()))?;

    let mut last_valid = None;
    refresh(output, source, config, &mut last_valid);

    let (tx, rx) = mpsc::channel();
    let debounce = Duration::from_millis(config.project.watch.debounce_millis);
    let mut debouncer = new_debouncer(debounce, tx)?;
    debouncer.watcher().watch(dir, RecursiveMode::NonRecursive)?;

    output.verbose_ctx(
        "watch",
        &format!(
            "Watching {} (debounce: {}ms)",
            target.display(),
            config.project.watch.debounce_millis
        ),
    );

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let mut changed = events.iter().any(|e| is_target(&e.path, &target));

                // Coalesce batches that queued up while we were rendering
                while let Ok(next) = rx.try_recv() {
                    if let Ok(events) = next {
                        changed |= events.iter().any(|e| is_target(&e.path, &target));
                    }
                }

                if changed {
                    output.verbose_ctx("watch", "Change detected, re-rendering");
                    refresh(output, source, config, &mut last_valid);
                }
            }
            Ok(Err(error)) => {
                output.error(&format!("Watch error: {:?}", error));
            }
            Err(e) => {
                output.verbose_ctx("watch", &format!("Channel closed: {}", e));
                break;
            }
        }
    }

    Ok(())
}
